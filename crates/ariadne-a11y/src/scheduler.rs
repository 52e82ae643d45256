//! Virtual Timers
//!
//! Single-threaded clock driven by the host. Nothing fires on its own: the
//! runtime pops due tasks while advancing time, so every timer effect happens
//! inside an explicit `advance` call.

use std::collections::{BTreeMap, HashMap};

use ariadne_dom::NodeId;

/// Handle returned by [`Scheduler::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Deferred work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Remove a transient status node
    Expire(NodeId),
    /// Move focus to an element
    Focus(NodeId),
}

/// Virtual clock with cancellable timers
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    // (due, id) keeps equal deadlines in scheduling order
    queue: BTreeMap<(u64, u64), Task>,
    due_of: HashMap<u64, u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Run `task` after `delay_ms`
    pub fn schedule(&mut self, delay_ms: u64, task: Task) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        let due = self.now_ms.saturating_add(delay_ms);
        self.queue.insert((due, id), task);
        self.due_of.insert(id, due);
        tracing::trace!("timer {id} scheduled at {due}ms: {task:?}");
        TimerHandle(id)
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.due_of.remove(&handle.0) {
            Some(due) => self.queue.remove(&(due, handle.0)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.due_of.contains_key(&handle.0)
    }

    /// Number of timers not yet fired
    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    /// Pop the earliest task due at or before `deadline`, moving the clock to
    /// its due time
    pub fn pop_due(&mut self, deadline: u64) -> Option<Task> {
        let (&(due, id), _) = self.queue.first_key_value()?;
        if due > deadline {
            return None;
        }
        self.due_of.remove(&id);
        let task = self.queue.remove(&(due, id))?;
        self.now_ms = self.now_ms.max(due);
        Some(task)
    }

    /// Move the clock forward without firing anything
    pub fn advance_to(&mut self, deadline: u64) {
        self.now_ms = self.now_ms.max(deadline);
    }

    /// Fire everything due within `ms`, returning the tasks in due order
    pub fn advance(&mut self, ms: u64) -> Vec<Task> {
        let deadline = self.now_ms.saturating_add(ms);
        let fired: Vec<Task> = std::iter::from_fn(|| self.pop_due(deadline)).collect();
        self.advance_to(deadline);
        fired
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.queue.clear();
        self.due_of.clear();
    }
}
