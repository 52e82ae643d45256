//! Keyboard events
//!
//! Key values are normalised once when the event is built, so widgets match on
//! [`Key`] variants instead of comparing `KeyboardEvent.key` strings (including
//! the legacy `"Down"` / `"Esc"` spellings older browsers emit).

/// Normalised key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Escape,
    Enter,
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    /// Any other printable character
    Character(char),
    /// Anything else, kept verbatim
    Other(String),
}

impl Key {
    /// Parse a DOM `key` value
    pub fn parse(value: &str) -> Self {
        match value {
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            " " | "Spacebar" | "Space" => Self::Space,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Other(other.to_string()),
                }
            }
        }
    }

    /// Enter or Space, the two activation keys
    pub fn is_activation(&self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }

    pub fn label(&self) -> String {
        match self {
            Self::Tab => "Tab".into(),
            Self::Escape => "Escape".into(),
            Self::Enter => "Enter".into(),
            Self::Space => "Space".into(),
            Self::ArrowUp => "ArrowUp".into(),
            Self::ArrowDown => "ArrowDown".into(),
            Self::ArrowLeft => "ArrowLeft".into(),
            Self::ArrowRight => "ArrowRight".into(),
            Self::Home => "Home".into(),
            Self::End => "End".into(),
            Self::Character(c) => c.to_string(),
            Self::Other(s) => s.clone(),
        }
    }
}

/// Key press with modifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self { key, ctrl: false, alt: false, shift: false, meta: false }
    }

    pub fn ctrl(mut self) -> Self { self.ctrl = true; self }
    pub fn alt(mut self) -> Self { self.alt = true; self }
    pub fn shift(mut self) -> Self { self.shift = true; self }
    pub fn meta(mut self) -> Self { self.meta = true; self }

    /// Parse a chord such as `"Shift+Tab"` or `"ArrowDown"`
    pub fn parse(chord: &str) -> Self {
        let (modifiers, key) = match chord.rsplit_once('+') {
            // "+" alone, or a chord ending in "++"
            Some((mods, "")) => (mods.strip_suffix('+').unwrap_or(mods), "+"),
            Some((mods, key)) => (mods, key),
            None => ("", chord),
        };
        let mut event = Self::new(Key::parse(key));
        for modifier in modifiers.split('+').filter(|m| !m.is_empty()) {
            match modifier {
                "Ctrl" | "Control" => event.ctrl = true,
                "Alt" => event.alt = true,
                "Shift" => event.shift = true,
                "Meta" | "Cmd" => event.meta = true,
                _ => {}
            }
        }
        event
    }

    /// No modifier held
    pub fn is_plain(&self) -> bool {
        !(self.ctrl || self.alt || self.shift || self.meta)
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl { parts.push("Ctrl".to_string()); }
        if self.alt { parts.push("Alt".to_string()); }
        if self.shift { parts.push("Shift".to_string()); }
        if self.meta { parts.push("Cmd".to_string()); }
        parts.push(self.key.label());
        parts.join("+")
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}
