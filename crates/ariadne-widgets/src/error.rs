//! Runtime errors

use ariadne_a11y::A11yError;
use ariadne_dom::NodeId;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    A11y(#[from] A11yError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("event target {0} is not attached to the document")]
    Detached(NodeId),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
