/// Error type shared by the core library
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// `pop` was called with only the base matrix left.
    #[error("matrix stack underflow: cannot pop the base matrix")]
    StackUnderflow,

    #[error("keyframe sampler needs at least one keyframe")]
    EmptyKeyframes,

    /// Keyframe times must not decrease.
    #[error("keyframe {index} is earlier than the keyframe before it")]
    UnorderedKeyframes { index: usize },

    #[error("point light index {index} out of range (have {count})")]
    LightIndex { index: usize, count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(String),

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(String),
}

pub type Result<T> = std::result::Result<T, Error>;
