use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the engine and the job layer.
#[derive(Debug, Error)]
pub enum Error {
    /// A job is already bound to the controller's active slot.
    #[error("a job is already running")]
    AlreadyRunning,

    /// The source path failed the probe (missing, unreadable or empty).
    #[error("invalid source: {reason}")]
    InvalidInput { reason: String },

    /// The hashing engine failed for a reason other than cancellation.
    #[error("hashing failed: {reason}")]
    Engine { reason: String },

    /// Writing the output artifact failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Bencoding the metainfo failed.
    #[error("bencode error: {0}")]
    Bencode(#[from] serde_bencode::Error),

    /// The profile config file could not be read or parsed.
    #[error("config error: {reason}")]
    Config { reason: String },
}

impl Error {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn engine(reason: impl Into<String>) -> Self {
        Self::Engine {
            reason: reason.into(),
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
