use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Step/duration parameters missing, non-positive, or out of range.
    /// Raised before any computation begins; recoverable by correcting the
    /// parameters. Never retried automatically.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
    /// Compressor failure, propagated unmodified.
    #[error("compression failed")]
    Compression(#[from] io::Error),
}

impl Error {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}
