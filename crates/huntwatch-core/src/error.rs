use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Failed to open process: {0}")]
    ProcessOpenFailed(String),

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Pointer chain unresolved: {0}")]
    ChainUnresolved(String),

    #[error("Invalid offset table: {0}")]
    InvalidOffsetTable(String),

    #[error("Offset version mismatch: expected {expected}, got {actual}")]
    OffsetVersionMismatch { expected: String, actual: String },

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Errors that mean "no usable data this cycle" rather than a fault.
    pub fn is_absent(&self) -> bool {
        matches!(
            self,
            Error::ChainUnresolved(_) | Error::MemoryReadFailed { .. }
        )
    }

    pub(crate) fn read_failed(address: u64, message: impl Into<String>) -> Self {
        Error::MemoryReadFailed {
            address,
            message: message.into(),
        }
    }
}
