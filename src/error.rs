//! Errors raised at the storage and platform boundaries
//!
//! The simulation itself never fails; only code that touches the outside
//! world returns these, and the driver logs them and keeps ticking.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend missing (no window, storage disabled by the browser, ...)
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Backend present but refused the write (quota, private mode)
    #[error("storage rejected write for key '{key}'")]
    Rejected { key: String },
}
