//! Error types for the binding engine.
//!
//! The engine deliberately favors silent no-ops over raised failures:
//! unresolvable paths yield [`Value::Undefined`], unconfigured elements are
//! skipped, unknown mediators fall back to identity. The one place a caller
//! can hand the engine something unparseable is a declarative `data-bind`
//! attribute, and that is the error surfaced here.
//!
//! [`Value::Undefined`]: horizon_formlink_core::Value::Undefined

/// Result type alias for binding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the binding engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A declarative binding attribute could not be parsed.
    #[error("invalid data-bind declaration '{binding}': {message}")]
    DataBind { binding: String, message: String },
}

impl Error {
    /// Create a data-bind parse error.
    pub fn data_bind(binding: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataBind {
            binding: binding.into(),
            message: message.into(),
        }
    }
}
