use std::{fmt, io};

/// Crate-wide `Result` type using [`ReplyError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, ReplyError>;

/// Top-level error type for reply interpretation.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum ReplyError {
    /// Result accessor errors.
    Result(ResultError),

    /// Reply fixture loading errors.
    Load(LoadError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// JSON encoding or decoding errors.
    Json(serde_json::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Errors raised by result accessors.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultError {
    /// Write errors were aggregated before an index map was attached.
    IndexesNotSet,

    /// A batch-local index has no entry in the index map.
    IndexOutOfRange { index: usize, len: usize },

    /// A write error entry is not a document or lacks an integer index.
    MalformedWriteError(String),

    /// An aggregation reply carries neither an inline result nor a cursor batch.
    MalformedAggregateReply(String),

    /// The server reported the operation as failed.
    OperationFailure { message: String, code: Option<i32> },
}

/// Errors raised while loading captured replies.
#[derive(Debug)]
pub enum LoadError {
    /// Replies file not found.
    FileNotFound(String),

    /// A reply entry is not shaped as expected.
    InvalidReply(String),

    /// A document is not valid extended JSON.
    InvalidDocument(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ReplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyError::Result(e) => write!(f, "Result error: {e}"),
            ReplyError::Load(e) => write!(f, "Load error: {e}"),
            ReplyError::Config(e) => write!(f, "Configuration error: {e}"),
            ReplyError::Io(e) => write!(f, "I/O error: {e}"),
            ReplyError::Json(e) => write!(f, "JSON error: {e}"),
            ReplyError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ResultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultError::IndexesNotSet => {
                write!(f, "Indexes not set: attach an index map before aggregating write errors")
            }
            ResultError::IndexOutOfRange { index, len } => {
                write!(f, "Batch index {index} is outside the index map (length {len})")
            }
            ResultError::MalformedWriteError(msg) => write!(f, "Malformed write error: {msg}"),
            ResultError::MalformedAggregateReply(msg) => {
                write!(f, "Malformed aggregate reply: {msg}")
            }
            ResultError::OperationFailure { message, code } => match code {
                Some(code) => write!(f, "Operation failed ({code}): {message}"),
                None => write!(f, "Operation failed: {message}"),
            },
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::FileNotFound(path) => write!(f, "Replies file not found: {path}"),
            LoadError::InvalidReply(msg) => write!(f, "Invalid reply: {msg}"),
            LoadError::InvalidDocument(msg) => write!(f, "Invalid document: {msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for ReplyError {}
impl std::error::Error for ResultError {}
impl std::error::Error for LoadError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to ReplyError ========================= */

impl From<io::Error> for ReplyError {
    fn from(err: io::Error) -> Self {
        ReplyError::Io(err)
    }
}

impl From<serde_json::Error> for ReplyError {
    fn from(err: serde_json::Error) -> Self {
        ReplyError::Json(err)
    }
}

impl From<ResultError> for ReplyError {
    fn from(err: ResultError) -> Self {
        ReplyError::Result(err)
    }
}

impl From<LoadError> for ReplyError {
    fn from(err: LoadError) -> Self {
        ReplyError::Load(err)
    }
}

impl From<ConfigError> for ReplyError {
    fn from(err: ConfigError) -> Self {
        ReplyError::Config(err)
    }
}

impl From<String> for ReplyError {
    fn from(msg: String) -> Self {
        ReplyError::Generic(msg)
    }
}

impl From<&str> for ReplyError {
    fn from(msg: &str) -> Self {
        ReplyError::Generic(msg.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexes_not_set_message() {
        let err: ReplyError = ResultError::IndexesNotSet.into();
        assert!(err.to_string().contains("Indexes not set"));
    }

    #[test]
    fn test_operation_failure_message() {
        let err = ResultError::OperationFailure {
            message: "not master".to_string(),
            code: Some(10107),
        };
        assert_eq!(err.to_string(), "Operation failed (10107): not master");

        let err = ResultError::OperationFailure {
            message: "boom".to_string(),
            code: None,
        };
        assert_eq!(err.to_string(), "Operation failed: boom");
    }

    #[test]
    fn test_out_of_range_message() {
        let err = ResultError::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(
            err.to_string(),
            "Batch index 7 is outside the index map (length 3)"
        );
    }
}
