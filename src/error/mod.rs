//! Error handling for reply interpretation.
//!
//! This module provides:
//! - Application-specific error kinds for result, load and configuration failures
//! - Structured, serializable views of server-reported write errors
//!
//! Server-reported write errors are data, not failures: they are surfaced through
//! `aggregate_write_errors()` and only described here by [`write::ErrorInfo`].
//!
//! # Example
//!
//! ```rust,no_run
//! use bson::doc;
//! use mongo_reply::error::write::ErrorInfo;
//!
//! let entry = doc! { "index": 3, "code": 11000, "errmsg": "E11000 duplicate key error" };
//! let info = ErrorInfo::from_write_error(&entry);
//! println!("{}", info.to_json().unwrap());
//! ```

pub mod kinds;
pub mod write;

// Re-export commonly used types
pub use kinds::{ConfigError, LoadError, ReplyError, Result, ResultError};
pub use write::ErrorInfo;
