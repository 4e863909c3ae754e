//! MongoDB reply interpretation
//!
//! This library turns the raw replies a MongoDB server returns for one
//! logical operation into the results a driver reports to its caller.
//!
//! # Modules
//!
//! - `reply`: Reply and reply collection types, field readers, fixture loading
//! - `result`: Write, legacy write, update and aggregate results
//! - `error`: Error types and write error details
//! - `config`: Configuration management
//! - `executor`: Command execution over loaded replies
//! - `formatter`: Output formatting and display
//! - `cli`: Command-line interface and argument parsing
//!
//! # Example
//!
//! ```
//! use bson::doc;
//! use mongo_reply::{Reply, ReplyCollection, WriteResult};
//!
//! let replies = ReplyCollection::new(vec![
//!     Reply::single(doc! { "ok": 1, "n": 2, "nModified": 1 }),
//!     Reply::single(doc! { "ok": 1, "n": 1, "upserted": [{ "index": 0, "_id": 7 }] }),
//! ]);
//! let result = WriteResult::new(replies).with_indexes(vec![0_usize, 1]);
//!
//! assert_eq!(result.matched_count(), 2);
//! assert_eq!(result.modified_count(), 1);
//! assert_eq!(result.upserted_count(), 1);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod formatter;
pub mod reply;
pub mod result;

// Re-export commonly used types
pub use config::Config;
pub use error::{ReplyError, Result};
pub use executor::{ExecutionResult, ReplyExecutor};
pub use formatter::Formatter;
pub use reply::{Reply, ReplyCollection};
pub use result::{
    AggregateResult, IndexMap, LegacyWriteResult, OperationResult, ServerCapability,
    UpdateResult, WriteResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
