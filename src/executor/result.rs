//! Execution result types
//!
//! This module defines the data structures for representing command execution results:
//! - ExecutionResult: Overall result of a command execution
//! - ResultData: Interpreted reply data
//! - ExecutionStats: Statistics about the execution

use bson::Document;

use crate::result::ServerCapability;

/// Result of command execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Success status
    pub success: bool,

    /// Result data (counts, documents, etc.)
    pub data: ResultData,

    /// Execution statistics
    pub stats: ExecutionStats,

    /// Error message if failed
    pub error: Option<String>,
}

/// Data returned from command execution
#[derive(Debug, Clone, PartialEq)]
pub enum ResultData {
    /// Update result
    Update {
        capability: ServerCapability,
        acknowledged: bool,
        matched: u64,
        modified: Option<u64>,
        upserted: u64,
        write_errors: Vec<Document>,
    },

    /// Aggregation first batch
    Aggregate {
        cursor_id: i64,
        documents: Vec<Document>,
    },

    /// No data
    None,
}

/// Execution statistics
#[derive(Debug, Clone, Default)]
pub struct ExecutionStats {
    /// Execution time in milliseconds
    pub execution_time_ms: u64,

    /// Number of replies interpreted
    pub replies: usize,

    /// Number of documents returned
    pub documents_returned: usize,
}

impl ExecutionResult {
    /// Create a successful result
    pub fn success(data: ResultData, stats: ExecutionStats) -> Self {
        Self {
            success: true,
            data,
            stats,
            error: None,
        }
    }

    /// Create a failed result
    pub fn error(error: String) -> Self {
        Self {
            success: false,
            data: ResultData::None,
            stats: ExecutionStats::default(),
            error: Some(error),
        }
    }
}
