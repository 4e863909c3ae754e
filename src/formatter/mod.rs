//! Output formatting for mongo-reply
//!
//! This module renders execution results:
//! - JSON formatting (compact and pretty-printed)
//! - Table formatting for counts, write errors and documents
//! - Execution statistics

pub mod json;
pub mod stats;
pub mod table;

pub use json::JsonFormatter;
pub use stats::StatsFormatter;
pub use table::{TableFormatter, TableStyle};

use crate::config::OutputFormat;
use crate::error::Result;
use crate::executor::ExecutionResult;

/// Main formatter for execution results
pub struct Formatter {
    /// Output format type
    format_type: OutputFormat,

    /// Append execution statistics
    show_stats: bool,
}

impl Formatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `format_type` - Output format type
    ///
    /// # Returns
    /// * `Self` - New formatter instance
    pub fn new(format_type: OutputFormat) -> Self {
        Self {
            format_type,
            show_stats: !format_type.is_json(),
        }
    }

    /// Enable or disable trailing statistics
    pub fn with_stats(mut self, show_stats: bool) -> Self {
        self.show_stats = show_stats;
        self
    }

    /// Format execution result according to configured format
    ///
    /// # Arguments
    /// * `result` - Execution result to format
    ///
    /// # Returns
    /// * `Result<String>` - Formatted output or error
    pub fn format(&self, result: &ExecutionResult) -> Result<String> {
        if !result.success {
            return Ok(self.format_error(result));
        }

        let output = match self.format_type {
            OutputFormat::Json => JsonFormatter::new(false).format(&result.data)?,
            OutputFormat::JsonPretty => JsonFormatter::new(true).format(&result.data)?,
            OutputFormat::Table => TableFormatter::new().format(&result.data)?,
        };

        let stats = if self.show_stats {
            StatsFormatter::new(true, true).format(result)
        } else {
            String::new()
        };

        if stats.is_empty() {
            Ok(output)
        } else {
            Ok(format!("{}\n{}", output, stats))
        }
    }

    /// Format error result
    fn format_error(&self, result: &ExecutionResult) -> String {
        let error_msg = result.error.as_deref().unwrap_or("Unknown error");
        format!("Error: {}", error_msg)
    }
}
