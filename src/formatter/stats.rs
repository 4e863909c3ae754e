//! Statistics formatting for command execution results
//!
//! This module provides formatting for execution statistics:
//! - Execution time display
//! - Reply and document counts

use crate::executor::ExecutionResult;

/// Statistics formatter for command execution
pub struct StatsFormatter {
    /// Show execution time
    show_time: bool,

    /// Show reply and document counts
    show_count: bool,
}

impl StatsFormatter {
    /// Create a new statistics formatter
    ///
    /// # Arguments
    /// * `show_time` - Show execution time
    /// * `show_count` - Show reply and document counts
    ///
    /// # Returns
    /// * `Self` - New formatter
    pub fn new(show_time: bool, show_count: bool) -> Self {
        Self {
            show_time,
            show_count,
        }
    }

    /// Format execution statistics
    ///
    /// # Arguments
    /// * `result` - Execution result
    ///
    /// # Returns
    /// * `String` - Formatted statistics
    pub fn format(&self, result: &ExecutionResult) -> String {
        let mut parts = Vec::new();

        if self.show_count {
            if result.stats.replies > 0 {
                parts.push(format!("Replies: {}", result.stats.replies));
            }
            if result.stats.documents_returned > 0 {
                parts.push(format!(
                    "Documents returned: {}",
                    result.stats.documents_returned
                ));
            }
        }

        if self.show_time && result.stats.execution_time_ms > 0 {
            parts.push(format!(
                "Execution time: {}ms",
                result.stats.execution_time_ms
            ));
        }

        parts.join(", ")
    }
}
