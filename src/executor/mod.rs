//! Command execution engine for mongo-reply
//!
//! This module interprets loaded replies for a command:
//! - Update commands build an [`UpdateResult`] for the configured server capability
//! - Aggregate commands build an [`AggregateResult`]
//! - Every run produces an [`ExecutionResult`] ready for formatting

mod result;

pub use result::{ExecutionResult, ExecutionStats, ResultData};

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ReplyError, Result};
use crate::reply::helpers::read_index;
use crate::reply::{ReplyCollection, fields};
use crate::result::{AggregateResult, IndexMap, ServerCapability, UpdateResult};

/// Command to run against a collection of replies
#[derive(Debug, Clone)]
pub enum Command {
    /// Interpret update replies
    Update {
        replies: ReplyCollection,
        indexes: Option<IndexMap>,
        capability: ServerCapability,
    },

    /// Interpret aggregation replies
    Aggregate { replies: ReplyCollection },
}

/// Executor turning commands into execution results
pub struct ReplyExecutor {
    /// Effective configuration
    config: Config,
}

impl ReplyExecutor {
    /// Create a new executor
    ///
    /// # Arguments
    /// * `config` - Effective configuration
    ///
    /// # Returns
    /// * `Self` - New executor
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Execute a command
    ///
    /// Server-reported failures (`ok` not 1) become failed results rather
    /// than errors; malformed replies and contract violations are errors.
    ///
    /// # Arguments
    /// * `command` - Command to execute
    ///
    /// # Returns
    /// * `Result<ExecutionResult>` - Execution result or error
    pub fn execute(&self, command: Command) -> Result<ExecutionResult> {
        debug!("Executing command: {:?}", command);
        let start = Instant::now();

        let result = match command {
            Command::Update {
                replies,
                indexes,
                capability,
            } => self.execute_update(replies, indexes, capability),
            Command::Aggregate { replies } => self.execute_aggregate(replies),
        };

        result.map(|mut result| {
            result.stats.execution_time_ms = start.elapsed().as_millis() as u64;
            result
        })
    }

    fn execute_update(
        &self,
        replies: ReplyCollection,
        indexes: Option<IndexMap>,
        capability: ServerCapability,
    ) -> Result<ExecutionResult> {
        let reply_count = replies.len();
        let indexes = indexes.unwrap_or_else(|| {
            let len = identity_len(&replies);
            debug!("No indexes given, using identity map of {} items", len);
            IndexMap::identity(len)
        });

        let result =
            UpdateResult::with_error_fields(replies, capability, self.config.legacy.clone())
                .with_indexes(indexes);

        if let Err(ReplyError::Result(failure)) = result.operation().validate() {
            warn!("Server reported failure: {}", failure);
            return Ok(ExecutionResult::error(failure.to_string()));
        }

        let write_errors = result.aggregate_write_errors()?;
        info!(
            "Update result: matched={}, modified={:?}, upserted={}, write_errors={}",
            result.matched_count(),
            result.modified_count(),
            result.upserted_count(),
            write_errors.len()
        );

        Ok(ExecutionResult::success(
            ResultData::Update {
                capability,
                acknowledged: result.acknowledged(),
                matched: result.matched_count(),
                modified: result.modified_count(),
                upserted: result.upserted_count(),
                write_errors,
            },
            ExecutionStats {
                execution_time_ms: 0,
                replies: reply_count,
                documents_returned: 0,
            },
        ))
    }

    fn execute_aggregate(&self, replies: ReplyCollection) -> Result<ExecutionResult> {
        let reply_count = replies.len();
        let result = AggregateResult::new(replies);

        if let Err(ReplyError::Result(failure)) = result.operation().validate() {
            warn!("Server reported failure: {}", failure);
            return Ok(ExecutionResult::error(failure.to_string()));
        }

        let documents = result.documents()?;
        let cursor_id = result.cursor_id()?;
        info!(
            "Aggregate result: cursor_id={}, documents={}",
            cursor_id,
            documents.len()
        );

        let documents_returned = documents.len();
        Ok(ExecutionResult::success(
            ResultData::Aggregate {
                cursor_id,
                documents,
            },
            ExecutionStats {
                execution_time_ms: 0,
                replies: reply_count,
                documents_returned,
            },
        ))
    }
}

/// Size of an identity index map covering every batch-local index seen
///
/// Legacy replies are indexed by position; write-command replies by the
/// `index` of their write errors.
fn identity_len(replies: &ReplyCollection) -> usize {
    replies
        .iter()
        .filter_map(|reply| reply.first_document())
        .filter_map(|doc| doc.get_array(fields::WRITE_ERRORS).ok())
        .flatten()
        .filter_map(|entry| entry.as_document().and_then(read_index))
        .map(|index| index + 1)
        .fold(replies.len(), usize::max)
}
