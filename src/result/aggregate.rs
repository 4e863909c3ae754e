//! Aggregation results
//!
//! An aggregation reply carries its documents either inline, in a `result`
//! array, or in the `firstBatch` of a `cursor` sub-document. The wire-level
//! cursor id is always zero for aggregation replies, so the real id must be
//! read from the cursor sub-document.

use std::sync::OnceLock;

use bson::{Bson, Document};
use tracing::debug;

use super::OperationResult;
use crate::error::{ReplyError, Result, ResultError};
use crate::reply::helpers::read_i64;
use crate::reply::{ReplyCollection, fields};

/// Result of an aggregation pipeline
#[derive(Debug, Clone, Default)]
pub struct AggregateResult {
    base: OperationResult,

    /// Cursor sub-document, located on first use
    cursor_document: OnceLock<Option<Document>>,
}

impl AggregateResult {
    /// Create a result over the replies of one aggregation
    pub fn new(replies: impl Into<ReplyCollection>) -> Self {
        Self {
            base: OperationResult::new(replies),
            cursor_document: OnceLock::new(),
        }
    }

    /// Base result
    pub fn operation(&self) -> &OperationResult {
        &self.base
    }

    /// Whether the server acknowledged the operation
    pub fn acknowledged(&self) -> bool {
        self.base.acknowledged()
    }

    /// Whether the reply carries a cursor sub-document
    pub fn has_cursor(&self) -> bool {
        self.cursor_document().is_some()
    }

    /// Cursor id of the aggregation
    ///
    /// Read from the cursor sub-document when present, otherwise the
    /// wire-level cursor id.
    pub fn cursor_id(&self) -> Result<i64> {
        match self.cursor_document() {
            Some(cursor) => read_i64(cursor, fields::CURSOR_ID).ok_or_else(|| {
                ResultError::MalformedAggregateReply(format!(
                    "cursor document has no integer '{}'",
                    fields::CURSOR_ID
                ))
                .into()
            }),
            None => Ok(self.base.cursor_id()),
        }
    }

    /// Documents of the aggregation's first batch
    ///
    /// The inline `result` array wins when present and non-null; otherwise
    /// the cursor's `firstBatch` is used.
    ///
    /// # Returns
    /// * `Result<Vec<Document>>` - Documents, or `MalformedAggregateReply` when
    ///   neither shape is present
    pub fn documents(&self) -> Result<Vec<Document>> {
        let first = self.base.first_document().ok_or_else(|| {
            ResultError::MalformedAggregateReply("reply carries no documents".to_string())
        })?;

        match first.get(fields::RESULT) {
            Some(Bson::Null) | None => {}
            Some(result) => return to_documents(result, fields::RESULT),
        }

        let batch = self
            .cursor_document()
            .and_then(|cursor| cursor.get(fields::FIRST_BATCH))
            .ok_or_else(|| {
                ResultError::MalformedAggregateReply(format!(
                    "neither '{}' nor '{}.{}' present",
                    fields::RESULT,
                    fields::CURSOR,
                    fields::FIRST_BATCH
                ))
            })?;
        to_documents(batch, fields::FIRST_BATCH)
    }

    fn cursor_document(&self) -> Option<&Document> {
        self.cursor_document
            .get_or_init(|| {
                let cursor = self
                    .base
                    .first_document()
                    .and_then(|doc| doc.get_document(fields::CURSOR).ok())
                    .cloned();
                debug!("Located cursor document: {}", cursor.is_some());
                cursor
            })
            .as_ref()
    }
}

fn to_documents(value: &Bson, field: &str) -> Result<Vec<Document>> {
    let Bson::Array(items) = value else {
        return Err(ResultError::MalformedAggregateReply(format!(
            "'{field}' is not an array"
        ))
        .into());
    };

    items
        .iter()
        .map(|item| match item {
            Bson::Document(doc) => Ok(doc.clone()),
            other => Err(ReplyError::from(ResultError::MalformedAggregateReply(
                format!("'{field}' holds a non-document {:?}", other.element_type()),
            ))),
        })
        .collect()
}
