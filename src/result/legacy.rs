//! Update results for legacy replies
//!
//! Servers older than 2.5.5 answer each update with a `getLastError`
//! document: `n` counts matched or upserted documents, `updatedExisting`
//! tells which, and failures carry an error message and code. There is no
//! way to learn how many documents were actually modified.

use bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{IndexMap, OperationResult};
use crate::error::{Result, ResultError};
use crate::reply::helpers::{index_to_bson, is_truthy, read_count};
use crate::reply::{ReplyCollection, fields};

/// Field names holding the error message and code in legacy replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyErrorFields {
    /// Error message field
    #[serde(default = "default_error_field")]
    pub error_field: String,

    /// Error code field
    #[serde(default = "default_error_code_field")]
    pub error_code_field: String,
}

fn default_error_field() -> String {
    fields::ERROR.to_string()
}

fn default_error_code_field() -> String {
    fields::ERROR_CODE.to_string()
}

impl Default for LegacyErrorFields {
    fn default() -> Self {
        Self {
            error_field: default_error_field(),
            error_code_field: default_error_code_field(),
        }
    }
}

/// Update result built from legacy replies, one reply per update
#[derive(Debug, Clone, Default)]
pub struct LegacyWriteResult {
    base: OperationResult,
    indexes: Option<IndexMap>,
    error_fields: LegacyErrorFields,
}

impl LegacyWriteResult {
    /// Create a result over the legacy replies of one update operation
    pub fn new(replies: impl Into<ReplyCollection>) -> Self {
        Self {
            base: OperationResult::new(replies),
            indexes: None,
            error_fields: LegacyErrorFields::default(),
        }
    }

    /// Use different field names for the error message and code
    pub fn with_error_fields(mut self, error_fields: LegacyErrorFields) -> Self {
        self.error_fields = error_fields;
        self
    }

    /// Attach the index map and return the result
    pub fn with_indexes(mut self, indexes: impl Into<IndexMap>) -> Self {
        self.indexes = Some(indexes.into());
        self
    }

    /// Attach the index map used to remap write error indexes
    ///
    /// Must happen before [`LegacyWriteResult::aggregate_write_errors`] is called.
    pub fn set_indexes(&mut self, indexes: impl Into<IndexMap>) -> &mut Self {
        self.indexes = Some(indexes.into());
        self
    }

    /// Attached index map
    pub fn indexes(&self) -> Option<&IndexMap> {
        self.indexes.as_ref()
    }

    /// Base result
    pub fn operation(&self) -> &OperationResult {
        &self.base
    }

    /// Whether the server acknowledged the operation
    pub fn acknowledged(&self) -> bool {
        self.base.acknowledged()
    }

    /// Sum of `n` over replies that updated existing documents
    pub fn matched_count(&self) -> u64 {
        self.base.fold_acknowledged(0, |n, _, doc| {
            if is_upsert(doc) {
                n
            } else {
                n.saturating_add(read_count(doc, fields::N))
            }
        })
    }

    /// Sum of `n` over replies that upserted
    pub fn upserted_count(&self) -> u64 {
        self.base.fold_acknowledged(0, |n, _, doc| {
            if is_upsert(doc) {
                n.saturating_add(read_count(doc, fields::N))
            } else {
                n
            }
        })
    }

    /// Always `None`: legacy replies cannot report modified documents
    pub fn modified_count(&self) -> Option<u64> {
        None
    }

    /// Synthesize write error entries from failed replies
    ///
    /// A reply counts as failed only when it carries both an error message
    /// and an error code. Each entry is `{ errmsg, index, code }` where
    /// `index` maps the reply's position through the index map.
    ///
    /// # Returns
    /// * `Result<Vec<Document>>` - Synthesized entries, or `IndexesNotSet` when
    ///   no index map was attached
    pub fn aggregate_write_errors(&self) -> Result<Vec<Document>> {
        if !self.acknowledged() {
            return Ok(Vec::new());
        }
        let indexes = self.indexes.as_ref().ok_or(ResultError::IndexesNotSet)?;
        let LegacyErrorFields {
            error_field,
            error_code_field,
        } = &self.error_fields;

        let errors = self.base.fold_acknowledged(
            Ok(Vec::new()),
            |acc: Result<Vec<Document>>, position, doc| {
                let mut errors = acc?;
                if !(is_truthy(doc, error_field) && is_truthy(doc, error_code_field)) {
                    return Ok(errors);
                }
                trace!("Legacy reply {} reports a write error", position);

                let mut entry = Document::new();
                entry.insert(fields::ERROR, field_or_null(doc, error_field));
                entry.insert(fields::INDEX, index_to_bson(indexes.original(position)?));
                entry.insert(fields::ERROR_CODE, field_or_null(doc, error_code_field));
                errors.push(entry);
                Ok(errors)
            },
        )?;

        debug!(
            "Synthesized {} write errors from {} legacy replies",
            errors.len(),
            self.base.replies().len()
        );
        Ok(errors)
    }
}

/// A reply without `updatedExisting`, or with it false, is an upsert
fn is_upsert(doc: &Document) -> bool {
    if !doc.contains_key(fields::UPDATED_EXISTING) {
        trace!("Legacy reply has no updatedExisting flag; treating it as an upsert");
    }
    !is_truthy(doc, fields::UPDATED_EXISTING)
}

fn field_or_null(doc: &Document, key: &str) -> Bson {
    doc.get(key).cloned().unwrap_or(Bson::Null)
}
