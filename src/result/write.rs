//! Update results for write-command replies
//!
//! Write commands report `n`, `nModified`, `upserted` and `writeErrors`
//! explicitly in each batch reply.

use bson::{Bson, Document};
use tracing::{debug, trace};

use super::{IndexMap, OperationResult};
use crate::error::{Result, ResultError};
use crate::reply::helpers::{index_to_bson, is_non_empty, read_count, read_index};
use crate::reply::{ReplyCollection, fields};

/// Update result built from write-command replies
#[derive(Debug, Clone, Default)]
pub struct WriteResult {
    base: OperationResult,
    indexes: Option<IndexMap>,
}

impl WriteResult {
    /// Create a result over the batch replies of one update operation
    pub fn new(replies: impl Into<ReplyCollection>) -> Self {
        Self {
            base: OperationResult::new(replies),
            indexes: None,
        }
    }

    /// Attach the index map and return the result
    pub fn with_indexes(mut self, indexes: impl Into<IndexMap>) -> Self {
        self.indexes = Some(indexes.into());
        self
    }

    /// Attach the index map used to remap write error indexes
    ///
    /// Must happen before [`WriteResult::aggregate_write_errors`] is called.
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

    /// Documents matched by non-upsert batches
    pub fn matched_count(&self) -> u64 {
        self.base.fold_acknowledged(0, |n, _, doc| {
            if is_upsert(doc) {
                n
            } else {
                n.saturating_add(read_count(doc, fields::N))
            }
        })
    }

    /// Documents modified; batches that omit `nModified` add 0
    pub fn modified_count(&self) -> u64 {
        self.base.fold_acknowledged(0, |n, _, doc| {
            n.saturating_add(read_count(doc, fields::MODIFIED))
        })
    }

    /// Number of batches that upserted
    pub fn upserted_count(&self) -> u64 {
        self.base.fold_acknowledged(0, |n, _, doc| {
            if is_upsert(doc) {
                n.saturating_add(1)
            } else {
                n
            }
        })
    }

    /// Collect write errors from every batch with indexes remapped
    ///
    /// Each entry is a copy of the server's entry whose `index` now refers to
    /// the original, unsplit operation. Entries keep reply order.
    ///
    /// # Returns
    /// * `Result<Vec<Document>>` - Remapped entries, or `IndexesNotSet` when no
    ///   index map was attached
    pub fn aggregate_write_errors(&self) -> Result<Vec<Document>> {
        if !self.acknowledged() {
            return Ok(Vec::new());
        }
        let indexes = self.indexes.as_ref().ok_or(ResultError::IndexesNotSet)?;

        let errors = self.base.fold_acknowledged(
            Ok(Vec::new()),
            |acc: Result<Vec<Document>>, position, doc| {
                let mut errors = acc?;
                let Ok(entries) = doc.get_array(fields::WRITE_ERRORS) else {
                    return Ok(errors);
                };
                trace!("Reply {} reports {} write errors", position, entries.len());

                for entry in entries {
                    errors.push(remap_entry(entry, indexes)?);
                }
                Ok(errors)
            },
        )?;

        debug!(
            "Aggregated {} write errors across {} replies",
            errors.len(),
            self.base.replies().len()
        );
        Ok(errors)
    }
}

fn is_upsert(doc: &Document) -> bool {
    is_non_empty(doc, fields::UPSERTED)
}

/// Copy a write error entry with its index rewritten through the index map
fn remap_entry(entry: &Bson, indexes: &IndexMap) -> Result<Document> {
    let Bson::Document(entry) = entry else {
        return Err(ResultError::MalformedWriteError(format!(
            "expected a document, found {:?}",
            entry.element_type()
        ))
        .into());
    };
    let local = read_index(entry).ok_or_else(|| {
        ResultError::MalformedWriteError(format!("missing integer index in {entry}"))
    })?;

    let mut remapped = entry.clone();
    remapped.insert(fields::INDEX, index_to_bson(indexes.original(local)?));
    Ok(remapped)
}
