//! Typed results over server replies
//!
//! This module translates a [`ReplyCollection`] into semantic results:
//! - OperationResult: the base contract shared by all variants
//! - WriteResult / LegacyWriteResult: update counts and write errors for
//!   write-command and legacy reply shapes
//! - UpdateResult: the variant chosen once from server capability
//! - AggregateResult: first batch and cursor id of an aggregation reply
//!
//! Every accessor is a fold over the replies computed on demand. Results are
//! built once, optionally annotated with an [`IndexMap`], then only read.

pub mod aggregate;
pub mod legacy;
pub mod update;
pub mod write;

#[cfg(test)]
mod tests;

pub use aggregate::AggregateResult;
pub use legacy::{LegacyErrorFields, LegacyWriteResult};
pub use update::{ServerCapability, UpdateResult};
pub use write::WriteResult;

use bson::Document;

use crate::error::{Result, ResultError};
use crate::reply::helpers::{is_one, read_count, read_i32};
use crate::reply::{Reply, ReplyCollection, fields};

/// Maps batch-local item positions to positions in the original operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMap {
    indexes: Vec<usize>,
}

impl IndexMap {
    /// Create an index map; `indexes[local]` is the original position
    pub fn new(indexes: Vec<usize>) -> Self {
        Self { indexes }
    }

    /// Identity map for an unsplit operation of `len` items
    pub fn identity(len: usize) -> Self {
        Self::new((0..len).collect())
    }

    /// Original-operation position of a batch-local index
    ///
    /// # Returns
    /// * `Result<usize>` - Original position, or `IndexOutOfRange`
    pub fn original(&self, local: usize) -> Result<usize> {
        self.indexes.get(local).copied().ok_or_else(|| {
            ResultError::IndexOutOfRange {
                index: local,
                len: self.indexes.len(),
            }
            .into()
        })
    }

    /// Number of mapped items
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// Check whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}

impl From<Vec<usize>> for IndexMap {
    fn from(indexes: Vec<usize>) -> Self {
        Self::new(indexes)
    }
}

impl From<&[usize]> for IndexMap {
    fn from(indexes: &[usize]) -> Self {
        Self::new(indexes.to_vec())
    }
}

/// Base result over the replies of one logical operation
#[derive(Debug, Clone, Default)]
pub struct OperationResult {
    replies: ReplyCollection,
}

impl OperationResult {
    /// Create a result over the given replies
    pub fn new(replies: impl Into<ReplyCollection>) -> Self {
        Self {
            replies: replies.into(),
        }
    }

    /// Whether the server acknowledged the operation
    pub fn acknowledged(&self) -> bool {
        self.replies.acknowledged()
    }

    /// All replies, in submission order
    pub fn replies(&self) -> &ReplyCollection {
        &self.replies
    }

    /// First reply
    pub fn reply(&self) -> Option<&Reply> {
        self.replies.first()
    }

    /// First document of the first reply
    pub fn first_document(&self) -> Option<&Document> {
        self.reply().and_then(Reply::first_document)
    }

    /// Every document of every reply; empty when unacknowledged
    pub fn documents(&self) -> Vec<Document> {
        if !self.acknowledged() {
            return Vec::new();
        }
        self.replies
            .iter()
            .flat_map(|reply| reply.documents.iter().cloned())
            .collect()
    }

    /// Wire-level cursor id of the last reply; 0 when unacknowledged
    pub fn cursor_id(&self) -> i64 {
        if !self.acknowledged() {
            return 0;
        }
        self.replies.last().map_or(0, |reply| reply.cursor_id)
    }

    /// Total `n` reported across replies; 0 when unacknowledged
    pub fn written_count(&self) -> u64 {
        self.fold_acknowledged(0, |n, _, doc| {
            n.saturating_add(read_count(doc, fields::N))
        })
    }

    /// Whether the server reported success
    ///
    /// Unacknowledged operations are considered successful since nothing
    /// was reported back.
    pub fn successful(&self) -> bool {
        if !self.acknowledged() {
            return true;
        }
        self.first_document()
            .and_then(|doc| doc.get(fields::OK))
            .is_some_and(is_one)
    }

    /// Return the result when successful, otherwise the reported failure
    pub fn validate(&self) -> Result<&Self> {
        if self.successful() {
            return Ok(self);
        }

        let doc = self.first_document();
        let message = doc
            .and_then(|doc| doc.get_str(fields::ERROR).ok())
            .unwrap_or("unknown error")
            .to_string();
        let code = doc.and_then(|doc| read_i32(doc, fields::ERROR_CODE));

        Err(ResultError::OperationFailure { message, code }.into())
    }

    /// Left fold over the first document of every reply
    ///
    /// Returns `init` untouched when the operation was unacknowledged. Replies
    /// without documents are skipped. The closure receives the accumulator,
    /// the reply's position in the collection and its first document.
    pub(crate) fn fold_acknowledged<T, F>(&self, init: T, mut f: F) -> T
    where
        F: FnMut(T, usize, &Document) -> T,
    {
        if !self.acknowledged() {
            return init;
        }
        self.replies
            .iter()
            .enumerate()
            .filter_map(|(position, reply)| reply.first_document().map(|doc| (position, doc)))
            .fold(init, |acc, (position, doc)| f(acc, position, doc))
    }
}
