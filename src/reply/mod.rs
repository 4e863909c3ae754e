//! Server replies for one logical operation
//!
//! This module defines the input side of result interpretation:
//! - Reply: one decoded server response for one physical round trip
//! - ReplyCollection: every reply belonging to one logical operation, in submission order
//! - Wire-protocol field names shared by all result variants
//! - Loading captured replies from extended JSON fixtures

pub mod helpers;
mod loader;

use bson::Document;

/// Wire-protocol field names read from server replies.
pub mod fields {
    /// Number of documents matched (or, on legacy servers, upserted).
    pub const N: &str = "n";

    /// Number of documents modified.
    pub const MODIFIED: &str = "nModified";

    /// Upserted ids reported by write commands.
    pub const UPSERTED: &str = "upserted";

    /// Legacy flag telling whether an update hit an existing document.
    pub const UPDATED_EXISTING: &str = "updatedExisting";

    /// Per-item write errors reported by write commands.
    pub const WRITE_ERRORS: &str = "writeErrors";

    /// Position of the failed item inside its batch.
    pub const INDEX: &str = "index";

    /// Cursor sub-document of an aggregation reply.
    pub const CURSOR: &str = "cursor";

    /// Cursor id inside the cursor sub-document.
    pub const CURSOR_ID: &str = "id";

    /// First batch of documents inside the cursor sub-document.
    pub const FIRST_BATCH: &str = "firstBatch";

    /// Inline result array of a cursorless aggregation reply.
    pub const RESULT: &str = "result";

    /// Command status.
    pub const OK: &str = "ok";

    /// Error message.
    pub const ERROR: &str = "errmsg";

    /// Error code.
    pub const ERROR_CODE: &str = "code";

    /// Additional error details attached to a write error.
    pub const ERROR_INFO: &str = "errInfo";
}

/// One decoded server response for one physical round trip
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Decoded documents, normally exactly one
    pub documents: Vec<Document>,

    /// Cursor id from the wire envelope
    pub cursor_id: i64,

    /// Whether the server was asked to confirm the operation
    pub acknowledged: bool,
}

impl Reply {
    /// Create an acknowledged reply with a zero wire cursor id
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            cursor_id: 0,
            acknowledged: true,
        }
    }

    /// Create an acknowledged reply carrying a single document
    pub fn single(document: Document) -> Self {
        Self::new(vec![document])
    }

    /// Create a reply for an operation sent without write concern
    pub fn unacknowledged() -> Self {
        Self {
            documents: Vec::new(),
            cursor_id: 0,
            acknowledged: false,
        }
    }

    /// Set the wire envelope cursor id
    pub fn with_cursor_id(mut self, cursor_id: i64) -> Self {
        self.cursor_id = cursor_id;
        self
    }

    /// First decoded document, if any
    pub fn first_document(&self) -> Option<&Document> {
        self.documents.first()
    }
}

/// Every reply of one logical operation, in submission order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplyCollection {
    replies: Vec<Reply>,
}

impl ReplyCollection {
    /// Create a collection from replies in submission order
    pub fn new(replies: Vec<Reply>) -> Self {
        Self { replies }
    }

    /// Whether the operation was acknowledged
    ///
    /// A logical operation shares one write concern, so any unacknowledged
    /// reply marks the whole collection unacknowledged. An empty collection
    /// is unacknowledged as well.
    pub fn acknowledged(&self) -> bool {
        !self.replies.is_empty() && self.replies.iter().all(|reply| reply.acknowledged)
    }

    /// Iterate replies in submission order
    pub fn iter(&self) -> std::slice::Iter<'_, Reply> {
        self.replies.iter()
    }

    /// First reply
    pub fn first(&self) -> Option<&Reply> {
        self.replies.first()
    }

    /// Last reply
    pub fn last(&self) -> Option<&Reply> {
        self.replies.last()
    }

    /// Number of replies
    pub fn len(&self) -> usize {
        self.replies.len()
    }

    /// Check whether there are no replies
    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }
}

impl From<Vec<Reply>> for ReplyCollection {
    fn from(replies: Vec<Reply>) -> Self {
        Self::new(replies)
    }
}

impl From<Reply> for ReplyCollection {
    fn from(reply: Reply) -> Self {
        Self::new(vec![reply])
    }
}

impl<'a> IntoIterator for &'a ReplyCollection {
    type Item = &'a Reply;
    type IntoIter = std::slice::Iter<'a, Reply>;

    fn into_iter(self) -> Self::IntoIter {
        self.replies.iter()
    }
}

impl FromIterator<Reply> for ReplyCollection {
    fn from_iter<I: IntoIterator<Item = Reply>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
