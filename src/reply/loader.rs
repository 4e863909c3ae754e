//! Loading captured replies from extended JSON
//!
//! A fixture is a JSON array with one object per physical round trip:
//!
//! ```json
//! [
//!   { "acknowledged": true, "cursorId": 0, "documents": [ { "ok": 1, "n": 2 } ] }
//! ]
//! ```
//!
//! `acknowledged` defaults to true and `cursorId` to 0. Documents may use
//! canonical or relaxed extended JSON.

use std::path::Path;

use bson::{Bson, Document};
use serde::Deserialize;
use tracing::debug;

use super::{Reply, ReplyCollection};
use crate::error::{LoadError, Result};

/// Raw reply entry as captured in a fixture file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReply {
    #[serde(default = "default_acknowledged")]
    acknowledged: bool,

    #[serde(default)]
    cursor_id: i64,

    #[serde(default)]
    documents: Vec<serde_json::Value>,
}

fn default_acknowledged() -> bool {
    true
}

impl ReplyCollection {
    /// Parse a reply collection from a JSON fixture string
    ///
    /// # Arguments
    /// * `input` - JSON array of reply entries
    ///
    /// # Returns
    /// * `Result<ReplyCollection>` - Replies in fixture order or error
    pub fn from_json_str(input: &str) -> Result<Self> {
        let raw: Vec<RawReply> = serde_json::from_str(input)?;

        let replies = raw
            .into_iter()
            .enumerate()
            .map(|(position, raw)| raw.into_reply(position))
            .collect::<Result<Vec<_>>>()?;

        debug!("Loaded {} replies", replies.len());
        Ok(Self::new(replies))
    }

    /// Load a reply collection from a JSON fixture file
    ///
    /// # Arguments
    /// * `path` - Path to the fixture file
    ///
    /// # Returns
    /// * `Result<ReplyCollection>` - Replies in fixture order or error
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoadError::FileNotFound(path.display().to_string()).into());
        }

        debug!("Loading replies from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

impl RawReply {
    fn into_reply(self, position: usize) -> Result<Reply> {
        let documents = self
            .documents
            .into_iter()
            .map(|value| to_document(value, position))
            .collect::<Result<Vec<_>>>()?;

        Ok(Reply {
            documents,
            cursor_id: self.cursor_id,
            acknowledged: self.acknowledged,
        })
    }
}

fn to_document(value: serde_json::Value, position: usize) -> Result<Document> {
    let bson = Bson::try_from(value)
        .map_err(|e| LoadError::InvalidDocument(format!("reply {position}: {e}")))?;

    match bson {
        Bson::Document(doc) => Ok(doc),
        other => Err(LoadError::InvalidReply(format!(
            "reply {position}: expected a document, found {:?}",
            other.element_type()
        ))
        .into()),
    }
}
