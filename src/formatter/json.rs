//! JSON formatting for interpreted replies
//!
//! Documents are rendered as relaxed extended JSON, so Int64 values stay
//! plain numbers and ObjectIds become `{"$oid": ...}`.

use bson::{Bson, Document};
use serde_json::{Value, json};

use crate::error::Result;
use crate::error::write::ErrorInfo;
use crate::executor::ResultData;

/// JSON formatter with pretty printing support
pub struct JsonFormatter {
    /// Enable pretty printing
    pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    ///
    /// # Arguments
    /// * `pretty` - Enable pretty printing
    ///
    /// # Returns
    /// * `Self` - New formatter
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Format result data as JSON
    ///
    /// # Arguments
    /// * `data` - Result data to format
    ///
    /// # Returns
    /// * `Result<String>` - JSON string or error
    pub fn format(&self, data: &ResultData) -> Result<String> {
        let value = self.to_value(data);
        let output = if self.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(output)
    }

    /// Convert result data to a JSON value
    pub fn to_value(&self, data: &ResultData) -> Value {
        match data {
            ResultData::Update {
                capability,
                acknowledged,
                matched,
                modified,
                upserted,
                write_errors,
            } => json!({
                "capability": format!("{capability:?}"),
                "acknowledged": acknowledged,
                "matchedCount": matched,
                "modifiedCount": modified,
                "upsertedCount": upserted,
                "writeErrors": write_errors
                    .iter()
                    .map(|entry| ErrorInfo::from_write_error(entry).to_json_value())
                    .collect::<Vec<_>>(),
            }),
            ResultData::Aggregate {
                cursor_id,
                documents,
            } => json!({
                "cursorId": cursor_id,
                "documents": documents.iter().map(document_to_json).collect::<Vec<_>>(),
            }),
            ResultData::None => Value::Null,
        }
    }
}

/// Convert a BSON document to relaxed extended JSON
pub fn document_to_json(doc: &Document) -> Value {
    Bson::Document(doc.clone()).into_relaxed_extjson()
}
