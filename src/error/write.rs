use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::reply::fields;
use crate::reply::helpers::{read_i32, read_index};

/// Structured information extracted from a server write error entry.
///
/// This is intended to be serialized to JSON and consumed by other
/// components (e.g. logging, formatters).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) details: Option<Document>,
}

impl ErrorInfo {
    /// Build error info from an aggregated write error document.
    ///
    /// Works on both write-command entries (`errInfo` carries details) and
    /// entries synthesized from legacy replies.
    pub fn from_write_error(entry: &Document) -> Self {
        let code = read_i32(entry, fields::ERROR_CODE);

        let mut info = ErrorInfo {
            index: read_index(entry),
            code,
            name: code.and_then(get_error_name),
            message: entry.get_str(fields::ERROR).ok().map(str::to_string),
            details: entry.get_document(fields::ERROR_INFO).ok().cloned(),
        };

        // Simplify message for known error types to avoid redundancy.
        if matches!(info.code, Some(11000 | 11001)) {
            info.message = Some("Duplicate key error".to_string());
        }

        info
    }

    /// Original-operation index of the failed item.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Server error code.
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// Human-readable error name for well-known codes.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Error message.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Convert error info to pretty-printed JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_json_value())
    }

    /// Convert error info to compact JSON string (single line).
    pub fn to_json_compact(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_json_value())
    }

    /// Convert to a JSON value, rendering details as relaxed extended JSON.
    pub fn to_json_value(&self) -> serde_json::Value {
        let mut value = serde_json::Map::new();
        if let Some(index) = self.index {
            value.insert("index".to_string(), index.into());
        }
        if let Some(code) = self.code {
            value.insert("code".to_string(), code.into());
        }
        if let Some(name) = &self.name {
            value.insert("name".to_string(), name.clone().into());
        }
        if let Some(message) = &self.message {
            value.insert("message".to_string(), message.clone().into());
        }
        if let Some(details) = &self.details {
            value.insert(
                "details".to_string(),
                Bson::Document(details.clone()).into_relaxed_extjson(),
            );
        }
        serde_json::Value::Object(value)
    }
}

/// Get a human-readable error name from a MongoDB error code.
pub fn get_error_name(code: i32) -> Option<String> {
    let name = match code {
        11000 | 11001 => "DuplicateKey",
        13 => "Unauthorized",
        14 => "TypeMismatch",
        26 => "NamespaceNotFound",
        50 => "MaxTimeMSExpired",
        52 => "DollarPrefixedFieldName",
        66 => "ImmutableField",
        121 => "DocumentValidationFailure",
        10107 => "NotWritablePrimary",
        _ => return None,
    };

    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_duplicate_key_entry() {
        let entry = doc! {
            "index": 4,
            "code": 11000,
            "errmsg": "E11000 duplicate key error collection: test.users index: _id_",
        };
        let info = ErrorInfo::from_write_error(&entry);

        assert_eq!(info.index(), Some(4));
        assert_eq!(info.code(), Some(11000));
        assert_eq!(info.name(), Some("DuplicateKey"));
        assert_eq!(info.message(), Some("Duplicate key error"));
        assert!(info.details.is_none());
    }

    #[test]
    fn test_validation_entry_keeps_details() {
        let entry = doc! {
            "index": 0,
            "code": 121,
            "errmsg": "Document failed validation",
            "errInfo": { "failingDocumentId": 1 },
        };
        let info = ErrorInfo::from_write_error(&entry);

        assert_eq!(info.name(), Some("DocumentValidationFailure"));
        assert_eq!(info.message(), Some("Document failed validation"));
        assert_eq!(info.details, Some(doc! { "failingDocumentId": 1 }));
    }

    #[test]
    fn test_json_skips_missing_fields() {
        let info = ErrorInfo::from_write_error(&doc! { "errmsg": "oops" });
        let json = info.to_json_compact().unwrap();
        assert_eq!(json, r#"{"message":"oops"}"#);
    }

    #[test]
    fn test_unknown_code_has_no_name() {
        assert_eq!(get_error_name(99999), None);
        assert_eq!(get_error_name(13), Some("Unauthorized".to_string()));
    }
}
