//! Update result variant selection
//!
//! The reply shape depends on whether the server speaks write commands.
//! The variant is decided once, when the result is built, and every
//! accessor dispatches through [`UpdateResult`] afterwards.

use bson::Document;
use tracing::debug;

use super::{IndexMap, LegacyErrorFields, LegacyWriteResult, OperationResult, WriteResult};
use crate::error::Result;
use crate::reply::ReplyCollection;

/// Lowest wire protocol version with write commands
const WRITE_COMMANDS_WIRE_VERSION: i32 = 2;

/// Lowest server release with write commands
const WRITE_COMMANDS_SERVER_VERSION: (u32, u32, u32) = (2, 5, 5);

/// Reply shape the server produces for updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerCapability {
    /// Write-command replies with `nModified`, `upserted` and `writeErrors`
    WriteCommands,

    /// One `getLastError` reply per update
    Legacy,
}

impl ServerCapability {
    /// Decide from the server's `maxWireVersion`
    pub fn from_max_wire_version(max_wire_version: i32) -> Self {
        if max_wire_version >= WRITE_COMMANDS_WIRE_VERSION {
            ServerCapability::WriteCommands
        } else {
            ServerCapability::Legacy
        }
    }

    /// Decide from a server version string
    ///
    /// # Arguments
    /// * `version_str` - Server version string (e.g., "2.4.9", "2.6.0", "5.0.0-rc1")
    ///
    /// # Returns
    /// * `Self` - `WriteCommands` for 2.5.5 and later; `Legacy` for older or
    ///   unparsable versions
    pub fn from_server_version(version_str: Option<&str>) -> Self {
        if supports_write_commands(version_str) {
            ServerCapability::WriteCommands
        } else {
            ServerCapability::Legacy
        }
    }
}

/// Check if a MongoDB server version speaks write commands
fn supports_write_commands(version_str: Option<&str>) -> bool {
    let version_str = match version_str {
        Some(v) => v,
        None => return false,
    };

    // Parse version string like "2.6.0" or "5.0.0-rc1"
    let parts: Vec<&str> = version_str.split('.').collect();
    if parts.len() < 2 {
        return false;
    }

    let number = |part: Option<&&str>| -> Option<u32> {
        match part {
            Some(p) => p.split('-').next().unwrap_or("").parse().ok(),
            None => Some(0),
        }
    };

    match (number(parts.first()), number(parts.get(1)), number(parts.get(2))) {
        (Some(major), Some(minor), Some(patch)) => {
            (major, minor, patch) >= WRITE_COMMANDS_SERVER_VERSION
        }
        _ => false,
    }
}

/// Update result for whichever reply shape the server produced
#[derive(Debug, Clone)]
pub enum UpdateResult {
    /// Write-command replies
    Modern(WriteResult),

    /// Legacy replies
    Legacy(LegacyWriteResult),
}

impl UpdateResult {
    /// Build the variant matching the server capability
    pub fn new(replies: impl Into<ReplyCollection>, capability: ServerCapability) -> Self {
        Self::with_error_fields(replies, capability, LegacyErrorFields::default())
    }

    /// Build the variant matching the server capability, with custom
    /// legacy error field names
    pub fn with_error_fields(
        replies: impl Into<ReplyCollection>,
        capability: ServerCapability,
        error_fields: LegacyErrorFields,
    ) -> Self {
        debug!("Building update result for {:?} replies", capability);
        match capability {
            ServerCapability::WriteCommands => UpdateResult::Modern(WriteResult::new(replies)),
            ServerCapability::Legacy => UpdateResult::Legacy(
                LegacyWriteResult::new(replies).with_error_fields(error_fields),
            ),
        }
    }

    /// Capability the variant was built for
    pub fn capability(&self) -> ServerCapability {
        match self {
            UpdateResult::Modern(_) => ServerCapability::WriteCommands,
            UpdateResult::Legacy(_) => ServerCapability::Legacy,
        }
    }

    /// Attach the index map and return the result
    pub fn with_indexes(mut self, indexes: impl Into<IndexMap>) -> Self {
        self.set_indexes(indexes);
        self
    }

    /// Attach the index map used to remap write error indexes
    pub fn set_indexes(&mut self, indexes: impl Into<IndexMap>) -> &mut Self {
        match self {
            UpdateResult::Modern(result) => {
                result.set_indexes(indexes);
            }
            UpdateResult::Legacy(result) => {
                result.set_indexes(indexes);
            }
        }
        self
    }

    /// Base result
    pub fn operation(&self) -> &OperationResult {
        match self {
            UpdateResult::Modern(result) => result.operation(),
            UpdateResult::Legacy(result) => result.operation(),
        }
    }

    /// Whether the server acknowledged the operation
    pub fn acknowledged(&self) -> bool {
        self.operation().acknowledged()
    }

    /// Documents matched
    pub fn matched_count(&self) -> u64 {
        match self {
            UpdateResult::Modern(result) => result.matched_count(),
            UpdateResult::Legacy(result) => result.matched_count(),
        }
    }

    /// Documents modified; `None` when the server cannot report it
    pub fn modified_count(&self) -> Option<u64> {
        match self {
            UpdateResult::Modern(result) => Some(result.modified_count()),
            UpdateResult::Legacy(result) => result.modified_count(),
        }
    }

    /// Documents upserted
    pub fn upserted_count(&self) -> u64 {
        match self {
            UpdateResult::Modern(result) => result.upserted_count(),
            UpdateResult::Legacy(result) => result.upserted_count(),
        }
    }

    /// Write errors with indexes remapped to the original operation
    pub fn aggregate_write_errors(&self) -> Result<Vec<Document>> {
        match self {
            UpdateResult::Modern(result) => result.aggregate_write_errors(),
            UpdateResult::Legacy(result) => result.aggregate_write_errors(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_write_commands() {
        assert!(supports_write_commands(Some("2.5.5")));
        assert!(supports_write_commands(Some("2.6.0")));
        assert!(supports_write_commands(Some("3.0.15")));
        assert!(supports_write_commands(Some("7.0.0")));
        assert!(supports_write_commands(Some("2.6")));
        assert!(supports_write_commands(Some("5.0.0-rc1")));

        assert!(!supports_write_commands(Some("2.5.4")));
        assert!(!supports_write_commands(Some("2.4.14")));
        assert!(!supports_write_commands(Some("1.8.0")));

        assert!(!supports_write_commands(None));
        assert!(!supports_write_commands(Some("invalid")));
        assert!(!supports_write_commands(Some("")));
        assert!(!supports_write_commands(Some("x.y.z")));
    }

    #[test]
    fn test_capability_from_wire_version() {
        assert_eq!(
            ServerCapability::from_max_wire_version(0),
            ServerCapability::Legacy
        );
        assert_eq!(
            ServerCapability::from_max_wire_version(1),
            ServerCapability::Legacy
        );
        assert_eq!(
            ServerCapability::from_max_wire_version(2),
            ServerCapability::WriteCommands
        );
        assert_eq!(
            ServerCapability::from_max_wire_version(21),
            ServerCapability::WriteCommands
        );
    }

    #[test]
    fn test_capability_from_server_version() {
        assert_eq!(
            ServerCapability::from_server_version(Some("2.4.9")),
            ServerCapability::Legacy
        );
        assert_eq!(
            ServerCapability::from_server_version(Some("4.4.0")),
            ServerCapability::WriteCommands
        );
    }
}
