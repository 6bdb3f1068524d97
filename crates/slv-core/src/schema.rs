//! Logical-to-physical name mapping for the system events table.
//!
//! Defaults match the rsyslog MySQL sink. Any subset of names can be
//! overridden from a profile's `schema` table.

use serde::Deserialize;

/// Physical table and column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaMap {
    pub table: String,
    pub id: String,
    pub timestamp: String,
    pub facility: String,
    pub priority: String,
    pub host: String,
    pub tag: String,
    pub message: String,
}

impl Default for SchemaMap {
    fn default() -> Self {
        Self {
            table: "SystemEvents".to_string(),
            id: "id".to_string(),
            timestamp: "DeviceReportedTime".to_string(),
            facility: "facility".to_string(),
            priority: "priority".to_string(),
            host: "fromhost".to_string(),
            tag: "syslogtag".to_string(),
            message: "message".to_string(),
        }
    }
}

impl SchemaMap {
    /// Apply overrides on top of `self`; unset override fields keep the
    /// current name.
    pub fn with_overrides(mut self, overrides: &SchemaOverrides) -> Self {
        let SchemaOverrides {
            table,
            id,
            timestamp,
            facility,
            priority,
            host,
            tag,
            message,
        } = overrides;

        for (slot, value) in [
            (&mut self.table, table),
            (&mut self.id, id),
            (&mut self.timestamp, timestamp),
            (&mut self.facility, facility),
            (&mut self.priority, priority),
            (&mut self.host, host),
            (&mut self.tag, tag),
            (&mut self.message, message),
        ] {
            if let Some(name) = value {
                *slot = name.clone();
            }
        }
        self
    }

    /// Select list in the order event sources decode it.
    pub fn columns(&self) -> [&str; 7] {
        [
            &self.id,
            &self.timestamp,
            &self.facility,
            &self.priority,
            &self.host,
            &self.tag,
            &self.message,
        ]
    }
}

/// `[<profile>.schema]` table of a profile document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SchemaOverrides {
    pub table: Option<String>,
    pub id: Option<String>,
    pub timestamp: Option<String>,
    pub facility: Option<String>,
    pub priority: Option<String>,
    pub host: Option<String>,
    pub tag: Option<String>,
    pub message: Option<String>,
}
