//! Core types for slv-core.
//!
//! This module defines the row shape returned by event sources
//! ([`EventRow`]), the syslog [`Severity`] ladder, and the fixed facility
//! label table.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// One row of the system events table, as returned by an event source.
///
/// Rows are read-only snapshots; nothing downstream mutates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    /// Monotonically increasing row identifier.
    pub id: i64,
    /// Time the device reported the event (UTC).
    pub reported_at: DateTime<Utc>,
    /// Facility ordinal, 0–23 for known facilities.
    pub facility: i64,
    /// Severity ordinal, 0–7 for known severities.
    pub priority: i64,
    pub from_host: String,
    /// Raw syslog tag, usually `program[pid]:`.
    pub tag: String,
    /// Message body. May embed newlines and `#NNN` escape tokens.
    pub message: String,
}

/// Syslog severity, most severe first.
///
/// The discriminant is the wire ordinal, so `Severity::Error as i64 == 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

impl Severity {
    pub const ALL: [Severity; 8] = [
        Severity::Emergency,
        Severity::Alert,
        Severity::Critical,
        Severity::Error,
        Severity::Warning,
        Severity::Notice,
        Severity::Info,
        Severity::Debug,
    ];

    /// Look up a severity by its ordinal. Values outside 0–7 return `None`.
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn ordinal(self) -> i64 {
        self as i64
    }

    /// Full upper-case name used for prefix matching on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Severity::Emergency => "EMERGENCY",
            Severity::Alert => "ALERT",
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Notice => "NOTICE",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// Three-character display label.
    pub fn label(self) -> &'static str {
        &self.name()[..3]
    }

    /// Resolve a case-insensitive prefix of one of the eight names.
    ///
    /// `"w"` resolves to [`Severity::Warning`]; `"e"` is ambiguous between
    /// EMERGENCY and ERROR and fails.
    pub fn from_prefix(input: &str) -> Result<Self> {
        let wanted = input.trim().to_ascii_uppercase();
        let mut matches = Self::ALL
            .iter()
            .copied()
            .filter(|sev| !wanted.is_empty() && sev.name().starts_with(&wanted));

        match (matches.next(), matches.next()) {
            (Some(sev), None) => Ok(sev),
            (None, _) => Err(Error::InvalidSeverity {
                input: input.to_string(),
                reason: "matches no severity",
            }),
            (Some(_), Some(_)) => Err(Error::InvalidSeverity {
                input: input.to_string(),
                reason: "is ambiguous",
            }),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_prefix(s)
    }
}

/// Six-character facility labels keyed by facility ordinal.
static FACILITIES: phf::Map<u8, &'static str> = phf::phf_map! {
    0u8 => "KERN  ",
    1u8 => "USER  ",
    2u8 => "MAIL  ",
    3u8 => "DAEMON",
    4u8 => "AUTH  ",
    5u8 => "SYSLOG",
    6u8 => "LPR   ",
    7u8 => "NEWS  ",
    8u8 => "UUCP  ",
    9u8 => "CRON  ",
    10u8 => "SECURI",
    11u8 => "FTP   ",
    12u8 => "NTP   ",
    13u8 => "LOGAUD",
    14u8 => "LOGALE",
    15u8 => "CLOCK ",
    16u8 => "LOCAL0",
    17u8 => "LOCAL1",
    18u8 => "LOCAL2",
    19u8 => "LOCAL3",
    20u8 => "LOCAL4",
    21u8 => "LOCAL5",
    22u8 => "LOCAL6",
    23u8 => "LOCAL7",
};

/// Blank label printed for facilities outside the table.
pub const UNKNOWN_FACILITY: &str = "      ";

/// Fixed-width label for a facility ordinal, blank when unknown.
pub fn facility_label(facility: i64) -> &'static str {
    u8::try_from(facility)
        .ok()
        .and_then(|f| FACILITIES.get(&f).copied())
        .unwrap_or(UNKNOWN_FACILITY)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
