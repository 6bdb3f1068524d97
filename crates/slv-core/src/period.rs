//! Period resolution — turns `--period` expressions into a bounded query shape.
//!
//! A period is two comma-separated endpoints. Each endpoint is either a
//! signed integer count or a timestamp:
//!
//! | Left | Right | Meaning |
//! |------|-------|---------|
//! | timestamp `a` | timestamp `b` | every event with `a <= ts <= b`, oldest first |
//! | timestamp `t` | `N >= 0` | the `N` events at or after `t` |
//! | timestamp `t` | `-N` | the `N` events at or before `t`, fetched newest first |
//!
//! Anything else is rejected. Timestamps without an explicit offset are read
//! in the process's local offset and stored as UTC.
//!
//! The resolver never sees the schema: produced conditions and orderings
//! carry [`TIMESTAMP_PLACEHOLDER`] where the timestamp column belongs, and
//! the plan builder substitutes the real column name.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};
use regex::Regex;

use crate::error::{Error, Result};

/// Stand-in for the timestamp column inside [`PeriodPlan`] templates.
pub const TIMESTAMP_PLACEHOLDER: &str = "{timestamp}";

const SQL_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

static COUNT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+$").expect("count token pattern is valid"));

/// Formats tried, in order, for timestamps that carry an offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%d %H:%M %z",
];

/// Formats tried, in order, for timestamps read in the local offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Resolved period: a condition, an ordering and an optional limit, with
/// the timestamp column left as a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodPlan {
    pub condition: String,
    pub order: String,
    pub limit: Option<u64>,
    /// Rows come back newest first and must be reversed for display.
    pub reversed: bool,
}

impl PeriodPlan {
    pub fn condition_for(&self, timestamp_column: &str) -> String {
        self.condition.replace(TIMESTAMP_PLACEHOLDER, timestamp_column)
    }

    pub fn order_for(&self, timestamp_column: &str) -> String {
        self.order.replace(TIMESTAMP_PLACEHOLDER, timestamp_column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Count(i64),
    /// UTC wall-clock time.
    Instant(NaiveDateTime),
}

/// Parses period expressions relative to a fixed local offset.
#[derive(Debug, Clone, Copy)]
pub struct PeriodResolver {
    offset: FixedOffset,
}

impl Default for PeriodResolver {
    fn default() -> Self {
        Self::local()
    }
}

impl PeriodResolver {
    /// Resolver using the process's current local offset.
    pub fn local() -> Self {
        Self::with_offset(*Local::now().offset())
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn resolve(&self, spec: &str) -> Result<PeriodPlan> {
        let invalid = || Error::InvalidPeriod(spec.to_string());

        let (left, right) = spec.split_once(',').ok_or_else(invalid)?;
        if right.contains(',') {
            return Err(invalid());
        }
        let left = self.endpoint(left).ok_or_else(invalid)?;
        let right = self.endpoint(right).ok_or_else(invalid)?;

        let plan = match (left, right) {
            (Endpoint::Instant(from), Endpoint::Instant(to)) if from <= to => PeriodPlan {
                condition: format!(
                    "{ts} >= '{}' and {ts} <= '{}'",
                    from.format(SQL_DATETIME),
                    to.format(SQL_DATETIME),
                    ts = TIMESTAMP_PLACEHOLDER,
                ),
                order: TIMESTAMP_PLACEHOLDER.to_string(),
                limit: None,
                reversed: false,
            },
            (Endpoint::Instant(at), Endpoint::Count(n)) if n >= 0 => PeriodPlan {
                condition: format!(
                    "{TIMESTAMP_PLACEHOLDER} >= '{}'",
                    at.format(SQL_DATETIME)
                ),
                order: TIMESTAMP_PLACEHOLDER.to_string(),
                limit: Some(n.unsigned_abs()),
                reversed: false,
            },
            (Endpoint::Instant(at), Endpoint::Count(n)) => PeriodPlan {
                condition: format!(
                    "{TIMESTAMP_PLACEHOLDER} <= '{}'",
                    at.format(SQL_DATETIME)
                ),
                order: format!("{TIMESTAMP_PLACEHOLDER} desc"),
                limit: Some(n.unsigned_abs()),
                reversed: true,
            },
            _ => return Err(invalid()),
        };

        tracing::debug!(spec, ?plan, "resolved period");
        Ok(plan)
    }

    fn endpoint(&self, token: &str) -> Option<Endpoint> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if COUNT_TOKEN.is_match(token) {
            return token.parse().ok().map(Endpoint::Count);
        }
        self.parse_instant(token).map(Endpoint::Instant)
    }

    fn parse_instant(&self, token: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
            return Some(dt.naive_utc());
        }
        if let Some(dt) = OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(token, fmt).ok())
        {
            return Some(dt.naive_utc());
        }

        let naive = NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(token, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(token, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })?;

        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.naive_utc())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
