//! Query plans — the filter/order/limit shape handed to an event source.
//!
//! A [`QueryPlan`] is rebuilt for every query: the initial page and each
//! follow poll. Conditions are independent SQL boolean fragments joined with
//! `and` by the event source.
//!
//! # Escaping
//!
//! User-supplied host and tag prefixes are inlined into `like` literals.
//! [`escape_like_prefix`] makes every backslash literal, then doubles `'`,
//! then escapes `%`, before the value is used anywhere else. MySQL reads a
//! backslash as an escape both in string literals and in `like` patterns,
//! so a literal backslash takes four in the statement text.

use crate::{
    config::Config,
    period::PeriodPlan,
    schema::SchemaMap,
};

/// Filter, order and limit for one query against the events table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub conditions: Vec<String>,
    pub order: String,
    pub limit: Option<u64>,
    /// Rows arrive newest first and should be displayed reversed.
    pub reversed: bool,
}

/// Escape a value for use inside a single-quoted `like` prefix literal.
pub fn escape_like_prefix(value: &str) -> String {
    value
        .replace('\\', "\\\\\\\\")
        .replace('\'', "''")
        .replace('%', "\\%")
}

/// Builds [`QueryPlan`]s for one resolved [`Config`].
///
/// The point filters (host, tag, severity) are computed once; each call to
/// [`QueryPlanBuilder::build`] adds the period or cursor part.
#[derive(Debug, Clone)]
pub struct QueryPlanBuilder<'a> {
    schema: &'a SchemaMap,
    filters: Vec<String>,
    period: Option<&'a PeriodPlan>,
    count: u64,
}

impl<'a> QueryPlanBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        let schema = &config.schema;
        let mut filters = Vec::new();

        if let Some(host) = config.host.as_deref() {
            filters.push(format!(
                "{} like '{}%'",
                schema.host,
                escape_like_prefix(host)
            ));
        }
        if let Some(tag) = config.tag.as_deref() {
            filters.push(format!(
                "{} like '{}%'",
                schema.tag,
                escape_like_prefix(tag)
            ));
        }
        if let Some(severity) = config.severity {
            filters.push(format!("{} <= {}", schema.priority, severity.ordinal()));
        }

        Self {
            schema,
            filters,
            period: config.period.as_ref(),
            count: config.count,
        }
    }

    /// Plan for the initial page (`cursor == None`) or a follow poll
    /// returning every row newer than `cursor`.
    pub fn build(&self, cursor: Option<i64>) -> QueryPlan {
        let mut conditions = self.filters.clone();
        let id = &self.schema.id;

        let plan = match (cursor, self.period) {
            (Some(after), _) => {
                conditions.push(format!("{id} > {after}"));
                QueryPlan {
                    conditions,
                    order: id.clone(),
                    limit: None,
                    reversed: false,
                }
            }
            (None, Some(period)) => {
                let ts = &self.schema.timestamp;
                conditions.push(period.condition_for(ts));
                QueryPlan {
                    conditions,
                    order: period.order_for(ts),
                    limit: period.limit,
                    reversed: period.reversed,
                }
            }
            (None, None) => QueryPlan {
                conditions,
                order: format!("{id} desc"),
                limit: Some(self.count),
                reversed: true,
            },
        };

        tracing::debug!(
            conditions = ?plan.conditions,
            order = %plan.order,
            limit = ?plan.limit,
            "built query plan"
        );
        plan
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
