//! In-memory stand-in for the `SystemEvents` table.
//!
//! [`TableSource`] understands the condition shapes the default schema
//! produces for point filters and follow cursors (`fromhost like 'x%'`,
//! `syslogtag like 'x%'`, `priority <= N`, `id > N`) and the two id
//! orderings. Anything else panics so a harness never silently tests less
//! than it thinks.
//!
//! Rows queued with [`TableSource::arrive`] are inserted one batch after each
//! fetch, which models events landing between follow polls.
//! [`TableSource::fail_on`] makes one query fail the way a dropped MySQL
//! connection would.

use std::{collections::VecDeque, sync::Mutex};

use slv::core::{EventRow, QueryPlan};
use slv::store::{EventSource, StoreError};
use tokio_util::sync::CancellationToken;

pub struct TableSource {
    rows: Mutex<Vec<EventRow>>,
    arrivals: Mutex<VecDeque<Vec<EventRow>>>,
    plans: Mutex<Vec<QueryPlan>>,
    cancel_after: Option<(usize, CancellationToken)>,
    fail_on: Option<usize>,
}

impl TableSource {
    pub fn new(rows: Vec<EventRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            arrivals: Mutex::new(VecDeque::new()),
            plans: Mutex::new(Vec::new()),
            cancel_after: None,
            fail_on: None,
        }
    }

    /// Queue `batch` for insertion. One queued batch lands after each fetch.
    pub fn arrive(self, batch: Vec<EventRow>) -> Self {
        self.arrivals.lock().unwrap().push_back(batch);
        self
    }

    /// Cancel `token` once `fetches` queries have been answered.
    pub fn cancel_after(mut self, fetches: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((fetches, token));
        self
    }

    /// Answer the `fetch`-th query (1-based) with a query error.
    pub fn fail_on(mut self, fetch: usize) -> Self {
        self.fail_on = Some(fetch);
        self
    }

    /// Every plan received, in order.
    pub fn plans(&self) -> Vec<QueryPlan> {
        self.plans.lock().unwrap().clone()
    }

    fn select(&self, plan: &QueryPlan) -> Vec<EventRow> {
        let mut selected: Vec<EventRow> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| plan.conditions.iter().all(|c| matches(row, c)))
            .cloned()
            .collect();

        match plan.order.as_str() {
            "id" => selected.sort_by_key(|r| r.id),
            "id desc" => selected.sort_by_key(|r| std::cmp::Reverse(r.id)),
            other => panic!("TableSource: unsupported order {other:?}"),
        }
        if let Some(limit) = plan.limit {
            selected.truncate(limit as usize);
        }
        selected
    }
}

impl EventSource for &TableSource {
    async fn fetch(&self, plan: &QueryPlan) -> Result<Vec<EventRow>, StoreError> {
        let fetched = {
            let mut plans = self.plans.lock().unwrap();
            plans.push(plan.clone());
            plans.len()
        };
        if self.fail_on == Some(fetched) {
            return Err(StoreError::Query(sqlx::Error::Protocol(
                "connection lost".to_string(),
            )));
        }
        let page = self.select(plan);

        if let Some(batch) = self.arrivals.lock().unwrap().pop_front() {
            self.rows.lock().unwrap().extend(batch);
        }
        if let Some((after, token)) = &self.cancel_after {
            if fetched >= *after {
                token.cancel();
            }
        }
        Ok(page)
    }
}

fn matches(row: &EventRow, condition: &str) -> bool {
    if let Some(rest) = condition.strip_prefix("id > ") {
        return row.id > rest.parse::<i64>().unwrap();
    }
    if let Some(rest) = condition.strip_prefix("priority <= ") {
        return row.priority <= rest.parse::<i64>().unwrap();
    }
    if condition.starts_with("fromhost like ") {
        let prefix = like_prefix(condition, "fromhost")
            .unwrap_or_else(|| panic!("TableSource: literal broken in {condition:?}"));
        return row.from_host.starts_with(&prefix);
    }
    if condition.starts_with("syslogtag like ") {
        let prefix = like_prefix(condition, "syslogtag")
            .unwrap_or_else(|| panic!("TableSource: literal broken in {condition:?}"));
        return row.tag.starts_with(&prefix);
    }
    panic!("TableSource: unsupported condition {condition:?}")
}

/// Read `<column> like '<prefix>%'` the way MySQL does: string-literal
/// escapes first, then `like` escapes. `None` when the literal would end
/// before the trailing `%'`.
fn like_prefix(condition: &str, column: &str) -> Option<String> {
    let body = condition
        .strip_prefix(column)?
        .strip_prefix(" like '")?
        .strip_suffix("%'")?;

    let mut pattern = String::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                // MySQL keeps the backslash for these so `like` sees it.
                n @ ('%' | '_') => {
                    pattern.push('\\');
                    pattern.push(n);
                }
                n => pattern.push(n),
            },
            '\'' => {
                if chars.next()? != '\'' {
                    return None;
                }
                pattern.push('\'');
            }
            c => pattern.push(c),
        }
    }

    let mut prefix = String::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => prefix.push(chars.next()?),
            // `_` is treated literally; no fixture relies on it.
            '%' => panic!("TableSource: wildcard inside prefix {condition:?}"),
            c => prefix.push(c),
        }
    }
    Some(prefix)
}
