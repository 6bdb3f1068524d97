//! Test builders — ergonomic constructors for `EventRow` and renderers.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use slv::core::{EventRow, Severity};
use slv::term::{Layout, Palette, Renderer};

// ---------------------------------------------------------------------------
// EventRowBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`EventRow`] test fixtures.
///
/// # Example
///
/// ```rust
/// let row = EventRowBuilder::new(7, "Accepted publickey for deploy")
///     .host("bastion")
///     .tag("sshd[811]:")
///     .severity(Severity::Notice)
///     .build();
/// ```
pub struct EventRowBuilder {
    id: i64,
    reported_at: DateTime<Utc>,
    facility: i64,
    priority: i64,
    from_host: String,
    tag: String,
    message: String,
}

impl EventRowBuilder {
    pub fn new(id: i64, message: impl Into<String>) -> Self {
        Self {
            id,
            reported_at: base_time() + Duration::seconds(id),
            facility: 3,
            priority: Severity::Info.ordinal(),
            from_host: "web-01".to_string(),
            tag: "app[100]:".to_string(),
            message: message.into(),
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.from_host = host.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.priority = severity.ordinal();
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn facility(mut self, facility: i64) -> Self {
        self.facility = facility;
        self
    }

    pub fn build(self) -> EventRow {
        EventRow {
            id: self.id,
            reported_at: self.reported_at,
            facility: self.facility,
            priority: self.priority,
            from_host: self.from_host,
            tag: self.tag,
            message: self.message,
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// 2024-01-15 10:00:00 UTC. Builder rows are stamped `id` seconds after it.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
}

/// An INFO row with the default host and tag.
pub fn info_row(id: i64, message: &str) -> EventRow {
    EventRowBuilder::new(id, message).build()
}

/// Rows with ids `from..=to`, ascending, messages `event <id>`.
pub fn rows(from: i64, to: i64) -> Vec<EventRow> {
    (from..=to)
        .map(|id| info_row(id, &format!("event {id}")))
        .collect()
}

/// Colourless renderer over an in-memory buffer, times shown in UTC.
pub fn buffer_renderer(columns: usize) -> Renderer<Vec<u8>> {
    Renderer::new(Vec::new(), Layout::new(columns)).palette(Palette::plain())
}

/// Render `rows` through [`buffer_renderer`] and return the text.
pub fn render_to_string(columns: usize, rows: &[EventRow], reversed: bool) -> String {
    let mut renderer = buffer_renderer(columns);
    renderer.render(rows, reversed).unwrap();
    String::from_utf8(renderer.into_inner()).unwrap()
}

/// Message ids printed by a colourless render of `event <id>` rows, in
/// output order.
pub fn printed_ids(output: &str) -> Vec<i64> {
    output
        .lines()
        .filter_map(|line| line.rsplit("event ").next()?.trim().parse().ok())
        .collect()
}
