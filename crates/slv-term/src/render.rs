//! Line-oriented event renderer.
//!
//! Each row prints as a fixed 49-column header followed by the message:
//!
//! ```text
//! dd/mm HH:MM:SS hhhhhh ttttttttttttttt FACILI SEV message starts here……
//!                                                  ……and wraps under itself
//! ```
//!
//! The first message line gets whatever the header leaves of the terminal
//! width. Everything after it (the rest of the first line plus each further
//! newline-separated segment) is chopped into chunks of the message width
//! and printed indented so the text column lines up.

use std::io::{self, Write};

use chrono::{FixedOffset, Offset, Utc};
use slv_core::{types::facility_label, EventRow};

use crate::{
    message::{self, split_chars, truncate_chars},
    palette::Palette,
};

/// Width of `dd/mm HH:MM:SS hhhhhh ttttttttttttttt FACILI SEV `.
pub const HEADER_WIDTH: usize = 14 + 1 + 6 + 1 + 15 + 1 + 6 + 1 + 3 + 1;

/// Continuation chunks are never narrower than this.
pub const MIN_MESSAGE_WIDTH: usize = 30;

const HOST_WIDTH: usize = 6;
const TAG_WIDTH: usize = 15;

/// Column geometry, fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Terminal width.
    pub columns: usize,
    /// Width of continuation chunks.
    pub message_width: usize,
}

impl Layout {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            message_width: columns.saturating_sub(HEADER_WIDTH).max(MIN_MESSAGE_WIDTH),
        }
    }

    /// Characters of message that fit on the header line.
    pub fn first_line_budget(&self) -> usize {
        self.columns.saturating_sub(HEADER_WIDTH)
    }

    /// Left padding of continuation lines.
    pub fn indent(&self) -> usize {
        self.columns.saturating_sub(self.message_width)
    }
}

/// Writes rows to `out` and tracks the highest id seen.
pub struct Renderer<W> {
    out: W,
    layout: Layout,
    palette: Palette,
    offset: FixedOffset,
    first_line_only: bool,
    high_water: i64,
}

impl<W: Write> Renderer<W> {
    /// Renderer with the default palette, showing times in UTC.
    pub fn new(out: W, layout: Layout) -> Self {
        Self {
            out,
            layout,
            palette: Palette::load_default(),
            offset: Utc.fix(),
            first_line_only: false,
            high_water: 0,
        }
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Offset used to display event timestamps.
    pub fn offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn first_line_only(mut self, first_line_only: bool) -> Self {
        self.first_line_only = first_line_only;
        self
    }

    /// Largest row id rendered so far, 0 before any row.
    pub fn high_water(&self) -> i64 {
        self.high_water
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Render `rows`, in reverse when `reversed` is set, then flush.
    pub fn render(&mut self, rows: &[EventRow], reversed: bool) -> io::Result<()> {
        if reversed {
            for row in rows.iter().rev() {
                self.render_row(row)?;
            }
        } else {
            for row in rows {
                self.render_row(row)?;
            }
        }

        if let Some(max) = rows.iter().map(|r| r.id).max() {
            if max > self.high_water {
                tracing::debug!(from = self.high_water, to = max, "cursor advanced");
                self.high_water = max;
            }
        }
        self.out.flush()
    }

    fn render_row(&mut self, row: &EventRow) -> io::Result<()> {
        let tag = match row.tag.rfind('[') {
            Some(idx) => &row.tag[..idx],
            None => row.tag.as_str(),
        };
        write!(
            self.out,
            "{} {:<host_w$} {:<tag_w$} {} {} ",
            row.reported_at
                .with_timezone(&self.offset)
                .format("%d/%m %H:%M:%S"),
            truncate_chars(&row.from_host, HOST_WIDTH),
            truncate_chars(tag, TAG_WIDTH),
            facility_label(row.facility),
            self.palette.severity_label(row.priority),
            host_w = HOST_WIDTH,
            tag_w = TAG_WIDTH,
        )?;

        let body = message::prepare(&row.message);
        let mut segments = message::segments(&body);
        let Some(first) = segments.first_mut() else {
            return writeln!(self.out);
        };

        let (head, rest) = split_chars(*first, self.layout.first_line_budget());
        writeln!(self.out, "{head}")?;
        if self.first_line_only {
            return Ok(());
        }
        *first = rest;

        let indent = " ".repeat(self.layout.indent());
        for segment in segments {
            let mut remaining = segment;
            while !remaining.is_empty() {
                let (chunk, tail) = split_chars(remaining, self.layout.message_width);
                writeln!(self.out, "{indent}{chunk}")?;
                remaining = tail;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
