//! slv — syslog viewer.
//!
//! Shows rows of the rsyslog `SystemEvents` table as aligned, colour-coded
//! terminal lines, optionally following new rows as they arrive.
//!
//! # Architecture
//!
//! ```text
//! Cli ──► ConfigResolver ──► Config ──► Follower ──► Renderer ──► stdout
//!              ▲                           │
//!       ProfileDocument              EventSource (MySQL)
//! ```
//!
//! The domain crates are re-exported so integration tests can import them
//! through one path.

pub mod cli;

pub use slv_core as core;
pub use slv_store as store;
pub use slv_term as term;

use std::io::IsTerminal;

use slv_core::{ConfigResolver, PeriodResolver, ProfileDocument};
use slv_store::MySqlSource;
use slv_term::{Follower, Layout, Palette, Renderer};
use tokio_util::sync::CancellationToken;

use crate::cli::Cli;

/// Fallback when the terminal size cannot be read.
pub const DEFAULT_COLUMNS: usize = 80;

/// Resolve options, connect, and show events until done or interrupted.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let offset = *chrono::Local::now().offset();

    let document = ProfileDocument::load(&cli.profiles_path())?;
    let config = ConfigResolver::new(PeriodResolver::with_offset(offset))
        .resolve(cli.options(), &document)?;
    tracing::debug!(?config, "resolved config");

    let columns = crossterm::terminal::size()
        .map(|(w, _)| usize::from(w))
        .unwrap_or(DEFAULT_COLUMNS);
    let stdout = std::io::stdout();
    let palette = if stdout.is_terminal() {
        Palette::load_default()
    } else {
        Palette::plain()
    };
    let renderer = Renderer::new(stdout, Layout::new(columns))
        .palette(palette)
        .offset(offset)
        .first_line_only(config.first_line);

    let source = MySqlSource::connect(&config.connection, config.schema.clone()).await?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    Follower::new(&config, source, renderer).run(cancel).await?;
    Ok(())
}
