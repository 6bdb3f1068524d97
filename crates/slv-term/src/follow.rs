//! Query → render cycle, with optional follow mode.
//!
//! ```text
//! Initial ──► Displayed ──► Terminated          (no follow, or a period)
//!                 │
//!                 └──► sleep ──► Polling ──► sleep ──► Polling ──► …
//! ```
//!
//! The first page is the latest `count` rows (or the period's rows). When
//! following, every poll asks for rows with an id above the renderer's
//! high-water mark, oldest first, so nothing is shown twice. The loop ends
//! only when the cancellation token fires.

use std::{io::Write, time::Duration};

use slv_core::{Config, EventRow, QueryPlan, QueryPlanBuilder};
use slv_store::EventSource;
use tokio_util::sync::CancellationToken;

use crate::render::Renderer;

/// Pause between follow polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

pub struct Follower<'a, S, W> {
    config: &'a Config,
    plans: QueryPlanBuilder<'a>,
    source: S,
    renderer: Renderer<W>,
    interval: Duration,
}

impl<'a, S: EventSource, W: Write> Follower<'a, S, W> {
    pub fn new(config: &'a Config, source: S, renderer: Renderer<W>) -> Self {
        Self {
            config,
            plans: QueryPlanBuilder::new(config),
            source,
            renderer,
            interval: POLL_INTERVAL,
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Whether [`Follower::run`] keeps polling after the first page.
    pub fn follows(&self) -> bool {
        self.config.follow && self.config.period.is_none()
    }

    /// Show the first page, then poll until `cancel` fires if following.
    /// Returns the renderer so callers can inspect output and cursor.
    pub async fn run(mut self, cancel: CancellationToken) -> anyhow::Result<Renderer<W>> {
        let plan = self.plans.build(None);
        let Some(rows) = self.fetch(&plan, &cancel).await? else {
            return Ok(self.renderer);
        };
        self.renderer.render(&rows, plan.reversed)?;

        if !self.follows() {
            return Ok(self.renderer);
        }

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }

            let cursor = self.renderer.high_water();
            tracing::trace!(cursor, "follow poll");
            let plan = self.plans.build(Some(cursor));
            let Some(rows) = self.fetch(&plan, &cancel).await? else {
                break;
            };
            self.renderer.render(&rows, plan.reversed)?;
        }

        tracing::info!(cursor = self.renderer.high_water(), "follow cancelled");
        Ok(self.renderer)
    }

    /// `None` when cancelled before the source answered.
    async fn fetch(
        &self,
        plan: &QueryPlan,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Option<Vec<EventRow>>> {
        tokio::select! {
            _ = cancel.cancelled() => Ok(None),
            rows = self.source.fetch(plan) => Ok(Some(rows?)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{palette::Palette, render::Layout};
    use chrono::{TimeZone, Utc};
    use slv_core::{PeriodPlan, Severity};
    use slv_store::StoreError;
    use std::{collections::VecDeque, sync::Mutex};

    /// Replays canned pages and records every plan it was asked for.
    /// Cancels the token once the pages run out.
    struct Scripted {
        pages: Mutex<VecDeque<Vec<EventRow>>>,
        plans: Mutex<Vec<QueryPlan>>,
        cancel: CancellationToken,
    }

    impl Scripted {
        fn new(pages: Vec<Vec<EventRow>>, cancel: CancellationToken) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                plans: Mutex::new(Vec::new()),
                cancel,
            }
        }
    }

    impl EventSource for &Scripted {
        async fn fetch(&self, plan: &QueryPlan) -> Result<Vec<EventRow>, StoreError> {
            self.plans.lock().unwrap().push(plan.clone());
            let mut pages = self.pages.lock().unwrap();
            let page = pages.pop_front().unwrap_or_default();
            if pages.is_empty() {
                self.cancel.cancel();
            }
            Ok(page)
        }
    }

    fn event(id: i64) -> EventRow {
        EventRow {
            id,
            reported_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            facility: 1,
            priority: Severity::Notice.ordinal(),
            from_host: "web".to_string(),
            tag: "app".to_string(),
            message: format!("event {id}"),
        }
    }

    fn renderer() -> Renderer<Vec<u8>> {
        Renderer::new(Vec::new(), Layout::new(80)).palette(Palette::plain())
    }

    #[tokio::test(start_paused = true)]
    async fn one_shot_renders_once() {
        let cancel = CancellationToken::new();
        let source = Scripted::new(vec![vec![event(3), event(2)], vec![event(4)]], cancel.clone());
        let config = Config::default();

        let r = Follower::new(&config, &source, renderer())
            .run(cancel)
            .await
            .unwrap();

        assert_eq!(source.plans.lock().unwrap().len(), 1);
        assert_eq!(r.high_water(), 3);
        let out = String::from_utf8(r.into_inner()).unwrap();
        let order: Vec<&str> = out.lines().map(|l| l.rsplit(' ').next().unwrap()).collect();
        assert_eq!(order, vec!["2", "3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn follow_polls_from_high_water_mark() {
        let cancel = CancellationToken::new();
        let source = Scripted::new(
            vec![
                vec![event(42), event(41)],
                vec![],
                vec![event(43), event(44)],
                vec![event(45)],
            ],
            cancel.clone(),
        );
        let config = Config {
            follow: true,
            ..Config::default()
        };

        let r = Follower::new(&config, &source, renderer())
            .run(cancel)
            .await
            .unwrap();

        let plans = source.plans.lock().unwrap();
        let cursors: Vec<Vec<String>> = plans.iter().map(|p| p.conditions.clone()).collect();
        assert_eq!(
            cursors,
            vec![
                vec![],
                vec!["id > 42".to_string()],
                vec!["id > 42".to_string()],
                vec!["id > 44".to_string()],
            ]
        );
        assert!(plans[1..].iter().all(|p| p.order == "id" && p.limit.is_none()));
        assert_eq!(r.high_water(), 45);

        let out = String::from_utf8(r.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn period_is_one_shot_even_when_following() {
        let cancel = CancellationToken::new();
        let source = Scripted::new(vec![vec![event(5)], vec![event(6)]], cancel.clone());
        let config = Config {
            follow: true,
            period: Some(PeriodPlan {
                condition: "{timestamp} >= '2024-01-15 10:00:00'".to_string(),
                order: "{timestamp}".to_string(),
                limit: Some(1),
                reversed: false,
            }),
            ..Config::default()
        };

        let follower = Follower::new(&config, &source, renderer());
        assert!(!follower.follows());
        follower.run(cancel).await.unwrap();
        assert_eq!(source.plans.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn polls_wait_for_the_interval() {
        let cancel = CancellationToken::new();
        let source = Scripted::new(vec![vec![], vec![], vec![]], cancel.clone());
        let config = Config {
            follow: true,
            ..Config::default()
        };

        let started = tokio::time::Instant::now();
        Follower::new(&config, &source, renderer())
            .run(cancel)
            .await
            .unwrap();
        assert!(started.elapsed() >= POLL_INTERVAL * 2);
    }
}
