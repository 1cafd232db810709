//! Single owner of the overlay model.
//!
//! The driver task receives [`Update`]s from the poll tasks, feeds them to the
//! [`Scroller`], keeps the phase timer, and publishes a fresh [`Published`]
//! view after every update and every timer expiry. Nothing else touches the
//! model, so it needs no locking.

use std::time::Duration;

use goal_scroller::{project, AnimationTiming, Catalog, Progress, Scroller, Step};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::crypto::AccessKey;
use crate::dashboard::DashboardView;
use crate::render::{render, OverlayView, SlotBoard};
use crate::source::Snapshot;

/// Messages delivered to the driver.
#[derive(Debug)]
pub enum Update {
    /// Result of one progress poll; `None` when the poll failed.
    Progress(Option<Snapshot>),
    /// The overlay file changed and holds a new goal list.
    Catalog(Catalog),
}

/// Everything the HTTP layer serves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Published {
    pub overlay: OverlayView,
    pub html: String,
    pub dashboard: DashboardView,
}

impl Published {
    pub fn invalid_key() -> Self {
        Self {
            overlay: OverlayView::invalid_key(),
            html: "<p class=\"error\">Invalid key</p>\n".to_string(),
            dashboard: DashboardView::unknown(),
        }
    }
}

/// The overlay context: catalog, latest progress, scroller and rendered board.
pub struct OverlayModel {
    catalog: Catalog,
    progress: Progress,
    scroller: Scroller,
    board: SlotBoard,
    dashboard: DashboardView,
    key: AccessKey,
    leaderboard_size: usize,
}

impl OverlayModel {
    pub fn new(
        catalog: Catalog,
        key: AccessKey,
        timing: AnimationTiming,
        leaderboard_size: usize,
    ) -> Self {
        Self {
            catalog,
            progress: Progress::Pending,
            scroller: Scroller::new(timing),
            board: SlotBoard::default(),
            dashboard: DashboardView::unknown(),
            key,
            leaderboard_size,
        }
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn scroller(&self) -> &Scroller {
        &self.scroller
    }

    /// Record an update and advance. Returns the timer to arm, if any.
    pub fn apply(&mut self, update: Update) -> Option<Duration> {
        match update {
            Update::Progress(Some(snapshot)) => {
                self.progress = Progress::Total(snapshot.total);
                self.dashboard = DashboardView::build(&snapshot, &self.key, self.leaderboard_size);
            }
            Update::Progress(None) => {
                self.progress = Progress::Failed;
                self.dashboard = DashboardView::unknown();
            }
            Update::Catalog(catalog) => {
                info!("Goal list changed ({} goals); restarting scroller", catalog.len());
                self.catalog = catalog;
                self.scroller.reset();
                self.board.clear();
            }
        }
        self.tick()
    }

    /// The phase timer fired.
    pub fn on_timer(&mut self) -> Option<Duration> {
        self.scroller.timer_expired();
        self.tick()
    }

    fn tick(&mut self) -> Option<Duration> {
        match self.scroller.advance(&self.catalog, self.progress) {
            Step::Animating { duration, .. } => Some(duration),
            Step::Settled(phase) => {
                debug!(phase = phase.as_str(), done_index = ?phase.done_index(), "Scroller settled");
                None
            }
            Step::Blocked | Step::NoData | Step::Idle => None,
        }
    }

    /// Project the current phase onto the board and build the published view.
    pub fn render(&mut self) -> Published {
        let phase = self.scroller.phase();
        let projection = project(phase, self.catalog.len());
        render(&self.catalog, &projection, &mut self.board);

        Published {
            overlay: OverlayView::build(self.progress, phase.as_str(), &self.board),
            html: self.board.to_html(phase.as_str()),
            dashboard: self.dashboard.clone(),
        }
    }
}

/// Run the driver until every update sender has gone away.
pub async fn run(
    mut model: OverlayModel,
    mut updates: mpsc::Receiver<Update>,
    published: watch::Sender<Published>,
) {
    let timer = tokio::time::sleep(Duration::ZERO);
    tokio::pin!(timer);
    let mut armed = false;

    published.send_replace(model.render());

    loop {
        let next = tokio::select! {
            update = updates.recv() => match update {
                Some(update) => model.apply(update),
                None => {
                    info!("Update channel closed; driver stopping");
                    return;
                }
            },
            () = &mut timer, if armed => {
                armed = false;
                model.on_timer()
            }
        };

        if let Some(duration) = next {
            timer.as_mut().reset(Instant::now() + duration);
            armed = true;
        } else if !model.scroller().is_armed() {
            armed = false;
        }

        published.send_replace(model.render());
    }
}
