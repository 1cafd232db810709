//! # Scroller
//!
//! The goal-scroller animation state machine.
//!
//! The shown done index only ever moves one goal at a time, through a fixed
//! three-step animation:
//!
//! ```text
//! Static(d) ──► UpwardBegin(d+1) ──► UpwardMoving(d+1) ──► UpwardEnd(d+1) ──► Static(d+1)
//! Static(d) ──► DownwardBegin(d) ──► DownwardMoving(d) ──► DownwardEnd(d-1) ──► Static(d-1)
//! ```
//!
//! Every non-static phase arms a one-shot timer. While it is armed,
//! [`Scroller::advance`] is a no-op; the owner calls
//! [`Scroller::timer_expired`] when the timer fires and then advances again.
//! A counter that jumps several thresholds between polls therefore plays one
//! full cycle per goal instead of skipping.

use std::cmp::Ordering;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, DoneIndex};

/// Latest known fundraising total as delivered by the progress source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Progress {
    /// Nothing fetched yet.
    #[default]
    Pending,
    /// The last poll failed or returned no usable value.
    Failed,
    Total(f64),
}

impl Progress {
    pub fn total(self) -> Option<f64> {
        match self {
            Progress::Total(points) => Some(points),
            Progress::Pending | Progress::Failed => None,
        }
    }
}

impl From<Option<f64>> for Progress {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Progress::Failed, Progress::Total)
    }
}

/// Current step of the scroll animation. Each variant carries a done index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "done_index", rename_all = "snake_case")]
pub enum Phase {
    Static(DoneIndex),
    UpwardBegin(DoneIndex),
    UpwardMoving(DoneIndex),
    UpwardEnd(DoneIndex),
    DownwardBegin(DoneIndex),
    DownwardMoving(DoneIndex),
    DownwardEnd(DoneIndex),
}

impl Phase {
    pub fn done_index(self) -> DoneIndex {
        match self {
            Phase::Static(d)
            | Phase::UpwardBegin(d)
            | Phase::UpwardMoving(d)
            | Phase::UpwardEnd(d)
            | Phase::DownwardBegin(d)
            | Phase::DownwardMoving(d)
            | Phase::DownwardEnd(d) => d,
        }
    }

    pub fn is_static(self) -> bool {
        matches!(self, Phase::Static(_))
    }

    /// Short identifier used in logs and the rendered markup.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Static(_) => "static",
            Phase::UpwardBegin(_) => "upwards:begin",
            Phase::UpwardMoving(_) => "upwards:moving",
            Phase::UpwardEnd(_) => "upwards:end",
            Phase::DownwardBegin(_) => "downwards:begin",
            Phase::DownwardMoving(_) => "downwards:moving",
            Phase::DownwardEnd(_) => "downwards:end",
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Static(None)
    }
}

/// Timer length for one animation phase.
///
/// `transition` must equal the CSS transition duration used by the renderer;
/// `margin` is added so the timer never fires before the transition ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationTiming {
    pub transition: Duration,
    pub margin: Duration,
}

impl AnimationTiming {
    pub fn phase_duration(&self) -> Duration {
        self.transition + self.margin
    }
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            transition: Duration::from_millis(1_000),
            margin: Duration::from_millis(100),
        }
    }
}

/// Outcome of a single [`Scroller::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// A phase timer is armed; nothing changed.
    Blocked,
    /// No usable total (pending or failed fetch); nothing changed.
    NoData,
    /// Static and already showing the target.
    Idle,
    /// Entered an animation phase; the caller must arm a timer for `duration`.
    Animating { phase: Phase, duration: Duration },
    /// Finished an animation and returned to `Static`.
    Settled(Phase),
}

/// Owns the current [`Phase`] and the "timer armed" flag.
#[derive(Debug, Clone, Default)]
pub struct Scroller {
    phase: Phase,
    armed: bool,
    timing: AnimationTiming,
}

impl Scroller {
    pub fn new(timing: AnimationTiming) -> Self {
        Self {
            phase: Phase::default(),
            armed: false,
            timing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn timing(&self) -> AnimationTiming {
        self.timing
    }

    /// Move one step through the phase table toward the done index implied by
    /// `progress`.
    pub fn advance(&mut self, catalog: &Catalog, progress: Progress) -> Step {
        if self.armed {
            return Step::Blocked;
        }
        let Some(total) = progress.total() else {
            return Step::NoData;
        };

        let target = catalog.calculate_done_index(total);
        let next = next_phase(self.phase, target);
        if next == self.phase {
            return Step::Idle;
        }

        debug!(
            from = self.phase.as_str(),
            to = next.as_str(),
            done_index = ?next.done_index(),
            target = ?target,
            "scroller phase change"
        );
        self.phase = next;

        if next.is_static() {
            Step::Settled(next)
        } else {
            self.armed = true;
            Step::Animating {
                phase: next,
                duration: self.timing.phase_duration(),
            }
        }
    }

    /// Clear the armed flag once the phase timer has fired.
    pub fn timer_expired(&mut self) {
        self.armed = false;
    }

    /// Back to `Static(None)`, unarmed. Used when the catalog is replaced.
    pub fn reset(&mut self) {
        self.phase = Phase::default();
        self.armed = false;
    }
}

/// The transition table.
///
/// `None` orders below `Some(0)`, which treats "no goal done" as index -1.
pub fn next_phase(phase: Phase, target: DoneIndex) -> Phase {
    match phase {
        Phase::Static(current) => match current.cmp(&target) {
            Ordering::Equal => Phase::Static(current),
            Ordering::Greater => Phase::DownwardBegin(current),
            Ordering::Less => Phase::UpwardBegin(Some(step_up(current))),
        },
        Phase::UpwardBegin(d) => Phase::UpwardMoving(d),
        Phase::UpwardMoving(d) => Phase::UpwardEnd(d),
        Phase::UpwardEnd(d) => Phase::Static(d),
        Phase::DownwardBegin(d) => Phase::DownwardMoving(d),
        Phase::DownwardMoving(d) => Phase::DownwardEnd(step_down(d)),
        Phase::DownwardEnd(d) => Phase::Static(d),
    }
}

pub(crate) fn step_up(d: DoneIndex) -> usize {
    d.map_or(0, |d| d + 1)
}

pub(crate) fn step_down(d: DoneIndex) -> DoneIndex {
    match d {
        None | Some(0) => None,
        Some(d) => Some(d - 1),
    }
}
