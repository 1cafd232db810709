//! # Projector
//!
//! Pure mapping from a [`Phase`] and the goal count to the slots that should
//! be on screen for one render pass.
//!
//! ## Window
//!
//! At rest the overlay shows up to three rows. For a done index `d`:
//!
//! | Situation                 | Rows shown                           |
//! |---------------------------|--------------------------------------|
//! | nothing done              | goals `0..3` (all upcoming)          |
//! | `d == 0`                  | `d`, `d+1`, `d+2`                    |
//! | `d >= 1`, remaining >= 3  | `d-1`, `d`, `d+1` (offset +1)        |
//! | remaining == 2            | `d`, `d+1`                           |
//! | remaining == 1            | `d` (every slot completed)           |
//!
//! `remaining` is `goal_count - d`, so the window shrinks instead of leaving
//! empty rows near the end of the catalog.
//!
//! ## Animations
//!
//! An animation phase shows the union of the source and target windows (at
//! most four slots). Slots revealed by the move are the *edge* and get
//! `no-box-shadow`; the rest scroll `up`/`down` during `*Moving` and `*End`
//! when both windows have the same size and different starts, unless the
//! edge is goal 0.

use serde::Serialize;

use crate::catalog::DoneIndex;
use crate::scroller::{step_down, step_up, Phase};

/// Most rows shown while no animation is running.
pub const RESTING_ROWS: usize = 3;

/// Farthest distance, in goals, of any slot from the phase's done index.
pub const MAX_SLOT_DISTANCE: isize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Completed,
    Active,
    Upcoming,
}

impl LifecycleState {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Completed => "completed",
            LifecycleState::Active => "active",
            LifecycleState::Upcoming => "upcoming",
        }
    }
}

/// Transition class applied to a slot. `None` on the slot means no attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transition {
    Up,
    Down,
    Clear,
    NoBoxShadow,
}

impl Transition {
    pub fn as_str(self) -> &'static str {
        match self {
            Transition::Up => "up",
            Transition::Down => "down",
            Transition::Clear => "clear",
            Transition::NoBoxShadow => "no-box-shadow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub goal_index: usize,
    pub state: LifecycleState,
    pub transition: Option<Transition>,
    pub display_position: usize,
}

/// Everything the renderer needs for one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub phase: Phase,
    pub done_index: DoneIndex,
    pub remaining: Option<usize>,
    pub position_offset: usize,
    pub slots: Vec<Slot>,
}

impl Projection {
    pub fn slot(&self, goal_index: usize) -> Option<&Slot> {
        self.slots.iter().find(|s| s.goal_index == goal_index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Begin,
    Moving,
    End,
}

/// Half-open range of visible goal indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    start: usize,
    end: usize,
}

impl Window {
    fn contains(self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }

    fn len(self) -> usize {
        self.end - self.start
    }
}

/// Goals not yet completed, counting the done goal itself.
pub fn remaining(done_index: DoneIndex, goal_count: usize) -> Option<usize> {
    done_index.map(|d| goal_count.saturating_sub(d))
}

/// Extra row kept above the active goal for the last completed one.
pub fn position_offset(done_index: DoneIndex, goal_count: usize) -> usize {
    match (done_index, remaining(done_index, goal_count)) {
        (Some(d), Some(r)) if d >= 1 && r >= 3 => 1,
        _ => 0,
    }
}

fn window(done_index: DoneIndex, goal_count: usize) -> Window {
    let base = done_index.unwrap_or(0);
    let rows = remaining(done_index, goal_count)
        .unwrap_or(goal_count)
        .min(RESTING_ROWS);
    let start = base
        .saturating_sub(position_offset(done_index, goal_count))
        .min(goal_count);
    Window {
        start,
        end: (start + rows).min(goal_count),
    }
}

fn state_for(index: usize, done_index: DoneIndex, goal_count: usize) -> LifecycleState {
    match done_index {
        None => LifecycleState::Upcoming,
        Some(_) if remaining(done_index, goal_count) == Some(1) => LifecycleState::Completed,
        Some(d) if index < d => LifecycleState::Completed,
        Some(d) if index == d => LifecycleState::Active,
        Some(_) => LifecycleState::Upcoming,
    }
}

/// Map a phase to its visible slots.
pub fn project(phase: Phase, goal_count: usize) -> Projection {
    let done_index = phase.done_index();

    let upward = |d: DoneIndex, stage| Animation {
        source: step_down(d),
        target: d,
        direction: Direction::Up,
        stage,
    };
    let downward = |source: DoneIndex, target: DoneIndex, stage| Animation {
        source,
        target,
        direction: Direction::Down,
        stage,
    };

    let mut slots = match phase {
        Phase::Static(d) => resting_slots(d, goal_count),
        Phase::UpwardBegin(d) => upward(d, Stage::Begin).slots(goal_count),
        Phase::UpwardMoving(d) => upward(d, Stage::Moving).slots(goal_count),
        Phase::UpwardEnd(d) => upward(d, Stage::End).slots(goal_count),
        Phase::DownwardBegin(d) => downward(d, step_down(d), Stage::Begin).slots(goal_count),
        Phase::DownwardMoving(d) => downward(d, step_down(d), Stage::Moving).slots(goal_count),
        Phase::DownwardEnd(d) => downward(Some(step_up(d)), d, Stage::End).slots(goal_count),
    };

    let remaining = remaining(done_index, goal_count);
    if remaining == Some(1) {
        for slot in &mut slots {
            slot.state = LifecycleState::Completed;
        }
    }

    // Un-completing the very first goal: keep goals 0 and 1 both active for
    // the closing frame.
    if let Phase::DownwardEnd(None) = phase {
        for slot in slots.iter_mut().filter(|s| s.goal_index <= 1) {
            slot.state = LifecycleState::Active;
        }
    }

    let base = done_index.unwrap_or(0) as isize;
    debug_assert!(
        slots
            .iter()
            .all(|s| (s.goal_index as isize - base).abs() <= MAX_SLOT_DISTANCE),
        "slot outside the visible window for {phase:?}"
    );

    Projection {
        phase,
        done_index,
        remaining,
        position_offset: position_offset(done_index, goal_count),
        slots,
    }
}

fn resting_slots(done_index: DoneIndex, goal_count: usize) -> Vec<Slot> {
    let window = window(done_index, goal_count);
    let settled = done_index.unwrap_or(0);

    (window.start..window.end)
        .map(|index| Slot {
            goal_index: index,
            state: state_for(index, done_index, goal_count),
            transition: (index != settled).then_some(Transition::Clear),
            display_position: index - window.start,
        })
        .collect()
}

/// One frame of a scroll from the `source` done index to `target`.
#[derive(Debug, Clone, Copy)]
struct Animation {
    source: DoneIndex,
    target: DoneIndex,
    direction: Direction,
    stage: Stage,
}

impl Animation {
    fn slots(self, goal_count: usize) -> Vec<Slot> {
        let from = window(self.source, goal_count);
        let to = window(self.target, goal_count);
        let first = from.start.min(to.start);
        let last = from.end.max(to.end);
        // Revealing goal 0 means the list is already at its top.
        let reveals_first = to.contains(0) && !from.contains(0);
        let scrolls = from.len() == to.len() && from.start != to.start && !reveals_first;

        let shown = match self.stage {
            Stage::Begin => self.source,
            Stage::Moving | Stage::End => self.target,
        };
        let travel = match self.direction {
            Direction::Up => Transition::Up,
            Direction::Down => Transition::Down,
        };

        (first..last)
            .filter(|&index| from.contains(index) || to.contains(index))
            .map(|index| {
                let edge = to.contains(index) && !from.contains(index);
                let transition = match self.stage {
                    Stage::Begin => edge.then_some(Transition::NoBoxShadow),
                    Stage::Moving | Stage::End => {
                        if edge {
                            Some(Transition::NoBoxShadow)
                        } else {
                            scrolls.then_some(travel)
                        }
                    }
                };
                Slot {
                    goal_index: index,
                    state: state_for(index, shown, goal_count),
                    transition,
                    display_position: index - first,
                }
            })
            .collect()
    }
}
