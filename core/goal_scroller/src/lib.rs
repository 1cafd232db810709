//! # Goal Scroller
//!
//! Core of the charity stream goal overlay: which goals are visible, what
//! state each one is in, and which transition each one plays while the
//! overlay catches up with the fundraising total.
//!
//! | Piece            | Item                                         |
//! |------------------|----------------------------------------------|
//! | Goal list        | [`Catalog`], [`Goal`]                        |
//! | Done index       | [`Catalog::calculate_done_index`]            |
//! | State machine    | [`Scroller::advance`], [`Phase`], [`Step`]   |
//! | Slot projection  | [`project`], [`Projection`], [`Slot`]        |
//!
//! ## Architecture
//!
//! Nothing in this crate performs I/O or keeps global state. The owner of a
//! [`Scroller`] feeds it the latest [`Progress`], arms a timer whenever
//! [`Step::Animating`] is returned, calls [`Scroller::timer_expired`] when it
//! fires, and renders [`project`] of the current phase after every change.

pub mod catalog;
pub mod projector;
pub mod scroller;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_scroller;

pub use catalog::{Catalog, CatalogError, DoneIndex, Goal};
pub use projector::{project, LifecycleState, Projection, Slot, Transition};
pub use scroller::{AnimationTiming, Phase, Progress, Scroller, Step};
