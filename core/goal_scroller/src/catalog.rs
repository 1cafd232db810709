//! # Catalog
//!
//! The static, ordered list of fundraising goals shown by the overlay.
//!
//! A [`Catalog`] is validated once on construction and never mutated:
//!
//! * it holds at least one goal,
//! * every threshold is finite,
//! * thresholds are strictly increasing (no two goals share a value).
//!
//! Goals are identified by their 0-based index in the catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index of the most recently completed goal, or `None` when no goal has
/// been reached yet.
pub type DoneIndex = Option<usize>;

/// A single fundraising milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Point threshold at which this goal counts as completed.
    pub points: f64,
    /// Headline shown on the goal card.
    #[serde(rename = "text")]
    pub label: String,
    /// Optional second line under the headline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
}

impl Goal {
    pub fn new(points: f64, label: impl Into<String>) -> Self {
        Self {
            points,
            label: label.into(),
            subtext: None,
        }
    }

    pub fn with_subtext(mut self, subtext: impl Into<String>) -> Self {
        self.subtext = Some(subtext.into());
        self
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("catalog must contain at least one goal")]
    Empty,

    #[error("goal {index} has a non-finite point threshold")]
    NonFinite { index: usize },

    #[error("goal {index} does not have a higher threshold than the goal before it")]
    NotAscending { index: usize },
}

/// Validated, immutable goal list sorted ascending by threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    goals: Vec<Goal>,
}

impl Catalog {
    pub fn new(goals: Vec<Goal>) -> Result<Self, CatalogError> {
        if goals.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (index, goal) in goals.iter().enumerate() {
            if !goal.points.is_finite() {
                return Err(CatalogError::NonFinite { index });
            }
            if index > 0 && goal.points <= goals[index - 1].points {
                return Err(CatalogError::NotAscending { index });
            }
        }

        Ok(Self { goals })
    }

    /// Number of goals; always at least one.
    pub fn len(&self) -> usize {
        self.goals.len()
    }

    /// Always `false`; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Goal> {
        self.goals.get(index)
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Highest index whose threshold is `<= points`, or `None` if the total
    /// has not reached the first goal.
    ///
    /// Non-decreasing in `points`.
    pub fn calculate_done_index(&self, points: f64) -> DoneIndex {
        self.goals
            .partition_point(|goal| goal.points <= points)
            .checked_sub(1)
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let goals = Vec::<Goal>::deserialize(deserializer)?;
        Catalog::new(goals).map_err(serde::de::Error::custom)
    }
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
