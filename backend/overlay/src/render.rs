//! Renderer — applies a [`Projection`] to a board of reusable goal elements
//! and serialises the board as an HTML fragment and a JSON view.
//!
//! Elements are keyed by goal index, so a goal that stays visible across
//! render passes keeps its element and only its attributes change. The
//! browser side only needs CSS for the `data-state` / `data-move` values.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use goal_scroller::{Catalog, Goal, LifecycleState, Progress, Projection, Slot, Transition};
use serde::Serialize;

/// Text shown for a total that could not be fetched.
pub const UNKNOWN_TOTAL: &str = "?";

/// Render target contract: one call per visible slot, then the set of slots
/// that remain visible.
pub trait SlotTarget {
    fn apply(&mut self, goal: &Goal, slot: &Slot);
    fn retain(&mut self, visible: &[usize]);
}

/// One goal element on the overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalElement {
    pub goal_index: usize,
    pub label: String,
    pub subtext: Option<String>,
    pub points: f64,
    pub state: LifecycleState,
    #[serde(rename = "move")]
    pub transition: Option<Transition>,
    pub order: usize,
}

/// In-memory element container, ordered by goal index.
#[derive(Debug, Clone, Default)]
pub struct SlotBoard {
    elements: BTreeMap<usize, GoalElement>,
    created: u64,
}

impl SlotBoard {
    pub fn elements(&self) -> impl Iterator<Item = &GoalElement> {
        self.elements.values()
    }

    /// Number of elements ever created; stays flat while elements are reused.
    pub fn created(&self) -> u64 {
        self.created
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn to_html(&self, phase: &str) -> String {
        let mut html = String::new();
        let _ = writeln!(html, r#"<ol class="goals" data-phase="{phase}">"#);
        for el in self.elements.values() {
            let _ = write!(
                html,
                r#"  <li class="goal" data-goal="{}" data-state="{}""#,
                el.goal_index,
                el.state.as_str()
            );
            if let Some(transition) = el.transition {
                let _ = write!(html, r#" data-move="{}""#, transition.as_str());
            }
            let _ = write!(
                html,
                r#" style="order: {}"><span class="label">{}</span>"#,
                el.order,
                escape_html(&el.label)
            );
            if let Some(subtext) = &el.subtext {
                let _ = write!(html, r#"<span class="subtext">{}</span>"#, escape_html(subtext));
            }
            let _ = writeln!(
                html,
                r#"<span class="points">{}</span></li>"#,
                format_total(Some(el.points))
            );
        }
        html.push_str("</ol>\n");
        html
    }
}

impl SlotTarget for SlotBoard {
    fn apply(&mut self, goal: &Goal, slot: &Slot) {
        let created = &mut self.created;
        let element = self.elements.entry(slot.goal_index).or_insert_with(|| {
            *created += 1;
            GoalElement {
                goal_index: slot.goal_index,
                label: goal.label.clone(),
                subtext: goal.subtext.clone(),
                points: goal.points,
                state: slot.state,
                transition: None,
                order: slot.display_position,
            }
        });
        element.state = slot.state;
        element.transition = slot.transition;
        element.order = slot.display_position;
    }

    fn retain(&mut self, visible: &[usize]) {
        self.elements.retain(|index, _| visible.contains(index));
    }
}

/// Push one projection into `target`.
pub fn render(catalog: &Catalog, projection: &Projection, target: &mut impl SlotTarget) {
    let visible: Vec<usize> = projection
        .slots
        .iter()
        .filter_map(|slot| {
            let goal = catalog.get(slot.goal_index)?;
            target.apply(goal, slot);
            Some(slot.goal_index)
        })
        .collect();
    target.retain(&visible);
}

// ─────────────────────────────────────────────────────────
// Views
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayStatus {
    Ok,
    InvalidKey,
}

/// JSON rendering of the overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayView {
    pub status: OverlayStatus,
    pub total: Option<f64>,
    pub total_text: String,
    pub phase: Option<&'static str>,
    pub goals: Vec<GoalElement>,
}

impl OverlayView {
    pub fn build(progress: Progress, phase: &'static str, board: &SlotBoard) -> Self {
        Self {
            status: OverlayStatus::Ok,
            total: progress.total(),
            total_text: format_progress(progress),
            phase: Some(phase),
            goals: board.elements().cloned().collect(),
        }
    }

    pub fn invalid_key() -> Self {
        Self {
            status: OverlayStatus::InvalidKey,
            total: None,
            total_text: "Invalid key".to_string(),
            phase: None,
            goals: Vec::new(),
        }
    }
}

pub fn format_progress(progress: Progress) -> String {
    match progress {
        Progress::Pending => "…".to_string(),
        Progress::Failed => format_total(None),
        Progress::Total(total) => format_total(Some(total)),
    }
}

/// Whole points with thousands separators, or the unknown sentinel.
pub fn format_total(total: Option<f64>) -> String {
    let Some(total) = total else {
        return UNKNOWN_TOTAL.to_string();
    };
    let rounded = total.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
