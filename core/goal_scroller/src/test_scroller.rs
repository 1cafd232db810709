use std::time::Duration;

use crate::invariants::{assert_all_projection_invariants, assert_single_step};
use crate::{project, AnimationTiming, Catalog, Goal, Phase, Progress, Scroller, Step};

fn catalog() -> Catalog {
    Catalog::new(
        [100.0, 200.0, 300.0, 400.0, 500.0, 600.0, 700.0]
            .iter()
            .enumerate()
            .map(|(i, p)| Goal::new(*p, format!("Goal #{i}")))
            .collect(),
    )
    .unwrap()
}

/// Advance until the scroller is static and on target, firing every armed
/// timer immediately. Returns every phase visited.
fn drive(scroller: &mut Scroller, catalog: &Catalog, progress: Progress) -> Vec<Phase> {
    let mut visited = Vec::new();
    loop {
        let before = scroller.phase().done_index();
        match scroller.advance(catalog, progress) {
            Step::Animating { phase, .. } => {
                assert_single_step(before, phase.done_index());
                assert_all_projection_invariants(&project(phase, catalog.len()));
                visited.push(phase);
                scroller.timer_expired();
            }
            Step::Settled(phase) => {
                assert_all_projection_invariants(&project(phase, catalog.len()));
                visited.push(phase);
            }
            Step::Idle | Step::NoData => return visited,
            Step::Blocked => panic!("timer was expired but scroller is still blocked"),
        }
    }
}

#[test]
fn test_starts_static_with_nothing_done() {
    let scroller = Scroller::default();
    assert_eq!(scroller.phase(), Phase::Static(None));
    assert!(!scroller.is_armed());
}

#[test]
fn test_idle_when_on_target() {
    let catalog = catalog();
    let mut scroller = Scroller::default();
    assert_eq!(scroller.advance(&catalog, Progress::Total(50.0)), Step::Idle);
    assert_eq!(scroller.phase(), Phase::Static(None));
}

#[test]
fn test_animating_arms_timer_with_margin() {
    let catalog = catalog();
    let timing = AnimationTiming {
        transition: Duration::from_millis(500),
        margin: Duration::from_millis(50),
    };
    let mut scroller = Scroller::new(timing);

    let step = scroller.advance(&catalog, Progress::Total(150.0));
    assert_eq!(
        step,
        Step::Animating {
            phase: Phase::UpwardBegin(Some(0)),
            duration: Duration::from_millis(550),
        }
    );
    assert!(scroller.is_armed());
}

#[test]
fn test_advance_while_armed_is_noop() {
    let catalog = catalog();
    let mut scroller = Scroller::default();
    scroller.advance(&catalog, Progress::Total(150.0));
    let phase = scroller.phase();

    for total in [150.0, 999.0, 0.0] {
        assert_eq!(scroller.advance(&catalog, Progress::Total(total)), Step::Blocked);
        assert_eq!(scroller.advance(&catalog, Progress::Failed), Step::Blocked);
        assert_eq!(scroller.phase(), phase);
        assert!(scroller.is_armed());
    }
}

#[test]
fn test_jump_plays_every_goal_in_order() {
    let catalog = catalog();
    let mut scroller = Scroller::default();

    let visited = drive(&mut scroller, &catalog, Progress::Total(520.0));

    let mut expected = Vec::new();
    for d in 0..=4 {
        expected.push(Phase::UpwardBegin(Some(d)));
        expected.push(Phase::UpwardMoving(Some(d)));
        expected.push(Phase::UpwardEnd(Some(d)));
        expected.push(Phase::Static(Some(d)));
    }
    assert_eq!(visited, expected);
    assert_eq!(scroller.phase(), Phase::Static(Some(4)));
}

#[test]
fn test_regression_steps_down_one_goal_at_a_time() {
    let catalog = catalog();
    let mut scroller = Scroller::default();
    drive(&mut scroller, &catalog, Progress::Total(400.0));
    assert_eq!(scroller.phase(), Phase::Static(Some(3)));

    let visited = drive(&mut scroller, &catalog, Progress::Total(210.0));
    assert_eq!(
        visited,
        vec![
            Phase::DownwardBegin(Some(3)),
            Phase::DownwardMoving(Some(3)),
            Phase::DownwardEnd(Some(2)),
            Phase::Static(Some(2)),
            Phase::DownwardBegin(Some(2)),
            Phase::DownwardMoving(Some(2)),
            Phase::DownwardEnd(Some(1)),
            Phase::Static(Some(1)),
        ]
    );
}

#[test]
fn test_regression_below_first_goal_reaches_none() {
    let catalog = catalog();
    let mut scroller = Scroller::default();
    drive(&mut scroller, &catalog, Progress::Total(100.0));
    assert_eq!(scroller.phase(), Phase::Static(Some(0)));

    let visited = drive(&mut scroller, &catalog, Progress::Total(10.0));
    assert_eq!(
        visited,
        vec![
            Phase::DownwardBegin(Some(0)),
            Phase::DownwardMoving(Some(0)),
            Phase::DownwardEnd(None),
            Phase::Static(None),
        ]
    );
}

#[test]
fn test_end_settles_without_chaining() {
    let catalog = catalog();
    let mut scroller = Scroller::default();
    let progress = Progress::Total(350.0);

    for _ in 0..3 {
        assert!(matches!(
            scroller.advance(&catalog, progress),
            Step::Animating { .. }
        ));
        scroller.timer_expired();
    }
    assert_eq!(scroller.phase(), Phase::UpwardEnd(Some(0)));

    assert_eq!(
        scroller.advance(&catalog, progress),
        Step::Settled(Phase::Static(Some(0)))
    );
    assert!(!scroller.is_armed());

    // The next goal starts on the following tick.
    assert_eq!(
        scroller.advance(&catalog, progress),
        Step::Animating {
            phase: Phase::UpwardBegin(Some(1)),
            duration: scroller.timing().phase_duration(),
        }
    );
}

#[test]
fn test_failed_fetch_leaves_phase_untouched() {
    let catalog = catalog();
    let mut scroller = Scroller::default();
    drive(&mut scroller, &catalog, Progress::Total(300.0));
    let settled = scroller.phase();

    for _ in 0..10 {
        assert_eq!(scroller.advance(&catalog, Progress::Failed), Step::NoData);
        assert_eq!(scroller.phase(), settled);
    }

    // Mid-animation, with the timer already expired.
    scroller.advance(&catalog, Progress::Total(450.0));
    scroller.timer_expired();
    let mid = scroller.phase();
    assert_eq!(mid, Phase::UpwardBegin(Some(3)));
    for _ in 0..10 {
        assert_eq!(scroller.advance(&catalog, Progress::Failed), Step::NoData);
        assert_eq!(scroller.phase(), mid);
    }
}

#[test]
fn test_pending_progress_is_no_data() {
    let catalog = catalog();
    let mut scroller = Scroller::default();
    assert_eq!(scroller.advance(&catalog, Progress::Pending), Step::NoData);
    assert_eq!(scroller.phase(), Phase::Static(None));
}

#[test]
fn test_target_change_mid_animation_applies_after_cycle() {
    let catalog = catalog();
    let mut scroller = Scroller::default();

    scroller.advance(&catalog, Progress::Total(150.0));
    // A correction arrives while the upward animation is running.
    let corrected = Progress::Total(20.0);
    assert_eq!(scroller.advance(&catalog, corrected), Step::Blocked);
    scroller.timer_expired();

    let visited = drive(&mut scroller, &catalog, corrected);
    assert_eq!(
        visited,
        vec![
            Phase::UpwardMoving(Some(0)),
            Phase::UpwardEnd(Some(0)),
            Phase::Static(Some(0)),
            Phase::DownwardBegin(Some(0)),
            Phase::DownwardMoving(Some(0)),
            Phase::DownwardEnd(None),
            Phase::Static(None),
        ]
    );
}

#[test]
fn test_reset_returns_to_initial_state() {
    let catalog = catalog();
    let mut scroller = Scroller::default();
    scroller.advance(&catalog, Progress::Total(250.0));
    assert!(scroller.is_armed());

    scroller.reset();
    assert_eq!(scroller.phase(), Phase::Static(None));
    assert!(!scroller.is_armed());
}

#[test]
fn test_last_goal_reached() {
    let catalog = catalog();
    let mut scroller = Scroller::default();
    drive(&mut scroller, &catalog, Progress::Total(10_000.0));
    assert_eq!(scroller.phase(), Phase::Static(Some(6)));
}
