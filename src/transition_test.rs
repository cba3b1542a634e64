use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;
use crate::schedule::ManualScheduler;
use crate::visibility::ManualSource;

const DELAY: u32 = 200;

/// Records every applied mode with the virtual time it was applied at, for two
/// coupled targets.
struct RecordingSink {
    clock: Rc<ManualScheduler>,
    applied: RefCell<Vec<(u64, Mode)>>,
    document: RefCell<Mode>,
    region: RefCell<Mode>,
}

impl RecordingSink {
    fn new(clock: Rc<ManualScheduler>) -> Self {
        Self {
            clock,
            applied: RefCell::new(Vec::new()),
            document: RefCell::new(Mode::Light),
            region: RefCell::new(Mode::Light),
        }
    }

    fn applied(&self) -> Vec<(u64, Mode)> {
        self.applied.borrow().clone()
    }

    fn targets(&self) -> (Mode, Mode) {
        (*self.document.borrow(), *self.region.borrow())
    }

    fn ever_dark(&self) -> bool {
        self.applied.borrow().iter().any(|(_, mode)| mode.is_dark())
    }
}

impl ModeSink for RecordingSink {
    fn apply(&self, mode: Mode) {
        self.applied.borrow_mut().push((self.clock.now_ms(), mode));
        *self.document.borrow_mut() = mode;
        *self.region.borrow_mut() = mode;
    }
}

type Controller = SectionTransition<Rc<ManualScheduler>, Rc<RecordingSink>>;

fn setup() -> (Rc<ManualScheduler>, Rc<RecordingSink>, Controller) {
    let clock = Rc::new(ManualScheduler::new());
    let sink = Rc::new(RecordingSink::new(Rc::clone(&clock)));
    let controller = SectionTransition::new(Rc::clone(&clock), Rc::clone(&sink), DELAY);
    (clock, sink, controller)
}

// =============================================================
// Initial state
// =============================================================

#[test]
fn starts_off_without_touching_targets() {
    let (clock, sink, controller) = setup();
    assert_eq!(controller.phase(), Phase::Off);
    assert_eq!(controller.mode(), Mode::Light);
    assert_eq!(controller.delay_ms(), DELAY);
    assert!(sink.applied().is_empty());
    assert_eq!(clock.pending(), 0);
}

// =============================================================
// Entering the region
// =============================================================

#[test]
fn visible_arms_a_timer_without_committing() {
    let (clock, sink, controller) = setup();
    controller.on_visibility(true);

    assert_eq!(controller.phase(), Phase::Pending);
    assert_eq!(clock.pending(), 1);
    assert!(sink.applied().is_empty());
}

#[test]
fn commits_dark_exactly_when_delay_elapses() {
    let (clock, sink, controller) = setup();
    controller.on_visibility(true);

    clock.advance(u64::from(DELAY) - 1);
    assert_eq!(controller.phase(), Phase::Pending);
    assert!(!sink.ever_dark());

    clock.advance(1);
    assert_eq!(controller.phase(), Phase::On);
    assert_eq!(sink.applied(), vec![(200, Mode::Dark)]);
    assert_eq!(sink.targets(), (Mode::Dark, Mode::Dark));
    assert_eq!(clock.pending(), 0);
}

#[test]
fn stays_on_while_no_further_signal_arrives() {
    let (clock, sink, controller) = setup();
    controller.on_visibility(true);
    clock.advance(10_000);
    assert_eq!(controller.phase(), Phase::On);
    assert_eq!(sink.applied().len(), 1);
}

// =============================================================
// Rapid enter / exit
// =============================================================

#[test]
fn exit_within_delay_never_commits_dark() {
    let (clock, sink, controller) = setup();
    controller.on_visibility(true);
    clock.advance(150);
    controller.on_visibility(false);

    assert_eq!(controller.phase(), Phase::Off);
    assert_eq!(clock.pending(), 0);

    clock.advance(10_000);
    assert!(!sink.ever_dark());
    assert_eq!(sink.applied(), vec![(150, Mode::Light)]);
}

#[test]
fn exit_one_tick_before_commit_is_still_suppressed() {
    let (clock, sink, controller) = setup();
    controller.on_visibility(true);
    clock.advance(u64::from(DELAY) - 1);
    controller.on_visibility(false);
    clock.advance(1_000);
    assert!(!sink.ever_dark());
}

#[test]
fn flicker_sequence_never_commits() {
    let (clock, sink, controller) = setup();
    for _ in 0..20 {
        controller.on_visibility(true);
        clock.advance(50);
        controller.on_visibility(false);
        clock.advance(50);
    }
    clock.advance(1_000);
    assert!(!sink.ever_dark());
    assert_eq!(controller.phase(), Phase::Off);
}

// =============================================================
// Exiting the region
// =============================================================

#[test]
fn exit_from_on_is_immediate() {
    let (clock, sink, controller) = setup();
    controller.on_visibility(true);
    clock.advance(u64::from(DELAY));
    assert_eq!(controller.phase(), Phase::On);

    clock.advance(500);
    controller.on_visibility(false);

    assert_eq!(controller.phase(), Phase::Off);
    assert_eq!(sink.targets(), (Mode::Light, Mode::Light));
    assert_eq!(sink.applied(), vec![(200, Mode::Dark), (700, Mode::Light)]);
}

#[test]
fn exit_while_off_reapplies_light() {
    let (_clock, sink, controller) = setup();
    controller.on_visibility(false);
    assert_eq!(controller.phase(), Phase::Off);
    assert_eq!(sink.applied(), vec![(0, Mode::Light)]);
}

// =============================================================
// Repeated entry
// =============================================================

#[test]
fn repeated_visible_keeps_a_single_live_timer() {
    let (clock, sink, controller) = setup();
    controller.on_visibility(true);
    clock.advance(100);
    controller.on_visibility(true);
    clock.advance(100);
    controller.on_visibility(true);

    assert_eq!(clock.pending(), 1);

    clock.advance(u64::from(DELAY) - 1);
    assert!(!sink.ever_dark());
    clock.advance(1);
    assert_eq!(sink.applied(), vec![(400, Mode::Dark)]);
}

#[test]
fn visible_while_on_rearms_and_recommits() {
    let (clock, sink, controller) = setup();
    controller.on_visibility(true);
    clock.advance(u64::from(DELAY));
    controller.on_visibility(true);

    assert_eq!(controller.phase(), Phase::Pending);
    assert_eq!(controller.mode(), Mode::Dark);

    clock.advance(u64::from(DELAY));
    assert_eq!(controller.phase(), Phase::On);
    assert_eq!(sink.applied(), vec![(200, Mode::Dark), (400, Mode::Dark)]);
}

#[test]
fn reentry_after_exit_commits_after_fresh_delay() {
    let (clock, sink, controller) = setup();
    controller.on_visibility(true);
    clock.advance(100);
    controller.on_visibility(false);
    clock.advance(20);
    controller.on_visibility(true);
    clock.advance(u64::from(DELAY));

    assert_eq!(sink.applied(), vec![(100, Mode::Light), (320, Mode::Dark)]);
}

// =============================================================
// Settled state always follows the last signal
// =============================================================

#[test]
fn settled_mode_matches_last_signal() {
    let gaps: [&[(bool, u64)]; 4] = [
        &[(true, 10), (false, 10), (true, 10)],
        &[(true, 300), (false, 5)],
        &[(false, 0), (true, 199), (true, 1)],
        &[(true, 0), (false, 0), (false, 0)],
    ];
    for sequence in gaps {
        let (clock, sink, controller) = setup();
        for &(visible, wait) in sequence {
            controller.on_visibility(visible);
            assert!(clock.pending() <= 1);
            clock.advance(wait);
        }
        clock.advance(u64::from(DELAY));

        let last = sequence.last().map_or(false, |(visible, _)| *visible);
        let expected = if last { Mode::Dark } else { Mode::Light };
        assert_eq!(controller.mode(), expected, "sequence {sequence:?}");
        let (document, region) = sink.targets();
        assert_eq!(document, region);
    }
}

// =============================================================
// Subscription lifecycle
// =============================================================

#[test]
fn watch_delivers_source_signals() {
    let (clock, sink, controller) = setup();
    let source = ManualSource::new();
    let Ok(_subscription) = controller.watch(&source);

    source.emit(true);
    clock.advance(u64::from(DELAY));
    assert_eq!(sink.targets(), (Mode::Dark, Mode::Dark));

    source.emit(false);
    assert_eq!(sink.targets(), (Mode::Light, Mode::Light));
}

#[test]
fn dropping_subscription_stops_watching() {
    let (clock, sink, controller) = setup();
    let source = ManualSource::new();
    let Ok(subscription) = controller.watch(&source);
    drop(subscription);

    source.emit(true);
    clock.advance(1_000);
    assert!(sink.applied().is_empty());
    assert_eq!(controller.phase(), Phase::Off);
}

#[test]
fn dropped_controller_leaves_pending_timer_inert() {
    let (clock, sink, controller) = setup();
    let source = ManualSource::new();
    let Ok(_subscription) = controller.watch(&source);

    source.emit(true);
    drop(controller);
    clock.advance(1_000);
    source.emit(false);

    assert!(sink.applied().is_empty());
}

#[test]
fn independent_controllers_do_not_share_state() {
    let clock = Rc::new(ManualScheduler::new());
    let first_sink = Rc::new(RecordingSink::new(Rc::clone(&clock)));
    let second_sink = Rc::new(RecordingSink::new(Rc::clone(&clock)));
    let first = SectionTransition::new(Rc::clone(&clock), Rc::clone(&first_sink), DELAY);
    let second = SectionTransition::new(Rc::clone(&clock), Rc::clone(&second_sink), DELAY);

    first.on_visibility(true);
    second.on_visibility(true);
    clock.advance(50);
    second.on_visibility(false);
    clock.advance(u64::from(DELAY));

    assert_eq!(first.phase(), Phase::On);
    assert_eq!(second.phase(), Phase::Off);
    assert!(!second_sink.ever_dark());
}
