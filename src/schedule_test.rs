use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;

fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Task) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let log_for_task = Rc::clone(&log);
    let make = move |label: &'static str| -> Task {
        let log = Rc::clone(&log_for_task);
        Box::new(move || log.borrow_mut().push(label))
    };
    (log, make)
}

// =============================================================
// ManualScheduler
// =============================================================

#[test]
fn nothing_runs_before_advance() {
    let scheduler = ManualScheduler::new();
    let (log, task) = recorder();
    scheduler.schedule(0, task("a"));
    assert!(log.borrow().is_empty());
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn task_runs_exactly_at_due_time() {
    let scheduler = ManualScheduler::new();
    let (log, task) = recorder();
    scheduler.schedule(200, task("a"));

    scheduler.advance(199);
    assert!(log.borrow().is_empty());

    scheduler.advance(1);
    assert_eq!(*log.borrow(), vec!["a"]);
    assert_eq!(scheduler.now_ms(), 200);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn tasks_run_in_due_order_then_schedule_order() {
    let scheduler = ManualScheduler::new();
    let (log, task) = recorder();
    scheduler.schedule(30, task("late"));
    scheduler.schedule(10, task("first"));
    scheduler.schedule(10, task("second"));

    scheduler.advance(100);
    assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
}

#[test]
fn cancelled_task_never_runs() {
    let scheduler = ManualScheduler::new();
    let (log, task) = recorder();
    let handle = scheduler.schedule(50, task("a"));
    scheduler.cancel(handle);

    scheduler.advance(1_000);
    assert!(log.borrow().is_empty());
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn cancel_after_run_is_noop() {
    let scheduler = ManualScheduler::new();
    let (log, task) = recorder();
    let handle = scheduler.schedule(5, task("a"));
    scheduler.advance(5);
    scheduler.cancel(handle);
    assert_eq!(*log.borrow(), vec!["a"]);
}

#[test]
fn clock_reads_due_time_inside_task() {
    let scheduler = Rc::new(ManualScheduler::new());
    let seen = Rc::new(RefCell::new(None));
    {
        let scheduler_in_task = Rc::clone(&scheduler);
        let seen = Rc::clone(&seen);
        scheduler.schedule(
            75,
            Box::new(move || {
                *seen.borrow_mut() = Some(scheduler_in_task.now_ms());
            }),
        );
    }
    scheduler.advance(500);
    assert_eq!(*seen.borrow(), Some(75));
    assert_eq!(scheduler.now_ms(), 500);
}

#[test]
fn task_scheduled_from_task_runs_within_window() {
    let scheduler = Rc::new(ManualScheduler::new());
    let (log, task) = recorder();
    let task = Rc::new(task);
    {
        let scheduler_in_task = Rc::clone(&scheduler);
        let task = Rc::clone(&task);
        scheduler.schedule(
            10,
            Box::new(move || {
                scheduler_in_task.schedule(10, (*task)("chained"));
            }),
        );
    }

    scheduler.advance(15);
    assert!(log.borrow().is_empty());
    scheduler.advance(5);
    assert_eq!(*log.borrow(), vec!["chained"]);
}

#[test]
fn rc_scheduler_delegates() {
    let scheduler = Rc::new(ManualScheduler::new());
    let (log, task) = recorder();
    let handle = Scheduler::schedule(&scheduler, 1, task("a"));
    Scheduler::cancel(&scheduler, handle);
    scheduler.advance(1);
    assert!(log.borrow().is_empty());
}
