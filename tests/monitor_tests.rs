use std::sync::Arc;
use std::time::Duration;

use gridlink::monitor::{CountingMonitor, StatusMonitor};
use gridlink::JobStatus;

#[test]
fn waiter_is_released_by_a_producer_update() {
    let monitor = Arc::new(StatusMonitor::new(JobStatus::Pending, |s: &JobStatus| {
        !s.is_terminal()
    }));

    let waiter = {
        let monitor = Arc::clone(&monitor);
        std::thread::spawn(move || {
            monitor.wait();
            monitor.peek(|s| *s)
        })
    };

    std::thread::sleep(Duration::from_millis(30));
    monitor.update(|s| *s = JobStatus::Started);
    std::thread::sleep(Duration::from_millis(30));
    assert!(!waiter.is_finished(), "non-terminal update must not release");

    monitor.update(|s| *s = JobStatus::Succeeded);
    assert_eq!(waiter.join().unwrap(), JobStatus::Succeeded);
}

#[test]
fn fire_from_an_unrelated_thread_only_triggers_a_recheck() {
    let monitor = Arc::new(StatusMonitor::new(0u32, |n: &u32| *n < 1));

    let waiter = {
        let monitor = Arc::clone(&monitor);
        std::thread::spawn(move || monitor.wait())
    };

    let firer = {
        let monitor = Arc::clone(&monitor);
        std::thread::spawn(move || {
            for _ in 0..10 {
                monitor.fire();
                std::thread::sleep(Duration::from_millis(2));
            }
        })
    };
    firer.join().unwrap();
    assert!(!waiter.is_finished(), "bare fires must not release the waiter");

    monitor.update(|n| *n = 1);
    waiter.join().unwrap();
}

#[test]
fn multiple_waiters_all_release() {
    let monitor = Arc::new(StatusMonitor::new(false, |done: &bool| !*done));

    let waiters: Vec<_> = (0..4)
        .map(|_| {
            let monitor = Arc::clone(&monitor);
            std::thread::spawn(move || monitor.wait())
        })
        .collect();

    std::thread::sleep(Duration::from_millis(30));
    monitor.update(|done| *done = true);
    for waiter in waiters {
        waiter.join().unwrap();
    }
}

#[test]
fn counting_monitor_limit_of_three() {
    let monitor = CountingMonitor::new((), 3, |_: &()| true);

    assert!(!monitor.increment(), "1st cycle should continue");
    assert!(!monitor.increment(), "2nd cycle should continue");
    assert!(monitor.increment(), "3rd cycle reaches the limit");
    assert!(monitor.increment(), "4th cycle still reports the limit");
}

#[test]
fn counting_monitor_releases_waiter_at_the_limit() {
    let monitor = Arc::new(CountingMonitor::new((), 2, |_: &()| true));

    let waiter = {
        let monitor = Arc::clone(&monitor);
        std::thread::spawn(move || monitor.wait())
    };

    std::thread::sleep(Duration::from_millis(30));
    monitor.increment();
    std::thread::sleep(Duration::from_millis(30));
    assert!(!waiter.is_finished());

    monitor.increment();
    waiter.join().unwrap();
}

#[test]
fn limit_bounds_a_polling_loop_independent_of_the_job() {
    // The job never finishes; the waiter still stops after 5 cycles.
    let monitor = CountingMonitor::new(JobStatus::Started, 5, |s: &JobStatus| !s.is_terminal());

    let mut cycles = 0;
    while monitor.should_continue() {
        if monitor.increment() {
            break;
        }
        cycles += 1;
    }
    assert_eq!(cycles, 4);
    assert_eq!(monitor.cycles(), 5);
    assert_eq!(monitor.into_inner(), JobStatus::Started);
}
