#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;

fn log() -> Rc<RefCell<Vec<String>>> {
    Rc::new(RefCell::new(Vec::new()))
}

#[test]
fn effect_runs_immediately_and_once_per_write() {
    let rt = Runtime::new();
    let count = rt.signal(0);
    let seen = log();

    let effect = rt.create_effect({
        let count = count.clone();
        let seen = Rc::clone(&seen);
        move || seen.borrow_mut().push(format!("count={}", count.get()))
    });

    count.set(1);
    count.set(2);
    assert_eq!(*seen.borrow(), vec!["count=0", "count=1", "count=2"]);
    assert_eq!(effect.run_count(), 3);
}

#[test]
fn writing_the_same_value_still_notifies() {
    let rt = Runtime::new();
    let flag = rt.signal(true);
    let runs = Rc::new(Cell::new(0));

    let _effect = rt.create_effect({
        let flag = flag.clone();
        let runs = Rc::clone(&runs);
        move || {
            flag.get();
            runs.set(runs.get() + 1);
        }
    });

    flag.set(true);
    flag.set(true);
    assert_eq!(runs.get(), 3);
}

#[test]
fn effect_subscribes_once_per_signal() {
    let rt = Runtime::new();
    let x = rt.signal(1);
    let runs = Rc::new(Cell::new(0));

    let _effect = rt.create_effect({
        let x = x.clone();
        let runs = Rc::clone(&runs);
        move || {
            let _ = x.get() + x.get() + x.get();
            runs.set(runs.get() + 1);
        }
    });

    assert_eq!(x.subscriber_count(), 1);
    x.set(2);
    assert_eq!(runs.get(), 2);
}

#[test]
fn split_signal_halves_share_the_value() {
    let rt = Runtime::new();
    let (read, write) = rt.create_signal(String::from("a"));
    write.update(|s| s.push('b'));
    assert_eq!(read.get(), "ab");
    write.set(String::from("z"));
    assert_eq!(read.with(String::len), 1);
}

#[test]
fn listeners_receive_the_new_value_in_subscription_order() {
    let rt = Runtime::new();
    let name = rt.signal("x");
    let seen = log();

    let first = name.subscribe({
        let seen = Rc::clone(&seen);
        move |v| seen.borrow_mut().push(format!("first:{v}"))
    });
    name.subscribe({
        let seen = Rc::clone(&seen);
        move |v| seen.borrow_mut().push(format!("second:{v}"))
    });

    name.set("y");
    assert!(name.unsubscribe(first));
    assert!(!name.unsubscribe(first));
    name.set("z");

    assert_eq!(*seen.borrow(), vec!["first:y", "second:y", "second:z"]);
}

#[test]
fn untracked_reads_do_not_subscribe() {
    let rt = Runtime::new();
    let tracked = rt.signal(0);
    let ignored = rt.signal(0);
    let runs = Rc::new(Cell::new(0));

    let _effect = rt.create_effect({
        let rt = rt.clone();
        let tracked = tracked.clone();
        let ignored = ignored.clone();
        let runs = Rc::clone(&runs);
        move || {
            tracked.get();
            rt.untrack(|| ignored.get());
            ignored.get_untracked();
            runs.set(runs.get() + 1);
        }
    });

    ignored.set(1);
    assert_eq!(runs.get(), 1);
    tracked.set(1);
    assert_eq!(runs.get(), 2);
    assert_eq!(ignored.subscriber_count(), 0);
}

#[test]
fn nested_effect_restores_the_outer_observer() {
    let rt = Runtime::new();
    let outer_input = rt.signal(0);
    let inner_input = rt.signal(0);
    let outer_runs = Rc::new(Cell::new(0));
    let inner_effects = Rc::new(RefCell::new(Vec::new()));

    let _outer = rt.create_effect({
        let rt = rt.clone();
        let outer_input = outer_input.clone();
        let inner_input = inner_input.clone();
        let outer_runs = Rc::clone(&outer_runs);
        let inner_effects = Rc::clone(&inner_effects);
        move || {
            outer_runs.set(outer_runs.get() + 1);
            let inner_input = inner_input.clone();
            let inner = rt.create_effect(move || {
                inner_input.get();
            });
            inner_effects.borrow_mut().push(inner);
            // Read after the inner effect finished: must subscribe the outer one.
            outer_input.get();
        }
    });

    inner_input.set(1);
    assert_eq!(outer_runs.get(), 1);
    outer_input.set(1);
    assert_eq!(outer_runs.get(), 2);
}

#[test]
fn observer_is_restored_after_a_panic() {
    let rt = Runtime::new();
    let signal = rt.signal(0);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _effect = rt.create_effect(|| panic!("boom"));
    }));
    assert!(result.is_err());

    // No observer left behind: this read must not subscribe anything.
    signal.get();
    assert_eq!(signal.subscriber_count(), 0);
}

#[test]
fn batch_coalesces_writes_in_first_write_order() {
    let rt = Runtime::new();
    let a = rt.signal(0);
    let b = rt.signal(0);
    let seen = log();

    for (name, signal) in [("a", a.clone()), ("b", b.clone())] {
        let seen = Rc::clone(&seen);
        signal.subscribe(move |v| seen.borrow_mut().push(format!("{name}={v}")));
    }

    let result = rt.batch(|| {
        b.set(1);
        a.set(1);
        rt.batch(|| b.set(2));
        assert!(seen.borrow().is_empty());
        a.set(3);
        "done"
    });

    assert_eq!(result, "done");
    assert!(!rt.is_batching());
    assert_eq!(*seen.borrow(), vec!["b=2", "a=3"]);
}

#[test]
fn effect_runs_once_for_a_batched_pair_of_writes() {
    let rt = Runtime::new();
    let first = rt.signal("Ada");
    let last = rt.signal("Lovelace");
    let seen = log();

    let _effect = rt.create_effect({
        let first = first.clone();
        let last = last.clone();
        let seen = Rc::clone(&seen);
        move || {
            let full = format!("{} {}", first.get(), last.get());
            seen.borrow_mut().push(full);
        }
    });

    rt.batch(|| {
        first.set("Grace");
        last.set("Hopper");
    });

    // One run per written signal, the first already sees both writes.
    assert_eq!(
        *seen.borrow(),
        vec!["Ada Lovelace", "Grace Hopper", "Grace Hopper"]
    );
}

#[test]
fn dropped_effects_stop_running_and_are_pruned() {
    let rt = Runtime::new();
    let signal = rt.signal(0);
    let runs = Rc::new(Cell::new(0));

    let effect = rt.create_effect({
        let signal = signal.clone();
        let runs = Rc::clone(&runs);
        move || {
            signal.get();
            runs.set(runs.get() + 1);
        }
    });
    assert_eq!(signal.subscriber_count(), 1);

    drop(effect);
    signal.set(1);
    assert_eq!(runs.get(), 1);
    assert_eq!(signal.subscriber_count(), 0);
}

#[test]
fn disposed_effect_never_runs_again() {
    let rt = Runtime::new();
    let signal = rt.signal(0);
    let runs = Rc::new(Cell::new(0));

    let effect = rt.create_effect({
        let signal = signal.clone();
        let runs = Rc::clone(&runs);
        move || {
            signal.get();
            runs.set(runs.get() + 1);
        }
    });

    effect.dispose();
    assert!(effect.is_disposed());
    signal.set(1);
    effect.run();
    assert_eq!(runs.get(), 1);
}

#[test]
fn subscribers_added_during_notification_wait_for_the_next_write() {
    let rt = Runtime::new();
    let signal = rt.signal(0);
    let late_calls = Rc::new(Cell::new(0));
    let registered = Rc::new(Cell::new(false));

    signal.subscribe({
        let signal = signal.clone();
        let late_calls = Rc::clone(&late_calls);
        let registered = Rc::clone(&registered);
        move |_| {
            if !registered.replace(true) {
                let late_calls = Rc::clone(&late_calls);
                signal.subscribe(move |_| late_calls.set(late_calls.get() + 1));
            }
        }
    });

    signal.set(1);
    assert_eq!(late_calls.get(), 0);
    signal.set(2);
    assert_eq!(late_calls.get(), 1);
}

#[test]
fn memo_recomputes_only_when_inputs_change() {
    let rt = Runtime::new();
    let n = rt.signal(2);
    let parity = rt.create_memo({
        let n = n.clone();
        move || n.get() % 2 == 0
    });

    assert!(parity.get());
    assert_eq!(parity.compute_count(), 1);
    n.set(4);
    assert_eq!(parity.compute_count(), 2);
    assert!(parity.get());
    n.set(5);
    assert!(!parity.get());
    assert_eq!(parity.compute_count(), 3);
}

#[test]
fn memo_readers_skip_unchanged_results() {
    let rt = Runtime::new();
    let n = rt.signal(1);
    let positive = Rc::new(rt.create_memo({
        let n = n.clone();
        move || n.get() > 0
    }));
    let runs = Rc::new(Cell::new(0));

    let _effect = rt.create_effect({
        let positive = Rc::clone(&positive);
        let runs = Rc::clone(&runs);
        move || {
            positive.get();
            runs.set(runs.get() + 1);
        }
    });

    n.set(2);
    n.set(3);
    assert_eq!(runs.get(), 1);
    n.set(-1);
    assert_eq!(runs.get(), 2);
}

#[test]
fn microtasks_drain_fifo_including_nested() {
    let rt = Runtime::new();
    let seen = log();

    for name in ["a", "b"] {
        let rt_inner = rt.clone();
        let seen = Rc::clone(&seen);
        rt.queue_microtask(move || {
            seen.borrow_mut().push(name.to_string());
            let seen = Rc::clone(&seen);
            rt_inner.queue_microtask(move || seen.borrow_mut().push(format!("{name}'")));
        });
    }

    assert_eq!(rt.pending_microtasks(), 2);
    assert!(seen.borrow().is_empty());
    assert_eq!(rt.run_microtasks(), 4);
    assert_eq!(*seen.borrow(), vec!["a", "b", "a'", "b'"]);
    assert_eq!(rt.run_microtasks(), 0);
}

#[test]
fn runtimes_are_isolated() {
    let first = Runtime::new();
    let second = Runtime::new();
    let signal = second.signal(0);

    let _effect = first.create_effect({
        let signal = signal.clone();
        move || {
            signal.get();
        }
    });

    // The read happened under `first`, which `second` knows nothing about.
    assert_eq!(signal.subscriber_count(), 0);
}
