//! Property-based invariant tests for `ObservableValue`.
//!
//! A random script of subscribe / cancel / drop / set operations is run
//! against an observable while a plain model tracks which subscriptions
//! should still be live:
//!
//! 1. Every live subscriber sees every assignment exactly once, in order.
//! 2. Cancelled or dropped subscribers never see another assignment.
//! 3. Repeated cancels have no effect.
//! 4. `subscriber_count()` and `is_in_use()` match the model after every step.
//! 5. `subscribe` never replays the current value.
//! 6. `version()` counts assignments.

use archi_reactive::{ObservableValue, Subscription};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

// ── Strategies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Subscribe,
    Cancel(usize),
    Drop(usize),
    Set(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Subscribe),
        1 => any::<usize>().prop_map(Op::Cancel),
        1 => any::<usize>().prop_map(Op::Drop),
        3 => any::<i64>().prop_map(Op::Set),
    ]
}

fn script_strategy() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(op_strategy(), 1..=64)
}

// ── Model ─────────────────────────────────────────────────────────────────

struct Tracked {
    seen: Rc<RefCell<Vec<i64>>>,
    expected: Vec<i64>,
    handle: Option<Subscription>,
    live: bool,
}

fn run_script(script: &[Op]) -> Result<(), TestCaseError> {
    let obs = ObservableValue::new(0i64);
    let mut tracked: Vec<Tracked> = Vec::new();
    let mut assignments = 0u64;

    for op in script {
        match op {
            Op::Subscribe => {
                let seen = Rc::new(RefCell::new(Vec::new()));
                let seen_clone = Rc::clone(&seen);
                let handle = obs.subscribe(move |v| seen_clone.borrow_mut().push(*v));
                prop_assert!(seen.borrow().is_empty());
                tracked.push(Tracked {
                    seen,
                    expected: Vec::new(),
                    handle: Some(handle),
                    live: true,
                });
            }
            Op::Cancel(i) if !tracked.is_empty() => {
                let idx = i % tracked.len();
                if let Some(handle) = &tracked[idx].handle {
                    handle.cancel();
                    handle.cancel();
                    prop_assert!(!handle.is_active());
                }
                tracked[idx].live = false;
            }
            Op::Drop(i) if !tracked.is_empty() => {
                let idx = i % tracked.len();
                tracked[idx].handle = None;
                tracked[idx].live = false;
            }
            Op::Set(v) => {
                obs.set(*v);
                assignments += 1;
                for t in tracked.iter_mut().filter(|t| t.live) {
                    t.expected.push(*v);
                }
            }
            Op::Cancel(_) | Op::Drop(_) => {}
        }

        let live = tracked.iter().filter(|t| t.live).count();
        prop_assert_eq!(obs.subscriber_count(), live);
        prop_assert_eq!(obs.is_in_use(), live > 0);
        for t in &tracked {
            let seen = t.seen.borrow();
            prop_assert_eq!(&*seen, &t.expected);
        }
    }

    prop_assert_eq!(obs.version(), assignments);
    Ok(())
}

// ── Properties ────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn delivery_matches_live_set(script in script_strategy()) {
        run_script(&script)?;
    }

    #[test]
    fn fan_out_delivers_once_per_subscriber(count in 1usize..=32, values in proptest::collection::vec(any::<i32>(), 1..=16)) {
        let obs = ObservableValue::new(0i32);
        let hits = Rc::new(RefCell::new(vec![0usize; count]));
        let subs: Vec<Subscription> = (0..count)
            .map(|i| {
                let hits = Rc::clone(&hits);
                obs.subscribe(move |_| hits.borrow_mut()[i] += 1)
            })
            .collect();

        for v in &values {
            obs.set(*v);
        }

        prop_assert!(hits.borrow().iter().all(|&h| h == values.len()));
        drop(subs);
        prop_assert!(!obs.is_in_use());
    }
}
