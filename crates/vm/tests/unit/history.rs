//! # History Tests
//!
//! Snapshot hashing, loop detection, the step budget, and the lossy single-slot table.

use pretty_assertions::assert_eq;

use stepvm_core::common::constants::HASH_MODULUS;
use stepvm_core::common::{Addr, Stop};
use stepvm_core::config::{Config, HistoryConfig};
use stepvm_core::history::hash::state_hash;
use stepvm_core::history::{History, Snapshot};

use crate::common::harness::{COUNTER, LOOP_AT_0010, TestContext};

fn history(max_steps: usize, hash_modulus: u32) -> History {
    History::new(&HistoryConfig {
        max_steps,
        hash_modulus,
    })
}

#[test]
fn test_hash_vectors() {
    assert_eq!(state_hash(Addr(0x10), &[], HASH_MODULUS), 5945);
    assert_eq!(state_hash(Addr(0x10), &[1, 1], HASH_MODULUS), 9810);
    assert_eq!(state_hash(Addr(0x0D), &[1, 0], HASH_MODULUS), 8581);
}

#[test]
fn test_append_records_and_exposes_rows() {
    let mut h = history(100, HASH_MODULUS);
    assert!(h.is_empty());
    h.append(Snapshot::new(0, Addr(0), &[1, 2])).unwrap();
    h.append(Snapshot::new(1, Addr(1), &[1, 3])).unwrap();
    assert_eq!(h.len(), 2);
    assert_eq!(&*h.at(1).unwrap().values, &[1, 3]);
    assert_eq!(h.last().unwrap().pc, Addr(1));
    assert!(h.at(2).is_none());
}

#[test]
fn test_identical_state_is_a_loop() {
    let mut h = history(100, HASH_MODULUS);
    h.append(Snapshot::new(0, Addr(4), &[7])).unwrap();
    h.append(Snapshot::new(1, Addr(5), &[7])).unwrap();
    assert_eq!(
        h.append(Snapshot::new(0, Addr(4), &[7])),
        Err(Stop::LoopDetected {
            first: 0,
            second: 2,
            pc: Addr(4)
        })
    );
    assert_eq!(h.len(), 3);
}

#[test]
fn test_same_pc_different_values_is_not_a_loop() {
    let mut h = history(100, HASH_MODULUS);
    h.append(Snapshot::new(0, Addr(4), &[7])).unwrap();
    assert!(h.append(Snapshot::new(0, Addr(4), &[8])).is_ok());
}

#[test]
fn test_collision_with_different_state_is_not_a_loop() {
    // Modulus 1 puts everything in one bucket.
    let mut h = history(100, 1);
    h.append(Snapshot::new(0, Addr(0), &[1])).unwrap();
    assert!(h.append(Snapshot::new(1, Addr(1), &[2])).is_ok());
}

#[test]
fn test_collision_evicts_older_occupant() {
    // With a single bucket, an intervening different state hides the repeat.
    let mut h = history(100, 1);
    h.append(Snapshot::new(0, Addr(0), &[1])).unwrap();
    h.append(Snapshot::new(1, Addr(1), &[2])).unwrap();
    assert!(h.append(Snapshot::new(0, Addr(0), &[1])).is_ok());
    assert_eq!(
        h.append(Snapshot::new(0, Addr(0), &[1])),
        Err(Stop::LoopDetected {
            first: 2,
            second: 3,
            pc: Addr(0)
        })
    );
}

#[test]
fn test_budget_takes_precedence_over_loop() {
    let mut h = history(2, HASH_MODULUS);
    h.append(Snapshot::new(0, Addr(0), &[])).unwrap();
    assert_eq!(
        h.append(Snapshot::new(0, Addr(0), &[])),
        Err(Stop::BudgetExceeded { steps: 2 })
    );
}

#[test]
fn test_clear_forgets_rows_and_buckets() {
    let mut h = history(100, HASH_MODULUS);
    h.append(Snapshot::new(0, Addr(0), &[1])).unwrap();
    h.clear();
    assert!(h.is_empty());
    assert!(h.append(Snapshot::new(0, Addr(0), &[1])).is_ok());
}

#[test]
fn test_loop_reported_with_both_rows() {
    let mut ctx = TestContext::new(LOOP_AT_0010);
    ctx.run();
    assert_eq!(ctx.len(), 8);
    assert_eq!(ctx.pc(), Addr(0x10));
    assert_eq!(
        ctx.message().as_deref(),
        Some("infinite loop found: rows [3 - 7] at 0x0010")
    );
}

#[test]
fn test_tight_loop_detected_on_first_repeat() {
    let mut ctx = TestContext::new("0\n80 0 0 0\n");
    ctx.advance(1);
    assert_eq!(
        ctx.message().as_deref(),
        Some("infinite loop found: rows [0 - 1] at 0x0000")
    );
}

#[test]
fn test_budget_stops_runaway_program() {
    let mut config = Config::default();
    config.history.max_steps = 5;
    let mut ctx = TestContext::with_config(COUNTER, config);
    ctx.run();
    assert_eq!(ctx.len(), 5);
    assert_eq!(ctx.message().as_deref(), Some("stopped after 5 steps"));
    assert_eq!(ctx.values(), vec![2, 1]);
}
