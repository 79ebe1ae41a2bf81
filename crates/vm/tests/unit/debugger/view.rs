//! # View Tests
//!
//! View toggling, the scrolling window, per-row markers and change flags.

use mockall::predicate::eq;
use pretty_assertions::assert_eq;

use stepvm_core::config::Config;
use stepvm_core::debugger::view::ViewMode;
use stepvm_core::debugger::{Command, Prompt};

use crate::common::harness::{COUNTER, LOOP_AT_0010, SUM, TestContext};
use crate::common::mocks::confirm::{MockConfirmer, silent};

fn low_threshold() -> Config {
    let mut config = Config::default();
    config.debugger.full_view_threshold = 2;
    config
}

#[test]
fn test_toggle_below_threshold_does_not_ask() {
    let mut ctx = TestContext::new(SUM);
    let mut confirm = silent();
    let _ = ctx.vm.handle(Command::ToggleView, &mut confirm);
    assert_eq!(ctx.vm.view_mode(), ViewMode::Full);
    let _ = ctx.vm.handle(Command::ToggleView, &mut confirm);
    assert_eq!(ctx.vm.view_mode(), ViewMode::Windowed);
}

#[test]
fn test_large_full_view_asks_first() {
    let mut ctx = TestContext::with_config(COUNTER, low_threshold());
    ctx.advance(3);

    let mut confirm = MockConfirmer::new();
    let _ = confirm
        .expect_confirm()
        .with(eq(Prompt::FullView { rows: 4 }))
        .times(1)
        .return_const(false);
    ctx.vm.toggle_view(&mut confirm);
    assert_eq!(ctx.vm.view_mode(), ViewMode::Windowed);
}

#[test]
fn test_large_full_view_accepted_and_left_freely() {
    let mut ctx = TestContext::with_config(COUNTER, low_threshold());
    ctx.advance(3);

    let mut confirm = MockConfirmer::new();
    let _ = confirm.expect_confirm().times(1).return_const(true);
    ctx.vm.toggle_view(&mut confirm);
    assert_eq!(ctx.vm.view_mode(), ViewMode::Full);
    assert_eq!(ctx.vm.rows().len(), 4);

    // Leaving the full view never asks.
    ctx.vm.toggle_view(&mut silent());
    assert_eq!(ctx.vm.view_mode(), ViewMode::Windowed);
}

#[test]
fn test_short_history_fills_part_of_window() {
    let ctx = TestContext::new(SUM);
    assert_eq!(ctx.vm.visible_range(), 0..10);
    assert_eq!(ctx.vm.rows().len(), 1);
}

#[test]
fn test_window_follows_cursor() {
    let mut ctx = TestContext::new(COUNTER);
    ctx.advance(15);
    assert_eq!(ctx.vm.visible_range(), 6..16);
    let rows = ctx.vm.rows();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0].row, 6);
    assert!(rows[9].is_cursor);

    // Moving inside the window does not scroll it.
    ctx.rewind(9);
    assert_eq!(ctx.vm.visible_range(), 6..16);

    ctx.rewind(1);
    assert_eq!(ctx.vm.visible_range(), 5..15);
    assert!(ctx.vm.rows()[0].is_cursor);
}

#[test]
fn test_reset_returns_to_windowed_view() {
    let mut ctx = TestContext::new(COUNTER);
    ctx.advance(12);
    ctx.vm.toggle_view(&mut silent());

    let mut confirm = MockConfirmer::new();
    let _ = confirm.expect_confirm().times(1).return_const(true);
    ctx.vm.reset(&mut confirm);
    assert_eq!(ctx.vm.view_mode(), ViewMode::Windowed);
    assert_eq!(ctx.vm.visible_range(), 0..10);
}

#[test]
fn test_changed_flags_compare_with_previous_row() {
    let mut ctx = TestContext::new(SUM);
    ctx.advance(1);
    assert_eq!(ctx.vm.row(0).unwrap().changed, vec![false, false, false]);
    assert_eq!(ctx.vm.row(1).unwrap().changed, vec![false, false, true]);
}

#[test]
fn test_error_marker_stays_on_frontier_row() {
    let mut ctx = TestContext::new(LOOP_AT_0010);
    ctx.run();
    assert!(ctx.vm.row(7).unwrap().errored);
    assert!(!ctx.vm.row(6).unwrap().errored);

    ctx.rewind(1);
    let frontier = ctx.vm.row(7).unwrap();
    assert!(frontier.errored);
    assert!(!frontier.is_cursor);
    assert_eq!(frontier.message, None);
    assert_eq!(ctx.vm.status_message(), None);
}

#[test]
fn test_listing_rows_carry_instructions() {
    let ctx = TestContext::new(LOOP_AT_0010);
    let row = ctx.vm.row(0).unwrap();
    assert_eq!(row.instruction, ctx.vm.program().instruction(0));
    assert_eq!(row.values, &[1, 0]);
}
