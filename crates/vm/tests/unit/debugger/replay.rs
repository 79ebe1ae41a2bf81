//! # Replay Tests
//!
//! Rewinding and advancing again must show exactly what was recorded.

use proptest::prelude::*;

use crate::common::harness::{COUNTER, LOOP_AT_0010, TestContext};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_rewind_then_advance_is_identity(steps in 1usize..40, back in 0usize..40) {
        let mut ctx = TestContext::new(COUNTER);
        ctx.advance(steps);
        let (cursor, len, values) = (ctx.vm.cursor(), ctx.len(), ctx.values());

        let back = back.min(steps);
        ctx.rewind(back);
        prop_assert_eq!(ctx.vm.cursor(), cursor - back);
        ctx.advance(back);

        prop_assert_eq!(ctx.vm.cursor(), cursor);
        prop_assert_eq!(ctx.len(), len);
        prop_assert_eq!(ctx.values(), values);
    }

    #[test]
    fn prop_every_row_survives_rewinding(back in 0usize..8) {
        let mut ctx = TestContext::new(LOOP_AT_0010);
        ctx.run();
        let rows: Vec<Vec<i32>> = (0..ctx.len())
            .map(|i| ctx.vm.row(i).unwrap().values.to_vec())
            .collect();

        ctx.rewind(back);
        prop_assert_eq!(ctx.values(), rows[rows.len() - 1 - back.min(rows.len() - 1)].clone());
        prop_assert_eq!(ctx.len(), rows.len());
    }
}
