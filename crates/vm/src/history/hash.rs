//! Snapshot hashing and the single-slot loop table.
//!
//! The hash is a polynomial rolling hash over the program counter followed by
//! every cell value in column order:
//!
//! ```text
//! h = (pc * 997) mod M
//! h = (h * 997 + 10 * value) mod M      for each value
//! ```
//!
//! Intermediate terms wrap as 32-bit unsigned integers, so hashes are
//! reproducible across platforms for a given modulus `M`.
//!
//! The table keeps only the most recent snapshot index per bucket. A collision
//! between two different states evicts the older one, so a repeat separated by
//! such a collision can go unnoticed. Callers must confirm a hit by comparing
//! the snapshots themselves.

use crate::common::Addr;
use crate::common::constants::{HASH_MULTIPLIER, HASH_VALUE_WEIGHT};

/// Hashes a `(pc, values)` state into `[0, modulus)`.
///
/// # Arguments
///
/// * `pc` - Program counter of the snapshot.
/// * `values` - Cell values in column order.
/// * `modulus` - Table size; should be prime.
///
/// # Panics
///
/// Panics if `modulus` is zero.
pub fn state_hash(pc: Addr, values: &[i32], modulus: u32) -> u32 {
    let mut hash = pc.wide().wrapping_mul(HASH_MULTIPLIER) % modulus;
    for &value in values {
        let term = value.wrapping_mul(HASH_VALUE_WEIGHT) as u32;
        hash = hash.wrapping_mul(HASH_MULTIPLIER).wrapping_add(term) % modulus;
    }
    hash % modulus
}

/// Fixed-size table from hash bucket to the latest snapshot index.
///
/// Slots hold `index + 1`; zero marks an empty slot.
#[derive(Clone, Debug)]
pub struct LoopTable {
    slots: Box<[u32]>,
}

impl LoopTable {
    /// Creates an empty table with `modulus` buckets.
    ///
    /// A zero modulus gives a single bucket.
    pub fn new(modulus: u32) -> Self {
        Self {
            slots: vec![0; modulus.max(1) as usize].into_boxed_slice(),
        }
    }

    /// Number of buckets.
    pub fn modulus(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Stores `index` in `bucket`, returning the index it replaced.
    ///
    /// # Arguments
    ///
    /// * `bucket` - A hash produced with this table's modulus.
    /// * `index` - History index of the snapshot being recorded.
    pub fn replace(&mut self, bucket: u32, index: usize) -> Option<usize> {
        let slot = &mut self.slots[bucket as usize];
        let previous = slot.checked_sub(1).map(|i| i as usize);
        // `Config::validate` caps the step budget at `u32::MAX`.
        *slot = (index + 1) as u32;
        previous
    }

    /// Empties every bucket.
    pub fn clear(&mut self) {
        self.slots.fill(0);
    }
}
