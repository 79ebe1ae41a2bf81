//! Global Machine Constants.
//!
//! This module defines the constants shared across the virtual machine. It includes:
//! 1. **Address Constants:** Size of the address space and instruction width.
//! 2. **History Constants:** Hash table modulus, hash multiplier, and the step budget.
//! 3. **Debugger Constants:** Display thresholds for the stepping controller.

/// Number of addressable locations (addresses are in `[0, ADDRESS_SPACE)`).
pub const ADDRESS_SPACE: u32 = 1 << 16;

/// Number of address slots occupied by every instruction the loader produces.
pub const INSTRUCTION_WIDTH: u16 = 1;

/// Prime modulus of the snapshot hash; also the size of the loop-detection table.
pub const HASH_MODULUS: u32 = 10007;

/// Largest accepted hash modulus; bounds the loop table at 64 MiB.
pub const MAX_HASH_MODULUS: u32 = 1 << 24;

/// Multiplier of the polynomial snapshot hash.
pub const HASH_MULTIPLIER: u32 = 997;

/// Weight applied to each cell value before it is folded into the hash.
pub const HASH_VALUE_WEIGHT: i32 = 10;

/// Maximum number of snapshots kept before execution is forcibly stopped.
pub const MAX_HISTORY_LEN: usize = 1 << 20;

/// Largest accepted step budget; loop-table slots store indices as `u32`.
pub const MAX_STEPS_LIMIT: usize = u32::MAX as usize;

/// History length above which switching to the full view asks for confirmation.
pub const FULL_VIEW_CONFIRM_THRESHOLD: usize = 1000;

/// Number of history rows shown by the windowed view.
pub const WINDOW_ROWS: usize = 10;
