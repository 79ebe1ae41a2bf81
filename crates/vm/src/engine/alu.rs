//! ALU arithmetic operations.
//!
//! Implements the machine's integer arithmetic on 32-bit signed cell values.
//! Every operation wraps on overflow the way fixed-width two's complement
//! hardware does; division truncates toward zero.

use crate::common::Fault;

/// Integer operation performed by an arithmetic instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction.
    Sub,
    /// Wrapping multiplication.
    Mul,
}

/// Executes an add, subtract or multiply.
///
/// # Arguments
///
/// * `op` - The operation.
/// * `a`  - First operand.
/// * `b`  - Second operand.
#[inline]
pub const fn execute(op: AluOp, a: i32, b: i32) -> i32 {
    match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::Sub => a.wrapping_sub(b),
        AluOp::Mul => a.wrapping_mul(b),
    }
}

/// Truncating division returning `(quotient, remainder)`.
///
/// The remainder is computed as `a - b * quotient`, so
/// `b * quotient + remainder == a` holds in wrapping arithmetic, including
/// for `i32::MIN / -1`.
///
/// # Errors
///
/// Returns [`Fault::DivisionByZero`] when `b` is zero.
#[inline]
pub const fn divmod(a: i32, b: i32) -> Result<(i32, i32), Fault> {
    if b == 0 {
        return Err(Fault::DivisionByZero);
    }
    let q = a.wrapping_div(b);
    let r = a.wrapping_sub(b.wrapping_mul(q));
    Ok((q, r))
}
