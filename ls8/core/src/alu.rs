//! ALU handlers. Both operands are register numbers supplied by the run loop.

use crate::state::{Flag, MachineState};
use crate::Result;

/// `MUL a, b`: a := a * b.
///
/// The product goes through the range-checked register write, so anything
/// above 255 fails with `InvalidByteValue` rather than wrapping.
pub fn mul(state: &mut MachineState, reg_a: u8, reg_b: u8) -> Result<()> {
    let a = state.register(reg_a)?;
    let b = state.register(reg_b)?;
    state.set_register(reg_a, i64::from(a) * i64::from(b))
}

/// `CMP a, b`: recompute EQUAL, LESS and GREATER; other flags are untouched.
pub fn cmp(state: &mut MachineState, reg_a: u8, reg_b: u8) -> Result<()> {
    let a = state.register(reg_a)?;
    let b = state.register(reg_b)?;
    state.set_flag(Flag::Equal, a == b);
    state.set_flag(Flag::Less, a < b);
    state.set_flag(Flag::Greater, a > b);
    Ok(())
}
