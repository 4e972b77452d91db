//! Ordinary (non-ALU) instruction handlers.
//!
//! Each handler reads its own operands from memory relative to PC. Handlers
//! mutate state in order and stop at the first error; nothing is rolled back.

use std::io::Write;

use crate::decode::decode;
use crate::memory::Address;
use crate::state::{Flag, MachineState};
use crate::Result;

pub fn hlt(state: &mut MachineState, _out: &mut dyn Write) -> Result<()> {
    state.set_flag(Flag::Running, false);
    Ok(())
}

/// `LDI reg, imm`
pub fn ldi(state: &mut MachineState, _out: &mut dyn Write) -> Result<()> {
    let reg = state.operand(1)?;
    let value = state.operand(2)?;
    state.set_register(reg, i64::from(value))
}

/// `PRN reg`: print the register value as a decimal line.
pub fn prn(state: &mut MachineState, out: &mut dyn Write) -> Result<()> {
    let reg = state.operand(1)?;
    let value = state.register(reg)?;
    writeln!(out, "{value}")?;
    Ok(())
}

/// `PUSH reg`: decrement SP, then store the register at SP.
pub fn push(state: &mut MachineState, _out: &mut dyn Write) -> Result<()> {
    let sp = state.sp()?;
    state.set_sp(i64::from(sp) - 1)?;
    let reg = state.operand(1)?;
    let value = state.register(reg)?;
    let sp = state.sp()?;
    state.memory.write(Address::from(sp), i64::from(value))
}

/// `POP reg`: load the byte at SP into the register, then increment SP.
pub fn pop(state: &mut MachineState, _out: &mut dyn Write) -> Result<()> {
    let reg = state.operand(1)?;
    let sp = state.sp()?;
    let value = state.memory.read(Address::from(sp))?;
    state.set_register(reg, i64::from(value))?;
    state.set_sp(i64::from(sp) + 1)
}

/// `JMP reg`: PC := register value.
pub fn jmp(state: &mut MachineState, _out: &mut dyn Write) -> Result<()> {
    let reg = state.operand(1)?;
    state.pc = Address::from(state.register(reg)?);
    Ok(())
}

pub fn jeq(state: &mut MachineState, out: &mut dyn Write) -> Result<()> {
    if state.flag(Flag::Equal) {
        jmp(state, out)
    } else {
        skip(state);
        Ok(())
    }
}

pub fn jne(state: &mut MachineState, out: &mut dyn Write) -> Result<()> {
    if state.flag(Flag::Equal) {
        skip(state);
        Ok(())
    } else {
        jmp(state, out)
    }
}

/// Fall through a conditional jump that was not taken.
fn skip(state: &mut MachineState) {
    state.pc += Address::from(decode(state.ir).length());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::{JEQ, JNE};
    use crate::CoreError;

    fn state_with(bytes: &[u8]) -> MachineState {
        let mut state = MachineState::new();
        for (addr, byte) in bytes.iter().enumerate() {
            state.memory.write(addr as Address, i64::from(*byte)).unwrap();
        }
        state
    }

    #[test]
    fn ldi_loads_immediate() {
        let mut state = state_with(&[0x82, 3, 200]);
        ldi(&mut state, &mut Vec::new()).unwrap();
        assert_eq!(state.register(3).unwrap(), 200);
    }

    #[test]
    fn ldi_to_missing_register_fails() {
        let mut state = state_with(&[0x82, 9, 1]);
        assert!(matches!(
            ldi(&mut state, &mut Vec::new()),
            Err(CoreError::OutOfBounds { address: 9, size: 8 })
        ));
    }

    #[test]
    fn prn_writes_decimal_line() {
        let mut state = state_with(&[0x47, 2]);
        state.set_register(2, 255).unwrap();
        let mut out = Vec::new();
        prn(&mut state, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "255\n");
    }

    #[test]
    fn push_then_pop_round_trips_through_stack() {
        let mut state = state_with(&[0x45, 0, 0x46, 1]);
        state.set_register(0, 42).unwrap();

        push(&mut state, &mut Vec::new()).unwrap();
        assert_eq!(state.sp().unwrap(), 0xF3);
        assert_eq!(state.memory.read(0xF3).unwrap(), 42);

        state.pc = 2;
        pop(&mut state, &mut Vec::new()).unwrap();
        assert_eq!(state.register(1).unwrap(), 42);
        assert_eq!(state.sp().unwrap(), 0xF4);
    }

    #[test]
    fn push_below_zero_fails_on_sp_write() {
        let mut state = state_with(&[0x45, 0]);
        state.set_sp(0).unwrap();
        assert!(matches!(
            push(&mut state, &mut Vec::new()),
            Err(CoreError::InvalidByteValue(-1))
        ));
        assert_eq!(state.sp().unwrap(), 0);
    }

    #[test]
    fn jmp_sets_pc_from_register() {
        let mut state = state_with(&[0x54, 4]);
        state.set_register(4, 0x30).unwrap();
        jmp(&mut state, &mut Vec::new()).unwrap();
        assert_eq!(state.pc, 0x30);
    }

    #[test]
    fn jeq_and_jne_follow_equal_flag() {
        let mut state = state_with(&[JEQ, 0]);
        state.set_register(0, 0x40).unwrap();
        state.ir = JEQ;

        jeq(&mut state, &mut Vec::new()).unwrap();
        assert_eq!(state.pc, 2, "not taken without EQUAL");

        state.pc = 0;
        state.set_flag(Flag::Equal, true);
        jeq(&mut state, &mut Vec::new()).unwrap();
        assert_eq!(state.pc, 0x40);

        state.pc = 0;
        state.ir = JNE;
        jne(&mut state, &mut Vec::new()).unwrap();
        assert_eq!(state.pc, 2, "not taken with EQUAL");

        state.pc = 0;
        state.set_flag(Flag::Equal, false);
        jne(&mut state, &mut Vec::new()).unwrap();
        assert_eq!(state.pc, 0x40);
    }

    #[test]
    fn hlt_clears_only_running() {
        let mut state = MachineState::new();
        state.set_flag(Flag::Running, true);
        state.set_flag(Flag::Less, true);
        hlt(&mut state, &mut Vec::new()).unwrap();
        assert_eq!(state.fl, 0b0000_0100);
    }
}
