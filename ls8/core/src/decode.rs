//! Opcode field extraction.
//!
//! Every LS-8 opcode carries its own metadata in its bit pattern, so decoding
//! is a handful of shifts and masks with no lookup and no failure mode.

use crate::constants::{
    ALU_SHIFT, INSTRUCTION_ID_MASK, OPERAND_COUNT_MASK, OPERAND_COUNT_SHIFT, SETS_PC_SHIFT,
};

/// Fields of a single opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedOpcode {
    pub opcode: u8,
    /// Number of operand bytes following the opcode.
    pub operand_count: u8,
    /// Operands are two register numbers consumed by an ALU handler.
    pub is_alu_op: bool,
    /// The handler owns the program counter; the run loop must not advance it.
    pub sets_pc: bool,
    /// Low nibble. Informational only: dispatch keys on the whole byte.
    pub instruction_id: u8,
}

impl DecodedOpcode {
    /// Total encoded size in bytes, opcode included.
    pub fn length(&self) -> u8 {
        1 + self.operand_count
    }
}

pub fn decode(opcode: u8) -> DecodedOpcode {
    DecodedOpcode {
        opcode,
        operand_count: (opcode >> OPERAND_COUNT_SHIFT) & OPERAND_COUNT_MASK,
        is_alu_op: (opcode >> ALU_SHIFT) & 1 == 1,
        sets_pc: (opcode >> SETS_PC_SHIFT) & 1 == 1,
        instruction_id: opcode & INSTRUCTION_ID_MASK,
    }
}
