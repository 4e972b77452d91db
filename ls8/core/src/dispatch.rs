//! Opcode to handler maps, built once per engine.

use std::collections::HashMap;
use std::io::Write;

use crate::memory::Address;
use crate::opcodes::{InstrKind, OPCODES};
use crate::opcodes::{CMP, HLT, JEQ, JMP, JNE, LDI, MUL, POP, PRN, PUSH};
use crate::state::MachineState;
use crate::{alu, instructions, CoreError, Result};

/// Ordinary handler: reads its own operands relative to PC.
pub type Handler = fn(&mut MachineState, &mut dyn Write) -> Result<()>;

/// ALU handler: receives two register numbers.
pub type AluHandler = fn(&mut MachineState, u8, u8) -> Result<()>;

pub struct DispatchTable {
    ordinary: HashMap<u8, Handler>,
    alu: HashMap<u8, AluHandler>,
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchTable {
    pub fn new() -> Self {
        let mut ordinary = HashMap::new();
        let mut alu = HashMap::new();
        for entry in OPCODES {
            match entry.kind {
                InstrKind::Ordinary => {
                    if let Some(handler) = ordinary_handler(entry.opcode) {
                        ordinary.insert(entry.opcode, handler);
                    }
                }
                InstrKind::Alu => {
                    if let Some(handler) = alu_handler(entry.opcode) {
                        alu.insert(entry.opcode, handler);
                    }
                }
            }
        }
        Self { ordinary, alu }
    }

    /// `pc` is only used to describe the failure.
    pub fn ordinary(&self, opcode: u8, pc: Address) -> Result<Handler> {
        self.ordinary
            .get(&opcode)
            .copied()
            .ok_or(CoreError::UnknownOpcode { opcode, pc })
    }

    pub fn alu(&self, opcode: u8, pc: Address) -> Result<AluHandler> {
        self.alu
            .get(&opcode)
            .copied()
            .ok_or(CoreError::UnknownOpcode { opcode, pc })
    }

    pub fn len(&self) -> usize {
        self.ordinary.len() + self.alu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn ordinary_handler(opcode: u8) -> Option<Handler> {
    let handler: Handler = match opcode {
        HLT => instructions::hlt,
        LDI => instructions::ldi,
        PRN => instructions::prn,
        PUSH => instructions::push,
        POP => instructions::pop,
        JMP => instructions::jmp,
        JEQ => instructions::jeq,
        JNE => instructions::jne,
        _ => return None,
    };
    Some(handler)
}

fn alu_handler(opcode: u8) -> Option<AluHandler> {
    let handler: AluHandler = match opcode {
        MUL => alu::mul,
        CMP => alu::cmp,
        _ => return None,
    };
    Some(handler)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_entry_has_a_handler() {
        let table = DispatchTable::new();
        assert_eq!(table.len(), OPCODES.len());
    }

    #[test]
    fn tables_are_disjoint() {
        let table = DispatchTable::new();
        assert!(table.ordinary(LDI, 0).is_ok());
        assert!(table.alu(LDI, 0).is_err());
        assert!(table.alu(MUL, 0).is_ok());
        assert!(table.ordinary(MUL, 0).is_err());
    }

    #[test]
    fn unknown_opcode_carries_pc() {
        let table = DispatchTable::new();
        match table.ordinary(0x00, 0x12) {
            Err(CoreError::UnknownOpcode { opcode, pc }) => {
                assert_eq!(opcode, 0x00);
                assert_eq!(pc, 0x12);
            }
            _ => panic!("expected UnknownOpcode"),
        }
    }
}
