//! LS-8 opcode table.

use crate::decode::decode;

pub const HLT: u8 = 0x01;
pub const PUSH: u8 = 0x45;
pub const POP: u8 = 0x46;
pub const PRN: u8 = 0x47;
pub const JMP: u8 = 0x54;
pub const JNE: u8 = 0x55;
pub const JEQ: u8 = 0x56;
pub const LDI: u8 = 0x82;
pub const MUL: u8 = 0xA2;
pub const CMP: u8 = 0xA7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrKind {
    /// Reads its own operands relative to PC.
    Ordinary,
    /// Receives two register numbers from the run loop.
    Alu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub kind: InstrKind,
}

pub const OPCODES: &[OpcodeEntry] = &[
    OpcodeEntry {
        opcode: HLT,
        mnemonic: "HLT",
        kind: InstrKind::Ordinary,
    },
    OpcodeEntry {
        opcode: PUSH,
        mnemonic: "PUSH",
        kind: InstrKind::Ordinary,
    },
    OpcodeEntry {
        opcode: POP,
        mnemonic: "POP",
        kind: InstrKind::Ordinary,
    },
    OpcodeEntry {
        opcode: PRN,
        mnemonic: "PRN",
        kind: InstrKind::Ordinary,
    },
    OpcodeEntry {
        opcode: JMP,
        mnemonic: "JMP",
        kind: InstrKind::Ordinary,
    },
    OpcodeEntry {
        opcode: JNE,
        mnemonic: "JNE",
        kind: InstrKind::Ordinary,
    },
    OpcodeEntry {
        opcode: JEQ,
        mnemonic: "JEQ",
        kind: InstrKind::Ordinary,
    },
    OpcodeEntry {
        opcode: LDI,
        mnemonic: "LDI",
        kind: InstrKind::Ordinary,
    },
    OpcodeEntry {
        opcode: MUL,
        mnemonic: "MUL",
        kind: InstrKind::Alu,
    },
    OpcodeEntry {
        opcode: CMP,
        mnemonic: "CMP",
        kind: InstrKind::Alu,
    },
];

pub fn lookup(opcode: u8) -> Option<&'static OpcodeEntry> {
    OPCODES.iter().find(|entry| entry.opcode == opcode)
}

pub fn mnemonic(opcode: u8) -> &'static str {
    lookup(opcode).map_or("???", |entry| entry.mnemonic)
}

impl OpcodeEntry {
    /// Operand bytes following the opcode, as encoded in the opcode itself.
    pub fn operand_count(&self) -> u8 {
        decode(self.opcode).operand_count
    }
}
