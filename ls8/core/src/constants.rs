//! Core architectural constants for the LS-8 machine.

/// Number of bytes of main memory (program, data and stack share it).
pub const MEMORY_SIZE: usize = 0x100;

/// Number of general-purpose registers.
pub const REGISTER_COUNT: usize = 8;

/// General register reused as the stack pointer.
pub const SP_REGISTER: u8 = 7;

/// Reset value of the stack pointer; the stack grows downward from here.
pub const SP_RESET: u8 = 0xF4;

/// Flags register bit positions.
pub const FLAG_RUNNING: u8 = 0b1000_0000;
pub const FLAG_LESS: u8 = 0b0000_0100;
pub const FLAG_GREATER: u8 = 0b0000_0010;
pub const FLAG_EQUAL: u8 = 0b0000_0001;

/// Mask covering the three comparison flags written by CMP.
pub const COMPARE_FLAGS: u8 = FLAG_LESS | FLAG_GREATER | FLAG_EQUAL;

/// Opcode byte layout: `AABCDDDD`.
///
/// - `AA`   number of operand bytes following the opcode
/// - `B`    operands are two register numbers for an ALU handler
/// - `C`    the handler sets PC itself
/// - `DDDD` instruction identifier
pub const OPERAND_COUNT_SHIFT: u8 = 6;
pub const OPERAND_COUNT_MASK: u8 = 0b11;
pub const ALU_SHIFT: u8 = 5;
pub const SETS_PC_SHIFT: u8 = 4;
pub const INSTRUCTION_ID_MASK: u8 = 0b1111;

/// Default number of trace snapshots retained by the trace collaborator.
pub const DEFAULT_TRACE_DEPTH: usize = 5;
