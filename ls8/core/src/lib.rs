//! LS-8 virtual CPU core.
//!
//! An 8-bit machine with 256 bytes of guarded memory, eight general-purpose
//! registers (R7 doubles as the stack pointer), a flags register and a small
//! fixed instruction set. The [`Cpu`] owns all machine state and runs the
//! fetch/decode/execute loop; program loading and tracing are thin
//! collaborators layered on top.

use thiserror::Error;

pub mod alu;
pub mod constants;
pub mod cpu;
pub mod decode;
pub mod dispatch;
pub mod instructions;
pub mod loader;
pub mod memory;
pub mod opcodes;
pub mod state;
pub mod trace;

pub use cpu::{Cpu, HaltReason, NullObserver, RunReport, StepObserver, StepOutcome};
pub use decode::{decode, DecodedOpcode};
pub use dispatch::DispatchTable;
pub use loader::Program;
pub use memory::{Address, GuardedMemory};
pub use state::{Flag, MachineState};
pub use trace::{TraceRecorder, TraceSnapshot};

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("out of bounds memory reference: address {address} (size {size})")]
    OutOfBounds { address: Address, size: usize },
    #[error("data must be an 8-bit number, got {0}")]
    InvalidByteValue(i64),
    #[error("unknown instruction 0x{opcode:02X} at address 0x{pc:02X}")]
    UnknownOpcode { opcode: u8, pc: Address },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize error: {0}")]
    Serde(#[from] serde_json::Error),
}
