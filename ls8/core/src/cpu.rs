//! Fetch/decode/execute engine.

use std::io::{self, Write};

use tracing::{debug, trace, warn};

use crate::decode::{decode, DecodedOpcode};
use crate::dispatch::DispatchTable;
use crate::instructions;
use crate::loader::Program;
use crate::memory::{Address, GuardedMemory};
use crate::opcodes::mnemonic;
use crate::state::{Flag, MachineState};
use crate::{CoreError, Result};

/// Hook invoked after fetch and before execute on every cycle.
pub trait StepObserver {
    fn before_execute(&mut self, _state: &MachineState) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct NullObserver;

impl StepObserver for NullObserver {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Executed,
    /// The fetched byte had no handler; the machine was halted in its place.
    UnknownOpcode { opcode: u8, pc: Address },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// A HLT instruction cleared the RUNNING flag.
    Instruction,
    UnknownOpcode { opcode: u8, pc: Address },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Cycles executed, including the one that halted the machine.
    pub steps: u64,
    pub halt: HaltReason,
}

pub struct Cpu {
    state: MachineState,
    dispatch: DispatchTable,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            state: MachineState::new(),
            dispatch: DispatchTable::new(),
        }
    }

    /// Clear memory and write the program contiguously from address 0.
    pub fn load(&mut self, program: &Program) -> Result<()> {
        self.state.memory.clear();
        for (address, &value) in program.values().iter().enumerate() {
            let address = Address::try_from(address).unwrap_or(Address::MAX);
            self.state.memory.write(address, value)?;
        }
        debug!(bytes = program.len(), "program loaded");
        Ok(())
    }

    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.load(&Program::from_bytes(bytes))
    }

    /// Run until HLT, writing PRN output to stdout.
    pub fn run(&mut self) -> Result<RunReport> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_with(&mut out, &mut NullObserver)
    }

    /// Set RUNNING and execute cycles until it is cleared.
    ///
    /// Memory and value errors abort the run and are returned as-is; an
    /// unknown opcode is reported to `out` and halts the machine normally.
    pub fn run_with<O: StepObserver>(
        &mut self,
        out: &mut dyn Write,
        observer: &mut O,
    ) -> Result<RunReport> {
        self.state.set_flag(Flag::Running, true);
        let mut steps = 0u64;
        let mut halt = HaltReason::Instruction;
        while self.state.is_running() {
            if let StepOutcome::UnknownOpcode { opcode, pc } = self.step(out, observer)? {
                halt = HaltReason::UnknownOpcode { opcode, pc };
            }
            steps += 1;
        }
        debug!(steps, pc = self.state.pc, ?halt, "machine halted");
        Ok(RunReport { steps, halt })
    }

    /// Execute a single fetch/decode/execute/advance cycle.
    pub fn step<O: StepObserver>(
        &mut self,
        out: &mut dyn Write,
        observer: &mut O,
    ) -> Result<StepOutcome> {
        let pc = self.state.pc;
        self.state.ir = self.state.memory.read(pc)?;
        let decoded = decode(self.state.ir);
        observer.before_execute(&self.state)?;
        trace!(
            pc,
            opcode = decoded.opcode,
            mnemonic = mnemonic(decoded.opcode),
            "execute"
        );

        let outcome = match self.execute(decoded, out) {
            Ok(()) => StepOutcome::Executed,
            Err(CoreError::UnknownOpcode { opcode, pc }) => {
                let kind = if decoded.is_alu_op {
                    "ALU instruction"
                } else {
                    "instruction"
                };
                warn!(opcode, pc, "unknown opcode, halting");
                writeln!(out, "Unknown {kind} 0x{opcode:02X} at address 0x{pc:02X}")?;
                instructions::hlt(&mut self.state, out)?;
                StepOutcome::UnknownOpcode { opcode, pc }
            }
            Err(err) => return Err(err),
        };

        if !decoded.sets_pc {
            self.state.pc += Address::from(decoded.length());
        }
        Ok(outcome)
    }

    fn execute(&mut self, decoded: DecodedOpcode, out: &mut dyn Write) -> Result<()> {
        let pc = self.state.pc;
        if decoded.is_alu_op {
            let reg_a = self.state.operand(1)?;
            let reg_b = self.state.operand(2)?;
            let handler = self.dispatch.alu(decoded.opcode, pc)?;
            handler(&mut self.state, reg_a, reg_b)
        } else {
            let handler = self.dispatch.ordinary(decoded.opcode, pc)?;
            handler(&mut self.state, out)
        }
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn memory(&self) -> &GuardedMemory {
        &self.state.memory
    }

    pub fn pc(&self) -> Address {
        self.state.pc
    }

    pub fn ir(&self) -> u8 {
        self.state.ir
    }

    pub fn fl(&self) -> u8 {
        self.state.fl
    }

    pub fn flag(&self, flag: Flag) -> bool {
        self.state.flag(flag)
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn sp(&self) -> Result<u8> {
        self.state.sp()
    }

    pub fn register(&self, reg: u8) -> Result<u8> {
        self.state.register(reg)
    }

    pub fn registers(&self) -> [u8; 8] {
        let mut regs = [0u8; 8];
        regs.copy_from_slice(self.state.registers.as_slice());
        regs
    }
}
