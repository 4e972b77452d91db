//! Mutable machine state threaded through every instruction handler.

use crate::constants::{
    FLAG_EQUAL, FLAG_GREATER, FLAG_LESS, FLAG_RUNNING, MEMORY_SIZE, REGISTER_COUNT, SP_REGISTER,
    SP_RESET,
};
use crate::memory::{Address, GuardedMemory};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Running,
    Less,
    Greater,
    Equal,
}

impl Flag {
    pub fn mask(self) -> u8 {
        match self {
            Flag::Running => FLAG_RUNNING,
            Flag::Less => FLAG_LESS,
            Flag::Greater => FLAG_GREATER,
            Flag::Equal => FLAG_EQUAL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MachineState {
    pub memory: GuardedMemory,
    pub registers: GuardedMemory,
    /// Address of the next instruction to fetch.
    pub pc: Address,
    /// Opcode currently being executed.
    pub ir: u8,
    pub fl: u8,
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineState {
    pub fn new() -> Self {
        let mut registers = GuardedMemory::new(REGISTER_COUNT);
        registers.as_mut_slice()[SP_REGISTER as usize] = SP_RESET;
        Self {
            memory: GuardedMemory::new(MEMORY_SIZE),
            registers,
            pc: 0,
            ir: 0,
            fl: 0,
        }
    }

    pub fn register(&self, reg: u8) -> Result<u8> {
        self.registers.read(Address::from(reg))
    }

    pub fn set_register(&mut self, reg: u8, value: i64) -> Result<()> {
        self.registers.write(Address::from(reg), value)
    }

    pub fn sp(&self) -> Result<u8> {
        self.register(SP_REGISTER)
    }

    pub fn set_sp(&mut self, value: i64) -> Result<()> {
        self.set_register(SP_REGISTER, value)
    }

    /// Operand byte `n` (1-based) of the instruction at PC.
    pub fn operand(&self, n: Address) -> Result<u8> {
        self.memory.read(self.pc + n)
    }

    pub fn flag(&self, flag: Flag) -> bool {
        self.fl & flag.mask() != 0
    }

    pub fn set_flag(&mut self, flag: Flag, on: bool) {
        if on {
            self.fl |= flag.mask();
        } else {
            self.fl &= !flag.mask();
        }
    }

    pub fn is_running(&self) -> bool {
        self.flag(Flag::Running)
    }
}
