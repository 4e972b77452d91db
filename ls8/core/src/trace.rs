//! Execution trace collaborator.
//!
//! The engine only exposes state; history lives here.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TRACE_DEPTH, REGISTER_COUNT};
use crate::cpu::StepObserver;
use crate::memory::Address;
use crate::state::MachineState;
use crate::Result;

const TRACE_RULE: &str = "--------------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceSnapshot {
    pub pc: Address,
    pub opcode: u8,
    /// The two bytes after the opcode; `None` past the end of memory.
    pub operands: [Option<u8>; 2],
    pub registers: [u8; REGISTER_COUNT],
    pub fl: u8,
}

impl TraceSnapshot {
    pub fn capture(state: &MachineState) -> Self {
        let mut registers = [0u8; REGISTER_COUNT];
        registers.copy_from_slice(state.registers.as_slice());
        Self {
            pc: state.pc,
            opcode: state.ir,
            operands: [
                state.memory.peek(state.pc + 1),
                state.memory.peek(state.pc + 2),
            ],
            registers,
            fl: state.fl,
        }
    }

    /// One table row: `PC | IN P1 P2 | R0..R7 | FL`.
    pub fn render(&self) -> String {
        let mut line = format!("{:02X} | {:02X}", self.pc, self.opcode);
        for operand in self.operands {
            match operand {
                Some(byte) => line.push_str(&format!(" {byte:02X}")),
                None => line.push_str(" --"),
            }
        }
        line.push_str(" |");
        for reg in self.registers {
            line.push_str(&format!(" {reg:02X}"));
        }
        line.push_str(&format!(" | {:02X}", self.fl));
        line
    }
}

/// Keeps the most recent snapshots and optionally echoes the table each cycle.
pub struct TraceRecorder {
    depth: usize,
    history: VecDeque<TraceSnapshot>,
    echo: Option<Box<dyn Write>>,
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_TRACE_DEPTH)
    }
}

impl TraceRecorder {
    pub fn new(depth: usize) -> Self {
        Self {
            depth: depth.max(1),
            history: VecDeque::with_capacity(depth.clamp(1, DEFAULT_TRACE_DEPTH)),
            echo: None,
        }
    }

    pub fn with_echo(mut self, writer: Box<dyn Write>) -> Self {
        self.echo = Some(writer);
        self
    }

    pub fn record(&mut self, snapshot: TraceSnapshot) {
        if self.history.len() == self.depth {
            self.history.pop_front();
        }
        self.history.push_back(snapshot);
    }

    pub fn history(&self) -> impl Iterator<Item = &TraceSnapshot> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Header, rule, retained rows and a trailing blank line.
    pub fn render(&self) -> String {
        let mut out = String::from("PC | IN P1 P2 |");
        for reg in 0..REGISTER_COUNT {
            out.push_str(&format!(" R{reg:X}"));
        }
        out.push_str(" | FL\n");
        out.push_str(TRACE_RULE);
        out.push('\n');
        for snapshot in &self.history {
            out.push_str(&snapshot.render());
            out.push('\n');
        }
        out.push('\n');
        out
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        let history: Vec<&TraceSnapshot> = self.history.iter().collect();
        serde_json::to_writer_pretty(&mut writer, &history)?;
        writer.flush()?;
        Ok(())
    }
}

impl StepObserver for TraceRecorder {
    fn before_execute(&mut self, state: &MachineState) -> Result<()> {
        self.record(TraceSnapshot::capture(state));
        if self.echo.is_some() {
            let table = self.render();
            if let Some(echo) = self.echo.as_mut() {
                echo.write_all(table.as_bytes())?;
            }
        }
        Ok(())
    }
}
