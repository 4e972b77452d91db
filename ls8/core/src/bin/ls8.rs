use anyhow::{Context, Result};
use clap::Parser;
use ls8_core::constants::DEFAULT_TRACE_DEPTH;
use ls8_core::{Cpu, HaltReason, NullObserver, Program, TraceRecorder};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ls8")]
#[command(about = "Run an LS-8 program on the virtual CPU", long_about = None)]
struct Args {
    /// Path to the .ls8 program (one binary value per line, `#` comments)
    program: PathBuf,

    /// Print the rolling trace table to stderr before every instruction
    #[arg(long)]
    trace: bool,

    /// Number of trace rows kept and printed
    #[arg(long, default_value_t = DEFAULT_TRACE_DEPTH)]
    trace_depth: usize,

    /// Write the retained trace history as JSON after the run
    #[arg(long)]
    trace_json: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let program = Program::from_file(&args.program)
        .with_context(|| format!("reading {}", args.program.display()))?;

    let mut cpu = Cpu::new();
    cpu.load(&program)
        .with_context(|| format!("loading {}", args.program.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = if args.trace || args.trace_json.is_some() {
        let mut recorder = TraceRecorder::new(args.trace_depth);
        if args.trace {
            recorder = recorder.with_echo(Box::new(io::stderr()));
        }
        let result = cpu.run_with(&mut out, &mut recorder);
        if let Some(path) = &args.trace_json {
            recorder
                .write_json(path)
                .with_context(|| format!("writing trace to {}", path.display()))?;
        }
        result
    } else {
        cpu.run_with(&mut out, &mut NullObserver)
    };
    let report = result.with_context(|| format!("executing at pc=0x{:02X}", cpu.pc()))?;
    out.flush()?;

    match report.halt {
        HaltReason::Instruction => info!(steps = report.steps, "halted"),
        HaltReason::UnknownOpcode { opcode, pc } => {
            info!(steps = report.steps, opcode, pc, "halted on unknown opcode")
        }
    }
    Ok(())
}

fn main() {
    init_logging();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("fatal: {err:#}");
        std::process::exit(1);
    }
}
