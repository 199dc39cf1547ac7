use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rote::pty::EXEC_FAILED_STATUS;
use rote::{ChildExit, PlainText, PumpStop, Session, SessionConfig};

const IDLE_SLEEP: Duration = Duration::from_millis(10);

/// Run a command on a pseudo-terminal and print the screen it leaves behind.
#[derive(Debug, Parser)]
#[command(name = "rote-capture", version, about)]
struct Cli {
    /// Command line, run as `<shell> -c <command>`
    command: String,

    /// Screen rows (default: from config)
    #[arg(long)]
    rows: Option<u16>,

    /// Screen columns (default: from config)
    #[arg(long)]
    cols: Option<u16>,

    /// Size the screen like the terminal we are running in
    #[arg(long, conflicts_with_all = ["rows", "cols"])]
    fit: bool,

    /// Config file (default: ~/.config/rote/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Text written to the child once it is running
    #[arg(long)]
    input: Option<String>,

    /// Give up waiting for the child after this many milliseconds
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// Print the screen snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    rote::logging::init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SessionConfig::load_from(path)?,
        None => SessionConfig::load()?,
    };
    if cli.fit {
        let (cols, rows) = crossterm::terminal::size().context("querying terminal size")?;
        config.terminal.rows = rows;
        config.terminal.cols = cols;
    }
    if let Some(rows) = cli.rows {
        config.terminal.rows = rows;
    }
    if let Some(cols) = cli.cols {
        config.terminal.cols = cols;
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&shutdown))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&shutdown))?;

    let mut session = Session::with_config(&config)?;
    session.install_handler(PlainText::new());
    session.attach(&cli.command)?;

    if let Some(input) = &cli.input {
        session.write(input.as_bytes())?;
    }

    let deadline = Instant::now() + Duration::from_millis(cli.timeout_ms);
    let exit = run_until_exit(&mut session, deadline, &shutdown)?;
    session.detach();

    let snapshot = session.grid().snapshot();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", snapshot.text());
    }

    match exit {
        Some(ChildExit::Exited(0)) => Ok(()),
        Some(ChildExit::Exited(code)) => std::process::exit(code as i32),
        Some(ChildExit::ExecFailed) => std::process::exit(EXEC_FAILED_STATUS as i32),
        None => {
            tracing::warn!("Child still running, giving up");
            std::process::exit(1);
        }
    }
}

/// Pump until the child has exited and its output is drained, the deadline
/// passes, or a termination signal arrives.
fn run_until_exit(
    session: &mut Session,
    deadline: Instant,
    shutdown: &AtomicBool,
) -> anyhow::Result<Option<ChildExit>> {
    let mut exited = None;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("Interrupted");
            return Ok(exited);
        }

        let report = session.pump();
        match report.stop {
            PumpStop::BudgetExhausted => continue,
            PumpStop::Detached => return Ok(exited),
            PumpStop::EndOfStream | PumpStop::ReadError if exited.is_some() => {
                return Ok(exited);
            }
            PumpStop::Idle if exited.is_some() => return Ok(exited),
            PumpStop::EndOfStream | PumpStop::ReadError | PumpStop::Idle => {}
        }

        if exited.is_none() {
            // Keep pumping after exit until the pty buffer is empty.
            exited = session.try_wait()?;
            if exited.is_some() {
                continue;
            }
        }

        if Instant::now() >= deadline {
            return Ok(exited);
        }
        thread::sleep(IDLE_SLEEP);
    }
}
