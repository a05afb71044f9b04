//! Sweeps every priority lock strategy over a grid of workloads and prints the
//! per-cell measurements followed by the win counts.

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use priority_locks::{report, Strategy, Sweep, SweepConfig};
use tracing::{error, Level};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Measurement window of each run, in milliseconds.
    #[arg(long, default_value_t = 120_000)]
    window_ms: u64,

    /// Values tried for low hold, high hold and high idle, in microseconds.
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "1,10,100,1000,10000,100000,1000000"
    )]
    durations_us: Vec<u64>,

    /// Strategies to compare. Defaults to all of them.
    #[arg(long = "strategy", value_enum)]
    strategies: Vec<Strategy>,

    /// Print the whole summary as JSON once the sweep is done.
    #[arg(long)]
    json: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn config(&self) -> SweepConfig {
        SweepConfig {
            durations: self
                .durations_us
                .iter()
                .copied()
                .map(Duration::from_micros)
                .collect(),
            window: Duration::from_millis(self.window_ms),
            strategies: if self.strategies.is_empty() {
                Strategy::ALL.to_vec()
            } else {
                self.strategies.clone()
            },
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let sweep = Sweep::new(args.config())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.json {
        let summary = sweep.run(|_| {})?;
        report::write_json(&mut out, &summary)?;
        return Ok(());
    }

    report::write_header(&mut out)?;
    let mut write_err = None;
    let summary = sweep.run(|cell| {
        if write_err.is_none() {
            write_err = report::write_cell(&mut out, cell)
                .and_then(|()| out.flush())
                .err();
        }
    })?;
    if let Some(err) = write_err {
        return Err(err.into());
    }
    report::write_summary(&mut out, &summary)?;
    Ok(())
}
