//! Drowsiness Monitor Replay - Main Entry Point
//!
//! Feeds a recorded EAR trace through the drowsiness monitor and prints one
//! JSON result per frame, for tuning thresholds offline.

mod trace;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dms::{DmsConfig, DrowsinessMonitor};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trace::{read_trace, ReplayLine};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Default,
    Strict,
    Lenient,
}

#[derive(Debug, Parser)]
#[command(name = "dms-replay", version, about = "Replay an EAR trace through the drowsiness monitor")]
struct Args {
    /// Trace file (JSON lines); stdin when omitted or "-"
    input: Option<PathBuf>,

    /// Config file layered over the preset (toml, json or yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base parameter set
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    preset: Preset,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

/// Initialize logging on stderr; stdout carries results
fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(p) if p.as_os_str() != "-" => {
            let file = File::open(p).with_context(|| format!("cannot open {}", p.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_json);

    info!("=== DMS Replay v{} ===", env!("CARGO_PKG_VERSION"));

    let base = match args.preset {
        Preset::Default => DmsConfig::default(),
        Preset::Strict => DmsConfig::strict(),
        Preset::Lenient => DmsConfig::lenient(),
    };
    let config = DmsConfig::load_over(base, args.config.as_deref())?;
    let mut monitor = DrowsinessMonitor::new(config)?;

    let samples = read_trace(open_input(args.input.as_ref())?)?;
    info!("Replaying {} frames", samples.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut previous_ts = None;
    let (mut alerts, mut blinks, mut face_lost) = (0usize, 0usize, 0usize);
    let mut was_drowsy = false;

    for sample in samples {
        if previous_ts.is_some_and(|prev| sample.timestamp_ms < prev) {
            warn!("Timestamp went backwards at {}ms", sample.timestamp_ms);
        }
        previous_ts = Some(sample.timestamp_ms);

        let result = match sample.ear {
            Some(ear) => monitor.process_openness(ear, sample.timestamp_ms)?,
            None => {
                face_lost += 1;
                monitor.face_lost(sample.timestamp_ms, sample.brightness)
            }
        };

        if result.is_drowsy && !was_drowsy {
            alerts += 1;
        }
        was_drowsy = result.is_drowsy;
        blinks += usize::from(result.is_blink);

        let line = ReplayLine {
            timestamp_ms: sample.timestamp_ms,
            result: &result,
        };
        serde_json::to_writer(&mut out, &line)?;
        writeln!(out)?;
    }

    info!(
        "Replay finished: {} alert(s), {} blink frame(s), {} face-lost frame(s), {} EAR sample(s) scored",
        alerts,
        blinks,
        face_lost,
        monitor.state().history.total_written()
    );
    Ok(())
}
