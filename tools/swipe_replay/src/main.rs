use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use multiswipe::DetectorConfig;
use swipe_replay::{
    logging::{init_console_log, Logger},
    replay::{replay, ReplayOptions},
    report::{format_record, record_label, CSV_HEADER},
    trace::{parse_expected_labels, parse_trace},
};

const DEFAULT_TOUCH_SLOP_PX: f32 = 10.0;

#[derive(Debug, Parser)]
#[command(name = "swipe_replay")]
#[command(about = "Replay recorded multi-touch traces through the swipe detector")]
struct Cli {
    /// `swipe_trace` CSV capture.
    trace: PathBuf,
    /// Touch slop in pixels; ignored when --config is given.
    #[arg(long, conflicts_with = "config")]
    slop: Option<f32>,
    /// TOML detector configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long = "long-press")]
    long_press: bool,
    /// Also emit the centroid trace of each finished session.
    #[arg(long = "trace")]
    record_trace: bool,
    /// One expected label per line; exits non-zero on mismatch.
    #[arg(long)]
    expect: Option<PathBuf>,
    #[arg(long = "log-json")]
    log_json: Option<PathBuf>,
    /// Detector diagnostics on stderr; repeat for more.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(cli: Cli) -> Result<()> {
    init_console_log(cli.verbose)?;
    let mut logger = Logger::new(cli.log_json.clone())?;

    let config = match &cli.config {
        Some(path) => DetectorConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DetectorConfig::from_touch_slop(cli.slop.unwrap_or(DEFAULT_TOUCH_SLOP_PX)),
    };
    let frames = parse_trace(&cli.trace)?;
    let outcome = replay(
        &frames,
        &ReplayOptions {
            config,
            long_press: cli.long_press,
            record_trace: cli.record_trace,
        },
    )?;

    println!("{CSV_HEADER}");
    let mut actual = Vec::with_capacity(outcome.records.len());
    for record in &outcome.records {
        let label = record_label(&record.event);
        logger.record(&format_record(record), &label, record);
        actual.push(label);
    }
    logger.info(format!(
        "# frames={} consumed={} records={}",
        outcome.frames,
        outcome.consumed,
        outcome.records.len()
    ));
    if outcome.unfinished {
        logger.warn("trace ended while a session was still tracking");
    }

    if let Some(expect_path) = &cli.expect {
        let expected = parse_expected_labels(expect_path)?;
        if actual != expected {
            logger.error(format!("expected labels: {}", expected.join(",")));
            logger.error(format!("actual labels:   {}", actual.join(",")));
            bail!("result sequence mismatch");
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}
