use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{anyhow, Result};
use log::{LevelFilter, Metadata, Record};
use serde::Serialize;
use serde_json::{json, Value};

/// Console output plus an optional JSON-lines sink.
pub struct Logger {
    json_file: Option<File>,
}

impl Logger {
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let json_file = match path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Some(file)
            }
            None => None,
        };
        Ok(Self { json_file })
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        println!("{}", message.as_ref());
        self.event("info", message.as_ref(), Value::Null);
    }

    pub fn warn(&mut self, message: impl AsRef<str>) {
        eprintln!("{}", message.as_ref());
        self.event("warn", message.as_ref(), Value::Null);
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        eprintln!("{}", message.as_ref());
        self.event("error", message.as_ref(), Value::Null);
    }

    /// Prints `line` and logs `record` in full under `label`.
    pub fn record(&mut self, line: &str, label: &str, record: &impl Serialize) {
        println!("{line}");
        let data = serde_json::to_value(record).unwrap_or(Value::Null);
        self.event("info", label, data);
    }

    fn event(&mut self, level: &str, message: &str, data: Value) {
        let Some(file) = &mut self.json_file else {
            return;
        };

        let ts_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut entry = json!({
            "ts_ms": ts_ms,
            "level": level,
            "msg": message,
        });
        if !data.is_null() {
            entry["data"] = data;
        }

        let _ = writeln!(file, "{}", entry);
        let _ = file.flush();
    }
}

/// Prints the detector's `log` records to stderr so they stay out of the CSV.
struct ConsoleLog;

impl log::Log for ConsoleLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static CONSOLE_LOG: ConsoleLog = ConsoleLog;

/// Installs the stderr backend. Session aborts (`warn`) always show; `-v`
/// adds session start and finish.
pub fn init_console_log(verbose: u8) -> Result<()> {
    log::set_logger(&CONSOLE_LOG).map_err(|e| anyhow!("failed to install logger: {e}"))?;
    log::set_max_level(level_filter(verbose));
    Ok(())
}

pub fn level_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
