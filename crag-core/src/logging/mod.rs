//! Crag logging
//!
//! A small declarative layer on top of the standard `log` crate. Configure it
//! once at startup, then use `log::info!`, `log::debug!`... anywhere.
//!
//! ```rust,no_run
//! use crag_core::logging::{LoggingConfig, LogFormat, LogLevel};
//!
//! let config = LoggingConfig::default()
//!     .with_level(LogLevel::Debug)
//!     .with_format(LogFormat::Json)
//!     .with_context_field("app", "crag");
//!
//! crag_core::logging::init_logging(&config).unwrap();
//! log::info!("fetching climbs page {}", 2);
//! ```
//!
//! The CLI writes logs to stderr by default so they never mix with command
//! output on stdout.

pub mod config;
pub mod destinations;
pub mod formatter;

pub use config::{LogLevel, LoggingConfig};
pub use destinations::{LogEntry, LogOutput};
pub use formatter::LogFormat;

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::sync::{Mutex, Once};

static INIT: Once = Once::new();

/// Install the Crag logger as the global `log` backend.
///
/// Only the first call has an effect; later calls return `Ok(())`.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = init_logging_internal(config);
    });
    result
}

fn init_logging_internal(config: &LoggingConfig) -> anyhow::Result<()> {
    let logger = CragLogger::new(config.clone())?;
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(config.level.to_level_filter());
    Ok(())
}

/// `log::Log` implementation fanning records out to the configured outputs
struct CragLogger {
    config: LoggingConfig,
    writers: Vec<Box<dyn LogWriter>>,
}

impl CragLogger {
    fn new(config: LoggingConfig) -> anyhow::Result<Self> {
        let mut writers: Vec<Box<dyn LogWriter>> = Vec::new();

        for output in &config.outputs {
            match output {
                LogOutput::Stdout => writers.push(Box::new(StdoutWriter)),
                LogOutput::Stderr => writers.push(Box::new(StderrWriter)),
                LogOutput::File { path } => writers.push(Box::new(FileWriter::open(path)?)),
            }
        }

        if writers.is_empty() {
            writers.push(Box::new(StderrWriter));
        }

        Ok(Self { config, writers })
    }
}

impl log::Log for CragLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.config.level.to_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = LogEntry::from_log_record(record, &self.config);
        let line = self.config.format.format_entry(&entry);

        for writer in &self.writers {
            let _ = writer.write_line(&line);
        }
    }

    fn flush(&self) {
        for writer in &self.writers {
            let _ = writer.flush();
        }
    }
}

trait LogWriter: Send + Sync {
    fn write_line(&self, line: &str) -> std::io::Result<()>;
    fn flush(&self) -> std::io::Result<()>;
}

struct StdoutWriter;

impl LogWriter for StdoutWriter {
    fn write_line(&self, line: &str) -> std::io::Result<()> {
        writeln!(std::io::stdout().lock(), "{}", line)
    }

    fn flush(&self) -> std::io::Result<()> {
        std::io::stdout().flush()
    }
}

struct StderrWriter;

impl LogWriter for StderrWriter {
    fn write_line(&self, line: &str) -> std::io::Result<()> {
        writeln!(std::io::stderr().lock(), "{}", line)
    }

    fn flush(&self) -> std::io::Result<()> {
        std::io::stderr().flush()
    }
}

/// Appends to a single file
struct FileWriter {
    inner: Mutex<BufWriter<File>>,
}

impl FileWriter {
    fn open(path: &str) -> anyhow::Result<Self> {
        let path = std::path::Path::new(path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { inner: Mutex::new(BufWriter::new(file)) })
    }
}

impl LogWriter for FileWriter {
    fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut writer = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(writer, "{}", line)?;
        writer.flush()
    }

    fn flush(&self) -> std::io::Result<()> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).flush()
    }
}
