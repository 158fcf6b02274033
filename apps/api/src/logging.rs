//! Structured logging setup: stdout plus an append-only per-day log file
//! `excel_interview_<YYYYMMDD>.log` under the configured log directory.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_PREFIX: &str = "excel_interview_";
pub const LOG_FILE_EXTENSION: &str = "log";

/// File name of the log for `date`.
pub fn log_file_name(date: NaiveDate) -> String {
    format!(
        "{LOG_FILE_PREFIX}{}.{LOG_FILE_EXTENSION}",
        date.format("%Y%m%d")
    )
}

/// `MakeWriter` that appends to the log file for the current local date,
/// switching files when the date changes.
pub struct DailyLogFile {
    dir: PathBuf,
    current: Mutex<Option<(NaiveDate, File)>>,
}

impl DailyLogFile {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        Ok(Self {
            dir,
            current: Mutex::new(None),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_for_date(&self, date: NaiveDate, buf: &[u8]) -> io::Result<usize> {
        let mut current = self
            .current
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;

        let stale = !matches!(current.as_ref(), Some((open_date, _)) if *open_date == date);
        if stale {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.dir.join(log_file_name(date)))?;
            *current = Some((date, file));
        }

        match current.as_mut() {
            Some((_, file)) => file.write(buf),
            None => Ok(0),
        }
    }

    fn flush_current(&self) -> io::Result<()> {
        let mut current = self
            .current
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        match current.as_mut() {
            Some((_, file)) => file.flush(),
            None => Ok(()),
        }
    }
}

pub struct DailyLogWriter<'a> {
    target: &'a DailyLogFile,
}

impl Write for DailyLogWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.target.write_for_date(Local::now().date_naive(), buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.target.flush_current()
    }
}

impl<'a> MakeWriter<'a> for DailyLogFile {
    type Writer = DailyLogWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        DailyLogWriter { target: self }
    }
}

/// Installs the global subscriber: env filter, stdout layer, and the
/// per-day file layer (no ANSI colours in the file).
pub fn init(log_dir: &Path, rust_log: &str) -> Result<()> {
    let file = DailyLogFile::new(log_dir)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("interview_api={rust_log},tower_http={rust_log}"))
        }))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
