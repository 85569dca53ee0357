// A minimal stderr logger for the `log` crate. Filtering is left entirely to
// `log::set_max_level`, which `main` sets from `AGENDA_LOG`.

use std::{
    path::{Path, PathBuf},
    sync::{LazyLock, Mutex},
};

use {jiff::tz::TimeZone, log::Log};

use crate::style::Theme;

#[derive(Debug)]
pub struct Logger {
    tz: Mutex<Option<TimeZone>>,
}

impl Logger {
    /// Installs a new logger as the global logger.
    pub fn init() -> Result<&'static Logger, log::SetLoggerError> {
        let logger = Box::leak(Box::new(Logger { tz: Mutex::new(None) }));
        log::set_logger(logger)?;
        Ok(logger)
    }

    /// Timestamps are printed in UTC until this is called.
    pub fn set_time_zone(&self, tz: TimeZone) {
        if let Ok(mut logger_tz) = self.tz.lock() {
            *logger_tz = Some(tz);
        }
    }

    fn now(&self) -> String {
        // `Timestamp::now` rather than `Zoned::now`, since the latter may
        // look up the system time zone, which logs.
        let ts = jiff::Timestamp::now();
        let tz = self.tz.lock().ok().and_then(|tz| tz.clone());
        match tz {
            Some(tz) => ts.to_zoned(tz).strftime("%Y-%m-%dT%H:%M:%S%:z").to_string(),
            None => ts.to_string(),
        }
    }
}

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let now = Theme::stderr().highlight(self.now());
        match (record.file(), record.line()) {
            (Some(file), Some(line)) => {
                eprintln!(
                    "{now}|{}|{}:{line}: {}",
                    record.level(),
                    relative(file),
                    record.args(),
                );
            }
            (Some(file), None) => {
                eprintln!(
                    "{now}|{}|{}: {}",
                    record.level(),
                    relative(file),
                    record.args(),
                );
            }
            _ => eprintln!("{now}|{}: {}", record.level(), record.args()),
        }
    }

    fn flush(&self) {}
}

fn relative<'p>(path: &'p str) -> &'p str {
    static CWD: LazyLock<Option<PathBuf>> =
        LazyLock::new(|| std::env::current_dir().ok());

    let Some(cwd) = CWD.as_deref() else { return path };
    Path::new(path)
        .strip_prefix(cwd)
        .ok()
        .and_then(|relative| relative.to_str())
        .unwrap_or(path)
}
