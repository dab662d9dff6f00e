//! Console Logger
//!
//! `log` backend for WASM frontends. Records go to the browser console,
//! routed to `console.error` / `warn` / `info` / `debug` by level.
//!
//! ```ignore
//! console_logger::init(log::LevelFilter::Info);
//! log::info!("started");
//! ```

use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Crates whose records pass below `Warn`. Everything else is held to warnings.
const APP_TARGETS: &[&str] = &["tasknest", "query_cache", "leptos_shortcuts"];

pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let max = if APP_TARGETS.iter().any(|t| metadata.target().starts_with(t)) {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        };
        metadata.level() <= max
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(Local::now(), record).into();
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// `HH:MM:SS LEVEL target: message`
pub fn format_record(at: DateTime<Local>, record: &Record) -> String {
    format!(
        "{} {:<5} {}: {}",
        at.format("%H:%M:%S"),
        record.level(),
        record.target(),
        record.args()
    )
}

/// Install the console logger as the global `log` backend
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(ConsoleLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_record() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 4, 7).unwrap();
        let line = format_record(
            at,
            &Record::builder()
                .level(Level::Warn)
                .target("tasknest::queries")
                .args(format_args!("rollback of {} tasks", 3))
                .build(),
        );
        assert_eq!(line, "09:04:07 WARN  tasknest::queries: rollback of 3 tasks");
    }

    #[test]
    fn test_foreign_targets_limited_to_warn() {
        let logger = ConsoleLogger::new(LevelFilter::Debug);
        let meta = |level, target| Metadata::builder().level(level).target(target).build();

        assert!(logger.enabled(&meta(Level::Debug, "tasknest::api")));
        assert!(logger.enabled(&meta(Level::Debug, "query_cache::cache")));
        assert!(!logger.enabled(&meta(Level::Info, "reqwest::async_impl")));
        assert!(logger.enabled(&meta(Level::Warn, "reqwest::async_impl")));
    }

    #[test]
    fn test_level_threshold() {
        let logger = ConsoleLogger::new(LevelFilter::Info);
        let meta = Metadata::builder().level(Level::Debug).target("tasknest").build();
        assert!(!logger.enabled(&meta));
    }
}
