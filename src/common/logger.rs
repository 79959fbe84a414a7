use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Result;
use chrono::{DateTime, Local};
use colored::{ColoredString, Colorize};

use crate::common::config::LoggerConfig;
use crate::common::constants::{LogLevel, DELIMITER, LEVEL_NOT_FOUND, TIMESTAMP_FORMAT};
use crate::common::sink::{LogSink, StdoutSink};
use crate::common::value::LogValue;
use crate::services::spinner::{Spinner, SpinnerController};

/// Leveled console logger.
///
/// Lines look like `[INFO] | [prod] - billing-svc - body`; errors carry a local
/// timestamp in the level segment. Nothing here returns an error to the caller.
/// Share it by reference (or `Arc`) from wherever the application builds it.
pub struct Logger {
    config: RwLock<LoggerConfig>,
    sink: Arc<dyn LogSink>,
    spinner: SpinnerController,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Cleared configuration, writing to stdout.
    pub fn new() -> Self {
        Self::with_config(LoggerConfig::default())
    }

    pub fn with_config(config: LoggerConfig) -> Self {
        Self::with_sink(config, Arc::new(StdoutSink))
    }

    pub fn with_sink(config: LoggerConfig, sink: Arc<dyn LogSink>) -> Self {
        Logger {
            config: RwLock::new(config),
            sink,
            spinner: SpinnerController::new(),
        }
    }

    /// Configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_config(LoggerConfig::from_env()?))
    }

    /// Replace the whole configuration. With `clear` set the logger goes back
    /// to the cleared state and `config` is ignored.
    pub fn initialize(&self, config: LoggerConfig, clear: bool) {
        let next = if clear { LoggerConfig::default() } else { config };
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    pub fn config(&self) -> LoggerConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn info<I, V>(&self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<LogValue>,
    {
        self.log(LogLevel::Info, values);
    }

    pub fn warn<I, V>(&self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<LogValue>,
    {
        self.log(LogLevel::Warn, values);
    }

    pub fn error<I, V>(&self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<LogValue>,
    {
        self.log(LogLevel::Error, values);
    }

    /// Only emitted while `debug_enabled` is set.
    pub fn debug<I, V>(&self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<LogValue>,
    {
        self.log(LogLevel::Debug, values);
    }

    pub fn spinner(&self) -> Spinner<'_> {
        Spinner::new(self)
    }

    /// Render `body` behind the prefix for `level` using the current configuration.
    pub fn format_line(&self, level: LogLevel, body: &str) -> String {
        compose(level, &self.config(), body, Local::now())
    }

    pub(crate) fn sink(&self) -> &dyn LogSink {
        self.sink.as_ref()
    }

    pub(crate) fn spinner_controller(&self) -> &SpinnerController {
        &self.spinner
    }

    fn log<I, V>(&self, level: LogLevel, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<LogValue>,
    {
        let config = self.config();
        if level == LogLevel::Debug && !config.debug_enabled {
            return;
        }

        let values: Vec<LogValue> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return;
        }

        let body = values
            .iter()
            .map(LogValue::render)
            .collect::<Vec<_>>()
            .join(DELIMITER);

        let line = compose(level, &config, &body, Local::now());
        self.spinner.suspend(|| self.sink.write_line(&line));
    }
}

fn compose(level: LogLevel, config: &LoggerConfig, body: &str, now: DateTime<Local>) -> String {
    let Some(segment) = level_segment(level, now) else {
        return LEVEL_NOT_FOUND.red().to_string();
    };

    let mut line = format!("{} | ", segment);
    if let Some(environment) = &config.environment {
        line.push_str(&format!("[{}]{}", environment, DELIMITER));
    }
    if let Some(prefix) = &config.prefix {
        line.push_str(prefix);
        line.push_str(DELIMITER);
    }
    line.push_str(body);
    line
}

fn level_segment(level: LogLevel, now: DateTime<Local>) -> Option<ColoredString> {
    let segment = match level {
        LogLevel::Info => level.tag().green(),
        LogLevel::Warn => level.tag().yellow(),
        LogLevel::Debug => level.tag().magenta(),
        LogLevel::Error => format!(
            "{}{}[{}]",
            level.tag(),
            DELIMITER,
            now.format(TIMESTAMP_FORMAT)
        )
        .red(),
        LogLevel::Http => return None,
    };
    Some(segment)
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr $(, $value:expr)* $(,)?) => {{
        let values: ::std::vec::Vec<$crate::LogValue> =
            ::std::vec![$($crate::LogValue::from($value)),*];
        $logger.info(values)
    }};
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr $(, $value:expr)* $(,)?) => {{
        let values: ::std::vec::Vec<$crate::LogValue> =
            ::std::vec![$($crate::LogValue::from($value)),*];
        $logger.warn(values)
    }};
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr $(, $value:expr)* $(,)?) => {{
        let values: ::std::vec::Vec<$crate::LogValue> =
            ::std::vec![$($crate::LogValue::from($value)),*];
        $logger.error(values)
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr $(, $value:expr)* $(,)?) => {{
        let values: ::std::vec::Vec<$crate::LogValue> =
            ::std::vec![$($crate::LogValue::from($value)),*];
        $logger.debug(values)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::sink::MemorySink;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
    }

    fn plain(line: &str) -> String {
        // Drop ANSI escapes so assertions do not depend on terminal detection.
        let mut out = String::new();
        let mut chars = line.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for next in chars.by_ref() {
                    if next == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn bare_prefix_omits_absent_segments() {
        let config = LoggerConfig::default();
        assert_eq!(
            plain(&compose(LogLevel::Info, &config, "hello", fixed_time())),
            "[INFO] | hello"
        );
        assert_eq!(
            plain(&compose(LogLevel::Warn, &config, "careful", fixed_time())),
            "[WARNING] | careful"
        );
    }

    #[test]
    fn full_prefix_orders_environment_then_prefix() {
        let config = LoggerConfig::new().environment("prod").prefix("billing-svc");
        assert_eq!(
            plain(&compose(LogLevel::Debug, &config, "state", fixed_time())),
            "[DEBUG] | [prod] - billing-svc - state"
        );
    }

    #[test]
    fn prefix_without_environment() {
        let config = LoggerConfig::new().prefix("worker");
        assert_eq!(
            plain(&compose(LogLevel::Info, &config, "up", fixed_time())),
            "[INFO] | worker - up"
        );
    }

    #[test]
    fn error_prefix_carries_timestamp() {
        let config = LoggerConfig::new().environment("uat");
        assert_eq!(
            plain(&compose(LogLevel::Error, &config, "boom", fixed_time())),
            "[ERROR] - [2024-03-09 07:05:01] | [uat] - boom"
        );
    }

    #[test]
    fn reserved_level_falls_back() {
        let config = LoggerConfig::new().prefix("svc");
        assert_eq!(
            plain(&compose(LogLevel::Http, &config, "request", fixed_time())),
            LEVEL_NOT_FOUND
        );
    }

    #[test]
    fn http_level_through_shared_routine_emits_fallback() {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::with_sink(LoggerConfig::default(), sink.clone());
        logger.log(LogLevel::Http, ["GET /health"]);

        assert_eq!(sink.write_count(), 1);
        assert_eq!(plain(&sink.lines()[0]), LEVEL_NOT_FOUND);
    }

    #[test]
    fn initialize_replaces_every_field() {
        let logger = Logger::with_sink(
            LoggerConfig::new().environment("dev").prefix("a").debug_enabled(true),
            Arc::new(MemorySink::new()),
        );
        logger.initialize(LoggerConfig::new().prefix("b"), false);

        let config = logger.config();
        assert_eq!(config.environment, None);
        assert_eq!(config.prefix.as_deref(), Some("b"));
        assert!(!config.debug_enabled);
    }
}
