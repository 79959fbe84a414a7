use std::fmt;

/// Joins converted values into a message body and separates prefix segments.
pub const DELIMITER: &str = " - ";

/// Substituted for any value that cannot be serialized.
pub const STRINGIFY_FAILED: &str = "[Logger stringify failed]";

/// Emitted when the internal routine receives a level it does not render.
pub const LEVEL_NOT_FOUND: &str = "[ERROR] - [logLevel] - [NOT FOUND]";

/// chrono format for the error timestamp: `YYYY-MM-DD HH:mm:ss`, local time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Spinner animation frames and tick rate
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""];
pub const SPINNER_TICK_MS: u64 = 80;

pub const SUCCESS_GLYPH: &str = "✔";
pub const FAILURE_GLYPH: &str = "✖";

/// Severity tags. `Http` is reserved: no public method emits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Http,
    Debug,
}

impl LogLevel {
    pub fn tag(self) -> &'static str {
        match self {
            LogLevel::Error => "[ERROR]",
            LogLevel::Warn => "[WARNING]",
            LogLevel::Info => "[INFO]",
            LogLevel::Http => "[HTTP]",
            LogLevel::Debug => "[DEBUG]",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Stage tags for callers bracketing their own operations. Not consumed internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogStage {
    Start,
    End,
}

impl LogStage {
    pub fn tag(self) -> &'static str {
        match self {
            LogStage::Start => "[START]",
            LogStage::End => "[END]",
        }
    }
}

impl fmt::Display for LogStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_tags_match_rendered_prefixes() {
        assert_eq!(LogLevel::Error.tag(), "[ERROR]");
        assert_eq!(LogLevel::Warn.tag(), "[WARNING]");
        assert_eq!(LogLevel::Info.to_string(), "[INFO]");
        assert_eq!(LogLevel::Http.tag(), "[HTTP]");
        assert_eq!(LogLevel::Debug.tag(), "[DEBUG]");
    }

    #[test]
    fn stage_tags() {
        assert_eq!(LogStage::Start.to_string(), "[START]");
        assert_eq!(LogStage::End.tag(), "[END]");
    }
}
