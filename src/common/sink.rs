use std::sync::{Mutex, PoisonError};

use indicatif::ProgressDrawTarget;

/// Where formatted lines go. One call per emitted line.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);

    /// Draw target for spinners owned by a logger writing to this sink.
    fn spinner_target(&self) -> ProgressDrawTarget {
        ProgressDrawTarget::stdout()
    }
}

/// Process standard output. Write failures behave exactly like `println!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) {
        println!("{}", line);
    }
}

/// Keeps every line in memory; spinners drawn for it are hidden.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn write_count(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn last_line(&self) -> Option<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }

    fn spinner_target(&self) -> ProgressDrawTarget {
        ProgressDrawTarget::hidden()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.write_line("first");
        sink.write_line("second");

        assert_eq!(sink.write_count(), 2);
        assert_eq!(sink.lines(), vec!["first", "second"]);
        assert_eq!(sink.last_line().as_deref(), Some("second"));

        sink.clear();
        assert_eq!(sink.write_count(), 0);
    }
}
