//! Leveled, colored console logging with contextual prefixes and an optional
//! terminal spinner.
//!
//! ```no_run
//! use console_herald::{log_error, log_info, Logger, LoggerConfig};
//! use std::time::Duration;
//!
//! let logger = Logger::with_config(
//!     LoggerConfig::new().environment("prod").prefix("billing-svc"),
//! );
//! log_info!(logger, "charging card", 4200_u64);
//! log_error!(logger, "payment failed", anyhow::anyhow!("timeout"));
//!
//! let spinner = logger.spinner();
//! spinner.start("settling invoices", Some(Duration::from_secs(30)));
//! spinner.success(Some("settled"), None);
//! ```

pub mod common;
pub mod services;

pub use common::config::{Environment, LoggerConfig};
pub use common::constants::{LogLevel, LogStage};
pub use common::logger::Logger;
pub use common::sink::{LogSink, MemorySink, StdoutSink};
pub use common::value::LogValue;
pub use services::spinner::Spinner;
