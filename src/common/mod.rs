pub mod config;
pub mod constants;
pub mod logger;
pub mod sink;
pub mod value;
