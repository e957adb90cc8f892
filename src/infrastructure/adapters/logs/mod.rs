/*
Log Adapters Module

Installs the process-wide tracing subscriber.
*/

pub mod system_log_adapter;

pub use system_log_adapter::{init_logging, LogError};
