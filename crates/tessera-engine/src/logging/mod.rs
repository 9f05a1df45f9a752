//! Logging utilities.
//!
//! Logger initialization over `env_logger`. Library code only uses the `log`
//! facade; binaries and tests pick the backend by calling [`init_logging`].

mod init;

pub use init::{init_logging, LoggingConfig};
