//! Logger initialization for hosts embedding trellis.
//!
//! Library code only emits through the `log` facade; installing a backend is
//! the host's choice, and [`init_logging`] is the stock one.

mod init;

pub use init::{init_logging, LoggingConfig};
