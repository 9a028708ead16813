//! System-level modules
//!
//! - Logging initialization
//! - Termination signal handling

pub mod logging;
pub mod signal;

pub use logging::init_logging;
pub use signal::{ShutdownSignal, wait_for_shutdown_signal};
