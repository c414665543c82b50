//! # Runtime Module
//!
//! Process-level plumbing for relay deployments: configuration, logging and
//! the periodic job driver.
//!
//! Configuration is loaded exactly once at process start and threaded into
//! the components that need it; nothing in the core reads ambient process
//! state after startup.

pub mod config;
pub mod error;
pub mod logging;
pub mod schedule;

pub use config::{RelayConfig, RelayConfigBuilder};
pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use schedule::run_every;
