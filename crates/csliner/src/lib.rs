//! Build runtime for the `ucss` compiler.
//!
//! Loads `csliner.config.json`, finds markup and author stylesheets, runs
//! build passes and keeps rebuilding in watch mode. The core compiler in
//! [`ucss`] never touches the file system; everything that does lives here.

pub mod build;
pub mod config;
pub mod error;
pub mod files;
mod log_init;
pub mod progress;
pub mod watch;

pub use build::{BuildReport, Builder, run_pass};
pub use config::{CONFIG_FILE, Config};
pub use error::{CslinerError, Result};
pub use log_init::init_logger;
pub use progress::Progress;
pub use watch::watch;

// Re-export the log crate so the binary shares the same facade.
pub use log;
