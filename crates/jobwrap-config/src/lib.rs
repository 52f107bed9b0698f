//! Configuration management for jobwrap
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > file > defaults. The TOML file lives at `.jobwrap/config.toml` and
//! has a single `[worker]` section.

mod builder;
mod discovery;
pub mod error;
mod model;

pub use builder::WorkerConfigBuilder;
pub use discovery::{
    CONFIG_DIR, CONFIG_FILE, CliOverrides, ConfigSource, ResolvedConfig, WorkerSection,
    discover_config_file_from, load_config_file,
};
pub use error::ConfigError;
pub use model::{
    DEFAULT_WARNING_LINES, ExecMode, QUEUE_HOST_ENV, QUEUE_PORT_ENV, QueueEndpoint, WorkerConfig,
};
