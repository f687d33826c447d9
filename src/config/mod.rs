//! Configuration management for minibatch
//!
//! Settings come from built-in defaults, an optional `minibatch.toml`, an
//! explicit `--config` file, `MINIBATCH_*` environment variables and CLI
//! flags, merged with figment in that order.

mod core;

pub use self::core::{BatchConfig, CONFIG_FILE, ConfigOverrides, ENV_PREFIX};
