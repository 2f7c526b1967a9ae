//! Serialization codecs for the two on-disk artifacts.
//!
//! - [`toml`]: the restricted TOML-subset config file
//! - [`script`]: the generated POSIX launch script

pub mod script;
pub mod toml;
