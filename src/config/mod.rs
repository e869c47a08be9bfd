// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration module for gitrel.
//!
//! This module handles loading, parsing, and merging configuration from
//! gitrel.toml files and defaults.

pub mod default;
mod loader;
mod schema;

pub use loader::{
    find_config_file_from, load_config_for, load_config_from, merge_configs, parse_config,
};
pub use schema::*;
