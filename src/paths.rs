//! XDG-style path utilities for the configuration directory.
//!
//! Model artifacts are cached by `hf-hub` in its own location; only the
//! config file lives here.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "kotrans";

/// Returns the configuration directory for kotrans.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/kotrans` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/kotrans` otherwise
pub fn config_dir() -> Result<PathBuf> {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(home_dir()?.join(".config").join(APP_DIR)),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Failed to determine home directory")
}
