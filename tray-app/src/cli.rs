// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use clap::Parser;

/// Creates status icons for mounted removable volumes.
///
/// Looks for removable volumes and creates a status icon for each one. These
/// usually appear in the tray, depending on your desktop environment.
#[derive(Debug, Parser)]
#[command(name = "mount-tray", version)]
pub struct Cli {
    /// Read settings from this file instead of $XDG_CONFIG_HOME/mount-tray/config.toml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
