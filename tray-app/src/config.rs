// SPDX-License-Identifier: GPL-3.0-only

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::TrayError;

const APP_DIR: &str = "mount-tray";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LoggingLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub log_level: LoggingLevel,
    /// Also write daily rolled log files under the XDG state directory.
    pub log_to_disk: bool,
    /// Show mounts UDisks2 hints as system devices.
    pub include_system_mounts: bool,
    /// Left click opens the mount.
    pub open_on_activate: bool,
}

impl Config {
    /// Load from `explicit` if given, else from the default location.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error the user has to fix.
    pub fn load(explicit: Option<&Path>) -> Result<Self, TrayError> {
        match explicit {
            Some(path) => match fs::read_to_string(path) {
                Ok(text) => Self::parse(&text, path),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Err(TrayError::User(format!(
                    "config file not found: {}",
                    path.display()
                ))),
                Err(source) => Err(TrayError::Io {
                    path: path.to_path_buf(),
                    source,
                }),
            },
            None => {
                let Some(path) = default_config_path() else {
                    return Ok(Self::default());
                };
                match fs::read_to_string(&path) {
                    Ok(text) => Self::parse(&text, &path),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
                    Err(source) => Err(TrayError::Io { path, source }),
                }
            }
        }
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, TrayError> {
        toml::from_str(text).map_err(|source| TrayError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config).join(APP_DIR).join(CONFIG_FILE));
    }

    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILE)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse("", Path::new("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level, LoggingLevel::Info);
        assert!(!config.log_to_disk);
    }

    #[test]
    fn parses_all_keys() {
        let text = r#"
            log_level = "debug"
            log_to_disk = true
            include_system_mounts = true
            open_on_activate = true
        "#;
        let config = Config::parse(text, Path::new("config.toml")).unwrap();
        assert_eq!(config.log_level, LoggingLevel::Debug);
        assert!(config.log_to_disk);
        assert!(config.include_system_mounts);
        assert!(config.open_on_activate);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::parse("colour = \"blue\"", Path::new("/etc/x.toml")).unwrap_err();
        assert!(matches!(err, TrayError::Config { .. }));
        assert!(err.to_string().starts_with("invalid config file /etc/x.toml"));
    }

    #[test]
    fn missing_explicit_file_is_a_user_error() {
        let err = Config::load(Some(Path::new("/nonexistent/mount-tray/config.toml"))).unwrap_err();
        assert!(matches!(err, TrayError::User(_)));
    }
}
