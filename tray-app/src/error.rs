// SPDX-License-Identifier: GPL-3.0-only

use std::io;
use std::path::PathBuf;

use mount_tray_contracts::VolumeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrayError {
    /// Problem the user can fix, reported without further decoration.
    #[error("{0}")]
    User(String),

    #[error("no status icon registered for {0}")]
    UnknownMount(String),

    #[error("status icon events stopped")]
    IconEventsClosed,

    #[error("volume monitor: {0}")]
    Volume(#[from] VolumeError),

    #[error("D-Bus error: {0}")]
    DBus(#[from] zbus::Error),

    #[error("{}: '{}'", io_reason(.source), .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

fn io_reason(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::AlreadyExists => "File exists".to_string(),
        io::ErrorKind::NotFound => "No such file or directory".to_string(),
        io::ErrorKind::PermissionDenied => "Permission denied".to_string(),
        _ => err.to_string(),
    }
}

/// The line printed to stderr before exiting with status 1.
pub fn exit_message(program: &str, err: &TrayError) -> String {
    format!("{program}: error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_is_printed_verbatim() {
        let err = TrayError::User("no tray available".to_string());
        assert_eq!(
            exit_message("mount-tray", &err),
            "mount-tray: error: no tray available"
        );
    }

    #[test]
    fn file_exists_names_the_path() {
        let err = TrayError::Io {
            path: PathBuf::from("/run/user/1000/mount-tray.lock"),
            source: io::Error::from(io::ErrorKind::AlreadyExists),
        };
        assert_eq!(
            exit_message("mount-tray", &err),
            "mount-tray: error: File exists: '/run/user/1000/mount-tray.lock'"
        );
    }

    #[test]
    fn unknown_mount_names_the_path() {
        let err = TrayError::UnknownMount("/media/usb0".to_string());
        assert_eq!(err.to_string(), "no status icon registered for /media/usb0");
    }
}
