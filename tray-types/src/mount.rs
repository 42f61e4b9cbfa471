// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Device node backing the mount, e.g. `/dev/sdb1`
pub const IDENTIFIER_UNIX_DEVICE: &str = "unix-device";
/// Filesystem UUID
pub const IDENTIFIER_UUID: &str = "uuid";
/// Filesystem label
pub const IDENTIFIER_LABEL: &str = "label";
/// Device class, e.g. `device`
pub const IDENTIFIER_CLASS: &str = "class";

/// A currently mounted volume as reported by the volume monitor.
///
/// `root` is unique among live mounts and is used as the registry key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mount {
    /// Human readable name
    pub name: String,

    /// Filesystem root path of the mount
    pub root: String,

    /// Freedesktop icon name
    pub icon: String,

    /// Identifier key/value pairs in monitor order
    pub identifiers: Vec<(String, String)>,

    /// Backend handle for the mounted block object (UDisks2 object path)
    pub object_path: Option<String>,

    /// Drive the volume lives on, if any
    pub drive: Option<DriveInfo>,
}

/// Facts about the drive holding a mount, used by Eject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveInfo {
    pub object_path: String,
    pub ejectable: bool,
    pub can_power_off: bool,
}

impl Mount {
    pub fn new(name: impl Into<String>, root: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            icon: icon.into(),
            identifiers: Vec::new(),
            object_path: None,
            drive: None,
        }
    }

    /// Append an identifier; empty values are skipped.
    pub fn with_identifier(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.identifiers.push((key.into(), value));
        }
        self
    }

    pub fn with_object_path(mut self, object_path: impl Into<String>) -> Self {
        self.object_path = Some(object_path.into());
        self
    }

    pub fn with_drive(mut self, drive: DriveInfo) -> Self {
        self.drive = Some(drive);
        self
    }

    /// Registry key for this mount.
    pub fn key(&self) -> &str {
        &self.root
    }

    /// True when everything a user can see about the mount is unchanged.
    pub fn same_presentation(&self, other: &Mount) -> bool {
        self.name == other.name && self.icon == other.icon && self.identifiers == other.identifiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identifiers_are_skipped() {
        let mount = Mount::new("USB Drive", "/media/usb0", "drive-removable-media")
            .with_identifier(IDENTIFIER_UNIX_DEVICE, "/dev/sdb1")
            .with_identifier(IDENTIFIER_LABEL, "")
            .with_identifier(IDENTIFIER_UUID, "1234-ABCD");

        assert_eq!(
            mount.identifiers,
            [
                (IDENTIFIER_UNIX_DEVICE.to_string(), "/dev/sdb1".to_string()),
                (IDENTIFIER_UUID.to_string(), "1234-ABCD".to_string()),
            ]
        );
        assert_eq!(mount.key(), "/media/usb0");
    }

    #[test]
    fn presentation_ignores_backend_handles() {
        let a = Mount::new("Stick", "/media/a", "media-flash")
            .with_object_path("/org/freedesktop/UDisks2/block_devices/sdb1");
        let b = Mount::new("Stick", "/media/a", "media-flash");
        assert!(a.same_presentation(&b));

        let relabelled =
            Mount::new("Stick", "/media/a", "media-flash").with_identifier(IDENTIFIER_LABEL, "NEW");
        assert!(!a.same_presentation(&relabelled));
    }
}
