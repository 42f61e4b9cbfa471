// SPDX-License-Identifier: GPL-3.0-only

//! Mount discovery - builds `Mount` values directly from UDisks2 block objects.

use std::collections::HashMap;
use std::path::Path;

use mount_tray_types::{
    DriveInfo, IDENTIFIER_CLASS, IDENTIFIER_LABEL, IDENTIFIER_UNIX_DEVICE, IDENTIFIER_UUID, Mount,
};
use udisks2::{block::BlockProxy, drive::DriveProxy, filesystem::FilesystemProxy};
use zbus::Connection;
use zbus::zvariant::OwnedObjectPath;

use crate::dbus::paths;
use crate::dbus::proxies::UDisks2ManagerProxy;
use crate::error::UdisksError;

/// Drive properties that decide the icon and display name of its volumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DriveFacts {
    pub vendor: String,
    pub model: String,
    pub connection_bus: String,
    pub media: String,
    pub removable: bool,
    pub media_removable: bool,
    pub optical: bool,
}

/// List every mounted filesystem UDisks2 knows about, ordered by block object path.
///
/// Blocks hinted as ignored are always skipped; blocks hinted as system
/// devices are skipped unless `include_system` is set.
pub async fn list_mounts(
    connection: &Connection,
    include_system: bool,
) -> Result<Vec<Mount>, UdisksError> {
    let manager = UDisks2ManagerProxy::new(connection).await?;
    let mut block_paths = manager.get_block_devices(HashMap::new()).await?;
    block_paths.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    let mut mounts = Vec::new();
    for path in block_paths {
        match mount_for_block(connection, &path, include_system).await {
            Ok(Some(mount)) => mounts.push(mount),
            Ok(None) => {}
            Err(e) => tracing::debug!("Skipping {}: {}", path, e),
        }
    }

    Ok(mounts)
}

async fn mount_for_block(
    connection: &Connection,
    path: &OwnedObjectPath,
    include_system: bool,
) -> Result<Option<Mount>, UdisksError> {
    let mount_points = match FilesystemProxy::builder(connection).path(path)?.build().await {
        Ok(proxy) => match proxy.mount_points().await {
            Ok(mps) => mps,
            Err(_) => return Ok(None),
        },
        Err(_) => return Ok(None),
    };
    let Some(root) = paths::mount_root(&mount_points) else {
        return Ok(None);
    };

    let block = BlockProxy::builder(connection).path(path)?.build().await?;
    if block.hint_ignore().await.unwrap_or(false) {
        return Ok(None);
    }
    if block.hint_system().await.unwrap_or(false) && !include_system {
        return Ok(None);
    }

    let device = paths::device_node(
        &block.preferred_device().await.unwrap_or_default(),
        &block.device().await.unwrap_or_default(),
    );
    let label = block.id_label().await.unwrap_or_default();
    let uuid = block.id_uuid().await.unwrap_or_default();
    let hint_name = block.hint_name().await.unwrap_or_default();
    let hint_icon = block.hint_icon_name().await.unwrap_or_default();

    let (facts, drive) = match block.drive().await {
        Ok(drive_path) if drive_path.as_str() != "/" => {
            match drive_facts(connection, &drive_path).await {
                Ok(found) => (Some(found.0), Some(found.1)),
                Err(e) => {
                    tracing::debug!("Could not read drive {}: {}", drive_path, e);
                    (None, None)
                }
            }
        }
        _ => (None, None),
    };

    let name = display_name(&hint_name, &label, facts.as_ref(), &root);
    let icon = icon_name(&hint_icon, facts.as_ref());

    let mut mount = Mount::new(name, root, icon)
        .with_identifier(IDENTIFIER_UNIX_DEVICE, device)
        .with_identifier(IDENTIFIER_UUID, uuid)
        .with_identifier(IDENTIFIER_LABEL, label)
        .with_identifier(IDENTIFIER_CLASS, "device")
        .with_object_path(path.as_str());
    if let Some(drive) = drive {
        mount = mount.with_drive(drive);
    }

    Ok(Some(mount))
}

async fn drive_facts(
    connection: &Connection,
    drive_path: &OwnedObjectPath,
) -> Result<(DriveFacts, DriveInfo), UdisksError> {
    let proxy = DriveProxy::builder(connection)
        .path(drive_path)?
        .build()
        .await?;

    let facts = DriveFacts {
        vendor: proxy.vendor().await.unwrap_or_default(),
        model: proxy.model().await.unwrap_or_default(),
        connection_bus: proxy.connection_bus().await.unwrap_or_default(),
        media: proxy.media().await.unwrap_or_default(),
        removable: proxy.removable().await.unwrap_or(false),
        media_removable: proxy.media_removable().await.unwrap_or(false),
        optical: proxy.optical().await.unwrap_or(false),
    };
    let info = DriveInfo {
        object_path: drive_path.to_string(),
        ejectable: proxy.ejectable().await.unwrap_or(false),
        can_power_off: proxy.can_power_off().await.unwrap_or(false),
    };

    Ok((facts, info))
}

/// Name shown in the tooltip: UDisks hint, filesystem label, drive, then mount directory.
pub(crate) fn display_name(
    hint_name: &str,
    label: &str,
    drive: Option<&DriveFacts>,
    root: &str,
) -> String {
    if !hint_name.trim().is_empty() {
        return hint_name.trim().to_string();
    }
    if !label.trim().is_empty() {
        return label.trim().to_string();
    }
    if let Some(drive) = drive {
        let joined = format!("{} {}", drive.vendor.trim(), drive.model.trim());
        let joined = joined.trim();
        if !joined.is_empty() {
            return joined.to_string();
        }
    }

    Path::new(root)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root.to_string())
}

pub(crate) fn icon_name(hint_icon: &str, drive: Option<&DriveFacts>) -> String {
    if !hint_icon.trim().is_empty() {
        return hint_icon.trim().to_string();
    }

    let Some(drive) = drive else {
        return "drive-removable-media".to_string();
    };

    if drive.optical || drive.media.starts_with("optical") {
        return "media-optical".to_string();
    }
    if drive.media.starts_with("flash") || drive.connection_bus == "sdio" {
        return "media-flash".to_string();
    }
    if drive.connection_bus == "usb" {
        return "drive-removable-media-usb".to_string();
    }
    if drive.removable || drive.media_removable {
        return "drive-removable-media".to_string();
    }

    "drive-harddisk".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usb_stick() -> DriveFacts {
        DriveFacts {
            vendor: "SanDisk".to_string(),
            model: "Cruzer Blade".to_string(),
            connection_bus: "usb".to_string(),
            media: "thumb".to_string(),
            removable: true,
            media_removable: true,
            optical: false,
        }
    }

    #[test]
    fn name_prefers_hint_then_label() {
        assert_eq!(display_name("Backup", "LABEL", None, "/media/x"), "Backup");
        assert_eq!(display_name("  ", "LABEL", None, "/media/x"), "LABEL");
    }

    #[test]
    fn name_falls_back_to_drive_then_directory() {
        let drive = usb_stick();
        assert_eq!(
            display_name("", "", Some(&drive), "/media/x"),
            "SanDisk Cruzer Blade"
        );
        assert_eq!(
            display_name("", "", None, "/run/media/user/1234-ABCD"),
            "1234-ABCD"
        );
        assert_eq!(display_name("", "", None, "/"), "/");
    }

    #[test]
    fn icon_follows_drive_kind() {
        assert_eq!(icon_name("", Some(&usb_stick())), "drive-removable-media-usb");

        let sd = DriveFacts {
            media: "flash_sd".to_string(),
            connection_bus: "sdio".to_string(),
            ..usb_stick()
        };
        assert_eq!(icon_name("", Some(&sd)), "media-flash");

        let dvd = DriveFacts {
            optical: true,
            ..Default::default()
        };
        assert_eq!(icon_name("", Some(&dvd)), "media-optical");

        let internal = DriveFacts {
            connection_bus: "".to_string(),
            ..Default::default()
        };
        assert_eq!(icon_name("", Some(&internal)), "drive-harddisk");
    }

    #[test]
    fn icon_hint_wins() {
        assert_eq!(icon_name("phone", Some(&usb_stick())), "phone");
        assert_eq!(icon_name("", None), "drive-removable-media");
    }
}
