// SPDX-License-Identifier: GPL-3.0-only

//! Open and Eject for the context menu.

use std::collections::HashMap;

use async_trait::async_trait;
use mount_tray_contracts::{MountActions, VolumeError};
use mount_tray_types::{DriveInfo, Mount};
use udisks2::{drive::DriveProxy, filesystem::FilesystemProxy};
use zbus::Connection;

use crate::error::UdisksError;

/// What to do with a drive once its filesystem is unmounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DriveRelease {
    Eject,
    PowerOff,
}

/// Eject wins over power off; a drive that supports neither is left alone.
pub(crate) fn release_for(drive: &DriveInfo) -> Option<DriveRelease> {
    if drive.ejectable {
        Some(DriveRelease::Eject)
    } else if drive.can_power_off {
        Some(DriveRelease::PowerOff)
    } else {
        None
    }
}

fn block_path(mount: &Mount) -> Result<&str, UdisksError> {
    mount
        .object_path
        .as_deref()
        .ok_or_else(|| {
            UdisksError::DeviceNotFound(format!("no block device behind {}", mount.root))
        })
}

pub struct UdisksMountActions {
    connection: Connection,
}

impl UdisksMountActions {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    async fn unmount(&self, mount: &Mount) -> Result<(), UdisksError> {
        let fs_proxy = FilesystemProxy::builder(&self.connection)
            .path(block_path(mount)?)?
            .build()
            .await?;

        fs_proxy
            .unmount(HashMap::new())
            .await
            .map_err(|e| UdisksError::from_call(&format!("Unmount {}", mount.root), e))
    }

    async fn release_drive(&self, drive: &DriveInfo) -> Result<(), UdisksError> {
        let Some(release) = release_for(drive) else {
            tracing::debug!("Drive {} stays attached after unmount", drive.object_path);
            return Ok(());
        };

        let proxy = DriveProxy::builder(&self.connection)
            .path(drive.object_path.as_str())?
            .build()
            .await?;

        match release {
            DriveRelease::Eject => {
                tracing::debug!("Ejecting drive {}", drive.object_path);
                proxy
                    .eject(HashMap::new())
                    .await
                    .map_err(|e| UdisksError::from_call("Eject drive", e))
            }
            DriveRelease::PowerOff => {
                tracing::debug!("Powering off drive {}", drive.object_path);
                proxy
                    .power_off(HashMap::new())
                    .await
                    .map_err(|e| UdisksError::from_call("Power off drive", e))
            }
        }
    }
}

#[async_trait]
impl MountActions for UdisksMountActions {
    async fn open(&self, mount: &Mount) -> Result<(), VolumeError> {
        tracing::info!("Opening {}", mount.root);
        open::that_detached(&mount.root).map_err(|e| {
            VolumeError::internal(format!("could not open {}: {e}", mount.root))
        })
    }

    async fn eject(&self, mount: &Mount) -> Result<(), VolumeError> {
        tracing::info!("Ejecting {}", mount.root);
        self.unmount(mount).await?;
        if let Some(drive) = &mount.drive {
            self.release_drive(drive).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mount_tray_contracts::VolumeErrorKind;

    fn drive(ejectable: bool, can_power_off: bool) -> DriveInfo {
        DriveInfo {
            object_path: "/org/freedesktop/UDisks2/drives/SanDisk_Cruzer".to_string(),
            ejectable,
            can_power_off,
        }
    }

    #[test]
    fn ejectable_drives_are_ejected() {
        assert_eq!(release_for(&drive(true, true)), Some(DriveRelease::Eject));
        assert_eq!(release_for(&drive(true, false)), Some(DriveRelease::Eject));
    }

    #[test]
    fn other_drives_are_powered_off_when_possible() {
        assert_eq!(release_for(&drive(false, true)), Some(DriveRelease::PowerOff));
        assert_eq!(release_for(&drive(false, false)), None);
    }

    #[test]
    fn mount_without_block_object_is_not_found() {
        let mount = Mount::new("USB Drive", "/media/usb0", "drive-removable-media-usb");
        let err = block_path(&mount).unwrap_err();
        assert!(matches!(err, UdisksError::DeviceNotFound(_)));
        assert_eq!(VolumeError::from(err).kind, VolumeErrorKind::NotFound);

        let mount = mount.with_object_path("/org/freedesktop/UDisks2/block_devices/sdb1");
        assert_eq!(
            block_path(&mount).unwrap(),
            "/org/freedesktop/UDisks2/block_devices/sdb1"
        );
    }
}
