// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;
use mount_tray_types::Mount;

use crate::VolumeError;

/// User facing actions bound to the context menu entries.
#[async_trait]
pub trait MountActions: Send + Sync {
    /// Show the mount's contents with the desktop's default handler.
    async fn open(&self, mount: &Mount) -> Result<(), VolumeError>;

    /// Unmount the volume and eject or power off its drive.
    async fn eject(&self, mount: &Mount) -> Result<(), VolumeError>;
}
