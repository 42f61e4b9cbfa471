// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;
use mount_tray_types::{Mount, MountEvent};
use tokio::sync::mpsc;

use crate::VolumeError;

/// Source of mount lifecycle events.
///
/// Consumers call [`subscribe`](VolumeMonitor::subscribe) before
/// [`mounts`](VolumeMonitor::mounts) so that no mount appearing in between is
/// missed; a duplicate `Added` for an already listed mount is possible and
/// must be tolerated.
#[async_trait]
pub trait VolumeMonitor: Send + Sync {
    /// Mounts present right now, in the monitor's native order.
    async fn mounts(&self) -> Result<Vec<Mount>, VolumeError>;

    /// Start delivering lifecycle events. The channel closes when the monitor stops.
    async fn subscribe(&self) -> Result<mpsc::Receiver<MountEvent>, VolumeError>;
}
