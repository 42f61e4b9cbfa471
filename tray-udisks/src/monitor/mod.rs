// SPDX-License-Identifier: GPL-3.0-only

mod diff;
mod jobs;

use std::collections::HashMap;

use async_trait::async_trait;
use futures_util::StreamExt;
use mount_tray_contracts::{VolumeError, VolumeMonitor};
use mount_tray_types::{Mount, MountEvent};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use udisks2::job::JobProxy;
use zbus::zvariant::{OwnedObjectPath, OwnedValue};
use zbus::{Connection, MatchRule, MessageStream};

use crate::dbus::proxies::{
    BLOCK_DEVICES_PATH, BLOCK_IFACE, FILESYSTEM_IFACE, JOB_IFACE, UDISKS2_SERVICE,
    UDisks2ObjectManagerProxy,
};
use crate::discovery::list_mounts;
use crate::error::UdisksError;

use diff::diff_mounts;
use jobs::pre_unmount_targets;

/// `VolumeMonitor` over the UDisks2 system service.
pub struct UdisksVolumeMonitor {
    connection: Connection,
    include_system: bool,
}

impl UdisksVolumeMonitor {
    pub async fn new(include_system: bool) -> Result<Self, UdisksError> {
        let connection = Connection::system()
            .await
            .map_err(|e| UdisksError::ConnectionFailed(e.to_string()))?;
        Ok(Self::with_connection(connection, include_system))
    }

    pub fn with_connection(connection: Connection, include_system: bool) -> Self {
        Self {
            connection,
            include_system,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    async fn start_watching(&self) -> Result<mpsc::Receiver<MountEvent>, UdisksError> {
        let (sender, receiver) = mpsc::channel(32);

        let object_manager = UDisks2ObjectManagerProxy::new(&self.connection).await?;
        let mut added_stream = object_manager.receive_interfaces_added().await?;
        let mut removed_stream = object_manager.receive_interfaces_removed().await?;

        let rule = MatchRule::builder()
            .msg_type(zbus::message::Type::Signal)
            .sender(UDISKS2_SERVICE)?
            .interface("org.freedesktop.DBus.Properties")?
            .member("PropertiesChanged")?
            .path_namespace(BLOCK_DEVICES_PATH)?
            .build();
        let mut changed_stream =
            MessageStream::for_match_rule(rule, &self.connection, Some(64)).await?;

        let mut watcher = Watcher {
            connection: self.connection.clone(),
            include_system: self.include_system,
            snapshot: list_mounts(&self.connection, self.include_system).await?,
            sender,
        };

        tokio::spawn(async move {
            info!("Watching UDisks2 for mount changes");

            loop {
                tokio::select! {
                    maybe_added = added_stream.next() => {
                        let Some(signal) = maybe_added else {
                            break;
                        };

                        let args = match signal.args() {
                            Ok(args) => args,
                            Err(e) => {
                                warn!("Failed to parse InterfacesAdded signal args: {e}");
                                continue;
                            }
                        };

                        let alive = if args.interfaces_and_properties.contains_key(JOB_IFACE) {
                            watcher.job_started(args.object_path.clone()).await
                        } else if touches_mounts(args.interfaces_and_properties.keys()) {
                            watcher.refresh().await
                        } else {
                            true
                        };
                        if !alive {
                            break;
                        }
                    }
                    maybe_removed = removed_stream.next() => {
                        let Some(signal) = maybe_removed else {
                            break;
                        };

                        match signal.args() {
                            Ok(args) => {
                                if touches_mounts(args.interfaces.iter())
                                    && !watcher.refresh().await
                                {
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!("Failed to parse InterfacesRemoved signal args: {e}");
                            }
                        }
                    }
                    maybe_changed = changed_stream.next() => {
                        let Some(message) = maybe_changed else {
                            break;
                        };

                        let message = match message {
                            Ok(message) => message,
                            Err(e) => {
                                warn!("Failed to receive PropertiesChanged: {e}");
                                continue;
                            }
                        };

                        match message
                            .body()
                            .deserialize::<(String, HashMap<String, OwnedValue>, Vec<String>)>()
                        {
                            Ok((interface, _, _)) => {
                                if touches_mounts(std::iter::once(&interface))
                                    && !watcher.refresh().await
                                {
                                    break;
                                }
                            }
                            Err(e) => {
                                debug!("Ignoring malformed PropertiesChanged: {e}");
                            }
                        }
                    }
                }
            }

            info!("UDisks2 mount watching stopped");
        });

        Ok(receiver)
    }
}

fn touches_mounts<'a>(mut interfaces: impl Iterator<Item = &'a String>) -> bool {
    interfaces.any(|i| i == FILESYSTEM_IFACE || i == BLOCK_IFACE)
}

struct Watcher {
    connection: Connection,
    include_system: bool,
    snapshot: Vec<Mount>,
    sender: mpsc::Sender<MountEvent>,
}

impl Watcher {
    /// Re-read all mounts and forward the difference. Returns false once nobody listens.
    async fn refresh(&mut self) -> bool {
        let current = match list_mounts(&self.connection, self.include_system).await {
            Ok(current) => current,
            Err(e) => {
                warn!("Failed to list mounts, keeping previous state: {e}");
                return true;
            }
        };

        let events = diff_mounts(&self.snapshot, &current);
        self.snapshot = current;
        self.forward(events).await
    }

    async fn job_started(&mut self, job_path: OwnedObjectPath) -> bool {
        let job = match JobProxy::builder(&self.connection).path(job_path.clone()) {
            Ok(builder) => match builder.build().await {
                Ok(job) => job,
                Err(e) => {
                    debug!("Job {job_path} vanished before it could be read: {e}");
                    return true;
                }
            },
            Err(e) => {
                warn!("Invalid job path {job_path}: {e}");
                return true;
            }
        };

        let operation = job.operation().await.unwrap_or_default();
        let objects: Vec<String> = job
            .objects()
            .await
            .unwrap_or_default()
            .iter()
            .map(|o| o.to_string())
            .collect();

        let events = pre_unmount_targets(&self.snapshot, &operation, &objects)
            .into_iter()
            .map(MountEvent::PreUnmount)
            .collect();
        self.forward(events).await
    }

    async fn forward(&self, events: Vec<MountEvent>) -> bool {
        for event in events {
            if let Err(e) = self.sender.send(event).await {
                warn!("Mount event receiver dropped: {e}");
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl VolumeMonitor for UdisksVolumeMonitor {
    async fn mounts(&self) -> Result<Vec<Mount>, VolumeError> {
        list_mounts(&self.connection, self.include_system)
            .await
            .map_err(VolumeError::from)
    }

    async fn subscribe(&self) -> Result<mpsc::Receiver<MountEvent>, VolumeError> {
        self.start_watching().await.map_err(VolumeError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_block_and_filesystem_interfaces_trigger_refresh() {
        let fs = FILESYSTEM_IFACE.to_string();
        let part = "org.freedesktop.UDisks2.Partition".to_string();
        assert!(touches_mounts([&part, &fs].into_iter()));
        assert!(!touches_mounts(std::iter::once(&part)));
    }
}
