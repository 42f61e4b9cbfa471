// SPDX-License-Identifier: GPL-3.0-only

//! Mount lifecycle to status icon lifecycle.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use mount_tray_contracts::{MountActions, VolumeError, VolumeMonitor};
use mount_tray_types::{MenuCommand, Mount, MountEvent, MountEventKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::TrayError;
use crate::icon::{IconEvent, StatusIcon, StatusIconFactory};
use crate::markup::tooltip_markup;
use crate::menu::ContextMenu;

struct IconEntry<I> {
    mount: Mount,
    icon: I,
}

/// Keeps one status icon per mounted volume, keyed by mount root.
///
/// All handlers take `&mut self` and are driven from a single task by
/// [`run`](IconManager::run), so the registry needs no locking.
pub struct IconManager<F: StatusIconFactory> {
    factory: F,
    actions: Arc<dyn MountActions>,
    icons: HashMap<String, IconEntry<F::Icon>>,
    menu: Option<ContextMenu>,
    open_on_activate: bool,
}

fn log_event(kind: MountEventKind, mount: &Mount) {
    info!("{} {}", mount.root, kind);
}

impl<F: StatusIconFactory> IconManager<F> {
    pub fn new(factory: F, actions: Arc<dyn MountActions>) -> Self {
        Self {
            factory,
            actions,
            icons: HashMap::new(),
            menu: None,
            open_on_activate: false,
        }
    }

    pub fn with_open_on_activate(mut self, enabled: bool) -> Self {
        self.open_on_activate = enabled;
        self
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.icons.contains_key(key)
    }

    /// Registered mount roots, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.icons.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn current_menu(&self) -> Option<&ContextMenu> {
        self.menu.as_ref()
    }

    /// Subscribe to `monitor`, then add an icon for every mount it already has.
    ///
    /// The subscription comes first so nothing mounted during startup is lost.
    pub async fn start(
        &mut self,
        monitor: &dyn VolumeMonitor,
    ) -> Result<mpsc::Receiver<MountEvent>, TrayError> {
        let events = monitor.subscribe().await?;

        let existing = monitor.mounts().await?;
        info!("Found {} mounted volume(s)", existing.len());
        for mount in existing {
            self.on_mount_added(mount).await?;
        }

        Ok(events)
    }

    /// Process events until `shutdown` resolves.
    ///
    /// Either event source closing is an error. Dropping the manager at the
    /// end releases every icon.
    pub async fn run(
        mut self,
        monitor: &dyn VolumeMonitor,
        mut icon_events: mpsc::UnboundedReceiver<IconEvent>,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), TrayError> {
        let mut mount_events = self.start(monitor).await?;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down, releasing {} icon(s)", self.icons.len());
                    break;
                }
                event = mount_events.recv() => {
                    let Some(event) = event else {
                        return Err(TrayError::Volume(VolumeError::unavailable(
                            "volume monitor stopped delivering events",
                        )));
                    };
                    self.handle_mount_event(event).await;
                }
                event = icon_events.recv() => {
                    let Some(event) = event else {
                        return Err(TrayError::IconEventsClosed);
                    };
                    self.handle_icon_event(event).await;
                }
            }
        }

        Ok(())
    }

    pub async fn handle_mount_event(&mut self, event: MountEvent) {
        match event {
            MountEvent::Added(mount) => {
                let root = mount.root.clone();
                if let Err(e) = self.on_mount_added(mount).await {
                    error!("Failed to create icon for {root}: {e}");
                }
            }
            MountEvent::Changed(mount) => self.on_mount_changed(&mount),
            MountEvent::PreUnmount(mount) => self.on_mount_pre_unmount(&mount),
            MountEvent::Removed(mount) => {
                if let Err(e) = self.on_mount_removed(&mount) {
                    warn!("{e}");
                }
            }
        }
    }

    /// Dispatch an icon interaction. Returns the spawned action, if any.
    pub async fn handle_icon_event(&mut self, event: IconEvent) -> Option<JoinHandle<()>> {
        match event {
            IconEvent::Activate { key } => self.on_activate(&key),
            IconEvent::PopupMenu { key, button, time } => {
                if let Err(e) = self.on_popup_menu(&key, button, time).await {
                    error!("Failed to show menu for {key}: {e}");
                }
                None
            }
            IconEvent::MenuDeactivate => {
                self.on_menu_deactivate();
                None
            }
            IconEvent::MenuItemActivated { key, command } => {
                self.on_menu_item_activated(&key, command)
            }
        }
    }

    /// Create and register an icon for `mount`.
    ///
    /// A mount whose root is already registered replaces the old entry. The
    /// old icon is released, and so is a menu still bound to the old mount.
    pub async fn on_mount_added(&mut self, mount: Mount) -> Result<(), TrayError> {
        log_event(MountEventKind::Added, &mount);
        for (key, value) in &mount.identifiers {
            debug!("    {key}: {value:?}");
        }

        let icon = self.create_icon(&mount).await?;
        let key = mount.root.clone();
        if let Some(previous) = self.icons.insert(key, IconEntry { mount, icon }) {
            warn!(
                "{} was already registered, releasing its previous icon",
                previous.mount.root
            );
            self.release_menu_of(&previous.mount);
        }

        Ok(())
    }

    pub fn on_mount_changed(&mut self, mount: &Mount) {
        log_event(MountEventKind::Changed, mount);
    }

    pub fn on_mount_pre_unmount(&mut self, mount: &Mount) {
        log_event(MountEventKind::PreUnmount, mount);
    }

    /// Drop the icon registered for `mount`, and its menu if one is open.
    pub fn on_mount_removed(&mut self, mount: &Mount) -> Result<(), TrayError> {
        log_event(MountEventKind::Removed, mount);

        let entry = self
            .icons
            .remove(mount.key())
            .ok_or_else(|| TrayError::UnknownMount(mount.root.clone()))?;

        self.release_menu_of(mount);

        debug!("Releasing icon of {}", entry.mount.root);
        Ok(())
    }

    fn release_menu_of(&mut self, mount: &Mount) {
        if self.menu.as_ref().is_some_and(|m| m.key() == mount.key()) {
            debug!("Releasing context menu of {}", mount.root);
            self.menu = None;
        }
    }

    async fn create_icon(&self, mount: &Mount) -> Result<F::Icon, TrayError> {
        let mut icon = self
            .factory
            .create(mount.key(), &mount.icon, &mount.name)
            .await?;
        icon.set_tooltip_markup(&tooltip_markup(&mount.name, &mount.root))
            .await?;
        icon.set_visible(true).await?;
        Ok(icon)
    }

    /// Build a fresh Open/Eject menu for the icon of `key` and show it.
    pub async fn on_popup_menu(
        &mut self,
        key: &str,
        button: u32,
        time: u32,
    ) -> Result<(), TrayError> {
        let Some(entry) = self.icons.get_mut(key) else {
            warn!("Menu requested for unknown icon {key}");
            return Ok(());
        };

        let menu = ContextMenu::for_mount(&entry.mount);
        entry.icon.show_menu(&menu, button, time).await?;

        if let Some(previous) = self.menu.replace(menu) {
            debug!("Replacing context menu of {}", previous.key());
        }
        Ok(())
    }

    pub fn on_menu_deactivate(&mut self) {
        if let Some(menu) = self.menu.take() {
            debug!("Context menu of {} closed", menu.key());
        }
    }

    pub fn on_menu_item_activated(
        &self,
        key: &str,
        command: MenuCommand,
    ) -> Option<JoinHandle<()>> {
        let Some(entry) = self.icons.get(key) else {
            warn!("Menu item {command} activated for unknown icon {key}");
            return None;
        };

        info!(
            "Menu item activated: label={:?} command={} mount={}",
            command.label(),
            command,
            entry.mount.root
        );
        Some(self.spawn_action(entry.mount.clone(), command))
    }

    pub fn on_activate(&self, key: &str) -> Option<JoinHandle<()>> {
        let Some(entry) = self.icons.get(key) else {
            warn!("Activate for unknown icon {key}");
            return None;
        };

        info!(
            "Activate: icon={} name={:?} mount={}",
            entry.mount.icon, entry.mount.name, entry.mount.root
        );

        self.open_on_activate
            .then(|| self.spawn_action(entry.mount.clone(), MenuCommand::Open))
    }

    fn spawn_action(&self, mount: Mount, command: MenuCommand) -> JoinHandle<()> {
        let actions = Arc::clone(&self.actions);
        tokio::spawn(async move {
            let result = match command {
                MenuCommand::Open => actions.open(&mount).await,
                MenuCommand::Eject => actions.eject(&mount).await,
            };
            if let Err(e) = result {
                error!("{} {} failed: {e}", command, mount.root);
            }
        })
    }
}
