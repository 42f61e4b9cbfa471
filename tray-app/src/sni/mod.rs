// SPDX-License-Identifier: GPL-3.0-only

//! Status icons as freedesktop StatusNotifierItems on the session bus.
//!
//! Every icon gets its own connection owning a
//! `org.kde.StatusNotifierItem-<pid>-<n>` name, with the item at
//! [`ITEM_PATH`] and its dbusmenu at [`MENU_PATH`]. Closing the connection
//! drops the name, which makes the watcher forget the item.

mod dbusmenu;
mod item;
mod watcher;

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;
use zbus::Connection;
use zbus::connection::Builder as ConnectionBuilder;

use crate::error::TrayError;
use crate::icon::{IconEvent, StatusIcon, StatusIconFactory};
use crate::menu::{ContextMenu, default_entries};

use dbusmenu::DbusMenu;
use item::StatusNotifierItem;
use watcher::StatusNotifierWatcherProxy;

pub(crate) const ITEM_PATH: &str = "/StatusNotifierItem";
pub(crate) const MENU_PATH: &str = "/MenuBar";

pub struct SniIconFactory {
    events: mpsc::UnboundedSender<IconEvent>,
    next_id: AtomicU32,
}

impl SniIconFactory {
    /// Icons created by this factory report interactions on `events`.
    pub async fn new(events: mpsc::UnboundedSender<IconEvent>) -> Result<Self, TrayError> {
        let connection = Connection::session().await?;
        match StatusNotifierWatcherProxy::new(&connection).await {
            Ok(watcher) => match watcher.is_status_notifier_host_registered().await {
                Ok(true) => tracing::info!("StatusNotifierWatcher found on the session bus"),
                Ok(false) => {
                    tracing::warn!("No system tray is running, icons stay hidden until one starts")
                }
                Err(e) => tracing::warn!("StatusNotifierWatcher unavailable: {e}"),
            },
            Err(e) => tracing::warn!("StatusNotifierWatcher unavailable: {e}"),
        }

        Ok(Self {
            events,
            next_id: AtomicU32::new(1),
        })
    }

    fn bus_name(&self) -> String {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("org.kde.StatusNotifierItem-{}-{}", std::process::id(), id)
    }
}

#[async_trait]
impl StatusIconFactory for SniIconFactory {
    type Icon = SniIcon;

    async fn create(&self, key: &str, icon_name: &str, title: &str) -> Result<SniIcon, TrayError> {
        let bus_name = self.bus_name();

        let item = StatusNotifierItem {
            key: key.to_string(),
            icon_name: icon_name.to_string(),
            title: title.to_string(),
            tooltip_markup: String::new(),
            visible: false,
            events: self.events.clone(),
        };
        let menu = DbusMenu {
            key: key.to_string(),
            entries: default_entries(),
            revision: 1,
            events: self.events.clone(),
        };

        let connection = ConnectionBuilder::session()?
            .name(bus_name.as_str())?
            .serve_at(ITEM_PATH, item)?
            .serve_at(MENU_PATH, menu)?
            .build()
            .await?;

        let watcher = StatusNotifierWatcherProxy::new(&connection).await?;
        if let Err(e) = watcher.register_status_notifier_item(&bus_name).await {
            tracing::warn!("Could not register {bus_name} for {key}: {e}");
        }

        tracing::debug!("Exported {bus_name} for {key}");
        Ok(SniIcon {
            key: key.to_string(),
            bus_name,
            connection,
        })
    }
}

/// One exported StatusNotifierItem. Dropping it closes its bus connection.
pub struct SniIcon {
    key: String,
    bus_name: String,
    connection: Connection,
}

#[async_trait]
impl StatusIcon for SniIcon {
    async fn set_tooltip_markup(&mut self, markup: &str) -> Result<(), TrayError> {
        let iface = self
            .connection
            .object_server()
            .interface::<_, StatusNotifierItem>(ITEM_PATH)
            .await?;
        iface.get_mut().await.tooltip_markup = markup.to_string();
        StatusNotifierItem::new_tool_tip(iface.signal_emitter()).await?;
        Ok(())
    }

    async fn set_visible(&mut self, visible: bool) -> Result<(), TrayError> {
        let iface = self
            .connection
            .object_server()
            .interface::<_, StatusNotifierItem>(ITEM_PATH)
            .await?;
        iface.get_mut().await.visible = visible;
        StatusNotifierItem::new_status(iface.signal_emitter(), item::status_name(visible)).await?;
        Ok(())
    }

    /// The host draws and positions the menu; keep the served layout in sync with `menu`.
    async fn show_menu(
        &mut self,
        menu: &ContextMenu,
        _button: u32,
        _time: u32,
    ) -> Result<(), TrayError> {
        let iface = self
            .connection
            .object_server()
            .interface::<_, DbusMenu>(MENU_PATH)
            .await?;

        let revision = {
            let mut served = iface.get_mut().await;
            if served.entries == menu.entries() {
                return Ok(());
            }
            served.entries = menu.entries().to_vec();
            served.revision += 1;
            served.revision
        };

        DbusMenu::layout_updated(iface.signal_emitter(), revision, 0).await?;
        Ok(())
    }
}

impl Drop for SniIcon {
    fn drop(&mut self) {
        tracing::debug!("Releasing {} for {}", self.bus_name, self.key);
    }
}
