// SPDX-License-Identifier: GPL-3.0-only

//! Seam between the icon manager and whatever draws status icons.

use async_trait::async_trait;
use mount_tray_types::MenuCommand;

use crate::error::TrayError;
use crate::menu::ContextMenu;

/// User interaction with a status icon, tagged with the mount key of the icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconEvent {
    /// Primary click.
    Activate { key: String },
    /// The host wants the context menu.
    PopupMenu { key: String, button: u32, time: u32 },
    /// The context menu was dismissed.
    MenuDeactivate,
    MenuItemActivated { key: String, command: MenuCommand },
}

/// A live status icon. Dropping it removes the icon.
#[async_trait]
pub trait StatusIcon: Send {
    async fn set_tooltip_markup(&mut self, markup: &str) -> Result<(), TrayError>;

    async fn set_visible(&mut self, visible: bool) -> Result<(), TrayError>;

    /// Show `menu` anchored to this icon.
    async fn show_menu(
        &mut self,
        menu: &ContextMenu,
        button: u32,
        time: u32,
    ) -> Result<(), TrayError>;
}

#[async_trait]
pub trait StatusIconFactory: Send + Sync {
    type Icon: StatusIcon;

    /// Create a hidden icon. Interactions are reported with `key`.
    async fn create(
        &self,
        key: &str,
        icon_name: &str,
        title: &str,
    ) -> Result<Self::Icon, TrayError>;
}
