// SPDX-License-Identifier: GPL-3.0-only

use mount_tray_types::{MenuCommand, Mount};

/// One selectable row of a context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub command: MenuCommand,
}

impl MenuEntry {
    pub fn new(command: MenuCommand) -> Self {
        Self {
            label: command.label(),
            command,
        }
    }
}

/// The default entries, in display order.
pub fn default_entries() -> Vec<MenuEntry> {
    MenuCommand::ALL.into_iter().map(MenuEntry::new).collect()
}

/// A popup menu bound to the mount whose icon requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    mount: Mount,
    entries: Vec<MenuEntry>,
}

impl ContextMenu {
    pub fn for_mount(mount: &Mount) -> Self {
        Self {
            mount: mount.clone(),
            entries: default_entries(),
        }
    }

    pub fn mount(&self) -> &Mount {
        &self.mount
    }

    pub fn key(&self) -> &str {
        self.mount.key()
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_has_open_then_eject_bound_to_mount() {
        let mount = Mount::new("USB Drive", "/media/usb0", "drive-removable-media-usb");
        let menu = ContextMenu::for_mount(&mount);

        let rows: Vec<_> = menu
            .entries()
            .iter()
            .map(|e| (e.label, e.command.token()))
            .collect();
        assert_eq!(rows, [("Open", "open"), ("Eject", "eject")]);
        assert_eq!(menu.mount(), &mount);
        assert_eq!(menu.key(), "/media/usb0");
    }
}
