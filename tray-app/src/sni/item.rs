// SPDX-License-Identifier: GPL-3.0-only

//! `org.kde.StatusNotifierItem` for one mount.

use tokio::sync::mpsc;
use zbus::interface;
use zbus::object_server::SignalEmitter;
use zbus::zvariant::ObjectPath;

use crate::icon::IconEvent;

use super::MENU_PATH;

/// Icon name, pixmaps, title, description.
pub(crate) type ToolTip = (String, Vec<(i32, i32, Vec<u8>)>, String, String);

pub(crate) struct StatusNotifierItem {
    pub(crate) key: String,
    pub(crate) icon_name: String,
    pub(crate) title: String,
    pub(crate) tooltip_markup: String,
    pub(crate) visible: bool,
    pub(crate) events: mpsc::UnboundedSender<IconEvent>,
}

impl StatusNotifierItem {
    fn send(&self, event: IconEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("Icon event for {} dropped, manager is gone", self.key);
        }
    }
}

#[interface(name = "org.kde.StatusNotifierItem")]
impl StatusNotifierItem {
    async fn activate(&self, _x: i32, _y: i32) {
        self.send(IconEvent::Activate {
            key: self.key.clone(),
        });
    }

    /// Only called by hosts that do not render `Menu` themselves.
    async fn context_menu(&self, _x: i32, _y: i32) {
        self.send(IconEvent::PopupMenu {
            key: self.key.clone(),
            button: 3,
            time: 0,
        });
    }

    async fn secondary_activate(&self, _x: i32, _y: i32) {}

    async fn scroll(&self, _delta: i32, _orientation: String) {}

    #[zbus(signal)]
    pub(crate) async fn new_status(emitter: &SignalEmitter<'_>, status: &str) -> zbus::Result<()>;

    #[zbus(signal)]
    pub(crate) async fn new_tool_tip(emitter: &SignalEmitter<'_>) -> zbus::Result<()>;

    #[zbus(property)]
    async fn category(&self) -> String {
        "Hardware".to_string()
    }

    #[zbus(property)]
    async fn id(&self) -> String {
        format!("mount-tray:{}", self.key)
    }

    #[zbus(property)]
    async fn title(&self) -> String {
        self.title.clone()
    }

    #[zbus(property)]
    async fn status(&self) -> String {
        status_name(self.visible).to_string()
    }

    #[zbus(property)]
    async fn window_id(&self) -> i32 {
        0
    }

    #[zbus(property)]
    async fn icon_name(&self) -> String {
        self.icon_name.clone()
    }

    #[zbus(property)]
    async fn icon_theme_path(&self) -> String {
        String::new()
    }

    #[zbus(property)]
    async fn tool_tip(&self) -> ToolTip {
        (
            self.icon_name.clone(),
            Vec::new(),
            self.title.clone(),
            self.tooltip_markup.clone(),
        )
    }

    #[zbus(property)]
    async fn item_is_menu(&self) -> bool {
        false
    }

    #[zbus(property)]
    async fn menu(&self) -> ObjectPath<'static> {
        ObjectPath::from_static_str_unchecked(MENU_PATH)
    }
}

pub(crate) fn status_name(visible: bool) -> &'static str {
    if visible { "Active" } else { "Passive" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_items_are_passive() {
        assert_eq!(status_name(true), "Active");
        assert_eq!(status_name(false), "Passive");
    }

    #[tokio::test]
    async fn clicks_are_forwarded_with_the_mount_key() {
        let (events, mut received) = mpsc::unbounded_channel();
        let item = StatusNotifierItem {
            key: "/media/usb0".to_string(),
            icon_name: "media-flash".to_string(),
            title: "USB Drive".to_string(),
            tooltip_markup: String::new(),
            visible: true,
            events,
        };

        item.activate(10, 10).await;
        item.context_menu(10, 10).await;

        assert_eq!(
            received.recv().await,
            Some(IconEvent::Activate {
                key: "/media/usb0".to_string()
            })
        );
        assert_eq!(
            received.recv().await,
            Some(IconEvent::PopupMenu {
                key: "/media/usb0".to_string(),
                button: 3,
                time: 0
            })
        );
    }
}
