// SPDX-License-Identifier: GPL-3.0-only

//! `com.canonical.dbusmenu` serving an icon's context menu.
//!
//! The root item has id 0; entries are numbered from 1 in display order.

use std::collections::HashMap;

use mount_tray_types::MenuCommand;
use tokio::sync::mpsc;
use zbus::interface;
use zbus::object_server::SignalEmitter;
use zbus::zvariant::{OwnedValue, Value};

use crate::icon::IconEvent;
use crate::menu::MenuEntry;

const ROOT_ID: i32 = 0;

/// `(id, properties, children)`, children being variants of the same shape.
pub(crate) type Layout = (i32, HashMap<String, OwnedValue>, Vec<OwnedValue>);

pub(crate) struct DbusMenu {
    pub(crate) key: String,
    pub(crate) entries: Vec<MenuEntry>,
    pub(crate) revision: u32,
    pub(crate) events: mpsc::UnboundedSender<IconEvent>,
}

fn owned<'a>(value: impl Into<Value<'a>>) -> zbus::fdo::Result<OwnedValue> {
    OwnedValue::try_from(value.into()).map_err(|e| zbus::fdo::Error::Failed(e.to_string()))
}

impl DbusMenu {
    fn command_for(&self, id: i32) -> Option<MenuCommand> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.entries.get(index).map(|e| e.command)
    }

    fn properties(&self, id: i32) -> zbus::fdo::Result<HashMap<String, OwnedValue>> {
        let mut props = HashMap::new();
        if id == ROOT_ID {
            props.insert("children-display".to_string(), owned("submenu")?);
            return Ok(props);
        }

        let command = self
            .command_for(id)
            .ok_or_else(|| zbus::fdo::Error::InvalidArgs(format!("unknown menu item {id}")))?;
        props.insert("label".to_string(), owned(command.label())?);
        props.insert("enabled".to_string(), owned(true)?);
        props.insert("visible".to_string(), owned(true)?);
        Ok(props)
    }

    fn item_ids(&self) -> impl Iterator<Item = i32> + '_ {
        (1..).take(self.entries.len())
    }

    pub(crate) fn layout(&self, parent_id: i32) -> zbus::fdo::Result<Layout> {
        if parent_id != ROOT_ID {
            return Ok((parent_id, self.properties(parent_id)?, Vec::new()));
        }

        let mut children = Vec::with_capacity(self.entries.len());
        for id in self.item_ids() {
            let child: (i32, HashMap<String, OwnedValue>, Vec<OwnedValue>) =
                (id, self.properties(id)?, Vec::new());
            children.push(owned(child)?);
        }

        Ok((ROOT_ID, self.properties(ROOT_ID)?, children))
    }

    /// Translate a dbusmenu event into an icon event.
    pub(crate) fn translate(&self, id: i32, event_id: &str, timestamp: u32) -> Option<IconEvent> {
        match (id, event_id) {
            (ROOT_ID, "opened") => Some(IconEvent::PopupMenu {
                key: self.key.clone(),
                button: 3,
                time: timestamp,
            }),
            (ROOT_ID, "closed") => Some(IconEvent::MenuDeactivate),
            (id, "clicked") => self.command_for(id).map(|command| IconEvent::MenuItemActivated {
                key: self.key.clone(),
                command,
            }),
            _ => None,
        }
    }

    fn dispatch(&self, id: i32, event_id: &str, timestamp: u32) {
        let Some(event) = self.translate(id, event_id, timestamp) else {
            tracing::trace!("Ignoring menu event {event_id} on item {id}");
            return;
        };
        if self.events.send(event).is_err() {
            tracing::debug!("Menu event for {} dropped, manager is gone", self.key);
        }
    }
}

#[interface(name = "com.canonical.dbusmenu")]
impl DbusMenu {
    async fn get_layout(
        &self,
        parent_id: i32,
        _recursion_depth: i32,
        _property_names: Vec<String>,
    ) -> zbus::fdo::Result<(u32, Layout)> {
        Ok((self.revision, self.layout(parent_id)?))
    }

    async fn get_group_properties(
        &self,
        ids: Vec<i32>,
        _property_names: Vec<String>,
    ) -> zbus::fdo::Result<Vec<(i32, HashMap<String, OwnedValue>)>> {
        let ids = if ids.is_empty() {
            std::iter::once(ROOT_ID).chain(self.item_ids()).collect()
        } else {
            ids
        };

        ids.into_iter()
            .map(|id| Ok((id, self.properties(id)?)))
            .collect()
    }

    async fn get_property(&self, id: i32, name: String) -> zbus::fdo::Result<OwnedValue> {
        let mut props = self.properties(id)?;
        props
            .remove(&name)
            .ok_or_else(|| zbus::fdo::Error::InvalidArgs(format!("item {id} has no {name}")))
    }

    async fn event(&self, id: i32, event_id: String, _data: OwnedValue, timestamp: u32) {
        self.dispatch(id, &event_id, timestamp);
    }

    async fn event_group(&self, events: Vec<(i32, String, OwnedValue, u32)>) -> Vec<i32> {
        let mut unknown = Vec::new();
        for (id, event_id, _data, timestamp) in events {
            if id != ROOT_ID && self.command_for(id).is_none() {
                unknown.push(id);
                continue;
            }
            self.dispatch(id, &event_id, timestamp);
        }
        unknown
    }

    async fn about_to_show(&self, _id: i32) -> bool {
        false
    }

    async fn about_to_show_group(&self, _ids: Vec<i32>) -> (Vec<i32>, Vec<i32>) {
        (Vec::new(), Vec::new())
    }

    #[zbus(signal)]
    pub(crate) async fn layout_updated(
        emitter: &SignalEmitter<'_>,
        revision: u32,
        parent: i32,
    ) -> zbus::Result<()>;

    #[zbus(property)]
    async fn version(&self) -> u32 {
        3
    }

    #[zbus(property)]
    async fn text_direction(&self) -> String {
        "ltr".to_string()
    }

    #[zbus(property)]
    async fn status(&self) -> String {
        "normal".to_string()
    }

    #[zbus(property)]
    async fn icon_theme_path(&self) -> Vec<String> {
        Vec::new()
    }
}
