// SPDX-License-Identifier: GPL-3.0-only

//! Shared domain models for the mount tray notifier
//!
//! These types flow through every layer:
//!
//! - **mount-tray-udisks**: builds `Mount` values from UDisks2 and emits `MountEvent`s
//! - **mount-tray**: keys its icon registry by `Mount::root` and binds
//!   `MenuCommand`s to the context menu of each icon

pub mod event;
pub mod menu;
pub mod mount;

pub use event::{MountEvent, MountEventKind};
pub use menu::MenuCommand;
pub use mount::{
    DriveInfo, IDENTIFIER_CLASS, IDENTIFIER_LABEL, IDENTIFIER_UNIX_DEVICE, IDENTIFIER_UUID, Mount,
};
