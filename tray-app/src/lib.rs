// SPDX-License-Identifier: GPL-3.0-only

//! Status icons for mounted removable volumes.
//!
//! Watches UDisks2 for mounts and exports one StatusNotifierItem per mounted
//! volume, each with an Open/Eject context menu.

pub mod cli;
pub mod config;
pub mod error;
pub mod icon;
pub mod logging;
pub mod manager;
pub mod markup;
pub mod menu;
pub mod sni;

pub use error::TrayError;
pub use icon::{IconEvent, StatusIcon, StatusIconFactory};
pub use manager::IconManager;
pub use menu::{ContextMenu, MenuEntry};
