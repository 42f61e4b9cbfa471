// SPDX-License-Identifier: GPL-3.0-only

//! UDisks2 backed volume monitor.
//!
//! Mounts are read from the system bus with the `udisks2` proxies. Lifecycle
//! events come from diffing successive snapshots, taken whenever UDisks2
//! reports a block or filesystem change.

mod dbus;

pub mod actions;
pub mod discovery;
pub mod error;
pub mod monitor;

pub use actions::UdisksMountActions;
pub use discovery::list_mounts;
pub use error::UdisksError;
pub use monitor::UdisksVolumeMonitor;
