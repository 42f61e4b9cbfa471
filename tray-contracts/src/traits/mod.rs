// SPDX-License-Identifier: GPL-3.0-only

mod actions;
mod monitor;

pub use actions::MountActions;
pub use monitor::VolumeMonitor;
