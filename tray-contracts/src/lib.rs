// SPDX-License-Identifier: GPL-3.0-only

pub mod error;
pub mod traits;

pub use error::{VolumeError, VolumeErrorKind};
pub use traits::{MountActions, VolumeMonitor};
