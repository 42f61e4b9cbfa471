// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

use crate::Mount;

/// Mount lifecycle event emitted by a volume monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountEvent {
    Added(Mount),
    Changed(Mount),
    PreUnmount(Mount),
    Removed(Mount),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MountEventKind {
    Added,
    Changed,
    PreUnmount,
    Removed,
}

impl MountEvent {
    pub fn mount(&self) -> &Mount {
        match self {
            Self::Added(m) | Self::Changed(m) | Self::PreUnmount(m) | Self::Removed(m) => m,
        }
    }

    pub fn kind(&self) -> MountEventKind {
        match self {
            Self::Added(_) => MountEventKind::Added,
            Self::Changed(_) => MountEventKind::Changed,
            Self::PreUnmount(_) => MountEventKind::PreUnmount,
            Self::Removed(_) => MountEventKind::Removed,
        }
    }
}

impl MountEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Changed => "changed",
            Self::PreUnmount => "pre-unmount",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for MountEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
