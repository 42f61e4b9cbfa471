// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeErrorKind {
    NotFound,
    Busy,
    Unsupported,
    Unavailable,
    Internal,
}

impl VolumeErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::Busy => "busy",
            Self::Unsupported => "not supported",
            Self::Unavailable => "unavailable",
            Self::Internal => "internal error",
        }
    }
}

/// Error reported by a volume monitor or a mount action.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{}: {message}", kind.as_str())]
pub struct VolumeError {
    pub kind: VolumeErrorKind,
    pub message: String,
}

impl VolumeError {
    pub fn new(kind: VolumeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(VolumeErrorKind::Unavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(VolumeErrorKind::Internal, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let error = VolumeError::new(VolumeErrorKind::Busy, "/media/usb0 is in use");
        assert_eq!(error.to_string(), "busy: /media/usb0 is in use");
    }
}
