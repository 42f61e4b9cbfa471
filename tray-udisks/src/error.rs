// SPDX-License-Identifier: GPL-3.0-only

use mount_tray_contracts::{VolumeError, VolumeErrorKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UdisksError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Device is busy: {0}")]
    DeviceBusy(String),

    #[error("Not supported by this drive: {0}")]
    NotSupported(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("D-Bus error: {0}")]
    Zbus(#[from] zbus::Error),
}

impl UdisksError {
    /// Classify a failed UDisks2 method call by its error name.
    pub(crate) fn from_call(context: &str, err: zbus::Error) -> Self {
        let msg = err.to_string();
        if msg.contains("DeviceBusy") || msg.contains("Device or resource busy") {
            Self::DeviceBusy(format!("{context}. Close any programs using it and try again."))
        } else if msg.contains("NotSupported")
            || msg.contains("not supported")
            || msg.contains("No such interface")
        {
            Self::NotSupported(context.to_string())
        } else {
            Self::OperationFailed(format!("{context}: {msg}"))
        }
    }
}

impl From<UdisksError> for VolumeError {
    fn from(err: UdisksError) -> Self {
        let kind = match &err {
            UdisksError::ConnectionFailed(_) => VolumeErrorKind::Unavailable,
            UdisksError::DeviceBusy(_) => VolumeErrorKind::Busy,
            UdisksError::NotSupported(_) => VolumeErrorKind::Unsupported,
            UdisksError::DeviceNotFound(_) => VolumeErrorKind::NotFound,
            UdisksError::OperationFailed(_) | UdisksError::Zbus(_) => VolumeErrorKind::Internal,
        };
        VolumeError::new(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_call_maps_to_busy_kind() {
        let err = UdisksError::from_call(
            "Unmount /media/usb0",
            zbus::Error::Failure("org.freedesktop.UDisks2.Error.DeviceBusy: target is busy".into()),
        );
        assert!(matches!(err, UdisksError::DeviceBusy(_)));
        assert_eq!(VolumeError::from(err).kind, VolumeErrorKind::Busy);
    }

    #[test]
    fn unknown_failure_is_internal() {
        let err = UdisksError::from_call("Eject", zbus::Error::Failure("boom".into()));
        let volume_error = VolumeError::from(err);
        assert_eq!(volume_error.kind, VolumeErrorKind::Internal);
        assert!(volume_error.message.contains("boom"));
    }
}
