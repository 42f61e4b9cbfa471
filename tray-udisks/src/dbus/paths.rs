// SPDX-License-Identifier: GPL-3.0-only

//! Filesystem paths UDisks2 sends as NUL terminated `ay` values.

use std::ffi::CStr;

/// Decode one path. Anything after the first NUL is ignored; an empty path is `None`.
pub(crate) fn path_from_bytes(bytes: &[u8]) -> Option<String> {
    let raw = CStr::from_bytes_until_nul(bytes)
        .map(CStr::to_bytes)
        .unwrap_or(bytes);
    (!raw.is_empty()).then(|| String::from_utf8_lossy(raw).into_owned())
}

/// The mount root of a filesystem: its first non-empty mount point.
pub(crate) fn mount_root(mount_points: &[Vec<u8>]) -> Option<String> {
    mount_points.iter().find_map(|mp| path_from_bytes(mp))
}

/// Device node for the `unix-device` identifier, preferring the udev symlink UDisks2 picked.
pub(crate) fn device_node(preferred: &[u8], device: &[u8]) -> String {
    path_from_bytes(preferred)
        .or_else(|| path_from_bytes(device))
        .unwrap_or_default()
}
