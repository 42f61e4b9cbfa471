// SPDX-License-Identifier: GPL-3.0-only

use mount_tray_types::Mount;

/// UDisks2 job operation started by `Filesystem.Unmount`.
pub(crate) const UNMOUNT_OPERATION: &str = "filesystem-unmount";

/// Mounts about to go away because of a freshly started UDisks2 job.
pub(crate) fn pre_unmount_targets(
    snapshot: &[Mount],
    operation: &str,
    objects: &[String],
) -> Vec<Mount> {
    if operation != UNMOUNT_OPERATION {
        return Vec::new();
    }

    snapshot
        .iter()
        .filter(|m| {
            m.object_path
                .as_ref()
                .is_some_and(|path| objects.iter().any(|o| o == path))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Vec<Mount> {
        vec![
            Mount::new("A", "/media/a", "media-flash")
                .with_object_path("/org/freedesktop/UDisks2/block_devices/sdb1"),
            Mount::new("B", "/media/b", "media-flash")
                .with_object_path("/org/freedesktop/UDisks2/block_devices/sdc1"),
        ]
    }

    #[test]
    fn unmount_job_targets_its_objects() {
        let objects = vec!["/org/freedesktop/UDisks2/block_devices/sdc1".to_string()];
        let targets = pre_unmount_targets(&snapshot(), UNMOUNT_OPERATION, &objects);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].root, "/media/b");
    }

    #[test]
    fn other_jobs_are_ignored() {
        let objects = vec!["/org/freedesktop/UDisks2/block_devices/sdb1".to_string()];
        assert!(pre_unmount_targets(&snapshot(), "drive-eject", &objects).is_empty());
    }
}
