// SPDX-License-Identifier: GPL-3.0-only

use mount_tray_types::{Mount, MountEvent};

fn by_root<'a>(list: &'a [Mount], root: &str) -> Option<&'a Mount> {
    list.iter().find(|m| m.root == root)
}

/// A root now served by a different block object is a remove plus an add.
fn replaced(old: &Mount, new: &Mount) -> bool {
    old.object_path != new.object_path
}

/// Lifecycle events that turn `previous` into `current`.
///
/// Removals come first so a root that moved to another device is released
/// before it is reused, then changes, then additions. Each group keeps
/// snapshot order.
pub(crate) fn diff_mounts(previous: &[Mount], current: &[Mount]) -> Vec<MountEvent> {
    let mut events = Vec::new();

    for old in previous {
        match by_root(current, &old.root) {
            Some(new) if !replaced(old, new) => {}
            _ => events.push(MountEvent::Removed(old.clone())),
        }
    }

    for new in current {
        if let Some(old) = by_root(previous, &new.root)
            && !replaced(old, new)
            && !old.same_presentation(new)
        {
            events.push(MountEvent::Changed(new.clone()));
        }
    }

    for new in current {
        match by_root(previous, &new.root) {
            Some(old) if !replaced(old, new) => {}
            _ => events.push(MountEvent::Added(new.clone())),
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use mount_tray_types::{IDENTIFIER_LABEL, MountEventKind};

    fn mount(root: &str, block: &str) -> Mount {
        Mount::new(root.rsplit('/').next().unwrap_or(root), root, "drive-removable-media")
            .with_object_path(format!("/org/freedesktop/UDisks2/block_devices/{block}"))
    }

    fn summary(events: &[MountEvent]) -> Vec<(MountEventKind, String)> {
        events
            .iter()
            .map(|e| (e.kind(), e.mount().root.clone()))
            .collect()
    }

    #[test]
    fn identical_snapshots_produce_nothing() {
        let snapshot = vec![mount("/media/a", "sdb1"), mount("/media/b", "sdc1")];
        assert!(diff_mounts(&snapshot, &snapshot).is_empty());
    }

    #[test]
    fn removals_then_changes_then_additions() {
        let previous = vec![mount("/media/a", "sdb1"), mount("/media/b", "sdc1")];
        let relabelled = mount("/media/b", "sdc1").with_identifier(IDENTIFIER_LABEL, "BACKUP");
        let current = vec![relabelled, mount("/media/c", "sdd1")];

        assert_eq!(
            summary(&diff_mounts(&previous, &current)),
            vec![
                (MountEventKind::Removed, "/media/a".to_string()),
                (MountEventKind::Changed, "/media/b".to_string()),
                (MountEventKind::Added, "/media/c".to_string()),
            ]
        );
    }

    #[test]
    fn root_reused_by_another_device_is_remove_and_add() {
        let previous = vec![mount("/media/usb", "sdb1")];
        let current = vec![mount("/media/usb", "sdc1")];

        let events = diff_mounts(&previous, &current);
        assert_eq!(
            summary(&events),
            vec![
                (MountEventKind::Removed, "/media/usb".to_string()),
                (MountEventKind::Added, "/media/usb".to_string()),
            ]
        );
        assert_eq!(events[0].mount().object_path, previous[0].object_path);
        assert_eq!(events[1].mount().object_path, current[0].object_path);
    }

    #[test]
    fn additions_keep_snapshot_order() {
        let current = vec![mount("/media/a", "sdb1"), mount("/media/b", "sdc1")];
        assert_eq!(
            summary(&diff_mounts(&[], &current)),
            vec![
                (MountEventKind::Added, "/media/a".to_string()),
                (MountEventKind::Added, "/media/b".to_string()),
            ]
        );
    }
}
