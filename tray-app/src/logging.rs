// SPDX-License-Identifier: GPL-3.0-only

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Config, LoggingLevel};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_PREFIX: &str = "mount-tray.log";
const KEEP_DAYS: u64 = 7;

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config.log_level)));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    if !config.log_to_disk {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stdout_layer)
            .init();
        return;
    }

    match file_writer() {
        Ok((writer, guard, removed)) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .with_timer(tracing_subscriber::fmt::time::SystemTime);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout_layer)
                .with(file_layer)
                .init();

            // The worker flushes until the guard drops; keep it for the whole process.
            let _ = LOG_GUARD.set(guard);
            if removed > 0 {
                tracing::debug!("Removed {removed} log file(s) older than {KEEP_DAYS} days");
            }
        }
        Err(e) => {
            eprintln!("mount-tray: failed to initialize file logging: {e}");
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout_layer)
                .init();
        }
    }
}

/// Our crates at the configured level, zbus internals no louder than warn.
pub(crate) fn default_directives(level: LoggingLevel) -> String {
    let level = level.as_directive();
    format!("warn,mount_tray={level},mount_tray_udisks={level},zbus=warn,tracing=warn")
}

/// Open the daily rolled log file, first deleting days older than [`KEEP_DAYS`].
fn file_writer() -> std::io::Result<(NonBlocking, WorkerGuard, usize)> {
    let dir = log_dir();
    fs::create_dir_all(&dir)?;

    let removed = remove_stale_logs(&dir, SystemTime::now());
    let appender = tracing_appender::rolling::daily(&dir, LOG_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    Ok((writer, guard, removed))
}

fn log_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("MOUNT_TRAY_LOG_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(xdg_state) = std::env::var_os("XDG_STATE_HOME") {
        return PathBuf::from(xdg_state).join("mount-tray").join("logs");
    }

    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("state")
            .join("mount-tray")
            .join("logs");
    }

    PathBuf::from("/tmp").join("mount-tray").join("logs")
}

/// Rolled files are named `mount-tray.log.<date>`.
fn is_stale_log(file_name: &str, modified: SystemTime, now: SystemTime) -> bool {
    let Some(rolled) = file_name.strip_prefix(LOG_PREFIX) else {
        return false;
    };
    if !rolled.starts_with('.') {
        return false;
    }

    now.duration_since(modified)
        .is_ok_and(|age| age > Duration::from_secs(KEEP_DAYS * 24 * 60 * 60))
}

fn remove_stale_logs(dir: &Path, now: SystemTime) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };

    entries
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter(|entry| {
            let modified = entry.metadata().and_then(|m| m.modified());
            modified.is_ok_and(|m| is_stale_log(&entry.file_name().to_string_lossy(), m, now))
        })
        .filter(|entry| fs::remove_file(entry.path()).is_ok())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_parse() {
        for level in [LoggingLevel::Error, LoggingLevel::Debug, LoggingLevel::Trace] {
            let directives = default_directives(level);
            assert!(EnvFilter::try_new(&directives).is_ok(), "{directives}");
            assert!(directives.contains(&format!("mount_tray={}", level.as_directive())));
        }
    }

    #[test]
    fn only_rolled_files_past_a_week_are_stale() {
        let now = SystemTime::now();
        let old = now - Duration::from_secs(8 * 24 * 60 * 60);
        let recent = now - Duration::from_secs(2 * 24 * 60 * 60);

        assert!(is_stale_log("mount-tray.log.2026-01-02", old, now));
        assert!(!is_stale_log("mount-tray.log.2026-01-09", recent, now));
        assert!(!is_stale_log("mount-tray.logger", old, now));
        assert!(!is_stale_log("notes.txt", old, now));
    }

    #[test]
    fn stale_logs_are_removed_from_the_directory() {
        let dir = std::env::temp_dir().join(format!("mount-tray-logs-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("mount-tray.log.2026-01-02"), "old").unwrap();
        fs::write(dir.join("notes.txt"), "keep").unwrap();

        let in_two_weeks = SystemTime::now() + Duration::from_secs(14 * 24 * 60 * 60);
        assert_eq!(remove_stale_logs(&dir, in_two_weeks), 1);
        assert!(dir.join("notes.txt").exists());
        assert!(!dir.join("mount-tray.log.2026-01-02").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
