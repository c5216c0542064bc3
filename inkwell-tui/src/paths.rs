//! Where inkwell keeps its files.
//!
//! Directories come from [`ProjectDirs`]: XDG on Linux, the platform
//! defaults elsewhere.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const CURRENT_LOG: &str = "inkwell.log";
const ARCHIVE_PREFIX: &str = "inkwell-";

/// Archived logs kept next to the current one.
const KEPT_LOGS: usize = 10;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "inkwell", "inkwell")
}

/// Sqlite database with the session tokens and UI preferences.
///
/// Linux: `~/.local/share/inkwell/inkwell.db`.
pub fn store_db() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("inkwell.db"))
}

/// Optional env file, read after `./.env`.
///
/// Linux: `~/.config/inkwell/inkwell.env`.
pub fn env_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("inkwell.env"))
}

/// Log file for this run, in the cache directory's `logs/`.
///
/// The previous run's log is archived under its modification time and only
/// the newest [`KEPT_LOGS`] archives survive.
pub fn log_file() -> Option<PathBuf> {
    let dir = project_dirs()?.cache_dir().join("logs");
    fs::create_dir_all(&dir).ok()?;
    Some(rotate(&dir, KEPT_LOGS))
}

fn rotate(dir: &Path, keep: usize) -> PathBuf {
    let current = dir.join(CURRENT_LOG);
    if let Ok(modified) = fs::metadata(&current).and_then(|m| m.modified()) {
        let stamp = chrono::DateTime::<chrono::Local>::from(modified).format("%Y%m%d-%H%M%S%.3f");
        let _ = fs::rename(&current, dir.join(format!("{}{}.log", ARCHIVE_PREFIX, stamp)));
    }

    let Ok(entries) = fs::read_dir(dir) else { return current };
    let mut archives: Vec<String> = entries
        .filter_map(|entry| entry.ok()?.file_name().into_string().ok())
        .filter(|name| name.starts_with(ARCHIVE_PREFIX) && name.ends_with(".log"))
        .collect();
    // Timestamped names sort oldest first
    archives.sort();
    let excess = archives.len().saturating_sub(keep);
    for name in &archives[..excess] {
        let _ = fs::remove_file(dir.join(name));
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn previous_log_is_archived() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CURRENT_LOG), "last run").unwrap();

        let current = rotate(dir.path(), 3);
        assert_eq!(current, dir.path().join(CURRENT_LOG));
        assert!(!current.exists());

        let names = names(dir.path());
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with(ARCHIVE_PREFIX));
        assert_eq!(fs::read_to_string(dir.path().join(&names[0])).unwrap(), "last run");
    }

    #[test]
    fn only_newest_archives_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        for day in 1..=5 {
            fs::write(dir.path().join(format!("inkwell-2026010{}-000000.000.log", day)), "").unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        rotate(dir.path(), 2);
        assert_eq!(
            names(dir.path()),
            vec![
                "inkwell-20260104-000000.000.log",
                "inkwell-20260105-000000.000.log",
                "notes.txt",
            ]
        );
    }
}
