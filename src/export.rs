use crate::error::Result;
use crate::session::{codec, Session};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Resolves the directory sessions and logs are written to: an explicit
/// (tilde-expanded) directory, else the platform data dir, else `.`.
pub fn data_dir(base_dir: Option<&str>) -> PathBuf {
    if let Some(custom_dir) = base_dir {
        PathBuf::from(shellexpand::tilde(custom_dir).to_string())
    } else {
        directories::ProjectDirs::from("com", "perfvisualizer", "perf-visualizer")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Writes exported session text to a new timestamped file and returns its
/// path. Exports within the same second get a `_1`, `_2`, ... suffix; an
/// existing file is never overwritten.
pub fn export_session_file(text: &str, base_dir: Option<&str>) -> Result<PathBuf> {
    let dir = data_dir(base_dir);
    std::fs::create_dir_all(&dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let (filepath, mut file) = create_unique(&dir, &timestamp)?;

    file.write_all(text.as_bytes())?;
    tracing::info!(path = %filepath.display(), bytes = text.len(), "exported session file");

    Ok(filepath)
}

fn create_unique(dir: &Path, timestamp: &str) -> Result<(PathBuf, File)> {
    let mut suffix = 0u32;
    loop {
        let filename = if suffix == 0 {
            format!("visualizer-session_{}.json", timestamp)
        } else {
            format!("visualizer-session_{}_{}.json", timestamp, suffix)
        };
        let filepath = dir.join(filename);

        match OpenOptions::new().write(true).create_new(true).open(&filepath) {
            Ok(file) => return Ok((filepath, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => suffix += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Reads a session file. IO failures are errors; unreadable content is
/// `Ok(None)`.
pub fn read_session_file(path: &Path) -> Result<Option<Session>> {
    let text = std::fs::read_to_string(path)?;
    let session = codec::import(&text);
    if session.is_none() {
        tracing::debug!(path = %path.display(), "file did not contain a session");
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::store::SeriesStore;
    use crate::session::SeriesKind;

    #[test]
    fn test_export_then_read_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();

        let mut store = SeriesStore::new(10).unwrap();
        store.record(SeriesKind::MemoryBytes, 1, 4096.0);
        store.add_mark(1, "boot");
        let text = codec::export(0, 500, &store.snapshot());

        let path = export_session_file(&text, Some(dir_str)).unwrap();
        assert!(path.starts_with(dir.path()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));

        let session = read_session_file(&path).unwrap().unwrap();
        assert_eq!(session.series(SeriesKind::MemoryBytes).len(), 1);
        assert_eq!(session.marks[0].label, "boot");
    }

    #[test]
    fn test_exports_in_the_same_second_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();

        let (first, _) = create_unique(dir.path(), "20260101_120000").unwrap();
        let (second, _) = create_unique(dir.path(), "20260101_120000").unwrap();
        assert_eq!(
            first.file_name().and_then(|n| n.to_str()),
            Some("visualizer-session_20260101_120000.json")
        );
        assert_eq!(
            second.file_name().and_then(|n| n.to_str()),
            Some("visualizer-session_20260101_120000_1.json")
        );

        let dir_str = dir.path().to_str().unwrap();
        let a = export_session_file("{\"series\":{}}", Some(dir_str)).unwrap();
        let b = export_session_file("{\"series\":{}}", Some(dir_str)).unwrap();
        assert_ne!(a, b);
        assert!(a.is_file() && b.is_file());
    }

    #[test]
    fn test_read_session_file_with_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.json");
        std::fs::write(&path, "definitely not a session").unwrap();

        assert!(read_session_file(&path).unwrap().is_none());
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_session_file(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_data_dir_prefers_explicit_dir() {
        assert_eq!(data_dir(Some("/tmp/sessions")), PathBuf::from("/tmp/sessions"));
        assert!(data_dir(Some("~/sessions")).ends_with("sessions"));
    }
}
