use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const SESSION_SLOT_NAME: &str = "visualizer_session";

/// A single named slot holding one exported session text.
pub trait SessionSlot: Send + Sync {
    fn get(&self) -> Result<Option<String>>;

    fn set(&self, text: &str) -> Result<()>;

    fn remove(&self) -> Result<()>;

    fn exists(&self) -> bool;
}

/// Slot backed by `<dir>/visualizer_session.json`.
#[derive(Debug, Clone)]
pub struct FileSessionSlot {
    path: PathBuf,
}

impl FileSessionSlot {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", SESSION_SLOT_NAME)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionSlot for FileSessionSlot {
    fn get(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, text: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, text)?;
        tracing::info!(path = %self.path.display(), bytes = text.len(), "saved session slot");
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionSlot {
    value: Mutex<Option<String>>,
}

impl MemorySessionSlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionSlot for MemorySessionSlot {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.value.lock().ok().and_then(|v| v.clone()))
    }

    fn set(&self, text: &str) -> Result<()> {
        if let Ok(mut value) = self.value.lock() {
            *value = Some(text.to_string());
        }
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        if let Ok(mut value) = self.value.lock() {
            *value = None;
        }
        Ok(())
    }

    fn exists(&self) -> bool {
        self.value.lock().map(|v| v.is_some()).unwrap_or(false)
    }
}
