//! Save stores
//!
//! A store holds exactly one save document. Callers serialize the state to a
//! string first and only then hand it to `write`, so a failed write never
//! leaves a half-built snapshot behind.

use crate::error::PersistError;

/// Backing storage for the single save document
pub trait SaveStore {
    /// Current save, or `None` if nothing has been written yet
    fn read(&self) -> Result<Option<String>, PersistError>;

    /// Replace the save with `data`
    fn write(&mut self, data: &str) -> Result<(), PersistError>;
}

/// In-memory store for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Option<String>,
    /// Number of successful writes
    pub writes: u32,
}

impl MemoryStore {
    /// Store pre-loaded with a save document
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            writes: 0,
        }
    }
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, PersistError> {
        Ok(self.data.clone())
    }

    fn write(&mut self, data: &str) -> Result<(), PersistError> {
        self.data = Some(data.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// JSON file on disk with one backup generation
///
/// Writes go to `<path>.tmp` first. The previous save is rotated to
/// `<path>.bak` before the temp file is renamed into place.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn sibling(&self, ext: &str) -> std::path::PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".");
        name.push(ext);
        std::path::PathBuf::from(name)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SaveStore for FileStore {
    fn read(&self) -> Result<Option<String>, PersistError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, data: &str) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.sibling("tmp");
        std::fs::write(&tmp, data)?;

        if self.path.exists() {
            std::fs::rename(&self.path, self.sibling("bak"))?;
        }
        std::fs::rename(&tmp, &self.path)?;

        log::debug!("Saved {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_replaces() {
        let mut store = MemoryStore::default();
        assert_eq!(store.read().unwrap(), None);
        store.write("{\"a\":1}").unwrap();
        store.write("{\"a\":2}").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("{\"a\":2}"));
        assert_eq!(store.writes, 2);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_rotates_backup() {
        let dir = std::env::temp_dir().join(format!(
            "catapult_space_store_test_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        let mut store = FileStore::new(dir.join("save.json"));

        assert_eq!(store.read().unwrap(), None);
        store.write("first").unwrap();
        store.write("second").unwrap();

        assert_eq!(store.read().unwrap().as_deref(), Some("second"));
        let backup = std::fs::read_to_string(dir.join("save.json.bak")).unwrap();
        assert_eq!(backup, "first");
        assert!(!dir.join("save.json.tmp").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
