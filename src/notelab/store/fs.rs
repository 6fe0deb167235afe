use super::SnapshotStore;
use crate::error::{NotelabError, Result};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

pub const DATA_FILENAME: &str = "notelab-data.json";

/// File-backed snapshot store: a single JSON document in `root`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn data_file(&self) -> PathBuf {
        self.root.join(DATA_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(NotelabError::Io)?;
        }
        Ok(())
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Result<Option<String>> {
        let data_file = self.data_file();
        if !data_file.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(data_file).map_err(NotelabError::Io)?;
        Ok(Some(content))
    }

    fn save(&self, snapshot: &str) -> Result<()> {
        self.ensure_dir()?;

        // Atomic write
        let tmp_file = self.root.join(format!(".notelab-data-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, snapshot).map_err(NotelabError::Io)?;
        fs::rename(&tmp_file, self.data_file()).map_err(NotelabError::Io)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_without_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_creates_directory_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("data"));

        store.save("{\"projects\":[]}").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("{\"projects\":[]}"));

        store.save("{\"projects\":[1]}").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("{\"projects\":[1]}"));
    }

    #[test]
    fn save_leaves_no_tmp_files() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        store.save("{}").unwrap();

        for entry in fs::read_dir(dir.path()).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_str().unwrap().to_string();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
        assert!(store.data_file().exists());
    }
}
