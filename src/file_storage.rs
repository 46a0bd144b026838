use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use grocery_shopping::{GroceryResult, ListStorage};

/// Grocery list persisted as a JSON file.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash never leaves a half-written list behind.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ListStorage for JsonFileStorage {
    fn read(&self) -> GroceryResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, value: &str) -> GroceryResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        fs::write(&temp, value)?;
        fs::rename(&temp, &self.path)?;

        tracing::debug!(path = %self.path.display(), bytes = value.len(), "grocery list saved");
        Ok(())
    }
}
