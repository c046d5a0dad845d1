//! Library backed by a directory of JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, warn};

use crate::error::{Result, StagecraftError};
use crate::export::ExportPackage;

use super::{AssetLibrary, LibraryEntry};

/// Stores each entry as `<id>.json` under one directory.
pub struct JsonFileLibrary {
    path: PathBuf,
}

impl JsonFileLibrary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.path)
            .with_context(|| format!("Failed to create library at {:?}", self.path))?;
        Ok(())
    }

    fn entry_path(&self, id: &str) -> PathBuf {
        self.path.join(format!("{}.json", id))
    }

    /// Ids come from user input; anything that could escape the directory
    /// is treated as unknown.
    fn is_valid_id(id: &str) -> bool {
        !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

impl AssetLibrary for JsonFileLibrary {
    fn save(&self, package: &ExportPackage) -> Result<LibraryEntry> {
        self.ensure_dir()?;
        let entry = LibraryEntry::new(package.clone())?;
        let path = self.entry_path(&entry.id);
        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(&path, json).with_context(|| format!("Failed to write entry to {:?}", path))?;
        debug!(id = %entry.id, path = %path.display(), "Wrote library entry");
        Ok(entry)
    }

    fn list(&self) -> Result<Vec<LibraryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&self.path)? {
            let path = dir_entry?.path();
            if !path.extension().is_some_and(|e| e == "json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|json| Ok(serde_json::from_str::<LibraryEntry>(&json)?));
            match parsed {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable library entry"),
            }
        }

        entries.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(entries)
    }

    fn load(&self, id: &str) -> Result<LibraryEntry> {
        let path = self.entry_path(id);
        if !Self::is_valid_id(id) || !path.exists() {
            return Err(StagecraftError::LibraryEntryNotFound { id: id.to_string() });
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read entry {:?}", path))?;
        let entry = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse entry {:?}", path))?;
        Ok(entry)
    }

    fn remove(&self, id: &str) -> Result<bool> {
        if !Self::is_valid_id(id) {
            return Ok(false);
        }
        let path = self.entry_path(id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PipelineStep, Selection};
    use chrono::Utc;
    use tempfile::TempDir;

    fn package(content: &str) -> ExportPackage {
        ExportPackage::from_parts(
            &Selection::default(),
            vec![(PipelineStep::Generate, content.to_string())],
            Utc::now(),
        )
    }

    #[test]
    fn save_and_load() {
        let temp = TempDir::new().unwrap();
        let library = JsonFileLibrary::new(temp.path().join("library"));

        let entry = library.save(&package("hello")).unwrap();
        assert!(temp
            .path()
            .join("library")
            .join(format!("{}.json", entry.id))
            .exists());

        let loaded = library.load(&entry.id).unwrap();
        assert_eq!(loaded, entry);
    }

    #[test]
    fn list_on_missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        let library = JsonFileLibrary::new(temp.path().join("nope"));
        assert!(library.list().unwrap().is_empty());
    }

    #[test]
    fn list_is_newest_first() {
        let temp = TempDir::new().unwrap();
        let library = JsonFileLibrary::new(temp.path());

        for content in ["first", "second", "third"] {
            library.save(&package(content)).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let entries = library.list().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].package.content(PipelineStep::Generate), Some("third"));
        assert_eq!(entries[2].package.content(PipelineStep::Generate), Some("first"));
    }

    #[test]
    fn list_skips_corrupt_files() {
        let temp = TempDir::new().unwrap();
        let library = JsonFileLibrary::new(temp.path());
        library.save(&package("ok")).unwrap();
        fs::write(temp.path().join("pkg_broken.json"), "{").unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(library.list().unwrap().len(), 1);
    }

    #[test]
    fn load_unknown_id() {
        let temp = TempDir::new().unwrap();
        let library = JsonFileLibrary::new(temp.path());
        let err = library.load("pkg_000000000000").unwrap_err();
        assert!(matches!(err, StagecraftError::LibraryEntryNotFound { .. }));
    }

    #[test]
    fn load_rejects_path_like_ids() {
        let temp = TempDir::new().unwrap();
        let library = JsonFileLibrary::new(temp.path().join("library"));
        fs::write(temp.path().join("outside.json"), "{}").unwrap();

        assert!(matches!(
            library.load("../outside").unwrap_err(),
            StagecraftError::LibraryEntryNotFound { .. }
        ));
        assert!(!library.remove("../outside").unwrap());
    }

    #[test]
    fn remove_deletes_file() {
        let temp = TempDir::new().unwrap();
        let library = JsonFileLibrary::new(temp.path());
        let entry = library.save(&package("bye")).unwrap();

        assert!(library.remove(&entry.id).unwrap());
        assert!(!library.remove(&entry.id).unwrap());
        assert!(library.list().unwrap().is_empty());
    }
}
