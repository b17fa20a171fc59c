//! Folder mode: a source folder of recordings and a result folder.
//!
//! A recording counts as labeled once a file with the same name exists in
//! the result folder. Exports use the source file name, so saving into the
//! result folder marks the file done.

use crate::error::{Result, ResultExt};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// One recording in the source folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub name: String,
    pub labeled: bool,
}

/// Source/result folder pair and the cached listings of both
#[derive(Debug, Clone, Default)]
pub struct FolderIndex {
    source_dir: Option<PathBuf>,
    result_dir: Option<PathBuf>,
    sources: Vec<String>,
    results: BTreeSet<String>,
}

/// Name an export of `source_name` is saved under
pub fn export_file_name(source_name: &str) -> String {
    source_name.to_string()
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

fn list_files(dir: &Path, filter: impl Fn(&Path) -> bool) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let entries = std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && filter(&path) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

impl FolderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_dir(&self) -> Option<&Path> {
        self.source_dir.as_deref()
    }

    pub fn result_dir(&self) -> Option<&Path> {
        self.result_dir.as_deref()
    }

    /// Open a source folder and list its recordings.
    ///
    /// On failure the previous folder stays open.
    pub fn set_source_dir(&mut self, dir: impl Into<PathBuf>) -> Result<()> {
        let dir = dir.into();
        let sources = list_files(&dir, is_csv)?;
        tracing::info!("Opened {} ({} recordings)", dir.display(), sources.len());
        self.sources = sources;
        self.source_dir = Some(dir);
        Ok(())
    }

    /// Set the folder labeled files are saved into
    pub fn set_result_dir(&mut self, dir: impl Into<PathBuf>) -> Result<()> {
        let dir = dir.into();
        let results = list_files(&dir, |_| true)?;
        self.results = results.into_iter().collect();
        self.result_dir = Some(dir);
        Ok(())
    }

    /// Re-read both folders.
    ///
    /// Listings are only replaced once both folders have been read.
    pub fn refresh(&mut self) -> Result<()> {
        let sources = match &self.source_dir {
            Some(dir) => Some(list_files(dir, is_csv)?),
            None => None,
        };
        let results = match &self.result_dir {
            Some(dir) => Some(list_files(dir, |_| true)?),
            None => None,
        };
        if let Some(sources) = sources {
            self.sources = sources;
        }
        if let Some(results) = results {
            self.results = results.into_iter().collect();
        }
        Ok(())
    }

    /// Record a completed export.
    ///
    /// The export's folder (the working directory for a bare file name)
    /// becomes the result folder and both listings are refreshed. On failure
    /// the index is left as it was.
    pub fn note_export(&mut self, exported: &Path) -> Result<()> {
        let dir = match exported.parent() {
            Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
            Some(parent) => parent.to_path_buf(),
            None => return self.refresh(),
        };
        let results = list_files(&dir, |_| true)?;
        let sources = match &self.source_dir {
            Some(source) => Some(list_files(source, is_csv)?),
            None => None,
        };
        if let Some(sources) = sources {
            self.sources = sources;
        }
        self.results = results.into_iter().collect();
        self.result_dir = Some(dir);
        Ok(())
    }

    /// Whether `name` has a counterpart in the result folder
    pub fn is_labeled(&self, name: &str) -> bool {
        self.result_dir.is_some() && self.results.contains(&export_file_name(name))
    }

    /// Recordings in the source folder, sorted by name
    pub fn entries(&self) -> Vec<FolderEntry> {
        self.sources
            .iter()
            .map(|name| FolderEntry {
                name: name.clone(),
                labeled: self.is_labeled(name),
            })
            .collect()
    }

    /// Full path of a recording in the source folder
    pub fn source_path(&self, name: &str) -> Option<PathBuf> {
        self.source_dir.as_ref().map(|d| d.join(name))
    }

    /// Where to save the export of `source_name` by default
    pub fn default_export_path(&self, source_name: &str) -> Option<PathBuf> {
        self.result_dir
            .as_ref()
            .map(|d| d.join(export_file_name(source_name)))
    }

    /// Counts of (labeled, total) recordings
    pub fn progress(&self) -> (usize, usize) {
        let done = self.sources.iter().filter(|n| self.is_labeled(n)).count();
        (done, self.sources.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_name_matches_source() {
        assert_eq!(export_file_name("night1.csv"), "night1.csv");
    }

    #[test]
    fn test_is_csv() {
        assert!(is_csv(Path::new("a.CSV")));
        assert!(is_csv(Path::new("dir/b.csv")));
        assert!(!is_csv(Path::new("c.txt")));
        assert!(!is_csv(Path::new("csv")));
    }

    #[test]
    fn test_nothing_labeled_without_result_dir() {
        let index = FolderIndex::new();
        assert!(!index.is_labeled("a.csv"));
        assert!(index.default_export_path("a.csv").is_none());
        assert_eq!(index.progress(), (0, 0));
    }

    #[test]
    fn test_failed_note_export_keeps_result_dir() {
        let results = tempfile::tempdir().unwrap();
        let mut index = FolderIndex::new();
        index.set_result_dir(results.path()).unwrap();

        let missing = results.path().join("gone").join("out.csv");
        assert!(index.note_export(&missing).is_err());
        assert_eq!(index.result_dir(), Some(results.path()));
    }

    #[test]
    fn test_note_export_bare_name_uses_working_dir() {
        let mut index = FolderIndex::new();
        index.note_export(Path::new("out.csv")).unwrap();
        assert_eq!(index.result_dir(), Some(Path::new(".")));
    }
}
