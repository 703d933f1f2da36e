use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::match_record::MatchRecord;

/// Anything that can hand over a collection of match records.
pub trait MatchSource {
    fn load_matches(&self) -> Result<Vec<MatchRecord>>;
}

impl MatchSource for Vec<MatchRecord> {
    fn load_matches(&self) -> Result<Vec<MatchRecord>> {
        Ok(self.clone())
    }
}

/// A JSON file holding an array of records in the service shape
/// (`{ id, matchId, jsonData, ... }`).
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    pub path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MatchSource for JsonFileSource {
    fn load_matches(&self) -> Result<Vec<MatchRecord>> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(Vec::new());
        }
        serde_json::from_str(trimmed)
            .with_context(|| format!("invalid match list json in {}", self.path.display()))
    }
}

/// A directory of raw match documents, one per `.json` file. Each file's
/// text becomes the record payload untouched so malformed files surface
/// later as skipped matches rather than load errors.
#[derive(Debug, Clone)]
pub struct FolderSource {
    pub dir: PathBuf,
}

impl FolderSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl MatchSource for FolderSource {
    fn load_matches(&self) -> Result<Vec<MatchRecord>> {
        let paths = list_json_files(&self.dir)?;
        let mut out = Vec::with_capacity(paths.len());
        for (idx, path) in paths.iter().enumerate() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            out.push(MatchRecord::new(idx as u64 + 1, file_stem(path), raw));
        }
        Ok(out)
    }
}

/// `.json` files directly under `dir`, sorted by name.
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let path = entry.context("read dir entry")?.path();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if path.is_file() && is_json {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}
