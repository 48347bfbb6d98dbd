// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory filesystem holding files only; directories exist implicitly
/// as the parents of stored files.
///
/// Clones share the same storage, so a test can hand one clone to the code
/// under test and inspect another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<BTreeMap<PathBuf, Vec<u8>>>>,
}

/// Drop `.` components so `./a` and `a` name the same entry.
fn normalize(path: &Path) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}

fn parent_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => normalize(parent),
        _ => PathBuf::from("."),
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut files = self.files.lock().unwrap();
        files.insert(normalize(path.as_ref()), content.into());
    }

    /// All stored file paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    fn is_dir(files: &BTreeMap<PathBuf, Vec<u8>>, dir: &Path) -> bool {
        dir == Path::new(".") || files.keys().any(|p| p.starts_with(dir) && p != dir)
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let files = self.files.lock().unwrap();
        match files.get(&normalize(path)) {
            Some(content) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        let path = normalize(path);
        files.contains_key(&path) || Self::is_dir(&files, &path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let files = self.files.lock().unwrap();
        let dir = normalize(path);
        if !Self::is_dir(&files, &dir) {
            return Err(anyhow!("Not a directory or not found: {:?}", path));
        }

        let mut entries: Vec<PathBuf> = Vec::new();
        for file in files.keys() {
            // Direct children only; deeper files surface as their top directory.
            let relative = if dir == Path::new(".") {
                file.as_path()
            } else if let Ok(rest) = file.strip_prefix(&dir) {
                rest
            } else {
                continue;
            };
            if let Some(first) = relative.components().next() {
                let child = dir.join(first);
                if !entries.contains(&child) {
                    entries.push(child);
                }
            }
        }
        Ok(entries)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let mut files = self.files.lock().unwrap();
        let path = normalize(path);
        if files.remove(&path).is_some() {
            return Ok(());
        }
        if Self::is_dir(&files, &path) && path != Path::new(".") {
            files.retain(|p, _| !p.starts_with(&path));
            return Ok(());
        }
        Err(anyhow!("File not found: {:?}", path))
    }
}
