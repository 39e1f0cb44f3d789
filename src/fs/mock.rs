// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File {
        contents: Vec<u8>,
        modified: SystemTime,
    },
    Dir,
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    /// Logical clock in seconds since the epoch; every write ticks it.
    clock: u64,
}

/// In-memory filesystem for tests.
///
/// Modification times come from a logical clock, so each write is strictly
/// newer than every earlier one. Paths are normalised by dropping `.`
/// components, so `./a/b` and `a/b` name the same entry.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut state = MockState::default();
        // Ensure root exists
        state.entries.insert(PathBuf::from("."), MockEntry::Dir);

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a file stamped with the next logical clock tick.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> SystemTime {
        let mut state = self.lock();
        state.clock += 1;
        let modified = UNIX_EPOCH + Duration::from_secs(state.clock);
        insert_file(&mut state, path.as_ref(), contents.into(), modified);
        modified
    }

    /// Add a file with an explicit modification time (the clock is not moved
    /// backwards, only forwards past `modified`).
    pub fn add_file_at(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>, modified: SystemTime) {
        let mut state = self.lock();
        if let Ok(since) = modified.duration_since(UNIX_EPOCH) {
            state.clock = state.clock.max(since.as_secs());
        }
        insert_file(&mut state, path.as_ref(), contents.into(), modified);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.lock();
        ensure_dir_entry(&mut state.entries, &normalize(path.as_ref()));
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.lock().entries.remove(&normalize(path.as_ref()));
    }
}

fn insert_file(state: &mut MockState, path: &Path, contents: Vec<u8>, modified: SystemTime) {
    let path = normalize(path);
    if let Some(parent) = path.parent() {
        ensure_dir_entry(&mut state.entries, &normalize(parent));
    }
    state.entries.insert(path, MockEntry::File { contents, modified });
}

// Ensure parent directories exist implicitly for simplicity in this mock
fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if entries.contains_key(path) {
        return;
    }
    entries.insert(path.to_path_buf(), MockEntry::Dir);
    if let Some(parent) = path.parent() {
        let parent = normalize(parent);
        if parent != path {
            ensure_dir_entry(entries, &parent);
        }
    }
}

fn normalize(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let state = self.lock();
        match state.entries.get(&normalize(path)) {
            Some(MockEntry::File { contents, .. }) => {
                String::from_utf8(contents.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.add_file(path, contents);
        Ok(())
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        let state = self.lock();
        match state.entries.get(&normalize(path)) {
            Some(MockEntry::File { modified, .. }) => Ok(*modified),
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().entries.contains_key(&normalize(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(&normalize(path)), Some(MockEntry::Dir))
    }
}
