//! Editor persistence.
//!
//! Stores are invoked explicitly by the caller (on save, on session end),
//! never on every edit.

use crate::types::{Block, LayoutConfig};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Stored editor state.
///
/// Only `blocks` and `history` are authoritative; the index and dirty flag
/// are kept for convenience and repaired on restore.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedEditorState {
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub history: Vec<LayoutConfig>,
    /// `None` restores to the newest history entry
    #[serde(default)]
    pub current_history_index: Option<usize>,
    #[serde(default)]
    pub is_dirty: bool,
}

pub trait EditorStore {
    /// Previously saved state, or `None` when nothing was saved.
    fn load(&self) -> Result<Option<PersistedEditorState>>;

    fn save(&mut self, state: &PersistedEditorState) -> Result<()>;

    /// Forget saved state (end of an editing session).
    fn clear(&mut self) -> Result<()>;
}

/// Keeps the state as a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EditorStore for JsonFileStore {
    fn load(&self) -> Result<Option<PersistedEditorState>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let state = serde_json::from_str(&raw)
            .map_err(|e| Error::Storage(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(state))
    }

    fn save(&mut self, state: &PersistedEditorState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| Error::Storage(format!("failed to encode editor state: {}", e)))?;
        std::fs::write(&self.path, json)?;
        log::debug!("editor state saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// In-process store, mostly for tests and previews.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Option<PersistedEditorState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EditorStore for MemoryStore {
    fn load(&self) -> Result<Option<PersistedEditorState>> {
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &PersistedEditorState) -> Result<()> {
        self.state = Some(state.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.state = None;
        Ok(())
    }
}
