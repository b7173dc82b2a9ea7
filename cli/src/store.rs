//! Durable key-value storage backed by a JSON file.
//!
//! The file holds a flat JSON object; the session token sits under
//! `TOKEN_KEY`. Other keys are preserved across writes. Writes go through a
//! temporary file in the same directory and are renamed into place.

use std::io::Write;
use std::path::{Path, PathBuf};

use profile_core::{ApiError, TokenStore, TOKEN_KEY};
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, ApiError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(storage_error(&self.path, e)),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&content).map_err(|e| storage_error(&self.path, e))
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), ApiError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| storage_error(&dir, e))?;

        let content = serde_json::to_vec_pretty(map).map_err(|e| storage_error(&self.path, e))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| storage_error(&dir, e))?;
        tmp.write_all(&content).map_err(|e| storage_error(&self.path, e))?;
        tmp.persist(&self.path).map_err(|e| storage_error(&self.path, e.error))?;
        Ok(())
    }
}

fn storage_error(path: &Path, err: impl std::fmt::Display) -> ApiError {
    ApiError::Storage(format!("{}: {err}", path.display()))
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<String>, ApiError> {
        let map = self.read_map()?;
        Ok(map
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string))
    }

    fn set(&self, token: &str) -> Result<(), ApiError> {
        let mut map = self.read_map()?;
        map.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.write_map(&map)
    }

    fn clear(&self) -> Result<(), ApiError> {
        let mut map = self.read_map()?;
        if map.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.write_map(&map)
    }
}
