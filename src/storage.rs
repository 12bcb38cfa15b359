//! Durable best-score slot.
//!
//! The slot is a single integer under [`BEST_SCORE_KEY`] in a small JSON
//! object, so other keys written by later versions survive a rewrite.

use crate::error::StoreError;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const BEST_SCORE_KEY: &str = "bestScore";

/// Get/set of the one persisted integer.
pub trait BestScoreStore {
    /// Stored best score, or 0 if nothing has been stored.
    fn get_best_score(&self) -> Result<u32, StoreError>;
    fn set_best_score(&mut self, score: u32) -> Result<(), StoreError>;
}

/// Process-lifetime store, used when nothing durable is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    best: Option<u32>,
    writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u32) -> Self {
        Self {
            best: Some(best),
            writes: 0,
        }
    }

    /// Number of `set_best_score` calls so far.
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl BestScoreStore for MemoryStore {
    fn get_best_score(&self) -> Result<u32, StoreError> {
        Ok(self.best.unwrap_or(0))
    }

    fn set_best_score(&mut self, score: u32) -> Result<(), StoreError> {
        self.best = Some(score);
        self.writes += 1;
        Ok(())
    }
}

/// JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub const FILE_NAME: &'static str = "scores.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    fn read_map(&self) -> Result<Map<String, Value>, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }
}

impl BestScoreStore for JsonFileStore {
    fn get_best_score(&self) -> Result<u32, StoreError> {
        let map = self.read_map()?;
        match map.get(BEST_SCORE_KEY) {
            None => Ok(0),
            Some(v) => v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| StoreError::NotAnInteger(BEST_SCORE_KEY.to_string())),
        }
    }

    fn set_best_score(&mut self, score: u32) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking the write.
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(StoreError::Json(e)) => {
                log::warn!("Overwriting corrupt {}: {}", self.path.display(), e);
                Map::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(BEST_SCORE_KEY.to_string(), Value::from(score));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&map)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// The file store under `dir`, or a memory store when there is no directory.
pub fn open(dir: Option<&Path>) -> Box<dyn BestScoreStore> {
    match dir {
        Some(dir) => Box::new(JsonFileStore::in_dir(dir)),
        None => {
            log::warn!("{}; best score will not persist", StoreError::NoDataDir);
            Box::new(MemoryStore::new())
        }
    }
}
