//! Best score record
//!
//! The simulation only carries the number; storing it is up to a
//! `ScoreStore` chosen by the host.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Persisted best score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScore {
    /// Most collectibles gathered in one life
    pub best: u32,
}

impl HighScore {
    /// Raise the record if `points` beats it. Returns true if it did.
    pub fn submit(&mut self, points: u32) -> bool {
        if points > self.best {
            self.best = points;
            true
        } else {
            false
        }
    }
}

/// Where the best score lives between runs
pub trait ScoreStore {
    fn load(&self) -> HighScore;

    fn save(&mut self, score: HighScore) -> anyhow::Result<()>;
}

/// In-memory store, for tests and hosts without storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    score: HighScore,
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> HighScore {
        self.score
    }

    fn save(&mut self, score: HighScore) -> anyhow::Result<()> {
        self.score = score;
        Ok(())
    }
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> HighScore {
        let Ok(json) = fs::read_to_string(&self.path) else {
            log::info!("No high score found, starting fresh");
            return HighScore::default();
        };
        match serde_json::from_str::<HighScore>(&json) {
            Ok(score) => {
                log::info!("Loaded high score {}", score.best);
                score
            }
            Err(e) => {
                log::warn!("Ignoring corrupt high score {}: {}", self.path.display(), e);
                HighScore::default()
            }
        }
    }

    fn save(&mut self, score: HighScore) -> anyhow::Result<()> {
        let json = serde_json::to_string(&score).context("serializing high score")?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing high score to {}", self.path.display()))?;
        log::info!("High score saved ({})", score.best);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_only_raises() {
        let mut score = HighScore { best: 4 };
        assert!(!score.submit(3));
        assert!(!score.submit(4));
        assert!(score.submit(9));
        assert_eq!(score.best, 9);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::default();
        assert_eq!(store.load().best, 0);
        store.save(HighScore { best: 12 }).unwrap();
        assert_eq!(store.load().best, 12);
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = std::env::temp_dir().join(format!("fish-escape-{}-hs.json", std::process::id()));
        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.load(), HighScore::default());
        store.save(HighScore { best: 7 }).unwrap();
        assert_eq!(JsonFileStore::new(&path).load().best, 7);

        fs::write(&path, "{").unwrap();
        assert_eq!(store.load(), HighScore::default());
        let _ = fs::remove_file(&path);
    }
}
