/// High-score persistence: one decimal number in a text file.
///
/// Failures never reach the game.  A missing or corrupt file reads as 0 and
/// a failed write is logged; the in-memory record carries on regardless.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

pub fn default_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".gesture_runner_score")
}

pub struct HighScoreStore {
    path: PathBuf,
    /// Last value read from or written to disk.
    stored: u32,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stored: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&mut self) -> u32 {
        self.stored = match std::fs::read_to_string(&self.path) {
            Ok(text) => text.trim().parse().unwrap_or_else(|_| {
                warn!(path = ?self.path, "corrupt high score file, starting from 0");
                0
            }),
            Err(_) => 0,
        };
        self.stored
    }

    pub fn save(&mut self, score: u32) {
        match std::fs::write(&self.path, score.to_string()) {
            Ok(()) => {
                info!(score, path = ?self.path, "high score saved");
                self.stored = score;
            }
            Err(err) => warn!(path = ?self.path, "could not save high score: {err}"),
        }
    }

    /// Write only when `score` beats what is already on disk.
    pub fn save_if_higher(&mut self, score: u32) {
        if score > self.stored {
            self.save(score);
        }
    }
}
