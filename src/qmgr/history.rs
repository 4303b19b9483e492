// src/qmgr/history.rs

//! Bounded directive history, persisted across sessions. The file is
//! rewritten at the end of each directive; if that ever fails the history
//! silently degrades to in-memory for the rest of the session.

use crate::config::PbsConfig;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Default history bound.
pub const HIST_SIZE: usize = 500;

const HIST_FILE: &str = ".pbs_qmgr_history";

/// Where the history lives: `$HOME/.pbs_qmgr_history`, falling back to the
/// spool directory when `HOME` is unset.
pub fn history_path(cfg: &PbsConfig) -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home).join(HIST_FILE),
        _ => cfg.spool_dir().join(HIST_FILE),
    }
}

pub struct History {
    entries: VecDeque<String>,
    limit: usize,
    path: PathBuf,
    persist: bool,
}

impl History {
    /// Loads existing history from `path`; a missing file starts empty.
    pub fn load(path: PathBuf) -> History {
        let mut entries = VecDeque::new();
        if let Ok(content) = fs::read_to_string(&path) {
            for line in content.lines() {
                if !line.trim().is_empty() {
                    entries.push_back(line.to_string());
                }
            }
            while entries.len() > HIST_SIZE {
                entries.pop_front();
            }
        }
        History {
            entries,
            limit: HIST_SIZE,
            path,
            persist: true,
        }
    }

    /// Records one directive, dropping consecutive duplicates, and rewrites
    /// the backing file.
    pub fn add(&mut self, request: &str) {
        let request = request.trim();
        if request.is_empty() {
            return;
        }
        if self.entries.back().map(String::as_str) == Some(request) {
            return;
        }
        self.entries.push_back(request.to_string());
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.save();
    }

    /// The most recent `n` entries, oldest first.
    pub fn list(&self, n: usize) -> impl Iterator<Item = &str> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    fn save(&mut self) {
        if !self.persist {
            return;
        }
        let mut body = String::new();
        for e in &self.entries {
            body.push_str(e);
            body.push('\n');
        }
        if let Err(e) = fs::write(&self.path, body) {
            warn!(path = %self.path.display(), error = %e,
                "history file unwritable; keeping history in memory only");
            self.persist = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_and_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");
        let mut h = History::load(path.clone());
        h.add("list server");
        h.add("list server"); // consecutive duplicate dropped
        h.add("set server scheduling=true");
        assert_eq!(h.iter().count(), 2);

        let reloaded = History::load(path);
        let all: Vec<&str> = reloaded.iter().collect();
        assert_eq!(all, vec!["list server", "set server scheduling=true"]);
    }

    #[test]
    fn list_returns_tail() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = History::load(dir.path().join("hist"));
        for i in 0..10 {
            h.add(&format!("cmd {i}"));
        }
        let tail: Vec<&str> = h.list(3).collect();
        assert_eq!(tail, vec!["cmd 7", "cmd 8", "cmd 9"]);
    }
}
