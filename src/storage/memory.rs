// src/storage/memory.rs
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use parking_lot::RwLock;
use serde::Serialize;

use crate::models::heartbeat::{HeartbeatData, HeartbeatEntry, HeartbeatLevel};
use crate::utils::now_timestamp;

/// Append-only destination for heartbeat entries produced by the poll loop.
pub trait HeartbeatSink: Send + Sync {
    fn record(&self, level: HeartbeatLevel, data: HeartbeatData);
    fn set_running(&self, running: bool);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogStatus {
    pub status: &'static str,
    pub last_update: Option<String>,
    pub logs_count: usize,
}

/// Bounded in-memory heartbeat history shared between the poll loop (writer)
/// and the dashboard workers (readers).
///
/// Appends past `capacity` drop the oldest entry. Readers always get cloned
/// snapshots, so a reader never observes a half-applied append.
pub struct HeartbeatLog {
    entries: RwLock<VecDeque<HeartbeatEntry>>,
    capacity: usize,
    running: AtomicBool,
}

impl HeartbeatLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
            running: AtomicBool::new(false),
        }
    }

    pub fn push(&self, entry: HeartbeatEntry) {
        let mut entries = self.entries.write();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// The `limit` most recent entries, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<HeartbeatEntry> {
        let entries = self.entries.read();
        let skip = entries.len().saturating_sub(limit);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn status(&self) -> LogStatus {
        let entries = self.entries.read();
        LogStatus {
            status: if self.is_running() { "running" } else { "stopped" },
            last_update: entries.back().map(|e| e.timestamp.clone()),
            logs_count: entries.len(),
        }
    }
}

impl HeartbeatSink for HeartbeatLog {
    fn record(&self, level: HeartbeatLevel, data: HeartbeatData) {
        self.push(HeartbeatEntry {
            timestamp: now_timestamp(),
            level,
            data,
        });
    }

    fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Relaxed);
    }
}
