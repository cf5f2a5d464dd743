//! Clipboard history retention

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};
use tracing::{debug, error, info};

use crate::engine::DEFAULT_CLIPBOARD_HISTORY_ITEMS;

/// A clipboard history that can be asked to forget older entries
pub trait ClipboardHistory {
    /// Drop all but the newest `max_items_to_keep` entries
    fn clear_history(&mut self, max_items_to_keep: usize);
}

#[derive(Debug)]
struct HistoryInner {
    entries: VecDeque<String>,
    capacity: usize,
}

impl HistoryInner {
    /// Drop the oldest entries until at most `keep` remain
    fn trim_to(&mut self, keep: usize) -> usize {
        let excess = self.entries.len().saturating_sub(keep);
        self.entries.drain(..excess);
        excess
    }
}

/// In-memory clipboard history shared between the API and the turn engine.
/// Holds at most `capacity` entries, dropping the oldest as new ones arrive.
#[derive(Debug, Clone)]
pub struct SharedClipboardHistory {
    inner: Arc<Mutex<HistoryInner>>,
}

impl Default for SharedClipboardHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CLIPBOARD_HISTORY_ITEMS as usize)
    }
}

impl SharedClipboardHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History bounded to `capacity` entries (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HistoryInner {
                entries: VecDeque::new(),
                capacity: capacity.max(1),
            })),
        }
    }

    /// Change the bound, dropping the oldest entries that no longer fit
    pub fn set_capacity(&self, capacity: usize) -> Result<(), String> {
        let mut inner = self.inner.lock()
            .map_err(|e| format!("Failed to lock clipboard history: {}", e))?;

        let capacity = capacity.max(1);
        if inner.capacity != capacity {
            debug!("Clipboard history capacity {} -> {}", inner.capacity, capacity);
            inner.capacity = capacity;
            inner.trim_to(capacity);
        }
        Ok(())
    }

    pub fn capacity(&self) -> Result<usize, String> {
        self.inner.lock()
            .map(|inner| inner.capacity)
            .map_err(|e| format!("Failed to lock clipboard history: {}", e))
    }

    /// Record a copied entry as the newest item
    pub fn record(&self, text: String) -> Result<usize, String> {
        let mut inner = self.inner.lock()
            .map_err(|e| format!("Failed to lock clipboard history: {}", e))?;

        inner.entries.push_back(text);
        let capacity = inner.capacity;
        let dropped = inner.trim_to(capacity);
        if dropped > 0 {
            debug!("Clipboard history full, dropped {} oldest entries", dropped);
        }
        debug!("Clipboard history now holds {} entries", inner.entries.len());
        Ok(inner.entries.len())
    }

    /// Snapshot of retained entries, oldest first
    pub fn entries(&self) -> Result<Vec<String>, String> {
        self.inner.lock()
            .map(|inner| inner.entries.iter().cloned().collect())
            .map_err(|e| format!("Failed to lock clipboard history: {}", e))
    }
}

impl ClipboardHistory for SharedClipboardHistory {
    fn clear_history(&mut self, max_items_to_keep: usize) {
        let mut inner = match self.inner.lock() {
            Ok(inner) => inner,
            Err(e) => {
                error!("Failed to lock clipboard history: {}", e);
                return;
            }
        };

        let excess = inner.trim_to(max_items_to_keep);
        info!("Cleared {} clipboard history entries, keeping {}", excess, inner.entries.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_keeps_newest_entries() {
        let mut history = SharedClipboardHistory::new();
        for text in ["one", "two", "three", "four"] {
            history.record(text.to_string()).unwrap();
        }

        history.clear_history(2);
        assert_eq!(history.entries().unwrap(), vec!["three", "four"]);
    }

    #[test]
    fn clear_with_room_to_spare_keeps_everything() {
        let mut history = SharedClipboardHistory::new();
        history.record("only".to_string()).unwrap();
        history.clear_history(25);
        assert_eq!(history.entries().unwrap(), vec!["only"]);
    }

    #[test]
    fn clones_share_entries() {
        let history = SharedClipboardHistory::new();
        let mut engine_side = history.clone();
        history.record("a".to_string()).unwrap();
        history.record("b".to_string()).unwrap();

        engine_side.clear_history(1);
        assert_eq!(history.entries().unwrap(), vec!["b"]);
    }

    #[test]
    fn recording_past_capacity_drops_oldest() {
        let history = SharedClipboardHistory::with_capacity(3);
        for i in 0..10 {
            history.record(format!("entry {}", i)).unwrap();
        }

        assert_eq!(
            history.entries().unwrap(),
            vec!["entry 7", "entry 8", "entry 9"]
        );
    }

    #[test]
    fn default_capacity_bounds_history() {
        let history = SharedClipboardHistory::new();
        let limit = DEFAULT_CLIPBOARD_HISTORY_ITEMS as usize;
        for i in 0..limit * 4 {
            history.record(i.to_string()).unwrap();
        }

        let entries = history.entries().unwrap();
        assert_eq!(entries.len(), limit);
        assert_eq!(entries.last().map(String::as_str), Some("99"));
    }

    #[test]
    fn shrinking_capacity_trims_existing_entries() {
        let history = SharedClipboardHistory::new();
        for text in ["one", "two", "three"] {
            history.record(text.to_string()).unwrap();
        }

        history.set_capacity(1).unwrap();
        assert_eq!(history.entries().unwrap(), vec!["three"]);

        history.set_capacity(0).unwrap();
        assert_eq!(history.capacity().unwrap(), 1);
    }
}
