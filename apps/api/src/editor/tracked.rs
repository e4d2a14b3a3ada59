use serde::Serialize;

use crate::customization::History;
use crate::persistence::{Autosaver, SaveStatus};

/// Position of a store inside its undo history, as shown by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryState {
    pub can_undo: bool,
    pub can_redo: bool,
    pub position: usize,
    pub length: usize,
}

/// A value with its own undo history and (optionally) its own autosave key.
///
/// Every change that produces a different value is recorded and scheduled for
/// saving. Undo/redo also schedule a save, so the persisted copy can briefly
/// lag the in-memory one by up to one debounce window.
pub struct Tracked<T> {
    history: History<T>,
    autosave: Option<Autosaver<T>>,
}

impl<T> Tracked<T>
where
    T: Clone + PartialEq + Serialize + Send + 'static,
{
    pub fn new(initial: T, history_limit: usize) -> Self {
        Self {
            history: History::new(initial, history_limit),
            autosave: None,
        }
    }

    pub fn with_autosave(mut self, autosave: Autosaver<T>) -> Self {
        self.autosave = Some(autosave);
        self
    }

    pub fn current(&self) -> &T {
        self.history.current()
    }

    /// Runs `f` on a copy of the current value and records the copy if it
    /// changed. Identical results are not recorded.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut next = self.current().clone();
        let out = f(&mut next);
        self.commit(next);
        out
    }

    /// Records `next` unless it equals the current value. Returns whether
    /// anything was recorded.
    pub fn replace(&mut self, next: T) -> bool {
        self.commit(next)
    }

    fn commit(&mut self, next: T) -> bool {
        if next == *self.current() {
            return false;
        }
        self.history.record(next.clone());
        self.schedule_save(next);
        true
    }

    pub fn undo(&mut self) -> bool {
        let restored = self.history.undo().cloned();
        self.restore(restored)
    }

    pub fn redo(&mut self) -> bool {
        let restored = self.history.redo().cloned();
        self.restore(restored)
    }

    fn restore(&mut self, restored: Option<T>) -> bool {
        match restored {
            Some(value) => {
                self.schedule_save(value);
                true
            }
            None => false,
        }
    }

    fn schedule_save(&self, value: T) {
        if let Some(autosave) = &self.autosave {
            autosave.schedule(value);
        }
    }

    pub fn history_state(&self) -> HistoryState {
        HistoryState {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            position: self.history.cursor(),
            length: self.history.len(),
        }
    }

    pub fn save_status(&self) -> SaveStatus {
        match &self.autosave {
            Some(autosave) => autosave.status(),
            None => SaveStatus::Saved { at: None },
        }
    }

    pub async fn flush(&self) {
        if let Some(autosave) = &self.autosave {
            autosave.flush().await;
        }
    }

    /// Flush-saves anything pending and stops the autosave worker. Later
    /// changes stay in memory only.
    pub async fn close(&mut self) {
        if let Some(autosave) = self.autosave.take() {
            autosave.shutdown().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_records_only_changes() {
        let mut t = Tracked::new(vec![1], 50);
        t.update(|v| v.push(2));
        t.update(|_| ());
        assert_eq!(t.history_state().length, 2);
        assert_eq!(t.current(), &vec![1, 2]);
    }

    #[test]
    fn test_update_returns_closure_result() {
        let mut t = Tracked::new(0u32, 50);
        let doubled = t.update(|v| {
            *v = 21;
            *v * 2
        });
        assert_eq!(doubled, 42);
    }

    #[test]
    fn test_undo_redo_without_autosave() {
        let mut t = Tracked::new(String::from("a"), 50);
        t.replace("b".to_string());
        assert!(t.undo());
        assert_eq!(t.current(), "a");
        assert!(!t.undo());
        assert!(t.redo());
        assert_eq!(t.current(), "b");
        assert!(!t.redo());
    }

    #[test]
    fn test_history_state() {
        let mut t = Tracked::new(1, 3);
        for v in 2..=6 {
            t.replace(v);
        }
        let state = t.history_state();
        assert_eq!(state.length, 3);
        assert_eq!(state.position, 2);
        assert!(state.can_undo);
        assert!(!state.can_redo);
    }
}
