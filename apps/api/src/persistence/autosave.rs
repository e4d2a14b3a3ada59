//! Debounced autosave.
//!
//! Each `Autosaver` owns a background task for one storage key. A scheduled
//! value waits for `window` of quiet before it is written; anything scheduled
//! meanwhile replaces it and restarts the window, so only the latest value is
//! ever written. Closing the handle (`shutdown`, or dropping it) writes a
//! pending value immediately instead of dropping it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::persistence::kv::KeyValueStore;
use crate::persistence::snapshot::encode;

/// What the "last saved" indicator shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SaveStatus {
    /// Nothing pending. `at` is `None` until the first write of this session.
    Saved { at: Option<DateTime<Utc>> },
    Unsaved,
    Saving,
}

enum Command<T> {
    Schedule { value: T, generation: u64 },
    Flush(oneshot::Sender<()>),
}

pub struct Autosaver<T> {
    key: String,
    tx: mpsc::UnboundedSender<Command<T>>,
    status: Arc<watch::Sender<SaveStatus>>,
    generation: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl<T> Autosaver<T>
where
    T: Serialize + Send + 'static,
{
    pub fn spawn(store: Arc<dyn KeyValueStore>, key: String, window: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let status = Arc::new(watch::Sender::new(SaveStatus::Saved { at: None }));
        let generation = Arc::new(AtomicU64::new(0));

        let worker = Worker {
            store,
            key: key.clone(),
            window,
            status: Arc::clone(&status),
            generation: Arc::clone(&generation),
        };
        let task = tokio::spawn(worker.run(rx));

        Self {
            key,
            tx,
            status,
            generation,
            task,
        }
    }

    /// Queues `value` for writing, superseding anything still pending.
    pub fn schedule(&self, value: T) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.status.send_replace(SaveStatus::Unsaved);
        if self.tx.send(Command::Schedule { value, generation }).is_err() {
            warn!("Autosave worker for '{}' is gone; change not persisted", self.key);
        }
    }

    /// Writes the pending value now, if there is one.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    /// Flush-saves anything pending and waits for the worker to exit.
    pub async fn shutdown(self) {
        let Autosaver { key, tx, task, .. } = self;
        drop(tx);
        if let Err(e) = task.await {
            warn!("Autosave worker for '{key}' ended abnormally: {e}");
        }
    }
}

struct Worker {
    store: Arc<dyn KeyValueStore>,
    key: String,
    window: Duration,
    status: Arc<watch::Sender<SaveStatus>>,
    generation: Arc<AtomicU64>,
}

impl Worker {
    async fn run<T: Serialize>(self, mut rx: mpsc::UnboundedReceiver<Command<T>>) {
        let mut pending: Option<(T, u64)> = None;

        loop {
            let command = if pending.is_some() {
                match tokio::time::timeout(self.window, rx.recv()).await {
                    Ok(command) => command,
                    Err(_) => {
                        self.write(pending.take()).await;
                        continue;
                    }
                }
            } else {
                rx.recv().await
            };

            match command {
                Some(Command::Schedule { value, generation }) => {
                    pending = Some((value, generation));
                }
                Some(Command::Flush(done)) => {
                    self.write(pending.take()).await;
                    let _ = done.send(());
                }
                None => {
                    self.write(pending.take()).await;
                    debug!("Autosave worker for '{}' stopped", self.key);
                    return;
                }
            }
        }
    }

    async fn write<T: Serialize>(&self, pending: Option<(T, u64)>) {
        let Some((value, generation)) = pending else {
            return;
        };
        self.status.send_replace(SaveStatus::Saving);

        let result = match encode(&value) {
            Ok(raw) => self.store.set(&self.key, &raw).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        let newest = self.generation.load(Ordering::SeqCst) == generation;
        let next = match result {
            Ok(()) => {
                debug!("Autosaved '{}'", self.key);
                if newest {
                    SaveStatus::Saved {
                        at: Some(Utc::now()),
                    }
                } else {
                    SaveStatus::Unsaved
                }
            }
            Err(e) => {
                warn!("Autosave of '{}' failed: {e}", self.key);
                SaveStatus::Unsaved
            }
        };
        self.status.send_replace(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::kv::MemoryStore;
    use crate::persistence::snapshot::decode;

    const WINDOW: Duration = Duration::from_millis(500);

    async fn stored(store: &MemoryStore, key: &str) -> Option<Vec<u32>> {
        let raw = store.get(key).await.unwrap()?;
        Some(decode(&raw).unwrap())
    }

    fn saver(store: &Arc<MemoryStore>) -> Autosaver<Vec<u32>> {
        let dyn_store: Arc<dyn KeyValueStore> = store.clone();
        Autosaver::spawn(dyn_store, "k".to_string(), WINDOW)
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_waits_for_window() {
        let store = Arc::new(MemoryStore::new());
        let saver = saver(&store);

        saver.schedule(vec![1]);
        assert_eq!(saver.status(), SaveStatus::Unsaved);
        tokio::time::sleep(WINDOW / 2).await;
        assert_eq!(stored(&store, "k").await, None);

        tokio::time::sleep(WINDOW).await;
        assert_eq!(stored(&store, "k").await, Some(vec![1]));
        assert!(matches!(saver.status(), SaveStatus::Saved { at: Some(_) }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_value_supersedes_pending() {
        let store = Arc::new(MemoryStore::new());
        let saver = saver(&store);

        saver.schedule(vec![1]);
        tokio::time::sleep(WINDOW / 2).await;
        saver.schedule(vec![2]);
        tokio::time::sleep(WINDOW / 2).await;
        saver.schedule(vec![3]);
        tokio::time::sleep(WINDOW * 3).await;

        assert_eq!(stored(&store, "k").await, Some(vec![3]));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_writes_immediately() {
        let store = Arc::new(MemoryStore::new());
        let saver = saver(&store);

        saver.schedule(vec![4]);
        saver.flush().await;
        assert_eq!(stored(&store, "k").await, Some(vec![4]));

        // Nothing pending: a second flush writes nothing.
        saver.flush().await;
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_flushes_pending_value() {
        let store = Arc::new(MemoryStore::new());
        let saver = saver(&store);

        saver.schedule(vec![5]);
        saver.shutdown().await;
        assert_eq!(stored(&store, "k").await, Some(vec![5]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_still_flushes() {
        let store = Arc::new(MemoryStore::new());
        {
            let saver = saver(&store);
            saver.schedule(vec![6]);
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(stored(&store, "k").await, Some(vec![6]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_stays_unsaved_while_newer_value_queued() {
        let store = Arc::new(MemoryStore::new());
        let saver = saver(&store);
        saver.schedule(vec![1]);
        saver.flush().await;
        assert!(matches!(saver.status(), SaveStatus::Saved { .. }));

        saver.schedule(vec![2]);
        assert_eq!(saver.status(), SaveStatus::Unsaved);
    }
}
