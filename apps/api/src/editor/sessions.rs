use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::EditorConfig;
use crate::editor::session::EditorSession;
use crate::persistence::KeyValueStore;

pub type SharedSession = Arc<Mutex<EditorSession>>;

/// Open editor sessions keyed by owner. Cheap to clone; clones share the map.
///
/// At most one live session per owner writes to that owner's storage keys. A
/// session is closed (autosavers stopped) before its entry leaves the map, and
/// handles that outlive the close see it as closed.
#[derive(Clone)]
pub struct SessionRegistry {
    store: Arc<dyn KeyValueStore>,
    config: EditorConfig,
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
    // Bumped after every close, once the closed session's saves are written.
    closes: Arc<AtomicU64>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>, config: EditorConfig) -> Self {
        Self {
            store,
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            closes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the owner's session, restoring it from the store on first use.
    ///
    /// The store is read without holding the map lock, so other owners are
    /// never blocked by a slow load.
    pub async fn open(&self, owner: Uuid) -> SharedSession {
        loop {
            if let Some(existing) = self.get(owner).await {
                if !existing.lock().await.is_closed() {
                    return existing;
                }
                // Closed while we waited for it.
                self.forget(owner, &existing).await;
                continue;
            }

            let seen_closes = self.closes.load(Ordering::SeqCst);
            let mut loaded =
                EditorSession::open(owner, Arc::clone(&self.store), &self.config).await;

            let mut sessions = self.sessions.write().await;
            let winner = match sessions.get(&owner).cloned() {
                Some(existing) => Some(existing),
                None if self.closes.load(Ordering::SeqCst) != seen_closes => None,
                None => {
                    let shared = Arc::new(Mutex::new(loaded));
                    sessions.insert(owner, Arc::clone(&shared));
                    return shared;
                }
            };
            drop(sessions);

            // Another open won the race, or a close finished while we were
            // loading and what we read may be stale. Nothing was edited yet,
            // so stopping the workers writes nothing.
            debug!("Discarding duplicate load of session {owner}");
            loaded.close().await;
            if let Some(existing) = winner {
                if !existing.lock().await.is_closed() {
                    return existing;
                }
            }
        }
    }

    pub async fn get(&self, owner: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&owner).cloned()
    }

    /// Locks the owner's session, or `None` if it is not open.
    pub async fn lock(&self, owner: Uuid) -> Option<OwnedMutexGuard<EditorSession>> {
        let shared = self.get(owner).await?;
        let session = shared.lock_owned().await;
        (!session.is_closed()).then_some(session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Flush-saves the owner's session, stops its autosavers and forgets it.
    /// Returns `false` if no session was open.
    pub async fn close(&self, owner: Uuid) -> bool {
        let Some(shared) = self.get(owner).await else {
            return false;
        };
        // Holding the session lock keeps requests and reopens waiting until
        // the final write is done.
        let mut session = shared.lock().await;
        let was_open = !session.is_closed();
        session.close().await;
        self.forget(owner, &shared).await;
        was_open
    }

    /// Closes every open session. Called on shutdown.
    pub async fn close_all(&self) {
        let owners: Vec<Uuid> = self.sessions.read().await.keys().copied().collect();
        info!("Closing {} editor session(s)", owners.len());
        for owner in owners {
            self.close(owner).await;
        }
    }

    async fn forget(&self, owner: Uuid, shared: &SharedSession) {
        let mut sessions = self.sessions.write().await;
        if sessions
            .get(&owner)
            .is_some_and(|current| Arc::ptr_eq(current, shared))
        {
            sessions.remove(&owner);
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}
