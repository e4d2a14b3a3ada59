// Persistence adapter: key-value backends, the versioned snapshot codec and
// debounced autosave. Failures here are logged and degrade to "keep the
// in-memory state"; nothing propagates to the user as a crash.

pub mod autosave;
pub mod kv;
pub mod snapshot;

pub use autosave::{Autosaver, SaveStatus};
pub use kv::{FileStore, KeyValueStore, MemoryStore, RedisStore, StoreError};
pub use snapshot::{load_or_default, StorageKey};
