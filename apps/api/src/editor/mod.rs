// Editor module — per-owner editing sessions.
// draft: resume form data
// tracked: value + undo history + autosave
// session: the three tracked stores and the editing pointer
// sessions: registry of open sessions
// handlers: HTTP endpoints

pub mod draft;
pub mod handlers;
pub mod session;
pub mod sessions;
pub mod tracked;
