use std::sync::Arc;

use crate::config::Config;
use crate::editor::sessions::SessionRegistry;
use crate::resumes::repository::ResumeRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Open editor sessions; each one autosaves to the configured key-value store.
    pub sessions: SessionRegistry,
    /// Saved resumes. Default: Postgres.
    pub resumes: Arc<dyn ResumeRepository>,
}
