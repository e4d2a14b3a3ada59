use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A saved resume in the `resumes` table. `data` is the full draft payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub data: Value,
    pub template: String,
    pub is_public: bool,
    pub last_modified: DateTime<Utc>,
}

/// Fields written on create and update. `id` and `last_modified` are assigned
/// by the repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeRecord {
    pub user_id: Uuid,
    pub title: String,
    pub data: Value,
    pub template: String,
    pub is_public: bool,
}
