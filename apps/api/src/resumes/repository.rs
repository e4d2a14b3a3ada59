use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeRecord, ResumeRow};

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Backend for saved resumes. Only create and update are exercised by the
/// editor. Carried in `AppState` as `Arc<dyn ResumeRepository>`.
#[async_trait]
pub trait ResumeRepository: Send + Sync {
    async fn create(&self, record: ResumeRecord) -> Result<ResumeRow, AppError>;

    /// Overwrites the record `id` owned by `record.user_id`.
    /// `NotFound` if no such record belongs to that user.
    async fn update(&self, id: Uuid, record: ResumeRecord) -> Result<ResumeRow, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres
// ────────────────────────────────────────────────────────────────────────────

pub struct PgResumeRepository {
    db: PgPool,
}

impl PgResumeRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResumeRepository for PgResumeRepository {
    async fn create(&self, record: ResumeRecord) -> Result<ResumeRow, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (user_id, title, data, template, is_public, last_modified)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING *
            "#,
        )
        .bind(record.user_id)
        .bind(&record.title)
        .bind(&record.data)
        .bind(&record.template)
        .bind(record.is_public)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, record: ResumeRecord) -> Result<ResumeRow, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes
            SET title = $1, data = $2, template = $3, is_public = $4, last_modified = NOW()
            WHERE id = $5 AND user_id = $6
            RETURNING *
            "#,
        )
        .bind(&record.title)
        .bind(&record.data)
        .bind(&record.template)
        .bind(record.is_public)
        .bind(id)
        .bind(record.user_id)
        .fetch_optional(&self.db)
        .await?;
        row.ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory (tests)
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub use memory::MemoryResumeRepository;

#[cfg(test)]
mod memory {
    use std::collections::HashMap;

    use chrono::Utc;
    use tokio::sync::RwLock;

    use super::*;

    #[derive(Default)]
    pub struct MemoryResumeRepository {
        rows: RwLock<HashMap<Uuid, ResumeRow>>,
    }

    impl MemoryResumeRepository {
        pub async fn get(&self, id: Uuid) -> Option<ResumeRow> {
            self.rows.read().await.get(&id).cloned()
        }
    }

    #[async_trait]
    impl ResumeRepository for MemoryResumeRepository {
        async fn create(&self, record: ResumeRecord) -> Result<ResumeRow, AppError> {
            let row = ResumeRow {
                id: Uuid::new_v4(),
                user_id: record.user_id,
                title: record.title,
                data: record.data,
                template: record.template,
                is_public: record.is_public,
                last_modified: Utc::now(),
            };
            self.rows.write().await.insert(row.id, row.clone());
            Ok(row)
        }

        async fn update(&self, id: Uuid, record: ResumeRecord) -> Result<ResumeRow, AppError> {
            let mut rows = self.rows.write().await;
            let row = rows
                .get_mut(&id)
                .filter(|r| r.user_id == record.user_id)
                .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
            row.title = record.title;
            row.data = record.data;
            row.template = record.template;
            row.is_public = record.is_public;
            row.last_modified = Utc::now();
            Ok(row.clone())
        }
    }
}
