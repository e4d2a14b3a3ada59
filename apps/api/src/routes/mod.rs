pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::editor::handlers;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/templates", get(handlers::handle_list_templates))
        // Editor session lifecycle
        .route(
            "/api/v1/editor/:owner",
            get(handlers::handle_view)
                .post(handlers::handle_open)
                .delete(handlers::handle_close),
        )
        .route("/api/v1/editor/:owner/status", get(handlers::handle_status))
        .route("/api/v1/editor/:owner/flush", post(handlers::handle_flush))
        // Customization settings
        .route(
            "/api/v1/editor/:owner/settings",
            patch(handlers::handle_update_settings),
        )
        .route(
            "/api/v1/editor/:owner/settings/sections",
            post(handlers::handle_add_builtin_section),
        )
        .route(
            "/api/v1/editor/:owner/settings/reset",
            post(handlers::handle_reset_settings),
        )
        .route(
            "/api/v1/editor/:owner/settings/undo",
            post(handlers::handle_undo_settings),
        )
        .route(
            "/api/v1/editor/:owner/settings/redo",
            post(handlers::handle_redo_settings),
        )
        // Dynamic sections and entries
        .route(
            "/api/v1/editor/:owner/sections",
            post(handlers::handle_add_section),
        )
        .route(
            "/api/v1/editor/:owner/sections/order",
            put(handlers::handle_reorder_sections),
        )
        .route(
            "/api/v1/editor/:owner/sections/undo",
            post(handlers::handle_undo_sections),
        )
        .route(
            "/api/v1/editor/:owner/sections/redo",
            post(handlers::handle_redo_sections),
        )
        .route(
            "/api/v1/editor/:owner/sections/:section_id",
            axum::routing::delete(handlers::handle_delete_section),
        )
        .route(
            "/api/v1/editor/:owner/sections/:section_id/visibility",
            post(handlers::handle_toggle_section),
        )
        .route(
            "/api/v1/editor/:owner/sections/:section_id/title",
            put(handlers::handle_update_section_title),
        )
        .route(
            "/api/v1/editor/:owner/sections/:section_id/entries",
            post(handlers::handle_add_entry),
        )
        .route(
            "/api/v1/editor/:owner/sections/:section_id/entries/:entry_id",
            patch(handlers::handle_update_entry).delete(handlers::handle_delete_entry),
        )
        .route(
            "/api/v1/editor/:owner/sections/:section_id/entries/:entry_id/duplicate",
            post(handlers::handle_duplicate_entry),
        )
        .route(
            "/api/v1/editor/:owner/sections/:section_id/entries/:entry_id/edit",
            post(handlers::handle_start_editing),
        )
        .route(
            "/api/v1/editor/:owner/sections/:section_id/entries/:entry_id/save",
            post(handlers::handle_save_entry),
        )
        // Draft
        .route(
            "/api/v1/editor/:owner/draft",
            put(handlers::handle_replace_draft),
        )
        .route(
            "/api/v1/editor/:owner/draft/undo",
            post(handlers::handle_undo_draft),
        )
        .route(
            "/api/v1/editor/:owner/draft/redo",
            post(handlers::handle_redo_draft),
        )
        .route(
            "/api/v1/editor/:owner/draft/validation",
            get(handlers::handle_validate_draft),
        )
        // Export and scoring
        .route("/api/v1/editor/:owner/export", get(handlers::handle_export))
        .route("/api/v1/editor/:owner/ats", get(handlers::handle_ats))
        // Saved resumes
        .route("/api/v1/resumes", post(resumes::handle_create_resume))
        .route("/api/v1/resumes/:id", put(resumes::handle_update_resume))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::{Config, EditorConfig};
    use crate::editor::sessions::SessionRegistry;
    use crate::errors::body_json;
    use crate::persistence::{KeyValueStore, MemoryStore};
    use crate::resumes::repository::MemoryResumeRepository;

    struct Harness {
        app: Router,
        repo: Arc<MemoryResumeRepository>,
    }

    fn harness() -> Harness {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let repo = Arc::new(MemoryResumeRepository::default());
        let config = Config {
            database_url: "postgres://unused".to_string(),
            redis_url: None,
            store_dir: PathBuf::from("./unused"),
            port: 0,
            rust_log: "info".to_string(),
            editor: EditorConfig::default(),
        };
        let state = AppState {
            config,
            sessions: SessionRegistry::new(store, EditorConfig::default()),
            resumes: repo.clone(),
        };
        Harness {
            app: build_router(state),
            repo,
        }
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return (status, Value::Null);
        }
        (status, body_json(response).await)
    }

    fn uuid_at(value: &Value) -> Uuid {
        value.as_str().unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness();
        let (status, body) = call(&h.app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "folio");
    }

    #[tokio::test]
    async fn test_templates_catalog() {
        let h = harness();
        let (status, body) = call(&h.app, Method::GET, "/api/v1/templates", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sections"].as_array().unwrap().len(), 8);
        assert_eq!(body["sections"][0]["id"], "work-experience");
        assert_eq!(body["sections"][0]["fields"][0]["key"], "company");
        assert_eq!(body["layouts"][5], "executive");
    }

    #[tokio::test]
    async fn test_unopened_session_is_not_found() {
        let h = harness();
        let uri = format!("/api/v1/editor/{}", Uuid::new_v4());
        let (status, body) = call(&h.app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_entry_edit_save_and_undo_flow() {
        let h = harness();
        let base = format!("/api/v1/editor/{}", Uuid::new_v4());

        let (status, view) = call(&h.app, Method::POST, &base, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(view["editing"].is_null());

        let (status, view) = call(
            &h.app,
            Method::POST,
            &format!("{base}/sections"),
            Some(json!({"template_id": "work-experience"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let sid = uuid_at(&view["created"]);
        assert_eq!(view["sections"][0]["title"], "Work Experience");

        let (status, view) =
            call(&h.app, Method::POST, &format!("{base}/sections/{sid}/entries"), None).await;
        assert_eq!(status, StatusCode::CREATED);
        let eid = uuid_at(&view["created"]);
        assert_eq!(view["editing"]["entry_id"], eid.to_string());

        let entry = format!("{base}/sections/{sid}/entries/{eid}");
        let (status, body) = call(&h.app, Method::POST, &format!("{entry}/save"), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["error"]["details"][format!("{sid}-{eid}-company")],
            "Company is required"
        );

        for (field, value) in [
            ("company", "Acme"),
            ("position", "Engineer"),
            ("start_date", "2021-03"),
        ] {
            let (status, _) = call(
                &h.app,
                Method::PATCH,
                &entry,
                Some(json!({"field": field, "value": value})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
        let (status, view) = call(&h.app, Method::POST, &format!("{entry}/save"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(view["editing"].is_null());

        let (_, view) = call(&h.app, Method::POST, &format!("{base}/sections/undo"), None).await;
        assert_eq!(view["sections"][0]["entries"][0]["values"]["company"], "Acme");
        assert_eq!(view["sections"][0]["entries"][0]["values"]["start_date"], "");
    }

    #[tokio::test]
    async fn test_unknown_template_rejected() {
        let h = harness();
        let base = format!("/api/v1/editor/{}", Uuid::new_v4());
        call(&h.app, Method::POST, &base, None).await;
        let (status, _) = call(
            &h.app,
            Method::POST,
            &format!("{base}/sections"),
            Some(json!({"template_id": "hobbies"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_entry_field_rejected() {
        let h = harness();
        let base = format!("/api/v1/editor/{}", Uuid::new_v4());
        call(&h.app, Method::POST, &base, None).await;
        let (_, view) = call(
            &h.app,
            Method::POST,
            &format!("{base}/sections"),
            Some(json!({"template_id": "work-experience"})),
        )
        .await;
        let sid = uuid_at(&view["created"]);
        let (_, view) =
            call(&h.app, Method::POST, &format!("{base}/sections/{sid}/entries"), None).await;
        let eid = uuid_at(&view["created"]);
        let length_before = view["history"]["sections"]["length"].clone();

        let (status, body) = call(
            &h.app,
            Method::PATCH,
            &format!("{base}/sections/{sid}/entries/{eid}"),
            Some(json!({"field": "salary", "value": "100k"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (_, view) = call(&h.app, Method::GET, &base, None).await;
        let values = &view["sections"][0]["entries"][0]["values"];
        assert!(values.get("salary").is_none());
        assert_eq!(values["company"], "");
        assert_eq!(view["history"]["sections"]["length"], length_before);
    }

    #[tokio::test]
    async fn test_settings_patch_and_undo() {
        let h = harness();
        let base = format!("/api/v1/editor/{}", Uuid::new_v4());
        call(&h.app, Method::POST, &base, None).await;

        let (status, view) = call(
            &h.app,
            Method::PATCH,
            &format!("{base}/settings"),
            Some(json!({"layout": {"template": "classic", "spacing": "compact", "columns": 2}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["settings"]["layout"]["columns"], 2);
        assert_eq!(view["history"]["customization"]["can_undo"], true);

        let (_, view) = call(&h.app, Method::POST, &format!("{base}/settings/undo"), None).await;
        assert_eq!(view["settings"]["layout"]["template"], "modern");
        assert_eq!(view["history"]["customization"]["can_redo"], true);
    }

    #[tokio::test]
    async fn test_save_resume_from_session() {
        let h = harness();
        let owner = Uuid::new_v4();
        let base = format!("/api/v1/editor/{owner}");
        call(&h.app, Method::POST, &base, None).await;
        call(
            &h.app,
            Method::PUT,
            &format!("{base}/draft"),
            Some(json!({"title": "Platform Engineer", "personal": {"full_name": "Jane Doe"}})),
        )
        .await;

        let (status, row) = call(
            &h.app,
            Method::POST,
            "/api/v1/resumes",
            Some(json!({"owner": owner})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(row["title"], "Platform Engineer");
        assert_eq!(row["template"], "modern");
        assert_eq!(row["data"]["personal"]["full_name"], "Jane Doe");
        let id = uuid_at(&row["id"]);

        call(
            &h.app,
            Method::PATCH,
            &format!("{base}/settings"),
            Some(json!({"layout": {"template": "executive", "spacing": "normal", "columns": 1}})),
        )
        .await;
        let (status, row) = call(
            &h.app,
            Method::PUT,
            &format!("/api/v1/resumes/{id}"),
            Some(json!({"owner": owner, "is_public": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(row["template"], "executive");
        assert!(h.repo.get(id).await.unwrap().is_public);
    }

    #[tokio::test]
    async fn test_close_session() {
        let h = harness();
        let base = format!("/api/v1/editor/{}", Uuid::new_v4());
        call(&h.app, Method::POST, &base, None).await;
        let (status, _) = call(&h.app, Method::DELETE, &base, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&h.app, Method::DELETE, &base, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
