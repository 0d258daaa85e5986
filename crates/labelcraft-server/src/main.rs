//! Labelcraft Template Server
//!
//! The remote template store the label designer saves to and loads from.
//! Templates are kept as JSON files in a data directory.
//!
//! ## Endpoints
//!
//! ```text
//! GET    /health           -> "ok"
//! GET    /templates        -> [Template]
//! GET    /templates/{id}   -> Template | 404
//! POST   /templates        -> Template (validated, id and timestamps assigned)
//! DELETE /templates/{id}   -> { "deleted": bool }
//! ```
//!
//! Errors are returned as `{ "error": "..." }` with status 400 (validation),
//! 404 (not found) or 500.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use labelcraft_core::storage::{FileStorage, Storage, StorageError, Template, TemplateRepository};
use serde::Serialize;
use serde_json::json;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

/// Default listen address.
const DEFAULT_ADDR: &str = "0.0.0.0:3030";

/// Server configuration errors.
#[derive(Debug, Error)]
enum ConfigError {
    #[error("Invalid LABELCRAFT_ADDR {0:?}: {1}")]
    Addr(String, std::net::AddrParseError),
    #[error("Could not determine a data directory; set LABELCRAFT_DATA_DIR")]
    NoDataDir,
}

/// Server configuration, read from the environment.
#[derive(Debug, Clone, PartialEq)]
struct ServerConfig {
    /// Address to listen on (`LABELCRAFT_ADDR`).
    addr: SocketAddr,
    /// Template directory (`LABELCRAFT_DATA_DIR`).
    data_dir: PathBuf,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr_text = lookup("LABELCRAFT_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_text.parse().map_err(|e| ConfigError::Addr(addr_text.clone(), e))?;

        let data_dir = match lookup("LABELCRAFT_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => FileStorage::default_path().map_err(|_| ConfigError::NoDataDir)?,
        };

        Ok(Self { addr, data_dir })
    }
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    templates: TemplateRepository,
}

impl AppState {
    fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            templates: TemplateRepository::new(storage),
        }
    }
}

/// A storage error rendered as an HTTP response.
#[derive(Debug)]
struct ApiError(StorageError);

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            StorageError::Validation(_) => StatusCode::BAD_REQUEST,
            StorageError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("{}", self.0);
        } else {
            warn!("{}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Debug, Serialize)]
struct Deleted {
    deleted: bool,
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/templates", get(list_templates).post(save_template))
        .route("/templates/{id}", get(get_template).delete(delete_template))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "labelcraft_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let storage = FileStorage::new(config.data_dir.clone())?;
    info!("Storing templates in {}", storage.base_path().display());

    let app = router(AppState::new(Arc::new(storage)));

    info!("Labelcraft template server listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

async fn list_templates(State(state): State<AppState>) -> Result<Json<Vec<Template>>, ApiError> {
    Ok(Json(state.templates.list().await?))
}

async fn get_template(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Template>, ApiError> {
    match state.templates.get(&id).await? {
        Some(template) => Ok(Json(template)),
        None => Err(StorageError::NotFound(id).into()),
    }
}

async fn save_template(
    State(state): State<AppState>,
    Json(template): Json<Template>,
) -> Result<Json<Template>, ApiError> {
    let saved = state.templates.save(template).await?;
    info!("Saved template {:?} ({})", saved.name, saved.id.as_deref().unwrap_or_default());
    Ok(Json(saved))
}

async fn delete_template(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Deleted>, ApiError> {
    let deleted = state.templates.delete(&id).await?;
    if deleted {
        info!("Deleted template {}", id);
    }
    Ok(Json(Deleted { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelcraft_core::document::{Configuration, starter_elements};
    use labelcraft_core::storage::{HttpStorage, MemoryStorage};

    fn state() -> AppState {
        AppState::new(Arc::new(MemoryStorage::new()))
    }

    fn template(name: &str) -> Template {
        Template::new(name, Configuration::default(), starter_elements())
    }

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::from_lookup(|key| (key == "LABELCRAFT_DATA_DIR").then(|| "/tmp/labels".to_string()))
            .unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("/tmp/labels"));
    }

    #[test]
    fn test_config_rejects_bad_addr() {
        let result = ServerConfig::from_lookup(|key| match key {
            "LABELCRAFT_ADDR" => Some("not-an-address".to_string()),
            _ => Some("/tmp/labels".to_string()),
        });
        assert!(matches!(result, Err(ConfigError::Addr(..))));
    }

    #[test]
    fn test_error_status_codes() {
        let status = |e: StorageError| ApiError(e).into_response().status();
        assert_eq!(status(StorageError::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(StorageError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(StorageError::Unavailable("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status(StorageError::Io("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_save_get_list_delete() {
        let state = state();

        let Json(saved) = save_template(State(state.clone()), Json(template("Cargo"))).await.unwrap();
        let id = saved.id.clone().unwrap();
        assert!(saved.created_at.is_some());

        let Json(loaded) = get_template(State(state.clone()), Path(id.clone())).await.unwrap();
        assert_eq!(loaded, saved);

        let Json(all) = list_templates(State(state.clone())).await.unwrap();
        assert_eq!(all.len(), 1);

        let Json(deleted) = delete_template(State(state.clone()), Path(id.clone())).await.unwrap();
        assert!(deleted.deleted);
        let Json(deleted) = delete_template(State(state.clone()), Path(id.clone())).await.unwrap();
        assert!(!deleted.deleted);

        let missing = get_template(State(state), Path(id)).await.unwrap_err();
        assert!(matches!(missing.0, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_save_rejects_blank_name() {
        let result = save_template(State(state()), Json(template(" "))).await;
        let err = result.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_router_builds() {
        let _ = router(state());
    }

    /// Serve `router()` on an ephemeral port and return its base URL.
    async fn spawn_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router(state())).await;
        });
        format!("http://{addr}")
    }

    fn client(base_url: &str) -> HttpStorage {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpStorage::with_client(http, base_url).unwrap()
    }

    #[tokio::test]
    async fn test_http_storage_against_server() {
        let remote = client(&spawn_server().await);

        let mut t = template("Cargo");
        t.id = Some("template_http".to_string());
        remote.save(&t).await.unwrap();

        let loaded = remote.load("template_http").await.unwrap();
        assert_eq!(loaded.name, "Cargo");
        assert_eq!(loaded.elements, t.elements);
        assert!(remote.exists("template_http").await.unwrap());
        assert_eq!(remote.list().await.unwrap().len(), 1);

        assert!(remote.delete("template_http").await.unwrap());
        assert!(!remote.delete("template_http").await.unwrap());
        assert!(!remote.exists("template_http").await.unwrap());
        let missing = remote.load("template_http").await;
        assert!(matches!(missing, Err(StorageError::NotFound(id)) if id == "template_http"));
    }

    #[tokio::test]
    async fn test_http_storage_reports_validation() {
        let remote = client(&spawn_server().await);
        let mut t = template(" ");
        t.id = Some("template_blank".to_string());
        assert!(matches!(remote.save(&t).await, Err(StorageError::Validation(_))));
    }

    #[tokio::test]
    async fn test_repository_mirrors_to_server() {
        let remote = Arc::new(client(&spawn_server().await));
        let local = Arc::new(MemoryStorage::new());
        let repo = TemplateRepository::with_remote(remote.clone(), local.clone());

        let saved = repo.save(template("Hepsiburada")).await.unwrap();
        let id = saved.id.clone().unwrap();
        assert!(remote.exists(&id).await.unwrap());
        assert!(local.exists(&id).await.unwrap());
        assert_eq!(repo.get(&id).await.unwrap().map(|t| t.name), Some("Hepsiburada".to_string()));
    }

    #[tokio::test]
    async fn test_repository_falls_back_when_server_is_down() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let remote = Arc::new(client(&format!("http://{addr}")));
        assert!(matches!(remote.list().await, Err(StorageError::Io(_))));

        let repo = TemplateRepository::with_remote(remote, Arc::new(MemoryStorage::new()));
        let saved = repo.save(template("Offline")).await.unwrap();
        assert_eq!(repo.list().await.unwrap(), vec![saved]);
    }
}
