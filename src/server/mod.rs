//! HTTP server for the task API and the augmentation routes.

mod error;

pub use error::{ApiError, MALFORMED_BODY, TASK_NOT_FOUND};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Map, Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::ai::{AugmentError, TaskAugmenter};
use crate::commands::TaskService;
use crate::models::{StoredTask, TaskRecord};

/// Default port to listen on
pub const DEFAULT_PORT: u16 = 5000;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Task service; the lock serializes each load-mutate-save on the task file.
    /// The guard is held across the blocking file work.
    pub tasks: Arc<Mutex<TaskService>>,
    /// Augmentation flows backed by the model client
    pub augmenter: TaskAugmenter,
}

impl AppState {
    pub fn new(tasks: TaskService, augmenter: TaskAugmenter) -> Self {
        Self {
            tasks: Arc::new(Mutex::new(tasks)),
            augmenter,
        }
    }
}

/// Build the router with every route.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/ai/tasks/describe", post(describe_task))
        .route("/ai/tasks/categorize", post(categorize_task))
        .route("/ai/tasks/estimate", post(estimate_task))
        .route("/ai/tasks/audit", post(audit_task))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server and run until Ctrl+C.
pub async fn start_server(
    state: AppState,
    host: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let host_addr: std::net::IpAddr = host
        .parse()
        .map_err(|e| format!("Invalid host address '{}': {}", host, e))?;
    let addr = SocketAddr::from((host_addr, port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

/// Parse a request body into a non-empty JSON object.
fn parse_object(body: &Bytes) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => Ok(map),
        _ => Err(ApiError::MalformedBody),
    }
}

/// Run blocking work (file or model I/O) off the async executor.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("worker task failed: {}", e)))
}

/// Get all tasks
async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredTask>>, ApiError> {
    let tasks = state.tasks.clone().lock_owned().await;
    Ok(Json(blocking(move || tasks.list()).await?))
}

/// Get one task by id
async fn get_task(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<StoredTask>, ApiError> {
    let tasks = state.tasks.clone().lock_owned().await;
    Ok(Json(blocking(move || tasks.get(&id)).await??))
}

async fn create_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let payload = parse_object(&body)?;
    let tasks = state.tasks.clone().lock_owned().await;
    let task = blocking(move || tasks.create(&payload)).await??;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    body: Bytes,
) -> Result<Json<TaskRecord>, ApiError> {
    let payload = parse_object(&body)?;
    let tasks = state.tasks.clone().lock_owned().await;
    Ok(Json(blocking(move || tasks.update(&id, &payload)).await??))
}

async fn delete_task(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<Value>, ApiError> {
    let tasks = state.tasks.clone().lock_owned().await;
    blocking(move || tasks.delete(&id)).await??;
    Ok(Json(json!({ "message": "Tarea eliminada correctamente" })))
}

/// Fill in `description` from title, priority, status and owner
async fn describe_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Map<String, Value>>, ApiError> {
    let mut task = parse_object(&body)?;
    let input = task.clone();
    let augmenter = state.augmenter.clone();

    let description = blocking(move || augmenter.generate_description(&input))
        .await?
        .map_err(|e| ApiError::from_augment(e, "Error al generar descripción"))?;

    task.insert("description".to_string(), Value::String(description));
    Ok(Json(task))
}

/// Fill in `category`
async fn categorize_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Map<String, Value>>, ApiError> {
    let mut task = parse_object(&body)?;
    let input = task.clone();
    let augmenter = state.augmenter.clone();

    let category = blocking(move || augmenter.categorize(&input))
        .await?
        .map_err(|e| match e {
            AugmentError::MissingFields(_) => {
                ApiError::BadRequest("El campo 'title' es obligatorio".to_string())
            }
            other => ApiError::from_augment(other, "Error al categorizar tarea"),
        })?;

    task.insert("category".to_string(), json!(category));
    Ok(Json(task))
}

/// Fill in `effort_hours`
async fn estimate_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Map<String, Value>>, ApiError> {
    let mut task = parse_object(&body)?;
    let input = task.clone();
    let augmenter = state.augmenter.clone();

    let effort = blocking(move || augmenter.estimate_effort(&input))
        .await?
        .map_err(|e| {
            if e.is_parse_failure() {
                ApiError::Internal(format!("Error al parsear esfuerzo: {}", e))
            } else {
                ApiError::from_augment(e, "Error al estimar esfuerzo")
            }
        })?;

    task.insert("effort_hours".to_string(), json!(effort));
    Ok(Json(task))
}

/// Fill in `risk_analysis` and `risk_mitigation` (two model calls)
async fn audit_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Map<String, Value>>, ApiError> {
    let mut task = parse_object(&body)?;
    let input = task.clone();
    let augmenter = state.augmenter.clone();

    let audit = blocking(move || augmenter.audit(&input))
        .await?
        .map_err(|e| ApiError::from_augment(e, "Error al auditar tarea"))?;

    task.insert(
        "risk_analysis".to_string(),
        Value::String(audit.risk_analysis),
    );
    task.insert(
        "risk_mitigation".to_string(),
        Value::String(audit.risk_mitigation),
    );
    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_accepts_object() {
        let map = parse_object(&Bytes::from_static(br#"{"title": "T"}"#)).unwrap();
        assert_eq!(map["title"], "T");
    }

    #[test]
    fn test_parse_object_rejects_empty_and_non_objects() {
        let bodies: [&[u8]; 5] = [b"", b"{}", b"[1, 2]", b"\"text\"", b"{not json"];
        for body in bodies {
            assert!(matches!(
                parse_object(&Bytes::copy_from_slice(body)),
                Err(ApiError::MalformedBody)
            ));
        }
    }
}
