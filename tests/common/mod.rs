//! Common test utilities for taskdeck integration tests.
//!
//! Provides `TestEnv` for an isolated task file, a scripted model that
//! replays canned answers, and helpers to drive the router in-process.

#![allow(dead_code)]

use assert_cmd::Command;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use taskdeck::ai::{CompletionModel, ModelError, TaskAugmenter};
use taskdeck::commands::TaskService;
use taskdeck::server::{AppState, router};
use taskdeck::storage::JsonFileStore;
use tower::ServiceExt;

pub use tempfile::TempDir;

/// Environment variables the binary reads for model configuration.
pub const AZURE_VARS: [&str; 4] = [
    "AZURE_OPENAI_API_KEY",
    "AZURE_OPENAI_ENDPOINT",
    "AZURE_OPENAI_DEPLOYMENT",
    "AZURE_OPENAI_API_VERSION",
];

/// A test environment with an isolated task file.
pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.path().join("tasks.json")
    }

    /// Router over this environment's task file and the given model.
    pub fn app(&self, model: Arc<ScriptedModel>) -> Router {
        let service = TaskService::new(JsonFileStore::new(self.tasks_file()));
        router(AppState::new(service, TaskAugmenter::new(model)))
    }

    /// Router whose model must never be called.
    pub fn crud_app(&self) -> Router {
        self.app(ScriptedModel::new(Vec::new()))
    }

    /// Command for the taskdeck binary, run inside the data directory with
    /// no inherited model configuration.
    pub fn taskdeck(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_taskdeck"));
        cmd.current_dir(self.data_dir.path());
        for var in AZURE_VARS {
            cmd.env_remove(var);
        }
        cmd
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Model that replays canned answers and records every prompt.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, ModelError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<String, ModelError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::default(),
        })
    }

    /// Model that answers with each of `texts` in turn.
    pub fn answering(texts: &[&str]) -> Arc<Self> {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl CompletionModel for ScriptedModel {
    fn complete(&self, _system_role: &str, prompt: &str) -> Result<String, ModelError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::Transport("no scripted reply".to_string())))
    }
}

/// Send a request with an optional raw body and decode the JSON response.
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Send a request with a JSON body.
pub async fn send(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    send_raw(app, method, uri, Some(&body.to_string())).await
}

/// Send a request without a body.
pub async fn send_empty(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    send_raw(app, method, uri, None).await
}
