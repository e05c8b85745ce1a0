//! In-memory doubles for the transport and the shell
//!
//! Enabled by the `testing` feature so the engine's tests can drive the
//! client without a server.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use corpografo_core::{ConsoleError, ConsoleResult, HttpMethod, Notification, Route, Shell};
use serde_json::{Value, json};

use crate::transport::{ApiRequest, ApiResponse, Transport};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// ScriptedTransport
// ============================================================================

#[derive(Debug, Clone)]
enum Scripted {
    Respond(ApiResponse),
    Fail(String),
}

#[derive(Debug, Default)]
struct Script {
    answers: VecDeque<Scripted>,
    /// Whether the front answer was served already
    served: bool,
}

impl Script {
    fn next(&mut self) -> Option<Scripted> {
        if self.served && self.answers.len() > 1 {
            self.answers.pop_front();
        }
        self.served = true;
        self.answers.front().cloned()
    }
}

/// Transport answering from per-route scripts.
///
/// Each (method, path) holds a queue of answers. Every answer is served at
/// least once, in order, and the last one repeats; queueing a new answer
/// after the current one has been served replaces it for the following
/// requests. Unscripted routes answer 404.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<(HttpMethod, String), Script>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: HttpMethod, path: &str, answer: Scripted) {
        lock(&self.scripts)
            .entry((method, path.trim_start_matches('/').to_string()))
            .or_default()
            .answers
            .push_back(answer);
    }

    /// Queue a JSON answer
    pub fn on(&self, method: HttpMethod, path: &str, status: u16, body: Value) {
        self.push(method, path, Scripted::Respond(ApiResponse::json(status, &body)));
    }

    /// Queue an answer with a raw body
    pub fn on_raw(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.push(method, path, Scripted::Respond(ApiResponse::new(status, body)));
    }

    /// Queue a failure without any HTTP response
    pub fn fail(&self, method: HttpMethod, path: &str, message: &str) {
        self.push(method, path, Scripted::Fail(message.to_string()));
    }

    /// Every request sent so far
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    /// Requests that change remote state
    pub fn writes(&self) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method.is_write())
            .collect()
    }

    /// Number of requests to one route
    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> ConsoleResult<ApiResponse> {
        let key = (request.method, request.path.clone());
        lock(&self.requests).push(request);

        let answer = lock(&self.scripts).get_mut(&key).and_then(Script::next);

        match answer {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(ConsoleError::Transport(message)),
            None => Ok(ApiResponse::json(404, &json!({"message": "Not Found"}))),
        }
    }
}

// ============================================================================
// RecordingShell
// ============================================================================

/// Shell that records every effect
#[derive(Debug, Default)]
pub struct RecordingShell {
    notifications: Mutex<Vec<Notification>>,
    routes: Mutex<Vec<Route>>,
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.notifications).clone()
    }

    pub fn error_count(&self) -> usize {
        lock(&self.notifications)
            .iter()
            .filter(|n| n.is_error())
            .count()
    }

    pub fn routes(&self) -> Vec<Route> {
        lock(&self.routes).clone()
    }

    pub fn last_route(&self) -> Option<Route> {
        lock(&self.routes).last().cloned()
    }

    /// Forget everything recorded so far
    pub fn reset(&self) {
        lock(&self.notifications).clear();
        lock(&self.routes).clear();
    }
}

impl Shell for RecordingShell {
    fn notify(&self, notification: Notification) {
        lock(&self.notifications).push(notification);
    }

    fn navigate(&self, route: Route) {
        lock(&self.routes).push(route);
    }
}
