//! Remote Entity Client
//!
//! Every call to the API goes through [`EntityClient::request`], which
//! attaches the session token, sends a JSON body, and classifies the answer:
//! failures become exactly one user notification, and a rejected token
//! clears the session and sends the user to the login page. Callers always
//! get the raw response back and decide for themselves whether to proceed.

use std::sync::Arc;

use corpografo_core::{
    ConsoleError, ConsoleResult, EntityId, EntityType, HttpMethod, Notification, Route, Shell,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::config::ConsoleConfig;
use crate::record::{EntityRecord, EntitySummary};
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};

/// `msg` values of a 422 answer that mean the token is unusable
pub const SESSION_INVALID_MARKERS: [&str; 2] =
    ["Signature verification failed", "Not enough segments"];

/// Text shown when the failure carries nothing readable
pub const UNEXPECTED_BEHAVIOR: &str = "unexpected behavior";

/// Text of the positive notification after a save
pub const OPERATION_SUCCESSFUL: &str = "Operation successful";

/// Process-wide API client
#[derive(Clone)]
pub struct EntityClient {
    transport: Arc<dyn Transport>,
    session: SessionStore,
    shell: Arc<dyn Shell>,
}

impl std::fmt::Debug for EntityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityClient")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl EntityClient {
    pub fn new(transport: Arc<dyn Transport>, session: SessionStore, shell: Arc<dyn Shell>) -> Self {
        Self {
            transport,
            session,
            shell,
        }
    }

    /// Client over HTTP for the given configuration
    pub fn from_config(
        config: &ConsoleConfig,
        session: SessionStore,
        shell: Arc<dyn Shell>,
    ) -> ConsoleResult<Self> {
        let transport = ReqwestTransport::new(config.clone())?;
        Ok(Self::new(Arc::new(transport), session, shell))
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn shell(&self) -> &Arc<dyn Shell> {
        &self.shell
    }

    /// Surface a notification through the shell
    pub fn notify(&self, notification: Notification) {
        self.shell.notify(notification);
    }

    /// Change the current page through the shell
    pub fn navigate(&self, route: Route) {
        info!(route = %route, "Navigating");
        self.shell.navigate(route);
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Send one request and classify the answer.
    ///
    /// Returns `Err` only when no HTTP response was received; any status is
    /// handed back as-is after non-2xx answers have been notified.
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> ConsoleResult<ApiResponse> {
        let request = ApiRequest {
            method,
            path: path.trim_start_matches('/').to_string(),
            bearer: self.session.token(),
            body: body.unwrap_or_else(|| json!({})),
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, path, error = %e, "Request failed without a response");
                self.notify(failure_notification(UNEXPECTED_BEHAVIOR));
                return Err(match e {
                    ConsoleError::Transport(_) => e,
                    other => ConsoleError::Transport(other.to_string()),
                });
            }
        };

        debug!(%method, path, status = response.status, "API response");

        if !response.is_success() {
            self.handle_failure(method, path, &response);
        }

        Ok(response)
    }

    fn handle_failure(&self, method: HttpMethod, path: &str, response: &ApiResponse) {
        let message = failure_message(response);
        warn!(%method, path, status = response.status, message = %message, "API rejected request");
        self.notify(failure_notification(&message));

        if let Some(marker) = session_invalid_marker(response) {
            warn!(marker, "Session token rejected, logging out");
            self.session.clear();
            self.navigate(Route::Login);
        }
    }

    pub async fn get(&self, path: &str) -> ConsoleResult<ApiResponse> {
        self.request(HttpMethod::Get, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> ConsoleResult<ApiResponse> {
        self.request(HttpMethod::Post, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> ConsoleResult<ApiResponse> {
        self.request(HttpMethod::Put, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> ConsoleResult<ApiResponse> {
        self.request(HttpMethod::Delete, path, None).await
    }

    // ========================================================================
    // Typed helpers
    // ========================================================================

    /// GET `path` and decode a 2xx body into `T`.
    ///
    /// A non-2xx answer is returned as `ConsoleError::Api` (already
    /// notified), or as `ConsoleError::SessionInvalid` when it carried a
    /// forced-logout marker. A 2xx body that cannot be decoded is notified once and
    /// returned as `ConsoleError::Decode`.
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str) -> ConsoleResult<T> {
        let response = self.get(path).await?;
        self.decode_success(path, &response)
    }

    /// GET `path` as raw JSON
    pub async fn fetch_json(&self, path: &str) -> ConsoleResult<Value> {
        self.fetch(path).await
    }

    /// Every entity of a collection (no server-side pagination)
    pub async fn fetch_collection(&self, entity_type: EntityType) -> ConsoleResult<Vec<EntitySummary>> {
        self.fetch(entity_type.as_str()).await
    }

    /// One entity record
    pub async fn fetch_record(
        &self,
        entity_type: EntityType,
        id: &EntityId,
    ) -> ConsoleResult<EntityRecord> {
        let path = format!("{}/{}", entity_type, id);
        let value: Value = self.fetch(&path).await?;
        EntityRecord::from_value(value).inspect_err(|e| {
            warn!(path = %path, error = %e, "Undecodable entity record");
            self.notify(failure_notification(UNEXPECTED_BEHAVIOR));
        })
    }

    /// Decode a response that is expected to be 2xx
    pub fn decode_success<T: DeserializeOwned>(
        &self,
        path: &str,
        response: &ApiResponse,
    ) -> ConsoleResult<T> {
        if let Some(marker) = session_invalid_marker(response) {
            return Err(ConsoleError::SessionInvalid(marker.to_string()));
        }
        if !response.is_success() {
            return Err(ConsoleError::api(response.status, failure_message(response)));
        }
        response.decode().inspect_err(|e| {
            warn!(path, error = %e, "Undecodable response body");
            self.notify(failure_notification(UNEXPECTED_BEHAVIOR));
        })
    }
}

// ============================================================================
// Classification helpers
// ============================================================================

/// `Operation failed: <message>`
pub fn failure_notification(message: &str) -> Notification {
    Notification::error(format!("Operation failed: {}", message))
}

/// Readable message of a failed answer: `message`, else `msg`, else the
/// compact JSON body; undecodable bodies give "unexpected behavior".
pub fn failure_message(response: &ApiResponse) -> String {
    let Ok(body) = response.body_json() else {
        return UNEXPECTED_BEHAVIOR.to_string();
    };
    let field = |key: &str| match body.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };
    field("message")
        .or_else(|| field("msg"))
        .unwrap_or_else(|| body.to_string())
}

/// The marker found in a 422 answer that invalidates the session
pub fn session_invalid_marker(response: &ApiResponse) -> Option<&'static str> {
    if response.status != 422 {
        return None;
    }
    let body = response.body_json().ok()?;
    let msg = body.get("msg")?.as_str()?;
    SESSION_INVALID_MARKERS.iter().copied().find(|m| *m == msg)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingShell, ScriptedTransport};
    use pretty_assertions::assert_eq;
    use tokio_test::block_on;

    fn client() -> (EntityClient, Arc<ScriptedTransport>, Arc<RecordingShell>) {
        let transport = Arc::new(ScriptedTransport::new());
        let shell = Arc::new(RecordingShell::new());
        let session = SessionStore::in_memory();
        let client = EntityClient::new(transport.clone(), session, shell.clone());
        (client, transport, shell)
    }

    #[test]
    fn test_success_is_returned_untouched() {
        let (client, transport, shell) = client();
        transport.on(HttpMethod::Get, "corpus", 200, json!([{"id": 1, "name": "A"}]));

        let response = block_on(client.get("corpus")).unwrap();
        assert_eq!(response.status, 200);
        assert!(shell.notifications().is_empty());
    }

    #[test]
    fn test_bearer_and_body_always_sent() {
        let (client, transport, _) = client();
        client
            .session()
            .login("a@b.c", &json!({"access_token": "tok"}));
        transport.on(HttpMethod::Delete, "corpus/1/document/2", 200, json!({}));

        block_on(client.delete("corpus/1/document/2")).unwrap();

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].bearer.as_deref(), Some("tok"));
        assert_eq!(sent[0].body, json!({}));
    }

    #[test]
    fn test_no_bearer_without_session() {
        let (client, transport, _) = client();
        transport.on(HttpMethod::Get, "language", 200, json!([]));
        block_on(client.get("/language")).unwrap();
        assert_eq!(transport.requests()[0].bearer, None);
        assert_eq!(transport.requests()[0].path, "language");
    }

    #[test]
    fn test_failure_message_fields() {
        assert_eq!(
            failure_message(&ApiResponse::json(400, &json!({"message": "name is required"}))),
            "name is required"
        );
        assert_eq!(
            failure_message(&ApiResponse::json(401, &json!({"msg": "Missing token"}))),
            "Missing token"
        );
        assert_eq!(
            failure_message(&ApiResponse::json(409, &json!({"error": "duplicate"}))),
            r#"{"error":"duplicate"}"#
        );
        assert_eq!(
            failure_message(&ApiResponse::new(502, "Bad Gateway")),
            UNEXPECTED_BEHAVIOR
        );
    }

    #[test]
    fn test_non_success_notifies_once_and_returns_response() {
        let (client, transport, shell) = client();
        transport.on(
            HttpMethod::Post,
            "corpus",
            400,
            json!({"message": "name is required"}),
        );

        let response = block_on(client.post("corpus", json!({"name": ""}))).unwrap();
        assert_eq!(response.status, 400);
        assert_eq!(
            shell.notifications(),
            vec![Notification::error("Operation failed: name is required")]
        );
        assert!(shell.routes().is_empty());
    }

    #[test]
    fn test_session_invalid_markers_force_logout() {
        for marker in SESSION_INVALID_MARKERS {
            let (client, transport, shell) = client();
            client
                .session()
                .login("a@b.c", &json!({"access_token": "stale"}));
            transport.on(HttpMethod::Get, "corpus", 422, json!({"msg": marker}));

            let response = block_on(client.get("corpus")).unwrap();
            assert_eq!(response.status, 422);
            assert!(!client.session().is_logged_in());
            assert_eq!(shell.routes(), vec![Route::Login]);
            assert_eq!(
                shell.notifications(),
                vec![Notification::error(format!("Operation failed: {}", marker))]
            );
        }
    }

    #[test]
    fn test_typed_fetch_reports_invalid_session() {
        let (client, transport, shell) = client();
        client
            .session()
            .login("a@b.c", &json!({"access_token": "stale"}));
        transport.on(HttpMethod::Get, "author", 422, json!({"msg": "Signature verification failed"}));

        let err = block_on(client.fetch_collection(EntityType::Author)).unwrap_err();
        assert!(err.is_session_invalid());
        assert_eq!(err.status(), None);
        assert!(!client.session().is_logged_in());
        assert_eq!(shell.routes(), vec![Route::Login]);
        assert_eq!(shell.error_count(), 1);

        transport.on(HttpMethod::Get, "corpus", 422, json!({"msg": "Unprocessable Entity"}));
        let err = block_on(client.fetch_collection(EntityType::Corpus)).unwrap_err();
        assert!(!err.is_session_invalid());
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_other_422_keeps_session() {
        let (client, transport, shell) = client();
        client
            .session()
            .login("a@b.c", &json!({"access_token": "ok"}));
        transport.on(
            HttpMethod::Put,
            "author/3",
            422,
            json!({"msg": "Unprocessable Entity"}),
        );

        block_on(client.put("author/3", json!({"name": "x"}))).unwrap();
        assert!(client.session().is_logged_in());
        assert!(shell.routes().is_empty());
        assert_eq!(shell.error_count(), 1);
    }

    #[test]
    fn test_transport_failure() {
        let (client, transport, shell) = client();
        transport.fail(HttpMethod::Get, "corpus", "connection refused");

        let err = block_on(client.get("corpus")).unwrap_err();
        assert!(matches!(err, ConsoleError::Transport(_)));
        assert_eq!(
            shell.notifications(),
            vec![Notification::error("Operation failed: unexpected behavior")]
        );
    }

    #[test]
    fn test_fetch_collection_and_record() {
        let (client, transport, shell) = client();
        transport.on(
            HttpMethod::Get,
            "author",
            200,
            json!([{"id": 1, "name": "Machado"}, {"id": 2, "name": "Clarice"}]),
        );
        transport.on(
            HttpMethod::Get,
            "author/2",
            200,
            json!({"id": 2, "name": "Clarice", "documents": []}),
        );

        let authors = block_on(client.fetch_collection(EntityType::Author)).unwrap();
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[1].name, "Clarice");

        transport.on(
            HttpMethod::Get,
            "language",
            200,
            json!([{"id": 1, "name": null}, {"id": 2, "name": "Portuguese"}]),
        );
        let languages = block_on(client.fetch_collection(EntityType::Language)).unwrap();
        assert_eq!(
            languages,
            vec![
                EntitySummary::new(EntityId::Int(1), ""),
                EntitySummary::new(EntityId::Int(2), "Portuguese"),
            ]
        );
        assert_eq!(shell.error_count(), 0);

        let record = block_on(client.fetch_record(EntityType::Author, &EntityId::Int(2))).unwrap();
        assert_eq!(record.display_name(), "Clarice");
        assert!(shell.notifications().is_empty());
    }

    #[test]
    fn test_fetch_errors() {
        let (client, transport, shell) = client();
        transport.on(HttpMethod::Get, "corpus/9", 404, json!({"message": "Not found"}));
        transport.on_raw(HttpMethod::Get, "corpus", 200, "not json");

        let err = block_on(client.fetch_record(EntityType::Corpus, &EntityId::Int(9))).unwrap_err();
        assert_eq!(err.status(), Some(404));

        let err = block_on(client.fetch_collection(EntityType::Corpus)).unwrap_err();
        assert!(matches!(err, ConsoleError::Decode(_)));

        assert_eq!(
            shell.notifications(),
            vec![
                Notification::error("Operation failed: Not found"),
                Notification::error("Operation failed: unexpected behavior"),
            ]
        );
    }
}
