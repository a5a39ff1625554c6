//! HTTP route handlers for the Direct Line proxy API.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::directline::{Activity, ConversationRecord, DirectLineError};

use super::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/conversations/start", post(start_conversation))
        .route(
            "/api/conversations/{conversation_id}/messages",
            post(send_message).delete(clear_messages),
        )
        .route(
            "/api/conversations/{conversation_id}/activities",
            get(get_activities),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "directline-proxy",
        "version": env!("CARGO_PKG_VERSION"),
        "active_conversations": state.registry.len()
    }))
}

/// Error payload returned by all endpoints on failure.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error description.
    pub error: String,
}

/// Map a relay failure to the proxy's JSON error envelope.
fn internal_error(error: &DirectLineError) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Wrap a relay response body as JSON without re-serializing it.
fn raw_json(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// Response for a newly started conversation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConversationResponse {
    /// Conversation identifier, echoed as the resource id.
    pub id: String,
    /// Conversation identifier assigned by the relay.
    pub direct_line_conversation_id: String,
    /// Bearer token scoped to this conversation.
    pub token: String,
    /// WebSocket URL for streaming activities.
    pub stream_url: String,
}

/// Start a new conversation through the relay and register it.
async fn start_conversation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StartConversationResponse>, (StatusCode, Json<ErrorResponse>)> {
    let conversation = state
        .directline
        .start_conversation()
        .await
        .map_err(|e| internal_error(&e))?;

    state
        .registry
        .insert(ConversationRecord::from(&conversation));
    tracing::info!("Started conversation {}", conversation.conversation_id);

    Ok(Json(StartConversationResponse {
        id: conversation.conversation_id.clone(),
        direct_line_conversation_id: conversation.conversation_id,
        token: conversation.token,
        stream_url: conversation.stream_url,
    }))
}

/// Message submission request.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// The user's message text.
    pub text: Option<String>,
}

/// Relay a user message into a conversation.
///
/// The body is decoded by hand so that a missing or empty `text` maps to a
/// 400 while an unreadable body maps to a 500, matching the error taxonomy
/// of the rest of the API.
async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
    body: Bytes,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let request: SendMessageRequest = serde_json::from_slice(&body)
        .map_err(|e| internal_error(&DirectLineError::from(e)))?;

    let text = request.text.unwrap_or_default();
    if text.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No text provided".to_string(),
            }),
        ));
    }

    let relayed = state
        .directline
        .post_activity(&conversation_id, &Activity::message(text))
        .await
        .map_err(|e| internal_error(&e))?;

    Ok(raw_json(relayed))
}

/// Query parameters for activity listing.
#[derive(Debug, Deserialize)]
pub struct ActivitiesQuery {
    /// Watermark to resume reading from.
    pub watermark: Option<String>,
}

/// List activities for a conversation, passing the watermark through untouched.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
    Query(query): Query<ActivitiesQuery>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    // An empty watermark counts as absent.
    let watermark = query.watermark.as_deref().filter(|w| !w.is_empty());

    let relayed = state
        .directline
        .get_activities(&conversation_id, watermark)
        .await
        .map_err(|e| internal_error(&e))?;

    Ok(raw_json(relayed))
}

/// Status payload returned by endpoints without a richer body.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Outcome of the operation.
    pub status: String,
}

/// Drop a conversation from the registry.
///
/// The relay offers no way to delete history, so this only forgets the
/// conversation locally. Unknown identifiers are ignored.
async fn clear_messages(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
) -> Json<StatusResponse> {
    if state.registry.remove(&conversation_id) {
        tracing::info!("Cleared conversation {conversation_id}");
    }

    Json(StatusResponse {
        status: "success".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use httpmock::prelude::*;
    use tower::ServiceExt;

    use crate::directline::DirectLineConfig;

    fn state_for(server: &MockServer) -> Result<Arc<AppState>, DirectLineError> {
        AppState::new(
            DirectLineConfig::default()
                .with_base_url(server.base_url())
                .with_secret("test-secret"),
        )
    }

    fn record(id: &str) -> ConversationRecord {
        ConversationRecord {
            conversation_id: id.to_string(),
            token: "tok".to_string(),
            stream_url: "wss://relay/stream".to_string(),
        }
    }

    async fn send(state: Arc<AppState>, request: Request<Body>) -> Response {
        match create_router(state).oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap_or_default()
    }

    fn post_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap_or_default()
    }

    fn delete_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap_or_default()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body_string(response).await).unwrap_or_default()
    }

    #[tokio::test]
    async fn test_health_reports_active_conversations() -> Result<(), DirectLineError> {
        let state = AppState::new(DirectLineConfig::default())?;
        state.registry.insert(record("abc123"));

        let response = send(Arc::clone(&state), get_request("/health")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["active_conversations"], 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_start_conversation_registers_record() -> Result<(), DirectLineError> {
        let server = MockServer::start();
        let relay = server.mock(|when, then| {
            when.method(POST)
                .path("/conversations")
                .header("authorization", "Bearer test-secret");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(serde_json::json!({
                    "conversationId": "abc123",
                    "token": "tok",
                    "streamUrl": "wss://relay/stream"
                }));
        });
        let state = state_for(&server)?;

        let response = send(
            Arc::clone(&state),
            post_request("/api/conversations/start", ""),
        )
        .await;

        relay.assert();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["id"], "abc123");
        assert_eq!(json["directLineConversationId"], "abc123");
        assert_eq!(json["token"], "tok");
        assert_eq!(json["streamUrl"], "wss://relay/stream");
        assert!(state.registry.contains("abc123"));
        assert_eq!(state.registry.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_start_conversation_relay_failure() -> Result<(), DirectLineError> {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/conversations");
            then.status(502);
        });
        let state = state_for(&server)?;

        let response = send(
            Arc::clone(&state),
            post_request("/api/conversations/start", ""),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Direct Line API error: 502 Bad Gateway");
        assert!(state.registry.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_send_message_requires_text() -> Result<(), DirectLineError> {
        let server = MockServer::start();
        let relay = server.mock(|when, then| {
            when.method(POST).path("/conversations/abc123/activities");
            then.status(200);
        });
        let state = state_for(&server)?;
        let uri = "/api/conversations/abc123/messages";

        let missing = send(Arc::clone(&state), post_request(uri, "{}")).await;
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        let missing_json = body_json(missing).await;
        assert_eq!(missing_json["error"], "No text provided");

        let empty = send(Arc::clone(&state), post_request(uri, r#"{"text":""}"#)).await;
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
        let empty_json = body_json(empty).await;
        assert_eq!(empty_json["error"], "No text provided");

        relay.assert_hits(0);
        Ok(())
    }

    #[tokio::test]
    async fn test_send_message_relays_activity() -> Result<(), DirectLineError> {
        let server = MockServer::start();
        let raw = r#"{"id":"abc123|0000001"}"#;
        let relay = server.mock(|when, then| {
            when.method(POST)
                .path("/conversations/abc123/activities")
                .header("authorization", "Bearer test-secret")
                .json_body(serde_json::json!({
                    "type": "message",
                    "from": {"id": "user"},
                    "text": "hello"
                }));
            then.status(200)
                .header("content-type", "application/json")
                .body(raw);
        });
        let state = state_for(&server)?;

        // The conversation was never registered locally; sending must not care.
        assert!(state.registry.is_empty());

        let response = send(
            Arc::clone(&state),
            post_request("/api/conversations/abc123/messages", r#"{"text":"hello"}"#),
        )
        .await;

        relay.assert();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, raw);
        assert!(state.registry.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_send_message_malformed_body_is_internal_error() -> Result<(), DirectLineError> {
        let server = MockServer::start();
        let relay = server.mock(|when, then| {
            when.method(POST).path("/conversations/abc123/activities");
            then.status(200);
        });
        let state = state_for(&server)?;

        let response = send(
            state,
            post_request("/api/conversations/abc123/messages", "not json"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        let error = json["error"].as_str().unwrap_or_default();
        assert!(error.contains("JSON parsing error"));
        relay.assert_hits(0);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_activities_passes_watermark() -> Result<(), DirectLineError> {
        let server = MockServer::start();
        let raw = r#"{"activities":[{"type":"message"}],"watermark":"6"}"#;
        let relay = server.mock(|when, then| {
            when.method(GET)
                .path("/conversations/abc123/activities")
                .query_param("watermark", "5");
            then.status(200)
                .header("content-type", "application/json")
                .body(raw);
        });
        let state = state_for(&server)?;

        let response = send(
            state,
            get_request("/api/conversations/abc123/activities?watermark=5"),
        )
        .await;

        relay.assert();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert_eq!(content_type, "application/json");
        assert_eq!(body_string(response).await, raw);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_activities_relay_failure() -> Result<(), DirectLineError> {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/conversations/abc123/activities");
            then.status(403);
        });
        let state = state_for(&server)?;

        let response = send(state, get_request("/api/conversations/abc123/activities")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Direct Line API error: 403 Forbidden");
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_messages_is_idempotent() -> Result<(), DirectLineError> {
        let state = AppState::new(DirectLineConfig::default())?;
        state.registry.insert(record("abc123"));
        let uri = "/api/conversations/abc123/messages";

        let first = send(Arc::clone(&state), delete_request(uri)).await;
        assert_eq!(first.status(), StatusCode::OK);
        let first_json = body_json(first).await;
        assert_eq!(first_json["status"], "success");
        assert!(state.registry.is_empty());

        let second = send(Arc::clone(&state), delete_request(uri)).await;
        assert_eq!(second.status(), StatusCode::OK);
        let second_json = body_json(second).await;
        assert_eq!(second_json["status"], "success");
        Ok(())
    }
}
