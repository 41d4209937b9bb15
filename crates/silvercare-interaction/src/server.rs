//! HTTP surface of the chat proxy: `POST /api/chat` and `GET /api/chat`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;

use silvercare_core::chat::ChatRequest;
use silvercare_core::error::{CareError, Result};

use crate::chat_proxy::{ChatProxy, MISSING_KEY_MESSAGE, MISSING_MESSAGE};
use crate::http_chat_client::CHAT_PATH;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

pub fn router(proxy: Arc<ChatProxy>) -> Router {
    Router::new()
        .route(CHAT_PATH, get(chat_status).post(chat))
        .with_state(proxy)
}

/// Serves the proxy on `bind` until Ctrl-C.
pub async fn serve(bind: &str, proxy: Arc<ChatProxy>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| CareError::io(format!("Failed to bind {bind}: {e}")))?;
    let addr = listener
        .local_addr()
        .map_err(|e| CareError::io(e.to_string()))?;
    tracing::info!("Chat proxy listening on http://{}{}", addr, CHAT_PATH);

    axum::serve(listener, router(proxy))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CareError::io(format!("Chat proxy server failed: {e}")))?;

    tracing::info!("Chat proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn chat_status() -> Json<Value> {
    Json(json!({ "message": "Chat API is running" }))
}

/// `POST /api/chat`.
///
/// A request without `conversationHistory` is answered with an empty history
/// rather than rejected; any other shape mismatch gets the apology reply.
async fn chat(State(proxy): State<Arc<ChatProxy>>, body: Bytes) -> Response {
    if !proxy.is_configured() {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, MISSING_KEY_MESSAGE);
    }

    let value: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Unparseable chat request: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE);
        }
    };

    if is_falsy(value.get("message")) {
        return error_response(StatusCode::BAD_REQUEST, MISSING_MESSAGE);
    }

    // A present but malformed request still gets a reply, just not from the model.
    let request: ChatRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Malformed chat request: {}", e);
            return Json(ChatProxy::apology()).into_response();
        }
    };

    match proxy.reply(&request).await {
        Ok(reply) => Json(reply).into_response(),
        Err(CareError::Validation(message)) => error_response(StatusCode::BAD_REQUEST, &message),
        Err(CareError::Config(_)) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, MISSING_KEY_MESSAGE)
        }
        Err(e) => {
            tracing::error!("Chat API error: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
        }
    }
}

fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
