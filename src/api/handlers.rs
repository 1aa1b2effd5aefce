//! HTTP request handlers

use super::types::{ChatRequest, ChatResponse, ErrorResponse, FaqResponse, HealthResponse};
use super::AppState;
use crate::chat::{ChatError, ChatInput};
use crate::site;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health))
        .route("/faq", get(list_faqs))
        .with_state(state)
        .layer(cors)
}

// ============================================================
// Chat
// ============================================================

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let input = ChatInput::new(req.message, req.history)?;

    let reply = state.chat.handle(input).await?;
    tracing::debug!(source = ?reply.source, "Chat reply ready");
    Ok(Json(ChatResponse { reply: reply.text }))
}

// ============================================================
// Status
// ============================================================

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let web_content = if site::extract(state.chat.site_path()).await.is_some() {
        "Contenido web disponible"
    } else {
        "Error leyendo contenido web"
    };

    Json(HealthResponse {
        status: "OK",
        message: "Servidor del chatbot funcionando",
        api_key: if state.api_key_configured {
            "Configurada"
        } else {
            "No configurada"
        },
        knowledge_base: format!("{} FAQs cargadas", state.chat.knowledge().len()),
        web_content,
    })
}

async fn list_faqs(State(state): State<AppState>) -> Json<FaqResponse> {
    let knowledge = state.chat.knowledge();
    Json(FaqResponse {
        available_faqs: knowledge.keys(),
        total_faqs: knowledge.len(),
    })
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    Internal { message: String, details: String },
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Validation(msg) => AppError::BadRequest(msg),
            ChatError::Upstream(e) => AppError::Internal {
                message: "Error interno del servidor al procesar el mensaje.".to_string(),
                details: e.message,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg))).into_response()
            }
            AppError::Internal { message, details } => {
                tracing::error!(error = %details, "Chat request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(message).with_details(details)),
                )
                    .into_response()
            }
        }
    }
}
