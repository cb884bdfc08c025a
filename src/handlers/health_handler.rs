use actix_web::{get, http::header::ContentType, web, HttpResponse};

use crate::{app_state::AppState, config::ConfigError, errors::AppError};

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML)
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.config.llm_model_name,
    }))
}

/// Sole handler while the server runs without an API key.
pub async fn setup_required() -> Result<HttpResponse, AppError> {
    Err(ConfigError::MissingApiKey.into())
}
