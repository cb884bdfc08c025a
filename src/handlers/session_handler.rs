use actix_web::{delete, get, post, web, HttpResponse};
use uuid::Uuid;

use crate::{app_state::AppState, errors::AppError};

#[post("/api/sessions")]
pub async fn create_session(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let response = state.session_service.create_session().await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/api/sessions/{id}")]
pub async fn get_session(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let snapshot = state.session_service.get_session(&id).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[delete("/api/sessions/{id}")]
pub async fn end_session(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.session_service.end_session(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
