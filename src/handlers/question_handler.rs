use actix_web::{get, post, web, HttpResponse};
use uuid::Uuid;

use crate::{app_state::AppState, errors::AppError, models::dto::request::AskQuestionRequest};

#[post("/api/sessions/{id}/questions")]
pub async fn ask_question(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    request: web::Json<AskQuestionRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .session_service
        .ask_question(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/sessions/{id}/conversation")]
pub async fn get_conversation(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let response = state.session_service.conversation_history(&id).await?;
    Ok(HttpResponse::Ok().json(response))
}
