use actix_web::{post, web, HttpResponse};
use uuid::Uuid;

use crate::{app_state::AppState, errors::AppError, models::dto::request::EvaluateAnswerRequest};

#[post("/api/sessions/{id}/challenge")]
pub async fn generate_challenge_set(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let response = state.session_service.generate_challenge_set(&id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/sessions/{id}/challenge/{index}/evaluation")]
pub async fn evaluate_answer(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, usize)>,
    request: web::Json<EvaluateAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let (id, index) = path.into_inner();
    let response = state
        .session_service
        .evaluate_answer(&id, index, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
