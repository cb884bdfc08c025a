use actix_web::{http::header, post, web, HttpRequest, HttpResponse};
use futures::StreamExt;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::{
        domain::UploadedFile,
        dto::request::{SummaryRequest, UploadQuery},
    },
    services::text_extractor::detect_content_type,
};

/// The request body is the file itself; its `Content-Type` picks the
/// extraction route and `?filename=` names it. The body is read here so an
/// oversized upload is refused with the usual JSON error.
#[post("/api/sessions/{id}/document")]
pub async fn upload_document(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    query: web::Query<UploadQuery>,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let filename = query.filename();
    let declared_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let content_type = detect_content_type(declared_type, filename)?;
    let body = read_upload(payload, state.config.max_upload_bytes).await?;

    log::info!(
        "[{}] Upload of '{}' ({} bytes) to session {}",
        get_request_id(&req).unwrap_or_default(),
        filename,
        body.len(),
        id
    );

    let upload = UploadedFile::new(filename, content_type, body.to_vec());
    let response = state.session_service.upload_document(&id, upload).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn read_upload(mut payload: web::Payload, limit: usize) -> Result<web::BytesMut, AppError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk
            .map_err(|e| AppError::ValidationError(format!("Could not read upload: {}", e)))?;
        if body.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

#[post("/api/sessions/{id}/summary")]
pub async fn regenerate_summary(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    request: web::Json<SummaryRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .session_service
        .regenerate_summary(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
