pub mod challenge_handler;
pub mod document_handler;
pub mod health_handler;
pub mod question_handler;
pub mod session_handler;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::errors::AppError;

pub use challenge_handler::{evaluate_answer, generate_challenge_set};
pub use document_handler::{regenerate_summary, upload_document};
pub use health_handler::{health_check, index, setup_required};
pub use question_handler::{ask_question, get_conversation};
pub use session_handler::{create_session, end_session, get_session};

/// Registers every route plus the JSON error handler. Upload size is
/// enforced by the upload handler while it reads the body.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .service(index)
        .service(health_check)
        .service(create_session)
        .service(get_session)
        .service(end_session)
        .service(upload_document)
        .service(regenerate_summary)
        .service(ask_question)
        .service(get_conversation)
        .service(generate_challenge_set)
        .service(evaluate_answer);
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::ValidationError(err.to_string()).into()
}
