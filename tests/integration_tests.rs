use std::sync::Arc;

use actix_web::{
    http::{header, StatusCode},
    test, web, App,
};
use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use docsage_server::{
    app_state::AppState,
    config::Config,
    handlers,
    middleware::{RequestIdMiddleware, REQUEST_ID_HEADER},
    services::completion_client::{CompletionClient, CompletionError},
};

const DOCUMENT: &str = "Rivers flow downhill toward the sea. Gravity drives the water.\n\n\
    Erosion shapes the valleys over time! Floods deposit rich soil on the plains.";

const ANSWER: &str = "ANSWER: Downhill to the sea\n\
    JUSTIFICATION: Stated in the first paragraph\n\
    SOURCE_SNIPPET: \"Rivers flow downhill toward the sea\"";

const CHALLENGE: &str = "QUESTION_1: Why does water move toward the sea?\n\
    TYPE_1: comprehension\n\
    GUIDANCE_1: Read the first sentence\n\n\
    QUESTION_2: How are erosion and floods related?\n\
    TYPE_2: analysis\n\
    GUIDANCE_2: Compare the two paragraphs\n\n\
    QUESTION_3: What would the plains look like without floods?\n\
    TYPE_3: inference\n\
    GUIDANCE_3: Think about soil deposits";

const EVALUATION: &str = "SCORE: approximately 87 out of 100\n\
    FEEDBACK: Correct and concise.\n\
    JUSTIFICATION: The text names gravity as the driver.\n\
    REFERENCE: \"Gravity drives the water\"";

/// Replies by prompt kind and records every prompt it receives.
struct ScriptedCompletionClient {
    available: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletionClient {
    fn new() -> Self {
        Self {
            available: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn unavailable() -> Self {
        Self {
            available: false,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().await.push(prompt.to_string());

        if !self.available {
            return Err(CompletionError::RequestFailed {
                model: "scripted".to_string(),
                message: "API key not valid".to_string(),
            });
        }

        let reply = if prompt.contains("STUDENT'S ANSWER:") {
            EVALUATION
        } else if prompt.contains("GUIDANCE_1:") {
            CHALLENGE
        } else if prompt.contains("SOURCE_SNIPPET:") {
            ANSWER
        } else {
            "Rivers carry water downhill and reshape the land."
        };
        Ok(reply.to_string())
    }
}

fn config(max_upload_bytes: usize) -> Config {
    Config {
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 0,
        llm_api_key: Some(SecretString::from("integration-key".to_string())),
        llm_api_base_url: "http://localhost:1/v1".to_string(),
        llm_model_name: "scripted".to_string(),
        llm_temperature: 0.0,
        completion_timeout_secs: 5,
        summary_context_chars: 4000,
        summary_max_words: 150,
        max_upload_bytes,
        idle_session_ttl_secs: 0,
    }
}

macro_rules! test_app {
    ($client:expr) => {
        test_app!($client, 1024 * 1024)
    };
    ($client:expr, $max_upload_bytes:expr) => {{
        let max_upload_bytes: usize = $max_upload_bytes;
        let state = AppState::with_client(config(max_upload_bytes), $client);
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(RequestIdMiddleware)
                .configure(handlers::configure),
        )
        .await
    }};
}

macro_rules! create_session {
    ($app:expr) => {{
        let req = test::TestRequest::post().uri("/api/sessions").to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body["session_id"].as_str().unwrap().to_string()
    }};
}

macro_rules! upload_text {
    ($app:expr, $session:expr, $text:expr) => {{
        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/document?filename=rivers.txt", $session))
            .insert_header((header::CONTENT_TYPE, "text/plain; charset=utf-8"))
            .set_payload($text)
            .to_request();
        test::call_service(&$app, req).await
    }};
}

#[actix_web::test]
async fn test_full_document_session_flow() {
    let client = Arc::new(ScriptedCompletionClient::new());
    let app = test_app!(client.clone());
    let session = create_session!(app);

    let resp = upload_text!(app, session, DOCUMENT);
    assert_eq!(resp.status(), StatusCode::OK);
    let upload: Value = test::read_body_json(resp).await;
    assert_eq!(upload["summary"], "Rivers carry water downhill and reshape the land.");
    assert_eq!(upload["stats"]["content_type"], "text");
    assert_eq!(upload["stats"]["paragraph_count"], 2);
    assert_eq!(upload["stats"]["sentence_count"], 4);
    assert!(upload.get("notice").is_none());

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/questions", session))
        .set_json(json!({ "question": "Where do rivers flow?" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let answer: Value = test::read_body_json(resp).await;
    assert_eq!(answer["answer"], "Downhill to the sea");
    assert_eq!(answer["source_snippet"], "\"Rivers flow downhill toward the sea\"");
    assert_eq!(answer["recorded"], true);
    assert_eq!(answer["parse_fallback"], false);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/conversation", session))
        .to_request();
    let history: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(history["entries"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/challenge", session))
        .to_request();
    let challenge: Value = test::call_and_read_body_json(&app, req).await;
    let questions = challenge["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 3);
    assert_eq!(questions[1]["type"], "analysis");

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/challenge/1/evaluation", session))
        .set_json(json!({ "user_answer": "Floods come after erosion" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let evaluation: Value = test::read_body_json(resp).await;
    assert_eq!(evaluation["score"], json!({ "kind": "percent", "value": 87 }));
    assert_eq!(evaluation["score_display"], "87%");
    assert_eq!(evaluation["question_type"], "analysis");

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}", session))
        .to_request();
    let snapshot: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(snapshot["document"]["conversation_length"], 1);
    assert_eq!(snapshot["document"]["challenge_set"].as_array().unwrap().len(), 3);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/sessions/{}", session))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}", session))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // summary, answer, challenge, evaluation
    assert_eq!(client.prompts.lock().await.len(), 4);
}

#[actix_web::test]
async fn test_every_response_carries_request_id() {
    let app = test_app!(Arc::new(ScriptedCompletionClient::new()));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));

    let req = test::TestRequest::get()
        .uri("/api/sessions/00000000-0000-0000-0000-000000000000")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
}

#[actix_web::test]
async fn test_question_before_upload_is_conflict() {
    let client = Arc::new(ScriptedCompletionClient::new());
    let app = test_app!(client.clone());
    let session = create_session!(app);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/questions", session))
        .set_json(json!({ "question": "Anything?" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "NO_DOCUMENT");
    assert!(client.prompts.lock().await.is_empty());
}

#[actix_web::test]
async fn test_unsupported_upload_type_is_rejected() {
    let app = test_app!(Arc::new(ScriptedCompletionClient::new()));
    let session = create_session!(app);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/document?filename=photo.png", session))
        .insert_header((header::CONTENT_TYPE, "image/png"))
        .set_payload(vec![0x89, 0x50, 0x4e, 0x47])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "UNSUPPORTED_MEDIA_TYPE");
}

#[actix_web::test]
async fn test_octet_stream_upload_uses_file_extension() {
    let app = test_app!(Arc::new(ScriptedCompletionClient::new()));
    let session = create_session!(app);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/document?filename=notes.TXT", session))
        .insert_header((header::CONTENT_TYPE, "application/octet-stream"))
        .set_payload("Short notes. Nothing else.")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["stats"]["filename"], "notes.TXT");
    assert_eq!(body["stats"]["word_count"], 4);
}

#[actix_web::test]
async fn test_unreadable_upload_is_unprocessable() {
    let app = test_app!(Arc::new(ScriptedCompletionClient::new()));
    let session = create_session!(app);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/document?filename=broken.pdf", session))
        .insert_header((header::CONTENT_TYPE, "application/pdf"))
        .set_payload("not really a pdf")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "EXTRACTION_ERROR");

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}", session))
        .to_request();
    let snapshot: Value = test::call_and_read_body_json(&app, req).await;
    assert!(snapshot["document"].is_null());
}

#[actix_web::test]
async fn test_oversized_upload_is_rejected() {
    let app = test_app!(Arc::new(ScriptedCompletionClient::new()), 64);
    let session = create_session!(app);

    let resp = upload_text!(app, session, "word ".repeat(100));

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(body["error"], "Upload exceeds the 64 byte limit");

    let resp = upload_text!(app, session, "word ".repeat(12));
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_blank_question_and_bad_json_are_bad_requests() {
    let app = test_app!(Arc::new(ScriptedCompletionClient::new()));
    let session = create_session!(app);
    let resp = upload_text!(app, session, DOCUMENT);
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/questions", session))
        .set_json(json!({ "question": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/questions", session))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"prompt\": 1}")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/summary", session))
        .set_json(json!({ "max_words": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_unavailable_model_degrades_instead_of_failing() {
    let app = test_app!(Arc::new(ScriptedCompletionClient::unavailable()));
    let session = create_session!(app);

    let resp = upload_text!(app, session, DOCUMENT);
    assert_eq!(resp.status(), StatusCode::OK);
    let upload: Value = test::read_body_json(resp).await;
    assert_eq!(
        upload["summary"],
        "Unable to generate summary. Please check your API key and try again."
    );
    assert!(upload["notice"].as_str().unwrap().contains("API key not valid"));

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/questions", session))
        .set_json(json!({ "question": "Where do rivers flow?" }))
        .to_request();
    let answer: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(answer["recorded"], false);
    assert_eq!(answer["justification"], "Error occurred during processing");

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/conversation", session))
        .to_request();
    let history: Value = test::call_and_read_body_json(&app, req).await;
    assert!(history["entries"].as_array().unwrap().is_empty());

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/challenge", session))
        .to_request();
    let challenge: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        challenge["questions"][0]["question"],
        "What is the main topic or purpose of this document?"
    );

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/challenge/2/evaluation", session))
        .set_json(json!({ "user_answer": "No idea" }))
        .to_request();
    let evaluation: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(evaluation["score_display"], "N/A");
    assert_eq!(evaluation["reference_content"], "Unable to provide reference");
}

#[actix_web::test]
async fn test_evaluating_missing_question_is_not_found() {
    let app = test_app!(Arc::new(ScriptedCompletionClient::new()));
    let session = create_session!(app);
    let resp = upload_text!(app, session, DOCUMENT);
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/challenge/5/evaluation", session))
        .set_json(json!({ "user_answer": "Something" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
