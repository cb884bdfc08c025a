pub mod completion_client;
pub mod prompt_builder;
pub mod response_parser;
pub mod session_service;
pub mod text_extractor;
pub mod text_preprocessor;
