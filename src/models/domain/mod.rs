pub mod challenge_question;
pub mod conversation_entry;
pub mod document;
pub mod document_context;
pub mod evaluation;
pub mod session;
pub use challenge_question::{ChallengeQuestion, ChallengeQuestionType};
pub use conversation_entry::{Answer, ConversationEntry};
pub use document::{ContentType, DocumentState, UploadedFile};
pub use document_context::DocumentContext;
pub use evaluation::{Evaluation, Score, ScoreBand};
pub use session::Session;
