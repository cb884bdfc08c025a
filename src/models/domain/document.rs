use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::domain::{ChallengeQuestion, ConversationEntry, DocumentContext};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Pdf,
    Text,
}

impl ContentType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        // "text/plain; charset=utf-8" still counts as text
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            "text/plain" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Text => "text/plain",
        }
    }
}

/// Raw upload as received from the client, before extraction.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: ContentType,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, content_type: ContentType, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            bytes,
        }
    }

    pub fn content_hash(&self) -> String {
        let digest = Sha256::digest(&self.bytes);
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

/// Everything the session knows about the current upload. Replaced as a whole
/// when another file is uploaded.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentState {
    pub document_id: Uuid,
    pub filename: String,
    pub content_type: ContentType,
    pub content_hash: String,
    pub uploaded_at: DateTime<Utc>,
    pub context: DocumentContext,
    pub summary: String,
    pub conversation: Vec<ConversationEntry>,
    pub challenge_set: Vec<ChallengeQuestion>,
}

impl DocumentState {
    pub fn new(upload: &UploadedFile, context: DocumentContext, summary: String) -> Self {
        DocumentState {
            document_id: Uuid::new_v4(),
            filename: upload.filename.clone(),
            content_type: upload.content_type,
            content_hash: upload.content_hash(),
            uploaded_at: Utc::now(),
            context,
            summary,
            conversation: Vec::new(),
            challenge_set: Vec::new(),
        }
    }
}
