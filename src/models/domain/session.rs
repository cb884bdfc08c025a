use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::DocumentState,
};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub document: Option<DocumentState>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            document: None,
            created_at: now,
            modified_at: now,
        }
    }

    /// The active document, or `NoDocument` when nothing has been uploaded yet.
    pub fn require_document(&self) -> AppResult<&DocumentState> {
        self.document.as_ref().ok_or(AppError::NoDocument)
    }

    pub fn require_document_mut(&mut self) -> AppResult<&mut DocumentState> {
        self.document.as_mut().ok_or(AppError::NoDocument)
    }

    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
