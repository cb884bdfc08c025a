use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{ChallengeQuestion, ConversationEntry, DocumentState, Session},
};

/// Outcome of a write computed against a specific upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentWrite {
    Applied,
    /// The session's document was replaced (or removed) after the write was
    /// computed; nothing was stored.
    Stale,
}

/// Session store. Writes that depend on a completion are keyed by the
/// `document_id` they were produced for and dropped when it no longer matches.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<Session>>;
    async fn create(&self, session: Session) -> AppResult<Session>;
    async fn delete(&self, id: &Uuid) -> AppResult<bool>;
    /// Drops every session last modified before `cutoff`; returns how many.
    async fn remove_idle(&self, cutoff: DateTime<Utc>) -> AppResult<usize>;
    async fn replace_document(&self, id: &Uuid, document: DocumentState) -> AppResult<Session>;
    async fn replace_summary(
        &self,
        id: &Uuid,
        document_id: &Uuid,
        summary: String,
    ) -> AppResult<DocumentWrite>;
    async fn append_conversation(
        &self,
        id: &Uuid,
        document_id: &Uuid,
        entry: ConversationEntry,
    ) -> AppResult<DocumentWrite>;
    async fn replace_challenge_set(
        &self,
        id: &Uuid,
        document_id: &Uuid,
        questions: Vec<ChallengeQuestion>,
    ) -> AppResult<DocumentWrite>;
}

#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update_document<F>(
        &self,
        id: &Uuid,
        document_id: &Uuid,
        update: F,
    ) -> AppResult<DocumentWrite>
    where
        F: FnOnce(&mut DocumentState) + Send,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or_else(|| session_not_found(id))?;

        match session.document.as_mut() {
            Some(document) if document.document_id == *document_id => {
                update(document);
                session.touch();
                Ok(DocumentWrite::Applied)
            }
            _ => {
                log::info!(
                    "Dropping write for session {}: document {} is no longer active",
                    id,
                    document_id
                );
                Ok(DocumentWrite::Stale)
            }
        }
    }
}

fn session_not_found(id: &Uuid) -> AppError {
    AppError::NotFound(format!("Session with id '{}' not found", id))
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn create(&self, session: Session) -> AppResult<Session> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(id).is_some())
    }

    async fn remove_idle(&self, cutoff: DateTime<Utc>) -> AppResult<usize> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.modified_at >= cutoff);
        Ok(before - sessions.len())
    }

    async fn replace_document(&self, id: &Uuid, document: DocumentState) -> AppResult<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or_else(|| session_not_found(id))?;

        session.document = Some(document);
        session.touch();
        Ok(session.clone())
    }

    async fn replace_summary(
        &self,
        id: &Uuid,
        document_id: &Uuid,
        summary: String,
    ) -> AppResult<DocumentWrite> {
        self.update_document(id, document_id, |document| document.summary = summary)
            .await
    }

    async fn append_conversation(
        &self,
        id: &Uuid,
        document_id: &Uuid,
        entry: ConversationEntry,
    ) -> AppResult<DocumentWrite> {
        self.update_document(id, document_id, |document| {
            document.conversation.push(entry)
        })
        .await
    }

    async fn replace_challenge_set(
        &self,
        id: &Uuid,
        document_id: &Uuid,
        questions: Vec<ChallengeQuestion>,
    ) -> AppResult<DocumentWrite> {
        self.update_document(id, document_id, |document| {
            document.challenge_set = questions
        })
        .await
    }
}
