//! In-memory session archive for tests and single-process runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::game::ArchivedSession;
use crate::ports::SessionArchiveRepository;

#[derive(Default)]
pub struct InMemoryArchiveRepository {
    archives: RwLock<HashMap<SessionId, ArchivedSession>>,
}

impl InMemoryArchiveRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &SessionId) -> Option<ArchivedSession> {
        self.archives.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.archives.read().await.len()
    }
}

#[async_trait]
impl SessionArchiveRepository for InMemoryArchiveRepository {
    async fn archive_session(&self, archive: &ArchivedSession) -> Result<bool, DomainError> {
        let mut archives = self.archives.write().await;
        if archives.contains_key(&archive.session_id) {
            return Ok(false);
        }
        archives.insert(archive.session_id, archive.clone());
        Ok(true)
    }
}
