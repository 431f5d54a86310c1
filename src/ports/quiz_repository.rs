//! Quiz repository port - read access to quiz content.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, KahootId};
use crate::domain::quiz::QuizContent;

/// Looks up quiz content by id.
///
/// Content is owned by an external authoring service; the engine only
/// reads it.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Returns `None` if no quiz has this id.
    async fn find_by_id(&self, id: &KahootId) -> Result<Option<Arc<dyn QuizContent>>, DomainError>;
}
