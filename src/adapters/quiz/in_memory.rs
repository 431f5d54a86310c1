//! In-memory quiz repository.
//!
//! Holds quiz content loaded at startup or inserted by tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, KahootId};
use crate::domain::quiz::{Quiz, QuizContent};
use crate::ports::QuizRepository;

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: RwLock<HashMap<KahootId, Arc<Quiz>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a quiz.
    pub async fn insert(&self, quiz: Quiz) {
        self.quizzes.write().await.insert(quiz.id(), Arc::new(quiz));
    }

    pub async fn len(&self) -> usize {
        self.quizzes.read().await.len()
    }

    /// Loads every `*.json` quiz document in `dir`.
    ///
    /// Returns the number of quizzes loaded. Any unreadable or invalid
    /// document fails the whole load.
    pub async fn load_dir(&self, dir: impl AsRef<Path>) -> Result<usize, DomainError> {
        let dir = dir.as_ref();
        let mut entries = fs::read_dir(dir)
            .await
            .map_err(|e| io_error("read quiz directory", dir, e))?;

        let mut loaded = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error("read quiz directory", dir, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let json = fs::read_to_string(&path)
                .await
                .map_err(|e| io_error("read quiz", &path, e))?;
            let quiz = Quiz::from_json(&json).map_err(|e| {
                DomainError::new(ErrorCode::InvalidFormat, format!("Invalid quiz: {}", e))
                    .with_detail("path", path.display().to_string())
            })?;

            tracing::debug!(quiz_id = %quiz.id(), path = %path.display(), "Quiz loaded");
            self.insert(quiz).await;
            loaded += 1;
        }
        Ok(loaded)
    }
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> DomainError {
    DomainError::new(ErrorCode::InternalError, format!("Failed to {}: {}", action, e))
        .with_detail("path", path.display().to_string())
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn find_by_id(&self, id: &KahootId) -> Result<Option<Arc<dyn QuizContent>>, DomainError> {
        Ok(self
            .quizzes
            .read()
            .await
            .get(id)
            .map(|quiz| Arc::clone(quiz) as Arc<dyn QuizContent>))
    }
}
