//! Game-engine error type.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, PlayerId, SlideId, ValidationError};

/// Errors raised by the session engine.
///
/// `NotFound`, `InvalidState`, `Unauthorized`, `Validation` and
/// `DuplicateAnswer` are caller-visible rejections. `Exhaustion` and
/// `Consistency` signal broken invariants and are treated as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Player {player_id} already answered slide {slide_id}")]
    DuplicateAnswer { player_id: PlayerId, slide_id: SlideId },

    #[error("No free session PIN after {attempts} attempts")]
    Exhaustion { attempts: u32 },

    #[error("Consistency violation: {0}")]
    Consistency(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl GameError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        GameError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        GameError::InvalidState(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        GameError::Unauthorized(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        GameError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn consistency(message: impl Into<String>) -> Self {
        GameError::Consistency(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        GameError::Infrastructure(message.into())
    }

    /// Maps the error onto the shared error-code taxonomy.
    pub fn code(&self) -> ErrorCode {
        match self {
            GameError::NotFound { entity, .. } => match *entity {
                "Player" => ErrorCode::PlayerNotFound,
                "Slide" => ErrorCode::SlideNotFound,
                "Quiz" => ErrorCode::QuizNotFound,
                _ => ErrorCode::SessionNotFound,
            },
            GameError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            GameError::Unauthorized(_) => ErrorCode::Unauthorized,
            GameError::Validation { .. } => ErrorCode::ValidationFailed,
            GameError::DuplicateAnswer { .. } => ErrorCode::DuplicateAnswer,
            GameError::Exhaustion { .. } => ErrorCode::PinSpaceExhausted,
            GameError::Consistency(_) => ErrorCode::ConsistencyViolation,
            GameError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    /// True for invariant violations that should never happen in correct operation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GameError::Exhaustion { .. } | GameError::Consistency(_))
    }
}

impl From<ValidationError> for GameError {
    fn from(err: ValidationError) -> Self {
        GameError::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for GameError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::SessionNotFound => GameError::not_found("Session", err.message),
            ErrorCode::QuizNotFound => GameError::not_found("Quiz", err.message),
            ErrorCode::ValidationFailed => GameError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::Unauthorized => GameError::Unauthorized(err.message),
            ErrorCode::ConsistencyViolation => GameError::Consistency(err.message),
            _ => GameError::Infrastructure(err.to_string()),
        }
    }
}
