//! Lookups and event plumbing shared by the game handlers.

use std::sync::Arc;

use crate::domain::foundation::{
    CommandMetadata, EventEnvelope, EventId, KahootId, SerializableDomainEvent, Timestamp,
};
use crate::domain::game::{
    GameError, GameSession, GameStateUpdated, GameStateView, QuestionResults, QuestionStarted,
    SessionPin,
};
use crate::domain::quiz::{QuizContent, SlideSnapshot};
use crate::ports::{QuizRepository, SessionHandle, SessionStore};

pub(super) async fn load_session(
    sessions: &dyn SessionStore,
    pin: &SessionPin,
) -> Result<SessionHandle, GameError> {
    sessions
        .find_by_pin(pin)
        .await?
        .ok_or_else(|| GameError::not_found("Session", pin))
}

pub(super) async fn load_quiz(
    quizzes: &dyn QuizRepository,
    kahoot_id: &KahootId,
) -> Result<Arc<dyn QuizContent>, GameError> {
    quizzes
        .find_by_id(kahoot_id)
        .await?
        .ok_or_else(|| GameError::not_found("Quiz", kahoot_id))
}

pub(super) fn current_slide(
    session: &GameSession,
    quiz: &dyn QuizContent,
) -> Result<SlideSnapshot, GameError> {
    quiz.slide_snapshot_by_id(&session.current_slide_id())
        .ok_or_else(|| GameError::not_found("Slide", session.current_slide_id()))
}

pub(super) fn envelope<E: SerializableDomainEvent>(
    event: &E,
    metadata: &CommandMetadata,
) -> EventEnvelope {
    event
        .to_envelope()
        .with_correlation_id(metadata.correlation_id())
        .with_trace_id(metadata.trace_id())
}

pub(super) fn state_updated(
    session: &GameSession,
    quiz: &dyn QuizContent,
    metadata: &CommandMetadata,
) -> EventEnvelope {
    let event = GameStateUpdated {
        event_id: EventId::new(),
        session_id: session.id(),
        view: GameStateView::of(session, quiz),
        updated_at: Timestamp::now(),
    };
    envelope(&event, metadata)
}

pub(super) fn question_started(
    session: &GameSession,
    slide: &SlideSnapshot,
    metadata: &CommandMetadata,
) -> EventEnvelope {
    let event = QuestionStarted {
        event_id: EventId::new(),
        session_id: session.id(),
        pin: session.pin().to_string(),
        slide: slide.without_answer_key(),
        started_at: Timestamp::now(),
    };
    envelope(&event, metadata)
}

pub(super) fn question_results(
    session: &GameSession,
    closed: &SlideSnapshot,
    metadata: &CommandMetadata,
) -> EventEnvelope {
    let event = QuestionResults {
        event_id: EventId::new(),
        session_id: session.id(),
        pin: session.pin().to_string(),
        slide_id: closed.id,
        correct_indices: closed.correct_indices().into_iter().collect(),
        scoreboard: session.ranking().entries().to_vec(),
        closed_at: Timestamp::now(),
    };
    envelope(&event, metadata)
}
