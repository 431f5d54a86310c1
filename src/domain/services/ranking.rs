//! Progress and ranking update after a slide closes.

use crate::domain::game::{GameError, GameSession, GameState};
use crate::domain::quiz::QuizContent;

/// Closes slides and moves the session's slide pointer.
pub struct ProgressRankingService;

impl ProgressRankingService {
    /// Closes the current slide and points progress at the next one.
    ///
    /// Scores are applied and the scoreboard recomputed as the session
    /// enters `Results`. If the quiz has no further slide, progress is
    /// marked complete so the next advance ends the game.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless a question is open
    pub fn close_current_slide(
        session: &mut GameSession,
        quiz: &dyn QuizContent,
    ) -> Result<(), GameError> {
        if session.state() != GameState::Question {
            return Err(GameError::invalid_state(format!(
                "no open question in session {} ({})",
                session.pin(),
                session.state()
            )));
        }

        session.advance_to_next_phase()?;

        let index = session.progress().slides_answered();
        match quiz.next_slide_snapshot_by_index(index) {
            Some(next) => session.update_progress(next.id),
            None => session.complete_progress(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{KahootId, SlideId, UserId};
    use crate::domain::game::{SessionFactory, SessionPin};
    use crate::domain::quiz::{AnswerOption, Quiz, SlideKind, SlideSnapshot};

    fn quiz(slides: usize) -> Quiz {
        Quiz::new(
            KahootId::new(),
            UserId::new("host").unwrap(),
            "Q",
            (0..slides)
                .map(|_| SlideSnapshot {
                    id: SlideId::new(),
                    position: 0,
                    kind: SlideKind::SingleChoice,
                    question: "?".into(),
                    media_id: None,
                    time_limit_secs: 20,
                    base_points: 1000,
                    options: vec![AnswerOption::text("a", true)],
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn moves_to_next_slide_then_completes() {
        let quiz = quiz(2);
        let mut session = SessionFactory::create_for_quiz(
            &quiz,
            UserId::new("host").unwrap(),
            SessionPin::new("123456").unwrap(),
        )
        .unwrap();
        session.start_session().unwrap();

        ProgressRankingService::close_current_slide(&mut session, &quiz).unwrap();
        assert_eq!(session.state(), GameState::Results);
        assert_eq!(session.current_slide_id(), quiz.slides()[1].id);
        assert_eq!(session.progress().slides_answered(), 1);

        session.advance_to_next_phase().unwrap();
        ProgressRankingService::close_current_slide(&mut session, &quiz).unwrap();
        assert!(session.progress().is_complete());
        assert_eq!(session.advance_to_next_phase().unwrap(), GameState::End);
    }

    #[test]
    fn requires_open_question() {
        let quiz = quiz(1);
        let mut session = SessionFactory::create_for_quiz(
            &quiz,
            UserId::new("host").unwrap(),
            SessionPin::new("123456").unwrap(),
        )
        .unwrap();
        assert!(matches!(
            ProgressRankingService::close_current_slide(&mut session, &quiz),
            Err(GameError::InvalidState(_))
        ));
    }
}
