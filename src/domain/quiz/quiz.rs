//! Quiz content consumed by the session engine.
//!
//! Content authoring lives outside this crate. The engine only talks to
//! content through [`QuizContent`]; [`Quiz`] is the in-process
//! implementation used by the in-memory repository and tests.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{KahootId, SlideId, UserId, ValidationError};
use crate::domain::game::GameError;

use super::scoring::{strategy_for, ScoringInput};
use super::{AnswerContent, EvaluationResult, SlideSnapshot, Submission};

/// Read-only view of quiz content needed to run a game.
pub trait QuizContent: Send + Sync {
    /// Identifier of the quiz.
    fn id(&self) -> KahootId;

    /// Account that authored the quiz; only the author may host it.
    fn author_id(&self) -> &UserId;

    /// Scores a submission against the slide it addresses.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the slide is not part of this quiz
    /// - `Validation` if the selection is malformed
    /// - `Consistency` if the slide cannot be scored
    fn evaluate_answer(&self, submission: &Submission) -> Result<EvaluationResult, GameError>;

    /// Slide at a zero-based position.
    fn slide_snapshot_by_index(&self, index: usize) -> Option<SlideSnapshot>;

    /// Slide following the one at `index`.
    fn next_slide_snapshot_by_index(&self, index: usize) -> Option<SlideSnapshot> {
        self.slide_snapshot_by_index(index + 1)
    }

    fn slide_snapshot_by_id(&self, id: &SlideId) -> Option<SlideSnapshot>;

    /// Number of slides in the quiz.
    fn slide_count(&self) -> usize;
}

/// Quiz aggregate holding an ordered list of slides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    id: KahootId,
    author_id: UserId,
    title: String,
    slides: Vec<SlideSnapshot>,
}

impl Quiz {
    /// Builds a quiz, renumbering slide positions in list order.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the title is blank or there are no slides
    /// - `InvalidFormat` if two slides share an id
    pub fn new(
        id: KahootId,
        author_id: UserId,
        title: impl Into<String>,
        slides: Vec<SlideSnapshot>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if slides.is_empty() {
            return Err(ValidationError::empty_field("slides"));
        }

        let mut seen = HashSet::new();
        for slide in &slides {
            if !seen.insert(slide.id) {
                return Err(ValidationError::invalid_format(
                    "slides",
                    format!("duplicate slide id {}", slide.id),
                ));
            }
        }

        let slides = slides
            .into_iter()
            .enumerate()
            .map(|(position, mut slide)| {
                slide.position = position;
                slide
            })
            .collect();

        Ok(Self {
            id,
            author_id,
            title,
            slides,
        })
    }

    /// Parses a quiz document, applying the same checks as [`Quiz::new`].
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if the document is not a quiz
    /// - Any error [`Quiz::new`] reports
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let parsed: Quiz = serde_json::from_str(json)
            .map_err(|e| ValidationError::invalid_format("quiz", e.to_string()))?;
        Quiz::new(parsed.id, parsed.author_id, parsed.title, parsed.slides)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slides(&self) -> &[SlideSnapshot] {
        &self.slides
    }

    fn slide(&self, id: &SlideId) -> Option<&SlideSnapshot> {
        self.slides.iter().find(|slide| &slide.id == id)
    }
}

impl QuizContent for Quiz {
    fn id(&self) -> KahootId {
        self.id
    }

    fn author_id(&self) -> &UserId {
        &self.author_id
    }

    fn evaluate_answer(&self, submission: &Submission) -> Result<EvaluationResult, GameError> {
        let slide = self
            .slide(&submission.slide_id)
            .ok_or_else(|| GameError::not_found("Slide", submission.slide_id))?;

        let selected = submission.selection(slide.options.len())?;
        let correct = slide.correct_indices();

        let outcome = strategy_for(slide.kind).score(&ScoringInput {
            selected: &selected,
            correct: &correct,
            response_time: Duration::from_millis(submission.response_time_ms),
            time_limit_secs: slide.time_limit_secs,
            base_points: slide.base_points,
        })?;

        let answer_content = selected
            .iter()
            .filter_map(|&index| {
                let option = &slide.options[index];
                match (&option.text, &option.media_id) {
                    (Some(text), _) => Some(AnswerContent::Text(text.clone())),
                    (None, Some(media)) => Some(AnswerContent::Image(media.clone())),
                    (None, None) => None,
                }
            })
            .collect();

        Ok(EvaluationResult {
            slide_id: slide.id,
            selected: selected.into_iter().collect(),
            is_correct: outcome.is_correct,
            score: outcome.score,
            response_time_ms: submission.response_time_ms,
            answer_content,
        })
    }

    fn slide_snapshot_by_index(&self, index: usize) -> Option<SlideSnapshot> {
        self.slides.get(index).cloned()
    }

    fn slide_snapshot_by_id(&self, id: &SlideId) -> Option<SlideSnapshot> {
        self.slide(id).cloned()
    }

    fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quiz::{AnswerOption, SlideKind};

    fn slide(kind: SlideKind, options: Vec<AnswerOption>) -> SlideSnapshot {
        SlideSnapshot {
            id: SlideId::new(),
            position: 99,
            kind,
            question: "Q".to_string(),
            media_id: None,
            time_limit_secs: 20,
            base_points: 1000,
            options,
        }
    }

    fn quiz() -> Quiz {
        Quiz::new(
            KahootId::new(),
            UserId::new("author").unwrap(),
            "Capitals",
            vec![
                slide(
                    SlideKind::SingleChoice,
                    vec![AnswerOption::text("Paris", true), AnswerOption::text("Rome", false)],
                ),
                slide(SlideKind::Display, vec![]),
                slide(
                    SlideKind::MultipleChoice,
                    vec![AnswerOption::image("img-1", true), AnswerOption::text("No", false)],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn from_json_reads_a_serialized_quiz() {
        let original = quiz();
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(Quiz::from_json(&json).unwrap(), original);
    }

    #[test]
    fn from_json_applies_quiz_checks() {
        let mut doc = serde_json::to_value(quiz()).unwrap();
        doc["slides"] = serde_json::json!([]);

        assert_eq!(
            Quiz::from_json(&doc.to_string()),
            Err(ValidationError::empty_field("slides"))
        );
        assert!(matches!(
            Quiz::from_json("{\"title\": 3}"),
            Err(ValidationError::InvalidFormat { ref field, .. }) if field == "quiz"
        ));
    }

    #[test]
    fn new_renumbers_positions() {
        let quiz = quiz();
        let positions: Vec<usize> = quiz.slides().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn new_rejects_empty_slides() {
        let result = Quiz::new(KahootId::new(), UserId::new("a").unwrap(), "T", vec![]);
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn new_rejects_duplicate_slide_ids() {
        let s = slide(SlideKind::TrueFalse, vec![AnswerOption::text("True", true)]);
        let result = Quiz::new(
            KahootId::new(),
            UserId::new("a").unwrap(),
            "T",
            vec![s.clone(), s],
        );
        assert!(result.is_err());
    }

    #[test]
    fn evaluate_answer_scores_and_echoes_text() {
        let quiz = quiz();
        let first = quiz.slide_snapshot_by_index(0).unwrap();
        let result = quiz
            .evaluate_answer(&Submission::new(first.id, vec![0], 10_000))
            .unwrap();

        assert!(result.is_correct);
        assert_eq!(result.score, 750);
        assert_eq!(result.answer_content, vec![AnswerContent::Text("Paris".into())]);
    }

    #[test]
    fn evaluate_answer_echoes_image_reference() {
        let quiz = quiz();
        let third = quiz.slide_snapshot_by_index(2).unwrap();
        let result = quiz
            .evaluate_answer(&Submission::new(third.id, vec![0], 0))
            .unwrap();
        assert_eq!(result.answer_content, vec![AnswerContent::Image("img-1".into())]);
        assert_eq!(result.score, 1000);
    }

    #[test]
    fn evaluate_answer_on_display_slide_fails() {
        let quiz = quiz();
        let display = quiz.slide_snapshot_by_index(1).unwrap();
        let result = quiz.evaluate_answer(&Submission::new(display.id, vec![], 0));
        assert!(matches!(result, Err(GameError::Consistency(_))));
    }

    #[test]
    fn evaluate_answer_unknown_slide_is_not_found() {
        let result = quiz().evaluate_answer(&Submission::new(SlideId::new(), vec![0], 0));
        assert!(matches!(result, Err(GameError::NotFound { .. })));
    }

    #[test]
    fn next_slide_by_index_walks_forward() {
        let quiz = quiz();
        assert_eq!(quiz.next_slide_snapshot_by_index(0).unwrap().position, 1);
        assert!(quiz.next_slide_snapshot_by_index(2).is_none());
        assert_eq!(quiz.slide_count(), 3);
    }
}
