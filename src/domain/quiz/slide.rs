//! Slide snapshots as delivered by the quiz-content service.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::SlideId;

/// What kind of unit a slide is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideKind {
    SingleChoice,
    MultipleChoice,
    TrueFalse,
    /// Informational slide; never evaluated.
    Display,
}

impl SlideKind {
    /// Returns true if answers to this slide earn points.
    pub fn is_scored(&self) -> bool {
        !matches!(self, SlideKind::Display)
    }
}

/// One selectable answer on a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub text: Option<String>,
    pub media_id: Option<String>,
    pub is_correct: bool,
}

impl AnswerOption {
    pub fn text(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: Some(text.into()),
            media_id: None,
            is_correct,
        }
    }

    pub fn image(media_id: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: None,
            media_id: Some(media_id.into()),
            is_correct,
        }
    }
}

/// Immutable copy of a slide, including its answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSnapshot {
    pub id: SlideId,
    /// Zero-based position within the quiz.
    pub position: usize,
    pub kind: SlideKind,
    pub question: String,
    pub media_id: Option<String>,
    pub time_limit_secs: u32,
    pub base_points: u32,
    pub options: Vec<AnswerOption>,
}

impl SlideSnapshot {
    /// Indices of the options marked correct.
    pub fn correct_indices(&self) -> BTreeSet<usize> {
        self.options
            .iter()
            .enumerate()
            .filter(|(_, option)| option.is_correct)
            .map(|(index, _)| index)
            .collect()
    }

    /// The slide as shown to players while the question is open.
    pub fn without_answer_key(&self) -> PublicSlide {
        PublicSlide {
            id: self.id,
            position: self.position,
            kind: self.kind,
            question: self.question.clone(),
            media_id: self.media_id.clone(),
            time_limit_secs: self.time_limit_secs,
            base_points: self.base_points,
            options: self
                .options
                .iter()
                .map(|option| PublicOption {
                    text: option.text.clone(),
                    media_id: option.media_id.clone(),
                })
                .collect(),
        }
    }
}

/// Answer option without its correctness flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicOption {
    pub text: Option<String>,
    pub media_id: Option<String>,
}

/// Slide stripped of every correctness flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicSlide {
    pub id: SlideId,
    pub position: usize,
    pub kind: SlideKind,
    pub question: String,
    pub media_id: Option<String>,
    pub time_limit_secs: u32,
    pub base_points: u32,
    pub options: Vec<PublicOption>,
}
