//! Slide pointer for a running game.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Percentage, SlideId, ValidationError};

/// Which slide is current and how many have been played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    current_slide_id: SlideId,
    total_slides: usize,
    slides_answered: usize,
}

impl Progress {
    /// Progress positioned on the first slide.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if the quiz has no slides
    pub fn new(first_slide_id: SlideId, total_slides: usize) -> Result<Self, ValidationError> {
        if total_slides == 0 {
            return Err(ValidationError::out_of_range(
                "total_slides",
                1,
                i64::MAX,
                0,
            ));
        }
        Ok(Self {
            current_slide_id: first_slide_id,
            total_slides,
            slides_answered: 0,
        })
    }

    pub fn current_slide_id(&self) -> SlideId {
        self.current_slide_id
    }

    pub fn total_slides(&self) -> usize {
        self.total_slides
    }

    pub fn slides_answered(&self) -> usize {
        self.slides_answered
    }

    pub fn is_complete(&self) -> bool {
        self.slides_answered >= self.total_slides
    }

    pub fn percentage(&self) -> Percentage {
        Percentage::of(self.slides_answered as u32, self.total_slides as u32)
    }

    pub(crate) fn advance(&mut self, next_slide_id: SlideId) {
        self.current_slide_id = next_slide_id;
        self.slides_answered += 1;
    }

    pub(crate) fn complete(&mut self) {
        self.slides_answered = self.total_slides;
    }
}
