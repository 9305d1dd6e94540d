//! The closed set of pipeline stages.

use std::fmt;

use crate::companion::persona::{self, Persona};

/// One of the four role-specialized generation stages.
///
/// The declaration order is the composition order: fragments are always
/// joined Emotion, Coping, Affirmation, Engagement, whatever order the
/// calls finish in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageKind {
    Emotion,
    Coping,
    Affirmation,
    Engagement,
}

impl StageKind {
    /// All stages, in composition order.
    pub const ALL: [StageKind; 4] = [
        StageKind::Emotion,
        StageKind::Coping,
        StageKind::Affirmation,
        StageKind::Engagement,
    ];

    /// Position in composition order.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            StageKind::Emotion => "emotion",
            StageKind::Coping => "coping",
            StageKind::Affirmation => "affirmation",
            StageKind::Engagement => "engagement",
        }
    }

    pub fn persona(self) -> &'static Persona {
        match self {
            StageKind::Emotion => &persona::EMOTION,
            StageKind::Coping => &persona::COPING,
            StageKind::Affirmation => &persona::AFFIRMATION,
            StageKind::Engagement => &persona::ENGAGEMENT,
        }
    }

    /// Build the user prompt for this stage.
    ///
    /// `emotion` is the Emotion stage's fragment when the pipeline threads
    /// it downstream ([`Flow::EmotionFirst`](super::Flow::EmotionFirst)).
    /// It is ignored for the Emotion stage itself.
    pub fn prompt(self, input: &str, emotion: Option<&str>) -> String {
        let mut prompt = self.persona().render(input);
        if let Some(state) = emotion.filter(|_| self != StageKind::Emotion) {
            prompt.push_str("\n\nThe user's emotional state, as already identified: ");
            prompt.push_str(state.trim());
        }
        prompt
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
