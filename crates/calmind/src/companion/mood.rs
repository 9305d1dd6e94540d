//! Keyword mood classification.
//!
//! A pure, total mapping from the raw message to one [`MoodMarker`].
//! Matching is case-insensitive substring search over an ordered rule
//! table; the first rule with a matching keyword wins, so "sad but calm"
//! is [`MoodMarker::Sad`]. No match yields [`MoodMarker::Neutral`].

use std::fmt;

/// Symbolic mood tag appended to every composed reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoodMarker {
    Sad,
    Happy,
    Angry,
    Anxious,
    Calm,
    /// Nothing matched.
    Neutral,
}

/// Ordered rule table. Order is significant.
const RULES: [(&[&str], MoodMarker); 5] = [
    (&["sad", "depressed"], MoodMarker::Sad),
    (&["happy", "grateful"], MoodMarker::Happy),
    (&["angry", "frustrated"], MoodMarker::Angry),
    (&["anxious", "nervous"], MoodMarker::Anxious),
    (&["calm", "peaceful"], MoodMarker::Calm),
];

impl MoodMarker {
    /// Classify a raw message.
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
            .map_or(MoodMarker::Neutral, |(_, marker)| *marker)
    }

    pub fn emoji(self) -> &'static str {
        match self {
            MoodMarker::Sad => "😢",
            MoodMarker::Happy => "😊",
            MoodMarker::Angry => "😡",
            MoodMarker::Anxious => "😰",
            MoodMarker::Calm => "🧘",
            MoodMarker::Neutral => "🌿",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MoodMarker::Sad => "sad",
            MoodMarker::Happy => "happy",
            MoodMarker::Angry => "angry",
            MoodMarker::Anxious => "anxious",
            MoodMarker::Calm => "calm",
            MoodMarker::Neutral => "neutral",
        }
    }
}

impl fmt::Display for MoodMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_rule_matches_its_keywords() {
        let cases = [
            ("I feel sad today", MoodMarker::Sad),
            ("kind of depressed", MoodMarker::Sad),
            ("so happy right now", MoodMarker::Happy),
            ("grateful for my friends", MoodMarker::Happy),
            ("I'm angry at my boss", MoodMarker::Angry),
            ("frustrated with everything", MoodMarker::Angry),
            ("I feel really anxious about tomorrow", MoodMarker::Anxious),
            ("nervous before the exam", MoodMarker::Anxious),
            ("pretty calm tonight", MoodMarker::Calm),
            ("a peaceful morning", MoodMarker::Calm),
        ];
        for (text, expected) in cases {
            assert_eq!(MoodMarker::classify(text), expected, "{text}");
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        assert_eq!(MoodMarker::classify("I feel sad but calm"), MoodMarker::Sad);
        assert_eq!(MoodMarker::classify("calm yet nervous"), MoodMarker::Anxious);
        assert_eq!(
            MoodMarker::classify("happy, though a bit frustrated"),
            MoodMarker::Happy
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(MoodMarker::classify("SO ANXIOUS"), MoodMarker::Anxious);
        assert_eq!(MoodMarker::classify("Grateful"), MoodMarker::Happy);
    }

    #[test]
    fn matching_is_substring_based() {
        // "unhappy" contains "happy"; substring semantics are kept as-is.
        assert_eq!(MoodMarker::classify("unhappy"), MoodMarker::Happy);
        assert_eq!(MoodMarker::classify("saddest day"), MoodMarker::Sad);
    }

    #[test]
    fn default_when_nothing_matches() {
        assert_eq!(MoodMarker::classify("just a regular day"), MoodMarker::Neutral);
        assert_eq!(MoodMarker::classify(""), MoodMarker::Neutral);
        assert_eq!(MoodMarker::Neutral.emoji(), "🌿");
    }

    #[test]
    fn display_is_the_emoji() {
        assert_eq!(MoodMarker::Anxious.to_string(), "😰");
        assert_eq!(MoodMarker::Calm.to_string(), "🧘");
    }
}
