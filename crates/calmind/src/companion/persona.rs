//! The four fixed personas and their prompt templates.
//!
//! Each persona pairs a role with a goal, behavioral style guidance, and an
//! expected-output hint. The hint is sent to the model as part of the
//! prompt; fragment length and shape are never checked in code.
//!
//! Templates contain a single `{input}` placeholder for the raw message.

/// Placeholder substituted with the user's message in every template.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Immutable description of one stage's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    /// Short label, e.g. "Emotion Listener".
    pub role: &'static str,
    /// One-sentence goal.
    pub purpose: &'static str,
    /// Free-text behavioral guidance.
    pub style: &'static str,
    /// Natural-language description of the expected fragment.
    pub expected_output: &'static str,
    /// Prompt template with an `{input}` placeholder.
    pub template: &'static str,
}

impl Persona {
    /// System context for the generation call: role, purpose, and style.
    pub fn context(&self) -> String {
        format!(
            "You are {role}. {style}\n\nYour goal: {purpose}",
            role = self.role,
            style = self.style,
            purpose = self.purpose,
        )
    }

    /// Render the prompt for `input`, followed by the expected-output hint.
    pub fn render(&self, input: &str) -> String {
        format!(
            "{task}\n\nExpected answer: {expected}",
            task = self.template.replace(INPUT_PLACEHOLDER, input),
            expected = self.expected_output,
        )
    }
}

pub const EMOTION: Persona = Persona {
    role: "Emotion Listener",
    purpose: "Understand the user's emotional state from their message.",
    style: "You are a kind, emotionally intelligent listener. You read carefully what the \
            user says and name how they feel in simple words such as anxious, lonely, \
            stressed, calm, or happy. You always answer with care and gentle words.",
    expected_output: "A short sentence describing the user's emotional state.",
    template: "Read the user's message: '{input}' and identify their emotional state.",
};

pub const COPING: Persona = Persona {
    role: "Coping Guide",
    purpose: "Offer one gentle, practical tip suited to how the user feels.",
    style: "You are an empathetic support companion. Based on the user's feelings you \
            offer a single small, caring suggestion that might help them feel a little \
            better: a deep breath, a short walk, writing thoughts down. Keep it simple \
            and non-clinical. You never diagnose.",
    expected_output: "One practical coping tip, such as deep breathing or a short walk.",
    template: "Based on the user's message: '{input}', suggest one gentle coping technique \
               to help them feel better.",
};

pub const AFFIRMATION: Persona = Persona {
    role: "Affirmation Generator",
    purpose: "Give a poetic, emotionally attuned affirmation that meets the user where \
              they are and gently reminds them of their worth.",
    style: "You are a soft-spoken guardian of the heart, like a quiet song that arrives at \
            the right moment. You notice the emotional tone of the user's words and answer \
            in kind. To sadness you might say: 'You don't have to bloom every day; resting \
            is part of growing.' To anxiety: 'Even the ocean has calm days. You will find \
            your peace too.' To joy: 'Let yourself enjoy this moment. You deserve it.' \
            Your affirmations are poetic and never generic. You never force positivity; \
            you validate, uplift, and remind people to be gentle with themselves.",
    expected_output: "One or two sentences that reflect the user's mood and offer gentle \
                      encouragement or validation.",
    template: "Write a poetic, emotionally attuned affirmation for the user's message: \
               '{input}'. It should feel like a quiet breath: sincere, thoughtful, and \
               gently encouraging. Include a soft reminder to be kind to oneself if it \
               fits naturally.",
};

pub const ENGAGEMENT: Persona = Persona {
    role: "Engagement Companion",
    purpose: "Respond warmly to the user's emotional state with a thoughtful follow-up \
              question.",
    style: "You are a kind, socially intelligent companion. You ask one short follow-up \
            question that keeps the conversation going. If the user is happy, invite them \
            to share more; if they are sad or anxious, ask whether they would like to talk \
            about it. Sound casual and human, like a caring friend.",
    expected_output: "One gentle, friendly follow-up question.",
    template: "Given the user's message: '{input}' and their emotional state, reply with \
               one caring follow-up question to continue the conversation.",
};

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Persona; 4] = [EMOTION, COPING, AFFIRMATION, ENGAGEMENT];

    #[test]
    fn every_template_has_one_placeholder() {
        for persona in ALL {
            assert_eq!(
                persona.template.matches(INPUT_PLACEHOLDER).count(),
                1,
                "{} template",
                persona.role
            );
        }
    }

    #[test]
    fn render_substitutes_input_and_hint() {
        let prompt = COPING.render("I can't sleep");
        assert!(prompt.contains("'I can't sleep'"));
        assert!(!prompt.contains(INPUT_PLACEHOLDER));
        assert!(prompt.ends_with(COPING.expected_output));
    }

    #[test]
    fn render_does_not_expand_placeholders_in_input() {
        let prompt = EMOTION.render("what does {input} mean");
        assert!(prompt.contains("'what does {input} mean'"));
    }

    #[test]
    fn context_carries_role_purpose_and_style() {
        let ctx = AFFIRMATION.context();
        assert!(ctx.contains(AFFIRMATION.role));
        assert!(ctx.contains(AFFIRMATION.purpose));
        assert!(ctx.contains(AFFIRMATION.style));
    }

    #[test]
    fn roles_are_distinct() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                assert!(!a.role.contains(b.role) && !b.role.contains(a.role));
            }
        }
    }
}
