//! User input validation.

/// Minimum number of non-surrounding-whitespace characters a message needs
/// before it is worth a pipeline run. Inclusive.
pub const MIN_INPUT_CHARS: usize = 4;

/// A message that passed the minimum-length gate.
///
/// Holds the text exactly as submitted: stages and the mood classifier see
/// the raw message, surrounding whitespace included. Only the length check
/// looks at the trimmed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput(String);

impl UserInput {
    /// Accept `raw` if its trimmed length is at least [`MIN_INPUT_CHARS`]
    /// characters (Unicode scalar values, not bytes).
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().chars().count() < MIN_INPUT_CHARS {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for UserInput {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
