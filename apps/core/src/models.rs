use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single labelled utterance in the training set.
///
/// `label` is either an intent label (e.g. `"greeting"`) or, for examples
/// taught at runtime, the raw response text the user supplied. Both live in
/// the same label space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// The user utterance.
    pub text: String,
    /// The intent label or taught response.
    pub label: String,
}

impl Example {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// A row of the `user_data` table: an input the assistant was taught and the reply it accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PersistedRecord {
    /// Auto-incremented row identifier.
    pub id: i64,
    /// The user input that was not recognised.
    pub key: String,
    /// The response the user taught for it.
    pub value: String,
}

impl From<PersistedRecord> for Example {
    fn from(record: PersistedRecord) -> Self {
        Example::new(record.key, record.value)
    }
}
