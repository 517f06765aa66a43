//! The closed set of intents the assistant knows out of the box.
//!
//! Each intent maps to exactly one canned response. The ten seed examples
//! below are the initial training set of the classifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Example;

/// Reply used whenever the classified label has no entry in the response table.
pub const FALLBACK_RESPONSE: &str = "I'm not sure how to respond to that.";

/// Detected intent type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// hello, hi, how are you
    Greeting,
    /// Request for a joke
    Joke,
    /// Questions about the assistant itself
    PersonalQuestion,
    /// goodbye, bye, see you
    Goodbye,
    /// Who built the assistant
    CreatorInfo,
    /// Request for a definition
    Definition,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .into_iter()
            .find(|intent| intent.label() == s)
            .ok_or_else(|| format!("unknown intent label: {}", s))
    }
}

impl Intent {
    /// Every intent, in declaration order.
    pub const ALL: [Intent; 6] = [
        Intent::Greeting,
        Intent::Joke,
        Intent::PersonalQuestion,
        Intent::Goodbye,
        Intent::CreatorInfo,
        Intent::Definition,
    ];

    /// Returns the label used for this intent in the training set
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Joke => "joke",
            Intent::PersonalQuestion => "personal_question",
            Intent::Goodbye => "goodbye",
            Intent::CreatorInfo => "creator_info",
            Intent::Definition => "definition",
        }
    }

    /// Returns the canned response for this intent
    pub fn response(&self) -> &'static str {
        match self {
            Intent::Greeting => "Hello! How can I assist you today?",
            Intent::Joke => "Why don’t scientists trust atoms? Because they make up everything!",
            Intent::PersonalQuestion => {
                "I am your assistant, here to help with whatever you need!"
            }
            Intent::Goodbye => "Goodbye! Looking forward to our next chat.",
            Intent::CreatorInfo => "I was created by an amazing developer!",
            Intent::Definition => {
                "Artificial Intelligence is the simulation of human intelligence in machines."
            }
        }
    }
}

/// Hardcoded seed utterances and their intents.
pub const SEED_EXAMPLES: [(&str, Intent); 10] = [
    ("hello", Intent::Greeting),
    ("hi", Intent::Greeting),
    ("how are you", Intent::Greeting),
    ("tell me a joke", Intent::Joke),
    ("what is your name", Intent::PersonalQuestion),
    ("goodbye", Intent::Goodbye),
    ("bye", Intent::Goodbye),
    ("see you", Intent::Goodbye),
    ("who created you", Intent::CreatorInfo),
    ("define artificial intelligence", Intent::Definition),
];

/// The seed examples as training-set entries.
pub fn seed_examples() -> Vec<Example> {
    SEED_EXAMPLES
        .iter()
        .map(|(text, intent)| Example::new(*text, intent.label()))
        .collect()
}
