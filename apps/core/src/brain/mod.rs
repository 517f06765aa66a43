//! # Brain Module
//!
//! Intent classification and online learning for the assistant.
//!
//! ## Components
//! - `intent`: The closed intent set, canned responses and seed examples
//! - `encoder`: Term-count text encoder
//! - `classifier`: Multinomial logistic regression
//! - `training`: Append-only training set
//! - `responder`: Classify / respond / teach orchestrator
//! - `evaluation`: Held-out accuracy on a seeded split

pub mod classifier;
pub mod encoder;
pub mod evaluation;
pub mod intent;
pub mod responder;
pub mod training;

// Re-export main types for convenience
pub use classifier::{ClassifierError, LinearClassifier, Prediction, TrainingParams};
pub use encoder::CountEncoder;
pub use evaluation::{holdout_accuracy, HoldoutReport};
pub use intent::{Intent, FALLBACK_RESPONSE};
pub use responder::{IntentResponder, Reply, ResponseTable};
pub use training::TrainingSet;
