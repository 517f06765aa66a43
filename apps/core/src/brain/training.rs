//! Append-only training set.

use crate::brain::intent::seed_examples;
use crate::models::Example;

/// Ordered examples the classifier is fitted on. Grows by [`TrainingSet::push`] only.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    examples: Vec<Example>,
}

impl TrainingSet {
    /// The ten hardcoded seed examples.
    pub fn seeded() -> Self {
        Self {
            examples: seed_examples(),
        }
    }

    pub fn from_examples(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    pub fn push(&mut self, example: Example) {
        self.examples.push(example);
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.examples.iter().map(|e| e.text.as_str())
    }

    pub fn labels(&self) -> Vec<String> {
        self.examples.iter().map(|e| e.label.clone()).collect()
    }
}
