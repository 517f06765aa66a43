//! Held-out accuracy of the classifier on a shuffled train/test split.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

use crate::brain::classifier::{ClassifierError, TrainingParams};
use crate::brain::responder::fit_model;
use crate::brain::training::TrainingSet;

pub const DEFAULT_TEST_RATIO: f64 = 0.2;
pub const DEFAULT_SPLIT_SEED: u64 = 42;

/// Result of [`holdout_accuracy`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldoutReport {
    pub train_size: usize,
    pub test_size: usize,
    pub correct: usize,
    pub accuracy: f64,
}

/// Splits `training_set` into train/test parts, fits on the train part and
/// scores exact label matches on the test part.
///
/// `ceil(n * test_ratio)` examples are held out, clamped to `1..n`.
pub fn holdout_accuracy(
    training_set: &TrainingSet,
    test_ratio: f64,
    seed: u64,
    params: &TrainingParams,
) -> Result<HoldoutReport, ClassifierError> {
    let n = training_set.len();
    if n < 2 {
        return Err(ClassifierError::EmptyTrainingSet);
    }

    let test_size = ((n as f64 * test_ratio).ceil() as usize).clamp(1, n - 1);
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let examples = training_set.examples();
    let (test_idx, train_idx) = indices.split_at(test_size);
    let train = TrainingSet::from_examples(train_idx.iter().map(|&i| examples[i].clone()).collect());

    let (encoder, classifier) = fit_model(&train, params)?;

    let mut correct = 0;
    for &i in test_idx {
        let prediction = classifier.predict(&encoder.transform(&examples[i].text))?;
        if prediction.label == examples[i].label {
            correct += 1;
        }
    }

    let report = HoldoutReport {
        train_size: train.len(),
        test_size,
        correct,
        accuracy: correct as f64 / test_size as f64,
    };
    info!(
        train = report.train_size,
        test = report.test_size,
        accuracy = report.accuracy,
        "Holdout evaluation finished"
    );
    Ok(report)
}
