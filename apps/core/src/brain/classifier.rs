//! Multinomial logistic regression over encoded text.
//!
//! Weights are fitted with full-batch gradient descent on the mean
//! cross-entropy plus an L2 penalty. Intercepts are not penalised. Labels are
//! kept in sorted order so that training is deterministic and ties resolve to
//! the earliest label.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;
use validator::Validate;

/// Errors raised while fitting or querying the classifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,
    #[error("empty vocabulary; the training texts contain no word tokens")]
    EmptyVocabulary,
    #[error("need at least two distinct labels to fit, got only '{0}'")]
    SingleClass(String),
    #[error("{features} feature rows but {labels} labels")]
    LengthMismatch { features: usize, labels: usize },
    #[error("expected {expected} features, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// Hyper-parameters of the gradient descent fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TrainingParams {
    /// Inverse regularisation strength. Larger values fit the training set more tightly.
    #[validate(range(min = 1e-6))]
    pub regularization: f64,
    /// Upper bound on gradient descent steps.
    #[validate(range(min = 1))]
    pub max_iterations: usize,
    /// Step size of each update.
    #[validate(range(min = 1e-6, max = 100.0))]
    pub learning_rate: f64,
    /// Stop once the largest gradient component falls below this value.
    #[validate(range(min = 0.0))]
    pub tolerance: f64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            regularization: 10.0,
            max_iterations: 1000,
            learning_rate: 1.0,
            tolerance: 1e-6,
        }
    }
}

/// Top prediction for one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Softmax probability of `label` (0.0 - 1.0)
    pub confidence: f64,
}

/// Fitted linear classifier.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    labels: Vec<String>,
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    iterations: usize,
}

impl LinearClassifier {
    /// Fits the model on `features` (one row per example) and their `labels`.
    pub fn fit(
        features: &[Vec<f64>],
        labels: &[String],
        params: &TrainingParams,
    ) -> Result<Self, ClassifierError> {
        if features.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        if features.len() != labels.len() {
            return Err(ClassifierError::LengthMismatch {
                features: features.len(),
                labels: labels.len(),
            });
        }

        let dimension = features[0].len();
        if let Some(row) = features.iter().find(|row| row.len() != dimension) {
            return Err(ClassifierError::DimensionMismatch {
                expected: dimension,
                found: row.len(),
            });
        }

        let classes: Vec<String> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if classes.len() < 2 {
            return Err(ClassifierError::SingleClass(classes[0].clone()));
        }

        let targets: Vec<usize> = labels
            .iter()
            .map(|label| classes.binary_search(label).unwrap_or_default())
            .collect();

        let n = features.len() as f64;
        let penalty = 1.0 / (params.regularization * n);
        let mut weights = vec![vec![0.0; dimension]; classes.len()];
        let mut intercepts = vec![0.0; classes.len()];
        let mut iterations = 0;

        while iterations < params.max_iterations {
            iterations += 1;

            let mut weight_grad: Vec<Vec<f64>> = weights
                .iter()
                .map(|row| row.iter().map(|w| penalty * w).collect())
                .collect();
            let mut intercept_grad = vec![0.0; classes.len()];

            for (row, &target) in features.iter().zip(&targets) {
                let probabilities = softmax(&logits(&weights, &intercepts, row));
                for (class, p) in probabilities.iter().enumerate() {
                    let error = (p - if class == target { 1.0 } else { 0.0 }) / n;
                    intercept_grad[class] += error;
                    for (grad, x) in weight_grad[class].iter_mut().zip(row) {
                        if *x != 0.0 {
                            *grad += error * x;
                        }
                    }
                }
            }

            let largest = weight_grad
                .iter()
                .flatten()
                .chain(intercept_grad.iter())
                .fold(0.0_f64, |acc, g| acc.max(g.abs()));

            for (row, grads) in weights.iter_mut().zip(&weight_grad) {
                for (w, g) in row.iter_mut().zip(grads) {
                    *w -= params.learning_rate * g;
                }
            }
            for (b, g) in intercepts.iter_mut().zip(&intercept_grad) {
                *b -= params.learning_rate * g;
            }

            if largest < params.tolerance {
                break;
            }
        }

        debug!(
            classes = classes.len(),
            dimension, iterations, "Fitted linear classifier"
        );

        Ok(Self {
            labels: classes,
            weights,
            intercepts,
            iterations,
        })
    }

    /// Class probabilities for `x`, in [`LinearClassifier::labels`] order.
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>, ClassifierError> {
        let expected = self.dimension();
        if x.len() != expected {
            return Err(ClassifierError::DimensionMismatch {
                expected,
                found: x.len(),
            });
        }
        Ok(softmax(&logits(&self.weights, &self.intercepts, x)))
    }

    /// Most probable label for `x`.
    pub fn predict(&self, x: &[f64]) -> Result<Prediction, ClassifierError> {
        let probabilities = self.predict_proba(x)?;

        let mut best = 0;
        for (class, p) in probabilities.iter().enumerate().skip(1) {
            if *p > probabilities[best] {
                best = class;
            }
        }

        Ok(Prediction {
            label: self.labels[best].clone(),
            confidence: probabilities[best],
        })
    }

    /// Known labels, sorted.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn dimension(&self) -> usize {
        self.weights.first().map(Vec::len).unwrap_or_default()
    }

    /// Gradient descent steps taken by the last fit.
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

fn logits(weights: &[Vec<f64>], intercepts: &[f64], x: &[f64]) -> Vec<f64> {
    weights
        .iter()
        .zip(intercepts)
        .map(|(row, b)| b + row.iter().zip(x).map(|(w, v)| w * v).sum::<f64>())
        .collect()
}

fn softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0]);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }

    #[test]
    fn test_fit_separates_disjoint_features() {
        let features = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let model =
            LinearClassifier::fit(&features, &labels(&["left", "right"]), &TrainingParams::default())
                .unwrap();

        assert_eq!(model.labels(), &["left", "right"]);
        assert_eq!(model.predict(&[1.0, 0.0]).unwrap().label, "left");
        assert_eq!(model.predict(&[0.0, 1.0]).unwrap().label, "right");
        assert!(model.predict(&[0.0, 1.0]).unwrap().confidence > 0.5);
    }

    #[test]
    fn test_ties_resolve_to_first_label() {
        let features = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let model =
            LinearClassifier::fit(&features, &labels(&["b", "a"]), &TrainingParams::default())
                .unwrap();

        // Symmetric data leaves both intercepts equal for an all-zero input.
        let prediction = model.predict(&[0.0, 0.0]).unwrap();
        assert_eq!(prediction.label, "a");
        assert!((prediction.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_single_class_is_rejected() {
        let features = vec![vec![1.0], vec![2.0]];
        let result =
            LinearClassifier::fit(&features, &labels(&["only", "only"]), &TrainingParams::default());
        assert_eq!(result.unwrap_err(), ClassifierError::SingleClass("only".into()));
    }

    #[test]
    fn test_empty_and_mismatched_inputs_are_rejected() {
        let params = TrainingParams::default();
        assert_eq!(
            LinearClassifier::fit(&[], &[], &params).unwrap_err(),
            ClassifierError::EmptyTrainingSet
        );
        assert_eq!(
            LinearClassifier::fit(&[vec![1.0]], &labels(&["a", "b"]), &params).unwrap_err(),
            ClassifierError::LengthMismatch {
                features: 1,
                labels: 2
            }
        );
    }

    #[test]
    fn test_predict_checks_dimension() {
        let features = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let model =
            LinearClassifier::fit(&features, &labels(&["a", "b"]), &TrainingParams::default())
                .unwrap();
        assert_eq!(
            model.predict(&[1.0]).unwrap_err(),
            ClassifierError::DimensionMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_tolerance_stops_early() {
        let params = TrainingParams {
            tolerance: 1.0,
            ..TrainingParams::default()
        };
        let features = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let model = LinearClassifier::fit(&features, &labels(&["a", "b"]), &params).unwrap();
        assert_eq!(model.iterations(), 1);
    }
}
