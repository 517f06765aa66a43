//! The intent responder: classify an utterance, answer it, learn from corrections.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::brain::classifier::{ClassifierError, LinearClassifier, Prediction, TrainingParams};
use crate::brain::encoder::CountEncoder;
use crate::brain::intent::{Intent, FALLBACK_RESPONSE};
use crate::brain::training::TrainingSet;
use crate::database::RecordStore;
use crate::error::AppError;
use crate::models::Example;

/// Label → response lookup.
///
/// Starts with one canned entry per [`Intent`]. Taught responses are
/// registered as labels that answer with themselves.
#[derive(Debug, Clone)]
pub struct ResponseTable {
    entries: HashMap<String, String>,
}

impl Default for ResponseTable {
    fn default() -> Self {
        let entries = Intent::ALL
            .iter()
            .map(|intent| (intent.label().to_string(), intent.response().to_string()))
            .collect();
        Self { entries }
    }
}

impl ResponseTable {
    pub fn lookup(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    /// Registers a taught response as its own label. Existing entries win,
    /// so teaching `"greeting"` keeps the canned greeting.
    pub fn register_taught(&mut self, response: &str) {
        self.entries
            .entry(response.to_string())
            .or_insert_with(|| response.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of [`IntentResponder::reply`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub label: String,
    pub confidence: f64,
    pub response: String,
    /// True when `response` is the fallback sentence.
    pub fallback: bool,
}

/// Owns the training set, the fitted encoder/classifier pair and the response table.
pub struct IntentResponder {
    training_set: TrainingSet,
    encoder: CountEncoder,
    classifier: LinearClassifier,
    responses: ResponseTable,
    params: TrainingParams,
    min_confidence: f64,
    store: Option<Arc<dyn RecordStore>>,
}

impl IntentResponder {
    /// Creates a responder trained on the seed examples.
    pub fn new(params: TrainingParams) -> Result<Self, AppError> {
        Self::from_training_set(TrainingSet::seeded(), params)
    }

    /// Creates a responder trained on `training_set`.
    ///
    /// Labels that are not intents are registered as taught responses.
    pub fn from_training_set(
        training_set: TrainingSet,
        params: TrainingParams,
    ) -> Result<Self, AppError> {
        params.validate()?;

        let mut responses = ResponseTable::default();
        for example in training_set.examples() {
            responses.register_taught(&example.label);
        }

        let (encoder, classifier) = fit_model(&training_set, &params)?;
        info!(
            examples = training_set.len(),
            labels = classifier.labels().len(),
            vocabulary = encoder.dimension(),
            "Intent responder trained"
        );

        Ok(Self {
            training_set,
            encoder,
            classifier,
            responses,
            params,
            min_confidence: 0.0,
            store: None,
        })
    }

    /// Attaches the store that taught examples are persisted to.
    pub fn with_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Predictions below `min_confidence` answer with the fallback. `0.0` disables the check.
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Top label for `text`, with no confidence threshold.
    pub fn classify(&self, text: &str) -> Result<String, ClassifierError> {
        Ok(self.classify_scored(text)?.label)
    }

    /// Top label for `text` together with its probability.
    pub fn classify_scored(&self, text: &str) -> Result<Prediction, ClassifierError> {
        let features = self.encoder.transform(text);
        let prediction = self.classifier.predict(&features)?;
        debug!(
            text,
            label = %prediction.label,
            confidence = prediction.confidence,
            "Classified input"
        );
        Ok(prediction)
    }

    /// Response for `label`, or the fallback sentence when the table has no entry.
    pub fn respond(&self, label: &str) -> &str {
        self.responses.lookup(label).unwrap_or(FALLBACK_RESPONSE)
    }

    /// Classifies `text` and picks the response, applying the confidence threshold.
    pub fn reply(&self, text: &str) -> Result<Reply, ClassifierError> {
        let Prediction { label, confidence } = self.classify_scored(text)?;
        let response = if confidence < self.min_confidence {
            FALLBACK_RESPONSE
        } else {
            self.respond(&label)
        };

        Ok(Reply {
            fallback: response == FALLBACK_RESPONSE,
            response: response.to_string(),
            label,
            confidence,
        })
    }

    /// Persists `(text, response)`, appends it to the training set and retrains.
    ///
    /// `response` is not checked against the known intents: it becomes a new
    /// label of the classifier. This mixes intents and raw replies in a single
    /// label space.
    ///
    /// A blank `response` is rejected before anything is stored.
    pub async fn teach(&mut self, text: &str, response: &str) -> Result<(), AppError> {
        if response.trim().is_empty() {
            return Err(AppError::Validation(
                "taught response must not be empty".to_string(),
            ));
        }

        if let Some(store) = &self.store {
            let record = store.insert(text, response).await?;
            debug!(id = record.id, "Persisted taught example");
        }

        self.learn(Example::new(text, response));
        self.retrain()?;
        info!(
            examples = self.training_set.len(),
            labels = self.classifier.labels().len(),
            "Learned new response"
        );
        Ok(())
    }

    /// Refits encoder and classifier on the full training set.
    pub fn retrain(&mut self) -> Result<(), AppError> {
        let (encoder, classifier) = fit_model(&self.training_set, &self.params)?;
        debug!(
            examples = self.training_set.len(),
            iterations = classifier.iterations(),
            "Retrained classifier"
        );
        self.encoder = encoder;
        self.classifier = classifier;
        Ok(())
    }

    /// Replays every record of the attached store into the training set and retrains once.
    ///
    /// Returns the number of replayed records.
    pub async fn restore(&mut self) -> Result<usize, AppError> {
        let Some(store) = self.store.clone() else {
            return Ok(0);
        };

        let mut restored = 0;
        for record in store.all().await? {
            if record.value.trim().is_empty() {
                warn!(id = record.id, "Skipping stored record with an empty response");
                continue;
            }
            self.learn(record.into());
            restored += 1;
        }

        if restored > 0 {
            self.retrain()?;
        }
        info!(restored, "Restored taught examples from store");
        Ok(restored)
    }

    pub fn training_set(&self) -> &TrainingSet {
        &self.training_set
    }

    /// Labels the classifier can currently predict, sorted.
    pub fn labels(&self) -> &[String] {
        self.classifier.labels()
    }

    fn learn(&mut self, example: Example) {
        self.responses.register_taught(&example.label);
        self.training_set.push(example);
    }
}

/// Fits a fresh encoder and classifier on `training_set`.
pub(crate) fn fit_model(
    training_set: &TrainingSet,
    params: &TrainingParams,
) -> Result<(CountEncoder, LinearClassifier), ClassifierError> {
    if training_set.is_empty() {
        return Err(ClassifierError::EmptyTrainingSet);
    }
    let encoder = CountEncoder::fit(training_set.texts())?;
    let features = encoder.transform_all(training_set.texts());
    let classifier = LinearClassifier::fit(&features, &training_set.labels(), params)?;
    Ok((encoder, classifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_table_keeps_canned_entries() {
        let mut table = ResponseTable::default();
        assert_eq!(table.len(), 6);

        table.register_taught("greeting");
        assert_eq!(table.lookup("greeting"), Some(Intent::Greeting.response()));

        table.register_taught("Blue");
        assert_eq!(table.lookup("Blue"), Some("Blue"));
        assert_eq!(table.len(), 7);
    }

    #[test]
    fn test_respond_unknown_label_falls_back() {
        let responder = IntentResponder::new(TrainingParams::default()).unwrap();
        assert_eq!(responder.respond("weather"), FALLBACK_RESPONSE);
        assert_eq!(responder.respond("joke"), Intent::Joke.response());
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let params = TrainingParams {
            learning_rate: 0.0,
            ..TrainingParams::default()
        };
        assert!(matches!(
            IntentResponder::new(params),
            Err(AppError::Validation(_))
        ));
    }
}
