//! Brain Module Tests
//!
//! Tests for classification, response lookup and online learning of the
//! intent responder.

use crate::brain::intent::SEED_EXAMPLES;
use crate::error::AppError;
use crate::brain::{
    CountEncoder, Intent, IntentResponder, TrainingParams, TrainingSet, FALLBACK_RESPONSE,
};
use crate::models::Example;

fn responder() -> IntentResponder {
    IntentResponder::new(TrainingParams::default()).expect("Failed to train responder")
}

#[cfg(test)]
mod classification_tests {
    use super::*;

    #[test]
    fn test_seed_examples_get_their_canned_response() {
        let responder = responder();

        for (text, intent) in SEED_EXAMPLES {
            let label = responder.classify(text).expect("Failed to classify");
            assert_eq!(label, intent.label(), "Wrong label for '{}'", text);
            assert_eq!(
                responder.respond(&label),
                intent.response(),
                "Wrong response for '{}'",
                text
            );
        }
    }

    #[test]
    fn test_seed_examples_are_confident() {
        let responder = responder();

        for (text, _) in SEED_EXAMPLES {
            let reply = responder.reply(text).expect("Failed to reply");
            assert!(!reply.fallback, "Unexpected fallback for '{}'", text);
            assert!(
                reply.confidence > 0.5,
                "Expected confidence above 0.5 for '{}', got {}",
                text,
                reply.confidence
            );
        }
    }

    #[test]
    fn test_case_and_punctuation_are_ignored() {
        let responder = responder();
        assert_eq!(responder.classify("HELLO!!!").unwrap(), "greeting");
        assert_eq!(responder.classify("Tell me a joke, please").unwrap(), "joke");
    }

    #[test]
    fn test_out_of_vocabulary_input_still_gets_a_seed_label() {
        let responder = responder();

        // No threshold: the classifier always answers with one of its labels.
        let label = responder.classify("qwerty zzz").unwrap();
        assert!(responder.labels().contains(&label));
        assert!(label.parse::<Intent>().is_ok());
    }

    #[test]
    fn test_training_is_deterministic() {
        let first = responder();
        let second = responder();
        for text in ["hello there", "tell me something", "qwerty"] {
            assert_eq!(
                first.classify_scored(text).unwrap(),
                second.classify_scored(text).unwrap()
            );
        }
    }

    #[test]
    fn test_encoder_vocabulary_of_seed_set() {
        let set = TrainingSet::seeded();
        let encoder = CountEncoder::fit(set.texts()).unwrap();
        // "a" is too short to be a token.
        assert!(!encoder.contains("a"));
        assert!(encoder.contains("joke"));
        assert!(encoder.contains("intelligence"));
    }
}

#[cfg(test)]
mod fallback_tests {
    use super::*;

    #[test]
    fn test_unknown_label_yields_fallback() {
        let responder = responder();
        for label in ["", "weather", "Greeting", "custom"] {
            assert_eq!(responder.respond(label), FALLBACK_RESPONSE);
        }
    }

    #[test]
    fn test_confidence_threshold_forces_fallback() {
        let responder = responder().with_min_confidence(0.99);
        let reply = responder.reply("qwerty zzz").unwrap();
        assert!(reply.fallback);
        assert_eq!(reply.response, FALLBACK_RESPONSE);
    }

    #[test]
    fn test_zero_threshold_never_falls_back_on_seed_labels() {
        let responder = responder();
        let reply = responder.reply("qwerty zzz").unwrap();
        assert!(!reply.fallback);
        assert_ne!(reply.response, FALLBACK_RESPONSE);
    }

    #[test]
    fn test_taught_labels_in_training_set_answer_with_their_text() {
        let mut examples = TrainingSet::seeded().examples().to_vec();
        examples.push(Example::new("what is the weather", "It is sunny"));
        let responder = IntentResponder::from_training_set(
            TrainingSet::from_examples(examples),
            TrainingParams::default(),
        )
        .unwrap();

        let label = responder.classify("what is the weather").unwrap();
        assert_eq!(label, "It is sunny");
        assert_eq!(responder.respond(&label), "It is sunny");
    }
}

#[cfg(test)]
mod teaching_tests {
    use super::*;

    #[tokio::test]
    async fn test_taught_response_is_returned() {
        let mut responder = responder();
        responder
            .teach("xyz", "custom")
            .await
            .expect("Failed to teach");

        let label = responder.classify("xyz").unwrap();
        assert_eq!(responder.respond(&label), "custom");
    }

    #[tokio::test]
    async fn test_label_space_grows_with_taught_responses() {
        let mut responder = responder();
        assert_eq!(responder.labels().len(), 6);

        responder.teach("xyz", "custom").await.unwrap();
        assert_eq!(responder.labels().len(), 7);
        assert!(responder.labels().iter().any(|l| l == "custom"));
        assert_eq!(responder.training_set().len(), 11);
        assert_eq!(
            responder.training_set().examples().last(),
            Some(&Example::new("xyz", "custom"))
        );
    }

    #[tokio::test]
    async fn test_several_taught_responses_coexist_with_seeds() {
        let mut responder = responder();
        responder.teach("xyz", "custom").await.unwrap();
        responder
            .teach("what is the weather", "It is sunny")
            .await
            .unwrap();
        responder.teach("favourite colour", "Blue").await.unwrap();

        let cases = [
            ("xyz", "custom"),
            ("what is the weather", "It is sunny"),
            ("favourite colour", "Blue"),
            ("what is your name", Intent::PersonalQuestion.response()),
        ];
        for (text, expected) in cases {
            let label = responder.classify(text).unwrap();
            assert_eq!(responder.respond(&label), expected, "for '{}'", text);
        }
    }

    #[tokio::test]
    async fn test_teaching_an_intent_label_keeps_canned_response() {
        let mut responder = responder();
        responder.teach("howdy partner", "greeting").await.unwrap();

        assert_eq!(responder.labels().len(), 6);
        let label = responder.classify("howdy partner").unwrap();
        assert_eq!(label, "greeting");
        assert_eq!(responder.respond(&label), Intent::Greeting.response());
    }

    #[tokio::test]
    async fn test_blank_response_is_not_learned() {
        let mut responder = responder();

        for blank in ["", "   ", "\t"] {
            let result = responder.teach("banana split", blank).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }

        assert_eq!(responder.training_set().len(), 10);
        assert_eq!(responder.labels().len(), 6);
        let label = responder.classify("banana split").unwrap();
        assert!(!responder.respond(&label).is_empty());
        assert_eq!(responder.respond(""), FALLBACK_RESPONSE);
    }

    #[test]
    fn test_retrain_without_changes_keeps_predictions() {
        let mut responder = responder();
        let before = responder.classify_scored("see you").unwrap();
        responder.retrain().unwrap();
        assert_eq!(responder.classify_scored("see you").unwrap(), before);
    }
}
