//! Speech-to-text input.
//!
//! Audio clips are sent to a Google Speech-to-Text compatible `speech:recognize`
//! endpoint. Failures never reach the chat loop: [`SpeechInput::listen`] turns
//! them into a fixed sentence that is used in place of the transcription.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_SPEECH_ENDPOINT: &str = "https://speech.googleapis.com/v1/speech:recognize";

/// Returned when the audio could not be turned into words.
pub const UNINTELLIGIBLE_MESSAGE: &str = "Sorry, I did not understand that.";

/// Returned when the speech service could not be reached or refused the request.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "Could not request results from Google Speech Recognition service.";

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech was unintelligible")]
    Unintelligible,
    #[error("speech service request failed: {0}")]
    Request(String),
    #[error("could not read audio clip: {0}")]
    Audio(#[from] std::io::Error),
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        SpeechError::Request(err.to_string())
    }
}

impl SpeechError {
    /// The sentence shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            SpeechError::Unintelligible | SpeechError::Audio(_) => UNINTELLIGIBLE_MESSAGE,
            SpeechError::Request(_) => SERVICE_UNAVAILABLE_MESSAGE,
        }
    }
}

/// Turns recorded audio into text.
#[async_trait]
pub trait Transcriber: Send + Sync + 'static {
    async fn transcribe(&self, audio: &[u8]) -> Result<String, SpeechError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    language_code: String,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Serialize)]
struct RecognizeRequest {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognitionAlternative {
    #[serde(default)]
    transcript: String,
}

/// [`Transcriber`] calling a remote `speech:recognize` endpoint.
pub struct HttpTranscriber {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    language: String,
}

impl HttpTranscriber {
    pub fn new(
        endpoint: Url,
        api_key: Option<String>,
        language: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SpeechError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            language: language.into(),
        })
    }

    fn request_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        url
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<String, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::Unintelligible);
        }

        let body = RecognizeRequest {
            config: RecognitionConfig {
                language_code: self.language.clone(),
            },
            audio: RecognitionAudio {
                content: STANDARD.encode(audio),
            },
        };

        let response = self
            .client
            .post(self.request_url())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let parsed: RecognizeResponse = response.json().await?;

        parsed
            .results
            .into_iter()
            .flat_map(|result| result.alternatives)
            .map(|alternative| alternative.transcript.trim().to_string())
            .find(|transcript| !transcript.is_empty())
            .ok_or(SpeechError::Unintelligible)
    }
}

/// Reads audio clips from disk and transcribes them.
#[derive(Clone)]
pub struct SpeechInput {
    transcriber: Arc<dyn Transcriber>,
}

impl SpeechInput {
    pub fn new(transcriber: Arc<dyn Transcriber>) -> Self {
        Self { transcriber }
    }

    /// Transcribes `audio`, substituting the fixed error sentence on failure.
    pub async fn recognize(&self, audio: &[u8]) -> String {
        match self.transcriber.transcribe(audio).await {
            Ok(text) => {
                debug!(text = %text, "Recognized speech");
                text
            }
            Err(e) => {
                warn!("Speech recognition failed: {}", e);
                e.user_message().to_string()
            }
        }
    }

    /// Transcribes the clip stored at `clip`. Never fails.
    pub async fn listen(&self, clip: &Path) -> String {
        match tokio::fs::read(clip).await {
            Ok(audio) => self.recognize(&audio).await,
            Err(e) => {
                let err = SpeechError::from(e);
                warn!("Failed to read audio clip {}: {}", clip.display(), err);
                err.user_message().to_string()
            }
        }
    }
}
