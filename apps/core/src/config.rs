//! Command line arguments and the validated runtime configuration.
//!
//! Every option can also be set through an `ASSISTANT_*` environment
//! variable, optionally loaded from a `.env` file.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;
use validator::Validate;

use crate::brain::classifier::TrainingParams;
use crate::brain::evaluation::{DEFAULT_SPLIT_SEED, DEFAULT_TEST_RATIO};
use crate::error::AppError;
use crate::fs_manager::PortablePathManager;
use crate::speech::DEFAULT_SPEECH_ENDPOINT;

/// Where utterances come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputMode {
    /// Typed lines on standard input
    Text,
    /// Paths of recorded audio clips, transcribed by the speech service
    Speech,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Intent responder - a command-line assistant that learns new replies
#[derive(Parser, Debug, Clone)]
#[command(name = "intent-responder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A command-line assistant that classifies intents and learns new replies")]
pub struct CliArgs {
    /// SQLite database file (defaults to <data dir>/db/assistant_data.db)
    #[arg(long, env = "ASSISTANT_DB_PATH")]
    pub database: Option<PathBuf>,

    /// Do not persist taught examples
    #[arg(long, env = "ASSISTANT_NO_PERSIST")]
    pub no_persist: bool,

    /// Replay previously taught examples at startup
    #[arg(long, env = "ASSISTANT_REPLAY_TAUGHT", default_value_t = true, action = ArgAction::Set)]
    pub replay_taught: bool,

    /// Predictions below this probability answer with the fallback (0 disables)
    #[arg(long, env = "ASSISTANT_MIN_CONFIDENCE", default_value_t = 0.0)]
    pub min_confidence: f64,

    /// Inverse L2 regularisation strength of the classifier
    #[arg(long, env = "ASSISTANT_REGULARIZATION", default_value_t = 10.0)]
    pub regularization: f64,

    /// Maximum gradient descent iterations per fit
    #[arg(long, env = "ASSISTANT_MAX_ITERATIONS", default_value_t = 1000)]
    pub max_iterations: usize,

    /// Gradient descent step size
    #[arg(long, env = "ASSISTANT_LEARNING_RATE", default_value_t = 1.0)]
    pub learning_rate: f64,

    /// Log held-out accuracy of the seed model at startup
    #[arg(long)]
    pub holdout: bool,

    /// Fraction of examples held out by --holdout
    #[arg(long, default_value_t = DEFAULT_TEST_RATIO)]
    pub holdout_ratio: f64,

    /// Seed of the --holdout shuffle
    #[arg(long, default_value_t = DEFAULT_SPLIT_SEED)]
    pub holdout_seed: u64,

    /// Input mode
    #[arg(long, value_enum, env = "ASSISTANT_INPUT", default_value = "text")]
    pub input: InputMode,

    /// Speech-to-text endpoint
    #[arg(long, env = "ASSISTANT_SPEECH_ENDPOINT", default_value = DEFAULT_SPEECH_ENDPOINT)]
    pub speech_endpoint: String,

    /// API key sent to the speech endpoint
    #[arg(long, env = "ASSISTANT_SPEECH_API_KEY", hide_env_values = true)]
    pub speech_api_key: Option<String>,

    /// Language of the recorded speech
    #[arg(long, env = "ASSISTANT_SPEECH_LANGUAGE", default_value = "en-US")]
    pub speech_language: String,

    /// Speech request timeout in seconds
    #[arg(long, env = "ASSISTANT_SPEECH_TIMEOUT_SECS", default_value_t = 30)]
    pub speech_timeout_secs: u64,

    /// Log output format
    #[arg(long, value_enum, env = "ASSISTANT_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Default log level for the given flags.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Speech service settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechConfig {
    pub endpoint: Url,
    pub api_key: Option<String>,
    pub language: String,
    pub timeout: Duration,
}

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct AppConfig {
    /// `None` runs without persistence.
    pub database: Option<PathBuf>,
    pub replay_taught: bool,
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_confidence: f64,
    #[validate(nested)]
    pub training: TrainingParams,
    /// `Some((ratio, seed))` when the startup holdout check is enabled.
    pub holdout: Option<(f64, u64)>,
    /// Present only in speech mode.
    pub speech: Option<SpeechConfig>,
}

impl TryFrom<CliArgs> for AppConfig {
    type Error = AppError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let database = if args.no_persist {
            None
        } else {
            Some(args.database.unwrap_or_else(PortablePathManager::default_db_path))
        };

        if args.holdout && !(args.holdout_ratio > 0.0 && args.holdout_ratio < 1.0) {
            return Err(AppError::Config(format!(
                "holdout ratio must be between 0 and 1, got {}",
                args.holdout_ratio
            )));
        }

        let speech = match args.input {
            InputMode::Text => None,
            InputMode::Speech => Some(SpeechConfig {
                endpoint: Url::parse(&args.speech_endpoint)?,
                api_key: args.speech_api_key.filter(|key| !key.is_empty()),
                language: args.speech_language,
                timeout: Duration::from_secs(args.speech_timeout_secs),
            }),
        };

        let config = AppConfig {
            database,
            replay_taught: args.replay_taught,
            min_confidence: args.min_confidence,
            training: TrainingParams {
                regularization: args.regularization,
                max_iterations: args.max_iterations,
                learning_rate: args.learning_rate,
                ..TrainingParams::default()
            },
            holdout: args
                .holdout
                .then_some((args.holdout_ratio, args.holdout_seed)),
            speech,
        };
        config.validate()?;
        Ok(config)
    }
}
