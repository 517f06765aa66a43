// Intent Responder CLI entry point

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use intent_responder::brain::{holdout_accuracy, IntentResponder, TrainingSet};
use intent_responder::chat::{run_session, Conversation};
use intent_responder::config::{AppConfig, CliArgs};
use intent_responder::database::SqliteRecordStore;
use intent_responder::fs_manager::PortablePathManager;
use intent_responder::logging::init_tracing;
use intent_responder::speech::{HttpTranscriber, SpeechInput};
use tokio::io::BufReader;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args = CliArgs::parse();
    init_tracing(args.log_format, args.log_level());

    let config = AppConfig::try_from(args).context("invalid configuration")?;

    let session_id = Uuid::new_v4();
    run(config)
        .instrument(tracing::info_span!("session", %session_id))
        .await
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    if let Some((ratio, seed)) = config.holdout {
        let report = holdout_accuracy(
            &TrainingSet::seeded(),
            ratio,
            seed,
            &config.training,
        )?;
        info!(
            "Holdout accuracy {:.2} ({}/{})",
            report.accuracy, report.correct, report.test_size
        );
    }

    let mut responder = IntentResponder::new(config.training.clone())?
        .with_min_confidence(config.min_confidence);

    if let Some(db_path) = &config.database {
        PortablePathManager::ensure_parent(db_path)?;
        let store = SqliteRecordStore::open(db_path)
            .await
            .with_context(|| format!("failed to open database {}", db_path.display()))?;
        responder = responder.with_store(Arc::new(store));

        if config.replay_taught {
            responder.restore().await?;
        }
    } else {
        warn!("Persistence disabled; taught responses are kept for this session only");
    }

    let speech = match &config.speech {
        Some(speech) => {
            let transcriber = HttpTranscriber::new(
                speech.endpoint.clone(),
                speech.api_key.clone(),
                speech.language.clone(),
                speech.timeout,
            )?;
            Some(SpeechInput::new(Arc::new(transcriber)))
        }
        None => None,
    };

    let mut conversation = Conversation::new(responder);
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    run_session(&mut conversation, stdin, stdout, speech.as_ref()).await?;

    Ok(())
}
