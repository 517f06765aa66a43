//! Line-oriented console loop.

use std::path::Path;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::chat::conversation::{is_exit_command, Conversation, BANNER};
use crate::error::AppError;
use crate::speech::SpeechInput;

/// What happened during one [`run_session`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Replies written by the assistant.
    pub replies: usize,
    /// Examples taught during the session.
    pub taught: usize,
    /// True if the user typed `exit` or `quit` (false on end of input).
    pub exited: bool,
}

/// Drives `conversation` from `reader` until `exit`/`quit` or end of input.
///
/// With `speech`, every utterance line is the path of an audio clip that is
/// transcribed first. Answers to the teach prompts are always typed.
pub async fn run_session<R, W>(
    conversation: &mut Conversation,
    reader: R,
    mut writer: W,
    speech: Option<&SpeechInput>,
) -> Result<SessionSummary, AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut summary = SessionSummary::default();
    let initial_examples = conversation.responder().training_set().len();

    writer.write_all(format!("{}\n", BANNER).as_bytes()).await?;

    while let Some(prompt) = conversation.prompt() {
        writer.write_all(prompt.as_bytes()).await?;
        writer.flush().await?;

        let Some(line) = lines.next_line().await? else {
            debug!("End of input");
            break;
        };

        let line = match speech {
            Some(speech) if conversation.expects_utterance() && !is_exit_command(&line) => {
                writer.write_all(b"Listening...\n").await?;
                writer.flush().await?;
                let heard = speech.listen(Path::new(line.trim())).await;
                writer
                    .write_all(format!("You said: {}\n", heard).as_bytes())
                    .await?;
                heard
            }
            _ => line,
        };

        if let Some(reply) = conversation.handle(&line).await? {
            summary.replies += 1;
            writer
                .write_all(format!("Assistant: {}\n", reply).as_bytes())
                .await?;
        }
    }

    writer.flush().await?;
    summary.exited = conversation.is_terminated();
    summary.taught = conversation.responder().training_set().len() - initial_examples;
    info!(
        replies = summary.replies,
        taught = summary.taught,
        exited = summary.exited,
        "Session finished"
    );
    Ok(summary)
}
