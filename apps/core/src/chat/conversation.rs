//! Conversation state machine around the [`IntentResponder`].
//!
//! ```text
//! Idle --input--> Listening --classify+respond--> Classified
//! Classified --fallback--> AwaitingTeach --"yes"--> AwaitingCorrection --text/teach--> Idle
//!                                                  AwaitingCorrection --blank--> Idle
//! Classified --otherwise--> Idle          AwaitingTeach --other--> Idle
//! Idle --"exit"/"quit"--> Terminated
//! ```

use tracing::{debug, info};

use crate::brain::responder::IntentResponder;
use crate::error::AppError;

pub const BANNER: &str = "Hello! I'm your AI assistant. Type 'exit' to end our chat.";
pub const USER_PROMPT: &str = "You: ";
pub const TEACH_PROMPT: &str = "Would you like to teach me how to respond to that? (yes/no) ";
pub const CORRECTION_PROMPT: &str = "What should I respond? ";

const EXIT_COMMANDS: [&str; 2] = ["exit", "quit"];

/// True for `exit` / `quit`, ignoring case and surrounding whitespace.
pub fn is_exit_command(line: &str) -> bool {
    let command = line.trim().to_lowercase();
    EXIT_COMMANDS.contains(&command.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationState {
    /// Waiting for the next utterance.
    Idle,
    /// An utterance was received and is being classified.
    Listening { input: String },
    /// A response was chosen for `input`.
    Classified { input: String, fallback: bool },
    /// The fallback fired; asking whether to teach a reply for `input`.
    AwaitingTeach { input: String },
    /// Waiting for the reply to teach for `input`.
    AwaitingCorrection { input: String },
    /// `exit` or `quit` was entered.
    Terminated,
}

pub struct Conversation {
    responder: IntentResponder,
    state: ConversationState,
}

impl Conversation {
    pub fn new(responder: IntentResponder) -> Self {
        Self {
            responder,
            state: ConversationState::Idle,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn responder(&self) -> &IntentResponder {
        &self.responder
    }

    pub fn is_terminated(&self) -> bool {
        self.state == ConversationState::Terminated
    }

    /// True while the next line should be an utterance rather than an answer to a prompt.
    pub fn expects_utterance(&self) -> bool {
        self.state == ConversationState::Idle
    }

    /// Prompt to show before reading the next line. `None` once terminated.
    pub fn prompt(&self) -> Option<&'static str> {
        match self.state {
            ConversationState::AwaitingTeach { .. } => Some(TEACH_PROMPT),
            ConversationState::AwaitingCorrection { .. } => Some(CORRECTION_PROMPT),
            ConversationState::Terminated => None,
            _ => Some(USER_PROMPT),
        }
    }

    /// Feeds one line of input. Returns the assistant's reply, if any.
    pub async fn handle(&mut self, line: &str) -> Result<Option<String>, AppError> {
        let state = std::mem::replace(&mut self.state, ConversationState::Idle);
        match state {
            ConversationState::Idle
            | ConversationState::Listening { .. }
            | ConversationState::Classified { .. } => self.handle_utterance(line),
            ConversationState::AwaitingTeach { input } => {
                if line.trim().eq_ignore_ascii_case("yes") {
                    self.transition(ConversationState::AwaitingCorrection { input });
                } else {
                    self.transition(ConversationState::Idle);
                }
                Ok(None)
            }
            ConversationState::AwaitingCorrection { input } => {
                // A blank answer declines to teach.
                if line.trim().is_empty() {
                    debug!(input = %input, "Empty correction, nothing taught");
                } else {
                    self.responder.teach(&input, line).await?;
                    info!(input = %input, "Taught a new response");
                }
                self.transition(ConversationState::Idle);
                Ok(None)
            }
            ConversationState::Terminated => {
                self.state = ConversationState::Terminated;
                Ok(None)
            }
        }
    }

    fn handle_utterance(&mut self, line: &str) -> Result<Option<String>, AppError> {
        if is_exit_command(line) {
            self.transition(ConversationState::Terminated);
            return Ok(None);
        }

        self.transition(ConversationState::Listening {
            input: line.to_string(),
        });
        let reply = self.responder.reply(line)?;
        self.transition(ConversationState::Classified {
            input: line.to_string(),
            fallback: reply.fallback,
        });

        if reply.fallback {
            self.transition(ConversationState::AwaitingTeach {
                input: line.to_string(),
            });
        } else {
            self.transition(ConversationState::Idle);
        }

        Ok(Some(reply.response))
    }

    fn transition(&mut self, next: ConversationState) {
        debug!(from = ?self.state, to = ?next, "Conversation transition");
        self.state = next;
    }
}
