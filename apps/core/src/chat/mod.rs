//! # Chat Module
//!
//! The conversation state machine and the console loop that drives it.

pub mod conversation;
pub mod session;

pub use conversation::{Conversation, ConversationState};
pub use session::{run_session, SessionSummary};
