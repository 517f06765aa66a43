//! Intent Responder
//!
//! A command-line assistant that classifies utterances into a small set of
//! intents with a linear text classifier, answers with a canned response per
//! intent and learns new replies from its users.

pub mod brain;
pub mod chat;
pub mod config;
pub mod database;
pub mod error;
pub mod fs_manager;
pub mod logging;
pub mod models;
pub mod speech;

#[cfg(test)]
mod tests;

pub use error::AppError;
