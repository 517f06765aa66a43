//! Test Module
//!
//! Test suite for the intent responder.
//!
//! ## Test Categories
//! - `brain_tests`: Classification, fallback and teaching behaviour of the responder
//! - `database_tests`: `user_data` store and restore-on-startup
//! - `session_tests`: Console loop driven from in-memory input
//! - `speech_tests`: Speech-to-text client against a mocked service
//! - `config_tests`: CLI / environment configuration
//! - `integration_tests`: Full teach-and-remember workflow across sessions

pub mod brain_tests;
pub mod integration_tests;
