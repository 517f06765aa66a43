//! Integration Tests
//!
//! Teach through one console session, then check that a fresh responder
//! restored from the same database remembers the replies.

use std::sync::Arc;

use crate::brain::{Intent, IntentResponder, TrainingParams};
use crate::chat::{run_session, Conversation};
use crate::database::{self, SqliteRecordStore};
use tempfile::tempdir;

#[tokio::test]
async fn test_taught_replies_survive_a_restart() {
    let dir = tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("data").join("db").join("assistant_data.db");
    crate::fs_manager::PortablePathManager::ensure_parent(&db_path).unwrap();

    // First run: every prediction falls back, so each input is taught.
    {
        let store = Arc::new(SqliteRecordStore::open(&db_path).await.unwrap());
        let responder = IntentResponder::new(TrainingParams::default())
            .unwrap()
            .with_store(store)
            .with_min_confidence(1.1);
        let mut conversation = Conversation::new(responder);

        let input = "xyz\nyes\ncustom\n\
                     what is the weather\nyes\nIt is sunny\n\
                     favourite colour\nyes\nBlue\n\
                     exit\n";
        let mut output = Vec::new();
        let summary = run_session(&mut conversation, input.as_bytes(), &mut output, None)
            .await
            .unwrap();
        assert_eq!(summary.taught, 3);
    }

    // Second run: restore from the database and answer without a threshold.
    let store = Arc::new(SqliteRecordStore::open(&db_path).await.unwrap());
    assert_eq!(database::count_records(store.pool()).await.unwrap(), 3);

    let mut responder = IntentResponder::new(TrainingParams::default())
        .unwrap()
        .with_store(store);
    assert_eq!(responder.restore().await.unwrap(), 3);

    let mut conversation = Conversation::new(responder);
    let input = "xyz\nwhat is the weather\nfavourite colour\nwhat is your name\nquit\n";
    let mut output = Vec::new();
    let summary = run_session(&mut conversation, input.as_bytes(), &mut output, None)
        .await
        .unwrap();
    let transcript = String::from_utf8(output).unwrap();

    assert_eq!(summary.replies, 4);
    assert_eq!(summary.taught, 0);
    for expected in [
        "Assistant: custom\n",
        "Assistant: It is sunny\n",
        "Assistant: Blue\n",
    ] {
        assert!(transcript.contains(expected), "missing '{}'", expected.trim());
    }
    assert!(transcript.contains(&format!(
        "Assistant: {}\n",
        Intent::PersonalQuestion.response()
    )));
}

#[tokio::test]
async fn test_session_without_store_learns_in_memory_only() {
    let responder = IntentResponder::new(TrainingParams::default())
        .unwrap()
        .with_min_confidence(1.1);
    let mut conversation = Conversation::new(responder);

    let mut output = Vec::new();
    run_session(
        &mut conversation,
        "xyz\nyes\ncustom\nexit\n".as_bytes(),
        &mut output,
        None,
    )
    .await
    .unwrap();

    let responder = conversation.responder();
    let label = responder.classify("xyz").unwrap();
    assert_eq!(responder.respond(&label), "custom");
}
