//! Property-based tests for reply extraction
//!
//! - User-authored entries never become the reply
//! - Unreadable assistant entries never abort extraction
//! - The reply is the trimmed text of the first readable assistant entry

use super::extract::extract_reply;
use crate::assistant::{Role, TranscriptEntry};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Text with at least one visible character, padded with whitespace
fn arb_reply_text() -> impl Strategy<Value = String> {
    ("[ \n\t]{0,3}", "[a-zA-Z0-9_.!?,][a-zA-Z0-9 _.!?,]{0,60}", "[ \n\t]{0,3}")
        .prop_map(|(lead, body, trail)| format!("{lead}{body}{trail}"))
}

/// Content block that cannot be read as text
fn arb_malformed_block() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!({ "type": "text" })),
        Just(json!({ "type": "text", "text": 17 })),
        Just(json!({ "type": "text", "text": { "annotations": [] } })),
        Just(json!({ "kind": "text", "text": "no type tag" })),
        Just(json!("bare string")),
        Just(Value::Null),
    ]
}

/// Entry that must be skipped by extraction
fn arb_noise_entry() -> impl Strategy<Value = TranscriptEntry> {
    prop_oneof![
        arb_reply_text().prop_map(|text| TranscriptEntry::text("user", Role::User, text)),
        arb_reply_text().prop_map(|text| TranscriptEntry::text("other", Role::Other, text)),
        proptest::collection::vec(arb_malformed_block(), 1..3).prop_map(|content| {
            TranscriptEntry {
                id: "broken".to_string(),
                role: Role::Assistant,
                run_id: None,
                content,
            }
        }),
        Just(TranscriptEntry {
            id: "image".to_string(),
            role: Role::Assistant,
            run_id: None,
            content: vec![json!({ "type": "image_file", "image_file": { "file_id": "f" } })],
        }),
    ]
}

proptest! {
    #[test]
    fn prop_valid_entry_found_among_noise(
        before in proptest::collection::vec(arb_noise_entry(), 0..6),
        after in proptest::collection::vec(arb_noise_entry(), 0..6),
        reply in arb_reply_text(),
    ) {
        let mut transcript = before;
        transcript.push(TranscriptEntry::text("reply", Role::Assistant, reply.clone()));
        transcript.extend(after);

        prop_assert_eq!(extract_reply(&transcript), Some(reply.trim().to_string()));
    }

    #[test]
    fn prop_noise_only_yields_nothing(
        transcript in proptest::collection::vec(arb_noise_entry(), 0..8),
    ) {
        prop_assert_eq!(extract_reply(&transcript), None);
    }

    #[test]
    fn prop_first_of_several_replies_wins(
        first in arb_reply_text(),
        second in arb_reply_text(),
    ) {
        let transcript = vec![
            TranscriptEntry::text("newer", Role::Assistant, first.clone()),
            TranscriptEntry::text("older", Role::Assistant, second),
        ];
        prop_assert_eq!(extract_reply(&transcript), Some(first.trim().to_string()));
    }
}
