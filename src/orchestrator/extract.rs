//! Reply extraction from a thread transcript

use crate::assistant::{Role, TranscriptEntry};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Why an entry's content could not be read as text
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("malformed content block: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("text block carries no text")]
    MissingText,
}

#[derive(Debug, Deserialize)]
struct Block {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<TextPayload>,
}

/// Text is either annotated (`{"value": ..}`) or a bare string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextPayload {
    Annotated { value: String },
    Plain(String),
}

/// Pick the reply from a newest-first transcript.
///
/// Returns the trimmed text of the first assistant entry that carries any.
/// User entries are ignored and entries whose content cannot be read are
/// skipped, so one malformed message never hides a good one further down.
pub fn extract_reply(transcript: &[TranscriptEntry]) -> Option<String> {
    transcript
        .iter()
        .filter(|entry| entry.role == Role::Assistant)
        .find_map(|entry| match entry_text(entry) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    entry_id = %entry.id,
                    run_id = ?entry.run_id,
                    error = %e,
                    "Skipping assistant entry with unreadable content"
                );
                None
            }
        })
}

/// All text blocks of an entry joined by blank lines; non-text blocks
/// (images, file references) are ignored.
fn entry_text(entry: &TranscriptEntry) -> Result<Option<String>, ContentError> {
    let mut parts = Vec::new();
    for block in &entry.content {
        if let Some(text) = block_text(block)? {
            parts.push(text);
        }
    }

    let joined = parts.join("\n\n");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

fn block_text(block: &Value) -> Result<Option<String>, ContentError> {
    let block = Block::deserialize(block)?;
    if block.kind != "text" {
        return Ok(None);
    }
    match block.text {
        Some(TextPayload::Annotated { value } | TextPayload::Plain(value)) => Ok(Some(value)),
        None => Err(ContentError::MissingText),
    }
}
