//! Output format types for CLI commands.

use crate::domain::{BlockKind, NoteItem};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A single block in note detail output.
#[derive(Debug, Serialize)]
pub struct BlockListing {
    pub position: usize,
    pub kind: BlockKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_size: Option<u64>,
}

/// Full note detail for `show` output.
#[derive(Debug, Serialize)]
pub struct NoteDetail {
    pub id: String,
    pub title: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub blocks: Vec<BlockListing>,
}

impl NoteDetail {
    pub fn from_note(note: &NoteItem) -> Self {
        let blocks = note
            .blocks()
            .iter()
            .enumerate()
            .map(|(i, block)| BlockListing {
                position: i + 1,
                kind: block.kind(),
                text: block.text().map(|t| t.to_string()),
                voice_title: block.voice().map(|v| v.voice_title.clone()),
                voice_path: block
                    .voice()
                    .map(|v| v.voice_path.to_string_lossy().to_string()),
                voice_size: block.voice().map(|v| v.voice_size),
            })
            .collect();

        Self {
            id: note.id().to_string(),
            title: note.title().to_string(),
            created: note.created(),
            modified: note.modified(),
            blocks,
        }
    }
}
