//! Note content blocks: text runs and voice-recording references.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Identity of a block within its parent note.
///
/// Block ids are allocated by the owning [`NoteItem`](crate::domain::NoteItem)
/// and are stable for the lifetime of the in-memory note. They are not
/// persisted; the database stores blocks by sequence position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BlockId(u64);

impl BlockId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// The kind of content a block holds.
///
/// A block's kind is immutable after creation; only payload fields change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockKind {
    Text,
    Voice,
}

/// Metadata for a voice recording.
///
/// The recording file itself lives on disk and is referenced, not owned;
/// a missing file is detected lazily by the editing surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceMeta {
    /// Filesystem path of the recording.
    pub voice_path: PathBuf,
    /// Size of the recording in bytes.
    pub voice_size: u64,
    /// When the recording was made.
    pub create_time: DateTime<Utc>,
    /// Display title, unique among voice blocks of the same note.
    pub voice_title: String,
}

impl VoiceMeta {
    fn empty() -> Self {
        Self {
            voice_path: PathBuf::new(),
            voice_size: 0,
            create_time: Utc::now(),
            voice_title: String::new(),
        }
    }
}

/// Payload of a block, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BlockPayload {
    Text(String),
    Voice(VoiceMeta),
}

/// An atomic unit of note content: a text run or a voice recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteBlock {
    id: BlockId,
    payload: BlockPayload,
}

impl NoteBlock {
    /// Creates a detached block of the given kind with an empty payload.
    pub(crate) fn new(id: BlockId, kind: BlockKind) -> Self {
        let payload = match kind {
            BlockKind::Text => BlockPayload::Text(String::new()),
            BlockKind::Voice => BlockPayload::Voice(VoiceMeta::empty()),
        };
        Self { id, payload }
    }

    /// Returns the block's identity.
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Returns the block's kind.
    pub fn kind(&self) -> BlockKind {
        match self.payload {
            BlockPayload::Text(_) => BlockKind::Text,
            BlockPayload::Voice(_) => BlockKind::Voice,
        }
    }

    /// Returns the text payload, if this is a text block.
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            BlockPayload::Text(s) => Some(s),
            BlockPayload::Voice(_) => None,
        }
    }

    /// Replaces the text payload. No-op on voice blocks.
    pub fn set_text(&mut self, text: impl Into<String>) {
        if let BlockPayload::Text(s) = &mut self.payload {
            *s = text.into();
        }
    }

    /// Returns the voice metadata, if this is a voice block.
    pub fn voice(&self) -> Option<&VoiceMeta> {
        match &self.payload {
            BlockPayload::Voice(v) => Some(v),
            BlockPayload::Text(_) => None,
        }
    }

    /// Returns mutable voice metadata, if this is a voice block.
    pub fn voice_mut(&mut self) -> Option<&mut VoiceMeta> {
        match &mut self.payload {
            BlockPayload::Voice(v) => Some(v),
            BlockPayload::Text(_) => None,
        }
    }

    /// Returns the voice recording path, if this is a voice block.
    pub fn voice_path(&self) -> Option<&Path> {
        self.voice().map(|v| v.voice_path.as_path())
    }

    /// True for a text block with an empty payload.
    pub fn is_empty_text(&self) -> bool {
        matches!(&self.payload, BlockPayload::Text(s) if s.is_empty())
    }
}
