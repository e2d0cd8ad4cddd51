//! Core types: NoteItem, NoteBlock, NoteId (ULID), voice metadata

mod block;
mod note_id;
mod note_item;

pub use block::{BlockId, BlockKind, BlockPayload, NoteBlock, VoiceMeta};
pub use note_id::{NoteId, ParseNoteIdError};
pub use note_item::{BlockSeqError, NoteItem, ParseNoteItemError};
