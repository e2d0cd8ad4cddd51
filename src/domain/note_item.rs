//! NoteItem: one note's ordered sequence of content blocks.

use crate::domain::{BlockId, BlockKind, NoteBlock, NoteId};
use chrono::{DateTime, Utc};
use std::fmt;

/// The kind of error that occurred when mutating a block sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockSeqErrorKind {
    DuplicateBlock,
    AnchorNotFound,
    BlockNotFound,
}

/// Error returned by invalid block-sequence mutations.
#[derive(Debug, Clone)]
pub struct BlockSeqError {
    kind: BlockSeqErrorKind,
    id: BlockId,
}

impl fmt::Display for BlockSeqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BlockSeqErrorKind::DuplicateBlock => {
                write!(f, "block {} is already in the sequence", self.id.value())
            }
            BlockSeqErrorKind::AnchorNotFound => {
                write!(f, "anchor block {} is not in the sequence", self.id.value())
            }
            BlockSeqErrorKind::BlockNotFound => {
                write!(f, "block {} is not in the sequence", self.id.value())
            }
        }
    }
}

impl std::error::Error for BlockSeqError {}

/// A note: metadata plus an ordered sequence of text/voice blocks.
///
/// Insertion order is display order is persistence order. Blocks are
/// exclusively owned by the note; deleting one removes it from the
/// sequence and returns it to the caller.
///
/// # Examples
///
/// ```
/// use vnote::domain::{BlockKind, NoteId, NoteItem};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let mut note = NoteItem::new(NoteId::new(), "Shopping", now, now).unwrap();
/// let mut block = note.new_block(BlockKind::Text);
/// block.set_text("milk");
/// note.push_block(block).unwrap();
/// assert_eq!(note.block_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NoteItem {
    id: NoteId,
    title: String,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
    next_block_id: u64,
    blocks: Vec<NoteBlock>,
}

impl NoteItem {
    /// Creates an empty note.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is empty or whitespace-only.
    pub fn new(
        id: NoteId,
        title: impl Into<String>,
        created: DateTime<Utc>,
        modified: DateTime<Utc>,
    ) -> Result<Self, ParseNoteItemError> {
        let title = title.into();
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(ParseNoteItemError);
        }

        Ok(Self {
            id,
            title: trimmed.to_string(),
            created,
            modified,
            next_block_id: 0,
            blocks: Vec::new(),
        })
    }

    /// Returns the note's unique identifier.
    pub fn id(&self) -> &NoteId {
        &self.id
    }

    /// Returns the note's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns when the note was created.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Returns when the note was last modified.
    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// Updates the modification timestamp.
    pub fn touch(&mut self, when: DateTime<Utc>) {
        self.modified = when;
    }

    // ===========================================
    // Block Sequence
    // ===========================================

    /// Returns the blocks in display order.
    pub fn blocks(&self) -> &[NoteBlock] {
        &self.blocks
    }

    /// Returns the number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the block with the given id, if present.
    pub fn block(&self, id: BlockId) -> Option<&NoteBlock> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    /// Returns the block with the given id mutably, if present.
    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut NoteBlock> {
        self.blocks.iter_mut().find(|b| b.id() == id)
    }

    /// Returns the position of a block in the sequence.
    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    /// Allocates a detached block of the given kind.
    ///
    /// The block is not part of the sequence until passed to
    /// [`add_block`](Self::add_block) or [`push_block`](Self::push_block).
    pub fn new_block(&mut self, kind: BlockKind) -> NoteBlock {
        let id = BlockId::new(self.next_block_id);
        self.next_block_id += 1;
        NoteBlock::new(id, kind)
    }

    /// Inserts `block` immediately after `after`, or at the head when
    /// `after` is `None`.
    ///
    /// # Errors
    ///
    /// Fails if the block is already in the sequence or the anchor is not.
    pub fn add_block(
        &mut self,
        after: Option<BlockId>,
        block: NoteBlock,
    ) -> Result<(), BlockSeqError> {
        if self.position(block.id()).is_some() {
            return Err(BlockSeqError {
                kind: BlockSeqErrorKind::DuplicateBlock,
                id: block.id(),
            });
        }

        let index = match after {
            None => 0,
            Some(anchor) => {
                self.position(anchor).ok_or(BlockSeqError {
                    kind: BlockSeqErrorKind::AnchorNotFound,
                    id: anchor,
                })? + 1
            }
        };

        self.blocks.insert(index, block);
        Ok(())
    }

    /// Appends `block` at the end of the sequence.
    ///
    /// # Errors
    ///
    /// Fails if the block is already in the sequence.
    pub fn push_block(&mut self, block: NoteBlock) -> Result<(), BlockSeqError> {
        if self.position(block.id()).is_some() {
            return Err(BlockSeqError {
                kind: BlockSeqErrorKind::DuplicateBlock,
                id: block.id(),
            });
        }
        self.blocks.push(block);
        Ok(())
    }

    /// Removes the block with the given id and returns it.
    ///
    /// # Errors
    ///
    /// Fails if no block with that id is in the sequence.
    pub fn del_block(&mut self, id: BlockId) -> Result<NoteBlock, BlockSeqError> {
        match self.position(id) {
            Some(index) => Ok(self.blocks.remove(index)),
            None => Err(BlockSeqError {
                kind: BlockSeqErrorKind::BlockNotFound,
                id,
            }),
        }
    }

    // ===========================================
    // Voice Blocks
    // ===========================================

    /// Returns the titles of all voice blocks, in display order.
    pub fn voice_titles(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|b| b.voice().map(|v| v.voice_title.as_str()))
            .collect()
    }

    /// Returns the number of voice blocks.
    pub fn voice_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.kind() == BlockKind::Voice)
            .count()
    }
}

/// Error returned when constructing an invalid note.
#[derive(Debug, Clone)]
pub struct ParseNoteItemError;

impl fmt::Display for ParseNoteItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid note: title cannot be empty")
    }
}

impl std::error::Error for ParseNoteItemError {}
