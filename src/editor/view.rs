//! Headless editing surface over one note's block sequence.
//!
//! Mirrors the block sequence 1:1 with presentation rows keyed by block
//! identity, tracks a single focused row plus a cursor offset, and owns
//! the dirty-flag save policy. The host GUI supplies only row heights,
//! the viewport height, text-change and focus events.

use crate::domain::{BlockId, BlockKind, NoteItem};
use crate::editor::ScrollState;
use crate::store::{DbManager, NoteOper};
use chrono::Utc;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Height assigned to a freshly inserted row until the host reports a
/// measured one.
const DEFAULT_ROW_HEIGHT: i64 = 24;

/// Outcome of an action that needs a voice block's backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceAccess {
    /// The recording exists; the action proceeded.
    Available,
    /// The backing file is gone. The block has been deleted and the
    /// host should warn the user once.
    Missing,
}

/// Presentation record mirroring one block.
#[derive(Debug, Clone)]
struct Row {
    block: BlockId,
    kind: BlockKind,
    /// Live edit buffer for text rows, flushed into the block payload
    /// on focus-out and save.
    buffer: String,
    height: i64,
    playing: bool,
}

impl Row {
    fn text(block: BlockId, buffer: impl Into<String>) -> Self {
        Self {
            block,
            kind: BlockKind::Text,
            buffer: buffer.into(),
            height: DEFAULT_ROW_HEIGHT,
            playing: false,
        }
    }

    fn voice(block: BlockId) -> Self {
        Self {
            block,
            kind: BlockKind::Voice,
            buffer: String::new(),
            height: DEFAULT_ROW_HEIGHT,
            playing: false,
        }
    }
}

/// The note editing surface.
pub struct EditorView {
    note: NoteItem,
    rows: Vec<Row>,
    current: Option<BlockId>,
    cursor: usize,
    dirty: bool,
    scroll: ScrollState,
}

impl EditorView {
    /// Opens a note for editing.
    ///
    /// An empty note receives one empty text block so editing can start
    /// immediately; focus lands on the last text row, cursor at its end.
    pub fn open(mut note: NoteItem) -> Self {
        if note.block_count() == 0 {
            let block = note.new_block(BlockKind::Text);
            note.push_block(block)
                .expect("fresh block id cannot collide");
        }

        let rows: Vec<Row> = note
            .blocks()
            .iter()
            .map(|b| match b.kind() {
                BlockKind::Text => Row::text(b.id(), b.text().unwrap_or_default()),
                BlockKind::Voice => Row::voice(b.id()),
            })
            .collect();

        let current = rows
            .iter()
            .rev()
            .find(|r| r.kind == BlockKind::Text)
            .or_else(|| rows.last())
            .map(|r| r.block);
        let cursor = current
            .and_then(|id| rows.iter().find(|r| r.block == id))
            .map(|r| r.buffer.chars().count())
            .unwrap_or(0);

        Self {
            note,
            rows,
            current,
            cursor,
            dirty: false,
            scroll: ScrollState::new(),
        }
    }

    // ===========================================
    // Accessors
    // ===========================================

    /// Returns the note being edited.
    pub fn note(&self) -> &NoteItem {
        &self.note
    }

    /// Consumes the view, returning the note.
    pub fn into_note(self) -> NoteItem {
        self.note
    }

    /// Returns row block ids in display order.
    pub fn block_ids(&self) -> Vec<BlockId> {
        self.rows.iter().map(|r| r.block).collect()
    }

    /// Returns row kinds in display order.
    pub fn row_kinds(&self) -> Vec<BlockKind> {
        self.rows.iter().map(|r| r.kind).collect()
    }

    /// Returns a text row's live buffer.
    pub fn row_text(&self, id: BlockId) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.block == id && r.kind == BlockKind::Text)
            .map(|r| r.buffer.as_str())
    }

    /// Returns the focused block, if any.
    pub fn focused(&self) -> Option<BlockId> {
        self.current
    }

    /// Returns the cursor offset (in characters) within the focused row.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True when in-memory content differs from the last successful save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True when the given voice row is the one currently playing.
    pub fn is_playing(&self, id: BlockId) -> bool {
        self.rows.iter().any(|r| r.block == id && r.playing)
    }

    /// Returns the scroll state.
    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    /// Sets the viewport height, as reported by the host.
    pub fn set_viewport_height(&mut self, height: i64) {
        self.scroll.set_viewport_height(height);
    }

    /// Host-driven scroll value change.
    pub fn set_scroll_value(&mut self, value: i64) {
        self.scroll.set_value(value);
    }

    /// Records a row's measured height.
    pub fn set_row_height(&mut self, id: BlockId, height: i64) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.block == id) {
            row.height = height.max(0);
        }
    }

    fn row_index(&self, id: BlockId) -> Option<usize> {
        self.rows.iter().position(|r| r.block == id)
    }

    // ===========================================
    // Focus and Cursor
    // ===========================================

    /// Focus-in event: makes the row current.
    ///
    /// The outgoing row's buffer is flushed into its block first, so an
    /// edit is never stranded when focus moves without a focus-out event.
    pub fn focus(&mut self, id: BlockId) {
        if let Some(index) = self.row_index(id) {
            if self.current != Some(id) && self.flush_focused() {
                self.dirty = true;
            }
            self.current = Some(id);
            self.cursor = self
                .cursor
                .min(self.rows[index].buffer.chars().count());
        }
    }

    /// Moves the cursor within the focused row, clamped to its length.
    pub fn set_cursor(&mut self, position: usize) {
        let limit = self
            .current
            .and_then(|id| self.row_index(id))
            .map(|i| self.rows[i].buffer.chars().count())
            .unwrap_or(0);
        self.cursor = position.min(limit);
    }

    /// Focus-out event: flushes the focused buffer and saves if it changed.
    pub fn focus_out(&mut self, store: &DbManager) {
        if self.flush_focused() {
            self.dirty = true;
            self.save(store);
        }
    }

    /// Writes the focused text buffer into its block payload.
    ///
    /// Returns true when the payload changed.
    fn flush_focused(&mut self) -> bool {
        let Some(id) = self.current else {
            return false;
        };
        let Some(index) = self.row_index(id) else {
            return false;
        };
        if self.rows[index].kind != BlockKind::Text {
            return false;
        }
        let buffer = self.rows[index].buffer.clone();
        match self.note.block_mut(id) {
            Some(block) if block.text() != Some(buffer.as_str()) => {
                block.set_text(buffer);
                true
            }
            _ => false,
        }
    }

    /// Writes every diverged text buffer into its block payload.
    fn flush_rows(&mut self) {
        for row in &self.rows {
            if row.kind != BlockKind::Text {
                continue;
            }
            if let Some(block) = self.note.block_mut(row.block)
                && block.text() != Some(row.buffer.as_str())
            {
                block.set_text(row.buffer.clone());
            }
        }
    }

    // ===========================================
    // Text Editing
    // ===========================================

    /// Text-change event for a text row.
    ///
    /// Marks the note dirty. A row left empty is deleted immediately
    /// unless it is the trailing block: a note always ends with an
    /// editable text slot.
    pub fn set_text(&mut self, store: &DbManager, id: BlockId, text: &str) {
        let Some(index) = self.row_index(id) else {
            return;
        };
        if self.rows[index].kind != BlockKind::Text {
            return;
        }

        self.rows[index].buffer = text.to_string();
        if self.current == Some(id) {
            self.cursor = self.cursor.min(text.chars().count());
        }
        self.dirty = true;

        let is_trailing = index + 1 == self.rows.len();
        if text.is_empty() && !is_trailing {
            self.delete_block(store, id);
        }
    }

    // ===========================================
    // Voice Insertion
    // ===========================================

    /// Inserts a voice block for a new recording at the focused position.
    ///
    /// Returns the new block's id. Edge policies:
    /// - no rows yet: voice first, then a fresh focused empty text row
    /// - focused empty text row: the voice takes its place and the text
    ///   row is reused after it
    /// - focused non-empty text row: split at the cursor; the remainder
    ///   becomes a new text row after the voice
    /// - a voice left as the last row always gets a trailing empty text
    ///   row so editing can resume
    pub fn insert_voice(
        &mut self,
        store: &DbManager,
        path: impl Into<PathBuf>,
        size: u64,
    ) -> BlockId {
        let title = NoteOper::new(&self.note, store).default_voice_name();
        let mut voice_block = self.note.new_block(BlockKind::Voice);
        let voice_id = voice_block.id();
        if let Some(voice) = voice_block.voice_mut() {
            voice.voice_path = path.into();
            voice.voice_size = size;
            voice.create_time = Utc::now();
            voice.voice_title = title;
        }

        if self.rows.is_empty() {
            self.note
                .push_block(voice_block)
                .expect("fresh block id cannot collide");
            self.rows.push(Row::voice(voice_id));

            let text_block = self.note.new_block(BlockKind::Text);
            let text_id = text_block.id();
            self.note
                .push_block(text_block)
                .expect("fresh block id cannot collide");
            self.rows.push(Row::text(text_id, ""));
            self.current = Some(text_id);
            self.cursor = 0;

            self.dirty = true;
            self.save(store);
            return voice_id;
        }

        let cur_index = self
            .current
            .and_then(|id| self.row_index(id))
            .unwrap_or(self.rows.len() - 1);
        let cur_id = self.rows[cur_index].block;
        let cur_kind = self.rows[cur_index].kind;

        // A focused empty text row is reused: the voice slots in before it.
        if cur_kind == BlockKind::Text && self.rows[cur_index].buffer.is_empty() {
            let anchor = cur_index.checked_sub(1).map(|i| self.rows[i].block);
            self.note
                .add_block(anchor, voice_block)
                .expect("anchor row mirrors a live block");
            self.rows.insert(cur_index, Row::voice(voice_id));
            self.current = Some(cur_id);
            self.cursor = 0;

            let offset = self.rows[cur_index + 1].height;
            self.ensure_row_visible(cur_id, offset);
            self.dirty = true;
            self.save(store);
            return voice_id;
        }

        // Split a non-empty text row at the cursor.
        let mut cut = String::new();
        if cur_kind == BlockKind::Text {
            let byte = self.rows[cur_index]
                .buffer
                .char_indices()
                .nth(self.cursor)
                .map(|(i, _)| i)
                .unwrap_or(self.rows[cur_index].buffer.len());
            cut = self.rows[cur_index].buffer.split_off(byte);
            let kept = self.rows[cur_index].buffer.clone();
            if let Some(block) = self.note.block_mut(cur_id) {
                block.set_text(kept);
            }
        }

        self.note
            .add_block(Some(cur_id), voice_block)
            .expect("anchor row mirrors a live block");
        self.rows.insert(cur_index + 1, Row::voice(voice_id));
        self.current = Some(voice_id);

        let voice_is_last = cur_index + 2 == self.rows.len();
        if !cut.is_empty() || voice_is_last {
            let mut text_block = self.note.new_block(BlockKind::Text);
            text_block.set_text(cut.clone());
            let text_id = text_block.id();
            self.note
                .add_block(Some(voice_id), text_block)
                .expect("anchor row mirrors a live block");
            self.cursor = cut.chars().count();
            self.rows.insert(cur_index + 2, Row::text(text_id, cut));
            self.current = Some(text_id);
            let offset = self.rows[cur_index + 2].height;
            self.ensure_row_visible(text_id, offset);
        }

        self.dirty = true;
        self.save(store);
        voice_id
    }

    // ===========================================
    // Deletion and Merging
    // ===========================================

    /// Removes a block from both the row list and the model.
    ///
    /// When the removal leaves two text rows adjacent, they merge into
    /// the successor (predecessor text first) with the cursor at the end
    /// of the merged text. Focus transfers to the next surviving row.
    /// If the removal consumed the trailing text slot, a fresh empty
    /// text block is appended and focused.
    pub fn delete_block(&mut self, store: &DbManager, id: BlockId) {
        let Some(index) = self.row_index(id) else {
            return;
        };

        let pre = index.checked_sub(1).map(|i| (self.rows[i].block, self.rows[i].kind));
        let next = self
            .rows
            .get(index + 1)
            .map(|r| (r.block, r.kind));

        if self.current == Some(id) {
            self.current = next
                .map(|(block, _)| block)
                .or(pre.map(|(block, _)| block));
        }

        if self.note.del_block(id).is_err() {
            debug!(block = id.value(), "deleted row had no model block");
        }
        self.rows.remove(index);

        // Merge text rows left adjacent by the removal.
        if let (Some((pre_id, BlockKind::Text)), Some((next_id, BlockKind::Text))) = (pre, next) {
            let pre_index = index - 1;
            let merged = {
                let mut s = self.rows[pre_index].buffer.clone();
                s.push_str(&self.rows[pre_index + 1].buffer);
                s
            };
            self.rows[pre_index + 1].buffer = merged.clone();
            if let Some(block) = self.note.block_mut(next_id) {
                block.set_text(merged.clone());
            }
            if self.note.del_block(pre_id).is_err() {
                debug!(block = pre_id.value(), "merged row had no model block");
            }
            self.rows.remove(pre_index);
            self.current = Some(next_id);
            self.cursor = merged.chars().count();
        }

        // A note always ends with an editable text slot; recreate it when
        // the removal left the sequence empty or ending in a voice row.
        if self.rows.last().map(|r| r.kind) != Some(BlockKind::Text) {
            let block = self.note.new_block(BlockKind::Text);
            let text_id = block.id();
            self.note
                .push_block(block)
                .expect("fresh block id cannot collide");
            self.rows.push(Row::text(text_id, ""));
            self.current = Some(text_id);
            self.cursor = 0;
        }

        // Cursor to the end when focus lands on a text row.
        let mut offset = 0;
        if let Some(cur) = self.current
            && let Some(i) = self.row_index(cur)
        {
            if self.rows[i].kind == BlockKind::Text {
                self.cursor = self.rows[i].buffer.chars().count();
                offset = self.rows[i].height;
            }
            self.ensure_row_visible(cur, offset);
        }

        self.dirty = true;
        self.save(store);
    }

    // ===========================================
    // Voice Playback
    // ===========================================

    /// Play request for a voice row.
    ///
    /// A missing backing file deletes the block and reports
    /// [`VoiceAccess::Missing`]; otherwise the row becomes the single
    /// playing one.
    pub fn play_voice(&mut self, store: &DbManager, id: BlockId) -> VoiceAccess {
        if self.check_voice_file(store, id) == VoiceAccess::Missing {
            return VoiceAccess::Missing;
        }
        for row in &mut self.rows {
            row.playing = false;
        }
        if let Some(row) = self.rows.iter_mut().find(|r| r.block == id) {
            row.playing = true;
        }
        VoiceAccess::Available
    }

    /// Pause request for a voice row.
    pub fn pause_voice(&mut self, id: BlockId) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.block == id) {
            row.playing = false;
        }
    }

    /// Context-menu request for a voice row; only the file check here.
    pub fn voice_menu(&mut self, store: &DbManager, id: BlockId) -> VoiceAccess {
        self.check_voice_file(store, id)
    }

    fn check_voice_file(&mut self, store: &DbManager, id: BlockId) -> VoiceAccess {
        let exists = self
            .note
            .block(id)
            .and_then(|b| b.voice_path())
            .map(|p| p.exists())
            .unwrap_or(false);
        if exists {
            VoiceAccess::Available
        } else {
            warn!(block = id.value(), "voice recording missing, removing block");
            self.delete_block(store, id);
            VoiceAccess::Missing
        }
    }

    // ===========================================
    // Saving
    // ===========================================

    /// Persists the note if it is dirty.
    ///
    /// Every diverged text buffer is flushed into its block first. The
    /// dirty flag clears only on success; a failure is logged and the
    /// flag stays set, so the next trigger retries.
    pub fn save(&mut self, store: &DbManager) -> bool {
        if !self.dirty {
            return true;
        }
        self.flush_rows();
        self.note.touch(Utc::now());
        match NoteOper::new(&self.note, store).update_note() {
            Ok(()) => {
                self.dirty = false;
                true
            }
            Err(e) => {
                warn!(note = %self.note.id(), error = %e, "save failed, retrying on next trigger");
                false
            }
        }
    }

    /// Leave event: flushes and saves pending edits.
    pub fn leave(&mut self, store: &DbManager) {
        self.save(store);
    }

    fn ensure_row_visible(&mut self, id: BlockId, offset: i64) {
        let Some(index) = self.row_index(id) else {
            return;
        };
        let target: i64 = offset + self.rows[..index].iter().map(|r| r.height).sum::<i64>();
        self.scroll.ensure_visible(target);
    }
}
