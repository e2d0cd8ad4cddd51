//! Note operations: persistence entry points for one note.

use crate::domain::{BlockKind, NoteId, NoteItem};
use crate::store::{
    DbManager, DeleteNoteVisitor, InsertNoteVisitor, NoteSummary, QueryNoteVisitor,
    QueryNotesVisitor, StoreError, StoreResult, UpdateNoteVisitor,
};
use chrono::Utc;

/// Drives the visitor/manager pair for one note.
///
/// Borrowed fresh per operation, mirroring how the editing surface
/// constructs it: once for each save trigger.
pub struct NoteOper<'a> {
    note: &'a NoteItem,
    store: &'a DbManager,
}

impl<'a> NoteOper<'a> {
    pub fn new(note: &'a NoteItem, store: &'a DbManager) -> Self {
        Self { note, store }
    }

    /// Persists the note's current block sequence.
    ///
    /// Serializes every block into an upsert batch and hands it to the
    /// manager. In-memory state is never reverted on failure, so a
    /// partial failure leaves memory and disk diverged; the caller's
    /// dirty flag covers the retry.
    pub fn update_note(&self) -> StoreResult<()> {
        let mut visitor = UpdateNoteVisitor::new(self.note);
        self.store.update_data(&mut visitor)
    }

    /// Produces a display name for a newly recorded voice block.
    ///
    /// Sequential "Voice N", bumped past any existing voice title in the
    /// same note so the name never collides.
    pub fn default_voice_name(&self) -> String {
        let titles = self.note.voice_titles();
        let mut n = self.note.voice_count() + 1;
        loop {
            let candidate = format!("Voice {n}");
            if !titles.iter().any(|t| *t == candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    // ===========================================
    // Note Lifecycle
    // ===========================================

    /// Creates and persists a new note with one empty text block.
    ///
    /// Every note ends with an editable text slot; the initial empty
    /// block establishes that invariant.
    pub fn create_note(store: &DbManager, title: &str) -> StoreResult<NoteItem> {
        let now = Utc::now();
        let mut note = NoteItem::new(NoteId::new(), title, now, now)
            .map_err(|e| StoreError::InvalidArgument(e.to_string()))?;
        let block = note.new_block(BlockKind::Text);
        note.push_block(block)
            .map_err(|e| StoreError::InvalidArgument(e.to_string()))?;

        let mut visitor = InsertNoteVisitor::new(&note);
        store.insert_data(&mut visitor)?;
        Ok(note)
    }

    /// Loads a note and its blocks from the store.
    pub fn load_note(store: &DbManager, id: &NoteId) -> StoreResult<NoteItem> {
        let mut visitor = QueryNoteVisitor::new(id.clone());
        store.query_data(&mut visitor)?;
        visitor.into_note().ok_or_else(|| StoreError::NotFound {
            id: id.to_string(),
        })
    }

    /// Deletes a note and all of its blocks.
    pub fn delete_note(store: &DbManager, id: &NoteId) -> StoreResult<()> {
        let mut visitor = DeleteNoteVisitor::new(id.clone());
        store.delete_data(&mut visitor)
    }

    /// Lists summaries of every stored note, oldest first.
    pub fn list_notes(store: &DbManager) -> StoreResult<Vec<NoteSummary>> {
        let mut visitor = QueryNotesVisitor::new();
        store.query_data(&mut visitor)?;
        Ok(visitor.into_summaries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn memory_store() -> DbManager {
        DbManager::open_in_memory().unwrap()
    }

    fn voice_with_title(note: &mut NoteItem, title: &str) {
        let mut block = note.new_block(BlockKind::Voice);
        {
            let voice = block.voice_mut().unwrap();
            voice.voice_path = PathBuf::from("/tmp/rec.wav");
            voice.voice_title = title.to_string();
        }
        note.push_block(block).unwrap();
    }

    #[test]
    fn create_note_persists_with_one_empty_text_block() {
        let store = memory_store();
        let note = NoteOper::create_note(&store, "Groceries").unwrap();
        assert_eq!(note.block_count(), 1);
        assert!(note.blocks()[0].is_empty_text());

        let loaded = NoteOper::load_note(&store, note.id()).unwrap();
        assert_eq!(loaded.title(), "Groceries");
        assert_eq!(loaded.block_count(), 1);
    }

    #[test]
    fn create_note_rejects_empty_title() {
        let store = memory_store();
        let err = NoteOper::create_note(&store, "  ").unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
    }

    #[test]
    fn update_note_round_trips_edits() {
        let store = memory_store();
        let mut note = NoteOper::create_note(&store, "Journal").unwrap();
        let first = note.blocks()[0].id();
        note.block_mut(first).unwrap().set_text("day one");
        note.touch(Utc::now());

        NoteOper::new(&note, &store).update_note().unwrap();

        let loaded = NoteOper::load_note(&store, note.id()).unwrap();
        assert_eq!(loaded.blocks()[0].text(), Some("day one"));
    }

    #[test]
    fn load_note_missing_is_not_found() {
        let store = memory_store();
        let err = NoteOper::load_note(&store, &NoteId::new()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn delete_note_removes_it_from_listing() {
        let store = memory_store();
        let keep = NoteOper::create_note(&store, "Keep").unwrap();
        let gone = NoteOper::create_note(&store, "Gone").unwrap();

        NoteOper::delete_note(&store, gone.id()).unwrap();

        let summaries = NoteOper::list_notes(&store).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(&summaries[0].id, keep.id());
    }

    #[test]
    fn list_notes_is_oldest_first() {
        let store = memory_store();
        let a = NoteOper::create_note(&store, "First").unwrap();
        let b = NoteOper::create_note(&store, "Second").unwrap();

        let summaries = NoteOper::list_notes(&store).unwrap();
        let ids: Vec<_> = summaries.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![a.id().clone(), b.id().clone()]);
    }

    // ===========================================
    // Voice Naming
    // ===========================================

    #[test]
    fn default_voice_name_starts_at_one() {
        let store = memory_store();
        let now = Utc::now();
        let note = NoteItem::new(NoteId::new(), "T", now, now).unwrap();
        assert_eq!(NoteOper::new(&note, &store).default_voice_name(), "Voice 1");
    }

    #[test]
    fn default_voice_name_is_sequential() {
        let store = memory_store();
        let now = Utc::now();
        let mut note = NoteItem::new(NoteId::new(), "T", now, now).unwrap();
        voice_with_title(&mut note, "Voice 1");
        voice_with_title(&mut note, "Voice 2");
        assert_eq!(NoteOper::new(&note, &store).default_voice_name(), "Voice 3");
    }

    #[test]
    fn default_voice_name_skips_collisions() {
        let store = memory_store();
        let now = Utc::now();
        let mut note = NoteItem::new(NoteId::new(), "T", now, now).unwrap();
        // One voice block whose user-renamed title already claims "Voice 2".
        voice_with_title(&mut note, "Voice 2");
        let name = NoteOper::new(&note, &store).default_voice_name();
        assert_ne!(name, "Voice 2");
        assert!(!note.voice_titles().contains(&name.as_str()));
    }

    #[test]
    fn default_voice_name_never_collides_with_arbitrary_titles() {
        let store = memory_store();
        let now = Utc::now();
        let mut note = NoteItem::new(NoteId::new(), "T", now, now).unwrap();
        for title in ["Voice 1", "Voice 3", "Voice 4", "standup recording"] {
            voice_with_title(&mut note, title);
        }
        let name = NoteOper::new(&note, &store).default_voice_name();
        assert!(!note.voice_titles().contains(&name.as_str()));
    }
}
