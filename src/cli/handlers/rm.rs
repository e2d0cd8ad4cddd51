//! Delete note command handler.

use anyhow::{Context, Result};

use super::resolve_note_id;
use crate::cli::RmArgs;
use crate::store::{DbManager, NoteOper};

pub fn handle_rm(args: &RmArgs, store: &DbManager) -> Result<()> {
    let id = resolve_note_id(&args.note)?;

    // Load first so a missing note reports as such instead of a silent no-op.
    let note = NoteOper::load_note(store, &id)
        .with_context(|| format!("failed to load note {}", args.note))?;

    NoteOper::delete_note(store, &id)
        .with_context(|| format!("failed to delete note {}", args.note))?;

    println!("Deleted: {} [{}]", note.title(), note.id());
    Ok(())
}
