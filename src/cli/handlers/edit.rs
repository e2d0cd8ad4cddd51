//! Block editing command handlers.
//!
//! Each handler opens the note in an [`EditorView`] and drives the same
//! editing surface the interactive host uses, so the block policies
//! (trailing text slot, splitting, merging) apply uniformly.

use anyhow::{Context, Result, bail};
use std::fs;

use super::resolve_note_id;
use crate::cli::{AddVoiceArgs, AppendArgs, RmBlockArgs};
use crate::editor::EditorView;
use crate::store::{DbManager, NoteOper};

pub fn handle_append(args: &AppendArgs, store: &DbManager) -> Result<()> {
    let id = resolve_note_id(&args.note)?;
    let note = NoteOper::load_note(store, &id)
        .with_context(|| format!("failed to load note {}", args.note))?;

    let mut view = EditorView::open(note);
    let focused = match view.focused() {
        Some(block) => block,
        None => bail!("note has no editable text block"),
    };

    let buffer = view.row_text(focused).unwrap_or_default().to_string();
    let updated = if buffer.is_empty() {
        args.text.clone()
    } else {
        format!("{buffer}\n{}", args.text)
    };
    view.set_text(store, focused, &updated);
    view.leave(store);

    if view.is_dirty() {
        bail!("failed to save note {}", args.note);
    }
    println!("Appended to: {}", view.note().title());
    Ok(())
}

pub fn handle_add_voice(args: &AddVoiceArgs, store: &DbManager) -> Result<()> {
    let id = resolve_note_id(&args.note)?;

    if !args.path.exists() {
        bail!("recording not found: {}", args.path.display());
    }
    let size = match args.size {
        Some(size) => size,
        None => fs::metadata(&args.path)
            .with_context(|| format!("failed to stat {}", args.path.display()))?
            .len(),
    };

    let note = NoteOper::load_note(store, &id)
        .with_context(|| format!("failed to load note {}", args.note))?;
    let mut view = EditorView::open(note);
    let voice = view.insert_voice(store, &args.path, size);

    if view.is_dirty() {
        bail!("failed to save note {}", args.note);
    }

    let title = view
        .note()
        .block(voice)
        .and_then(|b| b.voice())
        .map(|v| v.voice_title.clone())
        .unwrap_or_default();
    println!("Attached: {} to {}", title, view.note().title());
    Ok(())
}

pub fn handle_rm_block(args: &RmBlockArgs, store: &DbManager) -> Result<()> {
    let id = resolve_note_id(&args.note)?;
    let note = NoteOper::load_note(store, &id)
        .with_context(|| format!("failed to load note {}", args.note))?;

    let mut view = EditorView::open(note);
    let ids = view.block_ids();
    let block = match args.position.checked_sub(1).and_then(|i| ids.get(i)) {
        Some(block) => *block,
        None => bail!(
            "no block at position {} (note has {})",
            args.position,
            ids.len()
        ),
    };

    view.delete_block(store, block);
    if view.is_dirty() {
        bail!("failed to save note {}", args.note);
    }
    println!("Removed block {} from {}", args.position, view.note().title());
    Ok(())
}
