//! New note command handler.

use anyhow::{Context, Result};

use crate::cli::NewArgs;
use crate::store::{DbManager, NoteOper};

pub fn handle_new(args: &NewArgs, store: &DbManager) -> Result<()> {
    let note = NoteOper::create_note(store, &args.title)
        .with_context(|| format!("failed to create note '{}'", args.title))?;

    println!("Created: {} [{}]", note.title(), note.id());
    Ok(())
}
