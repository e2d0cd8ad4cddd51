//! Show command handler.

use anyhow::{Context, Result};

use super::resolve_note_id;
use crate::cli::ShowArgs;
use crate::cli::output::{NoteDetail, Output, OutputFormat};
use crate::domain::BlockKind;
use crate::store::{DbManager, NoteOper};

pub fn handle_show(args: &ShowArgs, store: &DbManager) -> Result<()> {
    let id = resolve_note_id(&args.note)?;
    let note = NoteOper::load_note(store, &id)
        .with_context(|| format!("failed to load note {}", args.note))?;

    match args.format {
        OutputFormat::Human => {
            println!("{}", note.title());
            println!("  id:       {}", note.id());
            println!("  created:  {}", note.created().format("%Y-%m-%d %H:%M"));
            println!("  modified: {}", note.modified().format("%Y-%m-%d %H:%M"));
            println!();

            for (i, block) in note.blocks().iter().enumerate() {
                match block.kind() {
                    BlockKind::Text => {
                        println!("{:>3}. {}", i + 1, block.text().unwrap_or_default());
                    }
                    BlockKind::Voice => {
                        if let Some(voice) = block.voice() {
                            println!(
                                "{:>3}. [voice] {} ({}, {} bytes)",
                                i + 1,
                                voice.voice_title,
                                voice.voice_path.display(),
                                voice.voice_size
                            );
                        }
                    }
                }
            }
        }
        OutputFormat::Json => {
            let output = Output::new(NoteDetail::from_note(&note));
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
