//! Command handlers for the CLI.

mod edit;
mod list;
mod new;
mod rm;
mod show;

use anyhow::{Context, Result};

use crate::domain::NoteId;

// Re-export public items
pub use edit::{handle_add_voice, handle_append, handle_rm_block};
pub use list::handle_list;
pub use new::handle_new;
pub use rm::handle_rm;
pub use show::handle_show;

// ===========================================
// Shared Utilities
// ===========================================

/// Parses a note ID argument.
pub(crate) fn resolve_note_id(s: &str) -> Result<NoteId> {
    s.parse::<NoteId>()
        .with_context(|| format!("invalid note id: {}", s))
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
