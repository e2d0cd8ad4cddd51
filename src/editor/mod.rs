//! Headless note editing surface.

mod scroll;
mod view;

pub use scroll::ScrollState;
pub use view::{EditorView, VoiceAccess};
