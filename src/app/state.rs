//! Editor State — zentrale Datenhaltung.

mod editor_state;
mod primitives;

pub use editor_state::EditorState;
