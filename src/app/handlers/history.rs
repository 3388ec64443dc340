//! Handler für Undo/Redo-Operationen.

use crate::app::EditorState;
use crate::core::NetResult;

/// Führt einen Undo-Schritt aus, falls vorhanden.
pub fn undo(state: &mut EditorState) -> NetResult<()> {
    if state.undo()? && state.network.needs_recompute() {
        log::debug!("Undo: Netz muss neu berechnet werden");
    }
    Ok(())
}

/// Führt einen Redo-Schritt aus, falls vorhanden.
pub fn redo(state: &mut EditorState) -> NetResult<()> {
    if state.redo()? && state.network.needs_recompute() {
        log::debug!("Redo: Netz muss neu berechnet werden");
    }
    Ok(())
}
