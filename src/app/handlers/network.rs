//! Handler für Neuberechnung, Laden und Speicher-Flags.

use crate::app::use_cases;
use crate::app::use_cases::load::LoadItem;
use crate::app::EditorState;
use crate::core::{NetResult, SaveCategory};

/// Berechnet Verbindungen und Ampelprogramme neu.
pub fn compute(state: &mut EditorState, force: bool, volatile: bool) -> NetResult<()> {
    let report = use_cases::recompute::compute_network(state, force, volatile)?;
    if !report.dropped.is_empty() {
        log::warn!(
            "{} Element(e) bei der Neuberechnung verworfen",
            report.dropped.len()
        );
    }
    Ok(())
}

/// Lädt Elemente ohne Undo-Protokoll; abgelehnte Einträge brechen nicht ab.
pub fn bulk_load(state: &mut EditorState, items: Vec<LoadItem>) -> NetResult<()> {
    use_cases::load::bulk_load(state, items)?;
    Ok(())
}

/// Setzt das Speicher-Flag einer Kategorie zurück.
pub fn mark_saved(state: &mut EditorState, category: SaveCategory) {
    state.network.mark_saved(category);
    log::info!("{:?} gespeichert", category);
}
