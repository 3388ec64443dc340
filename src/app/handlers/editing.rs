//! Handler für Topologie-, Element- und Attribut-Editing.

use glam::Vec2;

use crate::app::use_cases::editing::{self, EdgeCreateOptions, EdgeTemplate};
use crate::app::EditorState;
use crate::core::{ElementHandle, NetResult, VehicleClass};

/// Erstellt eine Kante; eine abgelehnte Duplikat-Kante ist kein Fehler.
pub fn create_edge(
    state: &mut EditorState,
    source: ElementHandle,
    dest: ElementHandle,
    template: Option<EdgeTemplate>,
    suggested_id: Option<String>,
    options: EdgeCreateOptions,
) -> NetResult<()> {
    editing::create_edge(
        state,
        source,
        dest,
        template.as_ref(),
        suggested_id.as_deref(),
        options,
    )?;
    Ok(())
}

/// Teilt eine Kante an der Weltposition.
pub fn split_edge(
    state: &mut EditorState,
    edge: ElementHandle,
    position: Vec2,
    new_junction: Option<ElementHandle>,
) -> NetResult<()> {
    editing::split_edge(state, edge, position, new_junction)?;
    Ok(())
}

/// Vereinigt die selektierten Junctions.
pub fn join_selected(state: &mut EditorState) -> NetResult<()> {
    let outcome = editing::join_selected_junctions(state)?;
    if !outcome.absorbed.is_empty() {
        log::info!(
            "{} zusätzliche Junction(s) in den Verbund aufgenommen",
            outcome.absorbed.len()
        );
    }
    Ok(())
}

/// Beschränkt eine Spur; eine abgelehnte Beschränkung wird nur protokolliert.
pub fn restrict_lane(
    state: &mut EditorState,
    class: VehicleClass,
    lane: ElementHandle,
) -> NetResult<()> {
    if !editing::restrict_lane(state, class, lane)? {
        log::warn!("Spur {} nicht auf {} beschränkt", lane, class.name());
    }
    Ok(())
}

pub fn add_restricted_lane(
    state: &mut EditorState,
    class: VehicleClass,
    edge: ElementHandle,
    index: Option<usize>,
) -> NetResult<()> {
    if !editing::add_restricted_lane(state, class, edge, index)? {
        log::warn!("Keine {}-Spur an Kante {} hinzugefügt", class.name(), edge);
    }
    Ok(())
}

pub fn remove_restricted_lane(
    state: &mut EditorState,
    class: VehicleClass,
    edge: ElementHandle,
) -> NetResult<()> {
    if !editing::remove_restricted_lane(state, class, edge)? {
        log::debug!("Kante {} hat keine {}-Spur", edge, class.name());
    }
    Ok(())
}

/// Hebt die gesamte Selektion auf.
pub fn clear_selection(state: &mut EditorState) -> NetResult<()> {
    let count = editing::clear_selection(state)?;
    log::debug!("{} Element(e) deselektiert", count);
    Ok(())
}

/// Entfernt Junctions ohne Kanten.
pub fn remove_solitary_junctions(state: &mut EditorState) -> NetResult<()> {
    editing::remove_solitary_junctions(state)?;
    Ok(())
}

/// Entfernt Routen ohne Fahrzeuge.
pub fn clean_unused_routes(state: &mut EditorState) -> NetResult<()> {
    editing::clean_unused_routes(state)?;
    Ok(())
}
