//! Use-Case: Fußgängerüberwege an Junctions.

use crate::app::EditorState;
use crate::core::{Category, Crossing, Element, ElementHandle, NetError, NetResult};
use crate::shared::options::DEFAULT_LANE_WIDTH;

/// Legt einen Überweg über die angegebenen Kanten der Junction an.
pub fn create_crossing(
    state: &mut EditorState,
    junction: ElementHandle,
    edges: Vec<ElementHandle>,
) -> NetResult<ElementHandle> {
    let junction_id = state.network.junction(junction)?.id.clone();
    if edges.is_empty() {
        return Err(NetError::invalid("Überweg braucht mindestens eine Kante"));
    }
    let incident = state.network.incident_edges(junction);
    if let Some(foreign) = edges.iter().find(|e| !incident.contains(e)) {
        return Err(NetError::invalid(format!(
            "Kante {} grenzt nicht an Junction {}",
            foreign, junction_id
        )));
    }

    let handle = state.with_group("Überweg erstellen", |s| {
        let crossing = Crossing {
            id: s.network.generate_id(Category::Crossing),
            edges,
            width: DEFAULT_LANE_WIDTH,
            priority: false,
            selected: false,
        };
        let handle = s.create_element(Element::Crossing(crossing), &[junction])?;
        s.invalidate_junction(junction)?;
        Ok(handle)
    })?;
    log::info!("Überweg an Junction {} erstellt", junction_id);
    Ok(handle)
}

/// Entfernt einen Überweg und invalidiert die Logik seiner Junction.
pub fn delete_crossing(state: &mut EditorState, crossing: ElementHandle) -> NetResult<()> {
    let id = state.network.crossing(crossing)?.id.clone();
    let junction = state.network.crossing_junction(crossing)?;
    state.with_group("Überweg löschen", |s| {
        s.remove_element(crossing)?;
        s.invalidate_junction(junction)
    })?;
    log::info!("Überweg {} gelöscht", id);
    Ok(())
}
