//! Use-Case: Verbindungen einzeln oder je Junction verwerfen.

use crate::app::EditorState;
use crate::core::{Connection, ElementHandle, NetError, NetResult};

/// Entfernt eine einzelne Verbindung der Kante.
///
/// Die Logik der Ziel-Junction bleibt gültig, das Netz muss aber neu
/// berechnet werden.
pub fn delete_connection(
    state: &mut EditorState,
    edge: ElementHandle,
    connection: &Connection,
) -> NetResult<()> {
    let e = state.network.edge(edge)?;
    let id = e.id.clone();
    if !e.connections.contains(connection) {
        return Err(NetError::invalid(format!(
            "Kante {} hat keine Verbindung von Spur {} nach {}:{}",
            id, connection.from_lane, connection.to_edge, connection.to_lane
        )));
    }
    let remaining: Vec<Connection> = e
        .connections
        .iter()
        .filter(|c| *c != connection)
        .copied()
        .collect();

    state.with_group("Verbindung löschen", |s| {
        s.set_connections(edge, remaining)?;
        s.network.require_recompute();
        Ok(())
    })?;
    log::info!("Verbindung von Kante {} (Spur {}) gelöscht", id, connection.from_lane);
    Ok(())
}

/// Entfernt alle Verbindungen der an der Junction ankommenden Kanten.
pub fn clear_junction_connections(
    state: &mut EditorState,
    junction: ElementHandle,
) -> NetResult<usize> {
    let id = state.network.junction(junction)?.id.clone();
    let incoming = state.network.incoming_edges(junction);
    let count = incoming
        .iter()
        .filter_map(|e| state.network.edge(*e).ok())
        .map(|e| e.connections.len())
        .sum();

    state.with_group("Verbindungen leeren", |s| {
        for edge in incoming {
            s.set_connections(edge, Vec::new())?;
        }
        s.network.require_recompute();
        Ok(())
    })?;
    log::info!("{} Verbindung(en) an Junction {} entfernt", count, id);
    Ok(count)
}

/// Leert die Verbindungen und erzwingt eine neue Logik bei der nächsten Berechnung.
pub fn reset_junction_connections(state: &mut EditorState, junction: ElementHandle) -> NetResult<()> {
    let id = state.network.junction(junction)?.id.clone();
    state.with_group("Verbindungen zurücksetzen", |s| {
        clear_junction_connections(s, junction)?;
        s.invalidate_junction(junction)
    })?;
    log::info!("Verbindungen an Junction {} zurückgesetzt", id);
    Ok(())
}
