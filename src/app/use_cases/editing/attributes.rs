//! Use-Case: Attribute setzen, umbenennen und selektieren.

use crate::app::EditorState;
use crate::core::{AttrKey, AttrValue, Element, ElementHandle, NetError, NetResult};

/// Setzt ein Attribut; `Id` wird als Umbenennung ausgeführt.
///
/// Topologie-relevante Änderungen invalidieren die Logik der betroffenen Junctions.
pub fn set_attribute(
    state: &mut EditorState,
    handle: ElementHandle,
    key: AttrKey,
    value: AttrValue,
) -> NetResult<()> {
    match (&key, &value) {
        (AttrKey::Id, AttrValue::Str(id)) => return rename(state, handle, id),
        (AttrKey::Id, other) => {
            return Err(NetError::invalid(format!("ID muss ein Text sein, nicht {:?}", other)))
        }
        (AttrKey::Index, _) => {
            return Err(NetError::invalid("Spur-Index ist nicht direkt änderbar"));
        }
        (AttrKey::Edges, AttrValue::Handles(edges)) => {
            for &edge in edges {
                state.network.edge(edge)?;
            }
            if let Element::Crossing(_) = state.network.element(handle)? {
                let junction = state.network.crossing_junction(handle)?;
                let incident = state.network.incident_edges(junction);
                if edges.is_empty() || edges.iter().any(|e| !incident.contains(e)) {
                    return Err(NetError::invalid(
                        "Überweg-Kanten müssen an der Junction liegen",
                    ));
                }
            }
        }
        _ => {}
    }

    let affected = if key.affects_topology() {
        affected_junctions(state, handle)?
    } else {
        Vec::new()
    };
    let id = state.network.element(handle)?.id().to_string();

    state.with_group("Attribut ändern", |s| {
        s.set_attr(handle, key.clone(), value)?;
        for junction in affected {
            s.invalidate_junction(junction)?;
        }
        Ok(())
    })?;
    log::info!("Attribut {:?} von {} geändert", key, id);
    Ok(())
}

/// Junctions, deren Logik von einem Element abhängt.
fn affected_junctions(state: &EditorState, handle: ElementHandle) -> NetResult<Vec<ElementHandle>> {
    let net = &state.network;
    let edge_ends = |edge: ElementHandle| -> NetResult<Vec<ElementHandle>> {
        let e = net.edge(edge)?;
        Ok(vec![e.from, e.to])
    };
    match net.element(handle)? {
        Element::Junction(_) => {
            let mut junctions = vec![handle];
            for edge in net.incident_edges(handle) {
                junctions.extend(edge_ends(edge)?);
            }
            junctions.sort_unstable();
            junctions.dedup();
            Ok(junctions)
        }
        Element::Edge(_) => edge_ends(handle),
        Element::Lane(_) => edge_ends(net.lane_edge(handle)?),
        _ => Ok(Vec::new()),
    }
}

/// Benennt ein Element um; Spuren einer Kante werden mit umbenannt.
pub fn rename(state: &mut EditorState, handle: ElementHandle, new_id: &str) -> NetResult<()> {
    let element = state.network.element(handle)?;
    let old = element.id().to_string();
    match element {
        Element::Lane(_) => {
            return Err(NetError::invalid("Spur-IDs folgen der ID ihrer Kante"));
        }
        Element::Demand(d) if d.is_default => {
            return Err(NetError::invalid(format!(
                "Standard-Element {} kann nicht umbenannt werden",
                old
            )));
        }
        _ => {}
    }

    state.with_group("Umbenennen", |s| s.rename_element(handle, new_id))?;
    log::info!("{} in {} umbenannt", old, new_id);
    Ok(())
}

/// Setzt oder löscht die Selektion eines Elements.
pub fn set_selected(state: &mut EditorState, handle: ElementHandle, selected: bool) -> NetResult<()> {
    state.with_group("Selektion ändern", |s| {
        s.set_attr(handle, AttrKey::Selected, AttrValue::Bool(selected))
    })
}

/// Hebt jede Selektion auf; liefert die Anzahl betroffener Elemente.
pub fn clear_selection(state: &mut EditorState) -> NetResult<usize> {
    let selected = state.network.selected_attribute_carriers();
    if selected.is_empty() {
        log::debug!("Keine Selektion vorhanden");
        return Ok(0);
    }
    let count = selected.len();
    state.with_group("Selektion aufheben", |s| {
        for handle in selected {
            s.set_attr(handle, AttrKey::Selected, AttrValue::Bool(false))?;
        }
        Ok(())
    })?;
    log::info!("Selektion von {} Element(en) aufgehoben", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::editing::{create_edge, create_junction, EdgeCreateOptions};
    use crate::core::{Category, SaveCategory};
    use glam::Vec2;

    #[test]
    fn id_attribute_renames_edge_and_lanes() {
        let mut state = EditorState::new();
        let a = create_junction(&mut state, Vec2::ZERO).expect("A");
        let b = create_junction(&mut state, Vec2::new(10.0, 0.0)).expect("B");
        let e = create_edge(&mut state, a, b, None, None, EdgeCreateOptions::default())
            .expect("ok")
            .expect("Kante");

        set_attribute(&mut state, e, AttrKey::Id, AttrValue::Str("ring".into())).expect("ok");

        assert_eq!(state.network.lookup(Category::Edge, "ring"), Ok(e));
        let lane = state.network.lanes_of(e)[0];
        assert_eq!(state.network.lane(lane).map(|l| l.id.as_str()), Ok("ring_0"));
    }

    #[test]
    fn invalid_speed_leaves_state_unchanged() {
        let mut state = EditorState::new();
        let a = create_junction(&mut state, Vec2::ZERO).expect("A");
        let b = create_junction(&mut state, Vec2::new(10.0, 0.0)).expect("B");
        let e = create_edge(&mut state, a, b, None, None, EdgeCreateOptions::default())
            .expect("ok")
            .expect("Kante");
        let before = state.network.content();

        let result = set_attribute(&mut state, e, AttrKey::Speed, AttrValue::Float(-3.0));

        assert!(matches!(result, Err(NetError::InvalidOperation { .. })));
        assert_eq!(state.network.content(), before);
    }

    #[test]
    fn selection_does_not_dirty_save_flags() {
        let mut state = EditorState::new();
        let j = create_junction(&mut state, Vec2::ZERO).expect("J");
        state.network.mark_saved(SaveCategory::Network);

        set_selected(&mut state, j, true).expect("selektieren");
        assert!(state.network.is_saved(SaveCategory::Network));
        assert_eq!(state.network.selected_junctions(), vec![j]);

        assert_eq!(clear_selection(&mut state), Ok(1));
        assert!(state.network.selected_junctions().is_empty());
    }
}
