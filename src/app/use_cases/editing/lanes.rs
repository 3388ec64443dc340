//! Use-Case: Spuren löschen, duplizieren und einfügen.

use super::edges::delete_edge;
use super::elements::remove_with_dependents;
use crate::app::EditorState;
use crate::core::{AttrKey, AttrValue, Element, ElementHandle, Lane, NetError, NetResult};

/// Löscht eine Spur; die letzte Spur einer Kante löscht die ganze Kante.
///
/// Nachfolgende Spuren rücken im Index nach und werden passend umbenannt.
pub fn delete_lane(state: &mut EditorState, lane: ElementHandle) -> NetResult<()> {
    let lane_id = state.network.lane(lane)?.id.clone();
    let edge = state.network.lane_edge(lane)?;
    let lanes = state.network.lanes_of(edge);
    if lanes.len() <= 1 {
        log::debug!("Spur {} ist die letzte ihrer Kante, Kante wird gelöscht", lane_id);
        return delete_edge(state, edge);
    }

    state.with_group("Spur löschen", |s| {
        let e = s.network.edge(edge)?;
        let (edge_id, from, to) = (e.id.clone(), e.from, e.to);
        let removed_index = s.network.lane(lane)?.index;

        for child in s.network.children(lane) {
            remove_with_dependents(s, child)?;
        }
        s.remove_element(lane)?;

        for follower in lanes {
            let index = match s.network.lane(follower) {
                Ok(l) if l.index > removed_index => l.index,
                _ => continue,
            };
            s.set_attr(follower, AttrKey::Index, AttrValue::Int(index as i64 - 1))?;
            s.rename_element(follower, &Lane::lane_id(&edge_id, index - 1))?;
        }

        s.invalidate_junction(from)?;
        s.invalidate_junction(to)?;
        Ok(())
    })?;
    log::info!("Spur {} gelöscht", lane_id);
    Ok(())
}

/// Hängt eine Kopie der Spur als neue äußerste Spur an die Kante an.
pub fn duplicate_lane(state: &mut EditorState, lane: ElementHandle) -> NetResult<ElementHandle> {
    let source = state.network.lane(lane)?.clone();
    let edge = state.network.lane_edge(lane)?;

    let duplicate = state.with_group("Spur duplizieren", |s| {
        let e = s.network.edge(edge)?;
        let (edge_id, from, to) = (e.id.clone(), e.from, e.to);
        let index = s.network.lanes_of(edge).len();
        let copy = Lane {
            id: Lane::lane_id(&edge_id, index),
            index,
            selected: false,
            ..source.clone()
        };
        let handle = s.create_element(Element::Lane(copy), &[edge])?;
        s.invalidate_junction(from)?;
        s.invalidate_junction(to)?;
        Ok(handle)
    })?;
    log::info!("Spur {} dupliziert", source.id);
    Ok(duplicate)
}

/// Fügt eine Spur an Position `index` ein; Spuren ab `index` rücken nach außen.
///
/// Nachfolger werden von der höchsten Nummer abwärts umbenannt, damit keine
/// ID zwischenzeitlich doppelt vergeben ist.
pub(crate) fn insert_lane(
    state: &mut EditorState,
    edge: ElementHandle,
    index: usize,
    template: &Lane,
) -> NetResult<ElementHandle> {
    let e = state.network.edge(edge)?;
    let (edge_id, from, to) = (e.id.clone(), e.from, e.to);
    let lanes = state.network.lanes_of(edge);
    if index > lanes.len() {
        return Err(NetError::invalid(format!(
            "Spur-Index {} ungültig für Kante {} mit {} Spur(en)",
            index,
            edge_id,
            lanes.len()
        )));
    }

    for &follower in lanes[index..].iter().rev() {
        let shifted = state.network.lane(follower)?.index + 1;
        state.set_attr(follower, AttrKey::Index, AttrValue::Int(shifted as i64))?;
        state.rename_element(follower, &Lane::lane_id(&edge_id, shifted))?;
    }
    let lane = Lane {
        id: Lane::lane_id(&edge_id, index),
        index,
        selected: false,
        ..template.clone()
    };
    let handle = state.create_element(Element::Lane(lane), &[edge])?;
    state.invalidate_junction(from)?;
    state.invalidate_junction(to)?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::editing::{
        create_edge, create_junction, EdgeCreateOptions, EdgeTemplate,
    };
    use glam::Vec2;

    fn edge_with_lanes(state: &mut EditorState, count: usize) -> ElementHandle {
        let a = create_junction(state, Vec2::new(0.0, 0.0)).expect("A");
        let b = create_junction(state, Vec2::new(30.0, 0.0)).expect("B");
        let mut template = EdgeTemplate::from_options(&state.options);
        template.lanes = vec![template.lanes[0].clone(); count];
        create_edge(state, a, b, Some(&template), None, EdgeCreateOptions::default())
            .expect("ok")
            .expect("Kante")
    }

    #[test]
    fn deleting_middle_lane_renumbers_followers() {
        let mut state = EditorState::new();
        let edge = edge_with_lanes(&mut state, 3);
        let lanes = state.network.lanes_of(edge);

        delete_lane(&mut state, lanes[1]).expect("Löschen");

        let remaining = state.network.lanes_of(edge);
        assert_eq!(remaining, vec![lanes[0], lanes[2]]);
        let last = state.network.lane(lanes[2]).expect("Spur");
        assert_eq!(last.index, 1);
        assert_eq!(last.id, "E0_1");
    }

    #[test]
    fn deleting_last_lane_deletes_edge() {
        let mut state = EditorState::new();
        let edge = edge_with_lanes(&mut state, 1);
        let lane = state.network.lanes_of(edge)[0];

        delete_lane(&mut state, lane).expect("Löschen");

        assert!(!state.network.contains(edge));
    }

    #[test]
    fn duplicate_appends_lane() {
        let mut state = EditorState::new();
        let edge = edge_with_lanes(&mut state, 2);
        let lanes = state.network.lanes_of(edge);

        let copy = duplicate_lane(&mut state, lanes[0]).expect("Duplizieren");

        assert_eq!(state.network.lanes_of(edge).len(), 3);
        assert_eq!(state.network.lane(copy).map(|l| l.index), Ok(2));

        state.undo().expect("undo");
        assert_eq!(state.network.lanes_of(edge), lanes);
    }

    #[test]
    fn inserted_lane_shifts_and_renames_followers() {
        let mut state = EditorState::new();
        let edge = edge_with_lanes(&mut state, 2);
        let lanes = state.network.lanes_of(edge);
        let template = state.network.lane(lanes[0]).expect("Spur").clone();

        let inserted = state
            .with_group("Spur einfügen", |s| insert_lane(s, edge, 0, &template))
            .expect("Einfügen");

        assert_eq!(state.network.lanes_of(edge), vec![inserted, lanes[0], lanes[1]]);
        let ids: Vec<String> = state
            .network
            .lanes_of(edge)
            .iter()
            .map(|h| state.network.lane(*h).expect("Spur").id.clone())
            .collect();
        assert_eq!(ids, vec!["E0_0", "E0_1", "E0_2"]);

        let too_far = state.with_group("Spur einfügen", |s| insert_lane(s, edge, 9, &template));
        assert!(matches!(too_far, Err(NetError::InvalidOperation { .. })));

        state.undo().expect("undo");
        assert_eq!(state.network.lanes_of(edge), lanes);
        assert_eq!(state.network.lane(lanes[1]).map(|l| l.id.as_str()), Ok("E0_1"));
    }
}
