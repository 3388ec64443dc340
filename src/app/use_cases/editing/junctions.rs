//! Use-Case: Junctions anlegen, löschen und zusammenführen.

use glam::Vec2;

use super::edges::delete_edge;
use crate::app::EditorState;
use crate::core::{
    AttrKey, AttrValue, Category, EdgeEnd, Element, ElementHandle, Junction, JunctionType,
    NetError, NetResult,
};

/// Legt eine neue Junction an der Weltposition an.
pub fn create_junction(state: &mut EditorState, position: Vec2) -> NetResult<ElementHandle> {
    state.with_group("Junction erstellen", |s| {
        let id = s.network.generate_id(Category::Junction);
        let handle = s.create_element(Element::Junction(Junction::new(id.clone(), position)), &[])?;
        s.network.require_recompute();
        log::info!("Junction {} bei ({:.2}, {:.2}) erstellt", id, position.x, position.y);
        Ok(handle)
    })
}

/// Löscht eine Junction samt aller angrenzenden Kanten und Crossings.
///
/// Crossings benachbarter Junctions, die eine der Kanten referenzieren,
/// werden mitgelöscht.
pub fn delete_junction(state: &mut EditorState, junction: ElementHandle) -> NetResult<()> {
    let id = state.network.junction(junction)?.id.clone();
    state.with_group("Junction löschen", |s| {
        for crossing in s.network.crossings_of(junction) {
            s.remove_element(crossing)?;
        }

        let incident = s.network.incident_edges(junction);
        for &edge in &incident {
            let e = s.network.edge(edge)?;
            let neighbour = if e.from == junction { e.to } else { e.from };
            for crossing in s.network.crossings_of(neighbour) {
                let references = s
                    .network
                    .crossing(crossing)?
                    .edges
                    .iter()
                    .any(|h| incident.contains(h));
                if references {
                    s.remove_element(crossing)?;
                }
            }
        }

        for edge in incident {
            if s.network.contains(edge) {
                delete_edge(s, edge)?;
            }
        }

        if s.network.junction(junction)?.junction_type.has_tls() {
            s.set_attr(
                junction,
                AttrKey::JunctionType,
                AttrValue::JunctionType(JunctionType::Priority),
            )?;
        }
        s.remove_element(junction)?;
        s.network.require_recompute();
        Ok(())
    })?;
    log::info!("Junction {} gelöscht", id);
    Ok(())
}

/// Verschiebt `moved` auf `target` und verschmilzt beide.
///
/// Kanten zwischen den beiden Junctions werden gelöscht, alle übrigen Kanten
/// von `moved` hängen danach an `target`.
pub fn merge_junctions(
    state: &mut EditorState,
    moved: ElementHandle,
    target: ElementHandle,
) -> NetResult<()> {
    let moved_id = state.network.junction(moved)?.id.clone();
    let target_junction = state.network.junction(target)?;
    let target_id = target_junction.id.clone();
    let target_pos = target_junction.position;
    if moved == target {
        return Err(NetError::invalid(
            "Junction kann nicht mit sich selbst verschmolzen werden",
        ));
    }

    state.with_group("Junctions zusammenführen", |s| {
        s.set_attr(moved, AttrKey::Position, AttrValue::Point(target_pos))?;

        for edge in s.network.incident_edges(moved) {
            let e = s.network.edge(edge)?;
            let (from, to) = (e.from, e.to);
            if from == target || to == target {
                delete_edge(s, edge)?;
            } else if from == moved {
                s.reconnect(edge, EdgeEnd::From, target)?;
            } else {
                s.reconnect(edge, EdgeEnd::To, target)?;
            }
        }

        s.invalidate_junction(target)?;
        delete_junction(s, moved)
    })?;
    log::info!("Junction {} mit {} zusammengeführt", moved_id, target_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::editing::{create_edge, EdgeCreateOptions};

    #[test]
    fn create_junction_is_undoable() {
        let mut state = EditorState::new();
        let before = state.network.content();

        let j = create_junction(&mut state, Vec2::new(5.0, 5.0)).expect("Junction");
        assert_eq!(state.network.junction(j).map(|j| j.id.as_str()), Ok("J0"));

        state.undo().expect("undo");
        assert_eq!(state.network.content(), before);
    }

    #[test]
    fn delete_junction_removes_incident_edges_and_lanes() {
        let mut state = EditorState::new();
        let a = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("A");
        let b = create_junction(&mut state, Vec2::new(50.0, 0.0)).expect("B");
        let e = create_edge(&mut state, a, b, None, None, EdgeCreateOptions::default())
            .expect("ok")
            .expect("Kante");
        let lanes = state.network.lanes_of(e);

        delete_junction(&mut state, a).expect("Löschen");

        assert!(!state.network.contains(a));
        assert!(!state.network.contains(e));
        assert!(lanes.iter().all(|l| !state.network.contains(*l)));
        assert!(state.network.incident_edges(b).is_empty());
    }
}
