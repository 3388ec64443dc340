//! Use-Case: Kante an einer Position teilen.

use std::sync::OnceLock;

use glam::Vec2;
use regex::Regex;

use super::edges::{create_edge, EdgeCreateOptions, EdgeTemplate};
use super::junctions::create_junction;
use crate::app::EditorState;
use crate::core::{
    geometry, AttrKey, AttrValue, Category, Connection, EdgeEnd, Element, ElementHandle,
    NetError, NetResult, Network,
};

/// Numerischer Teilungs-Suffix, z.B. `E3.40`.
fn split_suffix() -> Option<&'static Regex> {
    static SUFFIX: OnceLock<Option<Regex>> = OnceLock::new();
    SUFFIX
        .get_or_init(|| Regex::new(r"^(.+)\.(\d+)$").ok())
        .as_ref()
}

fn split_base(id: &str, was_split: bool) -> (&str, i64) {
    if was_split {
        if let Some(caps) = split_suffix().and_then(|re| re.captures(id)) {
            if let (Some(name), Some(pos)) = (caps.get(1), caps.get(2)) {
                if let Ok(value) = pos.as_str().parse::<i64>() {
                    return (name.as_str(), value);
                }
            }
        }
    }
    (id, 0)
}

/// ID des zweiten Teilstücks: `<Basis>.<Offset>`.
///
/// Die Basis ist die Kanten-ID, bei bereits geteilten Kanten ohne den früheren
/// `.N`-Suffix. Der Offset ist dieser frühere Suffix plus die auf ganze Meter
/// gerundete Teilungsposition; ist der Name belegt, wird er hochgezählt.
pub(crate) fn split_name(net: &Network, id: &str, was_split: bool, offset: f32) -> String {
    let (base, pos_base) = split_base(id, was_split);
    let start = pos_base + offset.round() as i64;
    (start..start + 1000)
        .map(|pos| format!("{}.{}", base, pos))
        .find(|name| net.is_id_free(Category::Edge, name))
        // Alles belegt: create_edge vergibt eine ID aus der Registry
        .unwrap_or_else(|| format!("{}.{}", base, start))
}

/// Teilt `edge` am nächstgelegenen Punkt zu `position`.
///
/// Die ursprüngliche Kante endet danach an der (neuen oder übergebenen)
/// Junction, ein zweites Teilstück führt von dort zum alten Ziel. Kinder
/// hinter dem Teilungspunkt wandern auf das zweite Teilstück.
pub fn split_edge(
    state: &mut EditorState,
    edge: ElementHandle,
    position: Vec2,
    new_junction: Option<ElementHandle>,
) -> NetResult<ElementHandle> {
    let e = state.network.edge(edge)?;
    let (edge_id, from, dest, was_split) = (e.id.clone(), e.from, e.to, e.was_split);
    let outgoing = e.connections.clone();
    let points = state.network.edge_geometry(edge)?;

    let (offset, distance) = geometry::nearest_offset(&points, position)
        .ok_or_else(|| NetError::invalid(format!("Kante {} hat keine Geometrie", edge_id)))?;
    if distance > state.options.split_snap_distance {
        return Err(NetError::invalid(format!(
            "Position liegt {:.2} m neben Kante {}",
            distance, edge_id
        )));
    }
    let (first, second) = geometry::split_at(&points, offset).ok_or_else(|| {
        NetError::invalid(format!("Kante {} kann nicht am Endpunkt geteilt werden", edge_id))
    })?;
    if let Some(j) = new_junction {
        state.network.junction(j)?;
        if j == from || j == dest {
            return Err(NetError::invalid("Teilungs-Junction ist bereits Endpunkt der Kante"));
        }
    }

    let split_point = second[0];
    let second_id = split_name(&state.network, &edge_id, was_split, offset);
    let template = EdgeTemplate::from_edge(&state.network, edge)?;

    let junction = state.with_group("Kante teilen", |s| {
        let junction = match new_junction {
            Some(j) => j,
            None => create_junction(s, split_point)?,
        };

        let options = EdgeCreateOptions {
            allow_duplicate_geometry: true,
            inner_shape: second[1..second.len() - 1].to_vec(),
            was_split: true,
        };
        let second_part = create_edge(s, junction, dest, Some(&template), Some(&second_id), options)?
            .ok_or_else(|| NetError::integrity("Zweites Teilstück wurde nicht erstellt"))?;

        for crossing in s.network.crossings_of(dest) {
            let edges = &s.network.crossing(crossing)?.edges;
            if edges.contains(&edge) {
                let replaced = edges
                    .iter()
                    .map(|&h| if h == edge { second_part } else { h })
                    .collect();
                s.set_attr(crossing, AttrKey::Edges, AttrValue::Handles(replaced))?;
            }
        }
        insert_after_in_routes(s, edge, second_part)?;

        s.reconnect(edge, EdgeEnd::To, junction)?;
        s.set_attr(
            edge,
            AttrKey::Shape,
            AttrValue::Shape(first[1..first.len() - 1].to_vec()),
        )?;

        let first_lanes = s.network.lanes_of(edge);
        let second_lanes = s.network.lanes_of(second_part);
        let across = (0..first_lanes.len().min(second_lanes.len()))
            .map(|i| Connection {
                from_lane: i,
                to_edge: second_part,
                to_lane: i,
            })
            .collect();
        s.set_connections(edge, across)?;
        s.set_connections(second_part, outgoing)?;

        for (i, &lane) in first_lanes.iter().enumerate() {
            let target = second_lanes.get(i).or(second_lanes.last()).copied();
            if let Some(target) = target {
                move_children_behind(s, lane, target, offset)?;
            }
        }
        move_children_behind(s, edge, second_part, offset)?;

        s.network.require_recompute();
        Ok(junction)
    })?;

    log::info!("Kante {} bei {:.2} m geteilt", edge_id, offset);
    Ok(junction)
}

/// Teilt eine Kante und ihre Gegenkante mit einer gemeinsamen Junction.
pub fn split_edges_bidi(
    state: &mut EditorState,
    edge: ElementHandle,
    opposite: ElementHandle,
    position: Vec2,
) -> NetResult<ElementHandle> {
    let e = state.network.edge(edge)?;
    let o = state.network.edge(opposite)?;
    if o.from != e.to || o.to != e.from {
        return Err(NetError::invalid(format!(
            "{} ist keine Gegenkante von {}",
            o.id, e.id
        )));
    }
    state.with_group("Kanten beidseitig teilen", |s| {
        let junction = split_edge(s, edge, position, None)?;
        split_edge(s, opposite, position, Some(junction))?;
        Ok(junction)
    })
}

/// Fügt `inserted` in allen Routen direkt hinter `after` ein.
fn insert_after_in_routes(
    state: &mut EditorState,
    after: ElementHandle,
    inserted: ElementHandle,
) -> NetResult<()> {
    let routes: Vec<(ElementHandle, Vec<ElementHandle>)> = state
        .network
        .store()
        .iter()
        .filter(|(_, element)| matches!(element, Element::Demand(_)))
        .filter_map(|(h, element)| element.edge_list().map(|l| (h, l.clone())))
        .filter(|(_, list)| list.contains(&after))
        .collect();

    for (route, list) in routes {
        let mut updated = Vec::with_capacity(list.len() + 1);
        for h in list {
            updated.push(h);
            if h == after {
                updated.push(inserted);
            }
        }
        state.set_attr(route, AttrKey::Edges, AttrValue::Handles(updated))?;
    }
    Ok(())
}

/// Verschiebt Kinder ab Offset `offset` auf das zweite Teilstück.
///
/// Kinder davor bleiben; ein über den Teilungspunkt reichendes Ende wird
/// auf `offset` begrenzt.
fn move_children_behind(
    state: &mut EditorState,
    parent: ElementHandle,
    target: ElementHandle,
    offset: f32,
) -> NetResult<()> {
    for child in state.network.children(parent) {
        let element = state.network.element(child)?;
        if matches!(element, Element::Lane(_)) {
            continue;
        }
        let Some((start, end)) = element.lane_offsets() else {
            continue;
        };

        if start >= offset {
            state.reparent(child, parent, target)?;
            state.set_attr(
                child,
                AttrKey::StartPos,
                AttrValue::Float((start - offset) as f64),
            )?;
            if let Some(end) = end {
                state.set_attr(
                    child,
                    AttrKey::EndPos,
                    AttrValue::Float((end - offset) as f64),
                )?;
            }
        } else if end.is_some_and(|end| end > offset) {
            state.set_attr(child, AttrKey::EndPos, AttrValue::Float(offset as f64))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_name_appends_rounded_offset() {
        let net = Network::new();
        assert_eq!(split_name(&net, "E0", false, 40.3), "E0.40");
        assert_eq!(split_name(&net, "E0", false, 40.6), "E0.41");
    }

    #[test]
    fn split_name_strips_previous_suffix() {
        let net = Network::new();
        assert_eq!(split_name(&net, "E0.40", true, 10.0), "E0.50");
        assert_eq!(split_name(&net, "E0.40", false, 10.0), "E0.40.10");
        assert_eq!(split_name(&net, "Main.x", true, 5.0), "Main.x.5");
    }
}
