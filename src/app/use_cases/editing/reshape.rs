//! Use-Case: Junctions durch Geometrie ersetzen oder in Endpunkte aufteilen.

use glam::Vec2;
use indexmap::IndexMap;

use super::connections::clear_junction_connections;
use super::edges::{create_edge, replace_incoming_edge, EdgeCreateOptions, EdgeTemplate};
use super::junctions::{create_junction, delete_junction};
use crate::app::EditorState;
use crate::core::{
    geometry, AttrKey, AttrValue, EdgeEnd, ElementHandle, NetError, NetResult, Network,
};
use crate::shared::options::POSITION_EPSILON;

/// Kosinus des größten Winkels, bei dem eine Verbindung noch geradeaus führt (30°).
const STRAIGHT_COS: f32 = 0.866;

/// `true`, wenn `continuation` die Kante `begin` ohne Unterschied fortsetzt.
fn expandable(net: &Network, begin: ElementHandle, continuation: ElementHandle) -> NetResult<bool> {
    Ok(EdgeTemplate::from_edge(net, begin)? == EdgeTemplate::from_edge(net, continuation)?)
}

/// Paare (ankommend, Fortsetzung), über die die Junction wegfallen kann.
///
/// Entfernbar sind reine Geometriepunkte: eine ankommende und eine abgehende
/// Kante, oder die Mitte einer zweispurigen Straße mit je zwei Kanten.
fn joinable_pairs(
    net: &Network,
    junction: ElementHandle,
) -> NetResult<Vec<(ElementHandle, ElementHandle)>> {
    let j = net.junction(junction)?;
    if j.junction_type.has_tls() || !net.crossings_of(junction).is_empty() {
        return Err(NetError::invalid(format!(
            "Junction {} hat Ampel oder Überwege",
            j.id
        )));
    }
    let incoming = net.incoming_edges(junction);
    let outgoing = net.outgoing_edges(junction);

    let mut pairs = Vec::with_capacity(incoming.len());
    match (incoming.as_slice(), outgoing.as_slice()) {
        ([begin], [continuation]) => pairs.push((*begin, *continuation)),
        ([_, _], [_, _]) => {
            for &begin in &incoming {
                let origin = net.edge(begin)?.from;
                let (opposite, others): (Vec<ElementHandle>, Vec<ElementHandle>) = outgoing
                    .iter()
                    .partition(|o| net.edge(**o).is_ok_and(|o| o.to == origin));
                match (opposite.as_slice(), others.as_slice()) {
                    ([_], [continuation]) => pairs.push((begin, *continuation)),
                    _ => {
                        return Err(NetError::invalid(format!(
                            "Junction {} ist keine Straßenmitte",
                            j.id
                        )))
                    }
                }
            }
        }
        _ => {
            return Err(NetError::invalid(format!(
                "Junction {} hat {} ankommende und {} abgehende Kanten",
                j.id,
                incoming.len(),
                outgoing.len()
            )))
        }
    }

    for &(begin, continuation) in &pairs {
        if net.edge(begin)?.from == net.edge(continuation)?.to {
            return Err(NetError::invalid(format!(
                "Junction {} ist ein Wendepunkt",
                j.id
            )));
        }
        if !expandable(net, begin, continuation)? {
            return Err(NetError::invalid(format!(
                "Kanten an Junction {} unterscheiden sich in Spuren oder Attributen",
                j.id
            )));
        }
    }
    Ok(pairs)
}

/// Alle Kinder von Kante und Spuren, die auf der Kante platziert sind.
fn placed_children(net: &Network, edge: ElementHandle) -> NetResult<Vec<ElementHandle>> {
    let lanes = net.lanes_of(edge);
    let mut placed = Vec::new();
    for holder in lanes.iter().copied().chain(std::iter::once(edge)) {
        for child in net.children(holder) {
            if !lanes.contains(&child) && net.element(child)?.lane_offsets().is_some() {
                placed.push(child);
            }
        }
    }
    Ok(placed)
}

/// Verschiebt Start-/End-Offsets um `shift` und begrenzt sie auf `0..length`.
fn shift_offsets(
    state: &mut EditorState,
    children: &[ElementHandle],
    shift: f32,
    length: f32,
) -> NetResult<()> {
    for &child in children {
        let Some((start, end)) = state.network.element(child)?.lane_offsets() else {
            continue;
        };
        let start = (start + shift).clamp(0.0, length);
        state.set_attr(child, AttrKey::StartPos, AttrValue::Float(start as f64))?;
        if let Some(end) = end {
            let end = (end + shift).clamp(start, length);
            state.set_attr(child, AttrKey::EndPos, AttrValue::Float(end as f64))?;
        }
    }
    Ok(())
}

/// Ersetzt eine Junction durch einen inneren Geometriepunkt.
///
/// Jede ankommende Kante übernimmt ihre Fortsetzung: Geometrie, Ziel,
/// platzierte Elemente und Verbindungen. Offsets der übernommenen Elemente
/// verschieben sich um die Länge der ankommenden Kante.
pub fn replace_junction_by_geometry(
    state: &mut EditorState,
    junction: ElementHandle,
) -> NetResult<()> {
    let id = state.network.junction(junction)?.id.clone();
    let position = state.network.junction(junction)?.position;
    let pairs = joinable_pairs(&state.network, junction)?;

    state.with_group("Junction durch Geometrie ersetzen", |s| {
        clear_junction_connections(s, junction)?;
        for (begin, continuation) in pairs {
            let begin_length = geometry::length(&s.network.edge_geometry(begin)?);
            let mut shape = s.network.edge(begin)?.inner_shape.clone();
            shape.push(position);
            for &p in &s.network.edge(continuation)?.inner_shape {
                if shape.last() != Some(&p) {
                    shape.push(p);
                }
            }
            let moved = placed_children(&s.network, continuation)?;

            replace_incoming_edge(s, continuation, begin)?;
            s.set_attr(begin, AttrKey::Shape, AttrValue::Shape(shape))?;
            let length = geometry::length(&s.network.edge_geometry(begin)?);
            shift_offsets(s, &moved, begin_length, length)?;
        }
        delete_junction(s, junction)
    })?;
    log::info!("Junction {} durch Geometrie ersetzt", id);
    Ok(())
}

/// Schnittpunkt einer an der Junction hängenden Kante.
struct Cut {
    edge: ElementHandle,
    end: EdgeEnd,
    position: Vec2,
    inner_shape: Vec<Vec2>,
    /// Verschiebung der Offsets (negativ für abgehende Kanten)
    shift: f32,
    length: f32,
}

fn cut_edge(net: &Network, edge: ElementHandle, junction: ElementHandle, distance: f32) -> NetResult<Cut> {
    let e = net.edge(edge)?;
    let points = net.edge_geometry(edge)?;
    let total = geometry::length(&points);
    let distance = distance.min(total / 2.0);
    let end = if e.to == junction { EdgeEnd::To } else { EdgeEnd::From };
    let offset = match end {
        EdgeEnd::To => total - distance,
        EdgeEnd::From => distance,
    };
    let (first, second) = geometry::split_at(&points, offset)
        .ok_or_else(|| NetError::invalid(format!("Kante {} ist zu kurz zum Aufteilen", e.id)))?;
    let (kept, position, shift) = match end {
        EdgeEnd::To => {
            let position = first.last().copied();
            (first, position, 0.0)
        }
        EdgeEnd::From => {
            let position = second.first().copied();
            (second, position, -distance)
        }
    };
    let position =
        position.ok_or_else(|| NetError::integrity(format!("Kante {} ohne Geometrie", e.id)))?;
    Ok(Cut {
        edge,
        end,
        position,
        inner_shape: kept[1..kept.len() - 1].to_vec(),
        shift,
        length: total - distance,
    })
}

/// Teilt eine Junction in je eine neue Junction pro Kanten-Endpunkt.
///
/// Jede Kante endet danach `junction_split_distance` vor der alten Position;
/// zusammenfallende Endpunkte (Hin- und Rückrichtung) teilen sich eine
/// Junction. Mit `reconnect` werden Geradeaus-Verbindungen als neue Kanten
/// zwischen den Teil-Junctions nachgebaut. Gibt die neuen Junctions zurück.
pub fn split_junction(
    state: &mut EditorState,
    junction: ElementHandle,
    reconnect: bool,
) -> NetResult<Vec<ElementHandle>> {
    let id = state.network.junction(junction)?.id.clone();
    let distance = state.options.junction_split_distance;
    if !(distance.is_finite() && distance > 0.0) {
        return Err(NetError::invalid(format!(
            "Aufteil-Abstand {} ungültig",
            distance
        )));
    }

    let mut endpoints: Vec<(Vec2, Vec<Cut>)> = Vec::new();
    for edge in state.network.incident_edges(junction) {
        let cut = cut_edge(&state.network, edge, junction, distance)?;
        match endpoints
            .iter_mut()
            .find(|(p, _)| p.distance(cut.position) <= POSITION_EPSILON)
        {
            Some((_, cuts)) => cuts.push(cut),
            None => endpoints.push((cut.position, vec![cut])),
        }
    }
    if endpoints.len() < 2 {
        log::debug!("Junction {} hat weniger als zwei Endpunkte", id);
        return Ok(Vec::new());
    }

    let mut straight: IndexMap<(ElementHandle, ElementHandle), Vec<usize>> = IndexMap::new();
    for incoming in state.network.incoming_edges(junction) {
        let Some(in_dir) = geometry::end_direction(&state.network.edge_geometry(incoming)?, false)
        else {
            continue;
        };
        for c in &state.network.edge(incoming)?.connections {
            let Ok(out) = state.network.edge(c.to_edge) else {
                continue;
            };
            if out.from != junction {
                continue;
            }
            let out_dir = geometry::end_direction(&state.network.edge_geometry(c.to_edge)?, true);
            if out_dir.is_some_and(|d| d.dot(in_dir) >= STRAIGHT_COS) {
                straight
                    .entry((incoming, c.to_edge))
                    .or_default()
                    .push(c.from_lane);
            }
        }
    }

    let created = state.with_group("Junction aufteilen", |s| {
        s.invalidate_junction(junction)?;
        let mut created = Vec::with_capacity(endpoints.len());
        for (position, cuts) in endpoints {
            let new_junction = create_junction(s, position)?;
            for cut in cuts {
                let moved = placed_children(&s.network, cut.edge)?;
                s.reconnect(cut.edge, cut.end, new_junction)?;
                s.set_attr(cut.edge, AttrKey::Shape, AttrValue::Shape(cut.inner_shape))?;
                shift_offsets(s, &moved, cut.shift, cut.length)?;
            }
            created.push(new_junction);
        }

        if reconnect {
            for ((incoming, outgoing), from_lanes) in straight {
                let source = s.network.edge(incoming)?.to;
                let dest = s.network.edge(outgoing)?.from;
                if source == dest {
                    continue;
                }
                let mut template = EdgeTemplate::from_edge(&s.network, incoming)?;
                template.lanes = from_lanes
                    .iter()
                    .filter_map(|i| template.lanes.get(*i).cloned())
                    .collect();
                if template.lanes.is_empty() {
                    continue;
                }
                let options = EdgeCreateOptions {
                    allow_duplicate_geometry: true,
                    ..EdgeCreateOptions::default()
                };
                create_edge(s, source, dest, Some(&template), None, options)?;
            }
        }

        delete_junction(s, junction)?;
        Ok(created)
    })?;
    log::info!("Junction {} in {} Junctions aufgeteilt", id, created.len());
    Ok(created)
}

/// `true`, wenn die Junction durch einen Geometriepunkt ersetzt werden kann.
pub fn is_replaceable_by_geometry(net: &Network, junction: ElementHandle) -> bool {
    joinable_pairs(net, junction).is_ok()
}
