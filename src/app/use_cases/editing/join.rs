//! Use-Case: Mehrere Junctions zu einer einzigen zusammenfassen.

use std::collections::HashSet;

use glam::Vec2;

use super::edges::delete_edge;
use super::junctions::delete_junction;
use crate::app::EditorState;
use crate::core::{
    AttrKey, AttrValue, Category, Crossing, EdgeEnd, Element, ElementHandle, Junction, NetError,
    NetResult, Network,
};
use crate::shared::POSITION_EPSILON;

/// Ergebnis eines Join-Vorgangs.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    /// Die neu entstandene Junction
    pub joined: ElementHandle,
    /// Nicht selektierte Junctions, die wegen Positionskollision aufgenommen wurden
    pub absorbed: Vec<ElementHandle>,
}

/// Nicht zum Cluster gehörende Junction an `position`.
fn foreign_junction_at(
    net: &Network,
    position: Vec2,
    cluster: &[ElementHandle],
) -> Option<ElementHandle> {
    net.junctions().into_iter().find(|h| {
        !cluster.contains(h)
            && net
                .junction(*h)
                .is_ok_and(|j| j.position.distance(position) <= POSITION_EPSILON)
    })
}

fn position_occupied(net: &Network, position: Vec2) -> bool {
    net.junctions().into_iter().any(|h| {
        net.junction(h)
            .is_ok_and(|j| j.position.distance(position) <= POSITION_EPSILON)
    })
}

/// Höchstzahl an Versatzschritten, bevor der Join abgebrochen wird.
const MAX_COLLISION_STEPS: usize = 10_000;

/// Versetzt `start` diagonal, bis keine Junction mehr auf der Position liegt.
///
/// Der Schritt wird mindestens auf die doppelte f32-Auflösung der Koordinate
/// angehoben, sonst bliebe die Position bei großen Koordinaten stehen.
fn free_position(net: &Network, start: Vec2, step: f32) -> NetResult<Vec2> {
    if !(step.is_finite() && step > 0.0) {
        return Err(NetError::invalid(format!(
            "Ungültiger Kollisionsschritt {} für Junction-Join",
            step
        )));
    }
    let mut position = start;
    for _ in 0..MAX_COLLISION_STEPS {
        if !position_occupied(net, position) {
            return Ok(position);
        }
        let resolution = position.abs().max_element() * f32::EPSILON * 2.0;
        position += Vec2::splat(step.max(resolution));
    }
    Err(NetError::invalid(format!(
        "Keine freie Junction-Position nahe {} nach {} Schritten",
        start, MAX_COLLISION_STEPS
    )))
}

/// Fasst alle selektierten Junctions zusammen.
pub fn join_selected_junctions(state: &mut EditorState) -> NetResult<JoinOutcome> {
    let selected = state.network.selected_junctions();
    join_junctions(state, &selected)
}

/// Fasst die übergebenen Junctions zu einer Junction zusammen.
///
/// Liegt die vom Builder berechnete Position auf einer fremden Junction, wird
/// diese in den Cluster aufgenommen und die Analyse wiederholt. Jeder Neustart
/// vergrößert den Cluster, daher terminiert die Schleife.
pub fn join_junctions(
    state: &mut EditorState,
    junctions: &[ElementHandle],
) -> NetResult<JoinOutcome> {
    let mut cluster: Vec<ElementHandle> = junctions.to_vec();
    cluster.sort_unstable();
    cluster.dedup();
    if cluster.len() < 2 {
        return Err(NetError::invalid(
            "Zum Zusammenfassen werden mindestens zwei Junctions benötigt",
        ));
    }
    for &j in &cluster {
        state.network.junction(j)?;
    }

    let outcome = state.with_group("Junctions zusammenfassen", |s| {
        let mut absorbed = Vec::new();
        let info = loop {
            let info = s.builder.analyze_cluster(&s.network, &cluster)?;
            match foreign_junction_at(&s.network, info.position, &cluster) {
                Some(other) => {
                    log::debug!(
                        "Junction {} liegt auf der Cluster-Position und wird aufgenommen",
                        s.network.junction(other)?.id
                    );
                    s.set_attr(other, AttrKey::Selected, AttrValue::Bool(true))?;
                    cluster.push(other);
                    cluster.sort_unstable();
                    absorbed.push(other);
                }
                None => break info,
            }
        };

        let position = free_position(
            &s.network,
            info.position,
            s.options.junction_collision_step,
        )?;

        let mut incoming = Vec::new();
        let mut outgoing = Vec::new();
        for &member in &cluster {
            incoming.extend(s.network.incoming_edges(member));
            outgoing.extend(s.network.outgoing_edges(member));
        }

        let joined_junction = Junction {
            junction_type: info.junction_type,
            ..Junction::new(s.network.generate_id(Category::Junction), position)
        };
        let joined = s.create_element(Element::Junction(joined_junction), &[])?;

        let mut old_crossings: Vec<Crossing> = Vec::new();
        for &member in &cluster {
            for crossing in s.network.crossings_of(member) {
                old_crossings.push(s.network.crossing(crossing)?.clone());
                s.remove_element(crossing)?;
            }
        }
        for &member in &cluster {
            s.invalidate_junction(member)?;
        }

        for edge in incoming {
            s.reconnect(edge, EdgeEnd::To, joined)?;
        }
        let mut within = HashSet::new();
        for edge in outgoing {
            if s.network.edge(edge)?.to == joined {
                within.insert(edge);
                delete_edge(s, edge)?;
            } else {
                s.reconnect(edge, EdgeEnd::From, joined)?;
            }
        }

        let joined_has_tls = info.has_tls;
        for crossing in old_crossings {
            let keep = crossing
                .edges
                .iter()
                .all(|e| !within.contains(e) && s.network.contains(*e));
            if !keep {
                continue;
            }
            let remapped = Crossing {
                id: s.network.generate_id(Category::Crossing),
                priority: crossing.priority || joined_has_tls,
                selected: false,
                ..crossing
            };
            s.create_element(Element::Crossing(remapped), &[joined])?;
        }

        for &member in &cluster {
            delete_junction(s, member)?;
        }

        if s.network.is_id_free(Category::Junction, &info.id) {
            s.rename_element(joined, &info.id)?;
        }
        if position != info.position {
            s.set_attr(joined, AttrKey::Position, AttrValue::Point(info.position))?;
        }
        s.invalidate_junction(joined)?;
        Ok(JoinOutcome { joined, absorbed })
    })?;

    log::info!(
        "{} Junctions zu {} zusammengefasst",
        cluster.len(),
        state.network.junction(outcome.joined)?.id
    );
    Ok(outcome)
}
