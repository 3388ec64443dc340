//! Use-Case: Aufräumen (isolierte Junctions, Routen, ungültige Elemente).

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;

use super::crossings::delete_crossing;
use super::elements::remove_with_dependents;
use crate::app::EditorState;
use crate::core::{Category, DemandTag, ElementHandle, NetResult, Network};

/// Entfernt alle Junctions ohne Kanten; liefert die Anzahl.
pub fn remove_solitary_junctions(state: &mut EditorState) -> NetResult<usize> {
    let solitary: Vec<_> = state
        .network
        .junctions()
        .into_iter()
        .filter(|j| state.network.hierarchy().is_isolated(*j))
        .collect();
    if solitary.is_empty() {
        log::debug!("Keine isolierten Junctions vorhanden");
        return Ok(0);
    }

    let count = solitary.len();
    state.with_group("Isolierte Junctions entfernen", |s| {
        for junction in solitary {
            s.remove_element(junction)?;
        }
        s.network.require_recompute();
        Ok(())
    })?;
    log::info!("{} isolierte Junction(s) entfernt", count);
    Ok(count)
}

/// Entfernt Routen, die von keinem Fahrzeug benutzt werden; liefert die Anzahl.
pub fn clean_unused_routes(state: &mut EditorState) -> NetResult<usize> {
    let unused: Vec<_> = state
        .network
        .retrieve(Category::Demand(DemandTag::Route))
        .into_iter()
        .filter(|r| state.network.hierarchy().children(*r).is_empty())
        .collect();
    if unused.is_empty() {
        log::debug!("Keine unbenutzten Routen vorhanden");
        return Ok(0);
    }

    let count = unused.len();
    state.with_group("Unbenutzte Routen entfernen", |s| {
        for route in unused {
            s.remove_element(route)?;
        }
        Ok(())
    })?;
    log::info!("{} unbenutzte Route(n) entfernt", count);
    Ok(count)
}

/// `true`, wenn der Überweg nur existierende, an seiner Junction hängende Kanten quert.
fn crossing_is_valid(net: &Network, crossing: ElementHandle) -> NetResult<bool> {
    let edges = &net.crossing(crossing)?.edges;
    let incident = net.incident_edges(net.crossing_junction(crossing)?);
    Ok(!edges.is_empty() && edges.iter().all(|e| incident.contains(e)))
}

/// Entfernt Überwege, deren Kanten fehlen oder nicht mehr an der Junction liegen.
pub fn clean_invalid_crossings(state: &mut EditorState) -> NetResult<usize> {
    let mut invalid = Vec::new();
    for crossing in state.network.retrieve(Category::Crossing) {
        if !crossing_is_valid(&state.network, crossing)? {
            invalid.push(crossing);
        }
    }
    if invalid.is_empty() {
        log::debug!("Keine ungültigen Überwege vorhanden");
        return Ok(0);
    }

    let count = invalid.len();
    state.with_group("Ungültige Überwege entfernen", |s| {
        for crossing in invalid {
            delete_crossing(s, crossing)?;
        }
        Ok(())
    })?;
    log::info!("{} ungültige(r) Überweg(e) entfernt", count);
    Ok(count)
}

/// Führt Routen mit identischer Kantenliste zusammen; liefert die Anzahl entfernter Routen.
///
/// Routen mit Stops bleiben unberührt. Pro Kantenliste bleibt die Route mit
/// der kleinsten ID erhalten und übernimmt die Fahrzeuge der übrigen.
pub fn join_routes(state: &mut EditorState) -> NetResult<usize> {
    let mut routes = Vec::new();
    for route in state.network.retrieve(Category::Demand(DemandTag::Route)) {
        let has_stops = state
            .network
            .children(route)
            .iter()
            .any(|c| state.network.demand(*c).is_ok_and(|d| d.tag == DemandTag::Stop));
        if !has_stops {
            let r = state.network.demand(route)?;
            routes.push((r.id.clone(), r.edges.clone(), route));
        }
    }
    routes.sort_by(|a, b| a.0.cmp(&b.0));

    let mut groups: IndexMap<Vec<ElementHandle>, Vec<ElementHandle>> = IndexMap::new();
    for (_, edges, route) in routes {
        groups.entry(edges).or_default().push(route);
    }
    let duplicates: Vec<(ElementHandle, Vec<ElementHandle>)> = groups
        .into_values()
        .filter_map(|mut group| {
            if group.len() < 2 {
                return None;
            }
            let keeper = group.remove(0);
            Some((keeper, group))
        })
        .collect();
    if duplicates.is_empty() {
        log::debug!("Keine doppelten Routen vorhanden");
        return Ok(0);
    }

    let count = duplicates.iter().map(|(_, d)| d.len()).sum();
    state.with_group("Routen zusammenführen", |s| {
        for (keeper, removed) in duplicates {
            for route in removed {
                for child in s.network.children(route) {
                    s.reparent(child, route, keeper)?;
                }
                s.remove_element(route)?;
            }
        }
        Ok(())
    })?;
    log::info!("{} doppelte Route(n) zusammengeführt", count);
    Ok(count)
}

/// `true`, wenn `to` von `from` aus über abgehende Kanten erreichbar ist.
fn reachable(net: &Network, from: ElementHandle, to: ElementHandle) -> NetResult<bool> {
    let mut visited = HashSet::from([from]);
    let mut queue = VecDeque::from([from]);
    while let Some(edge) = queue.pop_front() {
        if edge == to {
            return Ok(true);
        }
        for next in net.outgoing_edges(net.edge(edge)?.to) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    Ok(false)
}

/// Prüft die Kantenliste einer Route, eines Trips oder eines Flows.
///
/// Routen brauchen direkt aufeinanderfolgende Kanten, Trips und Flows nur
/// einen befahrbaren Weg zwischen ihren Kanten.
fn demand_is_valid(net: &Network, demand: ElementHandle) -> NetResult<bool> {
    let d = net.demand(demand)?;
    if d.edges.is_empty() || d.edges.iter().any(|e| net.edge(*e).is_err()) {
        return Ok(false);
    }
    for pair in d.edges.windows(2) {
        let connected = if d.tag == DemandTag::Route {
            net.edge(pair[0])?.to == net.edge(pair[1])?.from
        } else {
            reachable(net, pair[0], pair[1])?
        };
        if !connected {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Entfernt Routen, Trips und Flows mit unbefahrbarer Kantenliste samt Abhängigen.
pub fn clean_invalid_demand_elements(state: &mut EditorState) -> NetResult<usize> {
    let mut invalid = Vec::new();
    for tag in [DemandTag::Route, DemandTag::Flow, DemandTag::Trip] {
        for demand in state.network.retrieve(Category::Demand(tag)) {
            if !demand_is_valid(&state.network, demand)? {
                invalid.push(demand);
            }
        }
    }
    if invalid.is_empty() {
        log::debug!("Keine ungültigen Demand-Elemente vorhanden");
        return Ok(0);
    }

    let count = invalid.len();
    state.with_group("Ungültige Demand-Elemente entfernen", |s| {
        for demand in invalid {
            remove_with_dependents(s, demand)?;
        }
        Ok(())
    })?;
    log::info!("{} ungültige(s) Demand-Element(e) entfernt", count);
    Ok(count)
}
