//! Use-Case: Abgeleitete Netz-Logik neu berechnen.
//!
//! Normale Neuberechnung übernimmt Verbindungen und Ampelprogramme des
//! Builders für alle Junctions mit ungültiger Logik. Die volatile Variante
//! baut Junctions und Kanten komplett neu auf und verwirft die Undo-Historie.

use std::collections::HashMap;

use crate::app::builder::{ComputeRequest, NetworkTopology};
use crate::app::EditorState;
use crate::core::{
    Category, DemandElement, DemandTag, Edge, Element, ElementHandle, ElementSnapshot, Junction,
    NetError, NetResult, Network, ParentLink, SaveCategory,
};
use crate::shared::EditorOptions;

/// Ergebnis von [`compute_network`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputeReport {
    /// `false` wenn nichts zu tun war
    pub recomputed: bool,
    /// Anzahl Junctions, deren Logik neu berechnet wurde
    pub junctions: usize,
    /// Beim volatilen Neuaufbau verworfene Elemente (Kategorie, ID)
    pub dropped: Vec<(Category, String)>,
}

/// Stellt sicher, dass der geschützte Standard-Fahrzeugtyp existiert.
///
/// Idempotent; ändert die Speicher-Flags nicht.
pub fn ensure_default_elements(net: &mut Network, options: &EditorOptions) -> NetResult<()> {
    let category = Category::Demand(DemandTag::VType);
    if net.lookup(category, &options.default_vtype_id).is_ok() {
        return Ok(());
    }
    let was_saved = net.is_saved(SaveCategory::Demand);
    let snapshot = ElementSnapshot {
        handle: net.allocate_handle(),
        element: Element::Demand(DemandElement {
            is_default: true,
            ..DemandElement::new(options.default_vtype_id.clone(), DemandTag::VType)
        }),
        parents: Vec::new(),
    };
    net.insert_snapshot(&snapshot)?;
    if was_saved {
        net.mark_saved(SaveCategory::Demand);
    }
    log::debug!("Standard-Fahrzeugtyp {} angelegt", options.default_vtype_id);
    Ok(())
}

/// Berechnet Verbindungen und Ampelprogramme über den Netz-Builder.
///
/// Läuft nur, wenn eine Neuberechnung nötig ist oder `force` gesetzt ist.
/// Mit `volatile` werden Junctions und Kanten neu aufgebaut; alle bisherigen
/// Handles und die gesamte Undo-Historie werden dabei ungültig.
pub fn compute_network(
    state: &mut EditorState,
    force: bool,
    volatile: bool,
) -> NetResult<ComputeReport> {
    if !force && !volatile && !state.network.needs_recompute() {
        log::debug!("Netz ist aktuell, keine Neuberechnung nötig");
        return Ok(ComputeReport::default());
    }
    if state.command_log.is_group_open() {
        return Err(NetError::invalid(
            "Neuberechnung während einer offenen Undo-Gruppe nicht möglich",
        ));
    }

    let mut dropped = Vec::new();
    if volatile {
        state.command_log.clear();
        let topology = {
            let request = ComputeRequest {
                network: &state.network,
                junctions: state.network.junctions(),
                volatile: true,
            };
            let output = state
                .builder
                .compute(&request)
                .map_err(|e| NetError::invalid(format!("Netz-Builder fehlgeschlagen: {:#}", e)))?;
            match output.topology {
                Some(topology) => topology,
                None => NetworkTopology::from_network(&state.network)?,
            }
        };
        let (rebuilt, lost) = rebuild(&state.network, &topology)?;
        state.network = rebuilt;
        ensure_default_elements(&mut state.network, &state.options)?;
        for (category, id) in &lost {
            log::warn!("{} {} beim Neuaufbau verworfen", category, id);
        }
        dropped = lost;
    }

    let junctions = apply_logic(state, force || volatile)?;
    state.network.clear_recompute();
    log::info!(
        "Netz neu berechnet ({} Junction(s){})",
        junctions,
        if volatile { ", volatil" } else { "" }
    );
    Ok(ComputeReport {
        recomputed: true,
        junctions,
        dropped,
    })
}

/// Übernimmt Verbindungen und Ampelprogramme für Junctions mit ungültiger Logik.
fn apply_logic(state: &mut EditorState, all: bool) -> NetResult<usize> {
    let targets: Vec<ElementHandle> = state
        .network
        .junctions()
        .into_iter()
        .filter(|j| all || state.network.junction(*j).is_ok_and(|j| !j.logic_valid))
        .collect();
    if targets.is_empty() {
        return Ok(0);
    }

    let output = {
        let request = ComputeRequest {
            network: &state.network,
            junctions: targets.clone(),
            volatile: false,
        };
        state
            .builder
            .compute(&request)
            .map_err(|e| NetError::invalid(format!("Netz-Builder fehlgeschlagen: {:#}", e)))?
    };

    for (edge, connections) in output.connections {
        if state.network.contains(edge) {
            state.network.set_connections_raw(edge, connections)?;
        }
    }
    for program in output.tls_programs {
        state.network.set_tls_program(program);
    }
    for &junction in &targets {
        state.network.set_logic_valid_raw(junction, true)?;
    }
    Ok(targets.len())
}

/// Baut ein Netz aus der Builder-Topologie neu auf und hängt alle übrigen
/// Elemente per ID wieder ein.
fn rebuild(
    old: &Network,
    topology: &NetworkTopology,
) -> NetResult<(Network, Vec<(Category, String)>)> {
    let mut net = old.emptied();
    let mut remap: HashMap<ElementHandle, ElementHandle> = HashMap::new();
    let mut by_id: HashMap<String, ElementHandle> = HashMap::new();

    for record in &topology.junctions {
        let handle = net.allocate_handle();
        let junction = Junction {
            junction_type: record.junction_type,
            ..Junction::new(record.id.clone(), record.position)
        };
        net.insert_snapshot(&ElementSnapshot {
            handle,
            element: Element::Junction(junction),
            parents: Vec::new(),
        })?;
        by_id.insert(record.id.clone(), handle);
        if let Ok(old_handle) = old.lookup(Category::Junction, &record.id) {
            remap.insert(old_handle, handle);
        }
    }

    for record in &topology.edges {
        let (Some(&from), Some(&to)) = (by_id.get(&record.from), by_id.get(&record.to)) else {
            return Err(NetError::integrity(format!(
                "Kante {} verweist auf unbekannte Junction",
                record.id
            )));
        };
        let handle = net.allocate_handle();
        let edge = Edge {
            id: record.id.clone(),
            from,
            to,
            inner_shape: record.inner_shape.clone(),
            speed: record.speed,
            priority: record.priority,
            edge_type: record.edge_type.clone(),
            was_split: record.was_split,
            connections: Vec::new(),
            selected: false,
        };
        let parents = vec![
            ParentLink {
                parent: from,
                index: net.hierarchy().children(from).len(),
            },
            ParentLink {
                parent: to,
                index: net.hierarchy().children(to).len(),
            },
        ];
        net.insert_snapshot(&ElementSnapshot {
            handle,
            element: Element::Edge(edge),
            parents,
        })?;
        let old_edge = old.lookup(Category::Edge, &record.id).ok();
        if let Some(old_edge) = old_edge {
            remap.insert(old_edge, handle);
        }

        for lane in &record.lanes {
            let lane_handle = net.allocate_handle();
            let parents = vec![ParentLink {
                parent: handle,
                index: net.hierarchy().children(handle).len(),
            }];
            net.insert_snapshot(&ElementSnapshot {
                handle: lane_handle,
                element: Element::Lane(lane.clone()),
                parents,
            })?;
            if let Ok(old_lane) = old.lookup(Category::Lane, &lane.id) {
                remap.insert(old_lane, lane_handle);
            }
        }
    }

    let mut pending: Vec<ElementHandle> = old
        .store()
        .iter()
        .filter(|(_, e)| !matches!(e, Element::Junction(_) | Element::Edge(_) | Element::Lane(_)))
        .map(|(h, _)| h)
        .collect();
    pending.sort_unstable();

    let mut dropped = Vec::new();
    loop {
        let mut progress = false;
        let mut waiting = Vec::new();
        for handle in pending {
            let element = old.element(handle)?;
            let parents = old.parents(handle);
            let vanished = parents.iter().any(|p| {
                !remap.contains_key(p)
                    && old
                        .element(*p)
                        .is_ok_and(|e| e.category().is_topology())
            });
            if vanished {
                dropped.push((element.category(), element.id().to_string()));
                continue;
            }
            if !parents.iter().all(|p| remap.contains_key(p)) {
                waiting.push(handle);
                continue;
            }

            let mut element = element.clone();
            if let Some(list) = element.edge_list_mut() {
                list.retain(|e| remap.contains_key(e));
                for e in list.iter_mut() {
                    *e = remap[&*e];
                }
                if list.is_empty() {
                    dropped.push((element.category(), element.id().to_string()));
                    continue;
                }
            }

            let new_handle = net.allocate_handle();
            let links: Vec<ParentLink> = parents
                .iter()
                .map(|p| {
                    let parent = remap[p];
                    ParentLink {
                        parent,
                        index: net.hierarchy().children(parent).len(),
                    }
                })
                .collect();
            net.insert_snapshot(&ElementSnapshot {
                handle: new_handle,
                element,
                parents: links,
            })?;
            remap.insert(handle, new_handle);
            progress = true;
        }

        if waiting.is_empty() {
            break;
        }
        if !progress {
            for handle in waiting {
                let element = old.element(handle)?;
                dropped.push((element.category(), element.id().to_string()));
            }
            break;
        }
        pending = waiting;
    }

    net.require_save(SaveCategory::Network);
    net.require_recompute();
    Ok((net, dropped))
}
