//! Use-Case: Kanten anlegen, löschen, umdrehen, spiegeln und ersetzen.

use glam::Vec2;

use super::elements::remove_with_dependents;
use super::junctions::create_junction;
use crate::app::EditorState;
use crate::core::permissions;
use crate::core::{
    geometry, AttrKey, AttrValue, Category, EdgeEnd, Edge, Element, ElementHandle, JunctionType,
    Lane, NetError, NetResult, Network,
};
use crate::shared::EditorOptions;

/// Konfiguration einer einzelnen Spur für neue Kanten.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneTemplate {
    pub speed: f32,
    pub width: f32,
    pub allow: String,
}

/// Vorlage für Kanten-Attribute und Spur-Konfiguration.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeTemplate {
    pub speed: f32,
    pub priority: i32,
    pub edge_type: String,
    pub lanes: Vec<LaneTemplate>,
}

impl EdgeTemplate {
    /// Vorlage aus den konfigurierten Standardwerten.
    pub fn from_options(options: &EditorOptions) -> Self {
        let lane = LaneTemplate {
            speed: options.default_speed,
            width: options.default_lane_width,
            allow: String::new(),
        };
        Self {
            speed: options.default_speed,
            priority: options.default_priority,
            edge_type: options.default_edge_type.clone(),
            lanes: vec![lane; options.default_lane_number.max(1)],
        }
    }

    /// Übernimmt Attribute und Spuren einer bestehenden Kante.
    pub fn from_edge(net: &Network, edge: ElementHandle) -> NetResult<Self> {
        let e = net.edge(edge)?;
        let lanes = net
            .lanes_of(edge)
            .into_iter()
            .map(|h| {
                let lane = net.lane(h)?;
                Ok(LaneTemplate {
                    speed: lane.speed,
                    width: lane.width,
                    allow: lane.allow.clone(),
                })
            })
            .collect::<NetResult<Vec<_>>>()?;
        Ok(Self {
            speed: e.speed,
            priority: e.priority,
            edge_type: e.edge_type.clone(),
            lanes,
        })
    }
}

/// Zusatzoptionen für [`create_edge`].
#[derive(Debug, Clone, Default)]
pub struct EdgeCreateOptions {
    /// Doppelte gerade Kanten zwischen denselben Junctions zulassen
    pub allow_duplicate_geometry: bool,
    /// Innere Stützpunkte der neuen Kante
    pub inner_shape: Vec<Vec2>,
    /// Markiert die Kante als Teilstück einer geteilten Kante
    pub was_split: bool,
}

/// Erstellt eine Kante von `source` nach `dest`.
///
/// Gibt `Ok(None)` zurück, wenn bereits eine gerade Kante zwischen denselben
/// Junctions existiert und Duplikate nicht erlaubt sind.
pub fn create_edge(
    state: &mut EditorState,
    source: ElementHandle,
    dest: ElementHandle,
    template: Option<&EdgeTemplate>,
    suggested_id: Option<&str>,
    options: EdgeCreateOptions,
) -> NetResult<Option<ElementHandle>> {
    state.network.junction(source)?;
    state.network.junction(dest)?;
    if source == dest {
        return Err(NetError::invalid("Kante mit gleicher Start- und Ziel-Junction"));
    }

    let allow_duplicate = options.allow_duplicate_geometry || state.options.allow_duplicate_geometry;
    if options.inner_shape.is_empty() && !allow_duplicate {
        let duplicate = state
            .network
            .edges_between(source, dest)
            .into_iter()
            .any(|e| state.network.edge(e).is_ok_and(|e| e.inner_shape.is_empty()));
        if duplicate {
            log::debug!("Gerade Kante {} -> {} existiert bereits", source, dest);
            return Ok(None);
        }
    }

    let template = match template {
        Some(t) => t.clone(),
        None => EdgeTemplate::from_options(&state.options),
    };
    if template.lanes.is_empty() {
        return Err(NetError::invalid("Kante braucht mindestens eine Spur"));
    }

    let handle = state.with_group("Kante erstellen", |s| {
        let id = match suggested_id {
            Some(id) if s.network.is_id_free(Category::Edge, id) => id.to_string(),
            _ => s.network.generate_id(Category::Edge),
        };
        let edge = Edge {
            id: id.clone(),
            from: source,
            to: dest,
            inner_shape: options.inner_shape,
            speed: template.speed,
            priority: template.priority,
            edge_type: template.edge_type.clone(),
            was_split: options.was_split,
            connections: Vec::new(),
            selected: false,
        };
        let handle = s.create_element(Element::Edge(edge), &[source, dest])?;
        for (index, lane) in template.lanes.iter().enumerate() {
            let lane = Lane {
                id: Lane::lane_id(&id, index),
                index,
                speed: lane.speed,
                width: lane.width,
                allow: lane.allow.clone(),
                selected: false,
            };
            s.create_element(Element::Lane(lane), &[handle])?;
        }
        s.invalidate_junction(source)?;
        s.invalidate_junction(dest)?;
        Ok(handle)
    })?;

    log::info!(
        "Kante {} erstellt ({} Spur(en))",
        state.network.edge(handle)?.id,
        template.lanes.len()
    );
    Ok(Some(handle))
}

/// Löscht eine Kante samt Spuren und allen darauf platzierten Elementen.
pub fn delete_edge(state: &mut EditorState, edge: ElementHandle) -> NetResult<()> {
    let e = state.network.edge(edge)?;
    let (id, from, to) = (e.id.clone(), e.from, e.to);

    state.with_group("Kante löschen", |s| {
        let lanes = s.network.lanes_of(edge);
        for &lane in &lanes {
            for child in s.network.children(lane) {
                remove_with_dependents(s, child)?;
            }
        }
        for child in s.network.children(edge) {
            if !lanes.contains(&child) {
                remove_with_dependents(s, child)?;
            }
        }

        let routes: Vec<ElementHandle> = s
            .network
            .store()
            .iter()
            .filter(|(_, element)| matches!(element, Element::Demand(_)))
            .filter(|(_, element)| element.edge_list().is_some_and(|l| l.contains(&edge)))
            .map(|(h, _)| h)
            .collect();
        for route in routes {
            if s.network.contains(route) {
                remove_with_dependents(s, route)?;
            }
        }

        for holder in s.replace_in_edge_lists(edge, None)? {
            remove_with_dependents(s, holder)?;
        }

        s.invalidate_junction(from)?;
        s.invalidate_junction(to)?;

        let priority = AttrValue::JunctionType(JunctionType::Priority);
        if s.network.junction(from)?.junction_type.has_tls()
            && s.network.outgoing_edges(from).len() <= 1
        {
            s.set_attr(from, AttrKey::JunctionType, priority.clone())?;
        }
        if s.network.junction(to)?.junction_type.has_tls() && s.network.incoming_edges(to).len() <= 1
        {
            s.set_attr(to, AttrKey::JunctionType, priority)?;
        }

        for lane in lanes {
            s.remove_element(lane)?;
        }
        s.remove_element(edge)?;
        s.network.require_recompute();
        Ok(())
    })?;

    log::info!("Kante {} gelöscht", id);
    Ok(())
}

/// Dreht die Fahrtrichtung einer Kante um (ID und Spuren bleiben erhalten).
pub fn reverse_edge(state: &mut EditorState, edge: ElementHandle) -> NetResult<ElementHandle> {
    let e = state.network.edge(edge)?;
    let (id, from, to) = (e.id.clone(), e.from, e.to);
    let mut shape = e.inner_shape.clone();
    shape.reverse();
    let was_split = e.was_split;
    let template = EdgeTemplate::from_edge(&state.network, edge)?;

    let reversed = state.with_group("Kante umdrehen", |s| {
        delete_edge(s, edge)?;
        let options = EdgeCreateOptions {
            allow_duplicate_geometry: true,
            inner_shape: shape,
            was_split,
        };
        create_edge(s, to, from, Some(&template), Some(&id), options)?
            .ok_or_else(|| NetError::invalid(format!("Kante {} nicht umkehrbar", id)))
    })?;
    log::info!("Kante {} umgedreht", id);
    Ok(reversed)
}

/// Seitlicher Abstand einer gespiegelten Kante zusätzlich zur Kantenbreite.
const REVERSED_EDGE_GAP: f32 = 2.0;

/// Legt eine Gegenkante `-<id>` an.
///
/// Reine Schienenkanten bekommen ein Gegengleis zwischen denselben Junctions.
/// Alle anderen Kanten werden um ihre Breite nach links versetzt zwischen
/// zwei neuen Junctions gespiegelt; Kante und Junctions sind danach selektiert.
pub fn add_reversed_edge(state: &mut EditorState, edge: ElementHandle) -> NetResult<ElementHandle> {
    let e = state.network.edge(edge)?;
    let (id, from, to, was_split) = (e.id.clone(), e.from, e.to, e.was_split);
    let mut inner = e.inner_shape.clone();
    let template = EdgeTemplate::from_edge(&state.network, edge)?;
    let geometry = state.network.edge_geometry(edge)?;
    let rail = template
        .lanes
        .iter()
        .all(|l| !l.allow.is_empty() && permissions::is_railway(&l.allow));
    let reversed_id = format!("-{}", id);

    let reversed = state.with_group("Gegenkante hinzufügen", |s| {
        if rail {
            inner.reverse();
            let options = EdgeCreateOptions {
                allow_duplicate_geometry: true,
                inner_shape: inner,
                was_split,
            };
            return create_edge(s, to, from, Some(&template), Some(&reversed_id), options)?
                .ok_or_else(|| NetError::invalid(format!("Gegengleis zu {} nicht möglich", id)));
        }

        let width: f32 = template.lanes.iter().map(|l| l.width).sum();
        let mut moved = geometry::move_to_side(&geometry, width + REVERSED_EDGE_GAP);
        moved.reverse();
        let (Some(&start), Some(&end)) = (moved.first(), moved.last()) else {
            return Err(NetError::integrity(format!("Kante {} ohne Geometrie", id)));
        };
        let source = create_junction(s, start)?;
        let dest = create_junction(s, end)?;
        let options = EdgeCreateOptions {
            allow_duplicate_geometry: true,
            inner_shape: moved[1..moved.len() - 1].to_vec(),
            was_split,
        };
        let handle = create_edge(s, source, dest, Some(&template), Some(&reversed_id), options)?
            .ok_or_else(|| NetError::invalid(format!("Gegenkante zu {} nicht möglich", id)))?;
        for selected in [handle, source, dest] {
            s.set_attr(selected, AttrKey::Selected, AttrValue::Bool(true))?;
        }
        Ok(handle)
    })?;
    log::info!(
        "Gegenkante {} zu {} erstellt",
        state.network.edge(reversed)?.id,
        id
    );
    Ok(reversed)
}

/// Ersetzt `which` durch `by`, das danach am Ziel von `which` endet.
///
/// Alle Kinder von `which` und seinen Spuren wandern auf die Spur gleichen
/// Index von `by` (bzw. auf `by`), Kantenlisten und Verbindungen werden
/// umgeschrieben und `which` wird gelöscht.
pub fn replace_incoming_edge(
    state: &mut EditorState,
    which: ElementHandle,
    by: ElementHandle,
) -> NetResult<()> {
    if which == by {
        return Err(NetError::invalid("Kante kann nicht sich selbst ersetzen"));
    }
    let which_edge = state.network.edge(which)?;
    let which_id = which_edge.id.clone();
    let destination = which_edge.to;
    let connections = which_edge.connections.clone();
    let by_id = state.network.edge(by)?.id.clone();

    state.with_group("Kante ersetzen", |s| {
        s.reconnect(by, EdgeEnd::To, destination)?;

        let by_lanes = s.network.lanes_of(by);
        let which_lanes = s.network.lanes_of(which);
        for &lane in &which_lanes {
            let index = s.network.lane(lane)?.index;
            let target = by_lanes
                .get(index)
                .or(by_lanes.last())
                .copied()
                .ok_or_else(|| NetError::integrity(format!("Kante {} ohne Spuren", by_id)))?;
            for child in s.network.children(lane) {
                s.reparent(child, lane, target)?;
            }
        }
        for child in s.network.children(which) {
            if !which_lanes.contains(&child) {
                s.reparent(child, which, by)?;
            }
        }

        s.replace_in_edge_lists(which, Some(by))?;
        delete_edge(s, which)?;

        let by_lane_count = by_lanes.len();
        let migrated = connections
            .into_iter()
            .filter(|c| c.from_lane < by_lane_count && s.network.contains(c.to_edge))
            .collect();
        s.set_connections(by, migrated)
    })?;

    log::info!("Kante {} durch {} ersetzt", which_id, by_id);
    Ok(())
}
