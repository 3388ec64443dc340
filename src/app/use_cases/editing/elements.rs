//! Use-Case: Additionals, Demand- und Daten-Elemente anlegen und löschen.

use std::collections::BTreeMap;

use super::crossings::delete_crossing;
use super::edges::delete_edge;
use super::junctions::delete_junction;
use super::lanes::delete_lane;
use crate::app::EditorState;
use crate::core::{
    geometry, Additional, Category, DataInterval, DataSet, DemandElement, DemandTag, Element,
    ElementHandle, GenericData, GenericDataTag, NetError, NetResult,
};

/// Entfernt ein Element samt Nachkommen.
///
/// Wird dabei der letzte Plan einer Person entfernt, fällt die Person mit weg.
pub(crate) fn remove_with_dependents(
    state: &mut EditorState,
    handle: ElementHandle,
) -> NetResult<()> {
    if !state.network.contains(handle) {
        return Ok(());
    }
    let person = match state.network.element(handle)? {
        Element::Demand(d) if d.tag.is_person_plan() => state
            .network
            .parents(handle)
            .into_iter()
            .find(|p| state.network.demand(*p).is_ok_and(|d| d.tag.is_person())),
        _ => None,
    };

    state.remove_cascade(handle)?;

    if let Some(person) = person {
        let has_plans = state
            .network
            .children(person)
            .iter()
            .any(|c| state.network.demand(*c).is_ok_and(|d| d.tag.is_person_plan()));
        if !has_plans {
            log::debug!("Person {} ohne Pläne wird mitgelöscht", person);
            state.remove_cascade(person)?;
        }
    }
    Ok(())
}

/// Prüft Start-/End-Offset gegen die Länge der Spur oder Kante.
fn check_offsets(
    state: &EditorState,
    parents: &[ElementHandle],
    start: Option<f32>,
    end: Option<f32>,
) -> NetResult<()> {
    let Some(start) = start else {
        return Ok(());
    };
    let placement = parents
        .iter()
        .copied()
        .find(|p| {
            state
                .network
                .element(*p)
                .is_ok_and(|e| matches!(e, Element::Lane(_) | Element::Edge(_)))
        })
        .ok_or_else(|| NetError::invalid("Offset ohne Spur oder Kante als Parent"))?;
    let length = geometry::length(&state.network.placement_geometry(placement)?);

    if !(0.0..=length).contains(&start) {
        return Err(NetError::invalid(format!(
            "Startposition {:.2} liegt außerhalb von 0..{:.2}",
            start, length
        )));
    }
    if let Some(end) = end {
        if end < start || end > length {
            return Err(NetError::invalid(format!(
                "Endposition {:.2} ungültig (Start {:.2}, Länge {:.2})",
                end, start, length
            )));
        }
    }
    Ok(())
}

fn check_edges(state: &EditorState, edges: &[ElementHandle]) -> NetResult<()> {
    for &edge in edges {
        state.network.edge(edge)?;
    }
    Ok(())
}

fn has_parent(state: &EditorState, parents: &[ElementHandle], pred: impl Fn(&Element) -> bool) -> bool {
    parents
        .iter()
        .any(|p| state.network.element(*p).is_ok_and(&pred))
}

/// Legt ein Infrastruktur-Element an.
///
/// Eine leere ID wird generiert. `parents` enthält Spur/Kante der Platzierung
/// und ggf. das übergeordnete Additional (z.B. Parkbereich eines Parkplatzes).
pub fn create_additional(
    state: &mut EditorState,
    mut additional: Additional,
    parents: &[ElementHandle],
) -> NetResult<ElementHandle> {
    let tag = additional.tag;
    if let Some(parent_tag) = tag.required_additional_parent() {
        let ok = has_parent(state, parents, |e| {
            e.as_additional().is_some_and(|a| a.tag == parent_tag)
        });
        if !ok {
            return Err(NetError::invalid(format!(
                "{} braucht ein {} als Parent",
                tag.name(),
                parent_tag.name()
            )));
        }
    }
    check_offsets(state, parents, additional.start, additional.end)?;
    check_edges(state, &additional.edges)?;

    let handle = state.with_group("Additional erstellen", |s| {
        if additional.id.is_empty() {
            additional.id = s.network.generate_id(Category::Additional(tag));
        }
        s.create_element(Element::Additional(additional), parents)
    })?;
    log::info!(
        "{} {} erstellt",
        tag.name(),
        state.network.element(handle)?.id()
    );
    Ok(handle)
}

/// Legt ein Demand-Element an (Typ, Route, Fahrzeug, Person, Plan, Stop).
pub fn create_demand_element(
    state: &mut EditorState,
    mut demand: DemandElement,
    parents: &[ElementHandle],
) -> NetResult<ElementHandle> {
    let tag = demand.tag;
    if !demand.depart.is_finite() || demand.depart < 0.0 {
        return Err(NetError::invalid(format!(
            "Abfahrtszeit {} ungültig",
            demand.depart
        )));
    }
    if tag.has_edge_list() && demand.edges.is_empty() {
        return Err(NetError::invalid(format!("{} braucht mindestens eine Kante", tag.name())));
    }
    check_edges(state, &demand.edges)?;

    let needs = |wanted: fn(DemandTag) -> bool| {
        has_parent(state, parents, |e| e.as_demand().is_some_and(|d| wanted(d.tag)))
    };
    match tag {
        DemandTag::Vehicle | DemandTag::RouteFlow if !needs(|t| t == DemandTag::Route) => {
            return Err(NetError::invalid(format!("{} braucht eine Route", tag.name())));
        }
        t if t.is_person_plan() && !needs(DemandTag::is_person) => {
            return Err(NetError::invalid(format!("{} braucht eine Person", tag.name())));
        }
        DemandTag::Stop if !has_parent(state, parents, |e| matches!(e, Element::Lane(_))) => {
            return Err(NetError::invalid("Stop braucht eine Spur"));
        }
        _ => {}
    }
    check_offsets(state, parents, demand.position, None)?;

    let handle = state.with_group("Demand-Element erstellen", |s| {
        if demand.id.is_empty() {
            demand.id = s.network.generate_id(Category::Demand(tag));
        }
        s.create_element(Element::Demand(demand), parents)
    })?;
    log::info!(
        "{} {} erstellt",
        tag.name(),
        state.network.element(handle)?.id()
    );
    Ok(handle)
}

/// Legt ein leeres Data-Set an; ohne `id` wird eine generiert.
pub fn create_data_set(state: &mut EditorState, id: Option<&str>) -> NetResult<ElementHandle> {
    let handle = state.with_group("Data-Set erstellen", |s| {
        let id = match id {
            Some(id) => id.to_string(),
            None => s.network.generate_id(Category::DataSet),
        };
        s.create_element(Element::DataSet(DataSet { id, selected: false }), &[])
    })?;
    log::info!("Data-Set {} erstellt", state.network.element(handle)?.id());
    Ok(handle)
}

/// Legt ein Intervall `[begin, end)` im Data-Set an.
///
/// Intervalle eines Data-Sets dürfen sich nicht überlappen.
pub fn create_data_interval(
    state: &mut EditorState,
    data_set: ElementHandle,
    begin: f64,
    end: f64,
) -> NetResult<ElementHandle> {
    let set_id = match state.network.element(data_set)? {
        Element::DataSet(s) => s.id.clone(),
        other => return Err(NetError::not_found(Category::DataSet, other.id())),
    };
    if !begin.is_finite() || !end.is_finite() || begin >= end {
        return Err(NetError::invalid(format!(
            "Intervall [{}, {}) ist leer oder ungültig",
            begin, end
        )));
    }
    for existing in state.network.children(data_set) {
        if let Some(i) = state.network.element(existing)?.as_data_interval() {
            if begin < i.end && i.begin < end {
                return Err(NetError::invalid(format!(
                    "Intervall [{}, {}) überlappt {} in Data-Set {}",
                    begin, end, i.id, set_id
                )));
            }
        }
    }

    let handle = state.with_group("Intervall erstellen", |s| {
        let interval = DataInterval {
            id: s.network.generate_id(Category::DataInterval),
            begin,
            end,
        };
        s.create_element(Element::DataInterval(interval), &[data_set])
    })?;
    log::info!("Intervall [{}, {}) in Data-Set {} erstellt", begin, end, set_id);
    Ok(handle)
}

/// Legt einen Messwert-Datensatz im Intervall an.
///
/// `targets` ist eine Kante (`EdgeData`), eine Spur (`LaneData`) oder ein
/// Kantenpaar von/nach (`EdgeRelData`).
pub fn create_generic_data(
    state: &mut EditorState,
    interval: ElementHandle,
    tag: GenericDataTag,
    targets: &[ElementHandle],
    params: BTreeMap<String, String>,
) -> NetResult<ElementHandle> {
    if state.network.element(interval)?.as_data_interval().is_none() {
        return Err(NetError::invalid(format!("{} ist kein Intervall", interval)));
    }
    let valid_targets = match tag {
        GenericDataTag::EdgeData => {
            targets.len() == 1 && state.network.edge(targets[0]).is_ok()
        }
        GenericDataTag::LaneData => {
            targets.len() == 1 && state.network.lane(targets[0]).is_ok()
        }
        GenericDataTag::EdgeRelData => {
            targets.len() == 2
                && targets[0] != targets[1]
                && targets.iter().all(|t| state.network.edge(*t).is_ok())
        }
    };
    if !valid_targets {
        return Err(NetError::invalid(format!(
            "Ungültige Ziele für {}",
            tag.name()
        )));
    }

    let mut parents = vec![interval];
    parents.extend_from_slice(targets);
    let handle = state.with_group("Daten erstellen", |s| {
        let data = GenericData {
            id: s.network.generate_id(Category::GenericData(tag)),
            tag,
            params,
            selected: false,
        };
        s.create_element(Element::GenericData(data), &parents)
    })?;
    log::debug!("{} {} erstellt", tag.name(), state.network.element(handle)?.id());
    Ok(handle)
}

/// Löscht ein beliebiges Element mit allen abhängigen Elementen.
pub fn delete_element(state: &mut EditorState, handle: ElementHandle) -> NetResult<()> {
    let element = state.network.element(handle)?;
    let (category, id) = (element.category(), element.id().to_string());
    match element {
        Element::Junction(_) => return delete_junction(state, handle),
        Element::Edge(_) => return delete_edge(state, handle),
        Element::Lane(_) => return delete_lane(state, handle),
        Element::Crossing(_) => return delete_crossing(state, handle),
        Element::Demand(d) if d.is_default => {
            return Err(NetError::invalid(format!(
                "Standard-Element {} kann nicht gelöscht werden",
                id
            )));
        }
        _ => {}
    }

    state.with_group("Element löschen", |s| remove_with_dependents(s, handle))?;
    log::info!("{} {} gelöscht", category, id);
    Ok(())
}
