//! Use-Case: Elemente aus einer externen Quelle ohne Undo-Protokoll laden.
//!
//! Parents und Kantenlisten werden per ID aufgelöst. Fehlerhafte Einträge
//! werden gesammelt und übersprungen; ein Teil-Import bleibt bestehen.

use crate::app::builder::EdgeRecord;
use crate::app::use_cases::recompute::ensure_default_elements;
use crate::app::EditorState;
use crate::core::{
    Additional, Category, Crossing, DataInterval, DataSet, DemandElement, DemandTag, Edge,
    Element, ElementHandle, ElementSnapshot, GenericData, Junction, Lane, NetError, NetResult,
    Network, ParentLink,
};

/// Verweis auf ein bereits geladenes Element.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentRef {
    pub category: Category,
    pub id: String,
}

impl ParentRef {
    pub fn new(category: Category, id: impl Into<String>) -> Self {
        Self {
            category,
            id: id.into(),
        }
    }
}

/// Ein zu ladender Eintrag.
#[derive(Debug, Clone)]
pub enum LoadItem {
    Junction(Junction),
    /// Kante samt Spuren; Endpunkte per Junction-ID
    Edge(EdgeRecord),
    Crossing {
        junction: String,
        id: String,
        edges: Vec<String>,
        width: f32,
        priority: bool,
    },
    Additional {
        additional: Additional,
        parents: Vec<ParentRef>,
        edges: Vec<String>,
    },
    Demand {
        demand: DemandElement,
        parents: Vec<ParentRef>,
        edges: Vec<String>,
    },
    DataSet(DataSet),
    DataInterval {
        data_set: String,
        interval: DataInterval,
    },
    GenericData {
        interval: String,
        data: GenericData,
        targets: Vec<ParentRef>,
    },
}

impl LoadItem {
    fn label(&self) -> (Category, String) {
        match self {
            LoadItem::Junction(j) => (Category::Junction, j.id.clone()),
            LoadItem::Edge(e) => (Category::Edge, e.id.clone()),
            LoadItem::Crossing { id, .. } => (Category::Crossing, id.clone()),
            LoadItem::Additional { additional, .. } => {
                (Category::Additional(additional.tag), additional.id.clone())
            }
            LoadItem::Demand { demand, .. } => (Category::Demand(demand.tag), demand.id.clone()),
            LoadItem::DataSet(s) => (Category::DataSet, s.id.clone()),
            LoadItem::DataInterval { interval, .. } => {
                (Category::DataInterval, interval.id.clone())
            }
            LoadItem::GenericData { data, .. } => {
                (Category::GenericData(data.tag), data.id.clone())
            }
        }
    }
}

/// Abgelehnter Eintrag.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedItem {
    pub category: Category,
    pub id: String,
    pub reason: NetError,
}

/// Ergebnis eines Ladevorgangs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    pub rejected: Vec<RejectedItem>,
}

/// Lädt Einträge direkt in das Netz, ohne Undo-Gruppen anzulegen.
///
/// Die Undo-Historie wird verworfen, da sie geladene Elemente nicht kennt.
pub fn bulk_load(
    state: &mut EditorState,
    items: impl IntoIterator<Item = LoadItem>,
) -> NetResult<LoadReport> {
    if state.command_log.is_group_open() {
        return Err(NetError::invalid("Laden während einer offenen Undo-Gruppe nicht möglich"));
    }
    state.command_log.clear();

    let mut report = LoadReport::default();
    for item in items {
        let (category, id) = item.label();
        match load_item(state, item) {
            Ok(()) => report.loaded += 1,
            Err(reason) => {
                log::warn!("{} {} nicht geladen: {}", category, id, reason);
                report.rejected.push(RejectedItem {
                    category,
                    id,
                    reason,
                });
            }
        }
    }
    ensure_default_elements(&mut state.network, &state.options)?;

    log::info!(
        "{} Element(e) geladen, {} abgelehnt",
        report.loaded,
        report.rejected.len()
    );
    Ok(report)
}

fn resolve(net: &Network, parent: &ParentRef) -> NetResult<ElementHandle> {
    net.lookup(parent.category, &parent.id)
}

fn resolve_edges(net: &Network, ids: &[String]) -> NetResult<Vec<ElementHandle>> {
    ids.iter()
        .map(|id| net.lookup(Category::Edge, id))
        .collect()
}

/// Fügt ein Element am Ende der Kind-Listen seiner Parents ein.
fn insert(net: &mut Network, element: Element, parents: &[ElementHandle]) -> NetResult<ElementHandle> {
    let category = element.category();
    if !net.is_id_free(category, element.id()) {
        return Err(NetError::duplicate(category.namespace(), element.id()));
    }
    let links = parents
        .iter()
        .map(|&parent| ParentLink {
            parent,
            index: net.hierarchy().children(parent).len(),
        })
        .collect();
    let snapshot = ElementSnapshot {
        handle: net.allocate_handle(),
        element,
        parents: links,
    };
    net.insert_snapshot(&snapshot)?;
    Ok(snapshot.handle)
}

fn load_item(state: &mut EditorState, item: LoadItem) -> NetResult<()> {
    let net = &mut state.network;
    match item {
        LoadItem::Junction(junction) => {
            insert(net, Element::Junction(junction), &[])?;
        }
        LoadItem::Edge(record) => {
            let from = net.lookup(Category::Junction, &record.from)?;
            let to = net.lookup(Category::Junction, &record.to)?;
            if from == to {
                return Err(NetError::invalid("Kante mit gleicher Start- und Ziel-Junction"));
            }
            if record.lanes.is_empty() {
                return Err(NetError::invalid("Kante ohne Spuren"));
            }
            for (index, lane) in record.lanes.iter().enumerate() {
                let lane_id = Lane::lane_id(&record.id, index);
                if lane.id != lane_id || !net.is_id_free(Category::Lane, &lane_id) {
                    return Err(NetError::invalid(format!(
                        "Spur {} passt nicht zu Kante {}",
                        lane.id, record.id
                    )));
                }
            }
            let edge = Edge {
                id: record.id,
                from,
                to,
                inner_shape: record.inner_shape,
                speed: record.speed,
                priority: record.priority,
                edge_type: record.edge_type,
                was_split: record.was_split,
                connections: Vec::new(),
                selected: false,
            };
            let handle = insert(net, Element::Edge(edge), &[from, to])?;
            for (index, lane) in record.lanes.into_iter().enumerate() {
                insert(net, Element::Lane(Lane { index, ..lane }), &[handle])?;
            }
        }
        LoadItem::Crossing {
            junction,
            id,
            edges,
            width,
            priority,
        } => {
            let junction = net.lookup(Category::Junction, &junction)?;
            let edges = resolve_edges(net, &edges)?;
            let incident = net.incident_edges(junction);
            if edges.is_empty() || edges.iter().any(|e| !incident.contains(e)) {
                return Err(NetError::invalid("Überweg-Kanten liegen nicht an der Junction"));
            }
            let crossing = Crossing {
                id,
                edges,
                width,
                priority,
                selected: false,
            };
            insert(net, Element::Crossing(crossing), &[junction])?;
        }
        LoadItem::Additional {
            mut additional,
            parents,
            edges,
        } => {
            let parents = parents
                .iter()
                .map(|p| resolve(net, p))
                .collect::<NetResult<Vec<_>>>()?;
            additional.edges = resolve_edges(net, &edges)?;
            insert(net, Element::Additional(additional), &parents)?;
        }
        LoadItem::Demand {
            mut demand,
            parents,
            edges,
        } => {
            let parents = parents
                .iter()
                .map(|p| resolve(net, p))
                .collect::<NetResult<Vec<_>>>()?;
            demand.edges = resolve_edges(net, &edges)?;
            if demand.tag == DemandTag::VType && demand.id == state.options.default_vtype_id {
                replace_default_vtype(net, &mut demand)?;
            }
            insert(net, Element::Demand(demand), &parents)?;
        }
        LoadItem::DataSet(set) => {
            insert(net, Element::DataSet(set), &[])?;
        }
        LoadItem::DataInterval { data_set, interval } => {
            let set = net.lookup(Category::DataSet, &data_set)?;
            if interval.begin >= interval.end {
                return Err(NetError::invalid(format!(
                    "Intervall [{}, {}) ist leer",
                    interval.begin, interval.end
                )));
            }
            insert(net, Element::DataInterval(interval), &[set])?;
        }
        LoadItem::GenericData {
            interval,
            data,
            targets,
        } => {
            let interval = net.lookup(Category::DataInterval, &interval)?;
            let mut parents = vec![interval];
            for target in &targets {
                parents.push(resolve(net, target)?);
            }
            insert(net, Element::GenericData(data), &parents)?;
        }
    }
    Ok(())
}

/// Ersetzt den automatisch angelegten Standard-Typ durch den geladenen.
fn replace_default_vtype(net: &mut Network, demand: &mut DemandElement) -> NetResult<()> {
    if let Ok(existing) = net.lookup(Category::Demand(DemandTag::VType), &demand.id) {
        if !net.hierarchy().is_isolated(existing) {
            return Err(NetError::duplicate(
                Category::Demand(DemandTag::VType).namespace(),
                demand.id.clone(),
            ));
        }
        let snapshot = net.snapshot(existing)?;
        net.remove_snapshot(&snapshot)?;
    }
    demand.is_default = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AdditionalTag;
    use glam::Vec2;

    fn edge_record(id: &str, from: &str, to: &str) -> EdgeRecord {
        EdgeRecord {
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            inner_shape: Vec::new(),
            speed: 13.89,
            priority: -1,
            edge_type: String::new(),
            was_split: false,
            lanes: vec![Lane {
                id: Lane::lane_id(id, 0),
                index: 0,
                speed: 13.89,
                width: 3.2,
                allow: String::new(),
                selected: false,
            }],
        }
    }

    #[test]
    fn partial_load_keeps_valid_items_and_reports_rejected() {
        let mut state = EditorState::new();
        let items = vec![
            LoadItem::Junction(Junction::new("a", Vec2::ZERO)),
            LoadItem::Junction(Junction::new("b", Vec2::new(50.0, 0.0))),
            LoadItem::Edge(edge_record("ab", "a", "b")),
            LoadItem::Edge(edge_record("bx", "b", "missing")),
            LoadItem::Additional {
                additional: Additional {
                    start: Some(5.0),
                    end: Some(20.0),
                    ..Additional::new("stop", AdditionalTag::BusStop)
                },
                parents: vec![ParentRef::new(Category::Lane, "ab_0")],
                edges: Vec::new(),
            },
        ];

        let report = bulk_load(&mut state, items).expect("Laden");

        assert_eq!(report.loaded, 4);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].id, "bx");
        assert!(!state.can_undo());
        assert!(state
            .network
            .lookup(Category::Additional(AdditionalTag::BusStop), "stop")
            .is_ok());
    }

    #[test]
    fn loaded_default_vtype_replaces_seeded_one() {
        let mut state = EditorState::new();
        let mut vtype = DemandElement::new("DEFAULT_VEHTYPE", DemandTag::VType);
        vtype.params.insert("accel".into(), "2.6".into());

        let report = bulk_load(
            &mut state,
            vec![LoadItem::Demand {
                demand: vtype,
                parents: Vec::new(),
                edges: Vec::new(),
            }],
        )
        .expect("Laden");

        assert_eq!(report.loaded, 1);
        let handle = state
            .network
            .lookup(Category::Demand(DemandTag::VType), "DEFAULT_VEHTYPE")
            .expect("Typ");
        let vtype = state.network.demand(handle).expect("Demand");
        assert!(vtype.is_default);
        assert_eq!(vtype.params.get("accel").map(String::as_str), Some("2.6"));
    }
}
