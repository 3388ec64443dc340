//! Elementtypen des Netz-Graphen und ihre stabilen Handles.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;

use super::{AdditionalTag, Category, DemandTag, GenericDataTag, JunctionType};

/// Stabiles, undurchsichtiges Handle eines Elements im Store.
///
/// Handles werden monoton vergeben und nie für ein anderes Element
/// wiederverwendet. Undo/Redo legt Elemente unter ihrem ursprünglichen Handle
/// wieder an.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(pub u64);

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Welches Ende einer Kante.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeEnd {
    From,
    To,
}

/// Knotenpunkt des Netzes.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    pub id: String,
    pub position: Vec2,
    pub junction_type: JunctionType,
    /// `false` solange Verbindungen/Ampellogik neu berechnet werden müssen
    pub logic_valid: bool,
    pub selected: bool,
}

impl Junction {
    pub fn new(id: impl Into<String>, position: Vec2) -> Self {
        Self {
            id: id.into(),
            position,
            junction_type: JunctionType::Priority,
            logic_valid: false,
            selected: false,
        }
    }
}

/// Spur-zu-Spur-Verbindung, gespeichert an der eingehenden Kante.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub from_lane: usize,
    pub to_edge: ElementHandle,
    pub to_lane: usize,
}

/// Gerichtete Kante zwischen zwei Junctions.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub from: ElementHandle,
    pub to: ElementHandle,
    /// Innere Stützpunkte; die volle Geometrie ergänzt Start- und Ziel-Junction
    pub inner_shape: Vec<Vec2>,
    pub speed: f32,
    pub priority: i32,
    pub edge_type: String,
    /// Kante ist durch Teilung entstanden (steuert die Namensvergabe weiterer Splits)
    pub was_split: bool,
    /// Ausgehende Verbindungen am Ziel-Junction
    pub connections: Vec<Connection>,
    pub selected: bool,
}

/// Fahrspur einer Kante.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub id: String,
    pub index: usize,
    pub speed: f32,
    pub width: f32,
    pub allow: String,
    pub selected: bool,
}

impl Lane {
    /// Spur-ID aus Kanten-ID und Index.
    pub fn lane_id(edge_id: &str, index: usize) -> String {
        format!("{}_{}", edge_id, index)
    }
}

/// Fußgängerüberweg an einer Junction.
#[derive(Debug, Clone, PartialEq)]
pub struct Crossing {
    pub id: String,
    pub edges: Vec<ElementHandle>,
    pub width: f32,
    pub priority: bool,
    pub selected: bool,
}

/// Infrastruktur-Element (Haltestelle, Detektor, Rerouter, Shape, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Additional {
    pub id: String,
    pub tag: AdditionalTag,
    /// Start-Offset auf Spur/Kante des Parents
    pub start: Option<f32>,
    /// End-Offset auf Spur/Kante des Parents
    pub end: Option<f32>,
    /// Freie Position (POI, Rerouter, E3)
    pub position: Option<Vec2>,
    /// Freie Geometrie (Polygon)
    pub shape: Vec<Vec2>,
    /// Kantenliste (Rerouter)
    pub edges: Vec<ElementHandle>,
    pub name: String,
    pub params: BTreeMap<String, String>,
    pub selected: bool,
}

impl Additional {
    pub fn new(id: impl Into<String>, tag: AdditionalTag) -> Self {
        Self {
            id: id.into(),
            tag,
            start: None,
            end: None,
            position: None,
            shape: Vec::new(),
            edges: Vec::new(),
            name: String::new(),
            params: BTreeMap::new(),
            selected: false,
        }
    }
}

/// Verkehrsnachfrage-Element (Typen, Routen, Fahrzeuge, Personen, Pläne).
#[derive(Debug, Clone, PartialEq)]
pub struct DemandElement {
    pub id: String,
    pub tag: DemandTag,
    /// Abfahrtszeit in Sekunden (nur für Fahrzeuge/Personen relevant)
    pub depart: f64,
    /// Kantenliste (Route, Trip, Flow, PersonTrip)
    pub edges: Vec<ElementHandle>,
    /// Offset auf der Parent-Spur (Stops)
    pub position: Option<f32>,
    /// Geschützter Standard-Typ
    pub is_default: bool,
    pub params: BTreeMap<String, String>,
    pub selected: bool,
}

impl DemandElement {
    pub fn new(id: impl Into<String>, tag: DemandTag) -> Self {
        Self {
            id: id.into(),
            tag,
            depart: 0.0,
            edges: Vec::new(),
            position: None,
            is_default: false,
            params: BTreeMap::new(),
            selected: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    pub id: String,
    pub selected: bool,
}

/// Zeitintervall `[begin, end)` innerhalb eines Data-Sets.
#[derive(Debug, Clone, PartialEq)]
pub struct DataInterval {
    pub id: String,
    pub begin: f64,
    pub end: f64,
}

/// Messwert-Datensatz zu einer Kante, Spur oder Kantenrelation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericData {
    pub id: String,
    pub tag: GenericDataTag,
    pub params: BTreeMap<String, String>,
    pub selected: bool,
}

/// Geschlossene Element-Hierarchie.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Junction(Junction),
    Edge(Edge),
    Lane(Lane),
    Crossing(Crossing),
    Additional(Additional),
    Demand(DemandElement),
    DataSet(DataSet),
    DataInterval(DataInterval),
    GenericData(GenericData),
}

impl Element {
    pub fn id(&self) -> &str {
        match self {
            Element::Junction(e) => &e.id,
            Element::Edge(e) => &e.id,
            Element::Lane(e) => &e.id,
            Element::Crossing(e) => &e.id,
            Element::Additional(e) => &e.id,
            Element::Demand(e) => &e.id,
            Element::DataSet(e) => &e.id,
            Element::DataInterval(e) => &e.id,
            Element::GenericData(e) => &e.id,
        }
    }

    /// Setzt die ID ohne Index-Pflege; nur über Store/Network aufrufen.
    pub(crate) fn set_id(&mut self, id: String) {
        match self {
            Element::Junction(e) => e.id = id,
            Element::Edge(e) => e.id = id,
            Element::Lane(e) => e.id = id,
            Element::Crossing(e) => e.id = id,
            Element::Additional(e) => e.id = id,
            Element::Demand(e) => e.id = id,
            Element::DataSet(e) => e.id = id,
            Element::DataInterval(e) => e.id = id,
            Element::GenericData(e) => e.id = id,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Element::Junction(_) => Category::Junction,
            Element::Edge(_) => Category::Edge,
            Element::Lane(_) => Category::Lane,
            Element::Crossing(_) => Category::Crossing,
            Element::Additional(e) => Category::Additional(e.tag),
            Element::Demand(e) => Category::Demand(e.tag),
            Element::DataSet(_) => Category::DataSet,
            Element::DataInterval(_) => Category::DataInterval,
            Element::GenericData(e) => Category::GenericData(e.tag),
        }
    }

    pub fn is_selected(&self) -> bool {
        match self {
            Element::Junction(e) => e.selected,
            Element::Edge(e) => e.selected,
            Element::Lane(e) => e.selected,
            Element::Crossing(e) => e.selected,
            Element::Additional(e) => e.selected,
            Element::Demand(e) => e.selected,
            Element::DataSet(e) => e.selected,
            Element::DataInterval(_) => false,
            Element::GenericData(e) => e.selected,
        }
    }

    /// Abfahrtszeit für den Abfahrts-Index (nur Fahrzeuge/Personen).
    pub fn departure(&self) -> Option<f64> {
        match self {
            Element::Demand(d) if d.tag.is_scheduled() => Some(d.depart),
            _ => None,
        }
    }

    /// Kantenliste listenartiger Attribute (Crossing, Rerouter, Route, ...).
    pub fn edge_list(&self) -> Option<&Vec<ElementHandle>> {
        match self {
            Element::Crossing(c) => Some(&c.edges),
            Element::Additional(a) if a.tag == AdditionalTag::Rerouter => Some(&a.edges),
            Element::Demand(d) if d.tag.has_edge_list() => Some(&d.edges),
            _ => None,
        }
    }

    pub(crate) fn edge_list_mut(&mut self) -> Option<&mut Vec<ElementHandle>> {
        match self {
            Element::Crossing(c) => Some(&mut c.edges),
            Element::Additional(a) if a.tag == AdditionalTag::Rerouter => Some(&mut a.edges),
            Element::Demand(d) if d.tag.has_edge_list() => Some(&mut d.edges),
            _ => None,
        }
    }

    /// Offsets `(start, end)` auf der Parent-Spur bzw. -Kante.
    pub fn lane_offsets(&self) -> Option<(f32, Option<f32>)> {
        match self {
            Element::Additional(a) => a.start.map(|start| (start, a.end)),
            Element::Demand(d) => d.position.map(|p| (p, None)),
            _ => None,
        }
    }

    pub fn as_junction(&self) -> Option<&Junction> {
        match self {
            Element::Junction(j) => Some(j),
            _ => None,
        }
    }

    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            Element::Edge(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_lane(&self) -> Option<&Lane> {
        match self {
            Element::Lane(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_crossing(&self) -> Option<&Crossing> {
        match self {
            Element::Crossing(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_additional(&self) -> Option<&Additional> {
        match self {
            Element::Additional(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_demand(&self) -> Option<&DemandElement> {
        match self {
            Element::Demand(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_data_interval(&self) -> Option<&DataInterval> {
        match self {
            Element::DataInterval(i) => Some(i),
            _ => None,
        }
    }
}
