//! Element-Kategorien, Subtypen und ID-Namensräume.

use std::fmt;

/// Subtyp eines Infrastruktur-Elements ("Additional").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AdditionalTag {
    RouteProbe,
    BusStop,
    ContainerStop,
    ChargingStation,
    ParkingArea,
    ParkingSpace,
    E1Detector,
    E2Detector,
    E3Detector,
    DetEntry,
    DetExit,
    Rerouter,
    Vaporizer,
    Polygon,
    Poi,
}

impl AdditionalTag {
    /// Alle Subtypen in Deklarationsreihenfolge.
    pub const ALL: [AdditionalTag; 15] = [
        AdditionalTag::RouteProbe,
        AdditionalTag::BusStop,
        AdditionalTag::ContainerStop,
        AdditionalTag::ChargingStation,
        AdditionalTag::ParkingArea,
        AdditionalTag::ParkingSpace,
        AdditionalTag::E1Detector,
        AdditionalTag::E2Detector,
        AdditionalTag::E3Detector,
        AdditionalTag::DetEntry,
        AdditionalTag::DetExit,
        AdditionalTag::Rerouter,
        AdditionalTag::Vaporizer,
        AdditionalTag::Polygon,
        AdditionalTag::Poi,
    ];

    /// Tag-Name, gleichzeitig Präfix generierter IDs.
    pub fn name(self) -> &'static str {
        match self {
            AdditionalTag::RouteProbe => "routeProbe",
            AdditionalTag::BusStop => "busStop",
            AdditionalTag::ContainerStop => "containerStop",
            AdditionalTag::ChargingStation => "chargingStation",
            AdditionalTag::ParkingArea => "parkingArea",
            AdditionalTag::ParkingSpace => "parkingSpace",
            AdditionalTag::E1Detector => "e1Detector",
            AdditionalTag::E2Detector => "e2Detector",
            AdditionalTag::E3Detector => "e3Detector",
            AdditionalTag::DetEntry => "detEntry",
            AdditionalTag::DetExit => "detExit",
            AdditionalTag::Rerouter => "rerouter",
            AdditionalTag::Vaporizer => "vaporizer",
            AdditionalTag::Polygon => "poly",
            AdditionalTag::Poi => "poi",
        }
    }

    /// Haltestellen-artige Elemente (werden beim Speichern als Block geschrieben).
    pub fn is_stopping_place(self) -> bool {
        matches!(
            self,
            AdditionalTag::BusStop
                | AdditionalTag::ContainerStop
                | AdditionalTag::ChargingStation
                | AdditionalTag::ParkingArea
        )
    }

    /// Detektoren inklusive Ein-/Ausgängen eines E3-Detektors.
    pub fn is_detector(self) -> bool {
        matches!(
            self,
            AdditionalTag::E1Detector
                | AdditionalTag::E2Detector
                | AdditionalTag::E3Detector
                | AdditionalTag::DetEntry
                | AdditionalTag::DetExit
        )
    }

    /// Polygone und POIs.
    pub fn is_shape(self) -> bool {
        matches!(self, AdditionalTag::Polygon | AdditionalTag::Poi)
    }

    /// Elemente, die zwingend ein Additional als Parent brauchen.
    pub fn required_additional_parent(self) -> Option<AdditionalTag> {
        match self {
            AdditionalTag::ParkingSpace => Some(AdditionalTag::ParkingArea),
            AdditionalTag::DetEntry | AdditionalTag::DetExit => Some(AdditionalTag::E3Detector),
            _ => None,
        }
    }
}

/// Subtyp eines Demand-Elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DemandTag {
    VType,
    PType,
    Route,
    Vehicle,
    Trip,
    Flow,
    RouteFlow,
    Person,
    PersonFlow,
    Stop,
    PersonTrip,
    Walk,
    Ride,
}

impl DemandTag {
    /// Alle Subtypen in Deklarationsreihenfolge.
    pub const ALL: [DemandTag; 13] = [
        DemandTag::VType,
        DemandTag::PType,
        DemandTag::Route,
        DemandTag::Vehicle,
        DemandTag::Trip,
        DemandTag::Flow,
        DemandTag::RouteFlow,
        DemandTag::Person,
        DemandTag::PersonFlow,
        DemandTag::Stop,
        DemandTag::PersonTrip,
        DemandTag::Walk,
        DemandTag::Ride,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DemandTag::VType => "vType",
            DemandTag::PType => "pType",
            DemandTag::Route => "route",
            DemandTag::Vehicle => "vehicle",
            DemandTag::Trip => "trip",
            DemandTag::Flow => "flow",
            DemandTag::RouteFlow => "routeFlow",
            DemandTag::Person => "person",
            DemandTag::PersonFlow => "personFlow",
            DemandTag::Stop => "stop",
            DemandTag::PersonTrip => "personTrip",
            DemandTag::Walk => "walk",
            DemandTag::Ride => "ride",
        }
    }

    /// Fahrzeuge und Personen, die über die Abfahrtszeit indexiert werden.
    pub fn is_scheduled(self) -> bool {
        matches!(
            self,
            DemandTag::Vehicle
                | DemandTag::Trip
                | DemandTag::Flow
                | DemandTag::RouteFlow
                | DemandTag::Person
                | DemandTag::PersonFlow
        )
    }

    pub fn is_person(self) -> bool {
        matches!(self, DemandTag::Person | DemandTag::PersonFlow)
    }

    /// Pläne einer Person (Trip, Walk, Ride).
    pub fn is_person_plan(self) -> bool {
        matches!(
            self,
            DemandTag::PersonTrip | DemandTag::Walk | DemandTag::Ride
        )
    }

    /// Elemente mit einer Kantenliste als Attribut.
    pub fn has_edge_list(self) -> bool {
        matches!(
            self,
            DemandTag::Route | DemandTag::Trip | DemandTag::Flow | DemandTag::PersonTrip
        )
    }
}

/// Subtyp eines Generic-Data-Eintrags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GenericDataTag {
    EdgeData,
    LaneData,
    EdgeRelData,
}

impl GenericDataTag {
    pub fn name(self) -> &'static str {
        match self {
            GenericDataTag::EdgeData => "edgeData",
            GenericDataTag::LaneData => "laneData",
            GenericDataTag::EdgeRelData => "edgeRelData",
        }
    }
}

/// Kategorie eines Elements; bestimmt Namensraum, ID-Präfix und Speicherdatei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Junction,
    Edge,
    Lane,
    Crossing,
    Additional(AdditionalTag),
    Demand(DemandTag),
    DataSet,
    DataInterval,
    GenericData(GenericDataTag),
}

impl Category {
    /// Namensraum, in dem IDs dieser Kategorie eindeutig sein müssen.
    ///
    /// Fahrzeuge (vehicle, trip, flow, routeFlow) und Personen (person, personFlow)
    /// teilen sich jeweils einen Namensraum.
    pub fn namespace(self) -> Namespace {
        match self {
            Category::Demand(tag) => match tag {
                DemandTag::Vehicle | DemandTag::Trip | DemandTag::Flow | DemandTag::RouteFlow => {
                    Namespace::Vehicles
                }
                DemandTag::Person | DemandTag::PersonFlow => Namespace::Persons,
                other => Namespace::Category(Category::Demand(other)),
            },
            other => Namespace::Category(other),
        }
    }

    /// Präfix für generierte IDs.
    pub fn id_prefix(self) -> String {
        match self {
            Category::Junction => "J".to_string(),
            Category::Edge => "E".to_string(),
            Category::Lane => "lane_".to_string(),
            Category::Crossing => "C".to_string(),
            Category::Additional(tag) => format!("{}_", tag.name()),
            Category::Demand(tag) => format!("{}_", tag.name()),
            Category::DataSet => "dataSet_".to_string(),
            Category::DataInterval => "interval_".to_string(),
            Category::GenericData(tag) => format!("{}_", tag.name()),
        }
    }

    /// Zuständige Speicherkategorie für "muss gespeichert werden"-Flags.
    pub fn save_category(self) -> SaveCategory {
        match self {
            Category::Junction | Category::Edge | Category::Lane | Category::Crossing => {
                SaveCategory::Network
            }
            Category::Additional(_) => SaveCategory::Additionals,
            Category::Demand(_) => SaveCategory::Demand,
            Category::DataSet | Category::DataInterval | Category::GenericData(_) => {
                SaveCategory::Data
            }
        }
    }

    /// Netz-Topologie (Junctions, Kanten, Spuren, Crossings).
    pub fn is_topology(self) -> bool {
        self.save_category() == SaveCategory::Network
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Junction => write!(f, "junction"),
            Category::Edge => write!(f, "edge"),
            Category::Lane => write!(f, "lane"),
            Category::Crossing => write!(f, "crossing"),
            Category::Additional(tag) => write!(f, "{}", tag.name()),
            Category::Demand(tag) => write!(f, "{}", tag.name()),
            Category::DataSet => write!(f, "dataSet"),
            Category::DataInterval => write!(f, "dataInterval"),
            Category::GenericData(tag) => write!(f, "{}", tag.name()),
        }
    }
}

/// Eindeutigkeitsbereich für IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    Category(Category),
    Vehicles,
    Persons,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Category(category) => write!(f, "{}", category),
            Namespace::Vehicles => write!(f, "vehicles"),
            Namespace::Persons => write!(f, "persons"),
        }
    }
}

/// Junction-Typ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JunctionType {
    #[default]
    Priority,
    TrafficLight,
    RightBeforeLeft,
    RailCrossing,
    DeadEnd,
    Unregulated,
}

impl JunctionType {
    /// Typen, an denen ein Ampelprogramm hängt.
    pub fn has_tls(self) -> bool {
        matches!(self, JunctionType::TrafficLight)
    }
}

/// Gruppen von Elementen, die gemeinsam in eine Datei geschrieben werden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SaveCategory {
    Network,
    Additionals,
    Demand,
    Data,
    TlsPrograms,
}

impl SaveCategory {
    pub const ALL: [SaveCategory; 5] = [
        SaveCategory::Network,
        SaveCategory::Additionals,
        SaveCategory::Demand,
        SaveCategory::Data,
        SaveCategory::TlsPrograms,
    ];
}
