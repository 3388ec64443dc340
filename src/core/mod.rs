//! Core-Domänentypen: Elemente, Store, Hierarchie, Spatial-Index, primitive Änderungen.

pub mod attributes;
pub mod change;
pub mod element;
pub mod error;
pub mod geometry;
pub mod hierarchy;
pub mod ids;
/// Der veränderliche Netz-Graph
///
/// Bündelt Element-Store, Hierarchie, Spatial-Index, ID-Registry sowie
/// Speicher- und Neuberechnungs-Flags.
pub mod network;
pub mod permissions;
pub mod spatial;
pub mod store;
pub mod tags;

pub use attributes::{AttrKey, AttrValue};
pub use change::Change;
pub use element::{
    Additional, Connection, Crossing, DataInterval, DataSet, DemandElement, Edge, EdgeEnd,
    Element, ElementHandle, GenericData, Junction, Lane,
};
pub use error::{NetError, NetResult};
pub use hierarchy::Hierarchy;
pub use ids::IdRegistry;
pub use network::{ElementRecord, ElementSnapshot, Network, NetworkContent, ParentLink, TlsProgram};
pub use permissions::VehicleClass;
pub use spatial::{Aabb, SpatialIndex, SpatialMatch};
pub use store::{DepartureKey, ElementStore};
pub use tags::{
    AdditionalTag, Category, DemandTag, GenericDataTag, JunctionType, Namespace, SaveCategory,
};
