//! Use-Case-Funktionen für strukturelles Editieren des Netzes.
//!
//! Aufgeteilt nach Operation:
//! - `junctions` — Junctions anlegen, löschen, verschmelzen
//! - `edges` — Kanten anlegen, löschen, umdrehen, spiegeln, ersetzen
//! - `lanes` — Spuren löschen und duplizieren
//! - `restrictions` — Sonderspuren für Fahrzeugklassen
//! - `connections` — Verbindungen verwerfen
//! - `crossings` — Fußgängerüberwege
//! - `reshape` — Junctions durch Geometrie ersetzen oder aufteilen
//! - `split` — Kanten teilen
//! - `join` — Junction-Cluster zusammenfassen
//! - `elements` — Additionals, Demand- und Daten-Elemente
//! - `attributes` — Attribute, Umbenennen, Selektion
//! - `cleanup` — Aufräum-Operationen
//!
//! Jede Operation bildet genau eine Undo-Gruppe und lässt das Netz bei einem
//! Fehler unverändert.
mod attributes;
mod cleanup;
mod connections;
mod crossings;
mod edges;
mod elements;
mod join;
mod junctions;
mod lanes;
mod reshape;
mod restrictions;
mod split;

pub use attributes::{clear_selection, rename, set_attribute, set_selected};
pub use cleanup::{
    clean_invalid_crossings, clean_invalid_demand_elements, clean_unused_routes, join_routes,
    remove_solitary_junctions,
};
pub use connections::{clear_junction_connections, delete_connection, reset_junction_connections};
pub use crossings::{create_crossing, delete_crossing};
pub use edges::{
    add_reversed_edge, create_edge, delete_edge, replace_incoming_edge, reverse_edge,
    EdgeCreateOptions, EdgeTemplate, LaneTemplate,
};
pub use elements::{
    create_additional, create_data_interval, create_data_set, create_demand_element,
    create_generic_data, delete_element,
};
pub use join::{join_junctions, join_selected_junctions, JoinOutcome};
pub use junctions::{create_junction, delete_junction, merge_junctions};
pub use lanes::{delete_lane, duplicate_lane};
pub use reshape::{is_replaceable_by_geometry, replace_junction_by_geometry, split_junction};
pub use restrictions::{add_restricted_lane, remove_restricted_lane, restrict_lane};
pub use split::{split_edge, split_edges_bidi};
