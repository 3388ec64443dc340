//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Laufzeit-Konfiguration, die sowohl `core`-nahe Use-Cases als
//! auch externe Kollaborateure lesen.

pub mod options;

pub use options::EditorOptions;
pub use options::{JUNCTION_COLLISION_STEP, POSITION_EPSILON, SPLIT_SNAP_DISTANCE};
