//! Use-Cases der Application-Layer-Orchestrierung.

pub mod editing;
pub mod load;
pub mod persistence;
pub mod recompute;
