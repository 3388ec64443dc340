//! NetGraph-Editor Library.
//! Editier-Kern für Straßennetz-Graphen mit transaktionalem Undo/Redo,
//! als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    CommandLog, ComputeReport, DefaultNetBuilder, EditCommand, EditController, EditorState,
    LoadItem, LoadReport, NetBuilder,
};
pub use core::{
    AttrKey, AttrValue, Category, Element, ElementHandle, NetError, NetResult, Network,
    SaveCategory,
};
pub use core::{SpatialIndex, SpatialMatch};
pub use shared::EditorOptions;
