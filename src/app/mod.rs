//! Application-Layer: Controller, State, Commands, Undo-Log und Use-Cases.

pub mod builder;
pub mod command_log;
pub mod controller;
pub mod events;
pub mod handlers;
/// Editor State und primitive Mutationen
///
/// Dieses Modul verwaltet das Netz, die Undo-Historie und die Optionen.
pub mod state;
pub mod use_cases;

pub use builder::{ClusterInfo, ComputeOutput, ComputeRequest, DefaultNetBuilder, NetBuilder};
pub use command_log::{CommandLog, UndoGroup};
pub use controller::EditController;
pub use events::EditCommand;
pub use state::EditorState;
pub use use_cases::load::{LoadItem, LoadReport, ParentRef};
pub use use_cases::recompute::ComputeReport;
