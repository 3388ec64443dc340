//! Application Controller für zentrale Command-Verarbeitung.

use super::{EditCommand, EditorState};
use crate::app::use_cases::editing;

/// Orchestriert Commands und Use-Cases auf den EditorState.
#[derive(Default)]
pub struct EditController;

impl EditController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Führt mehrere Commands nacheinander aus; bricht beim ersten Fehler ab.
    pub fn handle_commands(
        &mut self,
        state: &mut EditorState,
        commands: impl IntoIterator<Item = EditCommand>,
    ) -> anyhow::Result<()> {
        for command in commands {
            self.handle_command(state, command)?;
        }
        Ok(())
    }

    /// Führt mutierende Commands auf dem EditorState aus.
    /// Dispatcht an Feature-Handler in `handlers/` bzw. direkt an die Use-Cases.
    pub fn handle_command(
        &mut self,
        state: &mut EditorState,
        command: EditCommand,
    ) -> anyhow::Result<()> {
        use super::handlers;

        match command {
            // === Topologie ===
            EditCommand::CreateJunction { position } => {
                editing::create_junction(state, position)?;
            }
            EditCommand::DeleteJunction { junction } => editing::delete_junction(state, junction)?,
            EditCommand::MergeJunctions { moved, target } => {
                editing::merge_junctions(state, moved, target)?
            }
            EditCommand::JoinSelectedJunctions => handlers::editing::join_selected(state)?,
            EditCommand::ReplaceJunctionByGeometry { junction } => {
                editing::replace_junction_by_geometry(state, junction)?
            }
            EditCommand::SplitJunction {
                junction,
                reconnect,
            } => {
                editing::split_junction(state, junction, reconnect)?;
            }
            EditCommand::CreateEdge {
                source,
                dest,
                template,
                suggested_id,
                options,
            } => handlers::editing::create_edge(state, source, dest, template, suggested_id, options)?,
            EditCommand::DeleteEdge { edge } => editing::delete_edge(state, edge)?,
            EditCommand::ReverseEdge { edge } => {
                editing::reverse_edge(state, edge)?;
            }
            EditCommand::AddReversedEdge { edge } => {
                editing::add_reversed_edge(state, edge)?;
            }
            EditCommand::ReplaceIncomingEdge { which, by } => {
                editing::replace_incoming_edge(state, which, by)?
            }
            EditCommand::SplitEdge {
                edge,
                position,
                new_junction,
            } => handlers::editing::split_edge(state, edge, position, new_junction)?,
            EditCommand::SplitEdgesBidi {
                edge,
                opposite,
                position,
            } => {
                editing::split_edges_bidi(state, edge, opposite, position)?;
            }
            EditCommand::DeleteLane { lane } => editing::delete_lane(state, lane)?,
            EditCommand::DuplicateLane { lane } => {
                editing::duplicate_lane(state, lane)?;
            }
            EditCommand::RestrictLane { class, lane } => {
                handlers::editing::restrict_lane(state, class, lane)?
            }
            EditCommand::AddRestrictedLane { class, edge, index } => {
                handlers::editing::add_restricted_lane(state, class, edge, index)?
            }
            EditCommand::RemoveRestrictedLane { class, edge } => {
                handlers::editing::remove_restricted_lane(state, class, edge)?
            }
            EditCommand::DeleteConnection { edge, connection } => {
                editing::delete_connection(state, edge, &connection)?
            }
            EditCommand::ClearJunctionConnections { junction } => {
                editing::clear_junction_connections(state, junction)?;
            }
            EditCommand::ResetJunctionConnections { junction } => {
                editing::reset_junction_connections(state, junction)?
            }
            EditCommand::CreateCrossing { junction, edges } => {
                editing::create_crossing(state, junction, edges)?;
            }
            EditCommand::DeleteCrossing { crossing } => editing::delete_crossing(state, crossing)?,

            // === Weitere Elemente ===
            EditCommand::CreateAdditional {
                additional,
                parents,
            } => {
                editing::create_additional(state, additional, &parents)?;
            }
            EditCommand::CreateDemandElement { demand, parents } => {
                editing::create_demand_element(state, demand, &parents)?;
            }
            EditCommand::CreateDataSet { id } => {
                editing::create_data_set(state, id.as_deref())?;
            }
            EditCommand::CreateDataInterval {
                data_set,
                begin,
                end,
            } => {
                editing::create_data_interval(state, data_set, begin, end)?;
            }
            EditCommand::CreateGenericData {
                interval,
                tag,
                targets,
                params,
            } => {
                editing::create_generic_data(state, interval, tag, &targets, params)?;
            }
            EditCommand::DeleteElement { handle } => editing::delete_element(state, handle)?,

            // === Attribute & Selektion ===
            EditCommand::SetAttribute { handle, key, value } => {
                editing::set_attribute(state, handle, key, value)?
            }
            EditCommand::Rename { handle, new_id } => editing::rename(state, handle, &new_id)?,
            EditCommand::SetSelected { handle, selected } => {
                editing::set_selected(state, handle, selected)?
            }
            EditCommand::ClearSelection => handlers::editing::clear_selection(state)?,

            // === Bereinigung ===
            EditCommand::RemoveSolitaryJunctions => {
                handlers::editing::remove_solitary_junctions(state)?
            }
            EditCommand::CleanUnusedRoutes => handlers::editing::clean_unused_routes(state)?,
            EditCommand::CleanInvalidCrossings => {
                editing::clean_invalid_crossings(state)?;
            }
            EditCommand::JoinRoutes => {
                editing::join_routes(state)?;
            }
            EditCommand::CleanInvalidDemandElements => {
                editing::clean_invalid_demand_elements(state)?;
            }

            // === History ===
            EditCommand::Undo => handlers::history::undo(state)?,
            EditCommand::Redo => handlers::history::redo(state)?,

            // === Netz ===
            EditCommand::ComputeNetwork { force, volatile } => {
                handlers::network::compute(state, force, volatile)?
            }
            EditCommand::BulkLoad { items } => handlers::network::bulk_load(state, items)?,
            EditCommand::MarkSaved { category } => handlers::network::mark_saved(state, category),
        }

        Ok(())
    }
}
