//! Primitive, exakt umkehrbare Änderungen am Netz.

use super::{
    AttrKey, AttrValue, Connection, EdgeEnd, ElementHandle, ElementSnapshot, NetResult, Network,
};

/// Eine primitive Änderung mit allen Daten für Anwenden und Zurücknehmen.
///
/// Änderungen halten nur Wertkopien; das Netz besitzt zu jedem Zeitpunkt das
/// einzige lebende Exemplar eines Elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Element anlegen
    Create(ElementSnapshot),
    /// Element (ohne Kinder) entfernen
    Remove(ElementSnapshot),
    Attribute {
        handle: ElementHandle,
        key: AttrKey,
        old: AttrValue,
        new: AttrValue,
    },
    Rename {
        handle: ElementHandle,
        old: String,
        new: String,
    },
    /// Kind von einem Parent zu einem anderen umhängen
    Reparent {
        child: ElementHandle,
        old_parent: ElementHandle,
        old_index: usize,
        new_parent: ElementHandle,
    },
    /// Start- oder Ziel-Junction einer Kante tauschen
    Reconnect {
        edge: ElementHandle,
        end: EdgeEnd,
        old: ElementHandle,
        old_index: usize,
        new: ElementHandle,
    },
    Connections {
        edge: ElementHandle,
        old: Vec<Connection>,
        new: Vec<Connection>,
    },
    LogicValid {
        junction: ElementHandle,
        old: bool,
        new: bool,
    },
}

impl Change {
    /// Wendet die Änderung auf das Netz an.
    pub fn apply(&self, net: &mut Network) -> NetResult<()> {
        match self {
            Change::Create(snapshot) => net.insert_snapshot(snapshot),
            Change::Remove(snapshot) => net.remove_snapshot(snapshot),
            Change::Attribute {
                handle, key, new, ..
            } => net.write_attribute_raw(*handle, key, new.clone()).map(drop),
            Change::Rename { handle, new, .. } => net.rename_raw(*handle, new).map(drop),
            Change::Reparent {
                child,
                old_parent,
                new_parent,
                ..
            } => net
                .reparent_raw(*child, *old_parent, *new_parent, None)
                .map(drop),
            Change::Reconnect { edge, end, new, .. } => {
                net.reconnect_raw(*edge, *end, *new, None).map(drop)
            }
            Change::Connections { edge, new, .. } => {
                net.set_connections_raw(*edge, new.clone()).map(drop)
            }
            Change::LogicValid { junction, new, .. } => {
                net.set_logic_valid_raw(*junction, *new).map(drop)
            }
        }
    }

    /// Nimmt die Änderung exakt zurück.
    pub fn revert(&self, net: &mut Network) -> NetResult<()> {
        match self {
            Change::Create(snapshot) => net.remove_snapshot(snapshot),
            Change::Remove(snapshot) => net.insert_snapshot(snapshot),
            Change::Attribute {
                handle, key, old, ..
            } => net.write_attribute_raw(*handle, key, old.clone()).map(drop),
            Change::Rename { handle, old, .. } => net.rename_raw(*handle, old).map(drop),
            Change::Reparent {
                child,
                old_parent,
                old_index,
                new_parent,
            } => net
                .reparent_raw(*child, *new_parent, *old_parent, Some(*old_index))
                .map(drop),
            Change::Reconnect {
                edge,
                end,
                old,
                old_index,
                ..
            } => net
                .reconnect_raw(*edge, *end, *old, Some(*old_index))
                .map(drop),
            Change::Connections { edge, old, .. } => {
                net.set_connections_raw(*edge, old.clone()).map(drop)
            }
            Change::LogicValid { junction, old, .. } => {
                net.set_logic_valid_raw(*junction, *old).map(drop)
            }
        }
    }
}
