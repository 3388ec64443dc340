use std::collections::BTreeMap;

use glam::Vec2;

use crate::app::use_cases::editing::{EdgeCreateOptions, EdgeTemplate};
use crate::app::use_cases::load::LoadItem;
use crate::core::{
    Additional, AttrKey, AttrValue, Connection, DemandElement, ElementHandle, GenericDataTag,
    SaveCategory, VehicleClass,
};

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
///
/// Jeder Command (außer Undo/Redo, Neuberechnung und Laden) bildet genau
/// eine Undo-Gruppe.
#[derive(Debug, Clone)]
pub enum EditCommand {
    // === Topologie ===
    /// Neue Junction an Weltposition
    CreateJunction { position: Vec2 },
    DeleteJunction { junction: ElementHandle },
    /// `moved` wird in `target` verschmolzen
    MergeJunctions {
        moved: ElementHandle,
        target: ElementHandle,
    },
    /// Alle selektierten Junctions zu einer vereinigen
    JoinSelectedJunctions,
    /// Junction durch einen Geometriepunkt der durchgehenden Kanten ersetzen
    ReplaceJunctionByGeometry { junction: ElementHandle },
    /// Junction in eine Junction pro Kanten-Endpunkt aufteilen
    SplitJunction {
        junction: ElementHandle,
        reconnect: bool,
    },
    CreateEdge {
        source: ElementHandle,
        dest: ElementHandle,
        template: Option<EdgeTemplate>,
        suggested_id: Option<String>,
        options: EdgeCreateOptions,
    },
    DeleteEdge { edge: ElementHandle },
    ReverseEdge { edge: ElementHandle },
    /// Gegenkante `-<id>` anlegen
    AddReversedEdge { edge: ElementHandle },
    /// Eingehende Kante `which` durch `by` ersetzen
    ReplaceIncomingEdge {
        which: ElementHandle,
        by: ElementHandle,
    },
    SplitEdge {
        edge: ElementHandle,
        position: Vec2,
        new_junction: Option<ElementHandle>,
    },
    /// Kante und Gegenkante an gemeinsamer Junction teilen
    SplitEdgesBidi {
        edge: ElementHandle,
        opposite: ElementHandle,
        position: Vec2,
    },
    DeleteLane { lane: ElementHandle },
    DuplicateLane { lane: ElementHandle },
    RestrictLane {
        class: VehicleClass,
        lane: ElementHandle,
    },
    /// Sonderspur einfügen; ohne `index` wird die Position aus der Klasse abgeleitet
    AddRestrictedLane {
        class: VehicleClass,
        edge: ElementHandle,
        index: Option<usize>,
    },
    RemoveRestrictedLane {
        class: VehicleClass,
        edge: ElementHandle,
    },
    DeleteConnection {
        edge: ElementHandle,
        connection: Connection,
    },
    ClearJunctionConnections { junction: ElementHandle },
    /// Verbindungen leeren und Logik neu berechnen lassen
    ResetJunctionConnections { junction: ElementHandle },
    CreateCrossing {
        junction: ElementHandle,
        edges: Vec<ElementHandle>,
    },
    DeleteCrossing { crossing: ElementHandle },

    // === Weitere Elemente ===
    CreateAdditional {
        additional: Additional,
        parents: Vec<ElementHandle>,
    },
    CreateDemandElement {
        demand: DemandElement,
        parents: Vec<ElementHandle>,
    },
    CreateDataSet { id: Option<String> },
    CreateDataInterval {
        data_set: ElementHandle,
        begin: f64,
        end: f64,
    },
    CreateGenericData {
        interval: ElementHandle,
        tag: GenericDataTag,
        targets: Vec<ElementHandle>,
        params: BTreeMap<String, String>,
    },
    /// Beliebiges Element samt abhängiger Elemente löschen
    DeleteElement { handle: ElementHandle },

    // === Attribute & Selektion ===
    SetAttribute {
        handle: ElementHandle,
        key: AttrKey,
        value: AttrValue,
    },
    Rename {
        handle: ElementHandle,
        new_id: String,
    },
    SetSelected {
        handle: ElementHandle,
        selected: bool,
    },
    ClearSelection,

    // === Bereinigung ===
    RemoveSolitaryJunctions,
    CleanUnusedRoutes,
    CleanInvalidCrossings,
    /// Routen mit identischer Kantenliste zusammenführen
    JoinRoutes,
    CleanInvalidDemandElements,

    // === Historie ===
    Undo,
    Redo,

    // === Netz ===
    /// Verbindungen und Ampelprogramme neu berechnen
    ComputeNetwork { force: bool, volatile: bool },
    /// Elemente ohne Undo-Protokoll laden
    BulkLoad { items: Vec<LoadItem> },
    /// Speicherkategorie nach erfolgreichem Schreiben zurücksetzen
    MarkSaved { category: SaveCategory },
}
