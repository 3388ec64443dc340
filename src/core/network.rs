//! Das zentrale Netz-Objekt: Store, Hierarchie, Spatial-Index, ID-Registry und Flags.
//!
//! Alle primitiven Mutationen laufen hier durch, damit Indizes, Speicher-Flags
//! und das "Neuberechnung nötig"-Flag synchron bleiben. Die Methoden mit
//! `_raw`-Suffix protokollieren nichts; Undo-fähige Änderungen entstehen
//! ausschließlich über [`crate::core::Change`].

mod queries;

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

pub use queries::{ElementRecord, NetworkContent};

use super::geometry;
use super::{
    Aabb, AttrKey, AttrValue, Category, Connection, EdgeEnd, Element, ElementHandle,
    ElementStore, Hierarchy, IdRegistry, NetError, NetResult, SaveCategory, SpatialIndex,
};
use super::{Additional, Crossing, DemandElement, Edge, Junction, Lane};

/// Position eines Elements in der Kind-Liste eines Parents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentLink {
    pub parent: ElementHandle,
    pub index: usize,
}

/// Wertkopie eines Elements samt Parent-Verknüpfungen.
///
/// Reicht aus, um das Element unter seinem ursprünglichen Handle exakt
/// wieder einzuhängen.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSnapshot {
    pub handle: ElementHandle,
    pub element: Element,
    pub parents: Vec<ParentLink>,
}

/// Ampelprogramm einer Junction (vom Netz-Builder berechnet).
#[derive(Debug, Clone, PartialEq)]
pub struct TlsProgram {
    pub junction: String,
    pub program_id: String,
    /// Anzahl gesteuerter Verbindungen
    pub link_count: usize,
}

/// Veränderlicher Netz-Graph.
#[derive(Debug, Clone, Default)]
pub struct Network {
    store: ElementStore,
    hierarchy: Hierarchy,
    spatial: SpatialIndex,
    ids: IdRegistry,
    next_handle: u64,
    unsaved: BTreeSet<SaveCategory>,
    needs_recompute: bool,
    tls_programs: BTreeMap<String, TlsProgram>,
}

impl Network {
    /// Erstellt ein leeres Netz.
    pub fn new() -> Self {
        Self::default()
    }

    /// Leeres Netz, das ID-Registry, Handle-Zähler, Flags und Ampelprogramme übernimmt.
    ///
    /// Grundlage der volatilen Neuberechnung: alle bisherigen Handles werden ungültig.
    pub(crate) fn emptied(&self) -> Self {
        Self {
            ids: self.ids.clone(),
            next_handle: self.next_handle,
            unsaved: self.unsaved.clone(),
            needs_recompute: self.needs_recompute,
            tls_programs: self.tls_programs.clone(),
            ..Self::default()
        }
    }

    /// Reserviert ein neues, nie zuvor vergebenes Handle.
    pub fn allocate_handle(&mut self) -> ElementHandle {
        let handle = ElementHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn spatial(&self) -> &SpatialIndex {
        &self.spatial
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn contains(&self, handle: ElementHandle) -> bool {
        self.store.contains(handle)
    }

    pub fn element(&self, handle: ElementHandle) -> NetResult<&Element> {
        self.store
            .get(handle)
            .ok_or_else(|| NetError::unknown_handle(handle))
    }

    pub fn junction(&self, handle: ElementHandle) -> NetResult<&Junction> {
        self.element(handle)?
            .as_junction()
            .ok_or_else(|| NetError::not_found(Category::Junction, handle.to_string()))
    }

    pub fn edge(&self, handle: ElementHandle) -> NetResult<&Edge> {
        self.element(handle)?
            .as_edge()
            .ok_or_else(|| NetError::not_found(Category::Edge, handle.to_string()))
    }

    pub fn lane(&self, handle: ElementHandle) -> NetResult<&Lane> {
        self.element(handle)?
            .as_lane()
            .ok_or_else(|| NetError::not_found(Category::Lane, handle.to_string()))
    }

    pub fn crossing(&self, handle: ElementHandle) -> NetResult<&Crossing> {
        self.element(handle)?
            .as_crossing()
            .ok_or_else(|| NetError::not_found(Category::Crossing, handle.to_string()))
    }

    pub fn additional(&self, handle: ElementHandle) -> NetResult<&Additional> {
        self.element(handle)?.as_additional().ok_or_else(|| {
            NetError::InvalidOperation {
                message: format!("{} ist kein Additional", handle),
            }
        })
    }

    pub fn demand(&self, handle: ElementHandle) -> NetResult<&DemandElement> {
        self.element(handle)?.as_demand().ok_or_else(|| {
            NetError::InvalidOperation {
                message: format!("{} ist kein Demand-Element", handle),
            }
        })
    }

    /// Sucht ein Element per Kategorie und ID.
    pub fn lookup(&self, category: Category, id: &str) -> NetResult<ElementHandle> {
        self.store.lookup(category, id)
    }

    // ── IDs ─────────────────────────────────────────────────────────

    /// Erzeugt eine freie ID für `category`.
    pub fn generate_id(&mut self, category: Category) -> String {
        let namespace = category.namespace();
        let store = &self.store;
        self.ids
            .next(category, |candidate| store.is_occupied(namespace, candidate))
    }

    /// `true` wenn `id` im Namensraum von `category` aktuell nicht belegt ist.
    pub fn is_id_free(&self, category: Category, id: &str) -> bool {
        !self.store.is_occupied(category.namespace(), id)
    }

    pub fn reserve_id(&mut self, category: Category, id: &str) {
        self.ids.reserve(category.namespace(), id);
    }

    pub fn is_id_reserved(&self, category: Category, id: &str) -> bool {
        self.ids.is_reserved(category.namespace(), id)
    }

    // ── Flags ───────────────────────────────────────────────────────

    /// Markiert eine Speicherkategorie als ungespeichert.
    pub fn require_save(&mut self, category: SaveCategory) {
        self.unsaved.insert(category);
    }

    pub fn is_saved(&self, category: SaveCategory) -> bool {
        !self.unsaved.contains(&category)
    }

    /// Setzt das Flag nach erfolgreichem Schreiben zurück.
    pub fn mark_saved(&mut self, category: SaveCategory) {
        self.unsaved.remove(&category);
    }

    pub fn needs_recompute(&self) -> bool {
        self.needs_recompute
    }

    pub fn require_recompute(&mut self) {
        self.needs_recompute = true;
    }

    pub(crate) fn clear_recompute(&mut self) {
        self.needs_recompute = false;
    }

    fn touch(&mut self, category: Category) {
        self.unsaved.insert(category.save_category());
        if category.is_topology() {
            self.needs_recompute = true;
        }
    }

    // ── Ampelprogramme ──────────────────────────────────────────────

    pub fn tls_programs(&self) -> impl Iterator<Item = &TlsProgram> {
        self.tls_programs.values()
    }

    pub fn tls_program(&self, junction_id: &str) -> Option<&TlsProgram> {
        self.tls_programs.get(junction_id)
    }

    pub(crate) fn set_tls_program(&mut self, program: TlsProgram) {
        if self.tls_programs.get(&program.junction) != Some(&program) {
            self.tls_programs.insert(program.junction.clone(), program);
            self.unsaved.insert(SaveCategory::TlsPrograms);
        }
    }

    pub(crate) fn remove_tls_program(&mut self, junction_id: &str) {
        if self.tls_programs.remove(junction_id).is_some() {
            self.unsaved.insert(SaveCategory::TlsPrograms);
        }
    }

    // ── Topologie-Abfragen ──────────────────────────────────────────

    pub fn parents(&self, handle: ElementHandle) -> Vec<ElementHandle> {
        self.hierarchy.parents(handle).iter().copied().collect()
    }

    pub fn children(&self, handle: ElementHandle) -> Vec<ElementHandle> {
        self.hierarchy.children(handle).iter().copied().collect()
    }

    fn children_of(&self, handle: ElementHandle, category: Category) -> Vec<ElementHandle> {
        self.hierarchy
            .children(handle)
            .iter()
            .copied()
            .filter(|h| self.store.get(*h).is_some_and(|e| e.category() == category))
            .collect()
    }

    /// Spuren einer Kante, sortiert nach Index.
    pub fn lanes_of(&self, edge: ElementHandle) -> Vec<ElementHandle> {
        let mut lanes = self.children_of(edge, Category::Lane);
        lanes.sort_by_key(|h| self.lane(*h).map(|l| l.index).unwrap_or(usize::MAX));
        lanes
    }

    /// Kante, zu der eine Spur gehört.
    pub fn lane_edge(&self, lane: ElementHandle) -> NetResult<ElementHandle> {
        self.lane(lane)?;
        self.hierarchy
            .parents(lane)
            .iter()
            .copied()
            .find(|h| self.edge(*h).is_ok())
            .ok_or_else(|| NetError::integrity(format!("Spur {} hat keine Kante", lane)))
    }

    /// Alle Kanten, die an der Junction beginnen oder enden.
    pub fn incident_edges(&self, junction: ElementHandle) -> Vec<ElementHandle> {
        self.children_of(junction, Category::Edge)
    }

    pub fn incoming_edges(&self, junction: ElementHandle) -> Vec<ElementHandle> {
        self.incident_edges(junction)
            .into_iter()
            .filter(|e| self.edge(*e).is_ok_and(|edge| edge.to == junction))
            .collect()
    }

    pub fn outgoing_edges(&self, junction: ElementHandle) -> Vec<ElementHandle> {
        self.incident_edges(junction)
            .into_iter()
            .filter(|e| self.edge(*e).is_ok_and(|edge| edge.from == junction))
            .collect()
    }

    pub fn crossings_of(&self, junction: ElementHandle) -> Vec<ElementHandle> {
        self.children_of(junction, Category::Crossing)
    }

    /// Junction, an der ein Crossing liegt.
    pub fn crossing_junction(&self, crossing: ElementHandle) -> NetResult<ElementHandle> {
        self.crossing(crossing)?;
        self.hierarchy
            .parents(crossing)
            .iter()
            .copied()
            .find(|h| self.junction(*h).is_ok())
            .ok_or_else(|| {
                NetError::integrity(format!("Crossing {} hat keine Junction", crossing))
            })
    }

    /// Alle Kanten von `source` nach `dest`.
    pub fn edges_between(&self, source: ElementHandle, dest: ElementHandle) -> Vec<ElementHandle> {
        self.outgoing_edges(source)
            .into_iter()
            .filter(|e| self.edge(*e).is_ok_and(|edge| edge.to == dest))
            .collect()
    }

    /// Die (per Konvention einzige) Kante von `source` nach `dest`.
    pub fn edge_between(&self, source: ElementHandle, dest: ElementHandle) -> NetResult<ElementHandle> {
        self.edges_between(source, dest)
            .into_iter()
            .next()
            .ok_or_else(|| NetError::not_found(Category::Edge, format!("{}->{}", source, dest)))
    }

    /// Volle Geometrie: Start-Junction, innere Punkte, Ziel-Junction.
    pub fn edge_geometry(&self, edge: ElementHandle) -> NetResult<Vec<Vec2>> {
        let e = self.edge(edge)?;
        let from = self.junction(e.from)?.position;
        let to = self.junction(e.to)?.position;
        let mut points = Vec::with_capacity(e.inner_shape.len() + 2);
        points.push(from);
        points.extend_from_slice(&e.inner_shape);
        points.push(to);
        Ok(points)
    }

    /// Spur oder Kante, auf der ein Element platziert ist.
    pub fn placement_parent(&self, handle: ElementHandle) -> Option<ElementHandle> {
        self.hierarchy.parents(handle).iter().copied().find(|p| {
            self.store
                .get(*p)
                .is_some_and(|e| matches!(e.category(), Category::Lane | Category::Edge))
        })
    }

    /// Geometrie einer Spur oder Kante.
    pub fn placement_geometry(&self, handle: ElementHandle) -> NetResult<Vec<Vec2>> {
        match self.element(handle)? {
            Element::Lane(_) => self.edge_geometry(self.lane_edge(handle)?),
            Element::Edge(_) => self.edge_geometry(handle),
            other => Err(NetError::invalid(format!(
                "{} hat keine Geometrie",
                other.category()
            ))),
        }
    }

    // ── Primitive Mutationen ────────────────────────────────────────

    /// Wertkopie eines Elements inklusive Position in allen Parent-Listen.
    pub fn snapshot(&self, handle: ElementHandle) -> NetResult<ElementSnapshot> {
        let element = self.element(handle)?.clone();
        let parents = self
            .hierarchy
            .parents(handle)
            .iter()
            .map(|parent| {
                let index = self.hierarchy.child_index(*parent, handle).ok_or_else(|| {
                    NetError::integrity(format!("{} fehlt in Kind-Liste von {}", handle, parent))
                })?;
                Ok(ParentLink {
                    parent: *parent,
                    index,
                })
            })
            .collect::<NetResult<Vec<_>>>()?;
        Ok(ElementSnapshot {
            handle,
            element,
            parents,
        })
    }

    /// Legt ein Element aus einem Snapshot an und hängt es bei seinen Parents ein.
    pub(crate) fn insert_snapshot(&mut self, snapshot: &ElementSnapshot) -> NetResult<()> {
        for link in &snapshot.parents {
            if !self.store.contains(link.parent) {
                return Err(NetError::unknown_handle(link.parent));
            }
        }
        if let Element::Edge(edge) = &snapshot.element {
            self.junction(edge.from)?;
            self.junction(edge.to)?;
        }

        snapshot.element.check_geometry()?;
        let category = snapshot.element.category();
        self.store.insert(snapshot.handle, snapshot.element.clone())?;
        for link in &snapshot.parents {
            self.hierarchy
                .attach(link.parent, snapshot.handle, Some(link.index))?;
        }
        self.ids.reserve(category.namespace(), snapshot.element.id());
        self.next_handle = self.next_handle.max(snapshot.handle.0 + 1);
        self.refresh_spatial(snapshot.handle);
        self.touch(category);
        Ok(())
    }

    /// Entfernt ein Element, das keine Kinder mehr hat.
    pub(crate) fn remove_snapshot(&mut self, snapshot: &ElementSnapshot) -> NetResult<()> {
        let handle = snapshot.handle;
        let element = self.element(handle)?;
        let category = element.category();
        let junction_id = element.as_junction().map(|j| j.id.clone());

        let remaining = self.hierarchy.children(handle).len();
        if remaining > 0 {
            let message = format!(
                "{} '{}' hat noch {} Kind-Element(e)",
                category,
                element.id(),
                remaining
            );
            log::error!("{}", message);
            return Err(NetError::integrity(message));
        }

        for parent in self.parents(handle) {
            self.hierarchy.detach(parent, handle)?;
        }
        self.store.remove(handle)?;
        self.spatial.remove(handle);
        if let Some(id) = junction_id {
            self.remove_tls_program(&id);
        }
        self.touch(category);
        Ok(())
    }

    /// Schreibt ein Attribut und liefert den alten Wert.
    pub(crate) fn write_attribute_raw(
        &mut self,
        handle: ElementHandle,
        key: &AttrKey,
        value: AttrValue,
    ) -> NetResult<AttrValue> {
        let old = self
            .store
            .modify(handle, |element| element.set_attribute(key, value))?;
        let element = self.element(handle)?;
        let category = element.category();

        if *key == AttrKey::JunctionType {
            let lost_tls = element.as_junction().is_some_and(|j| !j.junction_type.has_tls());
            let id = element.id().to_string();
            if lost_tls {
                self.remove_tls_program(&id);
            }
        }
        if key.affects_geometry() {
            self.refresh_spatial_around(handle);
        }
        if *key != AttrKey::Selected {
            self.unsaved.insert(category.save_category());
            if category.is_topology() && key.affects_topology() {
                self.needs_recompute = true;
            }
        }
        Ok(old)
    }

    /// Benennt ein Element um; bei Junctions wandert das Ampelprogramm mit.
    pub(crate) fn rename_raw(&mut self, handle: ElementHandle, new_id: &str) -> NetResult<String> {
        let old = self.store.rename(handle, new_id)?;
        let category = self.element(handle)?.category();
        self.ids.reserve(category.namespace(), new_id);
        if let Some(mut program) = self.tls_programs.remove(&old) {
            program.junction = new_id.to_string();
            self.tls_programs.insert(new_id.to_string(), program);
            self.unsaved.insert(SaveCategory::TlsPrograms);
        }
        self.unsaved.insert(category.save_category());
        Ok(old)
    }

    /// Hängt `child` von `from` nach `to` um; liefert den alten Index.
    pub(crate) fn reparent_raw(
        &mut self,
        child: ElementHandle,
        from: ElementHandle,
        to: ElementHandle,
        index: Option<usize>,
    ) -> NetResult<usize> {
        if !self.store.contains(to) {
            return Err(NetError::unknown_handle(to));
        }
        let old_index = self.hierarchy.detach(from, child)?;
        self.hierarchy.attach(to, child, index)?;
        let category = self.element(child)?.category();
        self.refresh_spatial_around(child);
        self.touch(category);
        Ok(old_index)
    }

    /// Setzt Start- oder Ziel-Junction einer Kante neu.
    pub(crate) fn reconnect_raw(
        &mut self,
        edge: ElementHandle,
        end: EdgeEnd,
        junction: ElementHandle,
        index: Option<usize>,
    ) -> NetResult<usize> {
        let e = self.edge(edge)?;
        let (old, other) = match end {
            EdgeEnd::From => (e.from, e.to),
            EdgeEnd::To => (e.to, e.from),
        };
        self.junction(junction)?;
        if junction == other {
            return Err(NetError::invalid(format!(
                "Kante {} würde zur Schleife an {}",
                e.id, junction
            )));
        }

        let old_index = self.hierarchy.detach(old, edge)?;
        self.hierarchy.attach(junction, edge, index)?;
        self.store.modify(edge, |element| {
            if let Element::Edge(e) = element {
                match end {
                    EdgeEnd::From => e.from = junction,
                    EdgeEnd::To => e.to = junction,
                }
            }
            Ok(())
        })?;
        self.refresh_spatial_around(edge);
        self.touch(Category::Edge);
        Ok(old_index)
    }

    /// Ersetzt die ausgehenden Verbindungen einer Kante.
    pub(crate) fn set_connections_raw(
        &mut self,
        edge: ElementHandle,
        connections: Vec<Connection>,
    ) -> NetResult<Vec<Connection>> {
        let old = self.store.modify(edge, |element| match element {
            Element::Edge(e) => Ok(std::mem::replace(&mut e.connections, connections)),
            other => Err(NetError::not_found(Category::Edge, other.id())),
        })?;
        self.touch(Category::Edge);
        Ok(old)
    }

    /// Setzt das Gültigkeits-Flag der Junction-Logik.
    pub(crate) fn set_logic_valid_raw(
        &mut self,
        junction: ElementHandle,
        valid: bool,
    ) -> NetResult<bool> {
        let old = self.store.modify(junction, |element| match element {
            Element::Junction(j) => Ok(std::mem::replace(&mut j.logic_valid, valid)),
            other => Err(NetError::not_found(Category::Junction, other.id())),
        })?;
        if !valid {
            self.needs_recompute = true;
        }
        Ok(old)
    }

    // ── Spatial-Index ───────────────────────────────────────────────

    /// Bounding-Box eines platzierbaren Elements.
    fn element_bounds(&self, handle: ElementHandle) -> Option<Aabb> {
        match self.store.get(handle)? {
            Element::Junction(j) => Some(Aabb::point(j.position)),
            Element::Edge(_) => {
                let points = self.edge_geometry(handle).ok()?;
                geometry::bounds(&points).map(|(min, max)| Aabb::new(min, max))
            }
            Element::Additional(a) => {
                if !a.shape.is_empty() {
                    return geometry::bounds(&a.shape).map(|(min, max)| Aabb::new(min, max));
                }
                if let Some(p) = a.position {
                    return Some(Aabb::point(p));
                }
                let start = a.start?;
                let points = self.placement_geometry(self.placement_parent(handle)?).ok()?;
                let a_pos = geometry::position_at(&points, start)?;
                let b_pos = geometry::position_at(&points, a.end.unwrap_or(start))?;
                Some(Aabb::new(a_pos, b_pos))
            }
            _ => None,
        }
    }

    fn refresh_spatial(&mut self, handle: ElementHandle) {
        match self.element_bounds(handle) {
            Some(aabb) => self.spatial.insert(handle, aabb),
            None => {
                self.spatial.remove(handle);
            }
        }
    }

    /// Aktualisiert ein Element und alle seine Nachkommen im Spatial-Index.
    fn refresh_spatial_around(&mut self, handle: ElementHandle) {
        for h in self.hierarchy.cascade_order(handle) {
            self.refresh_spatial(h);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AdditionalTag, JunctionType};

    fn junction_snapshot(net: &mut Network, id: &str, pos: Vec2) -> ElementSnapshot {
        ElementSnapshot {
            handle: net.allocate_handle(),
            element: Element::Junction(Junction::new(id, pos)),
            parents: Vec::new(),
        }
    }

    fn edge_snapshot(
        net: &mut Network,
        id: &str,
        from: ElementHandle,
        to: ElementHandle,
    ) -> ElementSnapshot {
        let from_index = net.hierarchy.children(from).len();
        let to_index = net.hierarchy.children(to).len();
        ElementSnapshot {
            handle: net.allocate_handle(),
            element: Element::Edge(Edge {
                id: id.to_string(),
                from,
                to,
                inner_shape: Vec::new(),
                speed: 13.89,
                priority: -1,
                edge_type: String::new(),
                was_split: false,
                connections: Vec::new(),
                selected: false,
            }),
            parents: vec![
                ParentLink {
                    parent: from,
                    index: from_index,
                },
                ParentLink {
                    parent: to,
                    index: to_index,
                },
            ],
        }
    }

    fn two_junctions_one_edge() -> (Network, ElementHandle, ElementHandle, ElementHandle) {
        let mut net = Network::new();
        let a = junction_snapshot(&mut net, "A", Vec2::new(0.0, 0.0));
        let b = junction_snapshot(&mut net, "B", Vec2::new(100.0, 0.0));
        net.insert_snapshot(&a).expect("A");
        net.insert_snapshot(&b).expect("B");
        let e = edge_snapshot(&mut net, "E", a.handle, b.handle);
        net.insert_snapshot(&e).expect("E");
        (net, a.handle, b.handle, e.handle)
    }

    #[test]
    fn insert_links_edge_to_both_junctions() {
        let (net, a, b, e) = two_junctions_one_edge();

        assert_eq!(net.outgoing_edges(a), vec![e]);
        assert_eq!(net.incoming_edges(b), vec![e]);
        assert_eq!(net.edge_between(a, b), Ok(e));
        assert!(net.edge_between(b, a).is_err());
        assert!(net.needs_recompute());
        assert!(!net.is_saved(SaveCategory::Network));
    }

    #[test]
    fn remove_with_children_is_an_integrity_violation() {
        let (mut net, a, _, _) = two_junctions_one_edge();
        let snapshot = net.snapshot(a).expect("Snapshot");

        let err = net.remove_snapshot(&snapshot).expect_err("Kante hängt noch an A");
        assert!(err.is_fatal());
        assert!(net.contains(a));
    }

    #[test]
    fn remove_then_insert_restores_child_position() {
        let (mut net, a, b, e) = two_junctions_one_edge();
        let snapshot = net.snapshot(e).expect("Snapshot");

        net.remove_snapshot(&snapshot).expect("Entfernen ok");
        assert!(net.incident_edges(a).is_empty());
        assert!(net.spatial().bounds_of(e).is_none());

        net.insert_snapshot(&snapshot).expect("Wiederherstellen ok");
        assert_eq!(net.incident_edges(b), vec![e]);
        assert!(net.spatial().bounds_of(e).is_some());
    }

    #[test]
    fn moving_a_junction_refreshes_edge_bounds() {
        let (mut net, _, b, e) = two_junctions_one_edge();

        net.write_attribute_raw(b, &AttrKey::Position, AttrValue::Point(Vec2::new(0.0, 50.0)))
            .expect("Position setzbar");

        let bounds = net.spatial().bounds_of(e).expect("Kante indexiert");
        assert_eq!(bounds.max, Vec2::new(0.0, 50.0));
    }

    #[test]
    fn reconnect_rejects_self_loops() {
        let (mut net, a, _, e) = two_junctions_one_edge();

        let err = net
            .reconnect_raw(e, EdgeEnd::To, a, None)
            .expect_err("Schleife");
        assert!(matches!(err, NetError::InvalidOperation { .. }));
    }

    #[test]
    fn lane_placed_additional_follows_edge_geometry() {
        let (mut net, _, _, e) = two_junctions_one_edge();
        let lane = ElementSnapshot {
            handle: net.allocate_handle(),
            element: Element::Lane(Lane {
                id: "E_0".to_string(),
                index: 0,
                speed: 13.89,
                width: 3.2,
                allow: String::new(),
                selected: false,
            }),
            parents: vec![ParentLink {
                parent: e,
                index: 0,
            }],
        };
        net.insert_snapshot(&lane).expect("Spur");

        let mut stop = Additional::new("bs", AdditionalTag::BusStop);
        stop.start = Some(10.0);
        stop.end = Some(30.0);
        let stop = ElementSnapshot {
            handle: net.allocate_handle(),
            element: Element::Additional(stop),
            parents: vec![ParentLink {
                parent: lane.handle,
                index: 0,
            }],
        };
        net.insert_snapshot(&stop).expect("Haltestelle");

        let bounds = net.spatial().bounds_of(stop.handle).expect("indexiert");
        assert_eq!(bounds.min, Vec2::new(10.0, 0.0));
        assert_eq!(bounds.max, Vec2::new(30.0, 0.0));
        assert_eq!(net.placement_parent(stop.handle), Some(lane.handle));
    }

    #[test]
    fn demoting_a_traffic_light_drops_its_program() {
        let (mut net, a, _, _) = two_junctions_one_edge();
        net.write_attribute_raw(
            a,
            &AttrKey::JunctionType,
            AttrValue::JunctionType(JunctionType::TrafficLight),
        )
        .expect("Typ setzbar");
        net.set_tls_program(TlsProgram {
            junction: "A".to_string(),
            program_id: "0".to_string(),
            link_count: 1,
        });

        net.write_attribute_raw(
            a,
            &AttrKey::JunctionType,
            AttrValue::JunctionType(JunctionType::Priority),
        )
        .expect("Typ setzbar");
        assert!(net.tls_program("A").is_none());
    }
}
