//! Spatial-Index (KD-Tree über Bounding-Box-Zentren) für platzierbare Elemente.

use std::collections::HashMap;

use glam::Vec2;
use kiddo::{KdTree, SquaredEuclidean};

use super::ElementHandle;

/// Achsenparallele Bounding-Box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn point(p: Vec2) -> Self {
        Self { min: p, max: p }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn half_diagonal(&self) -> f32 {
        (self.max - self.min).length() * 0.5
    }

    /// Abstand eines Punkts zur Box (0 innerhalb).
    pub fn distance_to(&self, p: Vec2) -> f32 {
        let clamped = p.clamp(self.min, self.max);
        clamped.distance(p)
    }

    pub fn intersects(&self, min: Vec2, max: Vec2) -> bool {
        self.min.x <= max.x && self.max.x >= min.x && self.min.y <= max.y && self.max.y >= min.y
    }

    fn key(&self) -> [f64; 2] {
        let c = self.center();
        [c.x as f64, c.y as f64]
    }
}

/// Bitgenauer Schlüssel eines KD-Tree-Punkts; `-0.0` fällt mit `0.0` zusammen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PointKey([u64; 2]);

impl PointKey {
    fn of(point: [f64; 2]) -> Self {
        Self([(point[0] + 0.0).to_bits(), (point[1] + 0.0).to_bits()])
    }
}

/// Alle Elemente, deren Box-Mitte auf demselben Punkt liegt.
#[derive(Debug, Clone)]
struct PointSlot {
    id: u64,
    point: [f64; 2],
    handles: Vec<ElementHandle>,
}

/// Ergebnis einer Distanzabfrage gegen den Spatial-Index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialMatch {
    /// Handle des gefundenen Elements
    pub handle: ElementHandle,
    /// Euklidische Distanz zwischen Suchpunkt und Bounding-Box
    pub distance: f32,
}

/// Inkrementell gepflegter Index über die Box-Mitten aller Elemente.
///
/// Der KD-Tree enthält jeden Punkt genau einmal; beliebig viele Elemente
/// dürfen sich einen Punkt teilen (ein kiddo-Bucket fasst höchstens 32
/// Einträge mit identischen Koordinaten).
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: KdTree<f64, 2>,
    boxes: HashMap<ElementHandle, Aabb>,
    slots: HashMap<PointKey, PointSlot>,
    slot_keys: HashMap<u64, PointKey>,
    next_slot: u64,
    /// Größte jemals eingefügte halbe Box-Diagonale; nur wachsend
    max_half_diag: f32,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl SpatialIndex {
    /// Erstellt einen leeren Spatial-Index.
    pub fn empty() -> Self {
        Self {
            tree: KdTree::new(),
            boxes: HashMap::new(),
            slots: HashMap::new(),
            slot_keys: HashMap::new(),
            next_slot: 0,
            max_half_diag: 0.0,
        }
    }

    /// Gibt die Anzahl indexierter Elemente zurück.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Gibt `true` zurück, wenn keine Elemente im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn bounds_of(&self, handle: ElementHandle) -> Option<Aabb> {
        self.boxes.get(&handle).copied()
    }

    /// Fügt ein Element ein oder aktualisiert seine Box.
    pub fn insert(&mut self, handle: ElementHandle, aabb: Aabb) {
        if let Some(previous) = self.boxes.get(&handle) {
            if *previous == aabb {
                return;
            }
            let previous = *previous;
            self.detach_point(previous.key(), handle);
        }
        self.attach_point(aabb.key(), handle);
        self.max_half_diag = self.max_half_diag.max(aabb.half_diagonal());
        self.boxes.insert(handle, aabb);
    }

    /// Entfernt ein Element; `false` wenn es nicht indexiert war.
    pub fn remove(&mut self, handle: ElementHandle) -> bool {
        match self.boxes.remove(&handle) {
            Some(aabb) => {
                self.detach_point(aabb.key(), handle);
                true
            }
            None => false,
        }
    }

    fn attach_point(&mut self, point: [f64; 2], handle: ElementHandle) {
        let key = PointKey::of(point);
        if let Some(slot) = self.slots.get_mut(&key) {
            slot.handles.push(handle);
            return;
        }
        let id = self.next_slot;
        self.next_slot += 1;
        self.tree.add(&point, id);
        self.slot_keys.insert(id, key);
        self.slots.insert(
            key,
            PointSlot {
                id,
                point,
                handles: vec![handle],
            },
        );
    }

    fn detach_point(&mut self, point: [f64; 2], handle: ElementHandle) {
        let key = PointKey::of(point);
        let Some(slot) = self.slots.get_mut(&key) else {
            return;
        };
        slot.handles.retain(|h| *h != handle);
        if slot.handles.is_empty() {
            let (id, point) = (slot.id, slot.point);
            self.slots.remove(&key);
            self.slot_keys.remove(&id);
            self.tree.remove(&point, id);
        }
    }

    /// Alle Elemente eines KD-Tree-Eintrags.
    fn slot_handles(&self, slot_id: u64) -> &[ElementHandle] {
        self.slot_keys
            .get(&slot_id)
            .and_then(|key| self.slots.get(key))
            .map(|slot| slot.handles.as_slice())
            .unwrap_or(&[])
    }

    /// Findet das Element mit der nächstgelegenen Bounding-Box.
    pub fn nearest(&self, query: Vec2) -> Option<SpatialMatch> {
        if self.is_empty() {
            return None;
        }

        let center_hit = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[query.x as f64, query.y as f64]);
        // Die nächste Box-Mitte begrenzt den Suchradius für die exakte Box-Distanz
        let bound = (center_hit.distance as f32).sqrt() + self.max_half_diag;
        self.within_radius(query, bound).into_iter().next()
    }

    /// Findet alle Elemente, deren Box höchstens `radius` vom Suchpunkt entfernt ist.
    pub fn within_radius(&self, query: Vec2, radius: f32) -> Vec<SpatialMatch> {
        if self.is_empty() || radius.is_sign_negative() {
            return Vec::new();
        }

        let search = (radius + self.max_half_diag) as f64;
        let mut results = self
            .tree
            .within::<SquaredEuclidean>(&[query.x as f64, query.y as f64], search * search)
            .into_iter()
            .flat_map(|entry| self.slot_handles(entry.item).iter().copied())
            .filter_map(|handle| {
                let distance = self.boxes.get(&handle)?.distance_to(query);
                (distance <= radius).then_some(SpatialMatch { handle, distance })
            })
            .collect::<Vec<_>>();

        results.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.handle.cmp(&b.handle))
        });
        results
    }

    /// Findet alle Elemente, deren Box das Rechteck schneidet.
    ///
    /// KD-Tree-Vorfilter über den umschließenden Kreis, erweitert um die größte
    /// halbe Box-Diagonale, danach exakte Box-Prüfung.
    pub fn within_rect(&self, min: Vec2, max: Vec2) -> Vec<ElementHandle> {
        if self.is_empty() {
            return Vec::new();
        }

        let rect = Aabb::new(min, max);
        let radius = (rect.half_diagonal() + self.max_half_diag) as f64;
        let center = rect.key();

        let mut handles: Vec<ElementHandle> = self
            .tree
            .within::<SquaredEuclidean>(&center, radius * radius)
            .into_iter()
            .flat_map(|entry| self.slot_handles(entry.item).iter().copied())
            .filter(|handle| {
                self.boxes
                    .get(handle)
                    .is_some_and(|aabb| aabb.intersects(rect.min, rect.max))
            })
            .collect();
        handles.sort_unstable();
        handles
    }
}
