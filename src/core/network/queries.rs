//! Lesende Abfragen: Abruf nach Kategorie, Selektion, räumliche Suche, Inhalts-Abzug.

use std::collections::BTreeMap;

use glam::Vec2;

use super::Network;
use crate::core::{Category, Element, ElementHandle, SpatialMatch};

/// Element mit seinen Verknüpfungen, wie es in einem Inhalts-Abzug erscheint.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRecord {
    pub element: Element,
    /// Parents als sortierte Menge
    pub parents: Vec<ElementHandle>,
    /// Kinder in Listenreihenfolge
    pub children: Vec<ElementHandle>,
}

/// Vollständiger, vergleichbarer Inhalt eines Netzes.
pub type NetworkContent = BTreeMap<ElementHandle, ElementRecord>;

impl Network {
    /// Alle Handles einer Kategorie in ID-Reihenfolge.
    pub fn retrieve(&self, category: Category) -> Vec<ElementHandle> {
        self.store.handles_of(category)
    }

    pub fn count(&self, category: Category) -> usize {
        self.retrieve(category).len()
    }

    pub fn junctions(&self) -> Vec<ElementHandle> {
        self.retrieve(Category::Junction)
    }

    pub fn edges(&self) -> Vec<ElementHandle> {
        self.retrieve(Category::Edge)
    }

    /// Alle selektierten Elemente, sortiert nach Handle.
    pub fn selected_attribute_carriers(&self) -> Vec<ElementHandle> {
        let mut handles: Vec<ElementHandle> = self
            .store
            .iter()
            .filter(|(_, e)| e.is_selected())
            .map(|(h, _)| h)
            .collect();
        handles.sort_unstable();
        handles
    }

    pub fn selected_junctions(&self) -> Vec<ElementHandle> {
        self.selected_attribute_carriers()
            .into_iter()
            .filter(|h| self.junction(*h).is_ok())
            .collect()
    }

    /// Junction, die innerhalb von `tolerance` um `position` liegt.
    pub fn junction_at(&self, position: Vec2, tolerance: f32) -> Option<ElementHandle> {
        self.spatial
            .within_radius(position, tolerance)
            .into_iter()
            .map(|m| m.handle)
            .find(|h| self.junction(*h).is_ok())
    }

    /// Nächstes platzierbares Element zur Weltposition.
    pub fn nearest_element(&self, position: Vec2) -> Option<SpatialMatch> {
        self.spatial.nearest(position)
    }

    /// Alle platzierbaren Elemente, die das Rechteck schneiden.
    pub fn elements_in_rect(&self, min: Vec2, max: Vec2) -> Vec<ElementHandle> {
        self.spatial.within_rect(min, max)
    }

    /// Abzug des gesamten Inhalts für Vergleiche (z.B. nach Undo).
    pub fn content(&self) -> NetworkContent {
        self.store
            .iter()
            .map(|(handle, element)| {
                let mut parents = self.parents(handle);
                parents.sort_unstable();
                (
                    handle,
                    ElementRecord {
                        element: element.clone(),
                        parents,
                        children: self.children(handle),
                    },
                )
            })
            .collect()
    }
}
