//! Element-Store: Arena aller Elemente mit ID-Index pro Namensraum.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use super::{Category, Element, ElementHandle, NetError, NetResult, Namespace};

/// Schlüssel des Abfahrts-Index: `(Abfahrtszeit, ID)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartureKey {
    pub depart: f64,
    pub id: String,
}

impl Eq for DepartureKey {}

impl PartialOrd for DepartureKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DepartureKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.depart
            .total_cmp(&other.depart)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Besitzt alle Elemente; hält ID-Index und Abfahrts-Index synchron.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: HashMap<ElementHandle, Element>,
    ids: HashMap<Namespace, BTreeMap<String, ElementHandle>>,
    departures: BTreeMap<DepartureKey, ElementHandle>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Fügt ein Element unter `handle` ein.
    pub fn insert(&mut self, handle: ElementHandle, element: Element) -> NetResult<()> {
        if self.elements.contains_key(&handle) {
            return Err(NetError::integrity(format!(
                "Handle {} ist bereits belegt",
                handle
            )));
        }
        let namespace = element.category().namespace();
        let ids = self.ids.entry(namespace).or_default();
        if ids.contains_key(element.id()) {
            return Err(NetError::duplicate(namespace, element.id()));
        }
        ids.insert(element.id().to_string(), handle);
        if let Some(depart) = element.departure() {
            self.departures.insert(
                DepartureKey {
                    depart,
                    id: element.id().to_string(),
                },
                handle,
            );
        }
        self.elements.insert(handle, element);
        Ok(())
    }

    /// Entfernt ein Element und liefert es zurück.
    pub fn remove(&mut self, handle: ElementHandle) -> NetResult<Element> {
        let element = self
            .elements
            .remove(&handle)
            .ok_or_else(|| NetError::unknown_handle(handle))?;
        if let Some(ids) = self.ids.get_mut(&element.category().namespace()) {
            ids.remove(element.id());
        }
        if let Some(depart) = element.departure() {
            self.departures.remove(&DepartureKey {
                depart,
                id: element.id().to_string(),
            });
        }
        Ok(element)
    }

    pub fn get(&self, handle: ElementHandle) -> Option<&Element> {
        self.elements.get(&handle)
    }

    pub fn contains(&self, handle: ElementHandle) -> bool {
        self.elements.contains_key(&handle)
    }

    /// Sucht ein Element per Kategorie und ID.
    pub fn lookup(&self, category: Category, id: &str) -> NetResult<ElementHandle> {
        self.ids
            .get(&category.namespace())
            .and_then(|ids| ids.get(id))
            .copied()
            .filter(|handle| {
                self.elements
                    .get(handle)
                    .is_some_and(|e| e.category() == category)
            })
            .ok_or_else(|| NetError::not_found(category, id))
    }

    /// Prüft, ob `id` im Namensraum belegt ist.
    pub fn is_occupied(&self, namespace: Namespace, id: &str) -> bool {
        self.ids
            .get(&namespace)
            .is_some_and(|ids| ids.contains_key(id))
    }

    /// Benennt ein Element um; alter und neuer Eintrag wechseln atomar.
    pub fn rename(&mut self, handle: ElementHandle, new_id: &str) -> NetResult<String> {
        let element = self
            .elements
            .get_mut(&handle)
            .ok_or_else(|| NetError::unknown_handle(handle))?;
        let namespace = element.category().namespace();
        let ids = self.ids.entry(namespace).or_default();
        let old_id = element.id().to_string();
        if old_id == new_id {
            return Ok(old_id);
        }
        if ids.contains_key(new_id) {
            return Err(NetError::duplicate(namespace, new_id));
        }
        ids.remove(&old_id);
        ids.insert(new_id.to_string(), handle);
        if let Some(depart) = element.departure() {
            self.departures.remove(&DepartureKey {
                depart,
                id: old_id.clone(),
            });
            self.departures.insert(
                DepartureKey {
                    depart,
                    id: new_id.to_string(),
                },
                handle,
            );
        }
        element.set_id(new_id.to_string());
        Ok(old_id)
    }

    /// Ändert ein Element über `f`; ID-Änderungen sind hier nicht erlaubt.
    ///
    /// Der Abfahrts-Index wird nachgeführt, falls sich die Abfahrtszeit ändert.
    pub fn modify<T>(
        &mut self,
        handle: ElementHandle,
        f: impl FnOnce(&mut Element) -> NetResult<T>,
    ) -> NetResult<T> {
        let element = self
            .elements
            .get_mut(&handle)
            .ok_or_else(|| NetError::unknown_handle(handle))?;
        let id_before = element.id().to_string();
        let depart_before = element.departure();
        let result = f(element)?;
        if element.id() != id_before {
            return Err(NetError::integrity(format!(
                "ID von {} darf nicht direkt geändert werden",
                id_before
            )));
        }
        let depart_after = element.departure();
        if depart_before != depart_after {
            if let Some(depart) = depart_before {
                self.departures.remove(&DepartureKey {
                    depart,
                    id: id_before.clone(),
                });
            }
            if let Some(depart) = depart_after {
                self.departures.insert(
                    DepartureKey {
                        depart,
                        id: id_before,
                    },
                    handle,
                );
            }
        }
        Ok(result)
    }

    /// Alle Handles einer Kategorie in ID-Reihenfolge.
    pub fn handles_of(&self, category: Category) -> Vec<ElementHandle> {
        self.ids
            .get(&category.namespace())
            .map(|ids| {
                ids.values()
                    .copied()
                    .filter(|h| {
                        self.elements
                            .get(h)
                            .is_some_and(|e| e.category() == category)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fahrzeuge und Personen sortiert nach `(Abfahrt, ID)`.
    pub fn departures(&self) -> impl Iterator<Item = (&DepartureKey, ElementHandle)> {
        self.departures.iter().map(|(k, h)| (k, *h))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementHandle, &Element)> {
        self.elements.iter().map(|(h, e)| (*h, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DemandElement, DemandTag, Junction};
    use glam::Vec2;

    fn vehicle(id: &str, depart: f64, tag: DemandTag) -> Element {
        let mut v = DemandElement::new(id, tag);
        v.depart = depart;
        Element::Demand(v)
    }

    #[test]
    fn insert_rejects_duplicate_ids_in_namespace() {
        let mut store = ElementStore::new();
        store
            .insert(ElementHandle(1), vehicle("v", 0.0, DemandTag::Vehicle))
            .expect("erstes Einfügen ok");

        let err = store
            .insert(ElementHandle(2), vehicle("v", 5.0, DemandTag::Flow))
            .expect_err("gemeinsamer Namensraum");
        assert!(matches!(err, NetError::DuplicateId { .. }));
    }

    #[test]
    fn lookup_checks_category() {
        let mut store = ElementStore::new();
        store
            .insert(ElementHandle(1), vehicle("v", 0.0, DemandTag::Vehicle))
            .expect("Einfügen ok");

        assert_eq!(
            store.lookup(Category::Demand(DemandTag::Vehicle), "v"),
            Ok(ElementHandle(1))
        );
        assert!(store.lookup(Category::Demand(DemandTag::Flow), "v").is_err());
    }

    #[test]
    fn departures_are_sorted_by_time_then_id() {
        let mut store = ElementStore::new();
        store
            .insert(ElementHandle(1), vehicle("b", 10.0, DemandTag::Vehicle))
            .expect("ok");
        store
            .insert(ElementHandle(2), vehicle("a", 10.0, DemandTag::Trip))
            .expect("ok");
        store
            .insert(ElementHandle(3), vehicle("p", 2.0, DemandTag::Person))
            .expect("ok");

        let order: Vec<_> = store.departures().map(|(_, h)| h.0).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn rename_moves_both_indexes() {
        let mut store = ElementStore::new();
        store
            .insert(ElementHandle(1), vehicle("alt", 1.0, DemandTag::Vehicle))
            .expect("ok");

        let old = store.rename(ElementHandle(1), "neu").expect("Umbenennen ok");
        assert_eq!(old, "alt");
        assert!(store.lookup(Category::Demand(DemandTag::Vehicle), "alt").is_err());
        assert!(store.lookup(Category::Demand(DemandTag::Vehicle), "neu").is_ok());
        let ids: Vec<_> = store.departures().map(|(k, _)| k.id.clone()).collect();
        assert_eq!(ids, vec!["neu".to_string()]);
    }

    #[test]
    fn modify_reindexes_departure() {
        let mut store = ElementStore::new();
        store
            .insert(ElementHandle(1), vehicle("a", 1.0, DemandTag::Vehicle))
            .expect("ok");
        store
            .insert(ElementHandle(2), vehicle("b", 2.0, DemandTag::Vehicle))
            .expect("ok");

        store
            .modify(ElementHandle(1), |e| {
                if let Element::Demand(d) = e {
                    d.depart = 3.0;
                }
                Ok(())
            })
            .expect("ok");

        let order: Vec<_> = store.departures().map(|(_, h)| h.0).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn remove_unknown_handle_is_not_found() {
        let mut store = ElementStore::new();
        store
            .insert(
                ElementHandle(1),
                Element::Junction(Junction::new("J0", Vec2::ZERO)),
            )
            .expect("ok");

        assert!(store.remove(ElementHandle(1)).is_ok());
        assert!(matches!(
            store.remove(ElementHandle(1)),
            Err(NetError::NotFound { .. })
        ));
    }
}
