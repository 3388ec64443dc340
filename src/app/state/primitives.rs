//! Undo-fähige Grundbausteine, aus denen alle strukturellen Operationen bestehen.
//!
//! Jede Methode prüft ihre Vorbedingungen vollständig, bevor sie eine
//! [`Change`] aufzeichnet.

use super::EditorState;
use crate::core::{
    AttrKey, AttrValue, Category, Change, Connection, EdgeEnd, Element, ElementHandle,
    ElementSnapshot, Lane, NetError, NetResult, ParentLink,
};

impl EditorState {
    /// Legt ein neues Element an und hängt es am Ende der Kind-Listen seiner Parents ein.
    pub(crate) fn create_element(
        &mut self,
        element: Element,
        parents: &[ElementHandle],
    ) -> NetResult<ElementHandle> {
        let category = element.category();
        if !self.network.is_id_free(category, element.id()) {
            return Err(NetError::duplicate(category.namespace(), element.id()));
        }
        let parents = parents
            .iter()
            .map(|&parent| {
                self.network.element(parent)?;
                Ok(ParentLink {
                    parent,
                    index: self.network.hierarchy().children(parent).len(),
                })
            })
            .collect::<NetResult<Vec<_>>>()?;
        let handle = self.network.allocate_handle();
        self.record(Change::Create(ElementSnapshot {
            handle,
            element,
            parents,
        }))?;
        Ok(handle)
    }

    /// Entfernt ein Element ohne Kinder.
    pub(crate) fn remove_element(&mut self, handle: ElementHandle) -> NetResult<()> {
        let snapshot = self.network.snapshot(handle)?;
        self.record(Change::Remove(snapshot))
    }

    /// Entfernt ein Element samt aller Nachkommen (Kinder zuerst).
    pub(crate) fn remove_cascade(&mut self, handle: ElementHandle) -> NetResult<()> {
        for h in self.network.hierarchy().cascade_order(handle) {
            if self.network.contains(h) {
                self.remove_element(h)?;
            }
        }
        Ok(())
    }

    /// Setzt ein Attribut nach vorheriger Prüfung; gleiche Werte erzeugen keine Änderung.
    pub(crate) fn set_attr(
        &mut self,
        handle: ElementHandle,
        key: AttrKey,
        value: AttrValue,
    ) -> NetResult<()> {
        let element = self.network.element(handle)?;
        let old = element.get_attribute(&key).ok_or_else(|| {
            NetError::invalid(format!(
                "Attribut {:?} existiert nicht für {}",
                key,
                element.category()
            ))
        })?;
        if old == value {
            return Ok(());
        }
        let mut checked = element.clone();
        checked.set_attribute(&key, value.clone())?;
        self.record(Change::Attribute {
            handle,
            key,
            old,
            new: value,
        })
    }

    /// Benennt ein Element um; Spuren einer Kante folgen dem neuen Kanten-Namen.
    pub(crate) fn rename_element(&mut self, handle: ElementHandle, new_id: &str) -> NetResult<()> {
        let element = self.network.element(handle)?;
        let category = element.category();
        let old = element.id().to_string();
        if old == new_id {
            return Ok(());
        }
        if new_id.is_empty() || new_id.chars().any(char::is_whitespace) {
            return Err(NetError::invalid(format!("'{}' ist keine gültige ID", new_id)));
        }
        if !self.network.is_id_free(category, new_id) {
            return Err(NetError::duplicate(category.namespace(), new_id));
        }

        self.record(Change::Rename {
            handle,
            old,
            new: new_id.to_string(),
        })?;

        if category == Category::Edge {
            for lane in self.network.lanes_of(handle) {
                let lane_data = self.network.lane(lane)?;
                let lane_new = Lane::lane_id(new_id, lane_data.index);
                let lane_old = lane_data.id.clone();
                if !self.network.is_id_free(Category::Lane, &lane_new) {
                    return Err(NetError::duplicate(Category::Lane.namespace(), lane_new));
                }
                self.record(Change::Rename {
                    handle: lane,
                    old: lane_old,
                    new: lane_new,
                })?;
            }
        }
        Ok(())
    }

    /// Hängt ein Kind von `old_parent` an das Ende der Kind-Liste von `new_parent`.
    pub(crate) fn reparent(
        &mut self,
        child: ElementHandle,
        old_parent: ElementHandle,
        new_parent: ElementHandle,
    ) -> NetResult<()> {
        if old_parent == new_parent {
            return Ok(());
        }
        self.network.element(new_parent)?;
        let old_index = self
            .network
            .hierarchy()
            .child_index(old_parent, child)
            .ok_or_else(|| {
                NetError::integrity(format!("{} ist kein Kind von {}", child, old_parent))
            })?;
        self.record(Change::Reparent {
            child,
            old_parent,
            old_index,
            new_parent,
        })
    }

    /// Verbindet ein Ende einer Kante mit einer anderen Junction.
    pub(crate) fn reconnect(
        &mut self,
        edge: ElementHandle,
        end: EdgeEnd,
        junction: ElementHandle,
    ) -> NetResult<()> {
        let e = self.network.edge(edge)?;
        let (old, other) = match end {
            EdgeEnd::From => (e.from, e.to),
            EdgeEnd::To => (e.to, e.from),
        };
        if old == junction {
            return Ok(());
        }
        if other == junction {
            return Err(NetError::invalid(format!(
                "Kante {} würde zur Schleife",
                e.id
            )));
        }
        self.network.junction(junction)?;
        let old_index = self
            .network
            .hierarchy()
            .child_index(old, edge)
            .ok_or_else(|| NetError::integrity(format!("{} fehlt an {}", edge, old)))?;
        self.record(Change::Reconnect {
            edge,
            end,
            old,
            old_index,
            new: junction,
        })
    }

    /// Ersetzt die Verbindungen einer Kante.
    pub(crate) fn set_connections(
        &mut self,
        edge: ElementHandle,
        connections: Vec<Connection>,
    ) -> NetResult<()> {
        let old = self.network.edge(edge)?.connections.clone();
        if old == connections {
            return Ok(());
        }
        self.record(Change::Connections {
            edge,
            old,
            new: connections,
        })
    }

    /// Verwirft die abgeleitete Logik einer Junction (Verbindungen der
    /// eingehenden Kanten und Gültigkeits-Flag).
    pub(crate) fn invalidate_junction(&mut self, junction: ElementHandle) -> NetResult<()> {
        for edge in self.network.incoming_edges(junction) {
            self.set_connections(edge, Vec::new())?;
        }
        if self.network.junction(junction)?.logic_valid {
            self.record(Change::LogicValid {
                junction,
                old: true,
                new: false,
            })?;
        }
        self.network.require_recompute();
        Ok(())
    }

    /// Ersetzt `which` durch `by` in allen listenartigen Kanten-Attributen.
    ///
    /// Mit `by = None` wird `which` nur entfernt; gibt die Elemente zurück,
    /// deren Liste dadurch leer wurde.
    pub(crate) fn replace_in_edge_lists(
        &mut self,
        which: ElementHandle,
        by: Option<ElementHandle>,
    ) -> NetResult<Vec<ElementHandle>> {
        let holders: Vec<(ElementHandle, Vec<ElementHandle>)> = self
            .network
            .store()
            .iter()
            .filter_map(|(h, e)| e.edge_list().map(|list| (h, list.clone())))
            .filter(|(_, list)| list.contains(&which))
            .collect();

        let mut emptied = Vec::new();
        for (holder, list) in holders {
            let mut updated: Vec<ElementHandle> = Vec::with_capacity(list.len());
            for edge in list {
                let replacement = if edge == which { by } else { Some(edge) };
                if let Some(r) = replacement {
                    if updated.last() != Some(&r) {
                        updated.push(r);
                    }
                }
            }
            if updated.is_empty() {
                emptied.push(holder);
            } else {
                self.set_attr(holder, AttrKey::Edges, AttrValue::Handles(updated))?;
            }
        }
        emptied.sort_unstable();
        Ok(emptied)
    }
}
