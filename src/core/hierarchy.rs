//! Parent/Child-Verknüpfungen zwischen Elementen.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;

use super::{ElementHandle, NetError, NetResult};

/// Reziproke, geordnete Eltern/Kind-Beziehungen.
///
/// Jede Verknüpfung steht gleichzeitig in der Kind-Liste des Parents und in
/// der Parent-Liste des Kinds. Beide Seiten werden ausschließlich über
/// [`Hierarchy::attach`] und [`Hierarchy::detach`] gepflegt.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    children: HashMap<ElementHandle, IndexSet<ElementHandle>>,
    parents: HashMap<ElementHandle, IndexSet<ElementHandle>>,
}

static EMPTY: std::sync::OnceLock<IndexSet<ElementHandle>> = std::sync::OnceLock::new();

fn empty() -> &'static IndexSet<ElementHandle> {
    EMPTY.get_or_init(IndexSet::new)
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verknüpft `child` mit `parent`.
    ///
    /// `index` bestimmt die Position in der Kind-Liste (angehängt wenn `None`
    /// oder größer als die Liste).
    pub fn attach(
        &mut self,
        parent: ElementHandle,
        child: ElementHandle,
        index: Option<usize>,
    ) -> NetResult<()> {
        if parent == child {
            return Err(NetError::integrity(format!(
                "{} kann nicht sein eigener Parent sein",
                parent
            )));
        }
        let children = self.children.entry(parent).or_default();
        if children.contains(&child) {
            return Err(NetError::integrity(format!(
                "{} ist bereits Kind von {}",
                child, parent
            )));
        }
        match index {
            Some(i) if i < children.len() => {
                children.shift_insert(i, child);
            }
            _ => {
                children.insert(child);
            }
        }
        self.parents.entry(child).or_default().insert(parent);
        Ok(())
    }

    /// Löst die Verknüpfung und liefert die bisherige Position in der Kind-Liste.
    pub fn detach(&mut self, parent: ElementHandle, child: ElementHandle) -> NetResult<usize> {
        let index = self
            .children
            .get_mut(&parent)
            .and_then(|set| set.shift_remove_full(&child))
            .map(|(i, _)| i)
            .ok_or_else(|| {
                NetError::integrity(format!("{} ist kein Kind von {}", child, parent))
            })?;
        let reciprocal = self
            .parents
            .get_mut(&child)
            .is_some_and(|set| set.shift_remove(&parent));
        if !reciprocal {
            return Err(NetError::integrity(format!(
                "Parent-Liste von {} kennt {} nicht",
                child, parent
            )));
        }
        self.prune(parent);
        self.prune(child);
        Ok(index)
    }

    fn prune(&mut self, handle: ElementHandle) {
        if self.children.get(&handle).is_some_and(|s| s.is_empty()) {
            self.children.remove(&handle);
        }
        if self.parents.get(&handle).is_some_and(|s| s.is_empty()) {
            self.parents.remove(&handle);
        }
    }

    pub fn children(&self, parent: ElementHandle) -> &IndexSet<ElementHandle> {
        self.children.get(&parent).unwrap_or_else(|| empty())
    }

    pub fn parents(&self, child: ElementHandle) -> &IndexSet<ElementHandle> {
        self.parents.get(&child).unwrap_or_else(|| empty())
    }

    /// Position von `child` in der Kind-Liste von `parent`.
    pub fn child_index(&self, parent: ElementHandle, child: ElementHandle) -> Option<usize> {
        self.children.get(&parent)?.get_index_of(&child)
    }

    /// `true` wenn das Element weder Kinder noch Parents hat.
    pub fn is_isolated(&self, handle: ElementHandle) -> bool {
        !self.children.contains_key(&handle) && !self.parents.contains_key(&handle)
    }

    /// Alle Nachkommen vor dem Element selbst (Post-Order, ohne Duplikate).
    pub fn cascade_order(&self, root: ElementHandle) -> Vec<ElementHandle> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        self.visit_post_order(root, &mut visited, &mut order);
        order
    }

    fn visit_post_order(
        &self,
        handle: ElementHandle,
        visited: &mut HashSet<ElementHandle>,
        order: &mut Vec<ElementHandle>,
    ) {
        if !visited.insert(handle) {
            return;
        }
        for child in self.children(handle) {
            self.visit_post_order(*child, visited, order);
        }
        order.push(handle);
    }
}
