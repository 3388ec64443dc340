//! ID-Registry: erzeugt und reserviert eindeutige IDs pro Namensraum.

use std::collections::{HashMap, HashSet};

use super::{Category, Namespace};

/// Vergibt IDs der Form `<Präfix><Zähler>` und merkt sich reservierte IDs.
///
/// Zähler laufen pro Kategorie monoton hoch. Eine einmal vergebene oder
/// reservierte ID wird vom Generator nie wieder ausgegeben, auch nicht nach
/// einem Umbenennen oder Löschen.
#[derive(Debug, Clone, Default)]
pub struct IdRegistry {
    counters: HashMap<Category, u64>,
    reserved: HashMap<Namespace, HashSet<String>>,
}

impl IdRegistry {
    /// Erstellt eine leere Registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Liefert die nächste freie ID für `category`.
    ///
    /// `occupied` meldet IDs, die aktuell im Element-Store belegt sind.
    pub fn next(&mut self, category: Category, occupied: impl Fn(&str) -> bool) -> String {
        let prefix = category.id_prefix();
        let namespace = category.namespace();
        let counter = self.counters.entry(category).or_insert(0);
        loop {
            let candidate = format!("{}{}", prefix, *counter);
            *counter += 1;
            let taken = self
                .reserved
                .get(&namespace)
                .is_some_and(|ids| ids.contains(&candidate));
            if !taken && !occupied(&candidate) {
                self.reserved
                    .entry(namespace)
                    .or_default()
                    .insert(candidate.clone());
                return candidate;
            }
        }
    }

    /// Markiert eine extern vorgegebene ID als vergeben.
    pub fn reserve(&mut self, namespace: Namespace, id: &str) {
        self.reserved
            .entry(namespace)
            .or_default()
            .insert(id.to_string());
    }

    /// Prüft, ob `id` im Namensraum reserviert ist.
    pub fn is_reserved(&self, namespace: Namespace, id: &str) -> bool {
        self.reserved
            .get(&namespace)
            .is_some_and(|ids| ids.contains(id))
    }
}
