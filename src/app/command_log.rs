//! Transaktionales Command-Log: Undo-Gruppen mit Undo/Redo-Stacks.

use crate::core::{Change, NetError, NetResult, Network};

/// Fehler beim Abspielen einer Gruppe.
struct Failure {
    error: NetError,
    /// `true` wenn der Teilschritt vollständig zurückgerollt wurde
    consistent: bool,
}

/// Nimmt `changes` rückwärts zurück; bei Fehler werden die bereits
/// zurückgenommenen Änderungen wieder angewendet.
fn revert_changes(changes: &[Change], net: &mut Network) -> Result<(), Failure> {
    for (pos, change) in changes.iter().enumerate().rev() {
        if let Err(error) = change.revert(net) {
            let consistent = changes[pos + 1..]
                .iter()
                .try_for_each(|c| c.apply(net))
                .is_ok();
            return Err(Failure { error, consistent });
        }
    }
    Ok(())
}

/// Wendet `changes` vorwärts an; bei Fehler werden die bereits
/// angewendeten Änderungen zurückgenommen.
fn apply_changes(changes: &[Change], net: &mut Network) -> Result<(), Failure> {
    for (pos, change) in changes.iter().enumerate() {
        if let Err(error) = change.apply(net) {
            let consistent = changes[..pos]
                .iter()
                .rev()
                .try_for_each(|c| c.revert(net))
                .is_ok();
            return Err(Failure { error, consistent });
        }
    }
    Ok(())
}

/// Benannte Folge primitiver Änderungen; Einheit von Undo und Redo.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoGroup {
    pub label: String,
    pub changes: Vec<Change>,
}

/// Zwei Stacks (`done`, `undone`) plus eine optional offene Gruppe.
///
/// Jede aufgezeichnete Änderung wird sofort angewendet, das Netz spiegelt
/// also immer alle Einträge wider. Verschachtelte `begin_group`/`end_group`
/// werden in die äußere Gruppe eingeflacht.
#[derive(Debug)]
pub struct CommandLog {
    done: Vec<UndoGroup>,
    undone: Vec<UndoGroup>,
    open: Option<UndoGroup>,
    depth: usize,
    max_depth: usize,
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::new_with_capacity(crate::shared::options::HISTORY_MAX_DEPTH)
    }
}

impl CommandLog {
    /// Erstellt ein leeres Log mit maximaler Undo-Tiefe.
    pub fn new_with_capacity(max_depth: usize) -> Self {
        Self {
            done: Vec::with_capacity(max_depth.min(64)),
            undone: Vec::new(),
            open: None,
            depth: 0,
            max_depth: max_depth.max(1),
        }
    }

    /// Öffnet eine Gruppe oder erhöht die Verschachtelungstiefe.
    pub fn begin_group(&mut self, label: &str) {
        if self.depth == 0 {
            self.open = Some(UndoGroup {
                label: label.to_string(),
                changes: Vec::new(),
            });
        }
        self.depth += 1;
    }

    /// Wendet `change` an und hängt ihn an die offene Gruppe.
    ///
    /// Ohne offene Gruppe bildet die Änderung eine eigene Gruppe.
    pub fn record(&mut self, net: &mut Network, change: Change) -> NetResult<()> {
        change.apply(net)?;
        match self.open.as_mut() {
            Some(group) => group.changes.push(change),
            None => {
                let group = UndoGroup {
                    label: "Änderung".to_string(),
                    changes: vec![change],
                };
                self.push_done(group);
                self.undone.clear();
            }
        }
        Ok(())
    }

    /// Schließt die Gruppe auf äußerster Ebene; leere Gruppen werden verworfen.
    pub fn end_group(&mut self) {
        if self.depth == 0 {
            log::warn!("end_group ohne offene Gruppe ignoriert");
            return;
        }
        self.depth -= 1;
        if self.depth > 0 {
            return;
        }
        if let Some(group) = self.open.take() {
            if group.changes.is_empty() {
                log::debug!("Leere Undo-Gruppe '{}' verworfen", group.label);
            } else {
                self.push_done(group);
                self.undone.clear();
            }
        }
    }

    /// Nimmt alle Änderungen der offenen Gruppe in umgekehrter Reihenfolge zurück.
    pub fn abort_group(&mut self, net: &mut Network) -> NetResult<()> {
        self.depth = 0;
        let Some(group) = self.open.take() else {
            return Ok(());
        };
        log::warn!(
            "Undo-Gruppe '{}' abgebrochen, {} Änderung(en) zurückgenommen",
            group.label,
            group.changes.len()
        );
        for change in group.changes.iter().rev() {
            change.revert(net)?;
        }
        Ok(())
    }

    /// Macht die letzte Gruppe rückgängig; `false` wenn nichts da ist.
    pub fn undo(&mut self, net: &mut Network) -> NetResult<bool> {
        if self.open.is_some() {
            log::warn!("Undo während offener Gruppe ignoriert");
            return Ok(false);
        }
        let Some(group) = self.done.pop() else {
            log::debug!("Undo-Stack leer");
            return Ok(false);
        };
        if let Err(failure) = revert_changes(&group.changes, net) {
            return Err(self.recover(group, failure, true));
        }
        log::info!("Rückgängig: {}", group.label);
        self.undone.push(group);
        Ok(true)
    }

    /// Stellt die zuletzt rückgängig gemachte Gruppe wieder her.
    pub fn redo(&mut self, net: &mut Network) -> NetResult<bool> {
        if self.open.is_some() {
            log::warn!("Redo während offener Gruppe ignoriert");
            return Ok(false);
        }
        let Some(group) = self.undone.pop() else {
            log::debug!("Redo-Stack leer");
            return Ok(false);
        };
        if let Err(failure) = apply_changes(&group.changes, net) {
            return Err(self.recover(group, failure, false));
        }
        log::info!("Wiederherstellen: {}", group.label);
        self.push_done(group);
        Ok(true)
    }

    /// Legt eine fehlgeschlagene Gruppe zurück auf ihren Stack.
    ///
    /// Ließ sich der Teilschritt nicht zurückrollen, stimmt das Netz mit keinem
    /// Stack mehr überein; die Historie wird dann verworfen.
    fn recover(&mut self, group: UndoGroup, failure: Failure, was_done: bool) -> NetError {
        if failure.consistent {
            log::warn!(
                "{} von '{}' fehlgeschlagen, Gruppe bleibt erhalten: {}",
                if was_done { "Undo" } else { "Redo" },
                group.label,
                failure.error
            );
            if was_done {
                self.done.push(group);
            } else {
                self.undone.push(group);
            }
            return failure.error;
        }
        log::error!(
            "Gruppe '{}' nur teilweise angewendet, Historie verworfen: {}",
            group.label,
            failure.error
        );
        self.clear();
        NetError::integrity(format!(
            "Gruppe '{}' teilweise angewendet: {}",
            group.label, failure.error
        ))
    }

    fn push_done(&mut self, group: UndoGroup) {
        if self.done.len() >= self.max_depth {
            self.done.remove(0);
        }
        self.done.push(group);
    }

    /// Verwirft die gesamte Historie.
    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
        self.open = None;
        self.depth = 0;
    }

    /// Prüft ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    /// Prüft ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn is_group_open(&self) -> bool {
        self.open.is_some()
    }

    /// Aktuelle Verschachtelungstiefe offener Gruppen.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Bezeichnung der Gruppe, die ein Undo zurücknehmen würde.
    pub fn undo_label(&self) -> Option<&str> {
        self.done.last().map(|g| g.label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.undone.last().map(|g| g.label.as_str())
    }

    /// Read-only Sicht auf alle abgeschlossenen Gruppen (älteste zuerst).
    pub fn done_groups(&self) -> &[UndoGroup] {
        &self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Element, ElementSnapshot, Junction};
    use glam::Vec2;

    fn create_junction(net: &mut Network, id: &str) -> Change {
        Change::Create(ElementSnapshot {
            handle: net.allocate_handle(),
            element: Element::Junction(Junction::new(id, Vec2::ZERO)),
            parents: Vec::new(),
        })
    }

    #[test]
    fn empty_log_cannot_undo_or_redo() {
        let mut net = Network::new();
        let mut log = CommandLog::new_with_capacity(10);

        assert!(!log.can_undo());
        assert!(!log.can_redo());
        assert_eq!(log.undo(&mut net), Ok(false));
        assert_eq!(log.redo(&mut net), Ok(false));
    }

    #[test]
    fn nested_groups_flatten_into_outer_group() {
        let mut net = Network::new();
        let mut log = CommandLog::new_with_capacity(10);

        log.begin_group("außen");
        let a = create_junction(&mut net, "A");
        log.record(&mut net, a).expect("A");
        log.begin_group("innen");
        let b = create_junction(&mut net, "B");
        log.record(&mut net, b).expect("B");
        log.end_group();
        assert!(log.is_group_open());
        log.end_group();

        assert_eq!(log.done_groups().len(), 1);
        assert_eq!(log.undo_label(), Some("außen"));
        assert_eq!(log.done_groups()[0].changes.len(), 2);

        assert_eq!(log.undo(&mut net), Ok(true));
        assert!(net.is_empty());
    }

    #[test]
    fn empty_group_is_discarded() {
        let mut log = CommandLog::new_with_capacity(10);
        log.begin_group("nichts");
        log.end_group();

        assert!(!log.can_undo());
        assert!(!log.is_group_open());
    }

    #[test]
    fn abort_reverts_open_group() {
        let mut net = Network::new();
        let mut log = CommandLog::new_with_capacity(10);

        log.begin_group("abbrechen");
        let a = create_junction(&mut net, "A");
        log.record(&mut net, a).expect("A");
        log.begin_group("verschachtelt");
        log.abort_group(&mut net).expect("abort");

        assert!(net.is_empty());
        assert!(!log.can_undo());
        assert_eq!(log.depth(), 0);
    }

    #[test]
    fn new_group_clears_redo_stack() {
        let mut net = Network::new();
        let mut log = CommandLog::new_with_capacity(10);

        let a = create_junction(&mut net, "A");
        log.record(&mut net, a).expect("A");
        log.undo(&mut net).expect("undo");
        assert!(log.can_redo());

        let b = create_junction(&mut net, "B");
        log.record(&mut net, b).expect("B");
        assert!(!log.can_redo());
    }

    #[test]
    fn max_depth_drops_oldest_group() {
        let mut net = Network::new();
        let mut log = CommandLog::new_with_capacity(2);

        for id in ["A", "B", "C"] {
            log.begin_group(id);
            let change = create_junction(&mut net, id);
            log.record(&mut net, change).expect("record");
            log.end_group();
        }

        let labels: Vec<_> = log.done_groups().iter().map(|g| g.label.clone()).collect();
        assert_eq!(labels, vec!["B".to_string(), "C".to_string()]);
    }

    #[test]
    fn failed_undo_rolls_back_and_keeps_group() {
        let mut net = Network::new();
        let mut log = CommandLog::new_with_capacity(10);

        log.begin_group("zwei");
        let a = create_junction(&mut net, "A");
        let Change::Create(a_snapshot) = &a else {
            panic!("Create erwartet");
        };
        let a_handle = a_snapshot.handle;
        let b = create_junction(&mut net, "B");
        log.record(&mut net, a).expect("A");
        log.record(&mut net, b).expect("B");
        log.end_group();

        // A verschwindet am Log vorbei; das Zurücknehmen von A muss scheitern
        let snapshot = net.snapshot(a_handle).expect("Snapshot");
        Change::Remove(snapshot).apply(&mut net).expect("entfernen");
        let before = net.content();

        let result = log.undo(&mut net);

        assert!(matches!(result, Err(NetError::NotFound { .. })));
        assert_eq!(net.content(), before);
        assert!(log.can_undo());
        assert!(!log.can_redo());
        assert_eq!(log.undo_label(), Some("zwei"));
    }

    #[test]
    fn failed_redo_rolls_back_and_keeps_group() {
        let mut net = Network::new();
        let mut log = CommandLog::new_with_capacity(10);

        log.begin_group("zwei");
        let a = create_junction(&mut net, "A");
        let b = create_junction(&mut net, "B");
        log.record(&mut net, a).expect("A");
        log.record(&mut net, b).expect("B");
        log.end_group();
        log.undo(&mut net).expect("undo");

        // Fremde Junction belegt die ID "B"; Redo scheitert beim zweiten Schritt
        let blocker = create_junction(&mut net, "B");
        blocker.apply(&mut net).expect("Blocker");
        let before = net.content();

        let result = log.redo(&mut net);

        assert!(matches!(result, Err(NetError::DuplicateId { .. })));
        assert_eq!(net.content(), before);
        assert!(log.can_redo());
        assert!(!log.can_undo());
    }

    #[test]
    fn redo_reapplies_in_original_order() {
        let mut net = Network::new();
        let mut log = CommandLog::new_with_capacity(10);

        log.begin_group("zwei");
        let a = create_junction(&mut net, "A");
        let b = create_junction(&mut net, "B");
        log.record(&mut net, a).expect("A");
        log.record(&mut net, b).expect("B");
        log.end_group();
        let before = net.content();

        log.undo(&mut net).expect("undo");
        log.redo(&mut net).expect("redo");
        assert_eq!(net.content(), before);
    }
}
