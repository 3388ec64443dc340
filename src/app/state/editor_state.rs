//! Hauptzustand der Engine: Netz, Command-Log, Optionen und Builder.

use crate::app::builder::{DefaultNetBuilder, NetBuilder};
use crate::app::use_cases::recompute::ensure_default_elements;
use crate::app::CommandLog;
use crate::core::{Change, NetResult, Network};
use crate::shared::EditorOptions;

/// Besitzt genau ein Netz und dessen Undo-Historie.
///
/// Wird explizit an jede Operation übergeben; es gibt keinen globalen Zustand.
pub struct EditorState {
    /// Der bearbeitete Netz-Graph
    pub network: Network,
    /// Undo/Redo-Historie
    pub command_log: CommandLog,
    /// Laufzeit-Optionen
    pub options: EditorOptions,
    pub(crate) builder: Box<dyn NetBuilder>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    /// Erstellt einen leeren Zustand mit Standard-Optionen.
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    pub fn with_options(options: EditorOptions) -> Self {
        Self::with_builder(options, Box::new(DefaultNetBuilder))
    }

    /// Erstellt einen Zustand mit externem Netz-Builder.
    pub fn with_builder(options: EditorOptions, builder: Box<dyn NetBuilder>) -> Self {
        let mut network = Network::new();
        if let Err(err) = ensure_default_elements(&mut network, &options) {
            log::error!("Standard-Elemente konnten nicht angelegt werden: {}", err);
        }
        Self {
            network,
            command_log: CommandLog::new_with_capacity(options.history_max_depth),
            options,
            builder,
        }
    }

    /// Führt `f` innerhalb einer Undo-Gruppe aus.
    ///
    /// Bei einem Fehler auf äußerster Ebene wird die Gruppe zurückgerollt; in
    /// verschachtelten Aufrufen wird der Fehler nach oben durchgereicht.
    pub fn with_group<T>(
        &mut self,
        label: &str,
        f: impl FnOnce(&mut Self) -> NetResult<T>,
    ) -> NetResult<T> {
        self.command_log.begin_group(label);
        let outermost = self.command_log.depth() == 1;
        match f(self) {
            Ok(value) => {
                self.command_log.end_group();
                Ok(value)
            }
            Err(err) => {
                if outermost {
                    if err.is_fatal() {
                        log::error!("'{}' fehlgeschlagen: {}", label, err);
                    } else {
                        log::warn!("'{}' abgelehnt: {}", label, err);
                    }
                    self.command_log.abort_group(&mut self.network)?;
                } else {
                    self.command_log.end_group();
                }
                Err(err)
            }
        }
    }

    /// Wendet eine primitive Änderung an und zeichnet sie auf.
    pub fn record(&mut self, change: Change) -> NetResult<()> {
        self.command_log.record(&mut self.network, change)
    }

    /// Macht die letzte Undo-Gruppe rückgängig.
    pub fn undo(&mut self) -> NetResult<bool> {
        self.command_log.undo(&mut self.network)
    }

    /// Stellt die zuletzt rückgängig gemachte Gruppe wieder her.
    pub fn redo(&mut self) -> NetResult<bool> {
        self.command_log.redo(&mut self.network)
    }

    pub fn can_undo(&self) -> bool {
        self.command_log.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.command_log.can_redo()
    }

    /// Tauscht den Netz-Builder aus.
    pub fn set_builder(&mut self, builder: Box<dyn NetBuilder>) {
        self.builder = builder;
    }
}
