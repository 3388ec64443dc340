//! Zentrale Konfiguration der Netz-Editier-Engine.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Kanten & Spuren ────────────────────────────────────────────────

/// Spuranzahl neuer Kanten ohne Vorlage.
pub const DEFAULT_LANE_NUMBER: usize = 1;
/// Geschwindigkeit neuer Kanten in m/s (50 km/h).
pub const DEFAULT_SPEED: f32 = 13.89;
/// Priorität neuer Kanten (-1 = vom Netz-Builder bestimmt).
pub const DEFAULT_PRIORITY: i32 = -1;
/// Spurbreite neuer Spuren in Metern.
pub const DEFAULT_LANE_WIDTH: f32 = 3.2;
/// Breite neuer Geh- und Radwege in Metern.
pub const DEFAULT_SIDEWALK_WIDTH: f32 = 2.0;

// ── Strukturelle Operationen ───────────────────────────────────────

/// Maximaler Abstand einer Split-Position zur Kantengeometrie.
pub const SPLIT_SNAP_DISTANCE: f32 = 1.0;
/// Versatz pro Schritt, wenn die Position einer zusammengeführten Junction belegt ist.
pub const JUNCTION_COLLISION_STEP: f32 = 0.1;
/// Toleranz, ab der zwei Junction-Positionen als identisch gelten.
pub const POSITION_EPSILON: f32 = 1e-3;
/// Abstand der neuen Junctions zur alten Position beim Aufteilen einer Junction.
pub const JUNCTION_SPLIT_DISTANCE: f32 = 5.0;

// ── Undo/Redo ──────────────────────────────────────────────────────

/// Maximale Anzahl gespeicherter Undo-Gruppen.
pub const HISTORY_MAX_DEPTH: usize = 200;

// ── Demand ─────────────────────────────────────────────────────────

/// ID des geschützten Standard-Fahrzeugtyps.
pub const DEFAULT_VTYPE_ID: &str = "DEFAULT_VEHTYPE";

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `net_graph_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorOptions {
    // ── Kanten ──────────────────────────────────────────────────
    /// Spuranzahl neuer Kanten ohne Vorlage
    pub default_lane_number: usize,
    /// Geschwindigkeit neuer Kanten (m/s)
    pub default_speed: f32,
    /// Priorität neuer Kanten
    pub default_priority: i32,
    /// Typ neuer Kanten (leer = untypisiert)
    pub default_edge_type: String,
    /// Breite neuer Spuren
    pub default_lane_width: f32,
    /// Breite neuer Geh- und Radwege
    pub default_sidewalk_width: f32,
    /// Doppelte Kanten mit identischer 2-Punkt-Geometrie zulassen
    pub allow_duplicate_geometry: bool,

    // ── Strukturelle Operationen ────────────────────────────────
    /// Maximaler Abstand einer Split-Position zur Kante
    pub split_snap_distance: f32,
    /// Versatz-Schritt bei belegter Join-Position
    pub junction_collision_step: f32,
    /// Abstand der Teil-Junctions beim Aufteilen einer Junction
    pub junction_split_distance: f32,

    // ── Undo/Redo ───────────────────────────────────────────────
    /// Maximale Anzahl Undo-Gruppen
    pub history_max_depth: usize,

    // ── Demand ──────────────────────────────────────────────────
    /// ID des geschützten Standard-Fahrzeugtyps
    pub default_vtype_id: String,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            default_lane_number: DEFAULT_LANE_NUMBER,
            default_speed: DEFAULT_SPEED,
            default_priority: DEFAULT_PRIORITY,
            default_edge_type: String::new(),
            default_lane_width: DEFAULT_LANE_WIDTH,
            default_sidewalk_width: DEFAULT_SIDEWALK_WIDTH,
            allow_duplicate_geometry: false,
            split_snap_distance: SPLIT_SNAP_DISTANCE,
            junction_collision_step: JUNCTION_COLLISION_STEP,
            junction_split_distance: JUNCTION_SPLIT_DISTANCE,
            history_max_depth: HISTORY_MAX_DEPTH,
            default_vtype_id: DEFAULT_VTYPE_ID.to_string(),
        }
    }
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => match Self::validate(&opts) {
                    Ok(()) => {
                        log::info!("Optionen geladen aus: {}", path.display());
                        opts
                    }
                    Err(e) => {
                        log::warn!("Optionen ungültig, verwende Standardwerte: {}", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Prüft Wertebereiche, die Editier-Operationen voraussetzen.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.junction_collision_step.is_finite() && self.junction_collision_step > 0.0,
            "junction_collision_step muss größer 0 sein (ist {})",
            self.junction_collision_step
        );
        anyhow::ensure!(
            self.split_snap_distance.is_finite() && self.split_snap_distance >= 0.0,
            "split_snap_distance darf nicht negativ sein (ist {})",
            self.split_snap_distance
        );
        anyhow::ensure!(
            self.default_speed.is_finite() && self.default_speed > 0.0,
            "default_speed muss größer 0 sein (ist {})",
            self.default_speed
        );
        anyhow::ensure!(
            self.default_lane_width.is_finite() && self.default_lane_width > 0.0,
            "default_lane_width muss größer 0 sein (ist {})",
            self.default_lane_width
        );
        anyhow::ensure!(
            self.default_sidewalk_width.is_finite() && self.default_sidewalk_width > 0.0,
            "default_sidewalk_width muss größer 0 sein (ist {})",
            self.default_sidewalk_width
        );
        anyhow::ensure!(
            self.junction_split_distance.is_finite() && self.junction_split_distance > 0.0,
            "junction_split_distance muss größer 0 sein (ist {})",
            self.junction_split_distance
        );
        anyhow::ensure!(
            self.default_lane_number > 0,
            "default_lane_number muss mindestens 1 sein"
        );
        Ok(())
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("net_graph_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("net_graph_editor.toml")
    }
}
