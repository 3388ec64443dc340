//! Fehlertypen der Editier-Engine.

use thiserror::Error;

use super::{Category, Namespace};

/// Fehler aller Netz-Operationen.
///
/// `NotFound`, `DuplicateId` und `InvalidOperation` sind wiederherstellbar: sie
/// werden vor der ersten Änderung erkannt oder die offene Undo-Gruppe wird
/// zurückgerollt. `IntegrityViolation` meldet einen Defekt im Mutator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetError {
    #[error("{category} '{id}' nicht gefunden")]
    NotFound { category: String, id: String },

    #[error("ID '{id}' ist im Namensraum {namespace} bereits vergeben")]
    DuplicateId { namespace: String, id: String },

    #[error("Ungültige Operation: {message}")]
    InvalidOperation { message: String },

    #[error("Integritätsverletzung: {message}")]
    IntegrityViolation { message: String },
}

impl NetError {
    pub fn not_found(category: Category, id: impl Into<String>) -> Self {
        Self::NotFound {
            category: category.to_string(),
            id: id.into(),
        }
    }

    /// Lookup über ein Handle, zu dem kein Element existiert.
    pub fn unknown_handle(handle: super::ElementHandle) -> Self {
        Self::NotFound {
            category: "element".to_string(),
            id: handle.to_string(),
        }
    }

    pub fn duplicate(namespace: Namespace, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            namespace: namespace.to_string(),
            id: id.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::IntegrityViolation {
            message: message.into(),
        }
    }

    /// `true` für Defekte, die nicht durch Benutzereingaben entstehen.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::IntegrityViolation { .. })
    }
}

/// Ergebnis-Typ aller Netz-Operationen.
pub type NetResult<T> = Result<T, NetError>;
