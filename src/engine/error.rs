use ulid::Ulid;

use crate::model::Slot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Required query params absent. Lists every missing field.
    MissingFields(Vec<&'static str>),
    /// Input present but malformed or out of order.
    Validation {
        field: &'static str,
        reason: &'static str,
    },
    NotFound(Ulid),
    AlreadyExists(Ulid),
    /// Referential-integrity guard: the record still owns dependent rows.
    HasDependents(Ulid),
    /// No free slot covers the requested window.
    Conflict(Slot),
    /// Repository read failed.
    Lookup(String),
    /// Repository write failed after a successful conflict check.
    Persistence(String),
    LimitExceeded(&'static str),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::MissingFields(fields) => {
                write!(f, "missing required params: {}", fields.join(", "))
            }
            EngineError::Validation { field, reason } => write!(f, "{field} {reason}"),
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::AlreadyExists(id) => write!(f, "already exists: {id}"),
            EngineError::HasDependents(id) => {
                write!(f, "cannot delete {id}: has dependent records")
            }
            EngineError::Conflict(slot) => {
                write!(
                    f,
                    "no free slot covers [{}, {})",
                    slot.starts_at, slot.ends_at
                )
            }
            EngineError::Lookup(e) => write!(f, "lookup failed: {e}"),
            EngineError::Persistence(e) => write!(f, "persistence failed: {e}"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
