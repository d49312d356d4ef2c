mod availability;
mod conflict;
mod error;
mod expand;
mod lock;
mod mutations;
mod queries;
mod store;

pub use availability::{clamp_to_range, merge_slots, subtract_appointments};
pub use conflict::{ensure_covered, validate_time_range, validate_window};
pub use error::EngineError;
pub use expand::{dates_in_scope, expand_windows, relevant_templates};
pub use lock::ProviderLocks;
pub use store::InMemoryStore;

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::repo::{
    AppointmentRepository, AvailabilityRepository, DirectoryRepository, StoreError,
};

/// The free-slot and booking engine.
///
/// Everything between range validation and the merged slot list is pure,
/// synchronous computation over freshly fetched data; the only
/// concurrency-sensitive path is the booking guard in `mutations`, which
/// wraps its check-and-write in a per-provider critical section.
pub struct Engine {
    directory: Arc<dyn DirectoryRepository>,
    availabilities: Arc<dyn AvailabilityRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    clock: Arc<dyn Clock>,
    booking_locks: ProviderLocks,
}

impl Engine {
    pub fn new(
        directory: Arc<dyn DirectoryRepository>,
        availabilities: Arc<dyn AvailabilityRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory,
            availabilities,
            appointments,
            clock,
            booking_locks: ProviderLocks::new(),
        }
    }

    /// Engine over the bundled in-memory store and the system clock.
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(store.clone(), store.clone(), store, Arc::new(SystemClock))
    }
}

fn lookup(e: StoreError) -> EngineError {
    EngineError::Lookup(e.to_string())
}

fn persistence(e: StoreError) -> EngineError {
    EngineError::Persistence(e.to_string())
}
