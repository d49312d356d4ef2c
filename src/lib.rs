//! Free-slot computation and conflict-guarded booking.
//!
//! `openslot` expands recurring weekly availability templates into concrete
//! windows, clamps them to a query range, subtracts scheduled appointments,
//! and merges what remains into the minimal set of bookable slots. The same
//! computation gates appointment creation inside a per-provider critical
//! section, so two concurrent bookings for overlapping windows can never
//! both commit.
//!
//! Transport and durable storage are the host's concern: the engine talks to
//! the abstract repositories in [`repo`] and ships [`engine::InMemoryStore`]
//! for tests and embedders without a database.

pub mod clock;
pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;
pub mod repo;
pub mod sync;

pub use engine::{Engine, EngineError, InMemoryStore};
pub use model::{
    Appointment, AppointmentStatus, Availability, Client, Provider, Slot, TimeRange,
};
