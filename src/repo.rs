//! Repository seams between the engine and whatever storage hosts it.
//!
//! The engine only ever sees these traits; `engine::InMemoryStore` implements
//! all of them for tests and embedders without a durable backend. Read
//! failures surface to callers as `EngineError::Lookup`, write failures as
//! `EngineError::Persistence`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ulid::Ulid;

use crate::model::{Appointment, Availability, Client, Provider};

/// Storage-layer failure, opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// What an upsert did with the `(provider_id, source, external_id)` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Provider and client identity records.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    async fn insert_provider(&self, provider: Provider) -> Result<(), StoreError>;
    async fn provider_exists(&self, id: Ulid) -> Result<bool, StoreError>;
    async fn remove_provider(&self, id: Ulid) -> Result<(), StoreError>;

    async fn insert_client(&self, client: Client) -> Result<(), StoreError>;
    async fn client_exists(&self, id: Ulid) -> Result<bool, StoreError>;
    async fn remove_client(&self, id: Ulid) -> Result<(), StoreError>;
}

/// Weekly availability templates.
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// All templates for a provider, read-only to the slot computation.
    async fn fetch_templates(&self, provider_id: Ulid) -> Result<Vec<Availability>, StoreError>;

    /// Insert-or-update keyed on `(provider_id, source, external_id)`. The
    /// stored row's id is preserved on update.
    async fn upsert_template(&self, template: Availability) -> Result<UpsertOutcome, StoreError>;
}

/// Appointment rows. `fetch_overlapping` is the busy-time feed for the slot
/// computation; `insert`/`update` only ever run inside the booking guard's
/// critical section (status changes excepted).
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Scheduled appointments strictly overlapping `[from, to)`. An
    /// appointment touching either boundary is not returned.
    async fn fetch_overlapping(
        &self,
        provider_id: Ulid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn get(&self, id: Ulid) -> Result<Option<Appointment>, StoreError>;

    async fn insert(&self, appointment: Appointment) -> Result<(), StoreError>;

    /// Replace an existing row (status or guard-approved window change).
    async fn update(&self, appointment: Appointment) -> Result<(), StoreError>;

    /// Any rows for the provider, canceled included: cancellation is
    /// soft-delete, so canceled rows still pin the provider.
    async fn any_for_provider(&self, provider_id: Ulid) -> Result<bool, StoreError>;

    async fn any_for_client(&self, client_id: Ulid) -> Result<bool, StoreError>;
}
