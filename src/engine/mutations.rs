use chrono::{DateTime, Utc};
use ulid::Ulid;

use crate::model::{Appointment, AppointmentStatus, Client, Provider, Slot};
use crate::observability;

use super::conflict::{ensure_covered, validate_time_range, validate_window};
use super::{lookup, persistence, Engine, EngineError};

impl Engine {
    pub async fn create_provider(&self, id: Ulid) -> Result<Provider, EngineError> {
        if self.directory.provider_exists(id).await.map_err(lookup)? {
            return Err(EngineError::AlreadyExists(id));
        }
        let provider = Provider { id };
        self.directory
            .insert_provider(provider)
            .await
            .map_err(persistence)?;
        Ok(provider)
    }

    pub async fn create_client(&self, id: Ulid) -> Result<Client, EngineError> {
        if self.directory.client_exists(id).await.map_err(lookup)? {
            return Err(EngineError::AlreadyExists(id));
        }
        let client = Client { id };
        self.directory
            .insert_client(client)
            .await
            .map_err(persistence)?;
        Ok(client)
    }

    /// Referential-integrity guard: a provider still carrying templates or
    /// any appointment rows (canceled included; cancellation is soft-delete)
    /// cannot be removed.
    pub async fn delete_provider(&self, id: Ulid) -> Result<(), EngineError> {
        if !self.directory.provider_exists(id).await.map_err(lookup)? {
            return Err(EngineError::NotFound(id));
        }
        let has_templates = !self
            .availabilities
            .fetch_templates(id)
            .await
            .map_err(lookup)?
            .is_empty();
        if has_templates || self.appointments.any_for_provider(id).await.map_err(lookup)? {
            return Err(EngineError::HasDependents(id));
        }
        self.directory.remove_provider(id).await.map_err(persistence)
    }

    pub async fn delete_client(&self, id: Ulid) -> Result<(), EngineError> {
        if !self.directory.client_exists(id).await.map_err(lookup)? {
            return Err(EngineError::NotFound(id));
        }
        if self.appointments.any_for_client(id).await.map_err(lookup)? {
            return Err(EngineError::HasDependents(id));
        }
        self.directory.remove_client(id).await.map_err(persistence)
    }

    /// Admit or reject a new appointment.
    ///
    /// The free-slot recomputation over exactly `[starts_at, ends_at)` and
    /// the insert run inside the provider's critical section: of two
    /// concurrent requests for overlapping windows, the loser recomputes
    /// after the winner committed, sees the new appointment as busy, and
    /// fails the containment check.
    pub async fn book_appointment(
        &self,
        id: Ulid,
        client_id: Ulid,
        provider_id: Ulid,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<Appointment, EngineError> {
        validate_window(starts_at, ends_at)?;
        if !self.directory.client_exists(client_id).await.map_err(lookup)? {
            return Err(EngineError::NotFound(client_id));
        }
        if !self
            .directory
            .provider_exists(provider_id)
            .await
            .map_err(lookup)?
        {
            return Err(EngineError::NotFound(provider_id));
        }
        if self.appointments.get(id).await.map_err(lookup)?.is_some() {
            return Err(EngineError::AlreadyExists(id));
        }

        let _section = self.booking_locks.acquire(provider_id).await;

        let range = validate_time_range(Some(starts_at), Some(ends_at), self.clock.now())?;
        let free = self.compute_free(provider_id, &range, None).await?;
        if let Err(e) = ensure_covered(&free, &Slot::new(starts_at, ends_at)) {
            metrics::counter!(
                observability::BOOKINGS_REJECTED_TOTAL,
                "reason" => observability::error_label(&e)
            )
            .increment(1);
            tracing::debug!(%provider_id, %client_id, "booking rejected: {e}");
            return Err(e);
        }

        let appointment = Appointment {
            id,
            client_id,
            provider_id,
            starts_at,
            ends_at,
            status: AppointmentStatus::Scheduled,
        };
        self.appointments
            .insert(appointment)
            .await
            .map_err(persistence)?;

        metrics::counter!(observability::BOOKINGS_ACCEPTED_TOTAL).increment(1);
        tracing::debug!(%provider_id, %id, "booking accepted");
        Ok(appointment)
    }

    /// Move a scheduled appointment to a new window under the same guard.
    /// The appointment's own current window does not count as busy.
    pub async fn reschedule_appointment(
        &self,
        id: Ulid,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<Appointment, EngineError> {
        validate_window(starts_at, ends_at)?;
        let existing = self
            .appointments
            .get(id)
            .await
            .map_err(lookup)?
            .ok_or(EngineError::NotFound(id))?;

        let _section = self.booking_locks.acquire(existing.provider_id).await;

        // Re-read inside the section: the row may have changed while we
        // waited for the lock.
        let appointment = self
            .appointments
            .get(id)
            .await
            .map_err(lookup)?
            .ok_or(EngineError::NotFound(id))?;
        if appointment.status == AppointmentStatus::Canceled {
            return Err(EngineError::Validation {
                field: "status",
                reason: "canceled appointments cannot be rescheduled",
            });
        }

        let range = validate_time_range(Some(starts_at), Some(ends_at), self.clock.now())?;
        let free = self
            .compute_free(appointment.provider_id, &range, Some(id))
            .await?;
        if let Err(e) = ensure_covered(&free, &Slot::new(starts_at, ends_at)) {
            metrics::counter!(
                observability::BOOKINGS_REJECTED_TOTAL,
                "reason" => observability::error_label(&e)
            )
            .increment(1);
            return Err(e);
        }

        let updated = Appointment {
            starts_at,
            ends_at,
            ..appointment
        };
        self.appointments.update(updated).await.map_err(persistence)?;
        tracing::debug!(%id, "appointment rescheduled");
        Ok(updated)
    }

    /// Scheduled → Canceled, the only status transition. Canceled is
    /// terminal. Cancelling only frees time, so no critical section is
    /// needed; the status write is a single repository update.
    pub async fn cancel_appointment(&self, id: Ulid) -> Result<Appointment, EngineError> {
        let appointment = self
            .appointments
            .get(id)
            .await
            .map_err(lookup)?
            .ok_or(EngineError::NotFound(id))?;
        if appointment.status == AppointmentStatus::Canceled {
            return Err(EngineError::Validation {
                field: "status",
                reason: "is already canceled",
            });
        }

        let canceled = Appointment {
            status: AppointmentStatus::Canceled,
            ..appointment
        };
        self.appointments.update(canceled).await.map_err(persistence)?;
        tracing::debug!(%id, "appointment canceled");
        Ok(canceled)
    }
}
