use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use ulid::Ulid;

use crate::model::*;
use crate::repo::{
    AppointmentRepository, AvailabilityRepository, DirectoryRepository, StoreError, UpsertOutcome,
};

/// DashMap-backed implementation of every repository trait. Reference
/// storage for tests and embedders without a durable backend.
pub struct InMemoryStore {
    providers: DashMap<Ulid, Provider>,
    clients: DashMap<Ulid, Client>,
    /// provider id → weekly templates
    templates: DashMap<Ulid, Vec<Availability>>,
    /// provider id → appointment rows
    appointments: DashMap<Ulid, Vec<Appointment>>,
    /// Reverse lookup: appointment id → provider id
    appointment_to_provider: DashMap<Ulid, Ulid>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            providers: DashMap::new(),
            clients: DashMap::new(),
            templates: DashMap::new(),
            appointments: DashMap::new(),
            appointment_to_provider: DashMap::new(),
        }
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryStore {
    async fn insert_provider(&self, provider: Provider) -> Result<(), StoreError> {
        self.providers.insert(provider.id, provider);
        Ok(())
    }

    async fn provider_exists(&self, id: Ulid) -> Result<bool, StoreError> {
        Ok(self.providers.contains_key(&id))
    }

    async fn remove_provider(&self, id: Ulid) -> Result<(), StoreError> {
        self.providers.remove(&id);
        Ok(())
    }

    async fn insert_client(&self, client: Client) -> Result<(), StoreError> {
        self.clients.insert(client.id, client);
        Ok(())
    }

    async fn client_exists(&self, id: Ulid) -> Result<bool, StoreError> {
        Ok(self.clients.contains_key(&id))
    }

    async fn remove_client(&self, id: Ulid) -> Result<(), StoreError> {
        self.clients.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl AvailabilityRepository for InMemoryStore {
    async fn fetch_templates(&self, provider_id: Ulid) -> Result<Vec<Availability>, StoreError> {
        Ok(self
            .templates
            .get(&provider_id)
            .map(|rows| rows.value().clone())
            .unwrap_or_default())
    }

    async fn upsert_template(&self, template: Availability) -> Result<UpsertOutcome, StoreError> {
        let mut rows = self.templates.entry(template.provider_id).or_default();
        match rows
            .iter_mut()
            .find(|t| t.source == template.source && t.external_id == template.external_id)
        {
            Some(existing) => {
                let unchanged = existing.start_day_of_week == template.start_day_of_week
                    && existing.start_time == template.start_time
                    && existing.end_day_of_week == template.end_day_of_week
                    && existing.end_time == template.end_time;
                if unchanged {
                    Ok(UpsertOutcome::Unchanged)
                } else {
                    let id = existing.id;
                    *existing = Availability { id, ..template };
                    Ok(UpsertOutcome::Updated)
                }
            }
            None => {
                rows.push(template);
                Ok(UpsertOutcome::Created)
            }
        }
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryStore {
    async fn fetch_overlapping(
        &self,
        provider_id: Ulid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError> {
        Ok(self
            .appointments
            .get(&provider_id)
            .map(|rows| {
                rows.iter()
                    .filter(|a| a.is_scheduled() && a.starts_at < to && a.ends_at > from)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get(&self, id: Ulid) -> Result<Option<Appointment>, StoreError> {
        let Some(provider_id) = self.appointment_to_provider.get(&id).map(|e| *e.value()) else {
            return Ok(None);
        };
        Ok(self
            .appointments
            .get(&provider_id)
            .and_then(|rows| rows.iter().find(|a| a.id == id).copied()))
    }

    async fn insert(&self, appointment: Appointment) -> Result<(), StoreError> {
        self.appointment_to_provider
            .insert(appointment.id, appointment.provider_id);
        self.appointments
            .entry(appointment.provider_id)
            .or_default()
            .push(appointment);
        Ok(())
    }

    async fn update(&self, appointment: Appointment) -> Result<(), StoreError> {
        let Some(mut rows) = self.appointments.get_mut(&appointment.provider_id) else {
            return Err(StoreError("update of unknown appointment".into()));
        };
        match rows.iter_mut().find(|a| a.id == appointment.id) {
            Some(existing) => {
                *existing = appointment;
                Ok(())
            }
            None => Err(StoreError("update of unknown appointment".into())),
        }
    }

    async fn any_for_provider(&self, provider_id: Ulid) -> Result<bool, StoreError> {
        Ok(self
            .appointments
            .get(&provider_id)
            .is_some_and(|rows| !rows.is_empty()))
    }

    async fn any_for_client(&self, client_id: Ulid) -> Result<bool, StoreError> {
        Ok(self
            .appointments
            .iter()
            .any(|entry| entry.value().iter().any(|a| a.client_id == client_id)))
    }
}
