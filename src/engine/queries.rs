use chrono::{DateTime, Duration, Utc};
use ulid::Ulid;

use crate::limits::MAX_QUERY_WINDOW_DAYS;
use crate::model::{Slot, TimeRange};
use crate::observability;

use super::conflict::validate_time_range;
use super::{availability, expand, lookup, Engine, EngineError};

impl Engine {
    /// Validate raw query params against this engine's clock.
    pub fn validate_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<TimeRange, EngineError> {
        validate_time_range(from, to, self.clock.now())
    }

    /// Compute the provider's truly bookable windows inside `range`:
    /// expand weekly templates over the in-scope dates, clamp to the range,
    /// subtract scheduled appointments, merge what remains.
    ///
    /// Always succeeds with a sorted disjoint (possibly empty) list unless a
    /// repository read fails.
    pub async fn free_slots(
        &self,
        provider_id: Ulid,
        range: &TimeRange,
    ) -> Result<Vec<Slot>, EngineError> {
        if range.to - range.from > Duration::days(MAX_QUERY_WINDOW_DAYS) {
            return Err(EngineError::LimitExceeded("query window too wide"));
        }
        if !self
            .directory
            .provider_exists(provider_id)
            .await
            .map_err(lookup)?
        {
            return Err(EngineError::NotFound(provider_id));
        }

        let started = std::time::Instant::now();
        let slots = self.compute_free(provider_id, range, None).await?;
        metrics::histogram!(observability::SLOT_QUERY_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        metrics::counter!(observability::SLOT_QUERIES_TOTAL).increment(1);
        Ok(slots)
    }

    /// The pipeline shared by `free_slots` and the booking guard. `exclude`
    /// drops one appointment from the busy set: rescheduling checks the new
    /// window as if the appointment were already gone.
    pub(super) async fn compute_free(
        &self,
        provider_id: Ulid,
        range: &TimeRange,
        exclude: Option<Ulid>,
    ) -> Result<Vec<Slot>, EngineError> {
        let templates = self
            .availabilities
            .fetch_templates(provider_id)
            .await
            .map_err(lookup)?;

        let dates = expand::dates_in_scope(range);
        let candidates = expand::relevant_templates(&templates, &dates);
        let windows = expand::expand_windows(&candidates, &dates, range);
        let clamped = availability::clamp_to_range(&windows, range);

        let mut busy = self
            .appointments
            .fetch_overlapping(provider_id, range.from, range.to)
            .await
            .map_err(lookup)?;
        if let Some(id) = exclude {
            busy.retain(|a| a.id != id);
        }

        let free = availability::subtract_appointments(&clamped, &busy);
        Ok(availability::merge_slots(free))
    }
}
