//! Availability ingestion from external calendar feeds.
//!
//! Feeds deliver weekly windows keyed by `(source, external_id)`; sync
//! validates each window and upserts it as an availability template.
//! Templates are never deleted here; windows absent from a later payload
//! simply stop being updated.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveTime, Weekday};
use serde::Deserialize;
use ulid::Ulid;

use crate::engine::EngineError;
use crate::limits::{MAX_SYNC_BATCH, MAX_TEMPLATES_PER_PROVIDER};
use crate::model::Availability;
use crate::repo::{AvailabilityRepository, StoreError, UpsertOutcome};

/// One weekly window as delivered by an external feed.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedWindow {
    pub source: String,
    pub external_id: String,
    pub start_day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub end_day_of_week: Weekday,
    pub end_time: NaiveTime,
}

/// External calendar feed, e.g. a Calendly-style slot export.
#[async_trait]
pub trait AvailabilityFeed: Send + Sync {
    async fn fetch_windows(&self, provider_id: Ulid) -> Result<Vec<FeedWindow>, StoreError>;
}

/// Tally of one sync run. `errors` carries the external id and reason for
/// every window that was skipped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub errors: Vec<(String, EngineError)>,
}

pub struct AvailabilitySync {
    feed: Arc<dyn AvailabilityFeed>,
    availabilities: Arc<dyn AvailabilityRepository>,
}

impl AvailabilitySync {
    pub fn new(
        feed: Arc<dyn AvailabilityFeed>,
        availabilities: Arc<dyn AvailabilityRepository>,
    ) -> Self {
        Self {
            feed,
            availabilities,
        }
    }

    /// Upsert every feed window for one provider. Individual invalid windows
    /// are recorded and skipped; a feed or storage failure aborts the run.
    pub async fn run(&self, provider_id: Ulid) -> Result<SyncReport, EngineError> {
        let windows = self
            .feed
            .fetch_windows(provider_id)
            .await
            .map_err(|e| EngineError::Lookup(e.to_string()))?;
        if windows.len() > MAX_SYNC_BATCH {
            return Err(EngineError::LimitExceeded("sync batch too large"));
        }
        let mut template_count = self
            .availabilities
            .fetch_templates(provider_id)
            .await
            .map_err(|e| EngineError::Lookup(e.to_string()))?
            .len();

        let mut report = SyncReport::default();
        for window in windows {
            report.total += 1;

            let template = Availability {
                id: Ulid::new(),
                provider_id,
                source: window.source,
                external_id: window.external_id,
                start_day_of_week: window.start_day_of_week,
                start_time: window.start_time,
                end_day_of_week: window.end_day_of_week,
                end_time: window.end_time,
            };
            if let Err(e) = template.validate() {
                report.errors.push((template.external_id, e));
                continue;
            }
            if template_count >= MAX_TEMPLATES_PER_PROVIDER {
                report.errors.push((
                    template.external_id,
                    EngineError::LimitExceeded("too many templates for provider"),
                ));
                continue;
            }

            match self.availabilities.upsert_template(template).await {
                Ok(UpsertOutcome::Created) => {
                    report.created += 1;
                    template_count += 1;
                }
                Ok(UpsertOutcome::Updated) => report.updated += 1,
                Ok(UpsertOutcome::Unchanged) => report.unchanged += 1,
                Err(e) => return Err(EngineError::Persistence(e.to_string())),
            }
        }

        tracing::info!(
            %provider_id,
            total = report.total,
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            skipped = report.errors.len(),
            "availability sync finished"
        );
        Ok(report)
    }
}
