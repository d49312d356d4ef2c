use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::engine::EngineError;
use crate::limits::{MAX_EXTERNAL_ID_LEN, MAX_SOURCE_LEN};

/// Half-open interval `[starts_at, ends_at)` — the only interval shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl Slot {
    pub fn new(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Self {
        debug_assert!(starts_at < ends_at, "Slot start must be before end");
        Self { starts_at, ends_at }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.ends_at - self.starts_at
    }

    /// Strict overlap: touching endpoints do not count.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.starts_at < other.ends_at && other.starts_at < self.ends_at
    }

    /// Returns true if `self` fully contains `other`.
    pub fn covers(&self, other: &Slot) -> bool {
        self.starts_at <= other.starts_at && other.ends_at <= self.ends_at
    }
}

/// Validated query range. Build via `Engine::validate_range` (or
/// `engine::validate_time_range` with an explicit `now`); construction clamps
/// `from` to the present and rejects empty or past ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    pub fn as_slot(&self) -> Slot {
        Slot::new(self.from, self.to)
    }
}

/// Identity-only. Owns availabilities and appointments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: Ulid,
}

/// Identity-only. Owns appointments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: Ulid,
}

/// Recurring weekly bookable window, defined by day-of-week + time-of-day.
///
/// Upserted from an external feed keyed on `(provider_id, source,
/// external_id)`; read-only to the slot computation. A window may cross
/// midnight or span several days (`end_day_of_week != start_day_of_week`),
/// in which case `end_time < start_time` is legal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub id: Ulid,
    pub provider_id: Ulid,
    /// Origin system tag, e.g. the name of the calendar feed.
    pub source: String,
    /// Idempotency key within `source`.
    pub external_id: String,
    pub start_day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub end_day_of_week: Weekday,
    pub end_time: NaiveTime,
}

impl Availability {
    /// Days from the start weekday to the end weekday, always in `[0, 6]`
    /// (Sunday = 0 numbering, wrap via mod 7). 0 means same-day.
    pub fn days_until_end(&self) -> u64 {
        let start = self.start_day_of_week.num_days_from_sunday() as i64;
        let end = self.end_day_of_week.num_days_from_sunday() as i64;
        (end - start).rem_euclid(7) as u64
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.source.is_empty() {
            return Err(EngineError::Validation {
                field: "source",
                reason: "is required",
            });
        }
        if self.source.len() > MAX_SOURCE_LEN {
            return Err(EngineError::LimitExceeded("source too long"));
        }
        if self.external_id.is_empty() {
            return Err(EngineError::Validation {
                field: "external_id",
                reason: "is required",
            });
        }
        if self.external_id.len() > MAX_EXTERNAL_ID_LEN {
            return Err(EngineError::LimitExceeded("external_id too long"));
        }
        if self.start_day_of_week == self.end_day_of_week && self.end_time <= self.start_time {
            return Err(EngineError::Validation {
                field: "end_time",
                reason: "must be after start_time for same-day windows",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Canceled,
}

/// A concrete booking. Never physically removed: cancellation is a terminal
/// status transition, and the time window only changes through the booking
/// guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Ulid,
    pub client_id: Ulid,
    pub provider_id: Ulid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn slot(&self) -> Slot {
        Slot::new(self.starts_at, self.ends_at)
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }
}
