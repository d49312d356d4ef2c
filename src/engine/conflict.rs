use chrono::{DateTime, Duration, Utc};

use crate::limits::MAX_APPOINTMENT_DURATION_DAYS;
use crate::model::{Slot, TimeRange};

use super::EngineError;

/// Build a validated query range from raw params.
///
/// `from` is clamped to `now`: past instants are never bookable. `to` must
/// end up strictly after the clamped `from` and strictly in the future; the
/// future check is re-stated explicitly to pin the exact boundary case
/// (`to == now`).
pub fn validate_time_range(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<TimeRange, EngineError> {
    let (from, to) = match (from, to) {
        (Some(from), Some(to)) => (from, to),
        (from, to) => {
            let mut missing = Vec::new();
            if from.is_none() {
                missing.push("from");
            }
            if to.is_none() {
                missing.push("to");
            }
            return Err(EngineError::MissingFields(missing));
        }
    };

    let from = from.max(now);
    if to <= from {
        return Err(EngineError::Validation {
            field: "to",
            reason: "must be after from",
        });
    }
    if to <= now {
        return Err(EngineError::Validation {
            field: "to",
            reason: "must be in the future",
        });
    }
    Ok(TimeRange { from, to })
}

/// Validate a candidate appointment window before the guard runs.
pub fn validate_window(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> Result<(), EngineError> {
    if ends_at <= starts_at {
        return Err(EngineError::Validation {
            field: "ends_at",
            reason: "must be after starts_at",
        });
    }
    if ends_at - starts_at > Duration::days(MAX_APPOINTMENT_DURATION_DAYS) {
        return Err(EngineError::LimitExceeded("appointment window too wide"));
    }
    Ok(())
}

/// Accept iff some free slot fully covers the requested window.
pub fn ensure_covered(free: &[Slot], want: &Slot) -> Result<(), EngineError> {
    if free.iter().any(|slot| slot.covers(want)) {
        Ok(())
    } else {
        Err(EngineError::Conflict(*want))
    }
}
