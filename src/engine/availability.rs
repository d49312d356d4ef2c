use crate::model::{Appointment, Slot, TimeRange};

// ── Free-slot interval algebra ───────────────────────────────────

/// Clamp candidate windows into the query range. Anything that degenerates
/// to zero length at a boundary contributes no bookable time and is dropped.
pub fn clamp_to_range(windows: &[Slot], range: &TimeRange) -> Vec<Slot> {
    windows
        .iter()
        .filter_map(|w| {
            let starts_at = w.starts_at.max(range.from);
            let ends_at = w.ends_at.min(range.to);
            (starts_at < ends_at).then(|| Slot::new(starts_at, ends_at))
        })
        .collect()
}

/// Subtract busy appointment windows from each candidate independently.
/// Results are disjoint within one candidate but may still overlap across
/// candidates; `merge_slots` resolves that.
pub fn subtract_appointments(candidates: &[Slot], busy: &[Appointment]) -> Vec<Slot> {
    candidates
        .iter()
        .flat_map(|c| subtract_from(c, busy))
        .collect()
}

/// Split one candidate window into free periods around its overlapping busy
/// windows. Left-to-right sweep; the `max` advance absorbs nested and
/// overlapping busy windows, and touching windows remove nothing.
fn subtract_from(candidate: &Slot, busy: &[Appointment]) -> Vec<Slot> {
    let mut overlapping: Vec<Slot> = busy
        .iter()
        .map(|a| a.slot())
        .filter(|b| b.overlaps(candidate))
        .collect();
    if overlapping.is_empty() {
        return vec![*candidate];
    }
    overlapping.sort_by_key(|b| b.starts_at);

    let mut free = Vec::new();
    let mut cursor = candidate.starts_at;
    for b in &overlapping {
        let busy_start = b.starts_at.max(candidate.starts_at);
        let busy_end = b.ends_at.min(candidate.ends_at);
        if cursor < busy_start {
            free.push(Slot::new(cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }
    if cursor < candidate.ends_at {
        free.push(Slot::new(cursor, candidate.ends_at));
    }
    free
}

/// Coalesce overlapping or touching slots into the minimal sorted disjoint
/// set. Touching slots merge here (`<=`) even though busy-time detection
/// treats touching as non-overlapping: two adjacent free windows with no gap
/// between them are one continuously bookable span. Idempotent.
pub fn merge_slots(mut slots: Vec<Slot>) -> Vec<Slot> {
    slots.sort_by_key(|s| (s.starts_at, s.ends_at));
    let mut merged: Vec<Slot> = Vec::new();
    for slot in slots {
        if let Some(last) = merged.last_mut()
            && slot.starts_at <= last.ends_at {
                last.ends_at = last.ends_at.max(slot.ends_at);
                continue;
            }
        merged.push(slot);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use ulid::Ulid;

    fn t(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 22, h, m, 0).unwrap()
    }

    fn slot(s: DateTime<Utc>, e: DateTime<Utc>) -> Slot {
        Slot::new(s, e)
    }

    fn appt(s: DateTime<Utc>, e: DateTime<Utc>) -> Appointment {
        Appointment {
            id: Ulid::new(),
            client_id: Ulid::new(),
            provider_id: Ulid::new(),
            starts_at: s,
            ends_at: e,
            status: crate::model::AppointmentStatus::Scheduled,
        }
    }

    // ── clamp_to_range ───────────────────────────────────

    #[test]
    fn clamp_trims_both_ends() {
        let range = TimeRange {
            from: t(10, 0),
            to: t(12, 0),
        };
        let clamped = clamp_to_range(&[slot(t(9, 0), t(11, 0)), slot(t(11, 30), t(13, 0))], &range);
        assert_eq!(
            clamped,
            vec![slot(t(10, 0), t(11, 0)), slot(t(11, 30), t(12, 0))]
        );
    }

    #[test]
    fn clamp_drops_zero_length() {
        // Window ends exactly at the range start, so it clamps to nothing.
        let range = TimeRange {
            from: t(9, 0),
            to: t(10, 0),
        };
        let clamped = clamp_to_range(&[slot(t(8, 0), t(9, 0)), slot(t(9, 0), t(9, 30))], &range);
        assert_eq!(clamped, vec![slot(t(9, 0), t(9, 30))]);
    }

    // ── subtract_appointments ────────────────────────────

    #[test]
    fn subtract_empty_busy_returns_candidates() {
        let candidates = vec![slot(t(9, 0), t(10, 0)), slot(t(11, 0), t(12, 0))];
        let free = subtract_appointments(&candidates, &[]);
        assert_eq!(free, candidates);
    }

    #[test]
    fn subtract_middle_punch() {
        let free = subtract_appointments(
            &[slot(t(9, 0), t(9, 30))],
            &[appt(t(9, 10), t(9, 20))],
        );
        assert_eq!(free, vec![slot(t(9, 0), t(9, 10)), slot(t(9, 20), t(9, 30))]);
    }

    #[test]
    fn subtract_full_overlap_leaves_nothing() {
        let free = subtract_appointments(&[slot(t(9, 0), t(10, 0))], &[appt(t(8, 0), t(11, 0))]);
        assert!(free.is_empty());
    }

    #[test]
    fn subtract_partial_edges() {
        let free = subtract_appointments(
            &[slot(t(9, 0), t(12, 0))],
            &[appt(t(8, 0), t(10, 0)), appt(t(11, 0), t(13, 0))],
        );
        assert_eq!(free, vec![slot(t(10, 0), t(11, 0))]);
    }

    #[test]
    fn subtract_touching_appointments_remove_nothing() {
        // Busy 09:00–09:10 and 09:20–09:30 touch the candidate's edges.
        let free = subtract_appointments(
            &[slot(t(9, 10), t(9, 20))],
            &[appt(t(9, 0), t(9, 10)), appt(t(9, 20), t(9, 30))],
        );
        assert_eq!(free, vec![slot(t(9, 10), t(9, 20))]);
    }

    #[test]
    fn subtract_nested_and_overlapping_busy() {
        // Overlapping busy windows: the max advance absorbs them.
        let free = subtract_appointments(
            &[slot(t(9, 0), t(12, 0))],
            &[
                appt(t(9, 30), t(10, 30)),
                appt(t(10, 0), t(10, 15)), // nested in the previous one
                appt(t(10, 30), t(11, 0)), // back-to-back
            ],
        );
        assert_eq!(free, vec![slot(t(9, 0), t(9, 30)), slot(t(11, 0), t(12, 0))]);
    }

    #[test]
    fn subtract_scopes_busy_per_candidate() {
        // The busy window only overlaps the first candidate; the second is
        // returned whole.
        let free = subtract_appointments(
            &[slot(t(9, 0), t(10, 0)), slot(t(10, 0), t(11, 0))],
            &[appt(t(9, 30), t(10, 0))],
        );
        assert_eq!(free, vec![slot(t(9, 0), t(9, 30)), slot(t(10, 0), t(11, 0))]);
    }

    // ── merge_slots ──────────────────────────────────────

    #[test]
    fn merge_overlapping_and_touching() {
        let merged = merge_slots(vec![
            slot(t(10, 0), t(11, 0)),
            slot(t(9, 0), t(9, 30)),
            slot(t(9, 30), t(10, 30)),
            slot(t(12, 0), t(13, 0)),
        ]);
        assert_eq!(merged, vec![slot(t(9, 0), t(11, 0)), slot(t(12, 0), t(13, 0))]);
    }

    #[test]
    fn merge_is_idempotent() {
        let once = merge_slots(vec![
            slot(t(9, 0), t(10, 0)),
            slot(t(10, 0), t(10, 30)),
            slot(t(11, 0), t(12, 0)),
        ]);
        let twice = merge_slots(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_keeps_gapped_slots_apart() {
        let merged = merge_slots(vec![slot(t(9, 0), t(9, 30)), slot(t(9, 31), t(10, 0))]);
        assert_eq!(merged.len(), 2);
    }
}
