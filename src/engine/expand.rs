use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::model::{Availability, Slot, TimeRange};

// ── Weekly-window expansion ──────────────────────────────────────

/// Calendar dates covered by the range, padded with the previous day so
/// windows that start the prior evening and cross midnight into the range
/// are not missed.
pub fn dates_in_scope(range: &TimeRange) -> Vec<NaiveDate> {
    let first = range.from.date_naive() - Days::new(1);
    let last = range.to.date_naive();
    first.iter_days().take_while(|d| *d <= last).collect()
}

/// Cheap prefilter: keep templates whose start or end weekday appears among
/// the in-scope dates. Never decides inclusion on its own; `expand_windows`
/// performs the authoritative overlap test.
pub fn relevant_templates<'a>(
    templates: &'a [Availability],
    dates: &[NaiveDate],
) -> Vec<&'a Availability> {
    let weekdays: HashSet<Weekday> = dates.iter().map(|d| d.weekday()).collect();
    templates
        .iter()
        .filter(|t| {
            weekdays.contains(&t.start_day_of_week) || weekdays.contains(&t.end_day_of_week)
        })
        .collect()
}

/// Expand weekly templates into concrete windows anchored on each in-scope
/// date whose weekday matches the template's start day. Only windows that
/// strictly overlap the range are emitted; ordering is unspecified and
/// windows from different templates may overlap each other.
pub fn expand_windows(
    templates: &[&Availability],
    dates: &[NaiveDate],
    range: &TimeRange,
) -> Vec<Slot> {
    let mut windows = Vec::new();
    for date in dates {
        for template in templates
            .iter()
            .filter(|t| t.start_day_of_week == date.weekday())
        {
            let start = date.and_time(template.start_time).and_utc();
            let end = (*date + Days::new(template.days_until_end()))
                .and_time(template.end_time)
                .and_utc();
            if end > range.from && start < range.to {
                windows.push(Slot::new(start, end));
            }
        }
    }
    windows
}
