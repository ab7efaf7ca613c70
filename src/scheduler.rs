use crate::errors::{AppError, AppResult};
use crate::models::{
    ActiveMetric, DisplayConfiguration, DisplayMode, MetricsSnapshot, RefreshPolicy, Timeline, TimelineEntry,
};
use chrono::{DateTime, Duration, Utc};

pub const HOURLY_ENTRY_COUNT: i64 = 24;
pub const ALTERNATING_STEP_SECONDS: i64 = 30;
pub const ALTERNATING_SEQUENCE: [ActiveMetric; 3] =
    [ActiveMetric::Customers, ActiveMetric::Tasks, ActiveMetric::Customers];

/// Either every entry is produced or the call fails: a gapped sequence would
/// change which entry is active at a given time.
pub fn schedule(
    configuration: DisplayConfiguration,
    snapshot: &MetricsSnapshot,
    now: DateTime<Utc>,
) -> AppResult<Timeline> {
    let plan = entry_plan(configuration.display_mode);
    let entries = plan
        .into_iter()
        .map(|(offset, active_metric)| {
            let timestamp = now.checked_add_signed(offset).ok_or_else(|| {
                AppError::Scheduling(format!(
                    "Entry offset of {}s from {} is outside the calendar range",
                    offset.num_seconds(),
                    now.to_rfc3339()
                ))
            })?;
            Ok(TimelineEntry {
                timestamp,
                configuration,
                snapshot: *snapshot,
                active_metric,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Timeline::new(now, entries, RefreshPolicy::AtEnd))
}

pub fn snapshot_entry(
    configuration: DisplayConfiguration,
    snapshot: &MetricsSnapshot,
    now: DateTime<Utc>,
) -> TimelineEntry {
    TimelineEntry {
        timestamp: now,
        configuration,
        snapshot: *snapshot,
        active_metric: configuration.display_mode.initial_metric(),
    }
}

pub fn placeholder_entry(now: DateTime<Utc>) -> TimelineEntry {
    snapshot_entry(DisplayConfiguration::default(), &MetricsSnapshot::placeholder(), now)
}

fn entry_plan(mode: DisplayMode) -> Vec<(Duration, ActiveMetric)> {
    match mode {
        DisplayMode::CustomersOnly | DisplayMode::TasksOnly => {
            let metric = mode.initial_metric();
            (0..HOURLY_ENTRY_COUNT)
                .map(|hour| (Duration::hours(hour), metric))
                .collect()
        }
        DisplayMode::Alternating => ALTERNATING_SEQUENCE
            .iter()
            .enumerate()
            .map(|(step, metric)| (Duration::seconds(step as i64 * ALTERNATING_STEP_SECONDS), *metric))
            .collect(),
    }
}
