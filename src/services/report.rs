use jiff::{SignedDuration, Timestamp};

use crate::models::{item::TodoItem, store::Store};

/// Window used when no explicit number of days is requested
pub const DEFAULT_REPORT_DAYS: u32 = 8;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

pub struct ReportParameters {
    pub days: u32,
    pub now: Timestamp,
}

/// Completed items finished within the last `days` days, oldest first.
/// A window reaching past the earliest representable time covers every
/// completed item.
pub fn completed_report(store: &Store, parameters: ReportParameters) -> Vec<&TodoItem> {
    let window = SignedDuration::from_secs(i64::from(parameters.days) * SECONDS_PER_DAY);
    let threshold = parameters.now.checked_sub(window).unwrap_or(Timestamp::MIN);

    let mut recent: Vec<_> = store
        .completed
        .iter()
        .filter(|item| item.completed_at.is_some_and(|at| at >= threshold))
        .collect();

    recent.sort_by_key(|item| item.completed_at);
    recent
}
