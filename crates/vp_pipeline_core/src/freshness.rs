use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BUFFER_DAYS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessStatus {
    Fresh,
    Stale,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertMessage {
    pub subject: String,
    pub body: String,
}

/// Decides whether the coverage file is stale.
///
/// Comparison is by calendar date only; a file last modified exactly
/// `buffer_days` ago counts as stale.
pub fn evaluate_freshness(
    last_modified: NaiveDate,
    today: NaiveDate,
    buffer_days: u32,
) -> FreshnessStatus {
    match today.checked_sub_days(Days::new(u64::from(buffer_days))) {
        Some(threshold) if last_modified <= threshold => FreshnessStatus::Stale,
        _ => FreshnessStatus::Fresh,
    }
}

pub fn stale_alert(buffer_days: u32) -> AlertMessage {
    AlertMessage {
        subject: "ENRAM data pipeline not updated".to_string(),
        body: format!(
            "Enram data pipeline not updated since {buffer_days} days. Please check server \
             ~/log_file_transfer and ~/data-repository/file_transfer/cronlog_enram for \
             potential errors!"
        ),
    }
}
