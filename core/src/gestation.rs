//! Gestation progress for activated embryos.
//!
//! A mare carries for a fixed 340 days counted from the activation
//! (transfer) date. Everything here is pure arithmetic over that constant.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Equine gestation period in days.
pub const GESTATION_PERIOD_DAYS: i64 = 340;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestationInfo {
    pub gestation_days: i64,
    pub remaining_days: i64,
    pub expected_birth_date: NaiveDate,
    /// 0 to 100, clamped at both ends.
    pub percent_complete: f64,
}

impl GestationInfo {
    pub fn is_due(&self) -> bool {
        self.gestation_days >= GESTATION_PERIOD_DAYS
    }
}

/// Compute gestation progress.
///
/// `gestation_days` is the override when given, otherwise the number of
/// whole days between midnight UTC of `activation` and `now`. Activation
/// dates in the future count as day 0.
pub fn calculate_gestation_info(
    activation: NaiveDate,
    days_override: Option<i64>,
    now: DateTime<Utc>,
) -> GestationInfo {
    let gestation_days = days_override
        .unwrap_or_else(|| elapsed_days(activation, now))
        .max(0);

    let remaining_days = (GESTATION_PERIOD_DAYS - gestation_days).max(0);
    let percent_complete =
        (gestation_days as f64 / GESTATION_PERIOD_DAYS as f64 * 100.0).min(100.0);

    GestationInfo {
        gestation_days,
        remaining_days,
        expected_birth_date: expected_birth_date(activation),
        percent_complete,
    }
}

pub fn expected_birth_date(activation: NaiveDate) -> NaiveDate {
    activation
        .checked_add_days(Days::new(GESTATION_PERIOD_DAYS as u64))
        .unwrap_or(NaiveDate::MAX)
}

fn elapsed_days(activation: NaiveDate, now: DateTime<Utc>) -> i64 {
    let start = activation.and_time(NaiveTime::MIN).and_utc();
    let millis = (now - start).num_milliseconds();
    millis.div_euclid(86_400_000)
}
