use chrono::{Duration, NaiveDate};

use crate::models::Donor;

/// Minimum number of days between two donations
pub const DONATION_INTERVAL_DAYS: i64 = 90;

/// Default donation interval as a duration
pub fn donation_interval() -> Duration {
    Duration::days(DONATION_INTERVAL_DAYS)
}

/// Check whether a donor may donate on `today`
///
/// An unavailable donor is never eligible. An available donor with no
/// recorded donation always is. Otherwise at least 90 days must have passed
/// since the last donation, the 90th day included.
#[inline]
pub fn is_eligible(donor: &Donor, today: NaiveDate) -> bool {
    is_eligible_within(donor, today, donation_interval())
}

/// Same as [`is_eligible`] with an explicit interval
#[inline]
pub fn is_eligible_within(donor: &Donor, today: NaiveDate, interval: Duration) -> bool {
    if !donor.available {
        return false;
    }

    match donor.last_donation_date {
        None => true,
        // A date in the future yields a negative span and stays ineligible
        Some(last) => today.signed_duration_since(last) >= interval,
    }
}
