//! Age of a horse in whole years.

use chrono::{Datelike, NaiveDate};

/// Whole years between `birth` and `today`.
///
/// One year is subtracted when this year's birthday has not happened yet.
/// A 29 February birthday is reached on 1 March in common years. Birth dates
/// after `today` yield 0.
pub fn age_in_years(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age.max(0)
}
