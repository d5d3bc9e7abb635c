pub const YEAR_ID: &str = "year";

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Calendar year of a unix timestamp as seen by a clock `utc_offset_minutes`
/// ahead of UTC (negative west of Greenwich).
pub fn calendar_year(unix_millis: i64, utc_offset_minutes: i32) -> i64 {
    let local_millis = unix_millis + i64::from(utc_offset_minutes) * 60_000;
    let days = local_millis.div_euclid(MILLIS_PER_DAY);
    year_from_days(days)
}

pub fn stamp_text(year: i64) -> String {
    year.to_string()
}

// Proleptic Gregorian conversion over 400-year eras, days counted from 1970-01-01.
fn year_from_days(days: i64) -> i64 {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let day_of_era = z - era * 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1_460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let year = year_of_era + era * 400;

    // Shifted months 10 and 11 are January and February of the following year.
    if shifted_month >= 10 {
        year + 1
    } else {
        year
    }
}
