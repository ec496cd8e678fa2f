use chrono::NaiveDate;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Renders whole elapsed seconds as zero-padded `HH:MM:SS`. Hours keep
/// counting past 24 instead of wrapping into days.
pub fn format_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = seconds % 3600 / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Serial day number used by xlsx date cells (1900 date system, epoch shifted
/// to 1899-12-30 to absorb the Lotus leap-year bug).
pub fn excel_date_serial(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap();
    date.signed_duration_since(epoch).num_days() as f64
}

/// Fraction of a day, the native xlsx representation of times and durations.
pub fn excel_day_fraction(seconds: u64) -> f64 {
    seconds as f64 / SECONDS_PER_DAY as f64
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{excel_date_serial, excel_day_fraction, format_hms};

    #[test]
    fn format_hms_pads_each_part() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(3725), "01:02:05");
    }

    #[test]
    fn format_hms_does_not_wrap_hours() {
        assert_eq!(format_hms(90000), "25:00:00");
    }

    #[test]
    fn date_serial_matches_known_values() {
        // 1900-01-01 is day 1 in the 1900 date system.
        assert_eq!(
            excel_date_serial(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()),
            1.0
        );
        assert_eq!(
            excel_date_serial(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            45658.0
        );
    }

    #[test]
    fn day_fraction_of_six_hours() {
        assert_eq!(excel_day_fraction(6 * 3600), 0.25);
    }
}
