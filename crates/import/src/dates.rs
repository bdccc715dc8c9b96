use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Utc};

use crate::cell::CellValue;

/// Day zero of the 1900 spreadsheet serial-date era. Serial `n` maps to
/// `1899-12-30 + n days`, which reproduces Excel's (leap-bug-compatible)
/// convention for dates after February 1900.
fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap()
}

const TEXT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_ONLY_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d",
];

/// Coerces a cell into a date-time. Date cells pass through, numeric cells
/// are treated as spreadsheet serial dates, text goes through a format
/// fallback chain. Anything unparseable becomes "now" — a bad date must not
/// cost the row.
pub fn coerce(cell: &CellValue) -> NaiveDateTime {
    match cell {
        CellValue::DateTime(dt) => *dt,
        CellValue::Number(n) => from_serial(*n),
        CellValue::Text(s) => parse_text(s).unwrap_or_else(now),
        CellValue::Empty => now(),
    }
}

/// Serial date -> date-time; the fractional part is the time of day.
/// A serial outside the representable calendar range (a NIP or phone number
/// that strayed into a date column) falls back to "now" like any other
/// unparseable date.
pub fn from_serial(serial: f64) -> NaiveDateTime {
    checked_from_serial(serial).unwrap_or_else(now)
}

fn checked_from_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let days = TimeDelta::try_days(serial.trunc() as i64)?;
    let seconds = TimeDelta::try_seconds((serial.fract() * 86_400.0).round() as i64)?;
    serial_epoch()
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(days)?
        .checked_add_signed(seconds)
}

fn parse_text(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // A textual cell holding digits only is still a serial date.
    if let Ok(serial) = s.parse::<f64>() {
        return Some(from_serial(serial));
    }

    for fmt in TEXT_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_ONLY_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_45000_is_2023_03_15() {
        let dt = from_serial(45000.0);
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
        assert_eq!(dt.time(), chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn serial_fraction_becomes_time_of_day() {
        let dt = from_serial(45000.5);
        assert_eq!(dt.time(), chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    }

    #[test]
    fn datetime_cell_passes_through() {
        let dt = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(coerce(&CellValue::DateTime(dt)), dt);
    }

    #[test]
    fn numeric_cell_is_a_serial_date() {
        let dt = coerce(&CellValue::Number(45000.0));
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
    }

    #[test]
    fn iso_and_polish_text_dates_parse() {
        let iso = coerce(&CellValue::Text("2024-01-15".into()));
        assert_eq!(iso.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        let pl = coerce(&CellValue::Text("15.01.2024".into()));
        assert_eq!(pl.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        let with_time = coerce(&CellValue::Text("2024-01-15 14:30:00".into()));
        assert_eq!(
            with_time.time(),
            chrono::NaiveTime::from_hms_opt(14, 30, 0).unwrap()
        );
    }

    #[test]
    fn digits_in_a_text_cell_are_a_serial() {
        let dt = coerce(&CellValue::Text("45000".into()));
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
    }

    #[test]
    fn nip_sized_serial_defaults_to_now() {
        // A tax id in a date column is ~14 million years of days; it must
        // degrade to "now", not abort the row.
        let before = Utc::now().naive_utc();
        let from_text = coerce(&CellValue::Text("5213017766".into()));
        let from_number = coerce(&CellValue::Number(5213017766.0));
        let after = Utc::now().naive_utc();
        assert!(from_text >= before && from_text <= after);
        assert!(from_number >= before && from_number <= after);
    }

    #[test]
    fn out_of_range_serials_default_to_now() {
        let before = Utc::now().naive_utc();
        for serial in [-1.0e12, 1.0e18, f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let dt = coerce(&CellValue::Number(serial));
            assert!(dt >= before, "serial {serial} did not fall back to now");
        }
    }

    #[test]
    fn garbage_defaults_to_now_instead_of_failing() {
        let before = Utc::now().naive_utc();
        let dt = coerce(&CellValue::Text("wczoraj wieczorem".into()));
        let after = Utc::now().naive_utc();
        assert!(dt >= before && dt <= after);
    }

    #[test]
    fn empty_defaults_to_now() {
        let before = Utc::now().naive_utc();
        let dt = coerce(&CellValue::Empty);
        assert!(dt >= before);
    }
}
