// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Parsing of acquisition metadata strings.
//!
//! Spacing and acquisition time arrive as the raw attribute strings of the
//! source dataset (`"0.3\\0.3"`, `"20250101120000.000000"`, ...).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Parse a pixel spacing string into `[row, column]`.
///
/// Accepts backslash or comma separated values, optionally wrapped in
/// brackets. A single value is used for both axes. Unparsable parts are
/// skipped; `None` when nothing parses.
pub fn parse_spacing(text: &str) -> Option<[f64; 2]> {
    let trimmed = text.trim().trim_matches(|c: char| c == '[' || c == ']');
    let values: Vec<f64> = trimmed
        .split(['\\', ','])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse().ok())
        .collect();
    spacing_from_values(&values)
}

/// First two values as `[row, column]`, a single value duplicated.
pub fn spacing_from_values(values: &[f64]) -> Option<[f64; 2]> {
    match values {
        [] => None,
        [single] => Some([*single, *single]),
        [row, column, ..] => Some([*row, *column]),
    }
}

/// Parse a DICOM `DT`-style timestamp.
///
/// Supported forms: `yyyyMMddHHmmss[.f...]`, `yyyyMMddHHmm`, `yyyyMMdd`.
pub fn parse_acquisition_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    let (main, fraction) = match text.split_once('.') {
        Some((main, fraction)) => (main, Some(fraction)),
        None => (text, None),
    };
    if !main.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let date = NaiveDate::parse_from_str(main.get(..8)?, "%Y%m%d").ok()?;
    let field = |range: std::ops::Range<usize>| main.get(range)?.parse::<u32>().ok();
    let time = match (main.len(), fraction) {
        (8, None) => NaiveTime::from_hms_opt(0, 0, 0)?,
        (12, None) => NaiveTime::from_hms_opt(field(8..10)?, field(10..12)?, 0)?,
        (14, _) => NaiveTime::from_hms_opt(field(8..10)?, field(10..12)?, field(12..14)?)?,
        _ => return None,
    };
    let time = match fraction {
        Some(digits) => time.with_nanosecond(fraction_nanos(digits)?)?,
        None => time,
    };
    Some(date.and_time(time))
}

fn fraction_nanos(digits: &str) -> Option<u32> {
    if digits.is_empty() || digits.len() > 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u32 = digits.parse().ok()?;
    Some(value * 10u32.pow(9 - digits.len() as u32))
}

/// Acquisition time from the combined datetime attribute, falling back to
/// the separate date and time attributes.
pub fn resolve_timestamp(datetime: Option<&str>, date: Option<&str>, time: Option<&str>) -> Option<NaiveDateTime> {
    if let Some(dt) = datetime
        .filter(|s| !s.trim().is_empty())
        .and_then(parse_acquisition_datetime)
    {
        return Some(dt);
    }
    let date = date.filter(|s| !s.trim().is_empty())?;
    let combined = format!("{}{}", date.trim(), time.unwrap_or("").trim());
    parse_acquisition_datetime(&combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 25)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_spacing_formats() {
        assert_eq!(parse_spacing("0.3\\0.4"), Some([0.3, 0.4]));
        assert_eq!(parse_spacing("[0.3, 0.4]"), Some([0.3, 0.4]));
        assert_eq!(parse_spacing(" 0.3,0.4 "), Some([0.3, 0.4]));
        assert_eq!(parse_spacing("0.5"), Some([0.5, 0.5]));
        assert_eq!(parse_spacing("0.1\\0.2\\0.3"), Some([0.1, 0.2]));
    }

    #[test]
    fn test_spacing_skips_garbage() {
        assert_eq!(parse_spacing("abc\\0.25"), Some([0.25, 0.25]));
        assert_eq!(parse_spacing(""), None);
        assert_eq!(parse_spacing("   "), None);
        assert_eq!(parse_spacing("[]"), None);
        assert_eq!(parse_spacing("x,y"), None);
    }

    #[test]
    fn test_datetime_forms() {
        assert_eq!(parse_acquisition_datetime("20251125143015"), Some(at(14, 30, 15)));
        assert_eq!(parse_acquisition_datetime("202511251430"), Some(at(14, 30, 0)));
        assert_eq!(parse_acquisition_datetime("20251125"), Some(at(0, 0, 0)));

        let fractional = parse_acquisition_datetime("20251125143015.250000").unwrap();
        assert_eq!(fractional, at(14, 30, 15).with_nanosecond(250_000_000).unwrap());
        let millis = parse_acquisition_datetime("20251125143015.123").unwrap();
        assert_eq!(millis.nanosecond(), 123_000_000);
    }

    #[test]
    fn test_datetime_rejects_malformed() {
        assert_eq!(parse_acquisition_datetime(""), None);
        assert_eq!(parse_acquisition_datetime("2025-11-25"), None);
        assert_eq!(parse_acquisition_datetime("20251325143015"), None);
        assert_eq!(parse_acquisition_datetime("2025112514"), None);
        assert_eq!(parse_acquisition_datetime("202511251430.5"), None);
    }

    #[test]
    fn test_resolve_prefers_combined_then_date_time() {
        assert_eq!(
            resolve_timestamp(Some("20251125143015"), Some("20000101"), Some("000000")),
            Some(at(14, 30, 15))
        );
        assert_eq!(
            resolve_timestamp(None, Some("20251125"), Some("143015.000")),
            Some(at(14, 30, 15))
        );
        assert_eq!(resolve_timestamp(Some("junk"), Some("20251125"), None), Some(at(0, 0, 0)));
        assert_eq!(resolve_timestamp(None, None, Some("143015")), None);
    }
}
