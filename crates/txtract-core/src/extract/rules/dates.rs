//! Date token detection and normalization.
//!
//! Slash, dash and dot dates are read as day/month/year. Two-digit years
//! belong to the 2000s.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Captures;
use tracing::trace;

use crate::models::transaction::DateResolution;

use super::patterns::{DATE_TOKEN, DAY_FIRST_DATE, ISO_DATE, TEXTUAL_DATE};
use super::{ExtractionMatch, FieldExtractor};

/// Formats tried on the raw token once the recognized shapes fail.
const DIRECT_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DIRECT_DATE_FORMATS: [&str; 5] = ["%b %d, %Y", "%B %d, %Y", "%Y/%m/%d", "%d %B %Y", "%Y%m%d"];

/// Confidence reported for a bare date token. Tier matches carry their
/// tier's confidence instead; this only surfaces through `FieldExtractor`.
pub const DATE_TOKEN_CONFIDENCE: f32 = 0.9;

/// A normalized date with the way it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedDate {
    pub instant: DateTime<Utc>,
    pub resolution: DateResolution,
}

/// Date token extractor.
pub struct DateTokenExtractor;

impl DateTokenExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateTokenExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateTokenExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE_TOKEN
            .find_iter(text)
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), DATE_TOKEN_CONFIDENCE, m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Normalize a date token, substituting the current instant when the token
/// cannot be parsed. Never fails; check `resolution` to tell the cases apart.
pub fn normalize_date(token: &str) -> NormalizedDate {
    match parse_date_token(token) {
        Some(instant) => NormalizedDate {
            instant,
            resolution: DateResolution::Parsed,
        },
        None => {
            trace!("Unparseable date token {:?}, using current instant", token);
            NormalizedDate {
                instant: Utc::now(),
                resolution: DateResolution::Fallback,
            }
        }
    }
}

/// Parse a date token in any recognized shape.
pub fn parse_date_token(token: &str) -> Option<DateTime<Utc>> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    parse_textual_month(token)
        .or_else(|| parse_day_first(token))
        .or_else(|| parse_iso(token))
        .or_else(|| parse_direct(token))
}

/// "11 Dec 2025", "11-Dec-25", "3 September 2025".
fn parse_textual_month(token: &str) -> Option<DateTime<Utc>> {
    let caps = TEXTUAL_DATE.captures(token)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = month_from_name(&caps[2])?;
    let year = expand_year(&caps[3])?;

    at_time(NaiveDate::from_ymd_opt(year, month, day)?, &caps)
}

/// "12/11/2025" is 12 November 2025, never December 11.
fn parse_day_first(token: &str) -> Option<DateTime<Utc>> {
    let caps = DAY_FIRST_DATE.captures(token)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year = expand_year(&caps[3])?;

    at_time(NaiveDate::from_ymd_opt(year, month, day)?, &caps)
}

/// "2025-12-10", optionally with "14:30" or "14:30:05".
fn parse_iso(token: &str) -> Option<DateTime<Utc>> {
    let caps = ISO_DATE.captures(token)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    at_time(NaiveDate::from_ymd_opt(year, month, day)?, &caps)
}

/// Combine a date with the time-of-day groups 4-7 of an anchored shape.
/// No time means midnight; a 12-hour clock needs an hour from 1 to 12.
fn at_time(date: NaiveDate, caps: &Captures) -> Option<DateTime<Utc>> {
    let time = match (caps.get(4), caps.get(5)) {
        (Some(h), Some(m)) => {
            let mut hour: u32 = h.as_str().parse().ok()?;
            let minute: u32 = m.as_str().parse().ok()?;
            let second = caps.get(6).map_or(Some(0), |s| s.as_str().parse().ok())?;

            if let Some(meridiem) = caps.get(7) {
                if !(1..=12).contains(&hour) {
                    return None;
                }
                let pm = meridiem.as_str().eq_ignore_ascii_case("pm");
                hour = match (hour, pm) {
                    (12, false) => 0,
                    (12, true) => 12,
                    (h, true) => h + 12,
                    (h, false) => h,
                };
            }

            NaiveTime::from_hms_opt(hour, minute, second)?
        }
        _ => NaiveTime::MIN,
    };

    Some(NaiveDateTime::new(date, time).and_utc())
}

fn parse_direct(token: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DIRECT_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(token, format) {
            return Some(dt.and_utc());
        }
    }

    DIRECT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(token, format).ok())
        .and_then(at_midnight)
}

fn at_midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    Some(date.and_time(NaiveTime::MIN).and_utc())
}

fn expand_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    match s.len() {
        2 => Some(2000 + year),
        4 => Some(year),
        _ => None,
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
