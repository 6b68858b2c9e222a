//! Parse helpers shared by the statement formats.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use teller_core::StatementPeriod;

/// Parse a grouped-digit money string like "9,850.00".
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().replace(',', "").parse().ok()
}

fn month_number(mon: &str) -> Option<u32> {
    let month = match mon.to_ascii_uppercase().as_str() {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        _ => return None,
    };
    Some(month)
}

/// Parse a "01 JAN 2024" date.
pub fn parse_dd_mon_yyyy(raw: &str) -> Option<NaiveDate> {
    let mut it = raw.split_whitespace();
    let day: u32 = it.next()?.parse().ok()?;
    let month = month_number(it.next()?)?;
    let year: i32 = it.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a "01/02/24" date, resolving the two-digit year with a century
/// prefix: "24" with prefix 20 reads as 2024.
pub fn parse_dd_mm_yy(raw: &str, year_prefix: i32) -> Option<NaiveDate> {
    let mut it = raw.trim().split('/');
    let day: u32 = it.next()?.parse().ok()?;
    let month: u32 = it.next()?.parse().ok()?;
    let yy: i32 = it.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year_prefix * 100 + yy, month, day)
}

/// True when the description names a credit-side movement.
///
/// Case-insensitive contains over the plugin's configured keyword list.
pub fn is_income(description: &str, keywords: &[String]) -> bool {
    let desc = description.to_lowercase();
    keywords.iter().any(|kw| desc.contains(&kw.to_lowercase()))
}

static PERIOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^statement\s+period\s+",
        r"(?P<start>\d{1,2}\s+[A-Za-z]{3}\s+\d{4})\s+to\s+",
        r"(?P<end>\d{1,2}\s+[A-Za-z]{3}\s+\d{4})$"
    ))
    .expect("valid period pattern")
});

/// Match a "Statement Period 01 JAN 2024 to 31 JAN 2024" header row.
pub fn match_period(line: &str) -> Option<StatementPeriod> {
    let caps = PERIOD.captures(line)?;
    let start = parse_dd_mon_yyyy(&caps["start"])?;
    let end = parse_dd_mon_yyyy(&caps["end"])?;
    Some(StatementPeriod { start, end })
}
