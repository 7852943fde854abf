use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use std::cmp::Ordering;
use std::str::FromStr;

use super::types::HistoryEntry;

/// Look-back window for history listings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeRange {
    Week,
    Month,
    SixMonths,
    YearToDate,
    Year,
    FiveYears,
    Max,
    /// Any humantime duration, e.g. "10days"
    Custom(std::time::Duration),
}

impl TimeRange {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        Ok(match s.to_lowercase().as_str() {
            "1w" => TimeRange::Week,
            "1m" => TimeRange::Month,
            "6m" => TimeRange::SixMonths,
            "ytd" => TimeRange::YearToDate,
            "1y" => TimeRange::Year,
            "5y" => TimeRange::FiveYears,
            "max" | "all" => TimeRange::Max,
            _ => TimeRange::Custom(
                humantime::parse_duration(s)
                    .with_context(|| format!("Invalid time range '{}'", s))?,
            ),
        })
    }

    /// Earliest date included, or None for no lower bound.
    ///
    /// Calendar ranges start at midnight UTC on the matching day.
    pub fn start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let today = now.date_naive();
        let months_back = |n: u32| today.checked_sub_months(Months::new(n)).map(midnight);

        match self {
            TimeRange::Week => Some(now - chrono::Duration::days(7)),
            TimeRange::Month => months_back(1),
            TimeRange::SixMonths => months_back(6),
            TimeRange::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1).map(midnight),
            TimeRange::Year => months_back(12),
            TimeRange::FiveYears => months_back(60),
            TimeRange::Max => None,
            TimeRange::Custom(d) => chrono::Duration::from_std(*d)
                .ok()
                .and_then(|d| now.checked_sub_signed(d)),
        }
    }
}

impl FromStr for TimeRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Keep entries dated on or after the range start
pub fn filter_by_range<'a>(
    entries: impl IntoIterator<Item = &'a HistoryEntry>,
    range: TimeRange,
    now: DateTime<Utc>,
) -> Vec<&'a HistoryEntry> {
    let start = range.start(now);
    entries
        .into_iter()
        .filter(|e| start.map_or(true, |s| e.date >= s))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Brand,
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "brand" | "name" => Ok(SortKey::Brand),
            other => anyhow::bail!("Unknown sort column '{}' (expected date or brand)", other),
        }
    }
}

/// Sort entries in place. Brand names compare case-insensitively first.
pub fn sort_entries(entries: &mut [&HistoryEntry], key: SortKey, ascending: bool) {
    entries.sort_by(|a, b| {
        let ord = match key {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Brand => compare_names(&a.brand_name, &b.brand_name),
        };
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
