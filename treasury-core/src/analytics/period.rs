//! Period granularity, date windows and request tokens
//!
//! Bucket keys are fixed width and zero padded, so sorting keys as strings
//! sorts them chronologically.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Datelike, Duration, Months, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::result::Error;

/// Calendar granularity for cash-flow buckets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }

    /// Bucket key for a date
    ///
    /// Weekly keys name the Sunday that starts the week.
    pub fn bucket_key(&self, date: NaiveDate) -> String {
        match self {
            Period::Daily => date.format("%Y-%m-%d").to_string(),
            Period::Weekly => week_start(date).format("%Y-%m-%d").to_string(),
            Period::Monthly => date.format("%Y-%m").to_string(),
            Period::Yearly => date.format("%Y").to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            "yearly" => Ok(Period::Yearly),
            other => Err(Error::bad_request(format!(
                "Invalid period '{}': expected daily, weekly, monthly or yearly",
                other
            ))),
        }
    }
}

/// The Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// Nullable period bounds echoed back in responses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodBounds {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl From<DateWindow> for PeriodBounds {
    fn from(window: DateWindow) -> Self {
        Self {
            start_date: Some(window.start),
            end_date: Some(window.end),
        }
    }
}

/// A closed date interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Window covering both bounds of `bounds`, if both are set
    pub fn from_bounds(bounds: PeriodBounds) -> Option<Self> {
        match (bounds.start_date, bounds.end_date) {
            (Some(start), Some(end)) => Some(Self::new(start, end)),
            _ => None,
        }
    }

    /// Number of calendar days covered, inclusive of both ends
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The window of identical length ending the day before `start`
    pub fn preceding(&self) -> Self {
        let len = self.days().max(1);
        Self {
            start: self.start - Duration::days(len),
            end: self.start - Duration::days(1),
        }
    }

    /// The same window one calendar year earlier
    pub fn year_earlier(&self) -> Self {
        Self {
            start: sub_months(self.start, 12),
            end: sub_months(self.end, 12),
        }
    }
}

/// Relative dashboard range token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateRangeToken {
    #[serde(rename = "7d")]
    Last7Days,
    #[default]
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[serde(rename = "6m")]
    Last6Months,
    #[serde(rename = "1y")]
    LastYear,
}

impl DateRangeToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateRangeToken::Last7Days => "7d",
            DateRangeToken::Last30Days => "30d",
            DateRangeToken::Last90Days => "90d",
            DateRangeToken::Last6Months => "6m",
            DateRangeToken::LastYear => "1y",
        }
    }

    /// Concrete window ending on `as_of`
    pub fn resolve(&self, as_of: NaiveDate) -> DateWindow {
        let start = match self {
            DateRangeToken::Last7Days => as_of - Duration::days(7),
            DateRangeToken::Last30Days => as_of - Duration::days(30),
            DateRangeToken::Last90Days => as_of - Duration::days(90),
            DateRangeToken::Last6Months => sub_months(as_of, 6),
            DateRangeToken::LastYear => sub_months(as_of, 12),
        };
        DateWindow::new(start, as_of)
    }

    /// Cash-flow granularity that keeps the bucket count readable
    pub fn bucket_period(&self) -> Period {
        match self {
            DateRangeToken::Last7Days | DateRangeToken::Last30Days => Period::Daily,
            DateRangeToken::Last90Days => Period::Weekly,
            DateRangeToken::Last6Months | DateRangeToken::LastYear => Period::Monthly,
        }
    }
}

impl FromStr for DateRangeToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7d" => Ok(DateRangeToken::Last7Days),
            "30d" => Ok(DateRangeToken::Last30Days),
            "90d" => Ok(DateRangeToken::Last90Days),
            "6m" => Ok(DateRangeToken::Last6Months),
            "1y" => Ok(DateRangeToken::LastYear),
            other => Err(Error::bad_request(format!(
                "Invalid date range '{}': expected 7d, 30d, 90d, 6m or 1y",
                other
            ))),
        }
    }
}

/// Which window a dashboard compares against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareMode {
    #[default]
    None,
    Previous,
    YearOverYear,
}

impl CompareMode {
    pub fn comparison_window(&self, current: DateWindow) -> Option<DateWindow> {
        match self {
            CompareMode::None => None,
            CompareMode::Previous => Some(current.preceding()),
            CompareMode::YearOverYear => Some(current.year_earlier()),
        }
    }
}

impl FromStr for CompareMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(CompareMode::None),
            "previous" => Ok(CompareMode::Previous),
            "year_over_year" => Ok(CompareMode::YearOverYear),
            other => Err(Error::bad_request(format!(
                "Invalid compare mode '{}': expected none, previous or year_over_year",
                other
            ))),
        }
    }
}

/// Trend lookback expressed as `"<N>m"` months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lookback {
    pub months: u32,
}

impl Lookback {
    pub fn months(months: u32) -> Self {
        Self { months }
    }

    pub fn window(&self, as_of: NaiveDate) -> DateWindow {
        DateWindow::new(sub_months(as_of, self.months), as_of)
    }
}

impl Default for Lookback {
    fn default() -> Self {
        Self { months: 12 }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.months)
    }
}

impl FromStr for Lookback {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| Regex::new(r"^(\d{1,4})m$").expect("valid lookback pattern"));

        let invalid = || Error::bad_request(format!("Invalid lookback '{}': expected <N>m, e.g. 12m", s));
        let caps = re.captures(s.trim()).ok_or_else(invalid)?;
        let months: u32 = caps[1].parse().map_err(|_| invalid())?;
        if months == 0 {
            return Err(invalid());
        }
        Ok(Self { months })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bucket_keys() {
        // 2025-03-13 is a Thursday
        let d = date(2025, 3, 13);
        assert_eq!(Period::Daily.bucket_key(d), "2025-03-13");
        assert_eq!(Period::Weekly.bucket_key(d), "2025-03-09");
        assert_eq!(Period::Monthly.bucket_key(d), "2025-03");
        assert_eq!(Period::Yearly.bucket_key(d), "2025");
    }

    #[test]
    fn test_week_starts_on_sunday() {
        let sunday = date(2025, 3, 9);
        assert_eq!(week_start(sunday), sunday);
        assert_eq!(week_start(date(2025, 3, 15)), sunday);
        // crosses a year boundary
        assert_eq!(week_start(date(2025, 1, 2)), date(2024, 12, 29));
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("Weekly".parse::<Period>().unwrap(), Period::Weekly);
        assert!(matches!("hourly".parse::<Period>(), Err(Error::BadRequest(_))));
    }

    #[test]
    fn test_preceding_window_has_same_length() {
        let window = DateWindow::new(date(2025, 3, 1), date(2025, 3, 31));
        let previous = window.preceding();
        assert_eq!(previous.days(), window.days());
        assert_eq!(previous.end, date(2025, 2, 28));
        assert_eq!(previous.start, date(2025, 1, 29));
    }

    #[test]
    fn test_year_earlier_clamps_leap_day() {
        let window = DateWindow::new(date(2024, 2, 1), date(2024, 2, 29));
        let earlier = window.year_earlier();
        assert_eq!(earlier.start, date(2023, 2, 1));
        assert_eq!(earlier.end, date(2023, 2, 28));
    }

    #[test]
    fn test_date_range_tokens() {
        let as_of = date(2025, 6, 30);
        assert_eq!(
            "7d".parse::<DateRangeToken>().unwrap().resolve(as_of).start,
            date(2025, 6, 23)
        );
        assert_eq!(
            "6m".parse::<DateRangeToken>().unwrap().resolve(as_of).start,
            date(2024, 12, 30)
        );
        assert_eq!(
            "1y".parse::<DateRangeToken>().unwrap().resolve(as_of).start,
            date(2024, 6, 30)
        );
        assert!("2w".parse::<DateRangeToken>().is_err());
    }

    #[test]
    fn test_compare_mode() {
        let window = DateWindow::new(date(2025, 6, 1), date(2025, 6, 30));
        assert_eq!(CompareMode::None.comparison_window(window), None);
        assert_eq!(
            CompareMode::YearOverYear.comparison_window(window),
            Some(DateWindow::new(date(2024, 6, 1), date(2024, 6, 30)))
        );
        assert_eq!(
            "year_over_year".parse::<CompareMode>().unwrap(),
            CompareMode::YearOverYear
        );
        assert!("yoy".parse::<CompareMode>().is_err());
    }

    #[test]
    fn test_lookback_parsing() {
        assert_eq!("6m".parse::<Lookback>().unwrap(), Lookback::months(6));
        assert_eq!(" 12m ".parse::<Lookback>().unwrap().months, 12);
        assert!("0m".parse::<Lookback>().is_err());
        assert!("6w".parse::<Lookback>().is_err());
        assert!("m".parse::<Lookback>().is_err());
        assert_eq!(Lookback::months(3).to_string(), "3m");

        let window = Lookback::months(3).window(date(2025, 5, 31));
        assert_eq!(window.start, date(2025, 2, 28));
    }
}
