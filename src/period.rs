//! Calendar windows for the dashboard time-series: day, week, and month
//! buckets with display labels.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};

/// Number of day windows shown on the dashboard time-series.
pub const DAY_WINDOW_COUNT: usize = 12;
/// Number of week windows shown on the dashboard time-series.
pub const WEEK_WINDOW_COUNT: usize = 8;
/// Number of month windows shown on the dashboard time-series.
pub const MONTH_WINDOW_COUNT: usize = 6;

/// The bucketing granularity selected for a dashboard refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    pub fn default_preset() -> Self {
        Self::Day
    }

    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
        }
    }

    /// How many historical windows the dashboard displays for this
    /// granularity.
    pub fn window_count(self) -> usize {
        match self {
            Self::Day => DAY_WINDOW_COUNT,
            Self::Week => WEEK_WINDOW_COUNT,
            Self::Month => MONTH_WINDOW_COUNT,
        }
    }
}

/// A labeled calendar window. Both `start` and `end` are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodWindow {
    pub label: String,
    pub start: Date,
    pub end: Date,
}

impl PeriodWindow {
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The window containing `date` for the given granularity.
///
/// This is the single bucketing rule: the historical sequence, the current
/// and previous windows, and record classification all go through it, so a
/// record's label can never disagree with the sequence's labels.
pub fn window_containing(period: Period, date: Date) -> PeriodWindow {
    let (start, end) = match period {
        Period::Day => (date, date),
        Period::Week => week_bounds(date),
        Period::Month => month_bounds(date.year(), date.month()),
    };

    PeriodWindow {
        label: window_label(period, start, end),
        start,
        end,
    }
}

/// The display label of the window containing `date`.
pub fn label_of(period: Period, date: Date) -> String {
    window_containing(period, date).label
}

/// The window containing `today`.
pub fn current_window(period: Period, today: Date) -> PeriodWindow {
    window_containing(period, today)
}

/// The single window immediately before the one containing `today`,
/// regardless of how many windows the dashboard displays.
pub fn previous_window(period: Period, today: Date) -> PeriodWindow {
    let current = window_containing(period, today);

    window_containing(period, current.start - Duration::days(1))
}

/// The `count` most recent windows ending at the one containing `today`,
/// ordered oldest first. Returns an empty sequence when `count` is zero.
pub fn window_sequence(period: Period, today: Date, count: usize) -> Vec<PeriodWindow> {
    let mut windows = Vec::with_capacity(count);
    let mut anchor = today;

    for _ in 0..count {
        let window = window_containing(period, anchor);
        anchor = window.start - Duration::days(1);
        windows.push(window);
    }

    windows.reverse();
    windows
}

fn window_label(period: Period, start: Date, end: Date) -> String {
    match period {
        Period::Day => format!("{:02}/{:02}", start.day(), month_number(start.month())),
        Period::Week => format!(
            "{}/{} - {}/{}",
            start.day(),
            month_number(start.month()),
            end.day(),
            month_number(end.month())
        ),
        Period::Month => format!("{} {}", month_abbrev(start.month()), start.year()),
    }
}

fn week_bounds(anchor_date: Date) -> (Date, Date) {
    let weekday_number = anchor_date.weekday().number_from_monday() as i64;
    let start = anchor_date - Duration::days(weekday_number - 1);
    let end = start + Duration::days(6);

    (start, end)
}

fn month_bounds(year: i32, month: Month) -> (Date, Date) {
    let start = Date::from_calendar_date(year, month, 1).expect("invalid month start date");
    let end = Date::from_calendar_date(year, month, last_day_of_month(year, month))
        .expect("invalid month end date");

    (start, end)
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn month_number(month: Month) -> u8 {
    match month {
        Month::January => 1,
        Month::February => 2,
        Month::March => 3,
        Month::April => 4,
        Month::May => 5,
        Month::June => 6,
        Month::July => 7,
        Month::August => 8,
        Month::September => 9,
        Month::October => 10,
        Month::November => 11,
        Month::December => 12,
    }
}

fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
