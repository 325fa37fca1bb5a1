//! Year calendar layout: Sunday-first week rows covering a whole year plus
//! padding days from the neighbouring years.

use crate::models::date_key;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Serialize;

/// Upper bound on emitted rows. A year spans at most 54 Sunday-aligned weeks.
pub const MAX_WEEKS: usize = 55;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub date: NaiveDate,
    pub date_string: String,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    pub week_index: usize,
    pub is_in_year: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRow {
    pub week_index: usize,
    pub days: [DayCell; 7],
}

impl WeekRow {
    pub fn first_in_year(&self) -> Option<&DayCell> {
        self.days.iter().find(|day| day.is_in_year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthLabel {
    pub label: &'static str,
    pub week_index: usize,
}

/// Lays out `year` as consecutive Sunday-first weeks.
///
/// The first row starts on the Sunday on or before Jan 1 and the last row ends
/// on the Saturday on or after Dec 31. Returns an empty grid when the padded
/// span falls outside the representable calendar.
pub fn generate_year_grid(year: i32) -> Vec<WeekRow> {
    let Some((start, end)) = year_bounds(year) else {
        return Vec::new();
    };
    let lead = u64::from(start.weekday().num_days_from_sunday());
    let Some(mut cursor) = start.checked_sub_days(Days::new(lead)) else {
        return Vec::new();
    };

    let mut weeks = Vec::with_capacity(54);
    while cursor <= end || cursor.weekday() != Weekday::Sun {
        if weeks.len() >= MAX_WEEKS {
            break;
        }
        let Some(next) = cursor.checked_add_days(Days::new(7)) else {
            break;
        };

        let week_index = weeks.len();
        let first = cursor;
        let days = std::array::from_fn(|offset| {
            let date = first + Days::new(offset as u64);
            DayCell {
                date,
                date_string: date_key(date),
                day_of_week: offset as u8,
                week_index,
                is_in_year: date.year() == year,
            }
        });
        weeks.push(WeekRow { week_index, days });
        cursor = next;
    }

    weeks
}

/// One label per month, placed on the first row whose earliest in-year day
/// falls in a new month.
pub fn month_labels(weeks: &[WeekRow]) -> Vec<MonthLabel> {
    let mut labels = Vec::with_capacity(12);
    let mut last_month = None;

    for week in weeks {
        let Some(day) = week.first_in_year() else {
            continue;
        };
        let month = day.date.month0();
        if last_month != Some(month) {
            labels.push(MonthLabel {
                label: MONTH_ABBREVIATIONS[month as usize],
                week_index: week.week_index,
            });
            last_month = Some(month);
        }
    }

    labels
}

fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
    // Trailing padding must stay representable too.
    end.checked_add_days(Days::new(7))?;
    Some((start, end))
}
