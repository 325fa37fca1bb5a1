use crate::grid::{MonthLabel, generate_year_grid, month_labels};
use crate::models::{
    ActivityRecord, Diet, OverviewPercentages, OverviewResponse, TrainingType,
};
use crate::score::{ColorToken, activity_score, color_for_score};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearView {
    pub year: i32,
    pub weeks: Vec<WeekView>,
    pub month_labels: Vec<MonthLabel>,
    pub activity_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekView {
    pub week_index: usize,
    pub days: Vec<DayView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub date: String,
    pub day_of_week: u8,
    pub is_in_year: bool,
    pub training_type: Option<TrainingType>,
    pub diet: Option<Diet>,
    pub score: u8,
    pub color: ColorToken,
}

/// Joins the year's grid with stored records. Padding days are never scored.
pub fn build_year_view(year: i32, records: &[ActivityRecord]) -> YearView {
    let by_date: HashMap<NaiveDate, &ActivityRecord> = records
        .iter()
        .filter(|record| record.date.year() == year)
        .map(|record| (record.date, record))
        .collect();

    let grid = generate_year_grid(year);
    let labels = month_labels(&grid);
    let weeks = grid
        .into_iter()
        .map(|week| WeekView {
            week_index: week.week_index,
            days: week
                .days
                .into_iter()
                .map(|cell| {
                    let record = if cell.is_in_year {
                        by_date.get(&cell.date).copied()
                    } else {
                        None
                    };
                    let score = activity_score(record);
                    DayView {
                        date: cell.date_string,
                        day_of_week: cell.day_of_week,
                        is_in_year: cell.is_in_year,
                        training_type: record.map(|r| r.training_type),
                        diet: record.and_then(|r| r.diet),
                        score,
                        color: color_for_score(score),
                    }
                })
                .collect(),
        })
        .collect();

    YearView {
        year,
        weeks,
        month_labels: labels,
        activity_count: by_date.len(),
    }
}

/// Counts training kinds and good-diet days for the year and expresses each
/// as a rounded share of their sum.
pub fn build_overview(year: i32, records: &[ActivityRecord]) -> OverviewResponse {
    let mut physical = 0u32;
    let mut cardio = 0u32;
    let mut good_diet = 0u32;
    let mut rest_days = 0u32;
    let mut activity_count = 0usize;

    for record in records.iter().filter(|record| record.date.year() == year) {
        activity_count += 1;
        match record.training_type {
            TrainingType::Physical => physical += 1,
            TrainingType::Cardio => cardio += 1,
            TrainingType::None => rest_days += 1,
        }
        if record.diet == Some(Diet::Good) {
            good_diet += 1;
        }
    }

    let total = physical + cardio + good_diet + rest_days;
    let percentages = OverviewPercentages {
        physical: percentage(physical, total),
        cardio: percentage(cardio, total),
        good_diet: percentage(good_diet, total),
        rest_days: percentage(rest_days, total),
    };

    OverviewResponse {
        year,
        activity_count,
        physical,
        cardio,
        good_diet,
        rest_days,
        total,
        percentages,
    }
}

fn percentage(value: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    (f64::from(value) / f64::from(total) * 100.0).round() as u8
}
