use crate::errors::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingType {
    Physical,
    Cardio,
    #[default]
    None,
}

impl TrainingType {
    pub const ALL: [TrainingType; 3] = [Self::Physical, Self::Cardio, Self::None];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Cardio => "cardio",
            Self::None => "none",
        }
    }
}

impl fmt::Display for TrainingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "physical" => Ok(Self::Physical),
            "cardio" => Ok(Self::Cardio),
            "none" => Ok(Self::None),
            _ => Err(ValidationError::TrainingType),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Diet {
    Good,
    Bad,
}

impl Diet {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
        }
    }
}

impl fmt::Display for Diet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Diet {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "good" => Ok(Self::Good),
            "bad" => Ok(Self::Bad),
            _ => Err(ValidationError::Diet),
        }
    }
}

/// One persisted day. Days without a record are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub training_type: TrainingType,
    pub diet: Option<Diet>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated upsert payload. Missing fields fall back to defaults on write,
/// they are never merged with the stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_type: Option<TrainingType>,
    pub diet: Option<Diet>,
}

impl ActivityInput {
    pub fn new(training_type: TrainingType, diet: Option<Diet>) -> Self {
        Self {
            training_type: Some(training_type),
            diet,
        }
    }
}

/// Raw PUT body, kept as strings so bad enum values surface as validation errors.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    #[serde(default, alias = "training_type")]
    pub training_type: Option<String>,
    #[serde(default)]
    pub diet: Option<String>,
}

impl ActivityRequest {
    pub fn validate(self) -> Result<ActivityInput, ValidationError> {
        // An empty training type is treated as unspecified.
        let training_type = match self.training_type.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(raw.parse()?),
        };
        let diet = self.diet.as_deref().map(str::parse).transpose()?;
        Ok(ActivityInput {
            training_type,
            diet,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct YearQuery {
    pub year: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub year: i32,
    pub activity_count: usize,
    pub physical: u32,
    pub cardio: u32,
    pub good_diet: u32,
    pub rest_days: u32,
    pub total: u32,
    pub percentages: OverviewPercentages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewPercentages {
    pub physical: u8,
    pub cardio: u8,
    pub good_diet: u8,
    pub rest_days: u8,
}

/// Years accepted from callers. Keeps every date key four digits wide.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Parses a `YYYY-MM-DD` key. The shape is checked first, then the calendar.
pub fn parse_date_key(raw: &str) -> Result<NaiveDate, ValidationError> {
    let shaped = raw.len() == 10
        && raw.bytes().enumerate().all(|(index, byte)| match index {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !shaped {
        return Err(ValidationError::DateFormat);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ValidationError::DateFormat)
}

pub fn parse_year(raw: &str) -> Result<i32, ValidationError> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|year| (MIN_YEAR..=MAX_YEAR).contains(year))
        .ok_or(ValidationError::Year)
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
