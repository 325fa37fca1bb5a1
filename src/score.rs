use crate::models::{ActivityRecord, Diet, TrainingType};
use serde::Serialize;

pub const MAX_SCORE: u8 = 3;

impl TrainingType {
    pub fn points(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Cardio => 1,
            Self::Physical => 2,
        }
    }
}

/// Training contributes 0..=2, a good diet adds 1. A missing record scores 0.
pub fn score(training_type: TrainingType, diet: Option<Diet>) -> u8 {
    let diet_points = u8::from(diet == Some(Diet::Good));
    training_type.points() + diet_points
}

pub fn activity_score(activity: Option<&ActivityRecord>) -> u8 {
    activity.map_or(0, |record| score(record.training_type, record.diet))
}

impl ActivityRecord {
    pub fn score(&self) -> u8 {
        score(self.training_type, self.diet)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Empty,
    Level1,
    Level2,
    Level3,
}

impl ColorToken {
    pub const ALL: [ColorToken; 4] = [Self::Empty, Self::Level1, Self::Level2, Self::Level3];

    /// CSS value for the square. The empty square follows the page theme.
    pub fn css(self) -> &'static str {
        match self {
            Self::Empty => "var(--square-empty)",
            Self::Level1 => "#7D8B7E",
            Self::Level2 => "#E8B87D",
            Self::Level3 => "#D97757",
        }
    }
}

pub fn color_for_score(score: u8) -> ColorToken {
    match score {
        1 => ColorToken::Level1,
        2 => ColorToken::Level2,
        3 => ColorToken::Level3,
        _ => ColorToken::Empty,
    }
}

pub fn color_for_activity(activity: Option<&ActivityRecord>) -> ColorToken {
    color_for_score(activity_score(activity))
}
