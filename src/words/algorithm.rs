//! Review interval state machine
//!
//! Each review offers two choices: fall back to tomorrow, or move one step
//! further along `T -> W -> M -> 3M -> B`. Burned words stay burned.
//!
//! | current    | offered      |
//! |------------|--------------|
//! | unset / T  | T, W         |
//! | W          | T, M         |
//! | M          | T, 3M        |
//! | 3M         | T, B         |
//! | B          | B, B         |

use chrono::{Duration, NaiveDate};
use thiserror::Error;

use super::models::FrequencyCode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Choice {choice:?} is not offered for a word at {current:?}")]
    ChoiceNotOffered {
        current: FrequencyCode,
        choice: FrequencyCode,
    },
}

/// Result of answering a flashcard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub frequency: FrequencyCode,
    pub next_review: NaiveDate,
}

/// The two choices offered for a word at `current`
pub fn next_choices(current: FrequencyCode) -> [FrequencyCode; 2] {
    use FrequencyCode::*;

    match current {
        Unset | Tomorrow => [Tomorrow, Week],
        Week => [Tomorrow, Month],
        Month => [Tomorrow, ThreeMonths],
        ThreeMonths => [Tomorrow, Burned],
        Burned => [Burned, Burned],
    }
}

/// Days from today until the next review for a chosen frequency
pub fn due_offset_days(choice: FrequencyCode) -> i64 {
    match choice {
        FrequencyCode::Unset | FrequencyCode::Tomorrow => 1,
        FrequencyCode::Week => 7,
        FrequencyCode::Month => 30,
        FrequencyCode::ThreeMonths => 90,
        FrequencyCode::Burned => 0,
    }
}

/// Apply a reviewer's choice to a word currently at `current`
///
/// An unset choice counts as "tomorrow".
pub fn apply_choice(
    current: FrequencyCode,
    choice: FrequencyCode,
    today: NaiveDate,
) -> Result<ReviewOutcome, ReviewError> {
    let choice = match choice {
        FrequencyCode::Unset => FrequencyCode::Tomorrow,
        c => c,
    };

    if !next_choices(current).contains(&choice) {
        return Err(ReviewError::ChoiceNotOffered { current, choice });
    }

    Ok(ReviewOutcome {
        frequency: choice,
        next_review: today + Duration::days(due_offset_days(choice)),
    })
}
