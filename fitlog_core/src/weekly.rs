//! Weekly consumed-vs-burned balance.
//!
//! Joins two logs with different key spaces over the 7 days ending today:
//! consumed calories come from the meal log by exact calendar date, burned
//! calories from the workout template by weekday name.
//!
//! Known quirk: the workout template has no week, so every Monday in any
//! window shows the same burned figure. The lookup is done by name exactly
//! as stored; nothing here tries to reconcile the two key spaces.

use crate::intake::date_key;
use crate::{MealLog, WorkoutPlan};
use chrono::{Datelike, Duration, NaiveDate};

/// Number of days in the balance window, today inclusive
pub const WINDOW_DAYS: i64 = 7;

/// One column of the weekly balance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayBalance {
    pub date: NaiveDate,
    /// Short weekday name of `date` (`Mon`, `Tue`, …)
    pub label: String,
    pub consumed: u32,
    pub burned: u32,
}

impl DayBalance {
    /// Consumed minus burned; negative on a deficit
    pub fn net(&self) -> i64 {
        i64::from(self.consumed) - i64::from(self.burned)
    }
}

/// The 7-point series, oldest first, ending on the evaluation date
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeeklyBalance {
    pub days: Vec<DayBalance>,
}

impl WeeklyBalance {
    pub fn total_consumed(&self) -> u64 {
        self.days.iter().map(|d| u64::from(d.consumed)).sum()
    }

    pub fn total_burned(&self) -> u64 {
        self.days.iter().map(|d| u64::from(d.burned)).sum()
    }

    pub fn net(&self) -> i64 {
        self.days.iter().map(DayBalance::net).sum()
    }
}

/// Build the weekly balance ending on `today`
///
/// Always returns exactly [`WINDOW_DAYS`] points regardless of how sparse
/// the logs are.
pub fn weekly_balance(meals: &MealLog, workouts: &WorkoutPlan, today: NaiveDate) -> WeeklyBalance {
    let days = (0..WINDOW_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let weekday = date.weekday();

            DayBalance {
                date,
                label: date.format("%a").to_string(),
                consumed: meals.total_for_day(&date_key(date)),
                burned: workouts.total_for_weekday(weekday),
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        "Built weekly balance ending {} ({} workout days)",
        today,
        days.iter().filter(|d| d.burned > 0).count()
    );

    WeeklyBalance { days }
}
