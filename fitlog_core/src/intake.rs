//! Daily intake aggregation.
//!
//! Sums logged meal calories per calendar-date key and per meal-type bucket,
//! and measures the day's intake against the daily calorie goal.

use crate::{MealEntry, MealLog, MealType};
use chrono::NaiveDate;

/// Calendar-date key used to group meals (`YYYY-MM-DD`)
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl MealLog {
    /// Meals logged under `date`, empty if none
    pub fn entries_for(&self, date: &str) -> &[MealEntry] {
        self.days.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append a meal to `date`
    ///
    /// Silently does nothing (returns `None`) when the name or calorie text
    /// is empty. The calorie text itself is stored verbatim.
    pub fn add(
        &mut self,
        date: &str,
        name: &str,
        calories: &str,
        meal_type: MealType,
    ) -> Option<&MealEntry> {
        if name.trim().is_empty() || calories.trim().is_empty() {
            tracing::debug!("Ignoring meal with empty name or calories");
            return None;
        }

        let entry = MealEntry::new(name, calories, meal_type);
        tracing::info!("Logged meal {} ({}) on {}", entry.name, entry.id, date);

        let day = self.days.entry(date.to_string()).or_default();
        day.push(entry);
        day.last()
    }

    /// Remove the meal with `id` from `date`; returns whether one was removed
    pub fn remove(&mut self, date: &str, id: &str) -> bool {
        let Some(day) = self.days.get_mut(date) else {
            return false;
        };

        let before = day.len();
        day.retain(|m| m.id != id);
        let removed = day.len() != before;
        if removed {
            tracing::info!("Removed meal {} from {}", id, date);
        }
        removed
    }

    /// Sum of calories logged on `date`
    pub fn total_for_day(&self, date: &str) -> u32 {
        sum_calories(self.entries_for(date).iter())
    }

    /// Sum of calories logged on `date` for one meal type
    pub fn total_for_day_and_type(&self, date: &str, meal_type: &MealType) -> u32 {
        sum_calories(
            self.entries_for(date)
                .iter()
                .filter(|m| &m.meal_type == meal_type),
        )
    }

    /// Calories on `date` whose meal type is not one of the four known buckets
    pub fn total_for_day_other(&self, date: &str) -> u32 {
        sum_calories(
            self.entries_for(date)
                .iter()
                .filter(|m| !m.meal_type.is_known()),
        )
    }
}

fn sum_calories<'a>(entries: impl Iterator<Item = &'a MealEntry>) -> u32 {
    entries.fold(0u32, |acc, m| acc.saturating_add(m.calories()))
}

/// Percent of the goal consumed, clamped to `[0, 100]`
///
/// A goal of 0 has no meaningful progress and reports 0.
pub fn progress_percent(consumed: u32, goal: u32) -> f64 {
    if goal == 0 {
        return 0.0;
    }
    (f64::from(consumed) / f64::from(goal) * 100.0).clamp(0.0, 100.0)
}

/// Calories left before the goal is reached, never negative
pub fn remaining(consumed: u32, goal: u32) -> u32 {
    goal.saturating_sub(consumed)
}

/// One meal-type bucket of the daily breakdown
#[derive(Clone, Debug, PartialEq)]
pub struct MealTypeTotal {
    pub meal_type: MealType,
    pub calories: u32,
}

/// Everything the daily view shows for one date
#[derive(Clone, Debug, PartialEq)]
pub struct DailySummary {
    pub date: String,
    pub consumed: u32,
    pub goal: u32,
    pub remaining: u32,
    pub progress_percent: f64,
    /// Breakfast, lunch, dinner, snack, in that order
    pub by_type: Vec<MealTypeTotal>,
    /// Calories under unrecognized meal types
    pub other: u32,
}

/// Build the daily summary for `date` against `goal`
pub fn daily_summary(meals: &MealLog, date: &str, goal: u32) -> DailySummary {
    let consumed = meals.total_for_day(date);
    let by_type = MealType::KNOWN
        .iter()
        .map(|meal_type| MealTypeTotal {
            meal_type: meal_type.clone(),
            calories: meals.total_for_day_and_type(date, meal_type),
        })
        .collect();

    DailySummary {
        date: date.to_string(),
        consumed,
        goal,
        remaining: remaining(consumed, goal),
        progress_percent: progress_percent(consumed, goal),
        by_type,
        other: meals.total_for_day_other(date),
    }
}
