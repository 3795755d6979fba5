//! Recurring weekly workout template.
//!
//! Workouts are bucketed by weekday *name* rather than date. Logging a
//! workout on "Monday" adds it to every Monday; there is no week
//! disambiguation.

use crate::{new_id, WorkoutEntry, WorkoutPlan};
use chrono::Weekday;

/// Weekdays in template order
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English weekday name used as the template key
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a weekday from its full name or three-letter abbreviation, any case
pub fn parse_weekday(text: &str) -> Option<Weekday> {
    let text = text.trim();
    WEEK.into_iter().find(|day| {
        let name = weekday_name(*day);
        name.eq_ignore_ascii_case(text) || name[..3].eq_ignore_ascii_case(text)
    })
}

/// Raw fields for a new workout, as typed
#[derive(Clone, Debug, Default)]
pub struct NewWorkout {
    pub name: String,
    pub sets: String,
    pub reps: String,
    pub duration_minutes: String,
    pub calories: String,
}

impl WorkoutPlan {
    /// Template with an empty bucket for every weekday
    pub fn with_empty_week() -> Self {
        let mut plan = Self::default();
        for day in WEEK {
            plan.days.insert(weekday_name(day).to_string(), Vec::new());
        }
        plan
    }

    /// Entries for a weekday, empty if the bucket is missing
    pub fn entries_for(&self, day: Weekday) -> &[WorkoutEntry] {
        self.days
            .get(weekday_name(day))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Add a workout to a weekday bucket
    ///
    /// Does nothing (returns `None`) when the name is empty.
    pub fn add(&mut self, day: Weekday, workout: NewWorkout) -> Option<&WorkoutEntry> {
        if workout.name.trim().is_empty() {
            tracing::debug!("Ignoring workout with empty name");
            return None;
        }

        let entry = WorkoutEntry {
            id: new_id(),
            name: workout.name,
            sets: workout.sets,
            reps: workout.reps,
            duration_minutes: workout.duration_minutes,
            calories_text: workout.calories,
        };
        tracing::info!(
            "Added workout {} ({}) to {}",
            entry.name,
            entry.id,
            weekday_name(day)
        );

        let bucket = self.days.entry(weekday_name(day).to_string()).or_default();
        bucket.push(entry);
        bucket.last()
    }

    /// Remove the workout with `id` from a weekday; returns whether one was removed
    pub fn remove(&mut self, day: Weekday, id: &str) -> bool {
        let Some(bucket) = self.days.get_mut(weekday_name(day)) else {
            return false;
        };

        let before = bucket.len();
        bucket.retain(|w| w.id != id);
        let removed = bucket.len() != before;
        if removed {
            tracing::info!("Removed workout {} from {}", id, weekday_name(day));
        }
        removed
    }

    /// Calories burned by the template for one weekday
    pub fn total_for_weekday(&self, day: Weekday) -> u32 {
        self.entries_for(day)
            .iter()
            .fold(0u32, |acc, w| acc.saturating_add(w.calories()))
    }

    /// Calories burned across the whole weekly template
    pub fn weekly_calories(&self) -> u32 {
        WEEK.into_iter()
            .fold(0u32, |acc, day| acc.saturating_add(self.total_for_weekday(day)))
    }

    /// Number of workouts in the weekly template
    pub fn weekly_workout_count(&self) -> usize {
        WEEK.into_iter().map(|day| self.entries_for(day).len()).sum()
    }
}
