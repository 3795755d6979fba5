//! The tracker: process-wide log state over an injected key-value store.
//!
//! State is loaded once when the tracker is opened and written back
//! synchronously after every mutating call. Derived metrics are computed on
//! demand from the in-memory records; nothing derived is cached.

use crate::energy::{self, EnergyNeeds};
use crate::intake::{self, date_key, DailySummary};
use crate::store::{self, keys, KeyValueStore};
use crate::weekly::{self, WeeklyBalance};
use crate::weight::{self, WeightProgress};
use crate::workouts::NewWorkout;
use crate::{
    parse, Goals, MealEntry, MealLog, MealType, ProfileSnapshot, Result, WeightLog,
    WorkoutEntry, WorkoutPlan, DEFAULT_DAILY_CALORIE_GOAL, DEFAULT_GOAL_WEIGHT,
};
use chrono::{NaiveDate, Weekday};

/// Log state bound to its backing store
pub struct Tracker<S: KeyValueStore> {
    store: S,
    profile: ProfileSnapshot,
    meals: MealLog,
    workouts: WorkoutPlan,
    weights: WeightLog,
    goals: Goals,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Load every record from `store`
    ///
    /// Missing keys take their defaults; corrupt values are logged and also
    /// take their defaults.
    pub fn open(backing: S) -> Result<Self> {
        let profile: ProfileSnapshot = store::load_json(&backing, keys::PROFILE)?;
        let meals: MealLog = store::load_json(&backing, keys::MEALS)?;

        let mut workouts: WorkoutPlan = store::load_json(&backing, keys::WORKOUTS)?;
        if workouts.days.is_empty() {
            workouts = WorkoutPlan::with_empty_week();
        }

        // Re-establish one-per-date ordering in case the stored list was
        // written by something else.
        let stored_weights: WeightLog = store::load_json(&backing, keys::WEIGHT_ENTRIES)?;
        let weights = WeightLog::from_entries(stored_weights.entries().iter().cloned());

        let goals = Goals {
            daily_calorie_goal: backing
                .get(keys::DAILY_CALORIE_GOAL)?
                .map(|text| stored_daily_goal(&text))
                .unwrap_or(DEFAULT_DAILY_CALORIE_GOAL),
            goal_weight: backing
                .get(keys::GOAL_WEIGHT)?
                .and_then(|text| parse::parse_real(&text))
                .unwrap_or(DEFAULT_GOAL_WEIGHT),
        };

        tracing::debug!(
            "Opened tracker: {} meal days, {} workouts, {} weight entries",
            meals.days.len(),
            workouts.weekly_workout_count(),
            weights.len()
        );

        Ok(Self {
            store: backing,
            profile,
            meals,
            workouts,
            weights,
            goals,
        })
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn profile(&self) -> &ProfileSnapshot {
        &self.profile
    }

    pub fn meals(&self) -> &MealLog {
        &self.meals
    }

    pub fn workouts(&self) -> &WorkoutPlan {
        &self.workouts
    }

    pub fn weights(&self) -> &WeightLog {
        &self.weights
    }

    pub fn goals(&self) -> Goals {
        self.goals
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Compute BMR/TDEE from the form and persist the snapshot with results
    ///
    /// Returns `Ok(None)` and writes nothing when the form does not validate.
    pub fn calculate_energy(&mut self, form: ProfileSnapshot) -> Result<Option<EnergyNeeds>> {
        let Some(needs) = energy::calculate(&form) else {
            tracing::debug!("Profile incomplete, energy needs unavailable");
            return Ok(None);
        };

        self.profile = ProfileSnapshot {
            bmr: needs.bmr,
            tdee: needs.tdee,
            ..form
        };
        store::save_json(&mut self.store, keys::PROFILE, &self.profile)?;
        tracing::info!("Saved energy needs: BMR {} TDEE {}", needs.bmr, needs.tdee);
        Ok(Some(needs))
    }

    /// Log a meal on `date`; `Ok(None)` if name or calories are empty
    pub fn log_meal(
        &mut self,
        date: NaiveDate,
        name: &str,
        calories: &str,
        meal_type: MealType,
    ) -> Result<Option<MealEntry>> {
        let added = self
            .meals
            .add(&date_key(date), name, calories, meal_type)
            .cloned();
        if added.is_some() {
            self.save_meals()?;
        }
        Ok(added)
    }

    /// Remove a meal from `date`; returns whether anything was removed
    pub fn remove_meal(&mut self, date: NaiveDate, id: &str) -> Result<bool> {
        let removed = self.meals.remove(&date_key(date), id);
        if removed {
            self.save_meals()?;
        }
        Ok(removed)
    }

    /// Add a workout to a weekday of the template; `Ok(None)` if unnamed
    pub fn log_workout(
        &mut self,
        day: Weekday,
        workout: NewWorkout,
    ) -> Result<Option<WorkoutEntry>> {
        let added = self.workouts.add(day, workout).cloned();
        if added.is_some() {
            self.save_workouts()?;
        }
        Ok(added)
    }

    pub fn remove_workout(&mut self, day: Weekday, id: &str) -> Result<bool> {
        let removed = self.workouts.remove(day, id);
        if removed {
            self.save_workouts()?;
        }
        Ok(removed)
    }

    /// Record the weight typed for `date`; `Ok(false)` if the text is unusable
    pub fn log_weight(&mut self, date: NaiveDate, text: &str) -> Result<bool> {
        if !self.weights.log_weight(date, text) {
            return Ok(false);
        }
        store::save_json(&mut self.store, keys::WEIGHT_ENTRIES, &self.weights)?;
        tracing::info!("Logged weight for {}", date);
        Ok(true)
    }

    /// Update the daily calorie goal from text
    ///
    /// Unusable or non-positive text falls back to the default of 2000.
    pub fn set_daily_calorie_goal(&mut self, text: &str) -> Result<u32> {
        let goal = parse::parse_positive_int(text).unwrap_or(DEFAULT_DAILY_CALORIE_GOAL);
        self.goals.daily_calorie_goal = goal;
        self.store.set(keys::DAILY_CALORIE_GOAL, &goal.to_string())?;
        tracing::info!("Daily calorie goal set to {}", goal);
        Ok(goal)
    }

    /// Update the goal weight from text
    ///
    /// Unusable or non-positive text falls back to the default of 70 kg.
    pub fn set_goal_weight(&mut self, text: &str) -> Result<f64> {
        let goal = parse::parse_positive_real(text).unwrap_or(DEFAULT_GOAL_WEIGHT);
        self.goals.goal_weight = goal;
        self.store.set(keys::GOAL_WEIGHT, &goal.to_string())?;
        tracing::info!("Goal weight set to {} kg", goal);
        Ok(goal)
    }

    fn save_meals(&mut self) -> Result<()> {
        store::save_json(&mut self.store, keys::MEALS, &self.meals)
    }

    fn save_workouts(&mut self) -> Result<()> {
        store::save_json(&mut self.store, keys::WORKOUTS, &self.workouts)
    }

    // ------------------------------------------------------------------
    // Derived metrics
    // ------------------------------------------------------------------

    /// Last successful energy calculation, if any
    pub fn energy_needs(&self) -> Option<EnergyNeeds> {
        (self.profile.bmr > 0).then_some(EnergyNeeds {
            bmr: self.profile.bmr,
            tdee: self.profile.tdee,
        })
    }

    pub fn daily_summary(&self, date: NaiveDate) -> DailySummary {
        intake::daily_summary(&self.meals, &date_key(date), self.goals.daily_calorie_goal)
    }

    pub fn weekly_balance(&self, today: NaiveDate) -> WeeklyBalance {
        weekly::weekly_balance(&self.meals, &self.workouts, today)
    }

    pub fn weight_progress(&self) -> WeightProgress {
        weight::weight_progress(&self.weights, self.goals.goal_weight)
    }
}

/// Stored goals are read without the default-on-zero rule, so a stored 0
/// stays 0 and progress reports as non-advancing.
fn stored_daily_goal(text: &str) -> u32 {
    match parse::parse_int(text) {
        Some(v) if v >= 0 => u32::try_from(v).unwrap_or(u32::MAX),
        _ => DEFAULT_DAILY_CALORIE_GOAL,
    }
}
