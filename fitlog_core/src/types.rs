//! Core domain types for the fitlog system.
//!
//! This module defines the records that are persisted in the key-value store:
//! - Body profile snapshot and activity levels
//! - Meal and workout entries with their raw, as-typed numeric text
//! - Weight entries and goals
//!
//! Numeric fields typed by the user are kept as text and parsed on read
//! (see [`crate::parse`]), so a stored `"abc"` survives a round trip and
//! simply counts as zero.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::parse;

// ============================================================================
// Profile Types
// ============================================================================

/// Gender selector for the BMR formula
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Anything other than `male` selects the female formula.
    pub fn from_key(key: &str) -> Self {
        if key.trim().eq_ignore_ascii_case("male") {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Activity level with its TDEE multiplier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    Extreme,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::Extreme,
    ];

    /// Look up a level by its stored key; `None` if unrecognized
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.key().eq_ignore_ascii_case(key))
    }

    /// Look up a level, falling back to [`ActivityLevel::Moderate`]
    pub fn from_key_or_default(key: &str) -> Self {
        Self::from_key(key).unwrap_or_else(|| {
            tracing::debug!("Unknown activity level {:?}, using moderate", key);
            Self::default()
        })
    }

    pub fn key(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::Extreme => "extreme",
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::Extreme => 1.9,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary (little or no exercise)",
            ActivityLevel::Light => "Lightly active (1-3 days/week)",
            ActivityLevel::Moderate => "Moderately active (3-5 days/week)",
            ActivityLevel::Active => "Very active (6-7 days/week)",
            ActivityLevel::Extreme => "Extra active (very hard exercise)",
        }
    }
}

/// A validated body profile ready for the energy calculator
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub age: u32,
    pub gender: Gender,
    /// Centimeters
    pub height: f64,
    /// Kilograms
    pub weight: f64,
    pub activity_level: ActivityLevel,
}

/// The persisted profile form: raw field text plus the last computed result
///
/// `bmr` and `tdee` stay at 0 until a calculation succeeds.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    #[serde(default)]
    pub age: String,
    #[serde(default = "default_gender_key")]
    pub gender: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default = "default_activity_key")]
    pub activity_level: String,
    #[serde(default)]
    pub bmr: i64,
    #[serde(default)]
    pub tdee: i64,
}

impl Default for ProfileSnapshot {
    fn default() -> Self {
        Self {
            age: String::new(),
            gender: default_gender_key(),
            height: String::new(),
            weight: String::new(),
            activity_level: default_activity_key(),
            bmr: 0,
            tdee: 0,
        }
    }
}

fn default_gender_key() -> String {
    Gender::Male.key().into()
}

fn default_activity_key() -> String {
    ActivityLevel::Moderate.key().into()
}

// ============================================================================
// Meal Types
// ============================================================================

/// Meal-type tag. Unknown tags are kept verbatim and land in a generic bucket.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum MealType {
    #[default]
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Other(String),
}

impl MealType {
    /// The four known buckets in display order
    pub const KNOWN: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn key(&self) -> &str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Other(key) => key,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
            MealType::Other(_) => "Other",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, MealType::Other(_))
    }
}

impl From<String> for MealType {
    fn from(key: String) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "breakfast" => MealType::Breakfast,
            "lunch" => MealType::Lunch,
            "dinner" => MealType::Dinner,
            "snack" => MealType::Snack,
            _ => MealType::Other(key),
        }
    }
}

impl From<&str> for MealType {
    fn from(key: &str) -> Self {
        MealType::from(key.to_string())
    }
}

impl From<MealType> for String {
    fn from(meal_type: MealType) -> Self {
        meal_type.key().to_string()
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single logged food item
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MealEntry {
    #[serde(default, deserialize_with = "text_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub name: String,
    /// Calories as typed; read through [`MealEntry::calories`]
    #[serde(default, rename = "calories", deserialize_with = "text_or_number")]
    pub calories_text: String,
    #[serde(default, rename = "type", deserialize_with = "meal_type_or_default")]
    pub meal_type: MealType,
}

impl MealEntry {
    pub fn new(name: impl Into<String>, calories: impl Into<String>, meal_type: MealType) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            calories_text: calories.into(),
            meal_type,
        }
    }

    /// Calories with the zero-on-invalid rule applied
    pub fn calories(&self) -> u32 {
        parse::parse_calories(&self.calories_text)
    }
}

/// Meals grouped under ISO calendar-date keys (`YYYY-MM-DD`)
///
/// Decoding is per record: an unreadable entry is dropped with a warning and
/// the rest of the log survives.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct MealLog {
    pub days: BTreeMap<String, Vec<MealEntry>>,
}

impl<'de> Deserialize<'de> for MealLog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(Self {
            days: lenient_days("meal", raw),
        })
    }
}

// ============================================================================
// Workout Types
// ============================================================================

/// A single exercise in the recurring weekly template
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutEntry {
    #[serde(default, deserialize_with = "text_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub name: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub sets: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub reps: String,
    /// Minutes, as typed
    #[serde(default, rename = "duration", deserialize_with = "text_or_number")]
    pub duration_minutes: String,
    #[serde(default, rename = "calories", deserialize_with = "text_or_number")]
    pub calories_text: String,
}

impl WorkoutEntry {
    pub fn calories(&self) -> u32 {
        parse::parse_calories(&self.calories_text)
    }

    pub fn sets(&self) -> Option<u32> {
        parse::parse_positive_int(&self.sets)
    }

    pub fn reps(&self) -> Option<u32> {
        parse::parse_positive_int(&self.reps)
    }

    pub fn duration_minutes(&self) -> Option<u32> {
        parse::parse_positive_int(&self.duration_minutes)
    }
}

/// Workouts grouped under weekday names (`"Monday"` … `"Sunday"`)
///
/// This is a recurring template, not a dated log: there is one bucket per
/// weekday and no notion of which week an entry belongs to.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct WorkoutPlan {
    pub days: BTreeMap<String, Vec<WorkoutEntry>>,
}

impl<'de> Deserialize<'de> for WorkoutPlan {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(Self {
            days: lenient_days("workout", raw),
        })
    }
}

// ============================================================================
// Weight and Goal Types
// ============================================================================

/// A body-weight measurement; at most one per date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightEntry {
    pub date: NaiveDate,
    /// Kilograms; `NaN` when the stored value was null or not a number
    #[serde(deserialize_with = "real_or_nan")]
    pub weight: f64,
}

/// Weight entries kept sorted ascending by date
///
/// Entries without a usable date or weight are dropped on load.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct WeightLog {
    pub(crate) entries: Vec<WeightEntry>,
}

impl<'de> Deserialize<'de> for WeightLog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
        let entries = lenient_records::<WeightEntry>("weight", raw)
            .into_iter()
            .filter(|entry| {
                let usable = entry.weight.is_finite();
                if !usable {
                    tracing::warn!("Skipping weight entry for {} with no weight", entry.date);
                }
                usable
            })
            .collect();
        Ok(Self { entries })
    }
}

/// Singleton goal values
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Goals {
    pub daily_calorie_goal: u32,
    /// Kilograms
    pub goal_weight: f64,
}

pub const DEFAULT_DAILY_CALORIE_GOAL: u32 = 2000;
pub const DEFAULT_GOAL_WEIGHT: f64 = 70.0;

impl Default for Goals {
    fn default() -> Self {
        Self {
            daily_calorie_goal: DEFAULT_DAILY_CALORIE_GOAL,
            goal_weight: DEFAULT_GOAL_WEIGHT,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Fresh unique record id
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Accept either a JSON string or a JSON number for a raw text field
fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn meal_type_or_default<'de, D>(deserializer: D) -> std::result::Result<MealType, D::Error>
where
    D: Deserializer<'de>,
{
    let key = text_or_number(deserializer)?;
    Ok(if key.is_empty() {
        MealType::default()
    } else {
        MealType::from(key)
    })
}

/// Numbers and numeric text become `f64`; anything else becomes `NaN`
fn real_or_nan<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => parse::parse_real(&s).unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

/// Decode each record on its own, dropping the ones that fail
fn lenient_records<T: DeserializeOwned>(kind: &str, raw: Vec<serde_json::Value>) -> Vec<T> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping unreadable {} record: {}", kind, e);
                None
            }
        })
        .collect()
}

fn lenient_days<T: DeserializeOwned>(
    kind: &str,
    raw: BTreeMap<String, serde_json::Value>,
) -> BTreeMap<String, Vec<T>> {
    raw.into_iter()
        .filter_map(|(day, value)| match value {
            serde_json::Value::Array(records) => Some((day, lenient_records(kind, records))),
            other => {
                tracing::warn!("Skipping {} day {}: expected a list, found {}", kind, day, other);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_entry_accepts_numbers_and_missing_fields() {
        let json = r#"[{"calories":"300"},{"calories":120,"type":"lunch"},{"name":"x"}]"#;
        let entries: Vec<MealEntry> = serde_json::from_str(json).unwrap();

        assert_eq!(entries[0].calories(), 300);
        assert_eq!(entries[0].meal_type, MealType::Breakfast);
        assert_eq!(entries[1].calories(), 120);
        assert_eq!(entries[1].meal_type, MealType::Lunch);
        assert_eq!(entries[2].calories(), 0);
    }

    #[test]
    fn test_unknown_meal_type_is_preserved() {
        let json = r#"{"id":"1","name":"tea","calories":"5","type":"brunch"}"#;
        let entry: MealEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.meal_type, MealType::Other("brunch".into()));
        assert!(!entry.meal_type.is_known());

        let back = serde_json::to_string(&entry).unwrap();
        assert!(back.contains(r#""type":"brunch""#));
    }

    #[test]
    fn test_workout_entry_uses_original_field_names() {
        let json = r#"{"id":"9","name":"Row","sets":"3","reps":"12","duration":"20","calories":"150"}"#;
        let entry: WorkoutEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.sets(), Some(3));
        assert_eq!(entry.reps(), Some(12));
        assert_eq!(entry.duration_minutes(), Some(20));
        assert_eq!(entry.calories(), 150);
    }

    #[test]
    fn test_profile_snapshot_camel_case() {
        let snapshot = ProfileSnapshot {
            activity_level: "light".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains(r#""activityLevel":"light""#));

        let partial: ProfileSnapshot = serde_json::from_str(r#"{"age":"30"}"#).unwrap();
        assert_eq!(partial.gender, "male");
        assert_eq!(partial.activity_level, "moderate");
        assert_eq!(partial.bmr, 0);
    }

    #[test]
    fn test_activity_level_lookup() {
        assert_eq!(ActivityLevel::from_key("Extreme"), Some(ActivityLevel::Extreme));
        assert_eq!(ActivityLevel::from_key("couch"), None);
        assert_eq!(
            ActivityLevel::from_key_or_default("couch"),
            ActivityLevel::Moderate
        );
    }

    #[test]
    fn test_gender_fallback() {
        assert_eq!(Gender::from_key("MALE"), Gender::Male);
        assert_eq!(Gender::from_key("female"), Gender::Female);
        assert_eq!(Gender::from_key("other"), Gender::Female);
    }

    #[test]
    fn test_weight_entry_date_format() {
        let entry = WeightEntry {
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            weight: 81.5,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"date":"2024-03-09","weight":81.5}"#);
    }

    #[test]
    fn test_weight_log_drops_only_unusable_entries() {
        let json = r#"[
            {"date":"2024-01-01","weight":90},
            {"date":"2024-01-02","weight":null},
            {"date":"2024-01-03","weight":"abc"},
            {"date":"not a date","weight":80},
            {"date":"2024-01-04","weight":"88.5"}
        ]"#;
        let log: WeightLog = serde_json::from_str(json).unwrap();

        let weights: Vec<f64> = log.entries.iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![90.0, 88.5]);
    }

    #[test]
    fn test_meal_log_tolerates_null_fields() {
        let json = r#"{
            "2024-01-01":[{"id":"a","name":"Toast","calories":"300"}],
            "2024-01-02":[{"id":null,"name":null,"calories":"100","type":null}, 7],
            "2024-01-03":null
        }"#;
        let log: MealLog = serde_json::from_str(json).unwrap();

        assert_eq!(log.days["2024-01-01"][0].calories(), 300);
        let second = &log.days["2024-01-02"];
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].name, "");
        assert_eq!(second[0].meal_type, MealType::Breakfast);
        assert!(!log.days.contains_key("2024-01-03"));
    }

    #[test]
    fn test_workout_plan_keeps_readable_entries() {
        let json = r#"{"Monday":[{"name":null,"calories":"200"},"junk"]}"#;
        let plan: WorkoutPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.days["Monday"].len(), 1);
        assert_eq!(plan.days["Monday"][0].calories(), 200);
    }
}
