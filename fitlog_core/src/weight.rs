//! Weight trend tracking.
//!
//! The log holds at most one entry per date, sorted ascending. Progress
//! toward the goal weight is measured from the first logged entry.

use crate::{parse, WeightEntry, WeightLog};
use chrono::NaiveDate;

/// Default number of recent entries shown in the trend view
pub const DEFAULT_CHART_POINTS: usize = 14;

impl WeightLog {
    /// Build a log from arbitrary entries, enforcing one-per-date and order
    ///
    /// Later entries win on duplicate dates.
    pub fn from_entries(entries: impl IntoIterator<Item = WeightEntry>) -> Self {
        let mut log = Self::default();
        for entry in entries {
            log.add_entry(entry.date, entry.weight);
        }
        log
    }

    /// Insert or replace the entry for `date` and keep the log sorted
    pub fn add_entry(&mut self, date: NaiveDate, weight: f64) {
        self.entries.retain(|e| e.date != date);
        self.entries.push(WeightEntry { date, weight });
        self.entries.sort_by_key(|e| e.date);
        tracing::debug!("Recorded weight {} kg on {}", weight, date);
    }

    /// Parse `text` and record it for `date`
    ///
    /// Missing, non-numeric or non-positive text is ignored and `false`
    /// is returned; nothing is recorded.
    pub fn log_weight(&mut self, date: NaiveDate, text: &str) -> bool {
        match parse::parse_positive_real(text) {
            Some(weight) => {
                self.add_entry(date, weight);
                true
            }
            None => {
                tracing::debug!("Ignoring weight input {:?}", text);
                false
            }
        }
    }

    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent weight, or 0 when nothing is logged
    pub fn current_weight(&self) -> f64 {
        self.entries.last().map(|e| e.weight).unwrap_or(0.0)
    }

    /// First logged weight; equals the current weight for a single entry
    /// and 0 for an empty log
    pub fn start_weight(&self) -> f64 {
        self.entries
            .first()
            .map(|e| e.weight)
            .unwrap_or_else(|| self.current_weight())
    }

    pub fn total_change(&self) -> f64 {
        self.current_weight() - self.start_weight()
    }

    /// The most recent `limit` entries, oldest first
    ///
    /// Drawing a trend line needs at least two points; callers check that.
    pub fn chart_series(&self, limit: usize) -> &[WeightEntry] {
        let start = self.entries.len().saturating_sub(limit);
        &self.entries[start..]
    }
}

/// Percent of the distance from start to goal already covered, in `[0, 100]`
///
/// When the goal equals the starting weight there is no direction of
/// progress and the result is 0.
pub fn progress_to_goal(start: f64, current: f64, goal: f64) -> f64 {
    if goal == start {
        return 0.0;
    }
    let progress = (start - current).abs() / (start - goal).abs() * 100.0;
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, 100.0)
}

/// Chart label for a weight entry (`Jan 5`)
pub fn chart_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Everything the progress view shows about body weight
#[derive(Clone, Debug, PartialEq)]
pub struct WeightProgress {
    pub start: f64,
    pub current: f64,
    pub goal: f64,
    pub change: f64,
    pub progress_percent: f64,
    pub entries: usize,
}

/// Summarize the log against `goal`
pub fn weight_progress(log: &WeightLog, goal: f64) -> WeightProgress {
    let start = log.start_weight();
    let current = log.current_weight();

    WeightProgress {
        start,
        current,
        goal,
        change: current - start,
        progress_percent: progress_to_goal(start, current, goal),
        entries: log.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_date_replaces_entry() {
        let mut log = WeightLog::default();
        log.add_entry(date(2024, 1, 1), 80.0);
        log.add_entry(date(2024, 1, 1), 79.4);

        assert_eq!(log.len(), 1);
        assert_eq!(log.current_weight(), 79.4);
    }

    #[test]
    fn test_entries_stay_sorted() {
        let mut log = WeightLog::default();
        log.add_entry(date(2024, 1, 3), 79.0);
        log.add_entry(date(2024, 1, 1), 80.0);
        log.add_entry(date(2024, 1, 2), 79.5);
        log.add_entry(date(2024, 1, 1), 80.2);

        let dates: Vec<_> = log.entries().iter().map(|e| e.date).collect();
        assert_eq!(dates, [date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
        assert_eq!(log.start_weight(), 80.2);
        assert_eq!(log.current_weight(), 79.0);
        assert!((log.total_change() - (-1.2)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_and_single_entry() {
        let mut log = WeightLog::default();
        assert_eq!(log.current_weight(), 0.0);
        assert_eq!(log.start_weight(), 0.0);
        assert_eq!(log.total_change(), 0.0);

        log.add_entry(date(2024, 1, 1), 75.0);
        assert_eq!(log.start_weight(), 75.0);
        assert_eq!(log.current_weight(), 75.0);
        assert_eq!(log.total_change(), 0.0);
    }

    #[test]
    fn test_log_weight_ignores_bad_input() {
        let mut log = WeightLog::default();
        assert!(!log.log_weight(date(2024, 1, 1), ""));
        assert!(!log.log_weight(date(2024, 1, 1), "heavy"));
        assert!(!log.log_weight(date(2024, 1, 1), "-70"));
        assert!(log.is_empty());

        assert!(log.log_weight(date(2024, 1, 1), "72.5kg"));
        assert_eq!(log.current_weight(), 72.5);
    }

    #[test]
    fn test_from_entries_dedupes() {
        let log = WeightLog::from_entries(vec![
            WeightEntry { date: date(2024, 1, 2), weight: 79.0 },
            WeightEntry { date: date(2024, 1, 1), weight: 80.0 },
            WeightEntry { date: date(2024, 1, 2), weight: 78.8 },
        ]);
        assert_eq!(log.len(), 2);
        assert_eq!(log.current_weight(), 78.8);
    }

    #[test]
    fn test_progress_to_goal() {
        assert_eq!(progress_to_goal(80.0, 75.0, 80.0), 0.0);
        assert_eq!(progress_to_goal(80.0, 75.0, 70.0), 50.0);
        assert_eq!(progress_to_goal(80.0, 65.0, 70.0), 100.0);
        // Moving away from the goal still counts as distance covered.
        assert_eq!(progress_to_goal(80.0, 85.0, 70.0), 50.0);
        // Gaining toward a higher goal.
        assert_eq!(progress_to_goal(60.0, 63.0, 66.0), 50.0);
    }

    #[test]
    fn test_chart_series() {
        let mut log = WeightLog::default();
        for day in 1..=20 {
            log.add_entry(date(2024, 1, day), 80.0 - f64::from(day) * 0.1);
        }

        let series = log.chart_series(DEFAULT_CHART_POINTS);
        assert_eq!(series.len(), 14);
        assert_eq!(series.first().unwrap().date, date(2024, 1, 7));
        assert_eq!(series.last().unwrap().date, date(2024, 1, 20));

        assert_eq!(log.chart_series(100).len(), 20);
        assert!(log.chart_series(0).is_empty());
    }

    #[test]
    fn test_chart_label() {
        assert_eq!(chart_label(date(2024, 1, 5)), "Jan 5");
        assert_eq!(chart_label(date(2024, 11, 23)), "Nov 23");
    }

    #[test]
    fn test_weight_progress_summary() {
        let mut log = WeightLog::default();
        log.add_entry(date(2024, 1, 1), 90.0);
        log.add_entry(date(2024, 2, 1), 85.0);

        let progress = weight_progress(&log, 80.0);
        assert_eq!(progress.start, 90.0);
        assert_eq!(progress.current, 85.0);
        assert_eq!(progress.change, -5.0);
        assert_eq!(progress.progress_percent, 50.0);
        assert_eq!(progress.entries, 2);
    }

    proptest! {
        #[test]
        fn prop_progress_is_bounded(
            start in 0.0f64..300.0,
            current in 0.0f64..300.0,
            goal in 0.0f64..300.0,
        ) {
            let p = progress_to_goal(start, current, goal);
            prop_assert!((0.0..=100.0).contains(&p));
        }

        #[test]
        fn prop_same_date_resubmission_keeps_one_entry(
            first in 30.0f64..200.0,
            second in 30.0f64..200.0,
        ) {
            let mut log = WeightLog::default();
            let day = date(2024, 6, 1);
            log.add_entry(day, first);
            log.add_entry(day, second);
            prop_assert_eq!(log.len(), 1);
            prop_assert_eq!(log.current_weight(), second);
        }
    }
}
