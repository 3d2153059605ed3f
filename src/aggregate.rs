//! Nutrition aggregation
//!
//! Pure in-memory rollups of log entries into daily summaries and
//! period totals, optionally scored against derived metric goals.
//! Persistence lives in the models; nothing here touches the database.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metrics::DerivedMetrics;
use crate::models::{LogEntry, Nutrition};

/// Aggregated nutrition for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub totals: Nutrition,
    /// min(100, round(total / goal * 100)); None when no goals were
    /// supplied or the calorie goal is zero
    pub calorie_percent_of_goal: Option<u8>,
    pub protein_percent_of_goal: Option<u8>,
}

/// Group entries by calendar date and sum their nutrition
///
/// Day keys come from each entry's stored offset, so callers decide the
/// local-vs-UTC question when they record the timestamp. Output is
/// always sorted ascending by date; presentation layers re-sort for
/// display if they want newest-first.
pub fn aggregate_by_day(entries: &[LogEntry], goals: Option<&DerivedMetrics>) -> Vec<DailySummary> {
    let mut by_day: BTreeMap<NaiveDate, Nutrition> = BTreeMap::new();

    for entry in entries {
        let totals = by_day.entry(entry.date_key()).or_insert_with(Nutrition::zero);
        *totals = totals.add(&entry.nutrition.sanitized());
    }

    by_day
        .into_iter()
        .map(|(date, totals)| {
            let calorie_percent_of_goal = goals
                .and_then(|g| percent_of_goal(totals.calories, g.daily_calories as f64));
            let protein_percent_of_goal = goals
                .and_then(|g| percent_of_goal(totals.protein, g.protein_goal_g as f64));

            DailySummary {
                date,
                totals,
                calorie_percent_of_goal,
                protein_percent_of_goal,
            }
        })
        .collect()
}

/// Sum nutrition across the whole input set
///
/// Used for pie-chart style macro composition views; no goal scoring.
pub fn totals_for_period(entries: &[LogEntry]) -> Nutrition {
    entries.iter().map(|e| e.nutrition.sanitized()).sum()
}

/// Case-insensitive substring filter over entry title and category
///
/// An empty term matches everything. Pure filter, no mutation.
pub fn filter_by_search_term<'a>(entries: &'a [LogEntry], term: &str) -> Vec<&'a LogEntry> {
    let needle = term.to_lowercase();

    entries
        .iter()
        .filter(|e| {
            e.title.to_lowercase().contains(&needle)
                || e.category
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Percentage of goal reached, rounded and capped at 100
///
/// Returns None for a zero or unusable goal instead of dividing by it.
fn percent_of_goal(total: f64, goal: f64) -> Option<u8> {
    if !(goal.is_finite() && goal > 0.0) {
        return None;
    }

    Some((total / goal * 100.0).round().min(100.0).max(0.0) as u8)
}
