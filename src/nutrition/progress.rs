//! Daily progress against goals
//!
//! Aggregates logged meals for a day and measures calories, water, and steps
//! against their goals, and lays out the trailing week of water intake.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calorie goal used when the user has none
pub const DEFAULT_CALORIE_GOAL: f64 = 2000.0;
/// Water goal in milliliters
pub const DEFAULT_WATER_GOAL_ML: f64 = 2500.0;
pub const DEFAULT_STEP_GOAL: f64 = 10000.0;
/// Milliliters per glass of water
pub const ML_PER_GLASS: f64 = 250.0;
/// Days covered by the weekly water series
pub const WEEK_DAYS: u64 = 7;

/// One logged meal's nutrition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealIntake {
    pub name: String,
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

/// Totals for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub meal_count: usize,
}

/// Sum meal nutrition for a day
pub fn summarize_meals(date: NaiveDate, meals: &[MealIntake]) -> DailySummary {
    DailySummary {
        date,
        total_calories: meals.iter().map(|m| m.calories).sum(),
        total_protein: meals.iter().map(|m| m.protein).sum(),
        total_carbs: meals.iter().map(|m| m.carbs).sum(),
        total_fat: meals.iter().map(|m| m.fat).sum(),
        meal_count: meals.len(),
    }
}

/// Progress toward a single goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub current: f64,
    pub goal: f64,
    /// 0-100, capped at 100 once the goal is met
    pub percentage: f64,
    /// Never negative
    pub remaining: f64,
}

impl GoalProgress {
    pub fn new(current: f64, goal: f64) -> Self {
        let percentage = if goal > 0.0 {
            (current / goal * 100.0).min(100.0)
        } else {
            0.0
        };

        Self {
            current,
            goal,
            percentage,
            remaining: (goal - current).max(0.0),
        }
    }

    pub fn is_met(&self) -> bool {
        self.goal > 0.0 && self.current >= self.goal
    }
}

/// Whole glasses of water in `ml`
pub fn water_glasses(ml: f64) -> u32 {
    (ml.max(0.0) / ML_PER_GLASS).floor() as u32
}

/// Glasses needed to reach a water goal
pub fn glasses_for_goal(goal_ml: f64) -> u32 {
    (goal_ml.max(0.0) / ML_PER_GLASS).ceil() as u32
}

/// Calorie, water, and step progress for one day
#[derive(Debug, Clone, Serialize)]
pub struct DailyProgress {
    pub summary: DailySummary,
    pub calories: GoalProgress,
    pub water: GoalProgress,
    pub water_glasses: u32,
    pub water_glasses_goal: u32,
    pub steps: GoalProgress,
}

impl DailyProgress {
    /// Build from the day's meals and activity; missing goals use the defaults
    pub fn compute(
        date: NaiveDate,
        meals: &[MealIntake],
        water_ml: f64,
        steps: f64,
        calorie_goal: Option<f64>,
        water_goal_ml: Option<f64>,
        step_goal: Option<f64>,
    ) -> Self {
        let summary = summarize_meals(date, meals);
        let water_goal = water_goal_ml.unwrap_or(DEFAULT_WATER_GOAL_ML);

        Self {
            calories: GoalProgress::new(
                summary.total_calories,
                calorie_goal.unwrap_or(DEFAULT_CALORIE_GOAL),
            ),
            water: GoalProgress::new(water_ml, water_goal),
            water_glasses: water_glasses(water_ml),
            water_glasses_goal: glasses_for_goal(water_goal),
            steps: GoalProgress::new(steps, step_goal.unwrap_or(DEFAULT_STEP_GOAL)),
            summary,
        }
    }
}

/// Water logged on one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayAmount {
    pub date: NaiveDate,
    pub amount_ml: f64,
}

/// Water per day for the week ending on `end`, oldest first
///
/// Days without a log read 0. Several logs on the same day are added up;
/// logs outside the week are ignored.
pub fn weekly_water(end: NaiveDate, logs: &[(NaiveDate, f64)]) -> Vec<DayAmount> {
    (0..WEEK_DAYS)
        .rev()
        .filter_map(|back| end.checked_sub_days(Days::new(back)))
        .map(|date| DayAmount {
            date,
            amount_ml: logs
                .iter()
                .filter(|(day, _)| *day == date)
                .map(|(_, ml)| ml)
                .sum(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn meal(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64) -> MealIntake {
        MealIntake { name: name.to_string(), calories, protein, carbs, fat }
    }

    #[test]
    fn test_summarize_meals() {
        let meals = vec![
            meal("Oats", 350.0, 12.0, 60.0, 6.0),
            meal("Chicken salad", 520.5, 45.0, 20.0, 28.5),
        ];
        let summary = summarize_meals(day("2026-10-19"), &meals);
        assert_eq!(summary.meal_count, 2);
        assert!((summary.total_calories - 870.5).abs() < 0.001);
        assert!((summary.total_protein - 57.0).abs() < 0.001);
        assert!((summary.total_fat - 34.5).abs() < 0.001);
    }

    #[test]
    fn test_summarize_empty_day() {
        let summary = summarize_meals(day("2026-10-19"), &[]);
        assert_eq!(summary.meal_count, 0);
        assert_eq!(summary.total_calories, 0.0);
    }

    #[test]
    fn test_goal_progress_caps_and_floors() {
        let under = GoalProgress::new(500.0, 2000.0);
        assert!((under.percentage - 25.0).abs() < 0.001);
        assert!((under.remaining - 1500.0).abs() < 0.001);
        assert!(!under.is_met());

        let over = GoalProgress::new(2600.0, 2000.0);
        assert_eq!(over.percentage, 100.0);
        assert_eq!(over.remaining, 0.0);
        assert!(over.is_met());
    }

    #[test]
    fn test_goal_progress_zero_goal() {
        let progress = GoalProgress::new(300.0, 0.0);
        assert_eq!(progress.percentage, 0.0);
        assert_eq!(progress.remaining, 0.0);
        assert!(!progress.is_met());
    }

    #[test]
    fn test_water_glasses() {
        assert_eq!(water_glasses(0.0), 0);
        assert_eq!(water_glasses(749.0), 2);
        assert_eq!(water_glasses(750.0), 3);
        assert_eq!(glasses_for_goal(2500.0), 10);
        assert_eq!(glasses_for_goal(2600.0), 11);
    }

    #[test]
    fn test_daily_progress_defaults() {
        let meals = vec![meal("Lunch", 1000.0, 40.0, 100.0, 30.0)];
        let progress = DailyProgress::compute(day("2026-10-19"), &meals, 1000.0, 4000.0, None, None, None);
        assert!((progress.calories.percentage - 50.0).abs() < 0.001);
        assert!((progress.water.percentage - 40.0).abs() < 0.001);
        assert!((progress.steps.remaining - 6000.0).abs() < 0.001);
        assert_eq!(progress.water_glasses, 4);
        assert_eq!(progress.water_glasses_goal, 10);
    }

    #[test]
    fn test_daily_progress_custom_goals() {
        let progress = DailyProgress::compute(day("2026-10-19"), &[], 0.0, 0.0, Some(1800.0), Some(3000.0), Some(8000.0));
        assert_eq!(progress.calories.goal, 1800.0);
        assert_eq!(progress.water.goal, 3000.0);
        assert_eq!(progress.steps.goal, 8000.0);
        assert_eq!(progress.water_glasses_goal, 12);
    }

    #[test]
    fn test_daily_summary_serializes_iso_date() {
        let summary = summarize_meals(day("2026-03-07"), &[]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["date"], "2026-03-07");
    }

    #[test]
    fn test_weekly_water_oldest_first_with_gaps() {
        let logs = vec![(day("2026-10-19"), 1500.0), (day("2026-10-15"), 750.0)];
        let week = weekly_water(day("2026-10-19"), &logs);

        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, day("2026-10-13"));
        assert_eq!(week[6].date, day("2026-10-19"));
        assert!(week.windows(2).all(|w| w[0].date < w[1].date));

        let amounts: Vec<f64> = week.iter().map(|d| d.amount_ml).collect();
        assert_eq!(amounts, vec![0.0, 0.0, 750.0, 0.0, 0.0, 0.0, 1500.0]);
    }

    #[test]
    fn test_weekly_water_sums_same_day_and_ignores_outside() {
        let logs = vec![
            (day("2026-03-01"), 250.0),
            (day("2026-03-01"), 500.0),
            (day("2026-02-22"), 900.0),
            (day("2026-03-02"), 400.0),
        ];
        // Crosses the February month boundary
        let week = weekly_water(day("2026-03-01"), &logs);

        assert_eq!(week[0].date, day("2026-02-23"));
        assert_eq!(week[6].amount_ml, 750.0);
        assert_eq!(week.iter().map(|d| d.amount_ml).sum::<f64>(), 750.0);
    }

    #[test]
    fn test_weekly_water_empty_logs() {
        let week = weekly_water(day("2026-01-03"), &[]);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, day("2025-12-28"));
        assert!(week.iter().all(|d| d.amount_ml == 0.0));
    }
}
