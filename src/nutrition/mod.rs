//! Nutrition calculation module
//!
//! Target calculation, profile parsing, and daily progress.

pub mod calculator;
pub mod error;
pub mod profile;
pub mod progress;

pub use calculator::{
    build_nutrition_plan, compute_bmr, compute_bmr_with, compute_macro_grams,
    compute_target_calories, compute_tdee, estimate_daily_calorie_goal, get_macro_distribution,
    macro_distribution_for, plan, split_calories_per_meal, MacroGrams, NutritionPlan,
    NutritionTargets,
};
pub use error::{CalcError, CalcResult};
pub use profile::{
    ActivityLevel, AgePolicy, BmrFormula, DietType, Goal, MacroPercentages, Sex, UserBiometrics,
};
pub use progress::{
    summarize_meals, weekly_water, DailyProgress, DailySummary, DayAmount, GoalProgress, MealIntake,
};
