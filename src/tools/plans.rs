//! Diet Planning Tools
//!
//! Target calculation and diet plan storage behind the MCP tools.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::models::{DietPlan, DietPlanForm};
use crate::nutrition::{
    estimate_daily_calorie_goal, get_macro_distribution, plan, split_calories_per_meal,
    weekly_water, ActivityLevel, AgePolicy, CalcResult, DailyProgress, DayAmount, DietType, Goal,
    MealIntake, NutritionPlan, Sex, UserBiometrics,
};

/// Profile fields as received from a client, before parsing
#[derive(Debug, Clone, Copy)]
pub struct ProfileInput<'a> {
    pub sex: &'a str,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age: &'a str,
    pub activity_level: &'a str,
}

impl ProfileInput<'_> {
    fn parse(&self, age_policy: AgePolicy) -> CalcResult<(UserBiometrics, ActivityLevel)> {
        let sex: Sex = self.sex.parse()?;
        let activity: ActivityLevel = self.activity_level.parse()?;
        let age = age_policy.parse_age(self.age)?;
        Ok((UserBiometrics::new(sex, self.height_cm, self.weight_kg, age), activity))
    }
}

/// Response for calculate_nutrition_targets
#[derive(Debug, Serialize)]
pub struct CalculateTargetsResponse {
    pub age_used: u32,
    #[serde(flatten)]
    pub plan: NutritionPlan,
}

/// Response for get_macro_distribution
#[derive(Debug, Serialize)]
pub struct MacroDistributionResponse {
    pub diet_type: DietType,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

/// Response for estimate_calorie_goal
#[derive(Debug, Serialize)]
pub struct CalorieGoalResponse {
    pub daily_calorie_goal: i64,
    pub formula: &'static str,
    pub age_used: u32,
}

/// Response for split_meal_calories
#[derive(Debug, Serialize)]
pub struct SplitMealCaloriesResponse {
    pub target_calories: i64,
    pub meals_per_day: u32,
    pub meal_calories: Vec<i64>,
}

/// Plan summary for listing
#[derive(Debug, Serialize)]
pub struct DietPlanSummary {
    pub id: i64,
    pub name: String,
    pub target_calories: Option<i64>,
    pub diet_type: Option<String>,
    pub created_at: String,
}

/// Response for list_diet_plans
#[derive(Debug, Serialize)]
pub struct ListDietPlansResponse {
    pub plans: Vec<DietPlanSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

// ============================================================================
// Calculation Tools
// ============================================================================

/// Compute targets and gram amounts for a profile
pub fn calculate_targets(
    profile: ProfileInput<'_>,
    goal: &str,
    diet_type: &str,
    age_policy: AgePolicy,
) -> Result<CalculateTargetsResponse, String> {
    let (biometrics, activity) = profile.parse(age_policy).map_err(|e| e.to_string())?;
    let goal = goal.parse::<Goal>().map_err(|e| e.to_string())?;
    let diet_type = diet_type.parse::<DietType>().map_err(|e| e.to_string())?;

    let plan = plan(&biometrics, activity, goal, diet_type).map_err(|e| e.to_string())?;

    tracing::debug!(
        target_calories = plan.targets.target_calories_kcal,
        diet = %diet_type,
        "Calculated nutrition targets"
    );

    Ok(CalculateTargetsResponse {
        age_used: biometrics.age,
        plan,
    })
}

/// Look up the macro split for a diet type key
pub fn macro_distribution(diet_type: &str) -> Result<MacroDistributionResponse, String> {
    let diet_type = diet_type.parse::<DietType>().map_err(|e| e.to_string())?;
    let split = get_macro_distribution(diet_type);

    Ok(MacroDistributionResponse {
        diet_type,
        protein: split.protein,
        carbs: split.carbs,
        fat: split.fat,
    })
}

/// Harris-Benedict profile calorie goal
pub fn estimate_calorie_goal(
    profile: ProfileInput<'_>,
    age_policy: AgePolicy,
) -> Result<CalorieGoalResponse, String> {
    let (biometrics, activity) = profile.parse(age_policy).map_err(|e| e.to_string())?;
    let goal = estimate_daily_calorie_goal(&biometrics, activity).map_err(|e| e.to_string())?;

    Ok(CalorieGoalResponse {
        daily_calorie_goal: goal,
        formula: "harris_benedict",
        age_used: biometrics.age,
    })
}

/// Split a calorie target across meals
pub fn split_meal_calories(
    target_calories: i64,
    meals_per_day: u32,
) -> Result<SplitMealCaloriesResponse, String> {
    let meal_calories =
        split_calories_per_meal(target_calories, meals_per_day).map_err(|e| e.to_string())?;

    Ok(SplitMealCaloriesResponse {
        target_calories,
        meals_per_day,
        meal_calories,
    })
}

/// Response for weekly_water
#[derive(Debug, Serialize)]
pub struct WeeklyWaterResponse {
    pub days: Vec<DayAmount>,
    pub total_ml: f64,
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(date: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}' (expected YYYY-MM-DD): {}", date, e))
}

/// Progress of a day's intake and activity against goals
pub fn daily_progress(
    date: &str,
    meals: &[MealIntake],
    water_ml: f64,
    steps: f64,
    calorie_goal: Option<f64>,
    water_goal_ml: Option<f64>,
    step_goal: Option<f64>,
) -> Result<DailyProgress, String> {
    let date = parse_date(date)?;
    Ok(DailyProgress::compute(date, meals, water_ml, steps, calorie_goal, water_goal_ml, step_goal))
}

/// Seven days of water intake ending on `end_date`, oldest first
pub fn weekly_water_series(end_date: &str, logs: &[(String, f64)]) -> Result<WeeklyWaterResponse, String> {
    let end = parse_date(end_date)?;
    let logs = logs
        .iter()
        .map(|(date, ml)| parse_date(date).map(|day| (day, *ml)))
        .collect::<Result<Vec<_>, String>>()?;

    let days = weekly_water(end, &logs);
    let total_ml = days.iter().map(|d| d.amount_ml).sum();
    Ok(WeeklyWaterResponse { days, total_ml })
}

// ============================================================================
// Diet Plan Store Tools
// ============================================================================

/// Validate a form, compute its payload, and store it
pub fn save_diet_plan(
    db: &Database,
    form: &DietPlanForm,
    age_policy: AgePolicy,
) -> Result<DietPlan, String> {
    let payload = form.submit(age_policy).map_err(|e| e.to_string())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let stored = DietPlan::create(&conn, &payload.name, &payload)
        .map_err(|e| format!("Failed to save diet plan: {}", e))?;

    tracing::info!(
        id = stored.id,
        name = %stored.name,
        target_calories = payload.target_calories,
        "Saved diet plan"
    );
    Ok(stored)
}

/// Get a stored diet plan
pub fn get_diet_plan(db: &Database, id: i64) -> Result<Option<DietPlan>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    DietPlan::get_by_id(&conn, id).map_err(|e| format!("Failed to get diet plan: {}", e))
}

/// List stored diet plans, newest first
pub fn list_diet_plans(db: &Database, limit: i64, offset: i64) -> Result<ListDietPlansResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let plans = DietPlan::list(&conn, limit, offset)
        .map_err(|e| format!("Failed to list diet plans: {}", e))?;
    let total = DietPlan::count(&conn).map_err(|e| format!("Failed to count diet plans: {}", e))?;

    let plans = plans
        .into_iter()
        .map(|p| DietPlanSummary {
            target_calories: p.payload.get("targetCalories").and_then(|v| v.as_i64()),
            diet_type: p
                .payload
                .get("dietType")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            id: p.id,
            name: p.name,
            created_at: p.created_at,
        })
        .collect();

    Ok(ListDietPlansResponse {
        plans,
        total,
        limit,
        offset,
    })
}

/// Delete a stored diet plan
pub fn delete_diet_plan(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let deleted =
        DietPlan::delete(&conn, id).map_err(|e| format!("Failed to delete diet plan: {}", e))?;

    if deleted {
        tracing::info!(id, "Deleted diet plan");
    }
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn profile<'a>(age: &'a str) -> ProfileInput<'a> {
        ProfileInput {
            sex: "male",
            height_cm: 170.0,
            weight_kg: 70.0,
            age,
            activity_level: "moderate",
        }
    }

    fn test_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(run_migrations).unwrap();
        db
    }

    fn form(name: &str) -> DietPlanForm {
        DietPlanForm {
            name: name.to_string(),
            sex: Sex::Female,
            height_cm: 160.0,
            weight_kg: 55.0,
            age: "30".to_string(),
            goal: Goal::Maintain,
            activity_level: ActivityLevel::Sedentary,
            diet_type: DietType::Keto,
            restrictions: String::new(),
            meals_per_day: 4,
        }
    }

    #[test]
    fn test_calculate_targets() {
        let response = calculate_targets(profile("25"), "lose", "balanced", AgePolicy::Strict).unwrap();
        assert_eq!(response.age_used, 25);
        assert_eq!(response.plan.targets.target_calories_kcal, 2046);
    }

    #[test]
    fn test_calculate_targets_unknown_keys() {
        let err = calculate_targets(profile("25"), "lose", "paleo", AgePolicy::Strict).unwrap_err();
        assert!(err.contains("Unknown diet type"));

        let err = calculate_targets(profile("25"), "shred", "keto", AgePolicy::Strict).unwrap_err();
        assert!(err.contains("Unknown goal"));
    }

    #[test]
    fn test_calculate_targets_lenient_age() {
        let response = calculate_targets(profile(""), "lose", "balanced", AgePolicy::DefaultTo(25)).unwrap();
        assert_eq!(response.age_used, 25);
        assert!(calculate_targets(profile(""), "lose", "balanced", AgePolicy::Strict).is_err());
    }

    #[test]
    fn test_macro_distribution_tool() {
        let response = macro_distribution("low_carb").unwrap();
        assert_eq!((response.protein, response.carbs, response.fat), (40, 20, 40));
        assert!(macro_distribution("unknown").is_err());
    }

    #[test]
    fn test_estimate_calorie_goal_tool() {
        let response = estimate_calorie_goal(profile("25"), AgePolicy::Strict).unwrap();
        assert_eq!(response.daily_calorie_goal, 2635);
        assert_eq!(response.formula, "harris_benedict");
    }

    #[test]
    fn test_save_list_delete_plans() {
        let db = test_db();

        let first = save_diet_plan(&db, &form("Keto maintain"), AgePolicy::Strict).unwrap();
        save_diet_plan(&db, &form("Second"), AgePolicy::Strict).unwrap();
        assert!(save_diet_plan(&db, &form(" "), AgePolicy::Strict).is_err());

        let listed = list_diet_plans(&db, 50, 0).unwrap();
        assert_eq!(listed.total, 2);
        assert_eq!(listed.plans.len(), 2);
        assert!(listed.plans.iter().all(|p| p.target_calories == Some(1487)));
        assert!(listed.plans.iter().all(|p| p.diet_type.as_deref() == Some("keto")));

        let fetched = get_diet_plan(&db, first.id).unwrap().unwrap();
        assert_eq!(fetched.payload["mealCalories"].as_array().map(|a| a.len()), Some(4));

        assert!(delete_diet_plan(&db, first.id).unwrap());
        assert!(get_diet_plan(&db, first.id).unwrap().is_none());
        assert_eq!(list_diet_plans(&db, 50, 0).unwrap().total, 1);
    }

    #[test]
    fn test_daily_progress_rejects_bad_date() {
        assert!(daily_progress("2026-10-19", &[], 500.0, 0.0, None, None, None).is_ok());

        for bad in ["19/10/2026", "2026-02-30", "today", ""] {
            let err = daily_progress(bad, &[], 0.0, 0.0, None, None, None).unwrap_err();
            assert!(err.contains("Invalid date"), "{}", err);
        }
    }

    #[test]
    fn test_weekly_water_series() {
        let logs = vec![
            ("2026-10-19".to_string(), 1000.0),
            ("2026-10-19".to_string(), 250.0),
            ("2026-10-17".to_string(), 2000.0),
        ];
        let result = weekly_water_series("2026-10-19", &logs).unwrap();
        assert_eq!(result.days.len(), 7);
        assert_eq!(result.days[0].date.to_string(), "2026-10-13");
        assert_eq!(result.days[4].amount_ml, 2000.0);
        assert_eq!(result.days[6].amount_ml, 1250.0);
        assert_eq!(result.total_ml, 3250.0);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["days"][6]["date"], "2026-10-19");

        let bad_log = vec![("yesterday".to_string(), 100.0)];
        assert!(weekly_water_series("2026-10-19", &bad_log).is_err());
    }
}
