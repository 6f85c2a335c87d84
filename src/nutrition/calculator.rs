//! Nutrition target calculator
//!
//! Turns a biometric profile, activity level, goal, and diet preference into
//! daily calorie and macronutrient targets.
//!
//! Pipeline: BMR (Mifflin-St Jeor) -> TDEE (activity multiplier) -> target
//! calories (goal offset) -> macro split (diet table).
//!
//! All user-facing integers are rounded half away from zero (`f64::round`),
//! so 2045.5 kcal becomes 2046 and -0.5 becomes -1.

use serde::{Deserialize, Serialize};

use super::error::{CalcError, CalcResult};
use super::profile::{
    ActivityLevel, BmrFormula, DietType, Goal, MacroPercentages, Sex, UserBiometrics,
};

/// Energy density of protein and carbohydrate (kcal per gram)
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
/// Energy density of fat (kcal per gram)
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Meals-per-day choices accepted for calorie splitting
pub const MIN_MEALS_PER_DAY: u32 = 3;
pub const MAX_MEALS_PER_DAY: u32 = 6;

/// Daily targets derived from a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionTargets {
    pub bmr_kcal: i64,
    pub tdee_kcal: i64,
    pub target_calories_kcal: i64,
    pub macro_percentages: MacroPercentages,
}

/// Daily macronutrient targets in grams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroGrams {
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fat_g: i64,
}

/// Targets plus gram breakdown and the choices that produced them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionPlan {
    #[serde(flatten)]
    pub targets: NutritionTargets,
    pub macro_grams: MacroGrams,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub diet_type: DietType,
}

fn round_kcal(value: f64) -> i64 {
    value.round() as i64
}

/// Like `round_kcal`, but refuses values an `i64` cannot hold instead of saturating
fn checked_kcal(value: f64, what: &str) -> CalcResult<i64> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded.abs() >= i64::MAX as f64 {
        return Err(CalcError::InvalidInput(format!(
            "{} is out of range ({}); check height and weight",
            what, value
        )));
    }
    Ok(rounded as i64)
}

/// Basal metabolic rate using Mifflin-St Jeor
///
/// - male: `10*w + 6.25*h - 5*age + 5`
/// - female: `10*w + 6.25*h - 5*age - 161`
pub fn compute_bmr(biometrics: &UserBiometrics) -> CalcResult<f64> {
    compute_bmr_with(BmrFormula::MifflinStJeor, biometrics)
}

/// Basal metabolic rate using the chosen formula
pub fn compute_bmr_with(formula: BmrFormula, biometrics: &UserBiometrics) -> CalcResult<f64> {
    biometrics.validate()?;

    let w = biometrics.weight_kg;
    let h = biometrics.height_cm;
    let a = f64::from(biometrics.age);

    let bmr = match (formula, biometrics.sex) {
        (BmrFormula::MifflinStJeor, Sex::Male) => 10.0 * w + 6.25 * h - 5.0 * a + 5.0,
        (BmrFormula::MifflinStJeor, Sex::Female) => 10.0 * w + 6.25 * h - 5.0 * a - 161.0,
        (BmrFormula::HarrisBenedict, Sex::Male) => 88.362 + 13.397 * w + 4.799 * h - 5.677 * a,
        (BmrFormula::HarrisBenedict, Sex::Female) => 447.593 + 9.247 * w + 3.098 * h - 4.330 * a,
    };

    tracing::debug!(?formula, sex = %biometrics.sex, bmr, "Computed BMR");
    Ok(bmr)
}

/// Total daily energy expenditure: BMR times the activity multiplier
pub fn compute_tdee(bmr: f64, activity: ActivityLevel) -> f64 {
    bmr * activity.multiplier()
}

/// Goal-adjusted daily calories, rounded half away from zero
pub fn compute_target_calories(tdee: f64, goal: Goal) -> i64 {
    round_kcal(tdee + goal.calorie_offset())
}

/// Macro percentages for a diet type
pub fn get_macro_distribution(diet_type: DietType) -> MacroPercentages {
    diet_type.macro_split()
}

/// Macro percentages for a diet type key such as `"low_carb"`
pub fn macro_distribution_for(key: &str) -> CalcResult<MacroPercentages> {
    key.parse::<DietType>().map(get_macro_distribution)
}

/// Compute the daily targets: BMR, then TDEE, then target calories, then macros
pub fn build_nutrition_plan(
    biometrics: &UserBiometrics,
    activity: ActivityLevel,
    goal: Goal,
    diet_type: DietType,
) -> CalcResult<NutritionTargets> {
    let bmr = compute_bmr(biometrics)?;
    let tdee = compute_tdee(bmr, activity);
    let bmr_kcal = checked_kcal(bmr, "BMR")?;
    let tdee_kcal = checked_kcal(tdee, "TDEE")?;
    checked_kcal(tdee + goal.calorie_offset(), "target calories")?;
    let target_calories_kcal = compute_target_calories(tdee, goal);
    let macro_percentages = get_macro_distribution(diet_type);

    Ok(NutritionTargets {
        bmr_kcal,
        tdee_kcal,
        target_calories_kcal,
        macro_percentages,
    })
}

/// Full plan: targets plus gram amounts
pub fn plan(
    biometrics: &UserBiometrics,
    activity: ActivityLevel,
    goal: Goal,
    diet_type: DietType,
) -> CalcResult<NutritionPlan> {
    let targets = build_nutrition_plan(biometrics, activity, goal, diet_type)?;
    let macro_grams = compute_macro_grams(targets.target_calories_kcal, targets.macro_percentages);

    Ok(NutritionPlan {
        targets,
        macro_grams,
        activity_level: activity,
        goal,
        diet_type,
    })
}

/// Convert a percentage split of `target_calories` into grams
pub fn compute_macro_grams(target_calories: i64, macros: MacroPercentages) -> MacroGrams {
    let kcal = target_calories as f64;
    let grams = |percent: u32, kcal_per_gram: f64| {
        round_kcal(kcal * f64::from(percent) / 100.0 / kcal_per_gram)
    };

    MacroGrams {
        protein_g: grams(macros.protein, KCAL_PER_GRAM_PROTEIN),
        carbs_g: grams(macros.carbs, KCAL_PER_GRAM_CARBS),
        fat_g: grams(macros.fat, KCAL_PER_GRAM_FAT),
    }
}

/// Split daily calories evenly across meals
///
/// Leftover kcal go one each to the earliest meals; the parts always sum to
/// `target_calories`.
pub fn split_calories_per_meal(target_calories: i64, meals_per_day: u32) -> CalcResult<Vec<i64>> {
    if !(MIN_MEALS_PER_DAY..=MAX_MEALS_PER_DAY).contains(&meals_per_day) {
        return Err(CalcError::InvalidInput(format!(
            "meals_per_day must be between {} and {}, got {}",
            MIN_MEALS_PER_DAY, MAX_MEALS_PER_DAY, meals_per_day
        )));
    }

    let meals = i64::from(meals_per_day);
    let base = target_calories.div_euclid(meals);
    let leftover = target_calories.rem_euclid(meals);

    Ok((0..meals).map(|i| if i < leftover { base + 1 } else { base }).collect())
}

/// Profile calorie goal: Harris-Benedict BMR times the activity multiplier, truncated
pub fn estimate_daily_calorie_goal(
    biometrics: &UserBiometrics,
    activity: ActivityLevel,
) -> CalcResult<i64> {
    let bmr = compute_bmr_with(BmrFormula::HarrisBenedict, biometrics)?;
    checked_kcal(compute_tdee(bmr, activity).trunc(), "calorie goal")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn male_170_70_25() -> UserBiometrics {
        UserBiometrics::new(Sex::Male, 170.0, 70.0, 25)
    }

    fn female_160_55_30() -> UserBiometrics {
        UserBiometrics::new(Sex::Female, 160.0, 55.0, 30)
    }

    #[test]
    fn test_bmr_mifflin_formula() {
        for (h, w, a) in [(140.0, 40.0, 18), (170.0, 70.0, 25), (220.0, 150.0, 80), (183.5, 92.3, 47)] {
            let male = compute_bmr(&UserBiometrics::new(Sex::Male, h, w, a)).unwrap();
            let female = compute_bmr(&UserBiometrics::new(Sex::Female, h, w, a)).unwrap();
            let base = 10.0 * w + 6.25 * h - 5.0 * f64::from(a);
            assert_eq!(male, base + 5.0);
            assert_eq!(female, base - 161.0);
        }
    }

    #[test]
    fn test_bmr_rejects_invalid_biometrics() {
        let bad = UserBiometrics::new(Sex::Male, f64::NAN, 70.0, 25);
        assert!(matches!(compute_bmr(&bad), Err(CalcError::InvalidInput(_))));

        let zero_weight = UserBiometrics::new(Sex::Female, 160.0, 0.0, 30);
        assert!(matches!(compute_bmr(&zero_weight), Err(CalcError::InvalidInput(_))));
    }

    #[test]
    fn test_tdee_multipliers() {
        let expected = [
            (ActivityLevel::Sedentary, 1.2),
            (ActivityLevel::Light, 1.375),
            (ActivityLevel::Moderate, 1.55),
            (ActivityLevel::Active, 1.725),
            (ActivityLevel::VeryActive, 1.9),
        ];
        for (level, multiplier) in expected {
            assert_eq!(compute_tdee(1642.5, level), 1642.5 * multiplier);
        }
    }

    #[test]
    fn test_target_calorie_offsets() {
        assert_eq!(compute_target_calories(2000.0, Goal::Lose), 1500);
        assert_eq!(compute_target_calories(2000.0, Goal::Gain), 2500);
        assert_eq!(compute_target_calories(2000.0, Goal::Maintain), 2000);
        assert_eq!(compute_target_calories(2000.0, Goal::Muscle), 2300);
    }

    #[test]
    fn test_target_calories_round_half_away_from_zero() {
        assert_eq!(compute_target_calories(2000.5, Goal::Maintain), 2001);
        assert_eq!(compute_target_calories(1500.5, Goal::Lose), 1001);
        assert_eq!(compute_target_calories(2000.49, Goal::Maintain), 2000);
        assert_eq!(compute_target_calories(-0.5, Goal::Maintain), -1);
    }

    #[test]
    fn test_macro_distribution_table() {
        let m = get_macro_distribution(DietType::HighProtein);
        assert_eq!((m.protein, m.carbs, m.fat), (50, 30, 20));
        let m = get_macro_distribution(DietType::Vegan);
        assert_eq!((m.protein, m.carbs, m.fat), (20, 50, 30));
        for diet in DietType::ALL {
            assert_eq!(get_macro_distribution(diet).total(), 100);
        }
    }

    #[test]
    fn test_macro_distribution_for_unknown_key() {
        assert_eq!(
            macro_distribution_for("carnivore"),
            Err(CalcError::UnknownDietType("carnivore".to_string()))
        );
        assert_eq!(macro_distribution_for("keto").unwrap().fat, 70);
    }

    #[test]
    fn test_scenario_male_moderate_lose_balanced() {
        let bio = male_170_70_25();
        let bmr = compute_bmr(&bio).unwrap();
        assert_eq!(bmr, 1642.5);

        let tdee = compute_tdee(bmr, ActivityLevel::Moderate);
        assert!((tdee - 2545.875).abs() < 0.001);

        let targets =
            build_nutrition_plan(&bio, ActivityLevel::Moderate, Goal::Lose, DietType::Balanced).unwrap();
        assert_eq!(targets.target_calories_kcal, 2046);
        assert_eq!(targets.bmr_kcal, 1643);
        assert_eq!(targets.tdee_kcal, 2546);
        assert_eq!(
            targets.macro_percentages,
            MacroPercentages { protein: 30, carbs: 40, fat: 30 }
        );
    }

    #[test]
    fn test_scenario_female_sedentary_maintain_keto() {
        let bio = female_160_55_30();
        assert_eq!(compute_bmr(&bio).unwrap(), 1239.0);

        let targets =
            build_nutrition_plan(&bio, ActivityLevel::Sedentary, Goal::Maintain, DietType::Keto).unwrap();
        assert_eq!(targets.bmr_kcal, 1239);
        assert_eq!(targets.tdee_kcal, 1487);
        assert_eq!(targets.target_calories_kcal, 1487);
        assert_eq!(
            targets.macro_percentages,
            MacroPercentages { protein: 25, carbs: 5, fat: 70 }
        );
    }

    #[test]
    fn test_build_is_idempotent() {
        let bio = male_170_70_25();
        let first = build_nutrition_plan(&bio, ActivityLevel::Active, Goal::Muscle, DietType::Vegan).unwrap();
        let second = build_nutrition_plan(&bio, ActivityLevel::Active, Goal::Muscle, DietType::Vegan).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_plan_includes_macro_grams() {
        let plan = plan(&male_170_70_25(), ActivityLevel::Moderate, Goal::Lose, DietType::Balanced).unwrap();
        assert_eq!(plan.targets.target_calories_kcal, 2046);
        assert_eq!(plan.macro_grams, MacroGrams { protein_g: 153, carbs_g: 205, fat_g: 68 });
        assert_eq!(plan.diet_type, DietType::Balanced);
    }

    #[test]
    fn test_macro_grams_keto() {
        let grams = compute_macro_grams(1487, DietType::Keto.macro_split());
        assert_eq!(grams, MacroGrams { protein_g: 93, carbs_g: 19, fat_g: 116 });
    }

    #[test]
    fn test_split_calories_even() {
        assert_eq!(split_calories_per_meal(2046, 3).unwrap(), vec![682, 682, 682]);
    }

    #[test]
    fn test_split_calories_distributes_leftover() {
        let parts = split_calories_per_meal(2000, 3).unwrap();
        assert_eq!(parts, vec![667, 667, 666]);

        for meals in MIN_MEALS_PER_DAY..=MAX_MEALS_PER_DAY {
            let parts = split_calories_per_meal(1487, meals).unwrap();
            assert_eq!(parts.len(), meals as usize);
            assert_eq!(parts.iter().sum::<i64>(), 1487);
        }
    }

    #[test]
    fn test_split_calories_rejects_meal_count() {
        assert!(matches!(split_calories_per_meal(2000, 2), Err(CalcError::InvalidInput(_))));
        assert!(matches!(split_calories_per_meal(2000, 7), Err(CalcError::InvalidInput(_))));
    }

    #[test]
    fn test_harris_benedict_calorie_goal() {
        let male = estimate_daily_calorie_goal(&male_170_70_25(), ActivityLevel::Moderate).unwrap();
        assert_eq!(male, 2635);

        let female = estimate_daily_calorie_goal(&female_160_55_30(), ActivityLevel::Sedentary).unwrap();
        assert_eq!(female, 1586);
    }

    #[test]
    fn test_plan_serializes_flat() {
        let plan = plan(&female_160_55_30(), ActivityLevel::Sedentary, Goal::Maintain, DietType::Keto).unwrap();
        let json = serde_json::to_value(plan).unwrap();
        assert_eq!(json["target_calories_kcal"], 1487);
        assert_eq!(json["macro_percentages"]["fat"], 70);
        assert_eq!(json["diet_type"], "keto");
        assert_eq!(json["activity_level"], "sedentary");
    }

    #[test]
    fn test_build_rejects_overflowing_biometrics() {
        // 10 * 1e308 overflows to infinity
        let absurd = UserBiometrics::new(Sex::Male, 1e308, 1e308, 25);
        let result = build_nutrition_plan(&absurd, ActivityLevel::Sedentary, Goal::Maintain, DietType::Balanced);
        assert!(matches!(result, Err(CalcError::InvalidInput(_))));

        // Finite, but larger than any i64
        let huge = UserBiometrics::new(Sex::Female, 170.0, 1e18, 30);
        let result = build_nutrition_plan(&huge, ActivityLevel::Moderate, Goal::Lose, DietType::Keto);
        assert!(matches!(result, Err(CalcError::InvalidInput(_))));

        assert!(matches!(
            estimate_daily_calorie_goal(&huge, ActivityLevel::Moderate),
            Err(CalcError::InvalidInput(_))
        ));
    }
}
