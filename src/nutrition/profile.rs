//! Profile types
//!
//! Biometric input and the enumerations that drive target calculation.
//! Every lookup table is an exhaustive match, so a new variant will not
//! compile until it has a multiplier, offset, or macro split.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{CalcError, CalcResult};

/// Biological sex, selects the BMR constant set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl FromStr for Sex {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(CalcError::UnknownSex(s.to_string())),
        }
    }
}

/// Daily activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Office work, little movement
    Sedentary,
    /// Exercise 1-3 days a week
    Light,
    /// Exercise 3-5 days a week
    Moderate,
    /// Exercise 6-7 days a week
    Active,
    /// Training twice a day
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Office work, little movement",
            ActivityLevel::Light => "Exercise 1-3 days per week",
            ActivityLevel::Moderate => "Exercise 3-5 days per week",
            ActivityLevel::Active => "Exercise 6-7 days per week",
            ActivityLevel::VeryActive => "Exercise twice a day",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very_active" => Ok(ActivityLevel::VeryActive),
            _ => Err(CalcError::UnknownActivityLevel(s.to_string())),
        }
    }
}

/// Weight goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Lose,
    Gain,
    Maintain,
    Muscle,
}

impl Goal {
    pub const ALL: [Goal; 4] = [Goal::Lose, Goal::Gain, Goal::Maintain, Goal::Muscle];

    /// Daily kcal adjustment added to TDEE
    pub fn calorie_offset(&self) -> f64 {
        match self {
            Goal::Lose => -500.0,
            Goal::Gain => 500.0,
            Goal::Maintain => 0.0,
            Goal::Muscle => 300.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Lose => "lose",
            Goal::Gain => "gain",
            Goal::Maintain => "maintain",
            Goal::Muscle => "muscle",
        }
    }
}

impl FromStr for Goal {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "lose" => Ok(Goal::Lose),
            "gain" => Ok(Goal::Gain),
            "maintain" => Ok(Goal::Maintain),
            "muscle" => Ok(Goal::Muscle),
            _ => Err(CalcError::UnknownGoal(s.to_string())),
        }
    }
}

/// Percentages of total calories per macronutrient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroPercentages {
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

impl MacroPercentages {
    pub fn total(&self) -> u32 {
        self.protein + self.carbs + self.fat
    }
}

/// Diet preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietType {
    Balanced,
    LowCarb,
    HighProtein,
    Vegetarian,
    Vegan,
    Keto,
}

impl DietType {
    pub const ALL: [DietType; 6] = [
        DietType::Balanced,
        DietType::LowCarb,
        DietType::HighProtein,
        DietType::Vegetarian,
        DietType::Vegan,
        DietType::Keto,
    ];

    /// Protein/carbs/fat split; each row sums to 100
    pub fn macro_split(&self) -> MacroPercentages {
        let (protein, carbs, fat) = match self {
            DietType::Balanced => (30, 40, 30),
            DietType::LowCarb => (40, 20, 40),
            DietType::HighProtein => (50, 30, 20),
            DietType::Vegetarian => (25, 45, 30),
            DietType::Vegan => (20, 50, 30),
            DietType::Keto => (25, 5, 70),
        };
        MacroPercentages { protein, carbs, fat }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DietType::Balanced => "balanced",
            DietType::LowCarb => "low_carb",
            DietType::HighProtein => "high_protein",
            DietType::Vegetarian => "vegetarian",
            DietType::Vegan => "vegan",
            DietType::Keto => "keto",
        }
    }
}

impl FromStr for DietType {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "balanced" => Ok(DietType::Balanced),
            "low_carb" => Ok(DietType::LowCarb),
            "high_protein" => Ok(DietType::HighProtein),
            "vegetarian" => Ok(DietType::Vegetarian),
            "vegan" => Ok(DietType::Vegan),
            "keto" => Ok(DietType::Keto),
            _ => Err(CalcError::UnknownDietType(s.to_string())),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Sex, ActivityLevel, Goal, DietType);

/// BMR estimation formula
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmrFormula {
    #[default]
    MifflinStJeor,
    /// Revised Harris-Benedict (Roza & Shizgal, 1984)
    HarrisBenedict,
}

/// Biometric profile for one calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserBiometrics {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age: u32,
    pub sex: Sex,
}

impl UserBiometrics {
    pub fn new(sex: Sex, height_cm: f64, weight_kg: f64, age: u32) -> Self {
        Self { height_cm, weight_kg, age, sex }
    }

    /// Reject values the formulas cannot use (NaN, infinite, zero, negative)
    pub fn validate(&self) -> CalcResult<()> {
        if !self.height_cm.is_finite() || self.height_cm <= 0.0 {
            return Err(CalcError::InvalidInput(format!(
                "height_cm must be a positive number, got {}",
                self.height_cm
            )));
        }
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(CalcError::InvalidInput(format!(
                "weight_kg must be a positive number, got {}",
                self.weight_kg
            )));
        }
        if self.age == 0 {
            return Err(CalcError::InvalidInput("age must be positive".to_string()));
        }
        Ok(())
    }
}

/// How free-text age input is turned into years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgePolicy {
    /// Whole-string integer in 1..=120, otherwise `InvalidInput`
    Strict,
    /// Leading-digit parse; falls back to the given age when nothing usable is found
    DefaultTo(u32),
}

impl Default for AgePolicy {
    fn default() -> Self {
        AgePolicy::DefaultTo(DEFAULT_AGE)
    }
}

/// Age used by the lenient policy when input is unusable
pub const DEFAULT_AGE: u32 = 25;

/// Upper bound accepted by the strict policy
pub const MAX_AGE: u32 = 120;

impl AgePolicy {
    /// Parse an age string according to this policy
    pub fn parse_age(&self, input: &str) -> CalcResult<u32> {
        match self {
            AgePolicy::Strict => {
                let age: u32 = input.trim().parse().map_err(|_| {
                    CalcError::InvalidInput(format!("age must be a whole number, got '{}'", input))
                })?;
                if age == 0 || age > MAX_AGE {
                    return Err(CalcError::InvalidInput(format!(
                        "age must be between 1 and {}, got {}",
                        MAX_AGE, age
                    )));
                }
                Ok(age)
            }
            AgePolicy::DefaultTo(fallback) => match leading_integer(input) {
                Some(age) if age > 0 => Ok(age),
                _ => {
                    tracing::warn!("Unusable age input '{}', using {}", input, fallback);
                    Ok(*fallback)
                }
            },
        }
    }
}

impl FromStr for AgePolicy {
    type Err = CalcError;

    /// Accepts `strict`, `default` or `default:<years>`
    fn from_str(s: &str) -> CalcResult<Self> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "strict" => Ok(AgePolicy::Strict),
            "default" | "lenient" => Ok(AgePolicy::default()),
            other => other
                .strip_prefix("default:")
                .and_then(|n| n.trim().parse::<u32>().ok())
                .filter(|n| *n > 0)
                .map(AgePolicy::DefaultTo)
                .ok_or_else(|| CalcError::InvalidInput(format!("unknown age policy '{}'", s))),
        }
    }
}

/// Leading unsigned integer after optional whitespace and '+' ("31 years" -> 31)
fn leading_integer(input: &str) -> Option<u32> {
    let trimmed = input.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = unsigned.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
