//! Nutriplan Status Tool
//!
//! Runtime status of the service plus the planning guide for assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::nutrition::AgePolicy;

/// Diet planning instructions for AI assistants
pub const PLAN_INSTRUCTIONS: &str = r#"
# Nutriplan Diet Planning Instructions

## Collect the profile

| Field | Values |
|-------|--------|
| sex | male, female |
| height_cm | centimeters (typical 140-220) |
| weight_kg | kilograms (typical 40-150) |
| age | whole years |
| activity_level | sedentary, light, moderate, active, very_active |
| goal | lose, gain, maintain, muscle |
| diet_type | balanced, low_carb, high_protein, vegetarian, vegan, keto |

## How targets are computed

1. **BMR** (Mifflin-St Jeor): `10*weight + 6.25*height - 5*age + 5` (male) or `- 161` (female)
2. **TDEE** = BMR x activity multiplier

| activity_level | multiplier |
|----------------|------------|
| sedentary | 1.2 |
| light | 1.375 |
| moderate | 1.55 |
| active | 1.725 |
| very_active | 1.9 |

3. **Target calories** = round(TDEE + goal offset): lose -500, gain +500, maintain 0, muscle +300
4. **Macros** by diet type (protein/carbs/fat %):

| diet_type | P | C | F |
|-----------|---|---|---|
| balanced | 30 | 40 | 30 |
| low_carb | 40 | 20 | 40 |
| high_protein | 50 | 30 | 20 |
| vegetarian | 25 | 45 | 30 |
| vegan | 20 | 50 | 30 |
| keto | 25 | 5 | 70 |

Grams use 4 kcal/g for protein and carbs, 9 kcal/g for fat. Rounding is half away from zero.

## Tools

- `calculate_nutrition_targets` - preview targets without saving
- `save_diet_plan` - requires a non-empty name and meals_per_day between 3 and 6
- `list_diet_plans`, `get_diet_plan`, `delete_diet_plan`
- `split_meal_calories` - per-meal calories for a target
- `estimate_calorie_goal` - Harris-Benedict daily goal for a profile page
- `daily_progress` - today's meals, water, and steps against goals
  (defaults: 2000 kcal, 2500 ml water, 10000 steps)
- `weekly_water` - water per day for the 7 days ending on a date, missing days as 0

Dates are `YYYY-MM-DD`.
"#;

/// Service status information
#[derive(Debug, Serialize)]
pub struct NutriplanStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub age_policy: AgePolicy,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    age_policy: AgePolicy,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, age_policy: AgePolicy) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            age_policy,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> NutriplanStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutriplanStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            age_policy: self.age_policy,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
