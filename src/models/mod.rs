//! Data models
//!
//! Rust structs representing database entities.

mod diet_plan;

pub use diet_plan::{DietPlan, DietPlanForm, DietPlanPayload, PersonalInfo};
