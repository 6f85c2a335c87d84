//! Nutriplan MCP Server Implementation
//!
//! Implements the MCP server with all diet planning tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::ServerConfig;
use crate::db::Database;
use crate::models::DietPlanForm;
use crate::nutrition::{ActivityLevel, AgePolicy, DietType, Goal, MealIntake, Sex};
use crate::tools::plans::{self, ProfileInput};
use crate::tools::status::StatusTracker;

/// Nutriplan MCP Service
#[derive(Clone)]
pub struct NutriplanService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    age_policy: AgePolicy,
    tool_router: ToolRouter<NutriplanService>,
}

impl NutriplanService {
    pub fn new(config: &ServerConfig, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(
                config.database_path.clone(),
                config.age_policy,
            ))),
            database,
            age_policy: config.age_policy,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Parameter Structs
// ============================================================================

/// Age as a number or free text ("31", "31 years")
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum AgeParam {
    Years(u32),
    Text(String),
}

impl AgeParam {
    fn as_text(&self) -> String {
        match self {
            AgeParam::Years(n) => n.to_string(),
            AgeParam::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProfileParams {
    /// male or female
    pub sex: String,
    /// Height in centimeters
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Age in years
    pub age: AgeParam,
    /// sedentary, light, moderate, active, or very_active
    pub activity_level: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateTargetsParams {
    #[serde(flatten)]
    pub profile: ProfileParams,
    /// lose, gain, maintain, or muscle
    pub goal: String,
    /// balanced, low_carb, high_protein, vegetarian, vegan, or keto
    pub diet_type: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MacroDistributionParams {
    /// balanced, low_carb, high_protein, vegetarian, vegan, or keto
    pub diet_type: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SplitMealCaloriesParams {
    /// Daily calorie target
    pub target_calories: i64,
    /// Meals per day, 3 to 6 (default 3)
    #[serde(default = "default_meals_per_day")]
    pub meals_per_day: u32,
}

fn default_meals_per_day() -> u32 { 3 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveDietPlanParams {
    /// Plan name (required)
    pub name: String,
    /// male or female
    pub sex: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age: AgeParam,
    /// lose, gain, maintain, or muscle
    pub goal: String,
    /// sedentary, light, moderate, active, or very_active
    pub activity_level: String,
    /// balanced, low_carb, high_protein, vegetarian, vegan, or keto
    pub diet_type: String,
    /// Allergies or foods to avoid
    #[serde(default)]
    pub restrictions: String,
    /// Meals per day, 3 to 6 (default 3)
    #[serde(default = "default_meals_per_day")]
    pub meals_per_day: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDietPlanParams {
    /// Diet plan ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListDietPlansParams {
    /// Maximum results (default 50, max 200)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Offset for pagination
    #[serde(default)]
    pub offset: i64,
}

fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteDietPlanParams {
    /// Diet plan ID to delete
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MealParam {
    pub name: String,
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DailyProgressParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// Meals eaten so far
    #[serde(default)]
    pub meals: Vec<MealParam>,
    /// Water drunk in milliliters
    #[serde(default)]
    pub water_ml: f64,
    #[serde(default)]
    pub steps: f64,
    /// Daily calorie goal (default 2000)
    pub calorie_goal: Option<f64>,
    /// Water goal in ml (default 2500)
    pub water_goal_ml: Option<f64>,
    /// Step goal (default 10000)
    pub step_goal: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WaterLogParam {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// Water drunk in milliliters
    pub amount_ml: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WeeklyWaterParams {
    /// Last day of the week, YYYY-MM-DD
    pub end_date: String,
    /// Water logs; entries outside the week are ignored
    #[serde(default)]
    pub logs: Vec<WaterLogParam>,
}

impl SaveDietPlanParams {
    fn into_form(self) -> Result<DietPlanForm, String> {
        Ok(DietPlanForm {
            sex: self.sex.parse::<Sex>().map_err(|e| e.to_string())?,
            goal: self.goal.parse::<Goal>().map_err(|e| e.to_string())?,
            activity_level: self.activity_level.parse::<ActivityLevel>().map_err(|e| e.to_string())?,
            diet_type: self.diet_type.parse::<DietType>().map_err(|e| e.to_string())?,
            age: self.age.as_text(),
            name: self.name,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            restrictions: self.restrictions,
            meals_per_day: self.meals_per_day,
        })
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutriplanService {
    // --- Status ---

    #[tool(description = "Get the current status of the Nutriplan service including build info, database status, and process information")]
    async fn nutriplan_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Get instructions for building diet plans: required profile fields, formulas, and tables. Call this before planning a diet.")]
    fn plan_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::PLAN_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(PLAN_INSTRUCTIONS)]))
    }

    // --- Calculation ---

    #[tool(description = "Calculate BMR, TDEE, target calories, macro percentages, and macro grams for a profile, goal, and diet type. Does not save anything.")]
    fn calculate_nutrition_targets(&self, Parameters(p): Parameters<CalculateTargetsParams>) -> Result<CallToolResult, McpError> {
        let age = p.profile.age.as_text();
        let profile = ProfileInput {
            sex: &p.profile.sex,
            height_cm: p.profile.height_cm,
            weight_kg: p.profile.weight_kg,
            age: &age,
            activity_level: &p.profile.activity_level,
        };
        let result = plans::calculate_targets(profile, &p.goal, &p.diet_type, self.age_policy)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get the protein/carbs/fat percentage split for a diet type")]
    fn get_macro_distribution(&self, Parameters(p): Parameters<MacroDistributionParams>) -> Result<CallToolResult, McpError> {
        let result = plans::macro_distribution(&p.diet_type).map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Estimate a profile's daily calorie goal using the revised Harris-Benedict formula and activity level")]
    fn estimate_calorie_goal(&self, Parameters(p): Parameters<ProfileParams>) -> Result<CallToolResult, McpError> {
        let age = p.age.as_text();
        let profile = ProfileInput {
            sex: &p.sex,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            age: &age,
            activity_level: &p.activity_level,
        };
        let result = plans::estimate_calorie_goal(profile, self.age_policy)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Split a daily calorie target evenly across 3-6 meals")]
    fn split_meal_calories(&self, Parameters(p): Parameters<SplitMealCaloriesParams>) -> Result<CallToolResult, McpError> {
        let result = plans::split_meal_calories(p.target_calories, p.meals_per_day)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Summarize a day's meals and report calorie, water, and step progress against goals")]
    fn daily_progress(&self, Parameters(p): Parameters<DailyProgressParams>) -> Result<CallToolResult, McpError> {
        let meals: Vec<MealIntake> = p.meals.into_iter()
            .map(|m| MealIntake { name: m.name, calories: m.calories, protein: m.protein, carbs: m.carbs, fat: m.fat })
            .collect();
        let result = plans::daily_progress(&p.date, &meals, p.water_ml, p.steps, p.calorie_goal, p.water_goal_ml, p.step_goal)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Water intake per day for the 7 days ending on end_date, oldest first. Days without logs read 0.")]
    fn weekly_water(&self, Parameters(p): Parameters<WeeklyWaterParams>) -> Result<CallToolResult, McpError> {
        let logs: Vec<(String, f64)> = p.logs.into_iter().map(|l| (l.date, l.amount_ml)).collect();
        let result = plans::weekly_water_series(&p.end_date, &logs)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    // --- Diet Plans ---

    #[tool(description = "Create and save a named diet plan. Computes targets from the profile and stores the full plan.")]
    fn save_diet_plan(&self, Parameters(p): Parameters<SaveDietPlanParams>) -> Result<CallToolResult, McpError> {
        let form = p.into_form().map_err(|e| McpError::invalid_params(e, None))?;
        let result = plans::save_diet_plan(&self.database, &form, self.age_policy)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a saved diet plan by ID")]
    fn get_diet_plan(&self, Parameters(p): Parameters<GetDietPlanParams>) -> Result<CallToolResult, McpError> {
        let result = plans::get_diet_plan(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(plan) => to_json(&plan),
            None => Ok(CallToolResult::success(vec![Content::text(
                format!(r#"{{"error": "Diet plan not found", "id": {}}}"#, p.id),
            )])),
        }
    }

    #[tool(description = "List saved diet plans, newest first, with pagination")]
    fn list_diet_plans(&self, Parameters(p): Parameters<ListDietPlansParams>) -> Result<CallToolResult, McpError> {
        let result = plans::list_diet_plans(&self.database, p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a saved diet plan")]
    fn delete_diet_plan(&self, Parameters(p): Parameters<DeleteDietPlanParams>) -> Result<CallToolResult, McpError> {
        let deleted = plans::delete_diet_plan(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::json!({"success": deleted, "id": p.id}).to_string();
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutriplanService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutriplan".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutriplan".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutriplan - daily calorie and macro targets and saved diet plans. \
                 IMPORTANT: Call plan_instructions before planning. \
                 Targets: calculate_nutrition_targets, get_macro_distribution, estimate_calorie_goal, split_meal_calories. \
                 Plans: save/get/list/delete_diet_plan. \
                 Tracking: daily_progress, weekly_water. \
                 Status: nutriplan_status."
                    .into(),
            ),
        }
    }
}
