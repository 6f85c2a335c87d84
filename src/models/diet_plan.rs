//! Diet plan model
//!
//! The form a user fills in, the payload it produces, and the stored row.
//! The store keeps the payload as opaque JSON.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::{
    plan, split_calories_per_meal, ActivityLevel, AgePolicy, CalcError, CalcResult, DietType,
    Goal, MacroGrams, MacroPercentages, Sex, UserBiometrics,
};

/// Raw diet form input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietPlanForm {
    pub name: String,
    pub sex: Sex,
    pub height_cm: f64,
    pub weight_kg: f64,
    /// Free text, parsed by an `AgePolicy`
    pub age: String,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
    pub diet_type: DietType,
    pub restrictions: String,
    pub meals_per_day: u32,
}

/// Biometrics as recorded in the payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub height: f64,
    pub weight: f64,
    pub age: u32,
    pub gender: Sex,
}

/// Submitted diet plan, keyed the way clients expect (camelCase)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlanPayload {
    pub name: String,
    pub personal_info: PersonalInfo,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
    pub diet_type: DietType,
    pub restrictions: String,
    pub meals_per_day: u32,
    pub target_calories: i64,
    pub macros: MacroPercentages,
    pub macro_grams: MacroGrams,
    pub meal_calories: Vec<i64>,
    pub bmr: i64,
    pub tdee: i64,
}

impl DietPlanForm {
    /// Validate the form and compute its payload
    pub fn submit(&self, age_policy: AgePolicy) -> CalcResult<DietPlanPayload> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CalcError::MissingName);
        }

        let age = age_policy.parse_age(&self.age)?;
        let biometrics = UserBiometrics::new(self.sex, self.height_cm, self.weight_kg, age);

        let result = plan(&biometrics, self.activity_level, self.goal, self.diet_type)?;
        let meal_calories =
            split_calories_per_meal(result.targets.target_calories_kcal, self.meals_per_day)?;

        Ok(DietPlanPayload {
            name: name.to_string(),
            personal_info: PersonalInfo {
                height: self.height_cm,
                weight: self.weight_kg,
                age,
                gender: self.sex,
            },
            goal: self.goal,
            activity_level: self.activity_level,
            diet_type: self.diet_type,
            restrictions: self.restrictions.trim().to_string(),
            meals_per_day: self.meals_per_day,
            target_calories: result.targets.target_calories_kcal,
            macros: result.targets.macro_percentages,
            macro_grams: result.macro_grams,
            meal_calories,
            bmr: result.targets.bmr_kcal,
            tdee: result.targets.tdee_kcal,
        })
    }
}

/// Stored diet plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietPlan {
    pub id: i64,
    pub name: String,
    pub payload: serde_json::Value,
    pub created_at: String,
}

impl DietPlan {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let raw: String = row.get("payload")?;
        let payload = serde_json::from_str(&raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            payload,
            created_at: row.get("created_at")?,
        })
    }

    /// Store any serializable payload under a name
    pub fn create<T: Serialize>(conn: &Connection, name: &str, payload: &T) -> DbResult<Self> {
        let json = serde_json::to_string(payload)?;

        conn.execute(
            "INSERT INTO diet_plans (name, payload) VALUES (?1, ?2)",
            params![name, json],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a diet plan by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM diet_plans WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(plan) => Ok(Some(plan)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List plans, newest first
    pub fn list(conn: &Connection, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM diet_plans ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )?;

        let plans = stmt
            .query_map(params![limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(plans)
    }

    /// Count stored plans
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM diet_plans", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete a plan, returning whether a row was removed
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM diet_plans WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
