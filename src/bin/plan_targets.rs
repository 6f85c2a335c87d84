//! Print nutrition targets for a profile as JSON
//!
//! Usage: plan_targets <male|female> <height_cm> <weight_kg> <age> <activity> <goal> <diet_type>

use nutriplan::nutrition::{plan, ActivityLevel, AgePolicy, DietType, Goal, Sex, UserBiometrics};

const USAGE: &str =
    "Usage: plan_targets <male|female> <height_cm> <weight_kg> <age> <activity> <goal> <diet_type>";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 7 {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let sex: Sex = args[0].parse()?;
    let height_cm: f64 = args[1].parse()?;
    let weight_kg: f64 = args[2].parse()?;
    let age = AgePolicy::Strict.parse_age(&args[3])?;
    let activity: ActivityLevel = args[4].parse()?;
    let goal: Goal = args[5].parse()?;
    let diet_type: DietType = args[6].parse()?;

    let biometrics = UserBiometrics::new(sex, height_cm, weight_kg, age);
    let result = plan(&biometrics, activity, goal, diet_type)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
