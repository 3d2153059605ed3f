//! Utility to set a user's biometric profile in the database

use std::path::PathBuf;

use eatoai::metrics::derive_metrics;
use eatoai::models::{ActivityLevel, Profile, ProfileUpsert, Sex};

fn get_database_path() -> PathBuf {
    std::env::var("EATOAI_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            std::fs::create_dir_all(&path).ok();
            path.push("eatoai.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 7 {
        eprintln!("Usage: set_profile <email> <age> <sex> <height_cm> <weight_kg> <activity>");
        eprintln!("  sex: male | female");
        eprintln!("  activity: low | moderate | high");
        std::process::exit(1);
    }

    let sex = match Sex::parse(&args[3]) {
        Some(sex) => Some(sex),
        None => {
            eprintln!("Unknown sex '{}': must be 'male' or 'female'", args[3]);
            std::process::exit(1);
        }
    };

    let data = ProfileUpsert {
        email: args[1].clone(),
        age: args[2].parse()?,
        sex,
        height_cm: args[4].parse()?,
        weight_kg: args[5].parse()?,
        activity_level: ActivityLevel::from_str(&args[6]),
    };

    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = eatoai::db::Database::new(&db_path)?;
    database.with_conn(|conn| {
        eatoai::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let profile = database.with_conn(|conn| Profile::upsert(conn, &data))?;
    println!("Profile saved:");
    println!("  Email: {}", profile.email);
    println!("  Age: {}", profile.age);
    println!("  Height: {} cm", profile.height_cm);
    println!("  Weight: {} kg", profile.weight_kg);
    println!("  Activity: {}", profile.activity_level.as_str());

    match derive_metrics(&profile) {
        Ok(m) => {
            println!("Derived metrics:");
            println!("  BMI: {}", m.bmi);
            println!("  BMR: {:.0} kcal/day", m.bmr);
            println!("  Daily target: {} kcal", m.daily_calories);
            println!(
                "  Macro goals: {}g protein / {}g carbs / {}g fat",
                m.protein_goal_g, m.carb_goal_g, m.fat_goal_g
            );
        }
        Err(e) => println!("Metrics unavailable: {}", e),
    }

    Ok(())
}
