//! Utility to log a meal entry against the current time

use std::path::PathBuf;

use chrono::Local;

use eatoai::models::{LogEntry, LogEntryCreate, Nutrition};

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
        eprintln!("Usage: log_meal <email> <title> <calories> <protein_g> <carbs_g> <fat_g> [category]");
        std::process::exit(1);
    }

    let data = LogEntryCreate {
        email: args[1].clone(),
        title: args[2].clone(),
        category: args.get(7).cloned(),
        logged_at: Local::now().fixed_offset(),
        nutrition: Nutrition {
            calories: args[3].parse()?,
            protein: args[4].parse()?,
            carbs: args[5].parse()?,
            fat: args[6].parse()?,
        },
    };

    let db_path = get_database_path();
    let database = eatoai::db::Database::new(&db_path)?;
    database.with_conn(|conn| {
        eatoai::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let entry = database.with_conn(|conn| LogEntry::create(conn, &data))?;
    println!("Logged entry #{}:", entry.id);
    println!("  Title: {}", entry.title);
    if let Some(ref category) = entry.category {
        println!("  Category: {}", category);
    }
    println!("  Logged at: {}", entry.logged_at);
    println!(
        "  Nutrition: {:.0} kcal, {:.0}g protein, {:.0}g carbs, {:.0}g fat",
        entry.nutrition.calories, entry.nutrition.protein, entry.nutrition.carbs, entry.nutrition.fat
    );

    Ok(())
}
