//! EatoAI progress report
//!
//! Prints a daily progress summary and period rollup for a user's meal
//! log, scored against their derived calorie and macro goals.

use std::path::PathBuf;

use chrono::{Duration, Local};
use tracing_subscriber::EnvFilter;

use eatoai::aggregate::{aggregate_by_day, totals_for_period};
use eatoai::db;
use eatoai::metrics::{derive_metrics, DerivedMetrics};
use eatoai::models::{LogEntry, Profile};

/// Get the database path from environment or use default
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

fn print_goal_line(label: &str, total: f64, goal: Option<f64>, percent: Option<u8>) {
    match (goal, percent) {
        (Some(goal), Some(percent)) => {
            println!("  {}: {:.0} / {:.0} ({}%)", label, total, goal, percent)
        }
        _ => println!("  {}: {:.0}", label, total),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("eatoai=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: eatoai <email> [days]");
        std::process::exit(1);
    }
    let email = &args[1];
    let days: i64 = match args.get(2) {
        Some(raw) => raw.parse()?,
        None => 7,
    };

    let db_path = get_database_path();
    let database = db::Database::new(&db_path)?;
    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let today = Local::now().date_naive();
    let start = today - Duration::days(days - 1);

    let (profile, entries) = database.with_conn(|conn| {
        let profile = Profile::get_by_email(conn, email)?;
        let entries = LogEntry::list(conn, email, Some(start), Some(today))?;
        Ok((profile, entries))
    })?;

    let goals: Option<DerivedMetrics> = match profile {
        Some(ref p) => match derive_metrics(p) {
            Ok(m) => Some(m),
            Err(e) => {
                eprintln!("Goals unavailable: {}", e);
                None
            }
        },
        None => {
            eprintln!("No profile found for {}; showing totals without goals", email);
            None
        }
    };

    if let Some(ref m) = goals {
        println!("Profile metrics for {}", email);
        println!("  BMI: {}", m.bmi);
        println!("  BMR: {:.0} kcal/day", m.bmr);
        println!("  Daily target: {} kcal", m.daily_calories);
        println!(
            "  Macro goals: {}g protein / {}g carbs / {}g fat",
            m.protein_goal_g, m.carb_goal_g, m.fat_goal_g
        );
        println!();
    }

    if entries.is_empty() {
        println!("No meals logged between {} and {}.", start, today);
        return Ok(());
    }

    println!("Daily summary ({} to {})", start, today);
    let summaries = aggregate_by_day(&entries, goals.as_ref());
    for summary in &summaries {
        println!("{}", summary.date);
        print_goal_line(
            "Calories",
            summary.totals.calories,
            goals.as_ref().map(|g| g.daily_calories as f64),
            summary.calorie_percent_of_goal,
        );
        print_goal_line(
            "Protein (g)",
            summary.totals.protein,
            goals.as_ref().map(|g| g.protein_goal_g as f64),
            summary.protein_percent_of_goal,
        );
    }

    let totals = totals_for_period(&entries);
    println!();
    println!("Period macro composition");
    println!("  Protein: {:.0} g", totals.protein);
    println!("  Carbs:   {:.0} g", totals.carbs);
    println!("  Fat:     {:.0} g", totals.fat);
    println!("  Energy:  {:.0} kcal", totals.calories);

    Ok(())
}
