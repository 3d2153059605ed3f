//! Profile model
//!
//! Stores a user's biometric and activity snapshot, keyed by email.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Biological sex, as used by the Mifflin-St Jeor BMR formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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

    /// Parse a sex string. Unknown values return None; there is no
    /// defined formula variant for anything outside male/female, so
    /// callers must treat None as invalid input rather than defaulting.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Activity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    Moderate,
    High,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Low => "low",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::High => "high",
        }
    }

    /// Parse an activity level string, falling back to Low for anything
    /// unrecognized (compatible with profiles saved with a blank level).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "low" => ActivityLevel::Low,
            "moderate" => ActivityLevel::Moderate,
            "high" => ActivityLevel::High,
            other => {
                tracing::warn!("Unrecognized activity level '{}', treating as low", other);
                ActivityLevel::Low
            }
        }
    }

    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Low => 1.2,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::High => 1.725,
        }
    }
}

/// A user's biometric profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub email: String,
    pub age: i64,
    /// None when the stored value is blank or unrecognized
    pub sex: Option<Sex>,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating or updating a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpsert {
    pub email: String,
    pub age: i64,
    pub sex: Option<Sex>,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
}

impl Profile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let sex_str: String = row.get("sex")?;
        let activity_str: String = row.get("activity_level")?;
        Ok(Self {
            id: row.get("id")?,
            email: row.get("email")?,
            age: row.get("age")?,
            sex: Sex::parse(&sex_str),
            height_cm: row.get("height_cm")?,
            weight_kg: row.get("weight_kg")?,
            activity_level: ActivityLevel::from_str(&activity_str),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get a profile by email
    pub fn get_by_email(conn: &Connection, email: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles WHERE email = ?1")?;

        let result = stmt.query_row([email], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create or update a profile (upsert keyed by email)
    pub fn upsert(conn: &Connection, data: &ProfileUpsert) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO profiles (email, age, sex, height_cm, weight_kg, activity_level)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(email) DO UPDATE SET
                age = excluded.age,
                sex = excluded.sex,
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                activity_level = excluded.activity_level,
                updated_at = datetime('now')
            "#,
            params![
                data.email,
                data.age,
                data.sex.map(|s| s.as_str()).unwrap_or(""),
                data.height_cm,
                data.weight_kg,
                data.activity_level.as_str(),
            ],
        )?;

        Self::get_by_email(conn, &data.email)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Delete a profile by email
    pub fn delete(conn: &Connection, email: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM profiles WHERE email = ?1", [email])?;
        Ok(rows > 0)
    }
}
