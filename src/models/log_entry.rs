//! Log entry model
//!
//! A single recorded meal or analyzed food item, keyed by user email.

use chrono::{DateTime, FixedOffset, NaiveDate};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::Nutrition;
use crate::db::DbResult;

/// A recorded meal or analyzed food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub email: String,
    /// Recipe title or the query text that produced the entry
    pub title: String,
    /// Free-text meal label ("breakfast", "snack", ...) used only for
    /// grouping and display, never for aggregation math
    pub category: Option<String>,
    /// Timestamp with the offset it was recorded in; the calendar-day
    /// key derives from this offset, so callers pick local vs UTC
    pub logged_at: DateTime<FixedOffset>,
    pub nutrition: Nutrition,
    pub created_at: String,
}

/// Data for creating a log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntryCreate {
    pub email: String,
    pub title: String,
    pub category: Option<String>,
    pub logged_at: DateTime<FixedOffset>,
    pub nutrition: Nutrition,
}

impl LogEntry {
    /// Calendar date the entry belongs to, in its stored offset
    pub fn date_key(&self) -> NaiveDate {
        self.logged_at.date_naive()
    }

    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let logged_at_str: String = row.get("logged_at")?;
        let logged_at = DateTime::parse_from_rfc3339(&logged_at_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Self {
            id: row.get("id")?,
            email: row.get("email")?,
            title: row.get("title")?,
            category: row.get("category")?,
            logged_at,
            nutrition: Nutrition {
                calories: row.get("calories")?,
                protein: row.get("protein")?,
                carbs: row.get("carbs")?,
                fat: row.get("fat")?,
            },
            created_at: row.get("created_at")?,
        })
    }

    /// Create a new log entry
    pub fn create(conn: &Connection, data: &LogEntryCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO log_entries (email, title, category, logged_at, calories, protein, carbs, fat)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                data.email,
                data.title,
                data.category,
                data.logged_at.to_rfc3339(),
                data.nutrition.calories,
                data.nutrition.protein,
                data.nutrition.carbs,
                data.nutrition.fat,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a log entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM log_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List entries for a user, oldest first, with an optional calendar
    /// date range (inclusive on both ends)
    pub fn list(
        conn: &Connection,
        email: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM log_entries WHERE email = ?1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(email.to_string())];

        // The RFC 3339 text starts with the date in the entry's stored
        // offset, so comparing the 10-char prefix keeps range filtering
        // consistent with date_key(). date(logged_at) would not: SQLite
        // normalizes offset-carrying text to the UTC day.
        if let Some(start) = start_date {
            params_vec.push(Box::new(start.to_string()));
            sql.push_str(&format!(
                " AND substr(logged_at, 1, 10) >= ?{}",
                params_vec.len()
            ));
        }

        if let Some(end) = end_date {
            params_vec.push(Box::new(end.to_string()));
            sql.push_str(&format!(
                " AND substr(logged_at, 1, 10) <= ?{}",
                params_vec.len()
            ));
        }

        // Order by the normalized instant; the raw text is not
        // chronological across mixed offsets
        sql.push_str(" ORDER BY datetime(logged_at) ASC, id ASC");

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let entries = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Delete a log entry
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM log_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use chrono::TimeZone;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn entry_at(email: &str, title: &str, rfc3339: &str) -> LogEntryCreate {
        LogEntryCreate {
            email: email.to_string(),
            title: title.to_string(),
            category: Some("lunch".to_string()),
            logged_at: DateTime::parse_from_rfc3339(rfc3339).unwrap(),
            nutrition: Nutrition {
                calories: 500.0,
                protein: 30.0,
                carbs: 40.0,
                fat: 20.0,
            },
        }
    }

    #[test]
    fn test_create_and_get() {
        let conn = test_conn();

        let created = LogEntry::create(
            &conn,
            &entry_at("ana@example.com", "Grilled salmon", "2025-03-10T12:30:00+00:00"),
        )
        .unwrap();

        let fetched = LogEntry::get_by_id(&conn, created.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Grilled salmon");
        assert_eq!(fetched.nutrition.calories, 500.0);
        assert_eq!(
            fetched.date_key(),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );
    }

    #[test]
    fn test_list_is_ordered_and_scoped_to_email() {
        let conn = test_conn();

        LogEntry::create(
            &conn,
            &entry_at("ana@example.com", "Dinner", "2025-03-11T19:00:00+00:00"),
        )
        .unwrap();
        LogEntry::create(
            &conn,
            &entry_at("ana@example.com", "Breakfast", "2025-03-10T08:00:00+00:00"),
        )
        .unwrap();
        LogEntry::create(
            &conn,
            &entry_at("bo@example.com", "Other user", "2025-03-10T09:00:00+00:00"),
        )
        .unwrap();

        let entries = LogEntry::list(&conn, "ana@example.com", None, None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Breakfast");
        assert_eq!(entries[1].title, "Dinner");
    }

    #[test]
    fn test_list_date_range() {
        let conn = test_conn();

        for (title, ts) in [
            ("Day one", "2025-03-10T12:00:00+00:00"),
            ("Day two", "2025-03-11T12:00:00+00:00"),
            ("Day three", "2025-03-12T12:00:00+00:00"),
        ] {
            LogEntry::create(&conn, &entry_at("ana@example.com", title, ts)).unwrap();
        }

        let entries = LogEntry::list(
            &conn,
            "ana@example.com",
            Some(NaiveDate::from_ymd_opt(2025, 3, 11).unwrap()),
            Some(NaiveDate::from_ymd_opt(2025, 3, 11).unwrap()),
        )
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Day two");
    }

    #[test]
    fn test_delete() {
        let conn = test_conn();

        let created = LogEntry::create(
            &conn,
            &entry_at("ana@example.com", "Snack", "2025-03-10T15:00:00+00:00"),
        )
        .unwrap();

        assert!(LogEntry::delete(&conn, created.id).unwrap());
        assert!(LogEntry::get_by_id(&conn, created.id).unwrap().is_none());
        assert!(!LogEntry::delete(&conn, created.id).unwrap());
    }

    #[test]
    fn test_date_key_respects_stored_offset() {
        // 23:30 on March 10 at UTC-5 is March 11 in UTC, but the entry
        // belongs to the day it was logged in.
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let logged_at = offset.with_ymd_and_hms(2025, 3, 10, 23, 30, 0).unwrap();

        let conn = test_conn();
        let created = LogEntry::create(
            &conn,
            &LogEntryCreate {
                email: "ana@example.com".to_string(),
                title: "Late dinner".to_string(),
                category: None,
                logged_at,
                nutrition: Nutrition::zero(),
            },
        )
        .unwrap();

        assert_eq!(
            created.date_key(),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );
    }

    #[test]
    fn test_list_range_matches_date_key_for_offset_entries() {
        // 23:30 on March 10 at UTC-5 is already March 11 in UTC. The
        // range filter must agree with date_key(), not the UTC day.
        let conn = test_conn();
        LogEntry::create(
            &conn,
            &entry_at("ana@example.com", "Late dinner", "2025-03-10T23:30:00-05:00"),
        )
        .unwrap();

        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let entries = LogEntry::list(&conn, "ana@example.com", Some(day), Some(day)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date_key(), day);

        let utc_day = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        assert!(
            LogEntry::list(&conn, "ana@example.com", Some(utc_day), Some(utc_day))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_list_orders_mixed_offsets_chronologically() {
        // 09:00-05:00 is 14:00 UTC, after 13:00+00:00, even though the
        // raw text sorts the other way round.
        let conn = test_conn();
        LogEntry::create(
            &conn,
            &entry_at("ana@example.com", "Second", "2025-03-10T09:00:00-05:00"),
        )
        .unwrap();
        LogEntry::create(
            &conn,
            &entry_at("ana@example.com", "First", "2025-03-10T13:00:00+00:00"),
        )
        .unwrap();

        let entries = LogEntry::list(&conn, "ana@example.com", None, None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "First");
        assert_eq!(entries[1].title, "Second");
    }
}
