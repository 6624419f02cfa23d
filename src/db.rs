use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{ChallengeMap, Feedback, Plan, Review, StatsSnapshot, UserDocument, WorkoutEvent};
use crate::store::DocumentStore;

const SCHEMA_SQL: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        created_at TEXT NOT NULL,
        workouts TEXT NOT NULL DEFAULT '[]',
        stats TEXT,
        challenges TEXT NOT NULL DEFAULT '{}',
        cycles TEXT NOT NULL DEFAULT '[]'
    );

    CREATE TABLE IF NOT EXISTS feedbacks (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        body TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS reviews (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        body TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_reviews_user ON reviews(user_id);
";

/// user documents as JSON columns in SQLite
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// open db file + init tables
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// write one JSON subtree of a user row
    fn update_column<T: Serialize + ?Sized>(
        &self,
        user_id: &str,
        column: &'static str,
        value: &T,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        // column names are compile-time constants
        let sql = format!("UPDATE users SET {} = ?1 WHERE id = ?2", column);
        self.conn.execute(&sql, params![json, user_id])?;
        Ok(())
    }
}

impl DocumentStore for SqliteStore {
    fn get_user(&self, user_id: &str) -> Result<Option<UserDocument>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT created_at, workouts, stats, challenges, cycles FROM users WHERE id = ?1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((created_at, workouts, stats, challenges, cycles)) = row else {
            return Ok(None);
        };

        Ok(Some(UserDocument {
            created_at: serde_json::from_value(serde_json::Value::String(created_at))?,
            workouts: serde_json::from_str(&workouts)?,
            stats: match stats {
                Some(s) => serde_json::from_str(&s)?,
                None => StatsSnapshot::default(),
            },
            challenges: serde_json::from_str(&challenges)?,
            cycles: serde_json::from_str(&cycles)?,
        }))
    }

    fn create_user(&self, user_id: &str, doc: &UserDocument) -> Result<bool, StoreError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO users (id, created_at, workouts, stats, challenges, cycles)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id,
                doc.created_at.to_rfc3339(),
                serde_json::to_string(&doc.workouts)?,
                serde_json::to_string(&doc.stats)?,
                serde_json::to_string(&doc.challenges)?,
                serde_json::to_string(&doc.cycles)?,
            ],
        )?;
        Ok(inserted == 1)
    }

    fn update_workouts_and_stats(
        &self,
        user_id: &str,
        workouts: &[WorkoutEvent],
        stats: &StatsSnapshot,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE users SET workouts = ?1, stats = ?2 WHERE id = ?3",
            params![serde_json::to_string(workouts)?, serde_json::to_string(stats)?, user_id],
        )?;
        Ok(())
    }

    fn update_challenges(&self, user_id: &str, challenges: &ChallengeMap) -> Result<(), StoreError> {
        self.update_column(user_id, "challenges", challenges)
    }

    fn update_cycles(&self, user_id: &str, cycles: &[Plan]) -> Result<(), StoreError> {
        self.update_column(user_id, "cycles", cycles)
    }

    fn add_feedback(&self, feedback: &Feedback) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO feedbacks (id, user_id, body) VALUES (?1, ?2, ?3)",
            params![id, feedback.user_id, serde_json::to_string(feedback)?],
        )?;
        Ok(id)
    }

    fn has_review(&self, user_id: &str) -> Result<bool, StoreError> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM reviews WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn add_review(&self, review: &Review) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO reviews (id, user_id, body) VALUES (?1, ?2, ?3)",
            params![id, review.user_id, serde_json::to_string(review)?],
        )?;
        Ok(id)
    }
}
