//! SQLite design store
//!
//! Persistent storage for design sessions and the LLM usage log.
//!
//! # Usage
//!
//! ```no_run
//! use ludo_core::store::SqliteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Default location: ~/.ludo/ludo.db
//! let store = SqliteStore::new_default().await?;
//!
//! // Or specify a custom path
//! let store = SqliteStore::new("/path/to/ludo.db").await?;
//! # Ok(())
//! # }
//! ```

use super::DesignStore;
use crate::context::{LearningObjective, ReflectionAnswers};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ludo_llm::{UsageLogEntry, UsageSink, UsageStats};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS cards (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id INTEGER NOT NULL,
        content TEXT NOT NULL,
        category TEXT,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS socratic_session_answers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id INTEGER NOT NULL UNIQUE,
        answers_json TEXT NOT NULL DEFAULT '{}',
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bloom_objectives (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id INTEGER NOT NULL,
        content TEXT NOT NULL,
        level TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS gdc_sections (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS gdc_notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id INTEGER NOT NULL,
        section_id INTEGER NOT NULL REFERENCES gdc_sections(id),
        content TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS llm_usage_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id INTEGER,
        prompt TEXT NOT NULL,
        response TEXT NOT NULL,
        model_name TEXT NOT NULL,
        tokens_used INTEGER NOT NULL DEFAULT 0,
        latency_ms INTEGER NOT NULL DEFAULT 0,
        module_tag TEXT NOT NULL,
        success INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_cards_session ON cards(session_id)",
    "CREATE INDEX IF NOT EXISTS idx_objectives_session ON bloom_objectives(session_id)",
    "CREATE INDEX IF NOT EXISTS idx_notes_session ON gdc_notes(session_id)",
    "CREATE INDEX IF NOT EXISTS idx_usage_session ON llm_usage_log(session_id)",
];

#[derive(sqlx::FromRow)]
struct UsageRow {
    session_id: Option<i64>,
    prompt: String,
    response: String,
    model_name: String,
    tokens_used: i64,
    latency_ms: i64,
    module_tag: String,
    success: bool,
    created_at: String,
}

impl TryFrom<UsageRow> for UsageLogEntry {
    type Error = Error;

    fn try_from(row: UsageRow) -> Result<Self> {
        let timestamp = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| Error::Store(format!("Invalid usage timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(UsageLogEntry {
            session_id: row.session_id,
            prompt: row.prompt,
            response: row.response,
            model_name: row.model_name,
            tokens_used: u32::try_from(row.tokens_used).unwrap_or_default(),
            latency_ms: u64::try_from(row.latency_ms).unwrap_or_default(),
            module_tag: row.module_tag,
            timestamp,
            success: row.success,
        })
    }
}

/// SQLite-backed design store and usage log
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `path`
    ///
    /// # Errors
    ///
    /// Returns error if database creation or schema initialization fails.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Store(format!("Failed to create database directory: {}", e))
            })?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
            .map_err(|e| Error::Store(format!("Invalid SQLite path: {}", e)))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| Error::Store(format!("Failed to connect to SQLite: {}", e)))?;

        let store = Self { pool };
        store.init_schema().await?;

        info!(path = %path.display(), "SQLite design store initialized");
        Ok(store)
    }

    /// Open the store at the default location (~/.ludo/ludo.db)
    pub async fn new_default() -> Result<Self> {
        let path = Self::default_path()?;
        Self::new(&path).await
    }

    /// Default database path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Store("Could not determine home directory".to_string()))?;
        Ok(home.join(".ludo").join("ludo.db"))
    }

    async fn init_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| Error::Store(format!("Failed to initialize schema: {}", e)))?;
        }
        debug!("SQLite design schema initialized");
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<bool> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::Store(format!("Health check failed: {}", e)))?;
        Ok(true)
    }

    /// Append an idea card
    pub async fn add_idea(&self, session_id: i64, text: &str) -> Result<()> {
        sqlx::query("INSERT INTO cards (session_id, content) VALUES (?, ?)")
            .bind(session_id)
            .bind(text)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Insert or replace the reflection answers
    pub async fn save_reflection_answers(
        &self,
        session_id: i64,
        answers: &ReflectionAnswers,
    ) -> Result<()> {
        let json = serde_json::to_string(answers)
            .map_err(|e| Error::Store(format!("Failed to serialize answers: {}", e)))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO socratic_session_answers (session_id, answers_json, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(session_id) DO UPDATE SET
                answers_json = excluded.answers_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(session_id)
        .bind(&json)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Append a learning objective
    pub async fn add_objective(&self, session_id: i64, objective: &LearningObjective) -> Result<()> {
        sqlx::query("INSERT INTO bloom_objectives (session_id, content, level) VALUES (?, ?, ?)")
            .bind(session_id)
            .bind(&objective.text)
            .bind(&objective.level)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Append a note to a canvas section, creating the section on first use
    pub async fn add_canvas_note(&self, session_id: i64, section: &str, text: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT OR IGNORE INTO gdc_sections (name) VALUES (?)")
            .bind(section)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO gdc_notes (session_id, section_id, content)
            SELECT ?, id, ? FROM gdc_sections WHERE name = ?
            "#,
        )
        .bind(session_id)
        .bind(text)
        .bind(section)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Usage entries, oldest first, optionally restricted to one session
    pub async fn usage_entries(&self, session_id: Option<i64>) -> Result<Vec<UsageLogEntry>> {
        let rows: Vec<UsageRow> = match session_id {
            Some(id) => {
                sqlx::query_as(
                    r#"
                    SELECT session_id, prompt, response, model_name, tokens_used,
                           latency_ms, module_tag, success, created_at
                    FROM llm_usage_log WHERE session_id = ? ORDER BY id
                    "#,
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT session_id, prompt, response, model_name, tokens_used,
                           latency_ms, module_tag, success, created_at
                    FROM llm_usage_log ORDER BY id
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(UsageLogEntry::try_from).collect()
    }

    /// Aggregated usage statistics, optionally restricted to one session
    pub async fn usage_stats(&self, session_id: Option<i64>) -> Result<UsageStats> {
        let entries = self.usage_entries(session_id).await?;
        Ok(UsageStats::from_entries(&entries))
    }
}

#[async_trait]
impl DesignStore for SqliteStore {
    async fn ideas(&self, session_id: i64) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT content FROM cards WHERE session_id = ? ORDER BY id")
                .bind(session_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(content,)| content).collect())
    }

    async fn reflection_answers(&self, session_id: i64) -> Result<Option<ReflectionAnswers>> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT answers_json FROM socratic_session_answers WHERE session_id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((json,)) => {
                let answers = serde_json::from_str(&json).map_err(|e| {
                    Error::Store(format!(
                        "Corrupt reflection answers for session {}: {}",
                        session_id, e
                    ))
                })?;
                Ok(Some(answers))
            }
            None => Ok(None),
        }
    }

    async fn objectives(&self, session_id: i64) -> Result<Vec<LearningObjective>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT content, level FROM bloom_objectives WHERE session_id = ? ORDER BY id",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(text, level)| LearningObjective { text, level })
            .collect())
    }

    async fn canvas_notes(&self, session_id: i64) -> Result<BTreeMap<String, Vec<String>>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT s.name, n.content
            FROM gdc_notes n
            JOIN gdc_sections s ON s.id = n.section_id
            WHERE n.session_id = ?
            ORDER BY n.id
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        let mut notes: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (section, content) in rows {
            notes.entry(section).or_default().push(content);
        }
        Ok(notes)
    }
}

#[async_trait]
impl UsageSink for SqliteStore {
    async fn append(&self, entry: UsageLogEntry) -> ludo_llm::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO llm_usage_log
                (session_id, prompt, response, model_name, tokens_used, latency_ms, module_tag, success, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.session_id)
        .bind(&entry.prompt)
        .bind(&entry.response)
        .bind(&entry.model_name)
        .bind(i64::from(entry.tokens_used))
        .bind(i64::try_from(entry.latency_ms).unwrap_or(i64::MAX))
        .bind(&entry.module_tag)
        .bind(entry.success)
        .bind(entry.timestamp.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| ludo_llm::Error::Usage(e.to_string()))?;

        debug!(module_tag = %entry.module_tag, "Usage entry stored");
        Ok(())
    }
}
