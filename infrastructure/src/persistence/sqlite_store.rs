// ./infrastructure/src/persistence/sqlite_store.rs
use application::{ApplicationError, ListFilter, MessageStore, NewMessage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::Message;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, error, instrument};
use uuid::Uuid;

// --- SQLite Store Implementation ---

const CREATE_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS messages (
    id         TEXT PRIMARY KEY,
    text       TEXT NOT NULL,
    palindrome INTEGER NOT NULL,
    created_at TEXT NOT NULL
)";

/// Row shape for the `messages` table; kept separate from the domain entity
/// so database column mapping stays out of `domain`.
#[derive(sqlx::FromRow)]
struct MessageRow {
    id: String,
    text: String,
    palindrome: bool,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: row.id,
            text: row.text,
            palindrome: row.palindrome,
            created_at: row.created_at,
        }
    }
}

/// Message store backed by a SQLite database via sqlx.
///
/// The `messages` table is created on connect if it does not exist. Absent
/// rows surface as `None` / `false` per the `MessageStore` contract.
#[derive(Debug, Clone)]
pub struct SqliteMessageStore {
    pool: SqlitePool,
}

impl SqliteMessageStore {
    /// Connects to the database at `url` (e.g. `sqlite://messages.db?mode=rwc`)
    /// and ensures the schema exists.
    pub async fn connect(url: &str) -> Result<Self, ApplicationError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| {
                error!(url = %url, "Failed to connect to SQLite database: {}", e);
                ApplicationError::Store(format!("database connection failed: {}", e))
            })?;
        Self::with_pool(pool).await
    }

    /// Wraps an existing pool, ensuring the schema exists.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, ApplicationError> {
        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(store_error)?;
        Ok(Self { pool })
    }
}

fn store_error(e: sqlx::Error) -> ApplicationError {
    error!("SQLite operation failed: {}", e);
    ApplicationError::Store(e.to_string())
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    #[instrument(skip(self, payload))]
    async fn create(&self, payload: NewMessage) -> Result<Message, ApplicationError> {
        let msg = Message {
            id: Uuid::new_v4().to_string(),
            text: payload.text,
            palindrome: payload.palindrome,
            created_at: Utc::now(),
        };
        debug!(id = %msg.id, "Inserting message into SQLite store");
        sqlx::query("INSERT INTO messages (id, text, palindrome, created_at) VALUES (?, ?, ?, ?)")
            .bind(&msg.id)
            .bind(&msg.text)
            .bind(msg.palindrome)
            .bind(msg.created_at)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(msg)
    }

    #[instrument(skip(self))]
    async fn read(&self, id: &str) -> Result<Option<Message>, ApplicationError> {
        debug!(id = %id, "Fetching message from SQLite store");
        let row = sqlx::query_as::<_, MessageRow>(
            "SELECT id, text, palindrome, created_at FROM messages WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(row.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: ListFilter) -> Result<Vec<Message>, ApplicationError> {
        debug!(filter = ?filter.palindrome, "Listing messages from SQLite store");
        let rows = match filter.palindrome {
            Some(palindrome) => {
                sqlx::query_as::<_, MessageRow>(
                    "SELECT id, text, palindrome, created_at FROM messages WHERE palindrome = ?",
                )
                .bind(palindrome)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, MessageRow>(
                    "SELECT id, text, palindrome, created_at FROM messages",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(store_error)?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<bool, ApplicationError> {
        debug!(id = %id, "Deleting message from SQLite store");
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }
}
