use async_trait::async_trait;
use domain::{Message, palindrome};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

// --- Application Errors ---
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Message not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Store(String),
}

// --- Infrastructure Interface (Trait) ---

/// Payload used by the service to create a `Message`. The store assigns the
/// id and creation timestamp.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub text: String,
    pub palindrome: bool,
}

/// Optional criteria for listing Messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFilter {
    /// When set, only messages whose stored classification matches are
    /// returned.
    pub palindrome: Option<bool>,
}

/// Interface for storing and retrieving Messages.
///
/// Implementations assign a fresh unique id and the current UTC timestamp on
/// `create`. Absence of an id is signalled with `None` / `false` rather than
/// an error; translating that into a domain error (or swallowing it) is the
/// service's concern.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persists a new Message and returns it.
    async fn create(&self, payload: NewMessage) -> Result<Message, ApplicationError>;
    /// Retrieves a Message by its id. `None` if absent.
    async fn read(&self, id: &str) -> Result<Option<Message>, ApplicationError>;
    /// Lists Messages matching the filter. No ordering guarantee.
    async fn list(&self, filter: ListFilter) -> Result<Vec<Message>, ApplicationError>;
    /// Deletes a Message by its id. Returns true if something was deleted.
    async fn delete(&self, id: &str) -> Result<bool, ApplicationError>;
}

// --- Request Models (Data Transfer Objects - DTOs) ---

/// Request body for creating a Message.
///
/// `text` decodes as optional so that a well-formed JSON body without the
/// field surfaces as a 400 at the transport layer instead of a decode error.
#[derive(Deserialize, Debug)]
pub struct CreateMessageRequest {
    pub text: Option<String>,
}

// --- Application Service (Use Cases) ---

/// Service orchestrating palindrome classification and storage.
///
/// The palindrome mode (strict vs. normalized) is fixed at construction time
/// for the service's lifetime.
pub struct MessageService {
    store: Arc<dyn MessageStore>,
    strict: bool,
}

impl MessageService {
    pub fn new(store: Arc<dyn MessageStore>, strict: bool) -> Self {
        Self { store, strict }
    }

    /// Classifies `text` under the configured mode and persists it.
    #[instrument(skip(self, text))]
    pub async fn create(&self, text: String) -> Result<Message, ApplicationError> {
        let palindrome = if self.strict {
            palindrome::is_palindrome_strict(&text)
        } else {
            palindrome::is_palindrome(&text)
        };
        debug!(palindrome, strict = self.strict, "Text classified");
        let msg = self.store.create(NewMessage { text, palindrome }).await?;
        info!(id = %msg.id, palindrome = msg.palindrome, "Message created");
        Ok(msg)
    }

    /// Fetches a Message by id, mapping storage absence to `NotFound`.
    #[instrument(skip(self))]
    pub async fn read(&self, id: &str) -> Result<Message, ApplicationError> {
        self.store.read(id).await?.ok_or_else(|| {
            warn!(id = %id, "Message not found");
            ApplicationError::NotFound(id.to_string())
        })
    }

    /// Lists Messages, optionally filtered by their palindrome flag.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: ListFilter) -> Result<Vec<Message>, ApplicationError> {
        self.store.list(filter).await
    }

    /// Deletes a Message by id. Deleting an absent id is not an error, so
    /// callers may retry freely.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ApplicationError> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            info!(id = %id, "Message deleted");
        } else {
            debug!(id = %id, "Message already absent on delete");
        }
        Ok(())
    }
}
