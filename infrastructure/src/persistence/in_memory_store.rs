// ./infrastructure/src/persistence/in_memory_store.rs
use application::{ApplicationError, ListFilter, MessageStore, NewMessage};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use domain::Message;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

// --- In-Memory Store Implementation ---

/// Message store backed by a concurrent in-memory map.
///
/// DashMap guards the id -> Message mapping against concurrent request
/// handling; contents are lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageStore {
    // Message ID -> Message
    messages: Arc<DashMap<String, Message>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    #[instrument(skip(self, payload))]
    async fn create(&self, payload: NewMessage) -> Result<Message, ApplicationError> {
        let msg = Message {
            id: Uuid::new_v4().to_string(),
            text: payload.text,
            palindrome: payload.palindrome,
            created_at: Utc::now(),
        };
        debug!(id = %msg.id, "Saving message to in-memory store");
        self.messages.insert(msg.id.clone(), msg.clone());
        Ok(msg)
    }

    #[instrument(skip(self))]
    async fn read(&self, id: &str) -> Result<Option<Message>, ApplicationError> {
        debug!(id = %id, "Getting message from in-memory store");
        // Get returns a Ref, so we clone the Message out of it
        Ok(self.messages.get(id).map(|msg_ref| msg_ref.clone()))
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: ListFilter) -> Result<Vec<Message>, ApplicationError> {
        debug!(filter = ?filter.palindrome, "Listing messages from in-memory store");
        let msgs = self
            .messages
            .iter()
            .filter(|entry| {
                filter
                    .palindrome
                    .is_none_or(|p| entry.value().palindrome == p)
            })
            .map(|entry| entry.value().clone())
            .collect();
        Ok(msgs)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<bool, ApplicationError> {
        debug!(id = %id, "Deleting message from in-memory store");
        Ok(self.messages.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(text: &str, palindrome: bool) -> NewMessage {
        NewMessage {
            text: text.to_string(),
            palindrome,
        }
    }

    #[tokio::test]
    async fn create_assigns_unique_ids() {
        let store = InMemoryMessageStore::new();
        let a = store.create(payload("abba", true)).await.unwrap();
        let b = store.create(payload("abba", true)).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn create_then_read_round_trips() {
        let store = InMemoryMessageStore::new();
        let created = store.create(payload("racecar", true)).await.unwrap();
        let fetched = store.read(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn read_unknown_id_is_none() {
        let store = InMemoryMessageStore::new();
        assert_eq!(store.read("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_honours_palindrome_filter() {
        let store = InMemoryMessageStore::new();
        store.create(payload("racecar", true)).await.unwrap();
        store.create(payload("abba", true)).await.unwrap();
        store.create(payload("hello", false)).await.unwrap();

        let all = store.list(ListFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let palindromes = store
            .list(ListFilter {
                palindrome: Some(true),
            })
            .await
            .unwrap();
        assert_eq!(palindromes.len(), 2);
        assert!(palindromes.iter().all(|m| m.palindrome));

        let rest = store
            .list(ListFilter {
                palindrome: Some(false),
            })
            .await
            .unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].text, "hello");
    }

    #[tokio::test]
    async fn delete_reports_absence() {
        let store = InMemoryMessageStore::new();
        let created = store.create(payload("abba", true)).await.unwrap();
        assert!(store.delete(&created.id).await.unwrap());
        assert!(!store.delete(&created.id).await.unwrap());
        assert_eq!(store.read(&created.id).await.unwrap(), None);
    }
}
