pub mod in_memory_store;
pub mod sqlite_store;

// Re-export both store types
pub use in_memory_store::InMemoryMessageStore;
pub use sqlite_store::SqliteMessageStore;
