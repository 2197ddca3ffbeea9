//! Storage Adapters
//!
//! ## Available Adapters
//!
//! - **InMemoryFeedbackStore** - Stores everything in process memory
//!
//! The PostgreSQL document store lives in `adapters::postgres`.

mod in_memory_store;

pub use in_memory_store::InMemoryFeedbackStore;
