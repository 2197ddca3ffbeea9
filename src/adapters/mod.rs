//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ai` - OpenAI and scripted AI providers
//! - `storage` - In-memory store
//! - `postgres` - PostgreSQL document store
//! - `scheduler` - Delayed follow-up queue and worker
//! - `http` - axum routers

pub mod ai;
pub mod http;
pub mod postgres;
pub mod scheduler;
pub mod storage;
