//! HTTP adapters - REST API implementations.
//!
//! Each application area has its own route group; [`build_router`] merges
//! them under the shared tower middleware.

pub mod audio;
pub mod conversation;
pub mod error;
pub mod graph;
pub mod router;
pub mod session;

pub use error::{ApiError, ErrorResponse};
pub use router::{build_router, AppDependencies, AppState};
