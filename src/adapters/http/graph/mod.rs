//! HTTP adapter for idea graph generation.

mod dto;
mod handlers;
mod routes;

pub use dto::{GenerateGraphRequest, GraphEdgeResponse, GraphResponse};
pub use handlers::GraphHandlers;
pub use routes::graph_routes;
