//! HTTP routes for graph generation.

use axum::{routing::post, Router};

use super::handlers::{generate_graph, GraphHandlers};

pub fn graph_routes(handlers: GraphHandlers) -> Router {
    Router::new()
        .route("/api/generate-graph", post(generate_graph))
        .with_state(handlers)
}
