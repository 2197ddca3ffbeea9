//! HTTP handler for graph generation.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::adapters::http::error::ApiError;
use crate::application::handlers::GenerateGraphHandler;
use crate::domain::foundation::SessionCode;

use super::dto::{GenerateGraphRequest, GraphResponse};

#[derive(Clone)]
pub struct GraphHandlers {
    generate_handler: Arc<GenerateGraphHandler>,
}

impl GraphHandlers {
    pub fn new(generate_handler: Arc<GenerateGraphHandler>) -> Self {
        Self { generate_handler }
    }
}

/// POST /api/generate-graph
pub async fn generate_graph(
    State(handlers): State<GraphHandlers>,
    Json(req): Json<GenerateGraphRequest>,
) -> Result<Json<GraphResponse>, ApiError> {
    let code = SessionCode::parse(&req.session_id)?;
    let result = handlers.generate_handler.handle(&code).await?;
    Ok(Json(GraphResponse::from(result)))
}
