//! Request and response bodies for graph generation.

use serde::{Deserialize, Serialize};

use crate::application::handlers::GraphResult;
use crate::domain::graph::{EdgeKind, GraphNode, GraphSummary};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateGraphRequest {
    #[serde(default)]
    pub session_id: String,
}

/// An edge annotated with the kind derived from its endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdgeResponse {
    pub id: String,
    pub from: String,
    pub to: String,
    pub relation: String,
    pub strength: f64,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphResponse {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdgeResponse>,
    pub summary: GraphSummary,
}

impl From<GraphResult> for GraphResponse {
    fn from(result: GraphResult) -> Self {
        let GraphResult { graph, edge_kinds } = result;
        let edges = graph
            .edges
            .into_iter()
            .zip(edge_kinds)
            .map(|(edge, kind)| GraphEdgeResponse {
                id: edge.id,
                from: edge.from,
                to: edge.to,
                relation: edge.relation,
                strength: edge.strength,
                kind,
            })
            .collect();

        Self {
            nodes: graph.nodes,
            edges,
            summary: graph.summary,
        }
    }
}
