//! Graph module - the idea graph synthesised from a session's feedback.

mod corpus;
mod errors;
mod model;
mod validation;

pub use corpus::{build_corpus, contributors, graph_user_prompt, GRAPH_SYSTEM_PROMPT};
pub use errors::GraphError;
pub use model::{
    EdgeKind, GraphEdge, GraphNode, GraphSummary, IdeaGraph, NodeType, GRAPH_SCHEMA_NAME,
    MAX_SCORE, MIN_SCORE,
};
pub use validation::{normalize, GraphValidationError};
