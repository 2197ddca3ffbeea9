//! Idea graph data model.
//!
//! Nodes are a tagged union on `type`; the wire shape is what the graph
//! renderer consumes, so field names follow the client's camelCase.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Name under which the graph schema is registered with the provider.
pub const GRAPH_SCHEMA_NAME: &str = "graph_analysis";

/// Lowest score accepted on importance, relevance, contribution, strength.
pub const MIN_SCORE: f64 = 1.0;

/// Highest score accepted on importance, relevance, contribution, strength.
pub const MAX_SCORE: f64 = 10.0;

/// A node in the idea graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GraphNode {
    Idea {
        id: String,
        label: String,
        category: String,
        importance: f64,
        details: String,
    },
    Theme {
        id: String,
        label: String,
        relevance: f64,
        summary: String,
    },
    User {
        id: String,
        label: String,
        contribution: f64,
    },
}

/// Discriminant of a [`GraphNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Idea,
    Theme,
    User,
}

impl GraphNode {
    pub fn id(&self) -> &str {
        match self {
            GraphNode::Idea { id, .. } | GraphNode::Theme { id, .. } | GraphNode::User { id, .. } => {
                id
            }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            GraphNode::Idea { label, .. }
            | GraphNode::Theme { label, .. }
            | GraphNode::User { label, .. } => label,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            GraphNode::Idea { .. } => NodeType::Idea,
            GraphNode::Theme { .. } => NodeType::Theme,
            GraphNode::User { .. } => NodeType::User,
        }
    }

    /// The node's single numeric score and its field name.
    pub(crate) fn score_mut(&mut self) -> (&'static str, &mut f64) {
        match self {
            GraphNode::Idea { importance, .. } => ("importance", importance),
            GraphNode::Theme { relevance, .. } => ("relevance", relevance),
            GraphNode::User { contribution, .. } => ("contribution", contribution),
        }
    }
}

/// A weighted, labelled connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Regenerated during normalisation when blank or missing.
    #[serde(default)]
    pub id: String,
    pub from: String,
    pub to: String,
    pub relation: String,
    pub strength: f64,
}

/// How an edge connects node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    UserToIdea,
    IdeaToTheme,
    ThemeToTheme,
    ThemeToIdea,
    Other,
}

impl EdgeKind {
    pub fn classify(from: NodeType, to: NodeType) -> Self {
        match (from, to) {
            (NodeType::User, NodeType::Idea) => EdgeKind::UserToIdea,
            (NodeType::Idea, NodeType::Theme) => EdgeKind::IdeaToTheme,
            (NodeType::Theme, NodeType::Theme) => EdgeKind::ThemeToTheme,
            (NodeType::Theme, NodeType::Idea) => EdgeKind::ThemeToIdea,
            _ => EdgeKind::Other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    pub main_themes: Vec<String>,
    pub key_insights: Vec<String>,
    pub potential_actions: Vec<String>,
}

/// The extracted graph for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub summary: GraphSummary,
}

impl IdeaGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    /// Classifies every edge, in edge order. Edges with an unknown endpoint
    /// classify as `Other`.
    pub fn edge_kinds(&self) -> Vec<EdgeKind> {
        let types: HashMap<&str, NodeType> = self
            .nodes
            .iter()
            .map(|n| (n.id(), n.node_type()))
            .collect();

        self.edges
            .iter()
            .map(|edge| {
                match (types.get(edge.from.as_str()), types.get(edge.to.as_str())) {
                    (Some(from), Some(to)) => EdgeKind::classify(*from, *to),
                    _ => EdgeKind::Other,
                }
            })
            .collect()
    }

    /// Strict JSON schema for provider structured output.
    pub fn schema() -> Value {
        let string = json!({ "type": "string" });
        let number = json!({ "type": "number" });
        let strings = json!({ "type": "array", "items": { "type": "string" } });

        json!({
            "type": "object",
            "properties": {
                "nodes": {
                    "type": "array",
                    "items": {
                        "anyOf": [
                            {
                                "type": "object",
                                "properties": {
                                    "id": string, "label": string,
                                    "type": { "type": "string", "enum": ["idea"] },
                                    "category": string, "importance": number, "details": string
                                },
                                "required": ["id", "label", "type", "category", "importance", "details"],
                                "additionalProperties": false
                            },
                            {
                                "type": "object",
                                "properties": {
                                    "id": string, "label": string,
                                    "type": { "type": "string", "enum": ["theme"] },
                                    "relevance": number, "summary": string
                                },
                                "required": ["id", "label", "type", "relevance", "summary"],
                                "additionalProperties": false
                            },
                            {
                                "type": "object",
                                "properties": {
                                    "id": string, "label": string,
                                    "type": { "type": "string", "enum": ["user"] },
                                    "contribution": number
                                },
                                "required": ["id", "label", "type", "contribution"],
                                "additionalProperties": false
                            }
                        ]
                    }
                },
                "edges": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": string, "from": string, "to": string,
                            "relation": string, "strength": number
                        },
                        "required": ["id", "from", "to", "relation", "strength"],
                        "additionalProperties": false
                    }
                },
                "summary": {
                    "type": "object",
                    "properties": {
                        "mainThemes": strings,
                        "keyInsights": strings,
                        "potentialActions": strings
                    },
                    "required": ["mainThemes", "keyInsights", "potentialActions"],
                    "additionalProperties": false
                }
            },
            "required": ["nodes", "edges", "summary"],
            "additionalProperties": false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_deserialize_by_type_tag() {
        let nodes: Vec<GraphNode> = serde_json::from_value(json!([
            { "type": "idea", "id": "i1", "label": "Ship faster", "category": "process",
              "importance": 8, "details": "Smaller releases" },
            { "type": "theme", "id": "t1", "label": "Delivery", "relevance": 9, "summary": "Pace" },
            { "type": "user", "id": "u1", "label": "Ana", "contribution": 7 }
        ]))
        .unwrap();

        let types: Vec<_> = nodes.iter().map(GraphNode::node_type).collect();
        assert_eq!(types, vec![NodeType::Idea, NodeType::Theme, NodeType::User]);
        assert_eq!(nodes[2].label(), "Ana");
    }

    #[test]
    fn node_missing_variant_field_is_rejected() {
        let result: Result<GraphNode, _> =
            serde_json::from_value(json!({ "type": "theme", "id": "t1", "label": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_node_type_is_rejected() {
        let result: Result<GraphNode, _> =
            serde_json::from_value(json!({ "type": "team", "id": "x", "label": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn edge_kinds_follow_endpoint_types() {
        let graph = IdeaGraph {
            nodes: vec![
                GraphNode::User { id: "u".into(), label: "Ana".into(), contribution: 5.0 },
                GraphNode::Idea {
                    id: "i".into(),
                    label: "Idea".into(),
                    category: "c".into(),
                    importance: 5.0,
                    details: String::new(),
                },
                GraphNode::Theme {
                    id: "t".into(),
                    label: "Theme".into(),
                    relevance: 5.0,
                    summary: String::new(),
                },
            ],
            edges: vec![
                edge("u", "i"),
                edge("i", "t"),
                edge("t", "t"),
                edge("t", "i"),
                edge("i", "u"),
                edge("u", "missing"),
            ],
            summary: GraphSummary::default(),
        };

        assert_eq!(
            graph.edge_kinds(),
            vec![
                EdgeKind::UserToIdea,
                EdgeKind::IdeaToTheme,
                EdgeKind::ThemeToTheme,
                EdgeKind::ThemeToIdea,
                EdgeKind::Other,
                EdgeKind::Other,
            ]
        );
    }

    #[test]
    fn summary_uses_camel_case() {
        let json = serde_json::to_value(GraphSummary {
            main_themes: vec!["a".into()],
            key_insights: vec![],
            potential_actions: vec![],
        })
        .unwrap();
        assert_eq!(json["mainThemes"][0], "a");
        assert!(json.get("keyInsights").is_some());
    }

    fn edge(from: &str, to: &str) -> GraphEdge {
        GraphEdge {
            id: format!("{}-{}", from, to),
            from: from.into(),
            to: to.into(),
            relation: "relates".into(),
            strength: 5.0,
        }
    }
}
