//! Normalisation and validation of provider-produced graphs.
//!
//! The provider is constrained by a schema but its output is still checked
//! here before it reaches a caller.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::model::{IdeaGraph, MAX_SCORE, MIN_SCORE};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphValidationError {
    #[error("node at position {0} has an empty id")]
    EmptyNodeId(usize),

    #[error("duplicate node id '{0}'")]
    DuplicateNodeId(String),

    #[error("{owner} '{id}' has a non-finite {field}")]
    NonFiniteScore {
        owner: &'static str,
        id: String,
        field: &'static str,
    },

    #[error("edge '{edge}' references unknown node '{node}'")]
    DanglingEdge { edge: String, node: String },
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(MIN_SCORE, MAX_SCORE)
}

/// Cleans up a graph and checks its structural invariants.
///
/// Scores are clamped into range, edge ids are made unique (blank or repeated
/// ids become `edge-{from}-{to}`, suffixed `-n` on collision). Non-finite
/// scores, empty or duplicate node ids, and edges to unknown nodes are
/// rejected.
pub fn normalize(mut graph: IdeaGraph) -> Result<IdeaGraph, GraphValidationError> {
    let mut node_ids = HashSet::with_capacity(graph.nodes.len());
    for (position, node) in graph.nodes.iter_mut().enumerate() {
        let id = node.id().to_string();
        if id.trim().is_empty() {
            return Err(GraphValidationError::EmptyNodeId(position));
        }
        if !node_ids.insert(id.clone()) {
            return Err(GraphValidationError::DuplicateNodeId(id));
        }
        let (field, score) = node.score_mut();
        if !score.is_finite() {
            return Err(GraphValidationError::NonFiniteScore {
                owner: "node",
                id,
                field,
            });
        }
        *score = clamp_score(*score);
    }

    for edge in &mut graph.edges {
        if !edge.strength.is_finite() {
            return Err(GraphValidationError::NonFiniteScore {
                owner: "edge",
                id: edge.id.clone(),
                field: "strength",
            });
        }
        edge.strength = clamp_score(edge.strength);

        for endpoint in [&edge.from, &edge.to] {
            if !node_ids.contains(endpoint.as_str()) {
                return Err(GraphValidationError::DanglingEdge {
                    edge: edge.id.clone(),
                    node: endpoint.clone(),
                });
            }
        }
    }

    assign_edge_ids(&mut graph);
    Ok(graph)
}

fn assign_edge_ids(graph: &mut IdeaGraph) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut collisions: HashMap<String, usize> = HashMap::new();

    for edge in &mut graph.edges {
        let current = edge.id.trim();
        if !current.is_empty() && !seen.contains(current) {
            edge.id = current.to_string();
            seen.insert(edge.id.clone());
            continue;
        }

        let base = format!("edge-{}-{}", edge.from, edge.to);
        let mut candidate = base.clone();
        while seen.contains(&candidate) {
            let n = collisions.entry(base.clone()).or_insert(1);
            *n += 1;
            candidate = format!("{}-{}", base, n);
        }
        edge.id = candidate;
        seen.insert(edge.id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::{GraphEdge, GraphNode, GraphSummary};
    use proptest::prelude::*;

    fn idea(id: &str, importance: f64) -> GraphNode {
        GraphNode::Idea {
            id: id.into(),
            label: id.into(),
            category: "general".into(),
            importance,
            details: String::new(),
        }
    }

    fn edge(id: &str, from: &str, to: &str, strength: f64) -> GraphEdge {
        GraphEdge {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            relation: "supports".into(),
            strength,
        }
    }

    fn graph(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> IdeaGraph {
        IdeaGraph {
            nodes,
            edges,
            summary: GraphSummary::default(),
        }
    }

    #[test]
    fn clamps_scores_into_range() {
        let g = normalize(graph(
            vec![idea("a", 14.0), idea("b", -3.0)],
            vec![edge("e1", "a", "b", 0.0)],
        ))
        .unwrap();

        assert!(matches!(g.nodes[0], GraphNode::Idea { importance, .. } if importance == 10.0));
        assert!(matches!(g.nodes[1], GraphNode::Idea { importance, .. } if importance == 1.0));
        assert_eq!(g.edges[0].strength, 1.0);
    }

    #[test]
    fn rejects_non_finite_score() {
        let err = normalize(graph(vec![idea("a", f64::NAN)], vec![])).unwrap_err();
        assert!(matches!(err, GraphValidationError::NonFiniteScore { field: "importance", .. }));
    }

    #[test]
    fn rejects_duplicate_node_ids() {
        let err = normalize(graph(vec![idea("a", 5.0), idea("a", 6.0)], vec![])).unwrap_err();
        assert_eq!(err, GraphValidationError::DuplicateNodeId("a".into()));
    }

    #[test]
    fn rejects_blank_node_id() {
        let err = normalize(graph(vec![idea("a", 5.0), idea(" ", 6.0)], vec![])).unwrap_err();
        assert_eq!(err, GraphValidationError::EmptyNodeId(1));
    }

    #[test]
    fn rejects_dangling_edge() {
        let err = normalize(graph(
            vec![idea("a", 5.0)],
            vec![edge("e1", "a", "ghost", 5.0)],
        ))
        .unwrap_err();
        assert_eq!(
            err,
            GraphValidationError::DanglingEdge {
                edge: "e1".into(),
                node: "ghost".into()
            }
        );
    }

    #[test]
    fn regenerates_blank_and_duplicate_edge_ids() {
        let g = normalize(graph(
            vec![idea("a", 5.0), idea("b", 5.0)],
            vec![
                edge("", "a", "b", 5.0),
                edge("e1", "b", "a", 5.0),
                edge("e1", "a", "b", 5.0),
                edge("", "a", "b", 5.0),
            ],
        ))
        .unwrap();

        let ids: Vec<_> = g.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["edge-a-b", "e1", "edge-a-b-2", "edge-a-b-3"]);
    }

    proptest! {
        #[test]
        fn normalized_graph_is_well_formed(
            node_count in 1usize..6,
            scores in prop::collection::vec(-50.0f64..50.0, 6),
            raw_edges in prop::collection::vec((0usize..6, 0usize..6, 0usize..3), 0..10),
        ) {
            let nodes: Vec<_> = (0..node_count)
                .map(|i| idea(&format!("n{}", i), scores[i]))
                .collect();
            let edges: Vec<_> = raw_edges
                .into_iter()
                .map(|(f, t, id)| {
                    let f = f % node_count;
                    let t = t % node_count;
                    let id = if id == 0 { String::new() } else { format!("e{}", id) };
                    edge(&id, &format!("n{}", f), &format!("n{}", t), 20.0)
                })
                .collect();

            let g = normalize(graph(nodes, edges)).unwrap();

            let node_ids: HashSet<_> = g.nodes.iter().map(|n| n.id().to_string()).collect();
            prop_assert_eq!(node_ids.len(), g.nodes.len());

            let mut edge_ids = HashSet::new();
            for e in &g.edges {
                prop_assert!(node_ids.contains(&e.from));
                prop_assert!(node_ids.contains(&e.to));
                prop_assert!(edge_ids.insert(e.id.clone()));
                prop_assert!((MIN_SCORE..=MAX_SCORE).contains(&e.strength));
            }
        }
    }
}
