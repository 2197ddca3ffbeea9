//! Graph handlers.

mod generate_graph;

pub use generate_graph::{GenerateGraphHandler, GraphResult};
