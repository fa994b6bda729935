//! Fully dynamic connectivity: edge insertions, edge deletions and connectivity queries on an
//! undirected graph, using a level decomposition of spanning forests stored as Euler tours in
//! treaps.

pub mod dynamic_graph;
pub mod error;
pub mod euler_tour_forest;
pub mod level_graph;
pub mod treap;

pub use dynamic_graph::DynamicGraph;
pub use error::{Error, InvalidArgument, Result};
