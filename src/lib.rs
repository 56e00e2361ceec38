//! In-memory graphs with weighted, directed or undirected edges, and the
//! traversals built on them: breadth-first and depth-first search, connected
//! components and two-coloring.
//!
//! ```
//! use graphwalk::prelude::*;
//!
//! let graph: Graph<u32> = [(0, 1), (0, 2), (0, 3), (1, 4), (3, 7), (3, 5), (1, 2)]
//!     .into_iter()
//!     .collect();
//! let bfs = graph.bfs(&0)?;
//! assert_eq!(bfs.visited().copied().collect::<Vec<_>>(), [0, 1, 2, 3, 4, 7, 5]);
//! let dfs = graph.dfs(&0)?;
//! assert_eq!(dfs.visited().copied().collect::<Vec<_>>(), [0, 1, 4, 2, 3, 7, 5]);
//! # Ok::<(), GraphError>(())
//! ```

pub mod coloring;
pub mod components;
pub mod directedness;
pub mod error;
pub mod graph;
pub mod node_index;
pub mod prelude;
pub mod search;

mod format_debug;
mod tracing_support;

#[cfg(test)]
mod test_support;

pub use crate::coloring::{TwoColoring, two_color};
#[cfg(feature = "pathfinding")]
pub use crate::components::strongly_connected_components;
pub use crate::components::connected_components;
pub use crate::directedness::Directedness;
pub use crate::error::{GraphError, Result};
pub use crate::graph::{DEFAULT_WEIGHT, Graph};
pub use crate::node_index::NodeIndex;
pub use crate::search::{
    Control, EdgeEvent, EdgeKind, Order, SearchResult, Visitor, breadth_first_search,
    depth_first_search,
};
pub use crate::tracing_support::init_tracing;
