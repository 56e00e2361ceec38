pub use crate::coloring::TwoColoring;
pub use crate::directedness::Directedness;
pub use crate::error::GraphError;
pub use crate::graph::Graph;
pub use crate::node_index::NodeIndex;
pub use crate::search::{Control, EdgeEvent, EdgeKind, Order, SearchResult, Visitor};
