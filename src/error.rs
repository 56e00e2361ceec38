use thiserror::Error;

/// Errors reported by graph mutation and traversal.
///
/// Absence is not an error: queries such as [`Graph::has_edge`] or
/// [`Graph::remove_edge`] on unknown nodes simply return `false`.
///
/// [`Graph::has_edge`]: crate::Graph::has_edge
/// [`Graph::remove_edge`]: crate::Graph::remove_edge
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// A traversal was started from a node that is not in the graph, or no
    /// start node was given and the graph is empty.  Holds the `Debug`
    /// rendering of the requested node, or `None` for the empty-graph case.
    #[error("no such node: {}", .0.as_deref().unwrap_or("graph is empty"))]
    NoSuchNode(Option<String>),

    /// An edge weight that is NaN or infinite.
    #[error("invalid edge weight: {0}")]
    InvalidWeight(f64),
}

impl GraphError {
    pub(crate) fn no_such_node(node: &impl std::fmt::Debug) -> Self {
        GraphError::NoSuchNode(Some(format!("{node:?}")))
    }
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;
