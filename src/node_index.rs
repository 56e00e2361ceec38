/// A stable handle to a node in a [`Graph`](crate::Graph).
///
/// Handles index the graph's node arena.  They stay valid across insertions
/// and across removal of *other* nodes; the handle of a removed node is never
/// reused by the same graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub(crate) fn new(index: usize) -> Self {
        NodeIndex(index)
    }

    /// The position of this node's slot in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<NodeIndex> for usize {
    fn from(value: NodeIndex) -> Self {
        value.0
    }
}
