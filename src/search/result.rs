use std::{
    fmt::{self, Debug, Formatter},
    hash::Hash,
};

use bitvec::vec::BitVec;
use derivative::Derivative;

use super::{EdgeKind, Order};
use crate::{
    graph::Graph,
    node_index::NodeIndex,
    tracing_support::{trace, warn},
};

/// How a discovered node was reached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum Parent {
    Root,
    Edge { from: NodeIndex, weight: f64 },
}

/// The record of a single traversal.
///
/// Built up by the search engine while it runs and handed back read-only
/// when it returns.  A search that was stopped by a callback still yields a
/// valid result covering exactly the work done up to that point; see
/// [`Self::is_complete`].
///
/// Invariants: a node has a parent entry iff it was discovered, it is
/// processed iff all of its outgoing edges were examined, and every processed
/// node was discovered.
#[derive(Derivative)]
#[derivative(Clone(bound = ""))]
pub struct SearchResult<'g, T> {
    pub(super) graph: &'g Graph<T>,
    pub(super) root: NodeIndex,
    /// `None` for breadth-first searches.
    pub(super) order: Option<Order>,
    pub(super) parents: Vec<Option<Parent>>,
    pub(super) discovered: BitVec,
    pub(super) processed: BitVec,
    pub(super) num_discovered: usize,
    /// Nodes in the order the traversal emitted them.
    pub(super) visited: Vec<NodeIndex>,
    /// Nodes in the order they finished.
    pub(super) finished: Vec<NodeIndex>,
    pub(super) entry: Vec<Option<usize>>,
    pub(super) exit: Vec<Option<usize>>,
    pub(super) clock: usize,
    pub(super) complete: bool,
}

impl<'g, T> SearchResult<'g, T> {
    pub(super) fn new(graph: &'g Graph<T>, root: NodeIndex, order: Option<Order>) -> Self {
        let bound = graph.node_bound();
        let timed = if order.is_some() { bound } else { 0 };
        let mut result = Self {
            graph,
            root,
            order,
            parents: vec![None; bound],
            discovered: BitVec::repeat(false, bound),
            processed: BitVec::repeat(false, bound),
            num_discovered: 0,
            visited: Vec::new(),
            finished: Vec::new(),
            entry: vec![None; timed],
            exit: vec![None; timed],
            clock: 0,
            complete: true,
        };
        result.discover(root, Parent::Root);
        result
    }

    /// Starts another traversal from `root`, which must not have been
    /// discovered yet, keeping everything recorded so far.
    pub(super) fn restart(&mut self, root: NodeIndex) {
        self.root = root;
        self.discover(root, Parent::Root);
    }

    pub(super) fn discover(&mut self, node: NodeIndex, parent: Parent) {
        self.parents[node.index()] = Some(parent);
        self.discovered.set(node.index(), true);
        self.num_discovered += 1;
        trace!(node = node.index(), "discovered");
    }

    pub(super) fn is_discovered_at(&self, node: NodeIndex) -> bool {
        self.discovered[node.index()]
    }

    pub(super) fn is_processed_at(&self, node: NodeIndex) -> bool {
        self.processed[node.index()]
    }

    pub(super) fn parent_at(&self, node: NodeIndex) -> Option<NodeIndex> {
        match self.parents[node.index()] {
            Some(Parent::Edge { from, .. }) => Some(from),
            _ => None,
        }
    }

    pub(super) fn enter(&mut self, node: NodeIndex) {
        if self.order.is_some() {
            self.clock += 1;
            self.entry[node.index()] = Some(self.clock);
        }
    }

    pub(super) fn emit(&mut self, node: NodeIndex) {
        self.visited.push(node);
    }

    pub(super) fn finish(&mut self, node: NodeIndex) {
        self.processed.set(node.index(), true);
        self.finished.push(node);
        if self.order.is_some() {
            self.clock += 1;
            self.exit[node.index()] = Some(self.clock);
        }
    }

    fn entry_at(&self, node: NodeIndex) -> Option<usize> {
        self.entry.get(node.index()).copied().flatten()
    }

    fn exit_at(&self, node: NodeIndex) -> Option<usize> {
        self.exit.get(node.index()).copied().flatten()
    }

    /// Classifies an edge to an already-discovered node while a depth-first
    /// search is running.
    pub(super) fn classify_live(&self, from: NodeIndex, to: NodeIndex) -> EdgeKind {
        if !self.is_processed_at(to) {
            return EdgeKind::Back;
        }
        match (self.entry_at(from), self.entry_at(to)) {
            (Some(from_entry), Some(to_entry)) if to_entry > from_entry => EdgeKind::Forward,
            (Some(from_entry), Some(to_entry)) if to_entry < from_entry => EdgeKind::Cross,
            (from_entry, to_entry) => {
                warn!(
                    ?from,
                    ?to,
                    ?from_entry,
                    ?to_entry,
                    "unclassifiable edge to a finished node; treating it as a cross edge"
                );
                EdgeKind::Cross
            }
        }
    }

    /// The node the search started from.
    pub fn root(&self) -> &'g T {
        self.graph.value(self.root)
    }

    /// The emission order of a depth-first search, or `None` for a
    /// breadth-first search.
    pub fn order(&self) -> Option<Order> {
        self.order
    }

    /// False if a callback stopped the search early.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Nodes in the order the traversal visited them.  For a breadth-first
    /// search and a pre-order depth-first search this is the discovery
    /// order; for post-order it is the finishing order.
    pub fn visited(&self) -> impl Iterator<Item = &'g T> + '_ {
        self.visited.iter().map(|&node| self.graph.value(node))
    }

    /// Nodes whose outgoing edges have all been examined, in the order they
    /// finished.
    pub fn processed(&self) -> impl Iterator<Item = &'g T> + '_ {
        self.finished.iter().map(|&node| self.graph.value(node))
    }

    pub(crate) fn processed_indices(&self) -> &[NodeIndex] {
        &self.finished
    }

    pub fn num_discovered(&self) -> usize {
        self.num_discovered
    }

    pub fn num_processed(&self) -> usize {
        self.finished.len()
    }
}

impl<'g, T> SearchResult<'g, T>
where
    T: Eq + Hash + Clone,
{
    fn index_of(&self, node: &T) -> Option<NodeIndex> {
        self.graph
            .node_index(node)
            .filter(|index| index.index() < self.parents.len())
    }

    pub fn is_discovered(&self, node: &T) -> bool {
        self.index_of(node)
            .is_some_and(|index| self.is_discovered_at(index))
    }

    pub fn is_processed(&self, node: &T) -> bool {
        self.index_of(node)
            .is_some_and(|index| self.is_processed_at(index))
    }

    /// The node that discovered `node` and the weight of the discovering
    /// edge.  `None` for the root and for undiscovered nodes.
    pub fn parent(&self, node: &T) -> Option<(&'g T, f64)> {
        match self.parents[self.index_of(node)?.index()]? {
            Parent::Root => None,
            Parent::Edge { from, weight } => Some((self.graph.value(from), weight)),
        }
    }

    /// The chain of discovering edges from the root to `node`, as
    /// `[root, ..., node]`.  Empty if `node` was never discovered.
    pub fn path_to(&self, node: &T) -> Vec<&'g T> {
        let Some(mut current) = self.index_of(node) else {
            return Vec::new();
        };
        if !self.is_discovered_at(current) {
            return Vec::new();
        }
        let mut path = vec![current];
        // A well-formed parent chain is never longer than the number of
        // discovered nodes.
        while let Some(parent) = self.parent_at(current) {
            if path.len() >= self.num_discovered {
                warn!(discovered = self.num_discovered, "parent chain does not reach the root");
                break;
            }
            path.push(parent);
            current = parent;
        }
        path.into_iter()
            .rev()
            .map(|index| self.graph.value(index))
            .collect()
    }

    /// Number of tree edges between the root and `node`.
    pub fn distance_to(&self, node: &T) -> Option<usize> {
        let path = self.path_to(node);
        (!path.is_empty()).then(|| path.len() - 1)
    }

    /// The clock value when a depth-first search entered `node`.
    pub fn entry_time(&self, node: &T) -> Option<usize> {
        self.entry_at(self.index_of(node)?)
    }

    /// The clock value when a depth-first search finished `node`.
    pub fn exit_time(&self, node: &T) -> Option<usize> {
        self.exit_at(self.index_of(node)?)
    }

    /// Classifies the edge `from -> to` after the fact.  `None` if there is
    /// no such edge or the search never discovered both ends.
    ///
    /// For a depth-first search the entry and exit times decide between
    /// back, forward and cross edges; a breadth-first search only
    /// distinguishes tree edges from the rest.
    pub fn classify_edge(&self, from: &T, to: &T) -> Option<EdgeKind> {
        let from_index = self.index_of(from)?;
        let to_index = self.index_of(to)?;
        if !self.graph.has_edge(from, to)
            || !self.is_discovered_at(from_index)
            || !self.is_discovered_at(to_index)
        {
            return None;
        }
        let tree = self.parent_at(to_index) == Some(from_index)
            || !self.graph.is_directed() && self.parent_at(from_index) == Some(to_index);
        if tree {
            return Some(EdgeKind::Tree);
        }
        if self.order.is_none() {
            return Some(EdgeKind::NonTree);
        }
        let span = |index| Some((self.entry_at(index)?, self.exit_at(index)));
        Some(match (span(from_index), span(to_index)) {
            (Some(from_span), Some(to_span)) => {
                if nested(from_span, to_span) {
                    EdgeKind::Back
                } else if nested(to_span, from_span) {
                    EdgeKind::Forward
                } else {
                    EdgeKind::Cross
                }
            }
            _ => EdgeKind::Cross,
        })
    }
}

/// Whether the `(entry, exit)` interval `inner` lies within `outer`.  A
/// missing exit time means the node is still open.
fn nested(inner: (usize, Option<usize>), outer: (usize, Option<usize>)) -> bool {
    inner.0 >= outer.0
        && match (inner.1, outer.1) {
            (_, None) => true,
            (Some(inner_exit), Some(outer_exit)) => inner_exit <= outer_exit,
            (None, Some(_)) => false,
        }
}

impl<'g, T> Debug for SearchResult<'g, T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchResult")
            .field("root", self.root())
            .field("order", &self.order)
            .field("visited", &self.visited().collect::<Vec<_>>())
            .field("processed", &self.processed().collect::<Vec<_>>())
            .field("complete", &self.complete)
            .finish()
    }
}
