//! Arena-backed adjacency storage.
//!
//! A [`Graph`] maps each node value to an ordered list of `(neighbor, weight)`
//! pairs.  Node values are interned into an arena and referred to internally
//! by [`NodeIndex`]; a hash map translates values back to their handles.
//! Neighbor lists keep insertion order, which is what makes traversal order
//! reproducible.
//!
//! The container is not synchronized.  Traversals borrow the graph immutably,
//! so it cannot be mutated while a search is in progress.

use std::{collections::HashMap, hash::Hash};

use derivative::Derivative;

use crate::{
    directedness::Directedness,
    error::{GraphError, Result},
    node_index::NodeIndex,
};

/// The weight given to edges added without an explicit weight.
pub const DEFAULT_WEIGHT: f64 = 1.0;

#[derive(Clone, Debug)]
struct Slot<T> {
    value: T,
    /// Outgoing edges in insertion order.
    out: Vec<(NodeIndex, f64)>,
    /// Position of each target within `out`.
    positions: HashMap<NodeIndex, usize>,
}

impl<T> Slot<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            out: Vec::new(),
            positions: HashMap::new(),
        }
    }

    fn weight_to(&self, target: NodeIndex) -> Option<f64> {
        self.positions.get(&target).map(|&pos| self.out[pos].1)
    }

    fn insert(&mut self, target: NodeIndex, weight: f64) -> bool {
        if self.positions.contains_key(&target) {
            return false;
        }
        self.positions.insert(target, self.out.len());
        self.out.push((target, weight));
        true
    }

    fn remove(&mut self, target: NodeIndex) -> Option<f64> {
        let pos = self.positions.remove(&target)?;
        let (_, weight) = self.out.remove(pos);
        for (shifted, _) in &self.out[pos..] {
            if let Some(p) = self.positions.get_mut(shifted) {
                *p -= 1;
            }
        }
        Some(weight)
    }
}

/// A weighted graph over node values of type `T`.
///
/// At most one edge exists per ordered pair of nodes, and self-loops are
/// allowed.  In an undirected graph every edge is stored in both directions
/// but counted once by [`Self::num_edges`] and [`Self::edge_weight_total`].
#[derive(Derivative)]
#[derivative(Clone(bound = "T: Clone"), Default(bound = ""))]
pub struct Graph<T> {
    directedness: Directedness,
    slots: Vec<Option<Slot<T>>>,
    lookup: HashMap<T, NodeIndex>,
    num_nodes: usize,
    num_edges: usize,
    edge_weight_total: f64,
}

fn check_weight(weight: f64) -> Result<f64> {
    if weight.is_finite() {
        Ok(weight)
    } else {
        Err(GraphError::InvalidWeight(weight))
    }
}

impl<T> Graph<T>
where
    T: Eq + Hash + Clone,
{
    pub fn new(directedness: Directedness) -> Self {
        Self {
            directedness,
            slots: Vec::new(),
            lookup: HashMap::new(),
            num_nodes: 0,
            num_edges: 0,
            edge_weight_total: 0.0,
        }
    }

    pub fn directed() -> Self {
        Self::new(Directedness::Directed)
    }

    pub fn undirected() -> Self {
        Self::new(Directedness::Undirected)
    }

    /// Builds a graph from unit-weight edges, adding nodes as they appear.
    pub fn from_edges(
        directedness: Directedness,
        edges: impl IntoIterator<Item = (T, T)>,
    ) -> Self {
        let mut graph = Self::new(directedness);
        graph.extend(edges);
        graph
    }

    // Nodes

    /// Adds a node with no edges.  Returns `false` if the node was already
    /// present, in which case nothing changes.
    pub fn add_node(&mut self, node: T) -> bool {
        if self.lookup.contains_key(&node) {
            return false;
        }
        self.intern(node);
        true
    }

    /// Returns the handle for `node`, inserting it first if needed.
    fn intern(&mut self, node: T) -> NodeIndex {
        if let Some(&index) = self.lookup.get(&node) {
            return index;
        }
        let index = NodeIndex::new(self.slots.len());
        self.slots.push(Some(Slot::new(node.clone())));
        self.lookup.insert(node, index);
        self.num_nodes += 1;
        index
    }

    /// Removes a node and every edge touching it.  Returns `false` if the
    /// node was not present.
    ///
    /// The node's arena slot is left vacant and never reused, so handles of
    /// other nodes stay valid.  Per-search state is sized by the arena, not
    /// by [`Self::num_nodes`]; a graph with heavy node churn can be rebuilt
    /// with `Graph::from_edges` or [`Self::clear`] to reclaim the slots.
    pub fn remove_node(&mut self, node: &T) -> bool {
        let Some(index) = self.lookup.remove(node) else {
            return false;
        };
        let Some(slot) = self.slots[index.index()].take() else {
            return false;
        };
        for &(target, weight) in &slot.out {
            // Each outgoing entry is one logical edge; in an undirected
            // graph it also has a mirror on the other side.
            if !self.is_directed() && target != index {
                self.slot_mut(target).remove(index);
            }
            self.num_edges -= 1;
            self.edge_weight_total -= weight;
        }
        if self.is_directed() {
            for other in self.slots.iter_mut().flatten() {
                if let Some(weight) = other.remove(index) {
                    self.num_edges -= 1;
                    self.edge_weight_total -= weight;
                }
            }
        }
        self.num_nodes -= 1;
        true
    }

    pub fn has_node(&self, node: &T) -> bool {
        self.lookup.contains_key(node)
    }

    /// Iterates over the nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().flatten().map(|slot| &slot.value)
    }

    pub fn node_index(&self, node: &T) -> Option<NodeIndex> {
        self.lookup.get(node).copied()
    }

    /// Gets the node value for a handle, or `None` if the node was removed.
    pub fn node(&self, index: NodeIndex) -> Option<&T> {
        self.slots
            .get(index.index())
            .and_then(Option::as_ref)
            .map(|slot| &slot.value)
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of outgoing edges of `node`; zero for an unknown node.
    pub fn degree(&self, node: &T) -> usize {
        self.lookup
            .get(node)
            .map_or(0, |&index| self.slot(index).out.len())
    }

    // Edges

    /// Adds an edge of weight [`DEFAULT_WEIGHT`].  See
    /// [`Self::add_weighted_edge`].
    pub fn add_edge(&mut self, from: T, to: T) -> bool {
        self.insert_edge(from, to, DEFAULT_WEIGHT)
    }

    /// Adds an edge, creating either endpoint if it is missing, and mirrors
    /// it when the graph is undirected.
    ///
    /// Returns `Ok(false)` if the edge already existed.  The existing weight
    /// is left unchanged in that case; use [`Self::set_edge_weight`] to
    /// update it.
    pub fn add_weighted_edge(&mut self, from: T, to: T, weight: f64) -> Result<bool> {
        let weight = check_weight(weight)?;
        Ok(self.insert_edge(from, to, weight))
    }

    fn insert_edge(&mut self, from: T, to: T, weight: f64) -> bool {
        let from = self.intern(from);
        let to = self.intern(to);
        if !self.slot_mut(from).insert(to, weight) {
            return false;
        }
        if !self.is_directed() && from != to {
            self.slot_mut(to).insert(from, weight);
        }
        self.num_edges += 1;
        self.edge_weight_total += weight;
        true
    }

    /// Replaces the weight of the edge `from -> to`.  Returns `Ok(false)`
    /// without changing anything if there is no such edge.
    ///
    /// Only the given direction is updated, even in an undirected graph;
    /// callers wanting symmetric weights must also set `to -> from`.
    pub fn set_edge_weight(&mut self, from: &T, to: &T, weight: f64) -> Result<bool> {
        let weight = check_weight(weight)?;
        let (Some(from), Some(to)) = (self.node_index(from), self.node_index(to)) else {
            return Ok(false);
        };
        let slot = self.slot_mut(from);
        let Some(&pos) = slot.positions.get(&to) else {
            return Ok(false);
        };
        let old = std::mem::replace(&mut slot.out[pos].1, weight);
        self.edge_weight_total += weight - old;
        Ok(true)
    }

    /// Removes the edge `from -> to`, and its mirror in an undirected graph.
    /// Returns `false` if there was no such edge.
    pub fn remove_edge(&mut self, from: &T, to: &T) -> bool {
        let (Some(from), Some(to)) = (self.node_index(from), self.node_index(to)) else {
            return false;
        };
        let Some(weight) = self.slot_mut(from).remove(to) else {
            return false;
        };
        if !self.is_directed() && from != to {
            self.slot_mut(to).remove(from);
        }
        self.num_edges -= 1;
        self.edge_weight_total -= weight;
        true
    }

    pub fn has_edge(&self, from: &T, to: &T) -> bool {
        self.edge_weight(from, to).is_some()
    }

    pub fn edge_weight(&self, from: &T, to: &T) -> Option<f64> {
        let from = self.node_index(from)?;
        let to = self.node_index(to)?;
        self.slot(from).weight_to(to)
    }

    /// Iterates over the `(neighbor, weight)` pairs of `node`'s outgoing
    /// edges in insertion order.  An unknown node has no edges.
    pub fn edges<'a>(&'a self, node: &T) -> impl Iterator<Item = (&'a T, f64)> + use<'a, T> {
        let out: &[(NodeIndex, f64)] = match self.lookup.get(node) {
            Some(&index) => &self.slot(index).out,
            None => &[],
        };
        out.iter().map(|&(target, weight)| (self.value(target), weight))
    }

    /// Number of logical edges; an undirected edge and its mirror count once.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Sum of the weights of the logical edges.
    pub fn edge_weight_total(&self) -> f64 {
        self.edge_weight_total
    }

    /// Removes all nodes and edges.  Handles issued before the call are no
    /// longer valid.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.lookup.clear();
        self.num_nodes = 0;
        self.num_edges = 0;
        self.edge_weight_total = 0.0;
    }
}

impl<T> Graph<T> {
    pub fn directedness(&self) -> Directedness {
        self.directedness
    }

    pub fn is_directed(&self) -> bool {
        self.directedness.is_directed()
    }

    /// Iterates over the handles of the nodes in insertion order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| NodeIndex::new(i))
    }

    // Handle-level access used by the traversal engine.

    /// One more than the largest handle ever issued.
    pub(crate) fn node_bound(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn first_node(&self) -> Option<NodeIndex> {
        self.slots
            .iter()
            .position(Option::is_some)
            .map(NodeIndex::new)
    }

    pub(crate) fn out_edges(&self, index: NodeIndex) -> &[(NodeIndex, f64)] {
        &self.slot(index).out
    }

    pub(crate) fn value(&self, index: NodeIndex) -> &T {
        &self.slot(index).value
    }

    fn slot(&self, index: NodeIndex) -> &Slot<T> {
        self.slots[index.index()]
            .as_ref()
            .expect("stale node handle")
    }

    fn slot_mut(&mut self, index: NodeIndex) -> &mut Slot<T> {
        self.slots[index.index()]
            .as_mut()
            .expect("stale node handle")
    }
}

impl<T> Extend<(T, T)> for Graph<T>
where
    T: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = (T, T)>>(&mut self, iter: I) {
        for (from, to) in iter {
            self.add_edge(from, to);
        }
    }
}

impl<T> FromIterator<(T, T)> for Graph<T>
where
    T: Eq + Hash + Clone,
{
    /// Collects unit-weight edges into an undirected graph.
    fn from_iter<I: IntoIterator<Item = (T, T)>>(iter: I) -> Self {
        Self::from_edges(Directedness::Undirected, iter)
    }
}
