//! Connected components.

use std::{cmp::Ordering, fmt::Debug, hash::Hash};

use crate::{
    graph::Graph,
    node_index::NodeIndex,
    search::{BreadthFirstForest, EdgeEvent, Visitor},
    tracing_support::{debug_span, trace},
};

/// Disjoint sets of traversal ids, with path halving and union by rank.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new() -> Self {
        Self {
            parent: Vec::new(),
            rank: Vec::new(),
        }
    }

    /// Adds a singleton set and returns its id.
    fn push(&mut self) -> usize {
        self.parent.push(self.parent.len());
        self.rank.push(0);
        self.parent.len() - 1
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, x: usize, y: usize) {
        let (rx, ry) = (self.find(x), self.find(y));
        if rx == ry {
            return;
        }
        match self.rank[rx].cmp(&self.rank[ry]) {
            Ordering::Less => self.parent[rx] = ry,
            Ordering::Greater => self.parent[ry] = rx,
            Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] += 1;
            }
        }
    }
}

/// Partitions the nodes of `graph` into connected components.
///
/// Nodes are taken in insertion order; each node not yet reached starts a
/// breadth-first search, and all searches share one record of discovered
/// nodes.  In a directed graph edges are only followed forward, so a search
/// may run into nodes an earlier search already claimed.  Their components
/// are merged, which makes the result the weakly connected components of the
/// graph.  It is not strong connectivity; see
/// [`strongly_connected_components`] for that.
///
/// Every node appears in exactly one component.  Components are ordered by
/// the earliest search that contributed to them, and each lists its nodes in
/// the order they were finished.  Runs in time linear in the size of the
/// graph.
pub fn connected_components<T>(graph: &Graph<T>) -> Vec<Vec<&T>>
where
    T: Eq + Hash + Clone + Debug,
{
    let _span = debug_span!("connected_components", nodes = graph.num_nodes()).entered();
    // The search that first reached each node.
    let mut labels: Vec<Option<usize>> = vec![None; graph.node_bound()];
    let mut sets = UnionFind::new();
    let mut forest = BreadthFirstForest::new(graph);

    for start in graph.node_indices() {
        if forest.is_discovered(start) {
            continue;
        }
        let label = sets.push();
        let mut touched: Vec<usize> = Vec::new();
        let visitor = Visitor::new().on_edge(|event: EdgeEvent<'_, T>| {
            if let Some(earlier) = labels[event.ends.1.index()] {
                touched.push(earlier);
            }
        });
        let first_new = forest.processed().len();
        forest.search_from(start, visitor);
        for &node in &forest.processed()[first_new..] {
            labels[node.index()] = Some(label);
        }
        for earlier in touched {
            trace!(from = label, into = earlier, "merging components");
            sets.union(earlier, label);
        }
    }

    let mut slots: Vec<Option<usize>> = vec![None; sets.parent.len()];
    let mut components: Vec<Vec<&T>> = Vec::new();
    for label in 0..sets.parent.len() {
        let root = sets.find(label);
        if slots[root].is_none() {
            slots[root] = Some(components.len());
            components.push(Vec::new());
        }
    }
    for &node in forest.processed() {
        let Some(label) = labels[node.index()] else {
            continue;
        };
        if let Some(slot) = slots[sets.find(label)] {
            components[slot].push(graph.value(node));
        }
    }
    components
}

/// Partitions the nodes of `graph` into strongly connected components, in
/// no particular order.  For an undirected graph these are the connected
/// components.
#[cfg(feature = "pathfinding")]
pub fn strongly_connected_components<T>(graph: &Graph<T>) -> Vec<Vec<&T>>
where
    T: Eq + Hash + Clone,
{
    let nodes: Vec<NodeIndex> = graph.node_indices().collect();
    pathfinding::prelude::strongly_connected_components(&nodes, |&node| {
        graph.out_edges(node).iter().map(|&(target, _)| target)
    })
    .into_iter()
    .map(|component| {
        component
            .into_iter()
            .map(|node| graph.value(node))
            .collect()
    })
    .collect()
}

impl<T> Graph<T>
where
    T: Eq + Hash + Clone + Debug,
{
    /// See [`connected_components`].
    pub fn connected_components(&self) -> Vec<Vec<&T>> {
        connected_components(self)
    }

    /// See [`strongly_connected_components`].
    #[cfg(feature = "pathfinding")]
    pub fn strongly_connected_components(&self) -> Vec<Vec<&T>> {
        strongly_connected_components(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directedness::Directedness;

    fn owned<T: Copy>(components: Vec<Vec<&T>>) -> Vec<Vec<T>> {
        components
            .into_iter()
            .map(|component| component.into_iter().copied().collect())
            .collect()
    }

    #[test]
    fn test_directed_components() {
        let graph = Graph::from_edges(Directedness::Directed, [(0, 1), (0, 2), (3, 4), (3, 5)]);
        assert_eq!(
            owned(graph.connected_components()),
            vec![vec![0, 1, 2], vec![3, 4, 5]]
        );
    }

    #[test]
    fn test_undirected_components() {
        let mut graph: Graph<char> = [('a', 'b'), ('c', 'd'), ('b', 'e')].into_iter().collect();
        graph.add_node('z');
        assert_eq!(
            owned(graph.connected_components()),
            vec![vec!['a', 'b', 'e'], vec!['c', 'd'], vec!['z']]
        );
    }

    #[test]
    fn test_directed_components_merge() {
        let mut graph = Graph::directed();
        for node in [0, 1, 2] {
            graph.add_node(node);
        }
        graph.add_edge(2, 0);
        graph.add_edge(2, 1);
        assert_eq!(owned(graph.connected_components()), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_many_isolated_nodes() {
        let mut graph = Graph::undirected();
        for node in 0..200_000u32 {
            graph.add_node(node);
        }
        let components = graph.connected_components();
        assert_eq!(components.len(), 200_000);
        assert!(components.iter().all(|component| component.len() == 1));
        assert_eq!(components[199_999], vec![&199_999]);
    }

    #[test]
    fn test_reverse_chain_is_walked_once() {
        // Every start reaches only itself before running into the previous
        // start's component.
        let mut graph = Graph::directed();
        for node in 0..200_000u32 {
            graph.add_node(node);
        }
        for node in 1..200_000u32 {
            graph.add_edge(node, node - 1);
        }
        let components = graph.connected_components();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].len(), 200_000);
        assert_eq!(components[0][..3], [&0, &1, &2]);
    }

    #[test]
    fn test_merged_components_keep_first_search_order() {
        // 3 reaches both earlier components; 4 stays on its own.
        let mut graph = Graph::directed();
        for node in [0, 1, 2, 3, 4] {
            graph.add_node(node);
        }
        graph.add_edge(0, 1);
        graph.add_edge(3, 2);
        graph.add_edge(3, 0);
        assert_eq!(
            owned(graph.connected_components()),
            vec![vec![0, 1, 2, 3], vec![4]]
        );
    }

    #[test]
    fn test_empty_graph_has_no_components() {
        let graph = Graph::<u8>::undirected();
        assert!(graph.connected_components().is_empty());
    }

    #[cfg(feature = "pathfinding")]
    #[test]
    fn test_strongly_connected_components() {
        let graph = Graph::from_edges(
            Directedness::Directed,
            [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 3), (5, 5)],
        );
        let mut components: Vec<Vec<i32>> = owned(graph.strongly_connected_components())
            .into_iter()
            .map(|mut component| {
                component.sort();
                component
            })
            .collect();
        components.sort();
        assert_eq!(components, vec![vec![0, 1, 2], vec![3, 4], vec![5]]);
        // Weak connectivity joins the first two.
        assert_eq!(graph.connected_components().len(), 2);
    }
}
