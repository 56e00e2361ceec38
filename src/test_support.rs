//! Random graph generation and consistency checks for property tests.

use std::{collections::HashSet, fmt::Debug, hash::Hash};

use quickcheck::{Arbitrary, Gen};

use crate::{directedness::Directedness, graph::Graph, tracing_support::init_tracing};

#[derive(Debug, Clone)]
pub struct ArbGraph {
    pub graph: Graph<u8>,
}

impl Arbitrary for ArbGraph {
    fn arbitrary(g: &mut Gen) -> Self {
        let num_nodes = usize::arbitrary(g) % 20; // Limit size for testing
        let num_edges = usize::arbitrary(g) % 50;
        let num_extra_self_loops = usize::arbitrary(g) % 3;

        let mut graph = Graph::new(Directedness::from(bool::arbitrary(g)));
        let nodes: Vec<u8> = (0..num_nodes).map(|i| i as u8).collect();
        for &node in &nodes {
            graph.add_node(node);
        }

        for i in 0..num_edges {
            if nodes.len() < 2 {
                break;
            }
            let source = nodes[usize::arbitrary(g) % nodes.len()];
            let target = nodes[usize::arbitrary(g) % nodes.len()];
            let weight = f64::from(u8::arbitrary(g) % 10) / 2.0;
            graph
                .add_weighted_edge(source, target, weight)
                .expect("finite weight");
            if i < num_extra_self_loops {
                graph.add_edge(source, source);
            }
        }

        ArbGraph { graph }
    }
}

pub fn has_duplicates<T: Eq + Hash>(items: impl IntoIterator<Item = T>) -> bool {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item) {
            return true;
        }
    }
    false
}

/// Each logical edge once, as `(from, to, weight)`.
pub fn logical_edges<T>(graph: &Graph<T>) -> Vec<(&T, &T, f64)>
where
    T: Eq + Hash + Clone,
{
    let mut edges = Vec::new();
    for from in graph.node_indices() {
        let from_value = graph.value(from);
        for &(to, weight) in graph.out_edges(from) {
            if graph.is_directed() || from.index() <= to.index() {
                edges.push((from_value, graph.value(to), weight));
            }
        }
    }
    edges
}

/// Checks the internal consistency of a graph.
pub fn check_graph_consistency<T>(graph: &Graph<T>)
where
    T: Eq + Hash + Clone + Debug,
{
    init_tracing();

    assert_eq!(graph.nodes().count(), graph.num_nodes());
    assert!(!has_duplicates(graph.nodes()));

    for node in graph.nodes() {
        let index = graph.node_index(node).expect("listed node has a handle");
        assert_eq!(graph.node(index), Some(node));
        assert!(!has_duplicates(graph.edges(node).map(|(to, _)| to)));
        assert_eq!(graph.degree(node), graph.edges(node).count());

        for (to, weight) in graph.edges(node) {
            assert!(graph.has_node(to), "{node:?} -> {to:?} leads out of the graph");
            assert!(graph.has_edge(node, to));
            assert_eq!(graph.edge_weight(node, to), Some(weight));
            if !graph.is_directed() {
                assert!(graph.has_edge(to, node), "{node:?} -- {to:?} has no mirror");
            }
        }
    }

    let edges = logical_edges(graph);
    assert_eq!(edges.len(), graph.num_edges());
    let total: f64 = edges.iter().map(|&(_, _, weight)| weight).sum();
    assert!((total - graph.edge_weight_total()).abs() < 1e-9);

    // If there are edges, there must be nodes
    assert!(graph.num_nodes() > 0 || graph.num_edges() == 0);
}

mod props {
    use std::collections::HashMap;

    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::search::{Control, EdgeEvent, EdgeKind, Order, Visitor};

    #[quickcheck]
    fn prop_graph_is_consistent(ArbGraph { graph }: ArbGraph) {
        check_graph_consistency(&graph);
    }

    #[quickcheck]
    fn prop_remove_node_keeps_graph_consistent(ArbGraph { mut graph }: ArbGraph, pick: u8) {
        if graph.num_nodes() == 0 {
            return;
        }
        let victim = pick % graph.num_nodes() as u8;
        assert!(graph.remove_node(&victim));
        assert!(!graph.has_node(&victim));
        assert!(graph.nodes().all(|node| !graph.has_edge(node, &victim)));
        check_graph_consistency(&graph);
    }

    #[quickcheck]
    fn prop_remove_edge_keeps_graph_consistent(ArbGraph { mut graph }: ArbGraph) {
        let edges: Vec<(u8, u8)> = logical_edges(&graph)
            .into_iter()
            .map(|(from, to, _)| (*from, *to))
            .collect();
        for (from, to) in edges.into_iter().step_by(2) {
            assert!(graph.remove_edge(&from, &to));
            assert!(!graph.has_edge(&from, &to));
            check_graph_consistency(&graph);
        }
    }

    #[quickcheck]
    fn prop_bfs_tree_edges_increase_distance_by_one(ArbGraph { graph }: ArbGraph) {
        let Some(&root) = graph.nodes().next() else {
            return;
        };
        let mut tree_edges = Vec::new();
        let result = graph
            .breadth_first_search(
                Some(&root),
                Visitor::new().on_edge(|e: EdgeEvent<'_, u8>| {
                    if e.kind == EdgeKind::Tree {
                        tree_edges.push((*e.from, *e.to));
                    }
                }),
            )
            .unwrap();
        for (from, to) in tree_edges {
            assert_eq!(
                result.distance_to(&to),
                result.distance_to(&from).map(|d| d + 1)
            );
        }
        // No edge skips a layer.
        for (from, to, _) in logical_edges(&graph) {
            if let (Some(d_from), Some(d_to)) = (result.distance_to(from), result.distance_to(to))
            {
                assert!(d_to <= d_from + 1);
                if !graph.is_directed() {
                    assert!(d_from <= d_to + 1);
                }
            }
        }
        // Breadth-first visit order is by distance.
        let distances: Vec<usize> = result
            .visited()
            .map(|node| result.distance_to(node).unwrap())
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[quickcheck]
    fn prop_paths_follow_edges(ArbGraph { graph }: ArbGraph, depth_first: bool) {
        let Some(&root) = graph.nodes().next() else {
            return;
        };
        let result = if depth_first {
            graph.dfs(&root)
        } else {
            graph.bfs(&root)
        }
        .unwrap();
        for node in graph.nodes() {
            let path = result.path_to(node);
            if !result.is_discovered(node) {
                assert!(path.is_empty());
                continue;
            }
            assert_eq!(path.first(), Some(&&root));
            assert_eq!(path.last(), Some(&node));
            assert!(!has_duplicates(path.iter()));
            for pair in path.windows(2) {
                assert!(graph.has_edge(pair[0], pair[1]));
            }
        }
    }

    #[quickcheck]
    fn prop_search_visits_each_reachable_node_once(ArbGraph { graph }: ArbGraph, order: u8) {
        let Some(&root) = graph.nodes().next() else {
            return;
        };
        let order = [Order::PreOrder, Order::InOrder, Order::PostOrder][order as usize % 3];
        let bfs = graph.bfs(&root).unwrap();
        let dfs = graph
            .depth_first_search(Some(&root), order, Visitor::new())
            .unwrap();
        for result in [&bfs, &dfs] {
            assert!(result.is_complete());
            assert!(!has_duplicates(result.visited()));
            assert_eq!(result.visited().count(), result.num_discovered());
            assert_eq!(result.num_processed(), result.num_discovered());
            assert!(
                graph
                    .nodes()
                    .all(|node| result.is_processed(node) == result.is_discovered(node))
            );
        }
        let reached: HashSet<&u8> = bfs.visited().collect();
        assert_eq!(reached, dfs.visited().collect::<HashSet<_>>());
    }

    #[quickcheck]
    fn prop_dfs_timestamps_nest(ArbGraph { graph }: ArbGraph) {
        let Some(&root) = graph.nodes().next() else {
            return;
        };
        let result = graph.dfs(&root).unwrap();
        let times: HashMap<&u8, (usize, usize)> = result
            .processed()
            .map(|node| {
                (
                    node,
                    (result.entry_time(node).unwrap(), result.exit_time(node).unwrap()),
                )
            })
            .collect();
        for (&a, &(a_in, a_out)) in &times {
            for (&b, &(b_in, b_out)) in &times {
                if a == b {
                    continue;
                }
                let disjoint = a_out < b_in || b_out < a_in;
                let a_inside_b = b_in < a_in && a_out < b_out;
                let b_inside_a = a_in < b_in && b_out < a_out;
                assert!(disjoint || a_inside_b || b_inside_a);
            }
        }
    }

    #[quickcheck]
    fn prop_stop_after_k_discoveries(ArbGraph { graph }: ArbGraph, k: u8) {
        let Some(&root) = graph.nodes().next() else {
            return;
        };
        let k = usize::from(k % 8) + 1;
        let mut seen = 0;
        let result = graph
            .breadth_first_search(
                Some(&root),
                Visitor::new().on_discover(|_: &u8| {
                    seen += 1;
                    if seen == k { Control::Stop } else { Control::Continue }
                }),
            )
            .unwrap();
        let reachable = graph.bfs(&root).unwrap().num_discovered();
        if reachable < k {
            assert!(result.is_complete());
            assert_eq!(result.visited().count(), reachable);
        } else {
            assert!(!result.is_complete());
            assert_eq!(result.visited().count(), k);
        }
    }

    #[quickcheck]
    fn prop_components_partition_nodes(ArbGraph { graph }: ArbGraph) {
        let components = graph.connected_components();
        let mut label = HashMap::new();
        for (i, component) in components.iter().enumerate() {
            assert!(!component.is_empty());
            for &node in component {
                assert_eq!(label.insert(node, i), None, "{node} is in two components");
            }
        }
        assert_eq!(label.len(), graph.num_nodes());
        for (from, to, _) in logical_edges(&graph) {
            assert_eq!(label[from], label[to]);
        }
    }

    #[quickcheck]
    fn prop_bipartite_coloring_is_proper(ArbGraph { graph }: ArbGraph) {
        let coloring = graph.two_color(false);
        assert!(coloring.is_complete());
        assert!(graph.nodes().all(|node| coloring.color(node).is_some()));
        let proper = logical_edges(&graph)
            .into_iter()
            .all(|(from, to, _)| coloring.color(from) != coloring.color(to));
        if coloring.is_bipartite() {
            assert!(proper);
        }
        if !graph.is_directed() {
            assert_eq!(coloring.is_bipartite(), proper);
        }
        let (left, right) = coloring.partition();
        assert_eq!(left.len() + right.len(), graph.num_nodes());
    }
}
