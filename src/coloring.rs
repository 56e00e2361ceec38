//! Two-coloring and bipartiteness.

use std::{collections::HashSet, fmt::Debug, hash::Hash};

use crate::{
    graph::Graph,
    node_index::NodeIndex,
    search::{BreadthFirstForest, Control, EdgeEvent, Visitor},
    tracing_support::{debug_span, trace},
};

/// The outcome of [`two_color`].
pub struct TwoColoring<'g, T> {
    graph: &'g Graph<T>,
    colors: Vec<Option<bool>>,
    conflicts: Vec<(NodeIndex, NodeIndex)>,
    complete: bool,
}

impl<'g, T> TwoColoring<'g, T>
where
    T: Eq + Hash + Clone,
{
    /// True if no examined edge joined two nodes of the same color.  Once a
    /// conflict is found this stays false.
    pub fn is_bipartite(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// False if coloring halted at the first conflict, leaving some nodes
    /// uncolored.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The color of `node`, or `None` if it is unknown or was never reached.
    pub fn color(&self, node: &T) -> Option<bool> {
        let index = self.graph.node_index(node)?;
        self.colors.get(index.index()).copied().flatten()
    }

    /// The edges found joining two nodes of the same color, in the order they
    /// were examined.  A self-loop always appears here.
    pub fn conflicts(&self) -> impl Iterator<Item = (&'g T, &'g T)> + '_ {
        self.conflicts
            .iter()
            .map(|&(from, to)| (self.graph.value(from), self.graph.value(to)))
    }

    /// The colored nodes split by color, `false` first, each in insertion
    /// order.
    pub fn partition(&self) -> (Vec<&'g T>, Vec<&'g T>) {
        let mut sides = (Vec::new(), Vec::new());
        for index in self.graph.node_indices() {
            match self.colors[index.index()] {
                Some(false) => sides.0.push(self.graph.value(index)),
                Some(true) => sides.1.push(self.graph.value(index)),
                None => {}
            }
        }
        sides
    }
}

/// Colors every node `false` or `true` so that, where possible, the ends of
/// each edge differ.
///
/// Nodes are taken in insertion order.  Each uncolored node is colored
/// `false` and a breadth-first search from it gives every newly reached
/// node the opposite color of the node that reached it.  The searches share
/// one record of discovered nodes, so each node and edge is examined once.  An edge between two
/// nodes that already share a color is recorded as a conflict and makes the
/// graph non-bipartite.  With `halt_on_failure` coloring stops at the first
/// conflict; otherwise the whole graph is colored so that every conflict is
/// reported.
///
/// Directed edges are only followed forward.
pub fn two_color<T>(graph: &Graph<T>, halt_on_failure: bool) -> TwoColoring<'_, T>
where
    T: Eq + Hash + Clone + Debug,
{
    let _span = debug_span!("two_color", nodes = graph.num_nodes(), halt_on_failure).entered();
    let mut colors: Vec<Option<bool>> = vec![None; graph.node_bound()];
    let mut conflicts: Vec<(NodeIndex, NodeIndex)> = Vec::new();
    let mut seen: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
    let mut complete = true;
    let mut forest = BreadthFirstForest::new(graph);

    for start in graph.node_indices() {
        if forest.is_discovered(start) {
            continue;
        }
        colors[start.index()] = Some(false);
        let visitor = Visitor::new().on_edge(|event: EdgeEvent<'_, T>| {
            let (from, to) = event.ends;
            let Some(from_color) = colors[from.index()] else {
                return Control::Continue;
            };
            match colors[to.index()] {
                None => colors[to.index()] = Some(!from_color),
                Some(to_color) if to_color == from_color => {
                    trace!(from = ?event.from, to = ?event.to, "same-color edge");
                    if seen.insert((from, to)) {
                        conflicts.push((from, to));
                    }
                    if halt_on_failure {
                        return Control::Stop;
                    }
                }
                Some(_) => {}
            }
            Control::Continue
        });
        if !forest.search_from(start, visitor) {
            complete = false;
            break;
        }
    }

    TwoColoring {
        graph,
        colors,
        conflicts,
        complete,
    }
}

impl<T> Graph<T>
where
    T: Eq + Hash + Clone + Debug,
{
    /// See [`two_color`].
    pub fn two_color(&self, halt_on_failure: bool) -> TwoColoring<'_, T> {
        two_color(self, halt_on_failure)
    }

    /// Whether the graph can be two-colored.
    pub fn is_bipartite(&self) -> bool {
        two_color(self, true).is_bipartite()
    }
}
