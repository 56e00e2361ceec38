use std::fmt::{self, Debug, Display, Formatter};

use crate::{graph::Graph, node_index::NodeIndex};

/// Debug-formats the result of a closure.
struct FormatDebugWith<F>(F);

impl<F> Debug for FormatDebugWith<F>
where
    F: Fn(&mut Formatter<'_>) -> fmt::Result,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        (self.0)(f)
    }
}

/// Debug-formats a string without quotes.
struct FormatDebugAs(String);

impl Debug for FormatDebugAs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<T> Graph<T> {
    /// Each logical edge once, in node insertion order.  The mirror half of
    /// an undirected edge is skipped.
    fn logical_edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, f64)> + '_ {
        let directed = self.is_directed();
        self.node_indices().flat_map(move |from| {
            self.out_edges(from)
                .iter()
                .filter(move |&&(to, _)| directed || from.index() <= to.index())
                .map(move |&(to, weight)| (from, to, weight))
        })
    }
}

impl<T> Debug for Graph<T>
where
    T: Debug,
{
    /// Formats as `Graph { directedness, nodes: [..], edges: {a -> b: weight, ..} }`,
    /// using `--` in place of `->` for undirected graphs.
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        let arrow = self.directedness().arrow();
        fmt.debug_struct("Graph")
            .field("directedness", &self.directedness())
            .field(
                "nodes",
                &FormatDebugWith(|f: &mut Formatter<'_>| {
                    f.debug_list()
                        .entries(self.node_indices().map(|index| self.value(index)))
                        .finish()
                }),
            )
            .field(
                "edges",
                &FormatDebugWith(|f: &mut Formatter<'_>| {
                    f.debug_map()
                        .entries(self.logical_edges().map(|(from, to, weight)| {
                            let tag = format!(
                                "{:?} {arrow} {:?}",
                                self.value(from),
                                self.value(to)
                            );
                            (FormatDebugAs(tag), weight)
                        }))
                        .finish()
                }),
            )
            .finish()
    }
}

/// One line per node listing its neighbors in insertion order, e.g.
/// `0: 1, 2`.  The alternate form (`{:#}`) adds each edge's weight, as in
/// `0: 1 (0.5), 2 (1)`.
impl<T> Display for Graph<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for from in self.node_indices() {
            write!(f, "{}:", self.value(from))?;
            for (i, &(to, weight)) in self.out_edges(from).iter().enumerate() {
                let sep = if i == 0 { " " } else { ", " };
                if f.alternate() {
                    write!(f, "{sep}{} ({weight})", self.value(to))?;
                } else {
                    write!(f, "{sep}{}", self.value(to))?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
