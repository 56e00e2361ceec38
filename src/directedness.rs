/// Whether the edges of a graph are directed.
///
/// Fixed when a [`Graph`](crate::Graph) is constructed.  In an undirected
/// graph every edge `(a, b, w)` is stored together with its mirror
/// `(b, a, w)`.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Directedness {
    Directed,
    #[default]
    Undirected,
}

impl Directedness {
    pub fn is_directed(self) -> bool {
        matches!(self, Directedness::Directed)
    }

    /// The connector used when rendering an edge, `->` or `--`.
    pub fn arrow(self) -> &'static str {
        match self {
            Directedness::Directed => "->",
            Directedness::Undirected => "--",
        }
    }
}

impl From<bool> for Directedness {
    /// Converts an `is_directed` flag.
    fn from(directed: bool) -> Self {
        if directed {
            Directedness::Directed
        } else {
            Directedness::Undirected
        }
    }
}
