//! The traversal engine.
//!
//! Breadth-first and depth-first search are the same walk with a different
//! frontier.  Both start from a root, discover each reachable node exactly
//! once, examine each node's outgoing edges in insertion order, and report
//! what they see through an optional set of callbacks collected in a
//! [`Visitor`].  Any callback can stop the walk by returning
//! [`Control::Stop`]; the [`SearchResult`] returned in that case covers the
//! work done so far.
//!
//! Depth-first search keeps an explicit stack of edge cursors rather than
//! recursing, so the depth of the graph is not limited by the call stack.

mod result;

use std::{collections::VecDeque, fmt::Debug, hash::Hash, ops::ControlFlow};

pub use self::result::SearchResult;
use self::result::Parent;
use crate::{
    error::{GraphError, Result},
    graph::Graph,
    node_index::NodeIndex,
    tracing_support::{debug_span, trace},
};

/// The value a callback returns to let the search go on or end it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Control {
    #[default]
    Continue,
    Stop,
}

impl Control {
    fn flow(self) -> ControlFlow<()> {
        match self {
            Control::Continue => ControlFlow::Continue(()),
            Control::Stop => ControlFlow::Break(()),
        }
    }
}

impl From<()> for Control {
    fn from(_: ()) -> Self {
        Control::Continue
    }
}

impl From<bool> for Control {
    /// `true` means keep going.
    fn from(keep_going: bool) -> Self {
        if keep_going {
            Control::Continue
        } else {
            Control::Stop
        }
    }
}

/// When a depth-first search emits a node into [`SearchResult::visited`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// When the node is entered, before any of its edges.
    #[default]
    PreOrder,
    /// After the subtree of the node's first tree child has finished, or
    /// when the node finishes if it has no tree children.  This matches the
    /// usual meaning only for nodes with at most two children.
    InOrder,
    /// When the node finishes.
    PostOrder,
}

/// The role of an examined edge in the search tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// The edge discovered its target.
    Tree,
    /// The target is an ancestor that has not finished yet, including the
    /// node itself for a self-loop.
    Back,
    /// The target is a finished descendant.
    Forward,
    /// The target finished before the source was entered.
    Cross,
    /// Breadth-first searches do not classify non-tree edges further.
    NonTree,
}

/// An edge reported to [`Visitor::on_edge`].
#[derive(Debug)]
pub struct EdgeEvent<'e, T> {
    pub from: &'e T,
    pub to: &'e T,
    pub weight: f64,
    pub kind: EdgeKind,
    pub(crate) ends: (NodeIndex, NodeIndex),
}

impl<T> Clone for EdgeEvent<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EdgeEvent<'_, T> {}

type NodeCallback<'a, T> = Box<dyn FnMut(&T) -> Control + 'a>;
type EdgeCallback<'a, T> = Box<dyn FnMut(EdgeEvent<'_, T>) -> Control + 'a>;

/// The callbacks a search invokes.  Every callback is optional; an unset
/// callback does nothing and lets the search continue.
///
/// Callbacks may return [`Control`], `()` (always continue) or `bool`
/// (`false` stops).
///
/// ```
/// use graphwalk::prelude::*;
///
/// let graph: Graph<u32> = [(0, 1), (1, 2), (2, 3)].into_iter().collect();
/// let result = graph
///     .breadth_first_search(Some(&0), Visitor::new().on_discover(|n: &u32| *n != 2))
///     .unwrap();
/// assert!(!result.is_complete());
/// assert_eq!(result.visited().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
/// ```
pub struct Visitor<'a, T> {
    on_discover: Option<NodeCallback<'a, T>>,
    on_edge: Option<EdgeCallback<'a, T>>,
    on_finish: Option<NodeCallback<'a, T>>,
}

impl<T> Default for Visitor<'_, T> {
    fn default() -> Self {
        Self {
            on_discover: None,
            on_edge: None,
            on_finish: None,
        }
    }
}

impl<'a, T: 'a> Visitor<'a, T> {
    /// Called when a node is entered, before any of its edges are examined.
    pub fn on_discover<R: Into<Control>>(mut self, mut f: impl FnMut(&T) -> R + 'a) -> Self {
        self.on_discover = Some(Box::new(move |node: &T| f(node).into()));
        self
    }

    /// Called for every tree edge, and for non-tree edges when the graph is
    /// directed or the far end has not finished yet.  In an undirected
    /// depth-first search the edge back to a node's own tree parent is not
    /// reported again.
    pub fn on_edge<R: Into<Control>>(
        mut self,
        mut f: impl FnMut(EdgeEvent<'_, T>) -> R + 'a,
    ) -> Self {
        self.on_edge = Some(Box::new(move |event: EdgeEvent<'_, T>| f(event).into()));
        self
    }

    /// Called when all of a node's outgoing edges have been examined.
    pub fn on_finish<R: Into<Control>>(mut self, mut f: impl FnMut(&T) -> R + 'a) -> Self {
        self.on_finish = Some(Box::new(move |node: &T| f(node).into()));
        self
    }
}

impl<T> Visitor<'_, T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn discover(&mut self, node: &T) -> ControlFlow<()> {
        self.on_discover.as_mut().map_or(Control::Continue, |f| f(node)).flow()
    }

    fn edge(&mut self, event: EdgeEvent<'_, T>) -> ControlFlow<()> {
        self.on_edge.as_mut().map_or(Control::Continue, |f| f(event)).flow()
    }

    fn finish(&mut self, node: &T) -> ControlFlow<()> {
        self.on_finish.as_mut().map_or(Control::Continue, |f| f(node)).flow()
    }
}

/// A node on the frontier together with how far its edge list has been
/// examined.
#[derive(Clone, Copy, Debug)]
struct Cursor {
    node: NodeIndex,
    next_edge: usize,
    entered: bool,
    emitted: bool,
    tree_children: usize,
}

impl Cursor {
    fn new(node: NodeIndex) -> Self {
        Self {
            node,
            next_edge: 0,
            entered: false,
            emitted: false,
            tree_children: 0,
        }
    }
}

/// The pending work of a search.
trait Frontier {
    /// Whether a tree edge suspends the current node until the newly
    /// discovered one has finished.
    const DESCENDS: bool;

    fn push(&mut self, cursor: Cursor);

    /// Removes the cursor to work on next.
    fn take(&mut self) -> Option<Cursor>;

    /// Puts a suspended cursor back so that it is resumed after anything
    /// pushed later has finished.
    fn resume(&mut self, cursor: Cursor);
}

/// First in, first out: breadth-first search.
#[derive(Default)]
struct Queue(VecDeque<Cursor>);

impl Frontier for Queue {
    const DESCENDS: bool = false;

    fn push(&mut self, cursor: Cursor) {
        self.0.push_back(cursor);
    }

    fn take(&mut self) -> Option<Cursor> {
        self.0.pop_front()
    }

    fn resume(&mut self, _: Cursor) {
        unreachable!("breadth-first search never suspends a node")
    }
}

/// Last in, first out: depth-first search.
#[derive(Default)]
struct Stack(Vec<Cursor>);

impl Frontier for Stack {
    const DESCENDS: bool = true;

    fn push(&mut self, cursor: Cursor) {
        self.0.push(cursor);
    }

    fn take(&mut self) -> Option<Cursor> {
        self.0.pop()
    }

    fn resume(&mut self, cursor: Cursor) {
        self.0.push(cursor);
    }
}

impl<T> SearchResult<'_, T> {
    /// Decides whether the edge `from -> to` is reported, and as what.
    /// Discovers `to` if this is its tree edge.
    fn examine(&mut self, from: NodeIndex, to: NodeIndex, weight: f64) -> Option<EdgeKind> {
        if !self.is_discovered_at(to) {
            self.discover(to, Parent::Edge { from, weight });
            return Some(EdgeKind::Tree);
        }
        let directed = self.graph.is_directed();
        if !directed && self.is_processed_at(to) {
            return None;
        }
        match self.order {
            None => Some(EdgeKind::NonTree),
            Some(_) if !directed && self.parent_at(from) == Some(to) => None,
            Some(_) => Some(self.classify_live(from, to)),
        }
    }

    fn should_emit_on_entry(&self) -> bool {
        matches!(self.order, None | Some(Order::PreOrder))
    }
}

/// The search loop shared by every frontier.  Breaks as soon as a callback
/// asks to stop.
fn walk<T, F: Frontier>(
    result: &mut SearchResult<'_, T>,
    frontier: &mut F,
    visitor: &mut Visitor<'_, T>,
) -> ControlFlow<()> {
    let graph = result.graph;
    frontier.push(Cursor::new(result.root));
    'frontier: while let Some(mut cursor) = frontier.take() {
        let node = cursor.node;
        if !cursor.entered {
            cursor.entered = true;
            result.enter(node);
            if result.should_emit_on_entry() {
                result.emit(node);
                cursor.emitted = true;
            }
            visitor.discover(graph.value(node))?;
        } else if result.order == Some(Order::InOrder) && !cursor.emitted && cursor.tree_children > 0
        {
            result.emit(node);
            cursor.emitted = true;
        }

        let edges = graph.out_edges(node);
        while let Some(&(target, weight)) = edges.get(cursor.next_edge) {
            cursor.next_edge += 1;
            let Some(kind) = result.examine(node, target, weight) else {
                continue;
            };
            visitor.edge(EdgeEvent {
                from: graph.value(node),
                to: graph.value(target),
                weight,
                kind,
                ends: (node, target),
            })?;
            if kind == EdgeKind::Tree {
                cursor.tree_children += 1;
                let child = Cursor::new(target);
                if F::DESCENDS {
                    frontier.resume(cursor);
                    frontier.push(child);
                    continue 'frontier;
                }
                frontier.push(child);
            }
        }

        if !cursor.emitted {
            result.emit(node);
        }
        result.finish(node);
        visitor.finish(graph.value(node))?;
    }
    ControlFlow::Continue(())
}

fn resolve_start<T>(graph: &Graph<T>, start: Option<&T>) -> Result<NodeIndex>
where
    T: Eq + Hash + Clone + Debug,
{
    match start {
        Some(node) => graph
            .node_index(node)
            .ok_or_else(|| GraphError::no_such_node(node)),
        None => graph.first_node().ok_or(GraphError::NoSuchNode(None)),
    }
}

fn run<'g, T, F>(
    graph: &'g Graph<T>,
    root: NodeIndex,
    order: Option<Order>,
    frontier: F,
    visitor: Visitor<'_, T>,
) -> SearchResult<'g, T>
where
    F: Frontier,
{
    let mut result = SearchResult::new(graph, root, order);
    drive(&mut result, frontier, visitor);
    result
}

/// Walks from `result.root`, marking `result` incomplete if a callback
/// stops the walk.
fn drive<T, F>(result: &mut SearchResult<'_, T>, mut frontier: F, mut visitor: Visitor<'_, T>)
where
    F: Frontier,
{
    if walk(result, &mut frontier, &mut visitor).is_break() {
        trace!(
            discovered = result.num_discovered(),
            processed = result.num_processed(),
            "search stopped by callback"
        );
        result.complete = false;
    }
}

/// Breadth-first searches from several roots that share one record of
/// discovered and processed nodes, so a node claimed by an earlier root is
/// never walked again.  Edges into such nodes are still reported.
pub(crate) struct BreadthFirstForest<'g, T> {
    graph: &'g Graph<T>,
    result: Option<SearchResult<'g, T>>,
}

impl<'g, T> BreadthFirstForest<'g, T> {
    pub(crate) fn new(graph: &'g Graph<T>) -> Self {
        Self {
            graph,
            result: None,
        }
    }

    pub(crate) fn is_discovered(&self, node: NodeIndex) -> bool {
        self.result
            .as_ref()
            .is_some_and(|result| result.is_discovered_at(node))
    }

    /// Searches from `root`, which must not have been discovered yet.
    /// Returns false if a callback stopped the search.
    pub(crate) fn search_from(&mut self, root: NodeIndex, visitor: Visitor<'_, T>) -> bool {
        let graph = self.graph;
        let fresh = self.result.is_none();
        let result = self
            .result
            .get_or_insert_with(|| SearchResult::new(graph, root, None));
        if !fresh {
            result.restart(root);
        }
        drive(result, Queue::default(), visitor);
        result.is_complete()
    }

    /// Every node finished so far, across all roots, in finishing order.
    pub(crate) fn processed(&self) -> &[NodeIndex] {
        match &self.result {
            Some(result) => result.processed_indices(),
            None => &[],
        }
    }
}

/// Searches breadth-first from `start`, or from the first node inserted
/// into the graph if `start` is `None`.
///
/// Fails with [`GraphError::NoSuchNode`] if `start` is not in the graph, or
/// if it is `None` and the graph is empty.
pub fn breadth_first_search<'g, T>(
    graph: &'g Graph<T>,
    start: Option<&T>,
    visitor: Visitor<'_, T>,
) -> Result<SearchResult<'g, T>>
where
    T: Eq + Hash + Clone + Debug,
{
    let root = resolve_start(graph, start)?;
    let _span = debug_span!("breadth_first_search", root = ?graph.value(root)).entered();
    Ok(run(graph, root, None, Queue::default(), visitor))
}

/// Searches depth-first from `start`, or from the first node inserted into
/// the graph if `start` is `None`.  `order` decides when nodes are added to
/// [`SearchResult::visited`]; the callbacks fire at the same points for
/// every order.
///
/// Fails with [`GraphError::NoSuchNode`] if `start` is not in the graph, or
/// if it is `None` and the graph is empty.
pub fn depth_first_search<'g, T>(
    graph: &'g Graph<T>,
    start: Option<&T>,
    order: Order,
    visitor: Visitor<'_, T>,
) -> Result<SearchResult<'g, T>>
where
    T: Eq + Hash + Clone + Debug,
{
    let root = resolve_start(graph, start)?;
    let _span =
        debug_span!("depth_first_search", root = ?graph.value(root), ?order).entered();
    Ok(run(graph, root, Some(order), Stack::default(), visitor))
}

impl<T> Graph<T>
where
    T: Eq + Hash + Clone + Debug,
{
    /// See [`breadth_first_search`].
    pub fn breadth_first_search(
        &self,
        start: Option<&T>,
        visitor: Visitor<'_, T>,
    ) -> Result<SearchResult<'_, T>> {
        breadth_first_search(self, start, visitor)
    }

    /// See [`depth_first_search`].
    pub fn depth_first_search(
        &self,
        start: Option<&T>,
        order: Order,
        visitor: Visitor<'_, T>,
    ) -> Result<SearchResult<'_, T>> {
        depth_first_search(self, start, order, visitor)
    }

    /// Performs a breadth-first search from `start` with no callbacks.
    pub fn bfs(&self, start: &T) -> Result<SearchResult<'_, T>> {
        breadth_first_search(self, Some(start), Visitor::new())
    }

    /// Performs a pre-order depth-first search from `start` with no
    /// callbacks.
    pub fn dfs(&self, start: &T) -> Result<SearchResult<'_, T>> {
        depth_first_search(self, Some(start), Order::PreOrder, Visitor::new())
    }
}
