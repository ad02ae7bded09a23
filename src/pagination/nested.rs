use std::future::Future;

use super::cursor::{Cursor, Page};
use super::walker::walk;
use crate::error::{AacError, AacResult};

/// Cursor state for a combined query carrying an outer edge and one or more
/// inner edges selected on each outer node.
///
/// An inner `after:` argument applies to every node on the outer page, so
/// inner cursors are only meaningful for the outer page they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedCursors {
    pub outer: Cursor,
    pub inner: Vec<Cursor>,
}

impl NestedCursors {
    pub fn start(inner_edges: usize) -> Self {
        Self {
            outer: Cursor::Start,
            inner: vec![Cursor::Start; inner_edges],
        }
    }

    /// Moves to another outer page. Every inner cursor goes back to the start.
    pub fn advance_outer(&self, outer: Cursor) -> Self {
        Self {
            outer,
            inner: vec![Cursor::Start; self.inner.len()],
        }
    }

    /// Resumes inner edge `edge` on the current outer page; the other inner
    /// edges restart.
    pub fn resume_inner(&self, edge: usize, cursor: Cursor) -> Self {
        let mut inner = vec![Cursor::Start; self.inner.len()];
        inner[edge] = cursor;
        Self {
            outer: self.outer.clone(),
            inner,
        }
    }

    pub fn inner(&self, edge: usize) -> &Cursor {
        &self.inner[edge]
    }
}

/// An outer node that carries the current page of its inner edges.
pub trait NestedNode {
    type Inner;

    /// Identity used to find this node again on a re-fetched outer page.
    fn identity(&self) -> &str;

    /// Takes the page of inner edge `edge` out of the node; `None` when the
    /// response did not include that edge.
    fn take_edge(&mut self, edge: usize) -> Option<Page<Self::Inner>>;
}

/// An outer node with every inner edge drained, in inner-edge order.
#[derive(Debug, Clone, PartialEq)]
pub struct Drained<O, I> {
    pub node: O,
    pub edges: Vec<Vec<I>>,
}

fn missing_edge(edge: &str, outer_edge: &str, identity: &str) -> AacError {
    AacError::ProtocolError(format!(
        "{} missing from {} node {:?}",
        edge, outer_edge, identity
    ))
}

/// Drain an outer edge and, for every node on it, each inner edge named in
/// `inner_edges`.
///
/// `fetch` runs the combined query for a cursor state. Outer pages are
/// walked in order; each node's inner edges are drained before the outer
/// cursor moves, starting from the inner page the outer fetch already
/// returned.
pub async fn walk_nested<O, F, Fut>(
    outer_edge: &str,
    inner_edges: &[&str],
    fetch: F,
) -> AacResult<Vec<Drained<O, O::Inner>>>
where
    O: NestedNode,
    F: Fn(NestedCursors) -> Fut,
    Fut: Future<Output = AacResult<Page<O>>>,
{
    let fetch = &fetch;
    let width = inner_edges.len();

    walk(outer_edge, move |outer: Cursor| async move {
        let cursors = NestedCursors::start(width).advance_outer(outer);
        let page = fetch(cursors.clone()).await?;

        let mut drained = Vec::with_capacity(page.items.len());
        for mut node in page.items {
            let mut edges = Vec::with_capacity(width);
            for (edge, name) in inner_edges.iter().enumerate() {
                let first = node
                    .take_edge(edge)
                    .ok_or_else(|| missing_edge(name, outer_edge, node.identity()))?;
                let items = drain_inner::<O, F, Fut>(
                    fetch,
                    &cursors,
                    edge,
                    name,
                    outer_edge,
                    node.identity(),
                    first,
                )
                .await?;
                edges.push(items);
            }
            drained.push(Drained { node, edges });
        }

        Ok::<_, AacError>(Page::new(drained, page.next, page.has_more))
    })
    .await
}

async fn drain_inner<O, F, Fut>(
    fetch: &F,
    cursors: &NestedCursors,
    edge: usize,
    name: &str,
    outer_edge: &str,
    identity: &str,
    first: Page<O::Inner>,
) -> AacResult<Vec<O::Inner>>
where
    O: NestedNode,
    F: Fn(NestedCursors) -> Fut,
    Fut: Future<Output = AacResult<Page<O>>>,
{
    let mut first = Some(first);

    walk(name, move |cursor: Cursor| {
        let initial = if cursor.is_start() { first.take() } else { None };
        async move {
            if let Some(page) = initial {
                return Ok(page);
            }

            let page = fetch(cursors.resume_inner(edge, cursor)).await?;
            let mut node = page
                .items
                .into_iter()
                .find(|candidate| candidate.identity() == identity)
                .ok_or_else(|| {
                    AacError::ProtocolError(format!(
                        "{} node {:?} disappeared while paging {}",
                        outer_edge, identity, name
                    ))
                })?;
            node.take_edge(edge)
                .ok_or_else(|| missing_edge(name, outer_edge, identity))
        }
    })
    .await
}
