use std::future::Future;

use super::cursor::{Cursor, CursorTrail, Page};
use crate::error::AacResult;

/// Drain one paginated edge.
///
/// `fetch_page` is called with [`Cursor::Start`] first and then with each
/// cursor the previous page returned, until a page reports no more results.
/// Items are returned in server order. The first failing fetch aborts the
/// walk; items gathered so far are dropped with it.
pub async fn walk<T, F, Fut>(edge: &str, mut fetch_page: F) -> AacResult<Vec<T>>
where
    F: FnMut(Cursor) -> Fut,
    Fut: Future<Output = AacResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut trail = CursorTrail::new();
    let mut cursor = Cursor::Start;

    loop {
        let page = fetch_page(cursor).await?;
        items.extend(page.items);

        if !page.has_more {
            return Ok(items);
        }
        cursor = trail.advance(edge, page.next)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AacError;
    use futures::future::ready;
    use std::cell::Cell;

    /// Serves `total` integers in pages of `size`, cursors "p1", "p2", ...
    fn serve(total: usize, size: usize, cursor: &Cursor) -> AacResult<Page<usize>> {
        let index = match cursor {
            Cursor::Start => 0,
            Cursor::After(token) => token[1..].parse::<usize>().unwrap(),
        };
        let start = index * size;
        let end = (start + size).min(total);
        let has_more = end < total;
        let next = if has_more {
            Cursor::After(format!("p{}", index + 1))
        } else {
            Cursor::Start
        };
        Ok(Page::new((start..end).collect(), next, has_more))
    }

    #[tokio::test]
    async fn collects_every_item_in_server_order() {
        for total in 1..=9 {
            for size in 1..=4 {
                let calls = Cell::new(0);
                let items = walk("numbers", |cursor| {
                    calls.set(calls.get() + 1);
                    ready(serve(total, size, &cursor))
                })
                .await
                .unwrap();

                assert_eq!(items, (0..total).collect::<Vec<_>>());
                assert_eq!(calls.get(), total.div_ceil(size));
            }
        }
    }

    #[tokio::test]
    async fn empty_edge_yields_nothing() {
        let items: Vec<u8> = walk("empty", |_| ready(Ok(Page::last(Vec::new()))))
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn stale_cursor_is_a_protocol_error() {
        let calls = Cell::new(0);
        let result = walk("repositories", |_| {
            calls.set(calls.get() + 1);
            ready(Ok(Page::new(vec![1], Cursor::After("same".into()), true)))
        })
        .await;

        let err = result.unwrap_err();
        assert!(err.is_protocol());
        assert!(!err.is_transport());
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn fetch_error_aborts_the_walk() {
        let calls = Cell::new(0);
        let result: AacResult<Vec<usize>> = walk("teams", |cursor| {
            calls.set(calls.get() + 1);
            if cursor.is_start() {
                ready(serve(10, 2, &cursor))
            } else {
                ready(Err(AacError::ApiError("502 Bad Gateway".into())))
            }
        })
        .await;

        assert!(result.unwrap_err().is_transport());
        assert_eq!(calls.get(), 2);
    }
}
