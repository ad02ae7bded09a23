use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AacError, AacResult};

/// Resume point inside one paginated edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// No cursor: fetch from the beginning of the edge.
    #[default]
    Start,
    After(String),
}

impl Cursor {
    pub fn is_start(&self) -> bool {
        matches!(self, Cursor::Start)
    }

    /// The value bound to an `after:` variable.
    pub fn as_variable(&self) -> Value {
        match self {
            Cursor::Start => Value::Null,
            Cursor::After(token) => Value::String(token.clone()),
        }
    }
}

impl From<Option<String>> for Cursor {
    fn from(token: Option<String>) -> Self {
        token.map(Cursor::After).unwrap_or_default()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cursor::Start => f.write_str("<start>"),
            Cursor::After(token) => f.write_str(token),
        }
    }
}

/// `pageInfo` as returned by every GitHub connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

/// One decoded page of an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Cursor,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next: Cursor, has_more: bool) -> Self {
        Self { items, next, has_more }
    }

    /// A final page: nothing follows it.
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, Cursor::Start, false)
    }

    pub fn from_info(items: Vec<T>, info: PageInfo) -> Self {
        Self::new(items, info.end_cursor.into(), info.has_next_page)
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next: self.next,
            has_more: self.has_more,
        }
    }
}

/// Cursors already handed out for one edge.
///
/// GitHub cursors only move forward; a cursor seen twice means the walk
/// would never terminate.
#[derive(Debug, Default)]
pub struct CursorTrail {
    seen: HashSet<String>,
}

impl CursorTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts the cursor returned by a page that reported more results and
    /// returns it as the next resume point.
    pub fn advance(&mut self, edge: &str, next: Cursor) -> AacResult<Cursor> {
        match next {
            Cursor::Start => Err(AacError::ProtocolError(format!(
                "{} reported another page without an end cursor",
                edge
            ))),
            Cursor::After(token) => {
                if !self.seen.insert(token.clone()) {
                    return Err(AacError::ProtocolError(format!(
                        "{} returned cursor {:?} twice",
                        edge, token
                    )));
                }
                Ok(Cursor::After(token))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_end_cursor_means_start() {
        let info: PageInfo =
            serde_json::from_str(r#"{"endCursor": null, "hasNextPage": false}"#).unwrap();
        let page = Page::from_info(vec![1, 2], info);
        assert_eq!(page.next, Cursor::Start);
        assert!(!page.has_more);
        assert_eq!(Cursor::Start.as_variable(), Value::Null);
    }

    #[test]
    fn trail_rejects_repeated_cursor() {
        let mut trail = CursorTrail::new();
        assert!(trail.advance("teams", Cursor::After("a".into())).is_ok());
        assert!(trail.advance("teams", Cursor::After("b".into())).is_ok());

        let err = trail.advance("teams", Cursor::After("a".into())).unwrap_err();
        assert!(err.is_protocol());
        assert_eq!(trail.len(), 2);
    }

    #[test]
    fn trail_rejects_missing_cursor() {
        let mut trail = CursorTrail::new();
        let err = trail.advance("members", Cursor::Start).unwrap_err();
        assert!(err.to_string().contains("members"));
    }
}
