//! Cursor pagination over GitHub GraphQL connections.
//!
//! Every paginated edge is drained through [`walk`]; edges nested inside a
//! combined query (team members, repository collaborators) go through
//! [`walk_nested`], which owns the cursor-reset rules for the inner edges.

pub mod cursor;
pub mod nested;
pub mod walker;

pub use cursor::{Cursor, CursorTrail, Page, PageInfo};
pub use nested::{walk_nested, Drained, NestedCursors, NestedNode};
pub use walker::walk;
