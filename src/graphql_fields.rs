use std::fmt;

/// GraphQL field selection builder.
///
/// Fields render in insertion order so generated documents are stable
/// across runs; inserting the same field twice is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    fields: Vec<String>,
}

impl FieldSelection {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    fn push(mut self, field: String) -> Self {
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
        self
    }

    /// Add a simple field
    pub fn field(self, name: &str) -> Self {
        self.push(name.to_string())
    }

    /// Add multiple simple fields
    pub fn fields(self, names: &[&str]) -> Self {
        names.iter().fold(self, |selection, name| selection.field(name))
    }

    /// Add a nested field with its own selection
    pub fn nested(self, name: &str, selection: FieldSelection) -> Self {
        self.push(format!("{} {{ {} }}", name, selection))
    }

    /// Add a nested field with arguments
    pub fn nested_with_args(
        self,
        name: &str,
        args: &[(&str, &str)],
        selection: FieldSelection,
    ) -> Self {
        self.push(format!("{}({}) {{ {} }}", name, format_args_list(args), selection))
    }

    /// Merge another field selection into this one
    pub fn merge(self, other: FieldSelection) -> Self {
        other.fields.into_iter().fold(self, FieldSelection::push)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub(crate) fn format_args_list(args: &[(&str, &str)]) -> String {
    args.iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for FieldSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fields.join(" "))
    }
}

impl Default for FieldSelection {
    fn default() -> Self {
        Self::new()
    }
}

/// Predefined field selections for the GitHub objects we export
pub mod selections {
    use super::FieldSelection;

    pub fn page_info() -> FieldSelection {
        FieldSelection::new().fields(&["endCursor", "hasNextPage"])
    }

    /// A paginated connection read through `nodes`.
    pub fn node_connection(
        name: &str,
        args: &[(&str, &str)],
        node: FieldSelection,
    ) -> FieldSelection {
        FieldSelection::new().nested_with_args(
            name,
            args,
            FieldSelection::new()
                .nested("nodes", node)
                .nested("pageInfo", page_info()),
        )
    }

    /// A paginated connection read through `edges`, for edge-level fields
    /// such as `permission` or `role`.
    pub fn edge_connection(
        name: &str,
        args: &[(&str, &str)],
        edge: FieldSelection,
    ) -> FieldSelection {
        FieldSelection::new().nested_with_args(
            name,
            args,
            FieldSelection::new()
                .nested("edges", edge)
                .nested("pageInfo", page_info()),
        )
    }

    pub fn organization_fields() -> FieldSelection {
        FieldSelection::new().fields(&["id", "name", "login", "description", "url"])
    }

    pub fn repository_fields() -> FieldSelection {
        FieldSelection::new().fields(&["name", "url", "visibility"])
    }

    pub fn team_fields() -> FieldSelection {
        FieldSelection::new().fields(&["name", "slug", "description"])
    }

    pub fn login() -> FieldSelection {
        FieldSelection::new().field("login")
    }

    pub fn name() -> FieldSelection {
        FieldSelection::new().field("name")
    }
}

#[cfg(test)]
mod tests {
    use super::selections::*;
    use super::*;

    #[test]
    fn renders_in_insertion_order() {
        let selection = FieldSelection::new().fields(&["name", "url", "name"]);
        assert_eq!(selection.to_string(), "name url");
    }

    #[test]
    fn renders_connections_with_page_info() {
        let selection = node_connection("repositories", &[("first", "10")], name());
        assert_eq!(
            selection.to_string(),
            "repositories(first: 10) { nodes { name } pageInfo { endCursor hasNextPage } }"
        );
    }
}
