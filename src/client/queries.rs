//! GraphQL documents for every edge the export walks.
//!
//! Each document takes `$org` plus one `String` cursor variable per
//! paginated edge it selects; a null cursor reads from the start.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::graphql::QueryBuilder;
use crate::error::AacError;
use crate::graphql_fields::selections::*;
use crate::graphql_fields::FieldSelection;

/// Order in which the organization's repositories are requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepositoryOrder {
    #[default]
    Name,
    CreatedAt,
}

impl RepositoryOrder {
    fn graphql_field(self) -> &'static str {
        match self {
            RepositoryOrder::Name => "NAME",
            RepositoryOrder::CreatedAt => "CREATED_AT",
        }
    }
}

impl fmt::Display for RepositoryOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryOrder::Name => f.write_str("name"),
            RepositoryOrder::CreatedAt => f.write_str("created-at"),
        }
    }
}

impl FromStr for RepositoryOrder {
    type Err = AacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(RepositoryOrder::Name),
            "created-at" | "created_at" | "created" => Ok(RepositoryOrder::CreatedAt),
            other => Err(AacError::InvalidInput(format!(
                "unknown repository order {:?} (expected name or created-at)",
                other
            ))),
        }
    }
}

fn order_by(field: &str) -> String {
    format!("{{field: {}, direction: ASC}}", field)
}

fn in_organization(selection: FieldSelection) -> FieldSelection {
    FieldSelection::new().nested_with_args("organization", &[("login", "$org")], selection)
}

pub fn organization() -> String {
    QueryBuilder::new("OrganizationInfo")
        .variable("org", "String!")
        .selection(in_organization(organization_fields()))
        .build()
}

pub fn repositories(page_size: u32, order: RepositoryOrder) -> String {
    let first = page_size.to_string();
    let order = order_by(order.graphql_field());

    QueryBuilder::new("Repositories")
        .variable("org", "String!")
        .variable("repoCursor", "String")
        .selection(in_organization(node_connection(
            "repositories",
            &[("first", first.as_str()), ("after", "$repoCursor"), ("orderBy", order.as_str())],
            repository_fields(),
        )))
        .build()
}

pub fn teams(page_size: u32) -> String {
    let first = page_size.to_string();
    let by_name = order_by("NAME");
    let by_login = order_by("LOGIN");

    let team = team_fields()
        .merge(node_connection(
            "members",
            &[("first", first.as_str()), ("after", "$memberCursor"), ("orderBy", by_login.as_str())],
            login(),
        ))
        .merge(node_connection(
            "childTeams",
            &[("first", first.as_str()), ("after", "$childTeamCursor"), ("orderBy", by_name.as_str())],
            name(),
        ));

    QueryBuilder::new("Teams")
        .variable("org", "String!")
        .variable("teamCursor", "String")
        .variable("memberCursor", "String")
        .variable("childTeamCursor", "String")
        .selection(in_organization(node_connection(
            "teams",
            &[("first", first.as_str()), ("after", "$teamCursor"), ("orderBy", by_name.as_str())],
            team,
        )))
        .build()
}

pub fn members(page_size: u32) -> String {
    let first = page_size.to_string();

    QueryBuilder::new("Members")
        .variable("org", "String!")
        .variable("memberCursor", "String")
        .selection(in_organization(edge_connection(
            "membersWithRole",
            &[("first", first.as_str()), ("after", "$memberCursor")],
            FieldSelection::new().field("role").nested("node", login()),
        )))
        .build()
}

pub fn team_repositories(page_size: u32) -> String {
    let first = page_size.to_string();
    let by_name = order_by("NAME");

    QueryBuilder::new("TeamRepositories")
        .variable("org", "String!")
        .variable("slug", "String!")
        .variable("repoCursor", "String")
        .selection(in_organization(FieldSelection::new().nested_with_args(
            "team",
            &[("slug", "$slug")],
            edge_connection(
                "repositories",
                &[("first", first.as_str()), ("after", "$repoCursor"), ("orderBy", by_name.as_str())],
                FieldSelection::new()
                    .field("permission")
                    .nested("node", name()),
            ),
        )))
        .build()
}

pub fn repository_collaborators(page_size: u32, order: RepositoryOrder) -> String {
    let first = page_size.to_string();
    let order = order_by(order.graphql_field());

    let repository = name().merge(edge_connection(
        "collaborators",
        &[("first", first.as_str()), ("after", "$collabCursor")],
        FieldSelection::new()
            .field("permission")
            .nested("node", login()),
    ));

    QueryBuilder::new("RepositoryCollaborators")
        .variable("org", "String!")
        .variable("repoCursor", "String")
        .variable("collabCursor", "String")
        .selection(in_organization(node_connection(
            "repositories",
            &[("first", first.as_str()), ("after", "$repoCursor"), ("orderBy", order.as_str())],
            repository,
        )))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::graphql::operation_name;

    #[test]
    fn every_document_is_named() {
        let documents = [
            (organization(), "OrganizationInfo"),
            (repositories(100, RepositoryOrder::Name), "Repositories"),
            (teams(100), "Teams"),
            (members(100), "Members"),
            (team_repositories(100), "TeamRepositories"),
            (
                repository_collaborators(100, RepositoryOrder::CreatedAt),
                "RepositoryCollaborators",
            ),
        ];
        for (document, name) in &documents {
            assert_eq!(operation_name(document), Some(*name));
        }
    }

    #[test]
    fn teams_document_declares_every_cursor() {
        let document = teams(50);
        for variable in ["$teamCursor", "$memberCursor", "$childTeamCursor"] {
            assert!(document.contains(&format!("{}: String", variable)), "{}", variable);
            assert!(document.contains(&format!("after: {}", variable)), "{}", variable);
        }
        assert!(document.contains("first: 50"));
    }

    #[test]
    fn repository_order_is_configurable() {
        assert!(repositories(100, RepositoryOrder::CreatedAt)
            .contains("orderBy: {field: CREATED_AT, direction: ASC}"));
        assert_eq!("created-at".parse::<RepositoryOrder>().unwrap(), RepositoryOrder::CreatedAt);
        assert!("size".parse::<RepositoryOrder>().is_err());
    }
}
