use std::cmp::Ordering;
use std::collections::{btree_map, BTreeMap, HashMap, HashSet};

use crate::models::{AccessEntry, AccessGrant, Repository, TeamGrant, UserGrant};

/// Result of reconciling grants against the organization's repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// One entry per repository with at least one grant, sorted by name.
    pub entries: Vec<AccessEntry>,
    /// Grants naming a repository outside the repository list.
    pub dropped: usize,
    /// Grants repeating an actor already granted on the same repository.
    pub duplicates: usize,
}

/// GitHub repository permission levels, weakest first. Unknown levels rank
/// below all of them.
pub fn access_rank(access: &str) -> u8 {
    match access.to_ascii_uppercase().as_str() {
        "READ" | "PULL" => 1,
        "TRIAGE" => 2,
        "WRITE" | "PUSH" => 3,
        "MAINTAIN" => 4,
        "ADMIN" => 5,
        _ => 0,
    }
}

fn compare_access(a: &str, b: &str) -> Ordering {
    access_rank(a).cmp(&access_rank(b)).then_with(|| a.cmp(b))
}

/// repository -> actor -> access
type GrantIndex = HashMap<String, BTreeMap<String, String>>;

fn index_grants(
    grants: Vec<AccessGrant>,
    known: &HashSet<&str>,
    dropped: &mut usize,
    duplicates: &mut usize,
) -> GrantIndex {
    let mut index = GrantIndex::new();

    for grant in grants {
        if !known.contains(grant.repository.as_str()) {
            *dropped += 1;
            continue;
        }

        let actors = index.entry(grant.repository).or_default();
        match actors.entry(grant.actor) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(grant.access);
            }
            btree_map::Entry::Occupied(mut slot) => {
                *duplicates += 1;
                if compare_access(&grant.access, slot.get()) == Ordering::Greater {
                    slot.insert(grant.access);
                }
            }
        }
    }

    index
}

/// Merge team and user grants into one [`AccessEntry`] per repository.
///
/// Grants are keyed by repository name and reconciled against
/// `known_repos`: grants for other repositories are dropped, repositories
/// without grants get no entry. Grant lists are sorted by actor and entries
/// by repository name, so the result does not depend on input order. An
/// actor granted twice on one repository keeps the stronger access level.
pub fn aggregate(
    team_grants: Vec<AccessGrant>,
    user_grants: Vec<AccessGrant>,
    known_repos: &[Repository],
) -> Aggregation {
    let known: HashSet<&str> = known_repos.iter().map(|repo| repo.name.as_str()).collect();
    let mut dropped = 0;
    let mut duplicates = 0;

    let mut teams = index_grants(team_grants, &known, &mut dropped, &mut duplicates);
    let mut users = index_grants(user_grants, &known, &mut dropped, &mut duplicates);

    let mut entries: Vec<AccessEntry> = known_repos
        .iter()
        .filter_map(|repo| {
            let team_grants = teams.remove(&repo.name).unwrap_or_default();
            let user_grants = users.remove(&repo.name).unwrap_or_default();
            if team_grants.is_empty() && user_grants.is_empty() {
                return None;
            }

            Some(AccessEntry {
                repository: repo.name.clone(),
                teams: team_grants
                    .into_iter()
                    .map(|(slug, access)| TeamGrant { slug, access })
                    .collect(),
                users: user_grants
                    .into_iter()
                    .map(|(login, access)| UserGrant { login, access })
                    .collect(),
            })
        })
        .collect();

    entries.sort_by(|a, b| a.repository.cmp(&b.repository));

    Aggregation {
        entries,
        dropped,
        duplicates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Visibility;

    fn repo(name: &str) -> Repository {
        Repository {
            name: name.to_string(),
            url: format!("https://github.com/acme/{}", name),
            visibility: Visibility::Private,
        }
    }

    fn grant(repository: &str, actor: &str, access: &str) -> AccessGrant {
        AccessGrant::new(repository, actor, access)
    }

    #[test]
    fn omits_ungranted_and_unknown_repositories() {
        let repos = vec![repo("R1"), repo("R2"), repo("R3")];
        let team_grants = vec![grant("R1", "core", "WRITE"), grant("R4", "core", "ADMIN")];
        let user_grants = vec![grant("R2", "alice", "READ")];

        let result = aggregate(team_grants, user_grants, &repos);

        assert_eq!(
            result.entries,
            vec![
                AccessEntry {
                    repository: "R1".into(),
                    teams: vec![TeamGrant { slug: "core".into(), access: "WRITE".into() }],
                    users: vec![],
                },
                AccessEntry {
                    repository: "R2".into(),
                    teams: vec![],
                    users: vec![UserGrant { login: "alice".into(), access: "READ".into() }],
                },
            ]
        );
        assert_eq!(result.dropped, 1);
        assert_eq!(result.duplicates, 0);
    }

    #[test]
    fn entries_and_grants_are_sorted() {
        // Repository list in creation order, not name order.
        let repos = vec![repo("zeta"), repo("alpha"), repo("mid")];
        let team_grants = vec![
            grant("zeta", "web", "READ"),
            grant("zeta", "api", "WRITE"),
            grant("alpha", "sre", "ADMIN"),
        ];
        let user_grants = vec![grant("mid", "carol", "READ"), grant("mid", "bob", "WRITE")];

        let result = aggregate(team_grants, user_grants, &repos);

        let names: Vec<_> = result.entries.iter().map(|e| e.repository.as_str()).collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);

        let zeta_slugs: Vec<_> = result.entries[2].teams.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(zeta_slugs, ["api", "web"]);

        let mid_logins: Vec<_> = result.entries[1].users.iter().map(|u| u.login.as_str()).collect();
        assert_eq!(mid_logins, ["bob", "carol"]);
    }

    #[test]
    fn permuted_input_gives_identical_output() {
        let repos = vec![repo("infra"), repo("web"), repo("docs")];
        let team_grants = vec![
            grant("infra", "sre", "ADMIN"),
            grant("web", "frontend", "WRITE"),
            grant("docs", "writers", "MAINTAIN"),
            grant("web", "sre", "READ"),
            grant("infra", "sre", "WRITE"),
        ];
        let user_grants = vec![
            grant("web", "alice", "WRITE"),
            grant("docs", "bob", "READ"),
            grant("infra", "carol", "TRIAGE"),
        ];

        let forward = aggregate(team_grants.clone(), user_grants.clone(), &repos);

        let mut team_reversed = team_grants;
        team_reversed.reverse();
        let mut user_rotated = user_grants;
        user_rotated.rotate_left(1);
        let mut repos_reversed = repos;
        repos_reversed.reverse();
        let backward = aggregate(team_reversed, user_rotated, &repos_reversed);

        assert_eq!(
            serde_json::to_string(&forward.entries).unwrap(),
            serde_json::to_string(&backward.entries).unwrap()
        );
        assert_eq!(forward, backward);
    }

    #[test]
    fn duplicate_actor_keeps_strongest_access() {
        let repos = vec![repo("infra")];
        let team_grants = vec![
            grant("infra", "sre", "WRITE"),
            grant("infra", "sre", "ADMIN"),
            grant("infra", "sre", "READ"),
        ];

        let result = aggregate(team_grants, Vec::new(), &repos);

        assert_eq!(result.entries[0].teams.len(), 1);
        assert_eq!(result.entries[0].teams[0].access, "ADMIN");
        assert_eq!(result.duplicates, 2);
    }

    #[test]
    fn access_levels_are_ranked() {
        assert!(access_rank("admin") > access_rank("MAINTAIN"));
        assert!(access_rank("MAINTAIN") > access_rank("write"));
        assert!(access_rank("WRITE") > access_rank("TRIAGE"));
        assert!(access_rank("TRIAGE") > access_rank("READ"));
        assert_eq!(access_rank("custom-role"), 0);
    }
}
