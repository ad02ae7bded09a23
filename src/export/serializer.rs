use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AacError, AacResult};
use crate::models::AccessSnapshot;

/// Structured text format of the exported document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = AacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            other => Err(AacError::InvalidInput(format!(
                "unknown output format {:?} (expected yaml or json)",
                other
            ))),
        }
    }
}

/// Render a snapshot. Keys follow struct field order and every list is
/// already in its canonical order, so equal snapshots render identically.
pub fn render(snapshot: &AccessSnapshot, format: OutputFormat) -> AacResult<String> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(snapshot)?),
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(snapshot)?;
            text.push('\n');
            Ok(text)
        }
    }
}

pub fn parse(text: &str, format: OutputFormat) -> AacResult<AccessSnapshot> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::from_str(text)?),
        OutputFormat::Json => Ok(serde_json::from_str(text)?),
    }
}

/// `<dir>/<organization>.<extension>`
pub fn output_path(dir: &Path, organization: &str, format: OutputFormat) -> PathBuf {
    dir.join(format!("{}.{}", organization, format.extension()))
}

/// Write one organization's snapshot, creating `dir` if needed.
pub fn write_snapshot(
    snapshot: &AccessSnapshot,
    dir: &Path,
    organization: &str,
    format: OutputFormat,
) -> AacResult<PathBuf> {
    let text = render(snapshot, format)?;
    fs::create_dir_all(dir)?;

    let path = output_path(dir, organization, format);
    fs::write(&path, text)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;

    fn acme() -> AccessSnapshot {
        AccessSnapshot {
            organization: Organization {
                id: "O_kgDOAcme".into(),
                name: Some("Acme Corp".into()),
                login: "acme".into(),
                description: None,
                url: "https://github.com/acme".into(),
            },
            repositories: vec![
                Repository {
                    name: "infra".into(),
                    url: "https://github.com/acme/infra".into(),
                    visibility: Visibility::Private,
                },
                Repository {
                    name: "web".into(),
                    url: "https://github.com/acme/web".into(),
                    visibility: Visibility::Public,
                },
            ],
            teams: vec![Team {
                name: "SRE".into(),
                slug: "sre".into(),
                description: Some("Site reliability".into()),
                members: vec!["alice".into(), "bob".into()],
                child_teams: vec!["oncall".into()],
            }],
            members: vec![
                Member { login: "alice".into(), role: "ADMIN".into() },
                Member { login: "bob".into(), role: "MEMBER".into() },
            ],
            permissions: vec![
                AccessEntry {
                    repository: "infra".into(),
                    teams: vec![TeamGrant { slug: "sre".into(), access: "admin".into() }],
                    users: vec![],
                },
                AccessEntry {
                    repository: "web".into(),
                    teams: vec![],
                    users: vec![UserGrant { login: "alice".into(), access: "write".into() }],
                },
            ],
        }
    }

    #[test]
    fn yaml_round_trip() {
        let snapshot = acme();
        let text = render(&snapshot, OutputFormat::Yaml).unwrap();
        assert_eq!(parse(&text, OutputFormat::Yaml).unwrap(), snapshot);
    }

    #[test]
    fn json_round_trip() {
        let snapshot = acme();
        let text = render(&snapshot, OutputFormat::Json).unwrap();
        assert_eq!(parse(&text, OutputFormat::Json).unwrap(), snapshot);
    }

    #[test]
    fn document_keys_follow_field_order() {
        let text = render(&acme(), OutputFormat::Yaml).unwrap();
        let positions: Vec<usize> = ["organization:", "repositories:", "teams:", "members:", "permissions:"]
            .iter()
            .map(|key| text.find(&format!("\n{}", key)).unwrap_or_else(|| text.find(key).unwrap()))
            .collect();

        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
        assert!(text.contains("childTeams:"));
        assert!(text.contains("visibility: private"));
    }

    #[test]
    fn rendering_is_stable() {
        let first = render(&acme(), OutputFormat::Json).unwrap();
        let second = render(&acme(), OutputFormat::Json).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn writes_one_file_per_organization() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_snapshot(&acme(), &dir.path().join("out"), "acme", OutputFormat::Json).unwrap();

        assert_eq!(path, dir.path().join("out").join("acme.json"));
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(parse(&written, OutputFormat::Json).unwrap(), acme());
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("YML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("toml".parse::<OutputFormat>().is_err());
    }
}
