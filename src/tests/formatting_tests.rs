use std::path::PathBuf;

use crate::error::{AacError, Stage};
use crate::export::{ExportOutcome, ExportReport, ExportedSnapshot};
use crate::formatting::{outcome_line, plural, truncate};

fn exported(organization: &str) -> ExportOutcome {
    ExportOutcome {
        organization: organization.to_string(),
        result: Ok(ExportedSnapshot {
            path: PathBuf::from("out").join(format!("{}.yaml", organization)),
            repositories: 2,
            teams: 1,
            members: 3,
            entries: 2,
        }),
    }
}

fn failed(organization: &str) -> ExportOutcome {
    ExportOutcome {
        organization: organization.to_string(),
        result: Err(AacError::SnapshotFailed {
            organization: organization.to_string(),
            stage: Stage::FetchMembers,
            source: Box::new(AacError::ApiError("HTTP 403".to_string())),
        }),
    }
}

#[test]
fn test_plural() {
    assert_eq!(plural(1, "repository", "repositories"), "1 repository");
    assert_eq!(plural(0, "repository", "repositories"), "0 repositories");
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a long error message", 10), "a long ...");
}

#[test]
fn test_outcome_lines() {
    let line = outcome_line(&exported("acme"));
    assert!(line.starts_with("acme: 2 repositories, 1 team, 3 members, 2 access entries -> "));
    assert!(line.ends_with("acme.yaml"));

    assert_eq!(
        outcome_line(&failed("globex")),
        "globex: snapshot for globex failed at members: API request failed: HTTP 403"
    );
}

#[test]
fn test_report_counts() {
    let report = ExportReport {
        outcomes: vec![exported("acme"), failed("globex")],
    };
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    assert!(!report.all_failed());
    assert!(report.failure().is_none());

    let report = ExportReport {
        outcomes: vec![failed("globex")],
    };
    assert!(report.all_failed());
    assert!(!ExportReport::default().all_failed());
}

#[test]
fn test_total_failure_does_not_repeat_the_cause() {
    let report = ExportReport {
        outcomes: vec![failed("globex"), failed("initech")],
    };

    let error = report.failure().unwrap();
    assert!(matches!(error, AacError::ExportFailed(2)));
    assert_eq!(error.stage(), None);
    assert!(!error.to_string().contains("HTTP 403"));
}
