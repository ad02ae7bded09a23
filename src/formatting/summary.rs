use colored::*;

use super::utils::{plural, truncate};
use crate::export::{ExportOutcome, ExportReport};

const MAX_ERROR_LEN: usize = 160;

/// One summary line per organization, without colors.
pub fn outcome_line(outcome: &ExportOutcome) -> String {
    match &outcome.result {
        Ok(exported) => format!(
            "{}: {}, {}, {}, {} -> {}",
            outcome.organization,
            plural(exported.repositories, "repository", "repositories"),
            plural(exported.teams, "team", "teams"),
            plural(exported.members, "member", "members"),
            plural(exported.entries, "access entry", "access entries"),
            exported.path.display()
        ),
        Err(error) => format!(
            "{}: {}",
            outcome.organization,
            truncate(&error.to_string(), MAX_ERROR_LEN)
        ),
    }
}

pub fn print_export_summary(report: &ExportReport) {
    if report.outcomes.is_empty() {
        println!("{}", "No organizations to export.".dimmed());
        return;
    }

    println!("\n{}", "Export summary".bold().blue());
    println!("{}", "═".repeat(60).blue());

    for outcome in &report.outcomes {
        let marker = if outcome.is_ok() { "✓".green() } else { "✗".red() };
        println!("{} {}", marker, outcome_line(outcome));
    }

    let failed = report.failed();
    let failed_label = format!("{} failed", failed);
    println!(
        "\n{} exported, {}",
        report.succeeded().to_string().green().bold(),
        if failed > 0 { failed_label.red() } else { failed_label.dimmed() }
    );
}
