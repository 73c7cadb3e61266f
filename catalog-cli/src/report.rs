//! End-of-run report: a table for people, JSON for pipelines.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use catalog_sync::{FileOutcome, FileReport};

#[derive(Serialize)]
struct RunReportJson<'a> {
    summary: RunSummaryJson,
    files: Vec<FileReportJson<'a>>,
}

#[derive(Serialize)]
struct RunSummaryJson {
    dry_run: bool,
    files: usize,
    published: usize,
    unchanged: usize,
    failed: usize,
}

#[derive(Serialize)]
struct FileReportJson<'a> {
    kind: String,
    path: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    committed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

#[derive(Tabled)]
struct ReportTableRow {
    #[tabled(rename = "kind")]
    kind: String,
    #[tabled(rename = "descriptor")]
    path: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "version")]
    version: String,
    #[tabled(rename = "detail")]
    detail: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Counts {
    published: usize,
    unchanged: usize,
    failed: usize,
}

fn count(reports: &[FileReport]) -> Counts {
    let mut counts = Counts::default();
    for r in reports {
        match r.outcome {
            FileOutcome::Published { .. } | FileOutcome::AlreadyExisted { .. } => {
                counts.published += 1
            }
            FileOutcome::AlreadyKnown { .. } | FileOutcome::DryRun { .. } => counts.unchanged += 1,
            FileOutcome::Failed { .. } => counts.failed += 1,
        }
    }
    counts
}

pub fn print_json(reports: &[FileReport], dry_run: bool) -> Result<()> {
    let counts = count(reports);
    let payload = RunReportJson {
        summary: RunSummaryJson {
            dry_run,
            files: reports.len(),
            published: counts.published,
            unchanged: counts.unchanged,
            failed: counts.failed,
        },
        files: reports
            .iter()
            .map(|r| FileReportJson {
                kind: r.kind.to_string(),
                path: &r.path,
                status: status_key(&r.outcome),
                version: r.outcome.version(),
                committed: matches!(
                    r.outcome,
                    FileOutcome::Published { committed: true, .. }
                        | FileOutcome::AlreadyExisted { committed: true, .. }
                ),
                error: match &r.outcome {
                    FileOutcome::Failed { error } => Some(error.as_str()),
                    _ => None,
                },
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize run report")?
    );
    Ok(())
}

pub fn print_table(reports: &[FileReport], dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    if reports.is_empty() {
        println!("{prefix}no descriptors found");
        return;
    }

    let counts = count(reports);
    println!(
        "{prefix}{} descriptors | {} published | {} unchanged | {} failed",
        reports.len(),
        counts.published,
        counts.unchanged,
        counts.failed,
    );

    let rows: Vec<ReportTableRow> = reports
        .iter()
        .map(|r| ReportTableRow {
            kind: r.kind.to_string(),
            path: r.path.clone(),
            status: status_label(&r.outcome),
            version: r.outcome.version().unwrap_or("-").to_string(),
            detail: detail(&r.outcome),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    for r in reports {
        if let FileOutcome::DryRun {
            diff: Some(diff), ..
        } = &r.outcome
        {
            print!("{diff}");
            if !diff.ends_with('\n') {
                println!();
            }
        }
    }
}

fn status_key(outcome: &FileOutcome) -> &'static str {
    match outcome {
        FileOutcome::AlreadyKnown { .. } => "already_known",
        FileOutcome::DryRun { .. } => "dry_run",
        FileOutcome::Published { .. } => "published",
        FileOutcome::AlreadyExisted { .. } => "already_existed",
        FileOutcome::Failed { .. } => "failed",
    }
}

fn status_label(outcome: &FileOutcome) -> String {
    match outcome {
        FileOutcome::AlreadyKnown { .. } => "UP TO DATE".bright_black().to_string(),
        FileOutcome::DryRun { .. } => "WOULD PUBLISH".cyan().to_string(),
        FileOutcome::Published { .. } => "PUBLISHED".green().bold().to_string(),
        FileOutcome::AlreadyExisted { .. } => "EXISTED".yellow().to_string(),
        FileOutcome::Failed { .. } => "FAILED".red().bold().to_string(),
    }
}

fn detail(outcome: &FileOutcome) -> String {
    match outcome {
        FileOutcome::AlreadyKnown { .. } => "already recorded".to_string(),
        FileOutcome::DryRun { diff, .. } => match diff {
            Some(_) => "descriptor diff below".to_string(),
            None => "version check skipped".to_string(),
        },
        FileOutcome::Published { committed, .. } | FileOutcome::AlreadyExisted { committed, .. } => {
            if *committed {
                "descriptor updated and committed".to_string()
            } else {
                "descriptor left unchanged".to_string()
            }
        }
        FileOutcome::Failed { error } => error.clone(),
    }
}
