//! End-of-run summary printed to stdout

use crate::crawler::{RunReport, RunStatus};

/// Renders the final report: one line per target, then the overall status
pub fn format_summary(report: &RunReport) -> String {
    let mut out = String::from("=== Mirror Summary ===\n\n");

    for snapshot in &report.targets {
        out.push_str("  ");
        out.push_str(&snapshot.summary_line());
        out.push('\n');
    }
    if report.targets.len() < report.requested {
        out.push_str(&format!(
            "  ({} of {} targets not started)\n",
            report.requested - report.targets.len(),
            report.requested
        ));
    }

    let totals = report.totals();
    out.push('\n');
    out.push_str(&format!(
        "Documents: {} completed, {} failed, {} already on disk\n",
        totals.completed, totals.failed, totals.skipped_resumed
    ));

    let duration = report.finished_at - report.started_at;
    out.push_str(&format!(
        "Duration: {}s (started {})\n",
        duration.num_seconds(),
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    let status = match report.status() {
        RunStatus::Success => "success",
        RunStatus::Failed => "completed with failures",
        RunStatus::Interrupted => "interrupted",
    };
    out.push_str(&format!("Status: {}\n", status));
    out
}

/// Prints the summary to stdout
pub fn print_summary(report: &RunReport) {
    print!("{}", format_summary(report));
}
