//! Report rendering.
//!
//! Turns a classified [`Report`] into the tables printed at the end of an
//! experiment.

use crate::cli::output;
use crate::core::classify::Finding;
use crate::core::constants::{CAPTURE_JOB, PRINT_JOB};
use crate::core::experiment::Report;

const CELL: usize = 16;

/// Print `report` with its closing summary.
pub fn print(report: &Report) {
    match report {
        Report::Matrix { v1, v2, matrix } => {
            output::section("Job × secret version");
            output::kv("V1", v1);
            output::kv("V2", v2);
            println!();
            println!("  {:<10}{:<w$}{:<w$}", "", "V1", "V2", w = CELL);
            println!(
                "  {:<10}{}{}",
                CAPTURE_JOB,
                output::verdict(matrix.origin_v1, CELL),
                output::verdict(matrix.origin_v2, CELL)
            );
            println!(
                "  {:<10}{}{}",
                PRINT_JOB,
                output::verdict(matrix.downstream_v1, CELL),
                output::verdict(matrix.downstream_v2, CELL)
            );
        }
        Report::Statement { job, v1, v2 } => {
            output::section(&format!("{} job", job));
            println!("  {:<10}{}", "V1", output::verdict(*v1, CELL));
            println!("  {:<10}{}", "V2", output::verdict(*v2, CELL));
        }
        Report::Versions { job, findings } => {
            output::section(&format!("{} job, per rotation", job));
            findings_table(findings);
        }
        Report::Transforms {
            job,
            literal,
            findings,
        } => {
            output::section(&format!("{} job, per transform", job));
            findings_table(std::slice::from_ref(literal));
            findings_table(findings);
        }
    }

    println!();
    if report.leaked() {
        output::warn(&report.summary());
    } else {
        output::header(&report.summary());
    }
}

fn findings_table(findings: &[Finding]) {
    let width = findings
        .iter()
        .map(|f| f.check.label.len())
        .max()
        .unwrap_or(0)
        + 2;
    for finding in findings {
        println!(
            "  {:<width$}{}",
            finding.check.label,
            output::verdict(finding.verdict, CELL),
            width = width
        );
    }
}
