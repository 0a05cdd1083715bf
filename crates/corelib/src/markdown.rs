//! Markdown summary of the diagnostics of a run, for CI job summaries

use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};

use crate::types::Diagnostic;

/// Builds the complete Markdown summary
pub fn generate_report(diagnostics: &[Diagnostic], target: Option<&str>) -> String {
    let mut report = String::new();

    report.push_str(&generate_header(target));
    report.push_str(&generate_summary(diagnostics));
    report.push_str(&generate_findings_section(diagnostics));

    report
}

fn generate_header(target: Option<&str>) -> String {
    format!(
        r#"# C/C++test Static Analysis

**Date:** {date}
**Target:** {target}
**Generated by:** cpptest-corelib {version}

---

"#,
        date = Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        target = target.unwrap_or("n/a"),
        version = crate::VERSION
    )
}

fn generate_summary(diagnostics: &[Diagnostic]) -> String {
    let files: BTreeSet<&str> = diagnostics.iter().map(|d| d.path.as_str()).collect();

    let mut by_rule: BTreeMap<&str, usize> = BTreeMap::new();
    for diagnostic in diagnostics {
        *by_rule.entry(diagnostic.rule.as_str()).or_insert(0) += 1;
    }

    let mut summary = format!(
        "## Summary\n\n- **Findings:** {}\n- **Files with findings:** {}\n\n",
        diagnostics.len(),
        files.len()
    );

    if !by_rule.is_empty() {
        summary.push_str("| Rule | Findings |\n|---|---|\n");
        for (rule, count) in by_rule {
            summary.push_str(&format!("| `{}` | {} |\n", escape_cell(rule), count));
        }
        summary.push('\n');
    }

    summary
}

fn generate_findings_section(diagnostics: &[Diagnostic]) -> String {
    if diagnostics.is_empty() {
        return "## Findings\n\nNo findings.\n".to_string();
    }

    let mut section =
        String::from("## Findings\n\n| Location | Level | Rule | Message |\n|---|---|---|---|\n");

    for diagnostic in diagnostics {
        let location = match diagnostic.start.column {
            Some(column) => format!("{}:{}:{}", diagnostic.path, diagnostic.start.line, column),
            None => format!("{}:{}", diagnostic.path, diagnostic.start.line),
        };
        section.push_str(&format!(
            "| `{}` | {} | `{}` | {} |\n",
            escape_cell(&location),
            diagnostic.level.as_deref().unwrap_or("-"),
            escape_cell(&diagnostic.rule),
            escape_cell(&diagnostic.message)
        ));
    }

    section
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
