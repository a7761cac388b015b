//! Violation report export

use crate::models::Violation;

pub const CSV_HEADER: [&str; 5] = ["Dataset", "Row", "Rule", "Severity", "Reason"];

/// Render violations as CSV, one line per violation after the header.
pub fn violations_to_csv(violations: &[Violation]) -> String {
    let mut csv = String::new();
    csv.push_str(&CSV_HEADER.join(","));
    csv.push('\n');

    for violation in violations {
        let row = [
            violation.dataset.as_str().to_string(),
            violation.row.to_string(),
            violation.rule.as_str().to_string(),
            violation.severity.as_str().to_string(),
            escape_csv_value(&violation.reason),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

fn escape_csv_value(value: &str) -> String {
    if value.contains(|c| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
