//! Console rendering of a selection outcome.

use prefixsel_select::{MONOTONIC_CONSTRAINT, SelectionOutcome};
use std::fmt::Write;

/// Human-readable report.
///
/// Monotonic prefix constraints are summarized unless `all_slacks` is set.
pub fn render_table(model_name: &str, outcome: &SelectionOutcome, all_slacks: bool) -> String {
    let mut out = String::new();
    if !outcome.is_optimal() {
        let _ = writeln!(
            out,
            "No optimal solution found (status: {})",
            outcome.status
        );
        return out;
    }

    let total_rows = outcome.selection.as_ref().map_or(0, Vec::len);
    let _ = writeln!(out, "{:<16} {}", "model:", model_name);
    let _ = writeln!(out, "{:<16} {}", "status:", outcome.status);
    if let Some(selected) = outcome.selected_rows {
        let _ = writeln!(out, "{:<16} {} / {}", "selected rows:", selected, total_rows);
    }
    if let (Some(values), Some(target)) = (outcome.objective_values, outcome.coverage_target) {
        let _ = writeln!(
            out,
            "{:<16} {:.3} (target {:.3})",
            "coverage:", values.coverage, target
        );
        let _ = writeln!(out, "{:<16} {}", "parsimony:", values.parsimony);
    }
    if let Some(selection) = &outcome.selection {
        let bits: Vec<String> = selection.iter().map(u8::to_string).collect();
        let _ = writeln!(out, "{:<16} {}", "selection:", bits.join(" "));
    }

    if let Some(slacks) = &outcome.constraint_slacks {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<24} {:>5} {:>12} {:>12} {:>12}",
            "constraint", "sense", "rhs", "activity", "slack"
        );
        let mut hidden = 0usize;
        let mut binding_hidden = 0usize;
        for slack in slacks {
            if !all_slacks && slack.name.starts_with(MONOTONIC_CONSTRAINT) {
                hidden += 1;
                if slack.slack.abs() < 1e-9 {
                    binding_hidden += 1;
                }
                continue;
            }
            let _ = writeln!(
                out,
                "{:<24} {:>5} {:>12.3} {:>12.3} {:>12.3}",
                slack.name, slack.sense, slack.rhs, slack.activity, slack.slack
            );
        }
        if hidden > 0 {
            let _ = writeln!(
                out,
                "{MONOTONIC_CONSTRAINT}: {hidden} rows, {binding_hidden} binding (use --all-slacks to list)"
            );
        }
    }
    out
}
