//! Drops trailing lines from low-priority sections until
//! a parsed [`Document`] fits a content-line budget.
//!
//! # Rules
//! - Total = non-blank content lines across every section, HEADER included.
//! - A document already within budget is returned untouched.
//! - Otherwise walk [`TRIM_ORDER`] once. Every section whose name contains the
//!   fragment (case-insensitive) and holds more than [`MIN_LINES_TO_TRIM`]
//!   lines loses its last [`LINES_PER_TRIM`] lines. Stop at the first step that
//!   meets the budget.
//! - Best effort: the result may still be over budget once the list is spent.
//!
//! Projects is trimmed first even though it is often stronger content than
//! Hobbies. The order is policy and kept as-is.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::Document;

/// Budget used when the caller does not supply one.
pub const DEFAULT_LINE_BUDGET: usize = 100;

/// Section name fragments eligible for trimming, in trim order.
pub const TRIM_ORDER: &[&str] = &[
    "Projects",
    "Work Experience",
    "Certifications",
    "Awards",
    "Languages",
    "Hobbies",
];

/// Sections with this many lines or fewer are never trimmed.
pub const MIN_LINES_TO_TRIM: usize = 4;
/// Lines removed from the end of a section per trim step.
pub const LINES_PER_TRIM: usize = 2;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// One trim step: which section lost lines and the document total afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimStep {
    pub section: String,
    pub removed: Vec<String>,
    pub total_after: usize,
}

/// What the trimmer did to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimReport {
    pub budget: usize,
    pub lines_before: usize,
    pub lines_after: usize,
    pub steps: Vec<TrimStep>,
    /// False when the priority list ran out before the budget was met.
    pub within_budget: bool,
}

impl TrimReport {
    pub fn trimmed(&self) -> bool {
        !self.steps.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trimming
// ────────────────────────────────────────────────────────────────────────────

/// Counts the lines the budget applies to.
pub fn estimate_total_lines(document: &Document) -> usize {
    document.total_lines()
}

/// Trims `document` toward `max_lines` and reports the steps taken.
pub fn trim_sections_to_fit(mut document: Document, max_lines: usize) -> (Document, TrimReport) {
    let lines_before = estimate_total_lines(&document);
    let mut report = TrimReport {
        budget: max_lines,
        lines_before,
        lines_after: lines_before,
        steps: Vec::new(),
        within_budget: lines_before <= max_lines,
    };

    if report.within_budget {
        return (document, report);
    }

    'priority: for fragment in TRIM_ORDER {
        let needle = fragment.to_lowercase();
        for index in 0..document.sections().len() {
            let section = &mut document.sections_mut()[index];
            if !section.name.to_lowercase().contains(&needle)
                || section.lines.len() <= MIN_LINES_TO_TRIM
            {
                continue;
            }

            let keep = section.lines.len() - LINES_PER_TRIM;
            let removed = section.lines.split_off(keep);
            let section_name = section.name.clone();

            let total_after = estimate_total_lines(&document);
            debug!(
                section = %section_name,
                removed = removed.len(),
                total_after,
                budget = max_lines,
                "Trimmed section to fit line budget"
            );
            report.steps.push(TrimStep {
                section: section_name,
                removed,
                total_after,
            });
            report.lines_after = total_after;

            if total_after <= max_lines {
                report.within_budget = true;
                break 'priority;
            }
        }
    }

    (document, report)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
