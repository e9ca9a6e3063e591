use super::model::{Step, StepId, Transition};
use ahash::AHashSet;
use std::fmt;

/// A structural problem found in a workflow graph.
///
/// Issues are advisory. They describe what a reviewer should look at, they do
/// not carry a severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    NoStartStep,
    MultipleStartSteps(usize),
    NoEndStep,
    /// Regular steps that no transition references.
    OrphanSteps(Vec<StepId>),
    /// Live transitions whose source or target is missing or marked for deletion.
    DanglingTransitions(usize),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NoStartStep => f.write_str("No start step defined"),
            ValidationIssue::MultipleStartSteps(_) => f.write_str("Multiple start steps defined"),
            ValidationIssue::NoEndStep => f.write_str("No end step defined"),
            ValidationIssue::OrphanSteps(ids) => {
                write!(f, "{} orphan step(s) without connections", ids.len())
            }
            ValidationIssue::DanglingTransitions(n) => {
                write!(f, "{} transition(s) reference missing or deleted steps", n)
            }
        }
    }
}

/// Derives structural warnings from a set of steps and transitions.
///
/// Entries marked for deletion are ignored, since they disappear on the next save.
/// Checks run in a fixed order: start steps, end steps, orphans, dangling transitions.
pub fn validate_graph(steps: &[Step], transitions: &[Transition]) -> Vec<ValidationIssue> {
    let steps: Vec<&Step> = steps.iter().filter(|s| s.is_live()).collect();
    let transitions: Vec<&Transition> = transitions.iter().filter(|t| t.is_live()).collect();
    let mut issues = Vec::new();

    let start_count = steps.iter().filter(|s| s.is_start).count();
    match start_count {
        0 => issues.push(ValidationIssue::NoStartStep),
        1 => {}
        n => issues.push(ValidationIssue::MultipleStartSteps(n)),
    }

    if !steps.iter().any(|s| s.is_end) {
        issues.push(ValidationIssue::NoEndStep);
    }

    let referenced: AHashSet<&StepId> = transitions
        .iter()
        .flat_map(|t| [&t.source, &t.target])
        .collect();

    // A lone step is never an orphan.
    if steps.len() > 1 {
        let orphans: Vec<StepId> = steps
            .iter()
            .filter(|s| !s.is_start && !s.is_end && !referenced.contains(&s.id))
            .map(|s| s.id.clone())
            .collect();
        if !orphans.is_empty() {
            issues.push(ValidationIssue::OrphanSteps(orphans));
        }
    }

    let live_ids: AHashSet<&StepId> = steps.iter().map(|s| &s.id).collect();
    let dangling = transitions
        .iter()
        .filter(|t| !live_ids.contains(&t.source) || !live_ids.contains(&t.target))
        .count();
    if dangling > 0 {
        issues.push(ValidationIssue::DanglingTransitions(dangling));
    }

    issues
}
