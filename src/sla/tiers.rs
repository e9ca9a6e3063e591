use super::duration::SlaDuration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An SLA priority tier. Each tier carries its own total allowed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

impl Priority {
    /// All tiers, from the tightest deadline to the loosest.
    pub const ALL: [Priority; 4] = [
        Priority::Urgent,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Urgent => "Urgent",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four SLA durations of a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlaTiers {
    pub urgent: SlaDuration,
    pub high: SlaDuration,
    pub medium: SlaDuration,
    pub low: SlaDuration,
}

impl SlaTiers {
    pub fn new(
        urgent: SlaDuration,
        high: SlaDuration,
        medium: SlaDuration,
        low: SlaDuration,
    ) -> Self {
        Self {
            urgent,
            high,
            medium,
            low,
        }
    }

    pub fn get(&self, priority: Priority) -> SlaDuration {
        match priority {
            Priority::Urgent => self.urgent,
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    pub fn set(&mut self, priority: Priority, duration: SlaDuration) {
        match priority {
            Priority::Urgent => self.urgent = duration,
            Priority::High => self.high = duration,
            Priority::Medium => self.medium = duration,
            Priority::Low => self.low = duration,
        }
    }

    /// Checks that tighter tiers have strictly shorter durations.
    ///
    /// Only adjacent tiers that are both non-zero are compared, so a workflow
    /// may leave some tiers unset.
    pub fn ordering_errors(&self) -> Vec<String> {
        Priority::ALL
            .windows(2)
            .filter_map(|pair| {
                let (tighter, looser) = (pair[0], pair[1]);
                let (a, b) = (self.get(tighter), self.get(looser));
                (!a.is_zero() && !b.is_zero() && a >= b).then(|| {
                    format!(
                        "{} SLA must be shorter than {} SLA",
                        tighter.label(),
                        looser.label()
                    )
                })
            })
            .collect()
    }
}
