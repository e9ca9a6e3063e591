use super::duration::format_duration;
use super::tiers::{Priority, SlaTiers};
use crate::api::StepWeightUpdate;
use crate::error::SlaError;
use crate::graph::StepId;
use ahash::AHashMap;
use std::fmt;

pub const MIN_WEIGHT: f64 = 0.1;
pub const MAX_WEIGHT: f64 = 1.0;
/// Used when the backend has no weight recorded for a step.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A step's relative share of the SLA time.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedStep {
    pub step_id: StepId,
    pub name: String,
    pub role_name: String,
    pub order: u32,
    pub weight: f64,
}

/// The time a step gets out of one SLA tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Allocation {
    /// All weights sum to zero, so there is nothing to distribute.
    NotAvailable,
    Seconds(f64),
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Allocation::NotAvailable => f.write_str("N/A"),
            Allocation::Seconds(s) => f.write_str(&format_duration(*s)),
        }
    }
}

/// One display row: a step, its share, and its time per tier.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationRow {
    pub step_id: StepId,
    pub name: String,
    pub role_name: String,
    pub weight: f64,
    pub percentage: f64,
    pub allocations: [(Priority, Allocation); 4],
}

/// Distributes each SLA tier across steps in proportion to their weights.
///
/// Weights need not sum to one; every read divides by the current total.
/// Nothing is cached, each query recomputes from the weight map.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightDistributor {
    steps: Vec<WeightedStep>,
    index: AHashMap<StepId, usize>,
    slas: SlaTiers,
}

impl WeightDistributor {
    /// Creates a distributor with steps sorted by their `order`.
    pub fn new(mut steps: Vec<WeightedStep>, slas: SlaTiers) -> Self {
        steps.sort_by_key(|s| s.order);
        let index = steps
            .iter()
            .enumerate()
            .map(|(i, s)| (s.step_id.clone(), i))
            .collect();
        Self { steps, index, slas }
    }

    pub fn steps(&self) -> &[WeightedStep] {
        &self.steps
    }

    pub fn slas(&self) -> &SlaTiers {
        &self.slas
    }

    pub fn total_weight(&self) -> f64 {
        self.steps.iter().map(|s| s.weight).sum()
    }

    pub fn weight(&self, step_id: &StepId) -> Option<f64> {
        self.index.get(step_id).map(|&i| self.steps[i].weight)
    }

    /// Changes one step's weight. No other entry is touched.
    pub fn set_weight(&mut self, step_id: &StepId, weight: f64) -> Result<(), SlaError> {
        let i = *self
            .index
            .get(step_id)
            .ok_or_else(|| SlaError::UnknownStep(step_id.clone()))?;
        if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
            return Err(SlaError::WeightOutOfRange {
                step_id: step_id.clone(),
                weight,
                min: MIN_WEIGHT,
                max: MAX_WEIGHT,
            });
        }
        self.steps[i].weight = weight;
        Ok(())
    }

    /// The step's share of the total in percent, or 0 when the total is zero.
    pub fn percentage(&self, step_id: &StepId) -> Option<f64> {
        let weight = self.weight(step_id)?;
        let total = self.total_weight();
        Some(if total == 0.0 {
            0.0
        } else {
            100.0 * weight / total
        })
    }

    /// `D * w / total` for the tier's duration `D`.
    pub fn allocation(&self, step_id: &StepId, priority: Priority) -> Option<Allocation> {
        let weight = self.weight(step_id)?;
        Some(self.allocate(weight, priority))
    }

    fn allocate(&self, weight: f64, priority: Priority) -> Allocation {
        let total = self.total_weight();
        if total == 0.0 {
            return Allocation::NotAvailable;
        }
        let tier_seconds = self.slas.get(priority).as_seconds() as f64;
        Allocation::Seconds(tier_seconds * weight / total)
    }

    /// Display rows for every step, in step order.
    pub fn rows(&self) -> Vec<AllocationRow> {
        let total = self.total_weight();
        self.steps
            .iter()
            .map(|s| AllocationRow {
                step_id: s.step_id.clone(),
                name: s.name.clone(),
                role_name: s.role_name.clone(),
                weight: s.weight,
                percentage: if total == 0.0 {
                    0.0
                } else {
                    100.0 * s.weight / total
                },
                allocations: Priority::ALL.map(|p| (p, self.allocate(s.weight, p))),
            })
            .collect()
    }

    /// The payload submitted on save.
    pub fn updates(&self) -> Vec<StepWeightUpdate> {
        self.steps
            .iter()
            .map(|s| StepWeightUpdate {
                step_id: s.step_id.clone(),
                weight: s.weight,
            })
            .collect()
    }
}
