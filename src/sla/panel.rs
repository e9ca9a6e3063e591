use super::tiers::Priority;
use super::weights::{Allocation, AllocationRow, WeightDistributor};
use crate::backend::WorkflowBackend;
use crate::editor::SaveStatus;
use crate::error::EditorError;
use crate::graph::StepId;
use crate::workflow::adapt_weight_data;

/// The weight editing panel of one workflow.
///
/// Loading failures are returned to the caller, which shows a dismiss-only
/// error view. Save failures keep the local weights so the user can retry.
#[derive(Debug, Clone)]
pub struct WeightEditor {
    workflow_id: u64,
    workflow_name: String,
    distributor: WeightDistributor,
    dirty: bool,
    save_status: SaveStatus,
}

impl WeightEditor {
    pub fn new(workflow_id: u64, workflow_name: String, distributor: WeightDistributor) -> Self {
        Self {
            workflow_id,
            workflow_name,
            distributor,
            dirty: false,
            save_status: SaveStatus::Idle,
        }
    }

    pub fn load(backend: &dyn WorkflowBackend, workflow_id: u64) -> Result<Self, EditorError> {
        let data = backend.load_weight_data(workflow_id).inspect_err(|e| {
            tracing::warn!(workflow_id, error = %e, "failed to load weight data");
        })?;
        let (workflow_name, distributor) = adapt_weight_data(data)?;
        tracing::info!(workflow_id, steps = distributor.steps().len(), "weight data loaded");
        Ok(Self::new(workflow_id, workflow_name, distributor))
    }

    pub fn workflow_name(&self) -> &str {
        &self.workflow_name
    }

    pub fn distributor(&self) -> &WeightDistributor {
        &self.distributor
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn save_status(&self) -> &SaveStatus {
        &self.save_status
    }

    pub fn set_weight(&mut self, step_id: &StepId, weight: f64) -> Result<(), EditorError> {
        self.distributor.set_weight(step_id, weight)?;
        self.dirty = true;
        Ok(())
    }

    pub fn rows(&self) -> Vec<AllocationRow> {
        self.distributor.rows()
    }

    pub fn allocation(&self, step_id: &StepId, priority: Priority) -> Option<Allocation> {
        self.distributor.allocation(step_id, priority)
    }

    /// Submits every weight. The last write wins.
    pub fn save(&mut self, backend: &mut dyn WorkflowBackend) -> Result<(), EditorError> {
        if self.save_status == SaveStatus::Saving {
            return Err(EditorError::SaveInProgress);
        }
        self.save_status = SaveStatus::Saving;
        match backend.update_step_weights(self.workflow_id, &self.distributor.updates()) {
            Ok(()) => {
                self.dirty = false;
                self.save_status = SaveStatus::Saved;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    workflow_id = self.workflow_id,
                    error = %e,
                    "failed to save step weights"
                );
                self.save_status = SaveStatus::Failed(e.to_string());
                Err(e.into())
            }
        }
    }
}
