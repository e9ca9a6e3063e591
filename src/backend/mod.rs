use crate::api::{
    GraphEnvelope, RoleDto, StepWeightUpdate, WeightDataDto, WorkflowDetailsPayload,
};
use crate::error::BackendError;

mod memory;

pub use memory::MemoryBackend;

/// The REST collaborator behind the editor.
///
/// The backend is the only durable store. Saves send the full graph and the
/// last one wins; there is no conflict detection.
pub trait WorkflowBackend {
    /// `GET workflow graph`
    fn load_graph(&self, workflow_id: u64) -> Result<GraphEnvelope, BackendError>;

    /// `PUT workflow graph`. Returns the graph as stored, with permanent IDs
    /// and without the entries that were marked for deletion.
    fn save_graph(
        &mut self,
        workflow_id: u64,
        payload: &GraphEnvelope,
    ) -> Result<GraphEnvelope, BackendError>;

    /// `GET workflow weight data`
    fn load_weight_data(&self, workflow_id: u64) -> Result<WeightDataDto, BackendError>;

    /// `PUT updateStepWeights`
    fn update_step_weights(
        &mut self,
        workflow_id: u64,
        updates: &[StepWeightUpdate],
    ) -> Result<(), BackendError>;

    /// `PUT updateWorkflowDetails`
    fn update_workflow_details(
        &mut self,
        workflow_id: u64,
        details: &WorkflowDetailsPayload,
    ) -> Result<(), BackendError>;

    /// `GET roles`
    fn fetch_roles(&self) -> Result<Vec<RoleDto>, BackendError>;
}
