use crate::api::{WireId, WorkflowDetailsPayload};
use crate::error::WorkflowError;
use crate::graph::WorkflowGraph;
use crate::sla::SlaTiers;

/// Workflow-level settings edited outside the graph canvas.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowDetails {
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub department: Option<String>,
    pub end_logic: Option<String>,
    pub slas: SlaTiers,
}

impl WorkflowDetails {
    /// Pre-submit checks. A failure blocks the save call entirely.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("Workflow name is required".to_string());
        }
        errors.extend(self.slas.ordering_errors());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(WorkflowError::Invalid(errors))
        }
    }

    pub fn to_payload(&self) -> Result<WorkflowDetailsPayload, WorkflowError> {
        self.validate()?;
        let id = |value: &Option<String>| value.as_deref().map(WireId::from_text);
        Ok(WorkflowDetailsPayload {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            category: id(&self.category),
            sub_category: id(&self.sub_category),
            department: id(&self.department),
            end_logic: self.end_logic.clone(),
            urgent_sla: self.slas.urgent.to_duration_string(),
            high_sla: self.slas.high.to_duration_string(),
            medium_sla: self.slas.medium.to_duration_string(),
            low_sla: self.slas.low.to_duration_string(),
        })
    }
}

/// A workflow as loaded from the backend: its details and its graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedWorkflow {
    pub id: Option<u64>,
    pub details: WorkflowDetails,
    pub graph: WorkflowGraph,
}
