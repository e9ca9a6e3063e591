use super::WorkflowBackend;
use crate::api::{
    EdgeDto, GraphEnvelope, NodeDto, RoleDto, SlaValue, SlasDto, StepWeightDto,
    StepWeightUpdate, WeightDataDto, WireId, WorkflowDetailsPayload,
};
use crate::error::BackendError;
use ahash::AHashMap;

#[derive(Debug, Clone, Default)]
struct StoredWorkflow {
    envelope: GraphEnvelope,
    weights: AHashMap<String, f64>,
}

/// An in-process backend that behaves like the REST service.
///
/// Saving physically removes entries marked `to_delete` and replaces
/// temporary IDs with numeric ones. Useful for tests and offline tooling.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    workflows: AHashMap<u64, StoredWorkflow>,
    roles: Vec<RoleDto>,
    next_id: u64,
    offline: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            next_id: 1000,
            ..Self::default()
        }
    }

    pub fn with_roles<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| RoleDto {
                id: Some(WireId::Number(i as u64 + 1)),
                name: name.into(),
            })
            .collect();
        self
    }

    pub fn insert_workflow(&mut self, workflow_id: u64, mut envelope: GraphEnvelope) {
        envelope.workflow.id = Some(workflow_id);
        self.workflows.insert(
            workflow_id,
            StoredWorkflow {
                envelope,
                weights: AHashMap::new(),
            },
        );
    }

    /// While offline every request fails, as if the network were down.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    fn check_online(&self) -> Result<(), BackendError> {
        if self.offline {
            Err(BackendError::Request("backend is offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn stored(&self, workflow_id: u64) -> Result<&StoredWorkflow, BackendError> {
        self.check_online()?;
        self.workflows
            .get(&workflow_id)
            .ok_or(BackendError::WorkflowNotFound(workflow_id))
    }

    fn stored_mut(&mut self, workflow_id: u64) -> Result<&mut StoredWorkflow, BackendError> {
        self.check_online()?;
        self.workflows
            .get_mut(&workflow_id)
            .ok_or(BackendError::WorkflowNotFound(workflow_id))
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn persist_id(&mut self, id: &WireId) -> u64 {
        match id.as_number() {
            Some(n) => n,
            None => self.allocate_id(),
        }
    }
}

fn node_deleted(node: &NodeDto) -> bool {
    node.to_delete || node.data.to_delete.unwrap_or(false)
}

impl WorkflowBackend for MemoryBackend {
    fn load_graph(&self, workflow_id: u64) -> Result<GraphEnvelope, BackendError> {
        Ok(self.stored(workflow_id)?.envelope.clone())
    }

    fn save_graph(
        &mut self,
        workflow_id: u64,
        payload: &GraphEnvelope,
    ) -> Result<GraphEnvelope, BackendError> {
        self.stored(workflow_id)?;

        let mut id_map: AHashMap<String, u64> = AHashMap::new();
        let mut nodes = Vec::new();
        for node in payload.graph.nodes.iter().filter(|n| !node_deleted(n)) {
            let id = self.persist_id(&node.id);
            id_map.insert(node.id.to_string(), id);
            let mut node = node.clone();
            node.id = WireId::Number(id);
            node.data.to_delete = None;
            nodes.push(node);
        }

        let mut edges: Vec<EdgeDto> = Vec::new();
        for edge in payload.graph.edges.iter().filter(|e| !e.to_delete) {
            let (Some(&source), Some(&target)) = (
                id_map.get(&edge.source.to_string()),
                id_map.get(&edge.target.to_string()),
            ) else {
                continue;
            };
            let id = match &edge.id {
                Some(id) => self.persist_id(id),
                None => self.allocate_id(),
            };
            let mut edge = edge.clone();
            edge.id = Some(WireId::Number(id));
            edge.source = WireId::Number(source);
            edge.target = WireId::Number(target);
            edges.push(edge);
        }

        let stored = self.stored_mut(workflow_id)?;
        stored.envelope.workflow = payload.workflow.clone();
        stored.envelope.workflow.id = Some(workflow_id);
        stored.envelope.graph.nodes = nodes;
        stored.envelope.graph.edges = edges;
        let live: Vec<String> = id_map.values().map(|id| id.to_string()).collect();
        stored.weights.retain(|step_id, _| live.contains(step_id));

        tracing::debug!(workflow_id, "stored workflow graph");
        Ok(stored.envelope.clone())
    }

    fn load_weight_data(&self, workflow_id: u64) -> Result<WeightDataDto, BackendError> {
        let stored = self.stored(workflow_id)?;
        let workflow = &stored.envelope.workflow;
        let steps = stored
            .envelope
            .graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| StepWeightDto {
                step_id: node.id.clone(),
                name: node
                    .data
                    .name
                    .clone()
                    .or_else(|| node.data.label.clone())
                    .unwrap_or_default(),
                role_name: node.data.role.clone(),
                order: Some(i as u32),
                weight: stored.weights.get(&node.id.to_string()).copied(),
            })
            .collect();

        Ok(WeightDataDto {
            workflow_name: workflow.name.clone(),
            slas: SlasDto {
                urgent_sla: workflow.urgent_sla.clone(),
                high_sla: workflow.high_sla.clone(),
                medium_sla: workflow.medium_sla.clone(),
                low_sla: workflow.low_sla.clone(),
            },
            steps,
        })
    }

    fn update_step_weights(
        &mut self,
        workflow_id: u64,
        updates: &[StepWeightUpdate],
    ) -> Result<(), BackendError> {
        let stored = self.stored_mut(workflow_id)?;
        for update in updates {
            let known = stored
                .envelope
                .graph
                .nodes
                .iter()
                .any(|n| n.id.to_string() == update.step_id.as_str());
            if !known {
                return Err(BackendError::Request(format!(
                    "Unknown step {}",
                    update.step_id
                )));
            }
        }
        for update in updates {
            stored
                .weights
                .insert(update.step_id.to_string(), update.weight);
        }
        Ok(())
    }

    fn update_workflow_details(
        &mut self,
        workflow_id: u64,
        details: &WorkflowDetailsPayload,
    ) -> Result<(), BackendError> {
        let workflow = &mut self.stored_mut(workflow_id)?.envelope.workflow;
        workflow.name = details.name.clone();
        workflow.description = Some(details.description.clone());
        workflow.category = details.category.clone();
        workflow.sub_category = details.sub_category.clone();
        workflow.department = details.department.clone();
        workflow.end_logic = details.end_logic.clone();
        workflow.urgent_sla = Some(SlaValue::Text(details.urgent_sla.clone()));
        workflow.high_sla = Some(SlaValue::Text(details.high_sla.clone()));
        workflow.medium_sla = Some(SlaValue::Text(details.medium_sla.clone()));
        workflow.low_sla = Some(SlaValue::Text(details.low_sla.clone()));
        Ok(())
    }

    fn fetch_roles(&self) -> Result<Vec<RoleDto>, BackendError> {
        self.check_online()?;
        Ok(self.roles.clone())
    }
}
