use super::definition::{LoadedWorkflow, WorkflowDetails};
use crate::api::{
    EdgeDto, GraphDto, GraphEnvelope, NodeDataDto, NodeDto, PositionDto, RoleDto, SlaValue,
    WeightDataDto, WireId, WorkflowDto,
};
use crate::config::HandlePolicy;
use crate::editor::{Role, RoleDirectory};
use crate::error::{ConversionError, HandleError};
use crate::graph::{
    Handle, HandleRole, Position, Step, StepId, Transition, TransitionId, WorkflowGraph,
    resolve_handle,
};
use crate::sla::{DEFAULT_WEIGHT, SlaDuration, SlaTiers, WeightDistributor, WeightedStep};

/// A trait for wire formats that can be converted into a loaded workflow.
///
/// This is the one place where loose backend field names are resolved. Code
/// past this boundary only sees the canonical model.
///
/// # Example
///
/// ```rust,no_run
/// use keiro::prelude::*;
///
/// # fn run() -> Result<()> {
/// let json = std::fs::read_to_string("workflow_graph.json")?;
/// let envelope: GraphEnvelope = serde_json::from_str(&json)?;
/// let loaded = envelope.into_workflow(HandlePolicy::Lenient)?;
/// println!("{} steps", loaded.graph.steps().len());
/// # Ok(())
/// # }
/// ```
pub trait IntoWorkflow {
    /// Consumes the object and converts it into the canonical workflow model.
    fn into_workflow(self, policy: HandlePolicy) -> Result<LoadedWorkflow, ConversionError>;
}

impl IntoWorkflow for GraphEnvelope {
    fn into_workflow(self, policy: HandlePolicy) -> Result<LoadedWorkflow, ConversionError> {
        let id = self.workflow.id;
        let details = adapt_details(self.workflow)?;
        let steps = self.graph.nodes.into_iter().map(adapt_step).collect();
        let transitions = self
            .graph
            .edges
            .into_iter()
            .map(|edge| adapt_transition(edge, policy))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LoadedWorkflow {
            id,
            details,
            graph: WorkflowGraph::from_parts(steps, transitions),
        })
    }
}

fn wire_to_string(id: WireId) -> String {
    id.to_string()
}

fn sla(value: Option<SlaValue>) -> Result<SlaDuration, ConversionError> {
    Ok(match value {
        Some(v) => v.to_duration()?,
        None => SlaDuration::ZERO,
    })
}

pub fn adapt_details(dto: WorkflowDto) -> Result<WorkflowDetails, ConversionError> {
    Ok(WorkflowDetails {
        name: dto.name,
        description: dto.description.unwrap_or_default(),
        category: dto.category.map(wire_to_string),
        sub_category: dto.sub_category.map(wire_to_string),
        department: dto.department.map(wire_to_string),
        end_logic: dto.end_logic,
        slas: SlaTiers::new(
            sla(dto.urgent_sla)?,
            sla(dto.high_sla)?,
            sla(dto.medium_sla)?,
            sla(dto.low_sla)?,
        ),
    })
}

/// Maps a node to a step. `name` wins over `label`; a deletion mark on either
/// the node or its data counts.
pub fn adapt_step(node: NodeDto) -> Step {
    let data = node.data;
    let is_start = data.is_start.unwrap_or(false);
    let mut is_end = data.is_end.unwrap_or(false);
    if is_start && is_end {
        tracing::warn!(step = %node.id, "step flagged as both start and end, keeping start");
        is_end = false;
    }
    let position = node.position.unwrap_or_default();

    Step {
        id: StepId::new(wire_to_string(node.id)),
        name: data.name.or(data.label).unwrap_or_default(),
        role: data.role.unwrap_or_default(),
        description: data.description.unwrap_or_default(),
        instruction: data.instruction.unwrap_or_default(),
        is_start,
        is_end,
        position: Position::new(position.x, position.y),
        to_delete: node.to_delete || data.to_delete.unwrap_or(false),
    }
}

fn adapt_handle(
    name: Option<&str>,
    role: HandleRole,
    policy: HandlePolicy,
) -> Result<Handle, ConversionError> {
    match policy {
        HandlePolicy::Lenient => Ok(resolve_handle(name, role)),
        HandlePolicy::Strict => {
            let name = name.ok_or_else(|| HandleError::Unknown {
                name: "<missing>".to_string(),
                role: role.to_string(),
            })?;
            Ok(Handle::parse(name, role)?.expect_role(role)?)
        }
    }
}

/// Maps an edge to a transition, normalizing both handles under `policy`.
pub fn adapt_transition(
    edge: EdgeDto,
    policy: HandlePolicy,
) -> Result<Transition, ConversionError> {
    let source = wire_to_string(edge.source);
    let target = wire_to_string(edge.target);
    let id = match edge.id {
        Some(id) => wire_to_string(id),
        None => format!("edge-{}-{}", source, target),
    };

    Ok(Transition {
        id: TransitionId::new(id),
        source_handle: adapt_handle(edge.source_handle.as_deref(), HandleRole::Source, policy)?,
        target_handle: adapt_handle(edge.target_handle.as_deref(), HandleRole::Target, policy)?,
        source: StepId::new(source),
        target: StepId::new(target),
        label: edge.name.or(edge.label).unwrap_or_default(),
        to_delete: edge.to_delete,
    })
}

/// Builds the distributor from weight data. Missing weights count as
/// [`DEFAULT_WEIGHT`], missing order keeps the response order.
pub fn adapt_weight_data(
    dto: WeightDataDto,
) -> Result<(String, WeightDistributor), ConversionError> {
    let slas = SlaTiers::new(
        sla(dto.slas.urgent_sla)?,
        sla(dto.slas.high_sla)?,
        sla(dto.slas.medium_sla)?,
        sla(dto.slas.low_sla)?,
    );
    let steps = dto
        .steps
        .into_iter()
        .enumerate()
        .map(|(i, s)| WeightedStep {
            step_id: StepId::new(wire_to_string(s.step_id)),
            name: s.name,
            role_name: s.role_name.unwrap_or_default(),
            order: s.order.unwrap_or(i as u32),
            weight: s.weight.unwrap_or(DEFAULT_WEIGHT),
        })
        .collect();
    Ok((dto.workflow_name, WeightDistributor::new(steps, slas)))
}

pub fn adapt_roles(roles: Vec<RoleDto>) -> RoleDirectory {
    RoleDirectory::new(
        roles
            .into_iter()
            .filter(|r| !r.name.trim().is_empty())
            .map(|r| Role {
                id: r.id.map(wire_to_string),
                name: r.name,
            })
            .collect(),
    )
}

/// Builds the save payload for a workflow, soft-deleted entries included so
/// the backend can remove them.
pub fn export_graph(
    id: Option<u64>,
    details: &WorkflowDetails,
    graph: &WorkflowGraph,
) -> GraphEnvelope {
    let wire_id = |value: &Option<String>| value.as_deref().map(WireId::from_text);
    let duration = |d: SlaDuration| Some(SlaValue::Text(d.to_duration_string()));

    let workflow = WorkflowDto {
        id,
        name: details.name.clone(),
        description: Some(details.description.clone()),
        category: wire_id(&details.category),
        sub_category: wire_id(&details.sub_category),
        department: wire_id(&details.department),
        end_logic: details.end_logic.clone(),
        urgent_sla: duration(details.slas.urgent),
        high_sla: duration(details.slas.high),
        medium_sla: duration(details.slas.medium),
        low_sla: duration(details.slas.low),
    };

    let nodes = graph
        .steps()
        .iter()
        .map(|s| NodeDto {
            id: WireId::from_text(s.id.as_str()),
            node_type: Some("step".to_string()),
            position: Some(PositionDto {
                x: s.position.x,
                y: s.position.y,
            }),
            data: NodeDataDto {
                name: Some(s.name.clone()),
                label: None,
                role: Some(s.role.clone()),
                description: Some(s.description.clone()),
                instruction: Some(s.instruction.clone()),
                is_start: Some(s.is_start),
                is_end: Some(s.is_end),
                to_delete: None,
            },
            to_delete: s.to_delete,
        })
        .collect();

    let edges = graph
        .transitions()
        .iter()
        .map(|t| EdgeDto {
            id: Some(WireId::from_text(t.id.as_str())),
            source: WireId::from_text(t.source.as_str()),
            target: WireId::from_text(t.target.as_str()),
            source_handle: Some(t.source_handle.as_str().to_string()),
            target_handle: Some(t.target_handle.as_str().to_string()),
            label: None,
            name: Some(t.label.clone()),
            to_delete: t.to_delete,
        })
        .collect();

    GraphEnvelope {
        workflow,
        graph: GraphDto { nodes, edges },
    }
}
