use crate::error::SlaError;
use crate::graph::StepId;
use crate::sla::SlaDuration;
use serde::{Deserialize, Serialize, Serializer};

/// An identifier as it appears on the wire: numeric once persisted, text before.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(u64),
    Text(String),
}

/// Parses `id` only when the number prints back as the same text, so IDs such
/// as `"007"` or `"+7"` stay textual.
fn canonical_number(id: &str) -> Option<u64> {
    id.parse::<u64>().ok().filter(|n| n.to_string() == id)
}

impl WireId {
    /// Picks the numeric form for IDs that round-trip as numbers.
    pub fn from_text(id: &str) -> Self {
        match canonical_number(id) {
            Some(n) => WireId::Number(n),
            None => WireId::Text(id.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<u64> {
        match self {
            WireId::Number(n) => Some(*n),
            WireId::Text(t) => canonical_number(t),
        }
    }
}

impl std::fmt::Display for WireId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireId::Number(n) => write!(f, "{}", n),
            WireId::Text(t) => f.write_str(t),
        }
    }
}

/// An SLA value as sent by the backend: either seconds or a duration string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlaValue {
    Seconds(f64),
    Text(String),
}

impl SlaValue {
    pub fn to_duration(&self) -> Result<SlaDuration, SlaError> {
        match self {
            SlaValue::Seconds(s) if s.is_finite() && *s >= 0.0 => {
                Ok(SlaDuration::from_seconds(s.floor() as u64))
            }
            SlaValue::Seconds(s) => Err(SlaError::InvalidDuration(s.to_string())),
            SlaValue::Text(t) => SlaDuration::parse(t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionDto {
    pub x: f64,
    pub y: f64,
}

/// Step fields as stored under a node's `data`.
///
/// Older payloads use `label` where newer ones use `name`, and `role_name`
/// for `role`; both spellings are accepted here and resolved by the adapters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeDataDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, alias = "role_name", alias = "roleName")]
    pub role: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default, alias = "isStart")]
    pub is_start: Option<bool>,
    #[serde(default, alias = "isEnd")]
    pub is_end: Option<bool>,
    #[serde(default, alias = "toDelete", skip_serializing_if = "Option::is_none")]
    pub to_delete: Option<bool>,
}

/// A workflow step as exchanged with the graph endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDto {
    pub id: WireId,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub position: Option<PositionDto>,
    #[serde(default)]
    pub data: NodeDataDto,
    #[serde(default, alias = "toDelete")]
    pub to_delete: bool,
}

/// A transition as exchanged with the graph endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDto {
    #[serde(default)]
    pub id: Option<WireId>,
    pub source: WireId,
    pub target: WireId,
    #[serde(default, rename = "sourceHandle", alias = "source_handle")]
    pub source_handle: Option<String>,
    #[serde(default, rename = "targetHandle", alias = "target_handle")]
    pub target_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "toDelete")]
    pub to_delete: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDto {
    #[serde(default)]
    pub nodes: Vec<NodeDto>,
    #[serde(default)]
    pub edges: Vec<EdgeDto>,
}

/// Workflow-level fields carried alongside the graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<WireId>,
    #[serde(default, alias = "subCategory")]
    pub sub_category: Option<WireId>,
    #[serde(default)]
    pub department: Option<WireId>,
    #[serde(default, alias = "endLogic")]
    pub end_logic: Option<String>,
    #[serde(default, alias = "urgentSla")]
    pub urgent_sla: Option<SlaValue>,
    #[serde(default, alias = "highSla")]
    pub high_sla: Option<SlaValue>,
    #[serde(default, alias = "mediumSla")]
    pub medium_sla: Option<SlaValue>,
    #[serde(default, alias = "lowSla")]
    pub low_sla: Option<SlaValue>,
}

/// Body of `GET/PUT workflow graph`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphEnvelope {
    #[serde(default)]
    pub workflow: WorkflowDto,
    #[serde(default)]
    pub graph: GraphDto,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SlasDto {
    #[serde(default)]
    pub urgent_sla: Option<SlaValue>,
    #[serde(default)]
    pub high_sla: Option<SlaValue>,
    #[serde(default)]
    pub medium_sla: Option<SlaValue>,
    #[serde(default)]
    pub low_sla: Option<SlaValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepWeightDto {
    pub step_id: WireId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Body of `GET workflow weight data`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightDataDto {
    #[serde(default)]
    pub workflow_name: String,
    #[serde(default)]
    pub slas: SlasDto,
    #[serde(default)]
    pub steps: Vec<StepWeightDto>,
}

/// One entry of the `updateStepWeights` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepWeightUpdate {
    #[serde(serialize_with = "serialize_step_id")]
    pub step_id: StepId,
    pub weight: f64,
}

fn serialize_step_id<S: Serializer>(id: &StepId, serializer: S) -> Result<S::Ok, S::Error> {
    WireId::from_text(id.as_str()).serialize(serializer)
}

/// Body of `PUT updateWorkflowDetails`. SLAs are duration strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDetailsPayload {
    pub name: String,
    pub description: String,
    pub category: Option<WireId>,
    pub sub_category: Option<WireId>,
    pub department: Option<WireId>,
    pub end_logic: Option<String>,
    pub urgent_sla: String,
    pub high_sla: String,
    pub medium_sla: String,
    pub low_sla: String,
}

/// An entry of `GET roles`. Some endpoints key roles by `role_id`, others by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleDto {
    #[serde(default, alias = "role_id")]
    pub id: Option<WireId>,
    pub name: String,
}
