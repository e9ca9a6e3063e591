use crate::graph::{Handle, StepId, TransitionId};
use thiserror::Error;

/// Errors that can occur while resolving a connection handle name.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandleError {
    #[error("Unknown handle name '{name}' used as {role}")]
    Unknown { name: String, role: String },

    #[error("Handle '{handle}' cannot be used as {role}")]
    WrongDirection { handle: Handle, role: String },
}

/// Errors that can occur when mutating a `WorkflowGraph`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Step '{0}' not found")]
    StepNotFound(StepId),

    #[error("Transition '{0}' not found")]
    TransitionNotFound(TransitionId),

    #[error("Step '{0}' already exists")]
    DuplicateStep(StepId),

    #[error("Step '{0}' is marked for deletion and cannot be connected")]
    StepDeleted(StepId),

    #[error("A transition from step '{0}' back to itself is not allowed")]
    SelfLoop(StepId),

    #[error("Step '{step_id}' does not expose handle '{handle}'")]
    HandleUnavailable { step_id: StepId, handle: Handle },

    #[error(
        "A transition from '{source_id}' ({source_handle}) to '{target_id}' ({target_handle}) already exists"
    )]
    DuplicateTransition {
        source_id: StepId,
        source_handle: Handle,
        target_id: StepId,
        target_handle: Handle,
    },

    #[error(transparent)]
    Handle(#[from] HandleError),
}

/// Errors raised by the inline step form.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Role '{role}' is not one of the configured roles")]
    UnknownRole { role: String },

    #[error("Step name cannot be empty")]
    EmptyName,
}

/// Errors that can occur in SLA duration handling and weight distribution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlaError {
    #[error("Invalid duration string '{0}': expected 'D HH:MM:SS' or 'HH:MM:SS'")]
    InvalidDuration(String),

    #[error("Weight {weight} for step '{step_id}' is outside the range [{min}, {max}]")]
    WeightOutOfRange {
        step_id: StepId,
        weight: f64,
        min: f64,
        max: f64,
    },

    #[error("Step '{0}' has no weight entry")]
    UnknownStep(StepId),
}

/// Errors that can occur when validating or serializing workflow details.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    /// Pre-submit validation failed. Every message is meant to be shown near the form.
    #[error("Workflow details are invalid: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error(transparent)]
    Sla(#[from] SlaError),
}

/// Errors that can occur when converting wire data into the canonical model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Invalid workflow data: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Handle(#[from] HandleError),

    #[error(transparent)]
    Sla(#[from] SlaError),
}

/// Errors reported by a `WorkflowBackend`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Workflow {0} not found")]
    WorkflowNotFound(u64),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Errors that can occur while reading or writing a local draft snapshot.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Could not access file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {0}")]
    Encode(String),

    #[error("Deserialization failed: {0}")]
    Decode(String),
}

/// Errors surfaced by the `WorkflowEditor` and `WeightEditor`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("The workflow graph has not been loaded yet")]
    NotLoaded,

    #[error("A save is already in progress")]
    SaveInProgress,

    #[error("No save is in progress")]
    NoSaveInProgress,

    #[error("The graph cannot be edited while a save is in progress")]
    EditDuringSave,

    #[error("Save blocked by {} validation issue(s)", .0.len())]
    BlockedByIssues(Vec<String>),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Sla(#[from] SlaError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}
