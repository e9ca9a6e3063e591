//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the keiro crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/workflow_graph.json")?;
//! let envelope: GraphEnvelope = serde_json::from_str(&json)?;
//! let loaded = envelope.into_workflow(HandlePolicy::Lenient)?;
//!
//! for issue in validate_graph(loaded.graph.steps(), loaded.graph.transitions()) {
//!     println!("{}", issue);
//! }
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::graph::{
    Handle, HandleRole, Position, Step, StepId, StepKind, Transition, TransitionId,
    ValidationIssue, WorkflowGraph, normalize_handle, validate_graph,
};

// Editing
pub use crate::config::{EditorConfig, HandlePolicy};
pub use crate::editor::{
    EditorEvent, RoleDirectory, SaveStatus, StepDraft, StepForm, WorkflowEditor,
};

// SLA distribution
pub use crate::sla::{
    Allocation, Priority, SlaDuration, SlaTiers, WeightDistributor, WeightEditor, WeightedStep,
    format_duration,
};

// Wire model and persistence
pub use crate::api::{GraphEnvelope, StepWeightUpdate, WeightDataDto};
pub use crate::backend::{MemoryBackend, WorkflowBackend};
pub use crate::workflow::{DraftSnapshot, IntoWorkflow, LoadedWorkflow, WorkflowDetails};

// Error types
pub use crate::error::{
    BackendError, ConversionError, EditError, EditorError, GraphError, HandleError, SlaError,
    WorkflowError,
};

// Report formatting
pub use crate::report::ReportFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
