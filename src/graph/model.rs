use super::handle::Handle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a step. Temporary IDs are generated client-side with a prefix;
/// permanent IDs are the numeric IDs assigned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StepId(pub String);

/// Identifier of a transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionId(pub String);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Numeric IDs are assigned by the backend. Anything else has not been persisted yet.
            pub fn is_temporary(&self) -> bool {
                self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id.to_string())
            }
        }
    };
}

impl_id!(StepId);
impl_id!(TransitionId);

/// A 2D layout coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The role a step plays in the flow, derived from its start/end flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Start,
    Regular,
    End,
}

/// A node in the workflow graph representing one stage of the flow.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub name: String,
    /// Name of the responsible role. Empty when unassigned.
    pub role: String,
    pub description: String,
    pub instruction: String,
    pub is_start: bool,
    pub is_end: bool,
    pub position: Position,
    pub to_delete: bool,
}

impl Step {
    pub fn new(id: impl Into<StepId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Marks the step as the entry point, clearing the end flag.
    pub fn start(mut self) -> Self {
        self.is_start = true;
        self.is_end = false;
        self
    }

    /// Marks the step as a terminal step, clearing the start flag.
    pub fn end(mut self) -> Self {
        self.is_end = true;
        self.is_start = false;
        self
    }

    pub fn kind(&self) -> StepKind {
        if self.is_start {
            StepKind::Start
        } else if self.is_end {
            StepKind::End
        } else {
            StepKind::Regular
        }
    }

    pub fn is_live(&self) -> bool {
        !self.to_delete
    }
}

/// A directed edge between two steps, anchored on a handle at each end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub id: TransitionId,
    pub source: StepId,
    pub target: StepId,
    pub source_handle: Handle,
    pub target_handle: Handle,
    pub label: String,
    pub to_delete: bool,
}

impl Transition {
    pub fn new(
        id: impl Into<TransitionId>,
        source: impl Into<StepId>,
        target: impl Into<StepId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: Handle::BottomOut,
            target_handle: Handle::TopIn,
            label: String::new(),
            to_delete: false,
        }
    }

    pub fn via(mut self, source_handle: Handle, target_handle: Handle) -> Self {
        self.source_handle = source_handle;
        self.target_handle = target_handle;
        self
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// A return (reject) path leaves through the left output and re-enters on the right input.
    pub fn is_return(&self) -> bool {
        self.source_handle == Handle::LeftOut && self.target_handle == Handle::RightIn
    }

    pub fn touches(&self, step_id: &StepId) -> bool {
        &self.source == step_id || &self.target == step_id
    }

    pub fn is_live(&self) -> bool {
        !self.to_delete
    }
}
