use crate::error::GraphError;
use serde::{Deserialize, Serialize};

pub mod handle;
pub mod model;
pub mod validator;

pub use handle::{Handle, HandleRole, available_handles, normalize_handle, resolve_handle};
pub use model::{Position, Step, StepId, StepKind, Transition, TransitionId};
pub use validator::{ValidationIssue, validate_graph};

/// The in-memory directed graph of steps and transitions.
///
/// This is the source of truth for both rendering and save payloads. Deleting
/// only marks entries with `to_delete`; they stay in the graph until
/// [`WorkflowGraph::purge_deleted`] runs after a successful save.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowGraph {
    steps: Vec<Step>,
    transitions: Vec<Transition>,
}

impl WorkflowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from already-normalized parts without checking connections.
    ///
    /// Saved graphs can contain loose references; the validator reports them.
    pub fn from_parts(steps: Vec<Step>, transitions: Vec<Transition>) -> Self {
        Self { steps, transitions }
    }

    pub fn into_parts(self) -> (Vec<Step>, Vec<Transition>) {
        (self.steps, self.transitions)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn live_steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|s| s.is_live())
    }

    pub fn live_transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(|t| t.is_live())
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.transitions.is_empty()
    }

    pub fn step(&self, id: &StepId) -> Option<&Step> {
        self.steps.iter().find(|s| &s.id == id)
    }

    pub fn transition(&self, id: &TransitionId) -> Option<&Transition> {
        self.transitions.iter().find(|t| &t.id == id)
    }

    fn step_mut(&mut self, id: &StepId) -> Result<&mut Step, GraphError> {
        self.steps
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| GraphError::StepNotFound(id.clone()))
    }

    fn transition_mut(&mut self, id: &TransitionId) -> Result<&mut Transition, GraphError> {
        self.transitions
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| GraphError::TransitionNotFound(id.clone()))
    }

    fn live_step(&self, id: &StepId) -> Result<&Step, GraphError> {
        let step = self
            .step(id)
            .ok_or_else(|| GraphError::StepNotFound(id.clone()))?;
        if step.to_delete {
            return Err(GraphError::StepDeleted(id.clone()));
        }
        Ok(step)
    }

    pub fn add_step(&mut self, step: Step) -> Result<(), GraphError> {
        if self.step(&step.id).is_some() {
            return Err(GraphError::DuplicateStep(step.id));
        }
        self.steps.push(step);
        Ok(())
    }

    /// Adds a transition after checking both ends.
    ///
    /// Source and target must be live, distinct steps. The source handle has
    /// to be an output and the target handle an input, each exposed by the
    /// step's kind. A second live transition on the same handle pair is rejected.
    pub fn connect(&mut self, transition: Transition) -> Result<(), GraphError> {
        if transition.source == transition.target {
            return Err(GraphError::SelfLoop(transition.source));
        }
        let source = self.live_step(&transition.source)?;
        let target = self.live_step(&transition.target)?;

        transition.source_handle.expect_role(HandleRole::Source)?;
        transition.target_handle.expect_role(HandleRole::Target)?;

        if !available_handles(source.kind()).contains(&transition.source_handle) {
            return Err(GraphError::HandleUnavailable {
                step_id: source.id.clone(),
                handle: transition.source_handle,
            });
        }
        if !available_handles(target.kind()).contains(&transition.target_handle) {
            return Err(GraphError::HandleUnavailable {
                step_id: target.id.clone(),
                handle: transition.target_handle,
            });
        }

        let duplicate = self.live_transitions().any(|t| {
            t.source == transition.source
                && t.target == transition.target
                && t.source_handle == transition.source_handle
                && t.target_handle == transition.target_handle
        });
        if duplicate {
            return Err(GraphError::DuplicateTransition {
                source_id: transition.source,
                source_handle: transition.source_handle,
                target_id: transition.target,
                target_handle: transition.target_handle,
            });
        }

        self.transitions.push(transition);
        Ok(())
    }

    /// Applies an in-place change to a step.
    pub fn update_step<F>(&mut self, id: &StepId, change: F) -> Result<(), GraphError>
    where
        F: FnOnce(&mut Step),
    {
        change(self.step_mut(id)?);
        Ok(())
    }

    pub fn move_step(&mut self, id: &StepId, position: Position) -> Result<(), GraphError> {
        self.step_mut(id)?.position = position;
        Ok(())
    }

    pub fn set_transition_label(
        &mut self,
        id: &TransitionId,
        label: impl Into<String>,
    ) -> Result<(), GraphError> {
        self.transition_mut(id)?.label = label.into();
        Ok(())
    }

    /// Marks a step and every transition touching it for deletion.
    pub fn soft_delete_step(&mut self, id: &StepId) -> Result<(), GraphError> {
        self.step_mut(id)?.to_delete = true;
        for transition in self.transitions.iter_mut().filter(|t| t.touches(id)) {
            transition.to_delete = true;
        }
        Ok(())
    }

    /// Clears the deletion mark on a step. Its transitions stay marked.
    pub fn restore_step(&mut self, id: &StepId) -> Result<(), GraphError> {
        self.step_mut(id)?.to_delete = false;
        Ok(())
    }

    pub fn soft_delete_transition(&mut self, id: &TransitionId) -> Result<(), GraphError> {
        self.transition_mut(id)?.to_delete = true;
        Ok(())
    }

    /// Clears the deletion mark on a transition whose ends are both live.
    pub fn restore_transition(&mut self, id: &TransitionId) -> Result<(), GraphError> {
        let (source, target) = {
            let t = self
                .transition(id)
                .ok_or_else(|| GraphError::TransitionNotFound(id.clone()))?;
            (t.source.clone(), t.target.clone())
        };
        self.live_step(&source)?;
        self.live_step(&target)?;
        self.transition_mut(id)?.to_delete = false;
        Ok(())
    }

    /// Physically removes entries marked for deletion, along with any
    /// transition left pointing at a removed step.
    pub fn purge_deleted(&mut self) {
        self.steps.retain(|s| s.is_live());
        let steps = &self.steps;
        self.transitions.retain(|t| {
            t.is_live()
                && steps.iter().any(|s| s.id == t.source)
                && steps.iter().any(|s| s.id == t.target)
        });
    }

    pub fn validate(&self) -> Vec<ValidationIssue> {
        validate_graph(&self.steps, &self.transitions)
    }
}
