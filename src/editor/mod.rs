use crate::api::GraphEnvelope;
use crate::backend::WorkflowBackend;
use crate::config::EditorConfig;
use crate::error::{BackendError, EditorError, GraphError};
use crate::graph::{
    Handle, HandleRole, Position, Step, StepId, Transition, TransitionId, ValidationIssue,
    WorkflowGraph,
};
use crate::workflow::{IntoWorkflow, LoadedWorkflow, WorkflowDetails, adapt_roles, export_graph};

pub mod draft;
pub mod history;

pub use draft::{Role, RoleDirectory, RoleField, StepDraft, StepForm};
pub use history::History;

/// Progress of the current or last save.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Failed(String),
}

/// Notifications sent to subscribers after the editor state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    GraphChanged {
        issues: Vec<ValidationIssue>,
        can_undo: bool,
        can_redo: bool,
    },
    SaveStatusChanged(SaveStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&EditorEvent)>;

#[derive(Debug, Clone)]
struct DragGesture {
    step_id: StepId,
    origin: Position,
}

/// Owns the canonical graph state of one workflow and every edit applied to it.
///
/// Mutations run synchronously. After each one, subscribers receive the new
/// validator output, so nothing has to poll the editor.
pub struct WorkflowEditor {
    workflow_id: Option<u64>,
    details: WorkflowDetails,
    graph: WorkflowGraph,
    history: History<WorkflowGraph>,
    roles: RoleDirectory,
    config: EditorConfig,
    loaded: bool,
    drag: Option<DragGesture>,
    save_status: SaveStatus,
    next_temp_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

pub struct EditorBuilder {
    workflow_id: Option<u64>,
    config: EditorConfig,
    roles: RoleDirectory,
}

impl EditorBuilder {
    pub fn new() -> Self {
        Self {
            workflow_id: None,
            config: EditorConfig::default(),
            roles: RoleDirectory::default(),
        }
    }

    pub fn with_workflow_id(mut self, workflow_id: u64) -> Self {
        self.workflow_id = Some(workflow_id);
        self
    }

    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_roles(mut self, roles: RoleDirectory) -> Self {
        self.roles = roles;
        self
    }

    pub fn build(self) -> WorkflowEditor {
        WorkflowEditor {
            workflow_id: self.workflow_id,
            details: WorkflowDetails::default(),
            graph: WorkflowGraph::new(),
            history: History::new(WorkflowGraph::new(), self.config.history_limit),
            roles: self.roles,
            config: self.config,
            loaded: false,
            drag: None,
            save_status: SaveStatus::Idle,
            next_temp_id: 1,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }
}

impl Default for EditorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowEditor {
    pub fn builder() -> EditorBuilder {
        EditorBuilder::new()
    }

    pub fn workflow_id(&self) -> Option<u64> {
        self.workflow_id
    }

    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    pub fn details(&self) -> &WorkflowDetails {
        &self.details
    }

    pub fn roles(&self) -> &RoleDirectory {
        &self.roles
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn save_status(&self) -> &SaveStatus {
        &self.save_status
    }

    pub fn history(&self) -> &History<WorkflowGraph> {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Validator output for the current graph.
    ///
    /// Empty until a graph has been loaded, so the blank pre-load state never
    /// produces warnings.
    pub fn issues(&self) -> Vec<ValidationIssue> {
        if self.loaded {
            self.graph.validate()
        } else {
            Vec::new()
        }
    }

    // --- Subscriptions ---

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&EditorEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: EditorEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    fn notify_graph_changed(&mut self) {
        let event = EditorEvent::GraphChanged {
            issues: self.issues(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        };
        self.emit(event);
    }

    fn set_save_status(&mut self, status: SaveStatus) {
        self.save_status = status.clone();
        self.emit(EditorEvent::SaveStatusChanged(status));
    }

    /// Records the current graph as a new history entry and notifies subscribers.
    fn commit(&mut self) {
        if self.history.record(self.graph.clone()) {
            tracing::debug!(past = self.history.past_len(), "history entry recorded");
        }
        self.notify_graph_changed();
    }

    fn require_loaded(&self) -> Result<(), EditorError> {
        if self.loaded {
            Ok(())
        } else {
            Err(EditorError::NotLoaded)
        }
    }

    /// Graph edits are refused while a save is in flight, since its response
    /// replaces the graph.
    fn require_editable(&self) -> Result<(), EditorError> {
        self.require_loaded()?;
        if self.save_status == SaveStatus::Saving {
            return Err(EditorError::EditDuringSave);
        }
        Ok(())
    }

    // --- Loading ---

    /// Replaces the editor state with a freshly loaded workflow.
    pub fn load(&mut self, workflow: LoadedWorkflow) {
        if workflow.id.is_some() {
            self.workflow_id = workflow.id;
        }
        self.details = workflow.details;
        self.graph = workflow.graph;
        self.history.reset(self.graph.clone());
        self.drag = None;
        self.loaded = true;
        self.notify_graph_changed();
    }

    /// Fetches the graph of `workflow_id` and loads it.
    pub fn load_from(
        &mut self,
        backend: &dyn WorkflowBackend,
        workflow_id: u64,
    ) -> Result<(), EditorError> {
        let envelope = backend.load_graph(workflow_id).inspect_err(|e| {
            tracing::warn!(workflow_id, error = %e, "failed to load workflow graph");
        })?;
        let mut workflow = envelope.into_workflow(self.config.handle_policy)?;
        workflow.id = Some(workflow_id);
        tracing::info!(
            workflow_id,
            steps = workflow.graph.steps().len(),
            transitions = workflow.graph.transitions().len(),
            "workflow graph loaded"
        );
        self.load(workflow);
        Ok(())
    }

    /// Fetches the role list used by step forms.
    pub fn load_roles(&mut self, backend: &dyn WorkflowBackend) -> Result<(), EditorError> {
        let roles = backend.fetch_roles().inspect_err(|e| {
            tracing::warn!(error = %e, "failed to load roles");
        })?;
        self.roles = adapt_roles(roles);
        Ok(())
    }

    // --- Graph edits ---

    fn next_temp(&mut self, kind: &str) -> String {
        let id = format!("{}{}_{}", self.config.temp_id_prefix, kind, self.next_temp_id);
        self.next_temp_id += 1;
        id
    }

    /// Adds a regular step with a temporary ID.
    pub fn add_step(
        &mut self,
        name: impl Into<String>,
        position: Position,
    ) -> Result<StepId, EditorError> {
        self.require_editable()?;
        let id = StepId::new(self.next_temp("step"));
        let mut step = Step::new(id.clone(), name);
        step.position = position;
        self.graph.add_step(step)?;
        self.commit();
        Ok(id)
    }

    /// Connects two steps through the given handles.
    pub fn connect(
        &mut self,
        source: &StepId,
        source_handle: Handle,
        target: &StepId,
        target_handle: Handle,
    ) -> Result<TransitionId, EditorError> {
        self.require_editable()?;
        let id = TransitionId::new(self.next_temp("edge"));
        let transition = Transition::new(id.clone(), source.clone(), target.clone())
            .via(source_handle, target_handle);
        self.graph.connect(transition)?;
        self.commit();
        Ok(id)
    }

    /// Connects two steps using raw handle names, as emitted by a canvas.
    pub fn connect_named(
        &mut self,
        source: &StepId,
        source_handle: Option<&str>,
        target: &StepId,
        target_handle: Option<&str>,
    ) -> Result<TransitionId, EditorError> {
        let source_handle = crate::graph::resolve_handle(source_handle, HandleRole::Source);
        let target_handle = crate::graph::resolve_handle(target_handle, HandleRole::Target);
        self.connect(source, source_handle, target, target_handle)
    }

    /// Opens the inline form for a step.
    pub fn step_form(&self, id: &StepId) -> Result<StepForm<'_>, EditorError> {
        let step = self
            .graph
            .step(id)
            .ok_or_else(|| GraphError::StepNotFound(id.clone()))?;
        Ok(StepForm::new(step, &self.roles))
    }

    /// Mirrors a draft emitted by the step form into the graph.
    ///
    /// Called on every keystroke, so no history entry is recorded here; see
    /// [`WorkflowEditor::commit_step_edit`].
    pub fn apply_draft(&mut self, id: &StepId, draft: &StepDraft) -> Result<(), EditorError> {
        self.require_editable()?;
        self.roles.check(&draft.role)?;
        self.graph.update_step(id, |step| draft.apply_to(step))?;
        self.notify_graph_changed();
        Ok(())
    }

    /// Records one history entry for the drafts applied since the last commit.
    pub fn commit_step_edit(&mut self, id: &StepId) -> Result<(), EditorError> {
        self.require_editable()?;
        if self.graph.step(id).is_none() {
            return Err(GraphError::StepNotFound(id.clone()).into());
        }
        self.commit();
        Ok(())
    }

    /// Edits a step through its form and records the result as one history entry.
    pub fn edit_step<F>(&mut self, id: &StepId, edit: F) -> Result<(), EditorError>
    where
        F: FnOnce(&mut StepForm<'_>) -> Result<(), EditorError>,
    {
        let draft = {
            let mut form = self.step_form(id)?;
            form.begin_edit();
            edit(&mut form)?;
            form.save()?.clone()
        };
        self.apply_draft(id, &draft)?;
        self.commit_step_edit(id)
    }

    pub fn set_transition_label(
        &mut self,
        id: &TransitionId,
        label: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.require_editable()?;
        self.graph.set_transition_label(id, label)?;
        self.commit();
        Ok(())
    }

    /// Marks a step and its transitions for deletion on the next save.
    pub fn delete_step(&mut self, id: &StepId) -> Result<(), EditorError> {
        self.require_editable()?;
        self.graph.soft_delete_step(id)?;
        self.commit();
        Ok(())
    }

    pub fn restore_step(&mut self, id: &StepId) -> Result<(), EditorError> {
        self.require_editable()?;
        self.graph.restore_step(id)?;
        self.commit();
        Ok(())
    }

    pub fn delete_transition(&mut self, id: &TransitionId) -> Result<(), EditorError> {
        self.require_editable()?;
        self.graph.soft_delete_transition(id)?;
        self.commit();
        Ok(())
    }

    pub fn restore_transition(&mut self, id: &TransitionId) -> Result<(), EditorError> {
        self.require_editable()?;
        self.graph.restore_transition(id)?;
        self.commit();
        Ok(())
    }

    pub fn set_details(&mut self, details: WorkflowDetails) {
        self.details = details;
    }

    // --- Dragging ---

    /// Starts a drag gesture. Intermediate positions are not recorded.
    pub fn begin_drag(&mut self, id: &StepId) -> Result<(), EditorError> {
        self.require_editable()?;
        let step = self
            .graph
            .step(id)
            .ok_or_else(|| GraphError::StepNotFound(id.clone()))?;
        self.drag = Some(DragGesture {
            step_id: id.clone(),
            origin: step.position,
        });
        Ok(())
    }

    pub fn drag_to(&mut self, position: Position) -> Result<(), EditorError> {
        let Some(drag) = &self.drag else {
            return Ok(());
        };
        self.require_editable()?;
        let id = drag.step_id.clone();
        self.graph.move_step(&id, position)?;
        self.notify_graph_changed();
        Ok(())
    }

    /// Ends the drag and records a single history entry for the whole gesture.
    pub fn end_drag(&mut self) -> Result<(), EditorError> {
        let Some(drag) = self.drag.take() else {
            return Ok(());
        };
        let moved = self
            .graph
            .step(&drag.step_id)
            .is_some_and(|s| s.position != drag.origin);
        if moved {
            tracing::debug!(step = %drag.step_id, "drag committed");
            self.commit();
        }
        Ok(())
    }

    /// Moves a step in one go, recorded like a drag.
    pub fn move_step(&mut self, id: &StepId, position: Position) -> Result<(), EditorError> {
        self.begin_drag(id)?;
        self.drag_to(position)?;
        self.end_drag()
    }

    // --- Undo / redo ---

    fn restore(&mut self, graph: WorkflowGraph) {
        self.history.begin_replay();
        self.graph = graph;
        self.drag = None;
        // Restoring is not a new edit; the replay flag keeps it out of history.
        self.commit();
        self.history.end_replay();
    }

    /// Records a drag or form draft that was applied but not yet committed,
    /// so undo/redo operate on what is on screen.
    fn flush_pending(&mut self) {
        self.drag = None;
        if self.graph != *self.history.present() {
            tracing::debug!("committing pending edit before undo/redo");
            self.commit();
        }
    }

    /// Steps back one history entry. Returns `false` when there is nothing to
    /// undo or a save is in flight.
    pub fn undo(&mut self) -> bool {
        if self.require_editable().is_err() {
            return false;
        }
        self.flush_pending();
        match self.history.undo().cloned() {
            Some(graph) => {
                self.restore(graph);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.require_editable().is_err() {
            return false;
        }
        self.flush_pending();
        match self.history.redo().cloned() {
            Some(graph) => {
                self.restore(graph);
                true
            }
            None => false,
        }
    }

    // --- Saving ---

    /// Starts a save and returns the payload to send.
    ///
    /// Fails while another save is in flight, when workflow details do not pass
    /// pre-submit validation, or (if configured) when the validator reports issues.
    pub fn begin_save(&mut self) -> Result<GraphEnvelope, EditorError> {
        self.require_loaded()?;
        if self.save_status == SaveStatus::Saving {
            return Err(EditorError::SaveInProgress);
        }
        self.details.validate()?;
        if self.config.block_save_on_issues {
            let issues = self.issues();
            if !issues.is_empty() {
                return Err(EditorError::BlockedByIssues(
                    issues.iter().map(|i| i.to_string()).collect(),
                ));
            }
        }
        self.set_save_status(SaveStatus::Saving);
        Ok(export_graph(self.workflow_id, &self.details, &self.graph))
    }

    /// Completes a save started with [`WorkflowEditor::begin_save`].
    ///
    /// On success the stored graph replaces local state and history restarts
    /// from it. On failure local state is left as it was.
    pub fn finish_save(
        &mut self,
        response: Result<GraphEnvelope, BackendError>,
    ) -> Result<(), EditorError> {
        if self.save_status != SaveStatus::Saving {
            return Err(EditorError::NoSaveInProgress);
        }

        let stored = response.map_err(EditorError::from).and_then(|envelope| {
            envelope
                .into_workflow(self.config.handle_policy)
                .map_err(EditorError::from)
        });

        match stored {
            Ok(workflow) => {
                let mut graph = workflow.graph;
                graph.purge_deleted();
                self.graph = graph;
                self.history.reset(self.graph.clone());
                tracing::info!(workflow_id = ?self.workflow_id, "workflow saved");
                self.set_save_status(SaveStatus::Saved);
                self.notify_graph_changed();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    workflow_id = ?self.workflow_id,
                    error = %e,
                    "failed to save workflow"
                );
                self.set_save_status(SaveStatus::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Sends the full graph to `backend` and applies the response.
    pub fn save(&mut self, backend: &mut dyn WorkflowBackend) -> Result<(), EditorError> {
        let workflow_id = self.workflow_id.ok_or(EditorError::NotLoaded)?;
        let payload = self.begin_save()?;
        let response = backend.save_graph(workflow_id, &payload);
        self.finish_save(response)
    }

    /// Submits workflow details on their own.
    pub fn save_details(&mut self, backend: &mut dyn WorkflowBackend) -> Result<(), EditorError> {
        let workflow_id = self.workflow_id.ok_or(EditorError::NotLoaded)?;
        let payload = self.details.to_payload()?;
        backend.update_workflow_details(workflow_id, &payload)?;
        Ok(())
    }
}
