use crate::error::EditError;
use crate::graph::Step;

/// A role a step can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Option<String>,
    pub name: String,
}

/// How the role field of the step form is presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleField<'a> {
    /// Pick one of the configured role names.
    Select(Vec<&'a str>),
    /// No roles are configured upstream, any text is accepted.
    FreeText,
}

/// The set of roles steps may reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleDirectory {
    roles: Vec<Role>,
}

impl RoleDirectory {
    pub const NOT_CONFIGURED: &'static str =
        "No roles are configured; the role field accepts free text";

    pub fn new(roles: Vec<Role>) -> Self {
        if roles.is_empty() {
            tracing::warn!("{}", Self::NOT_CONFIGURED);
        }
        Self { roles }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            names
                .into_iter()
                .map(|name| Role {
                    id: None,
                    name: name.into(),
                })
                .collect(),
        )
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn is_configured(&self) -> bool {
        !self.roles.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name == name)
    }

    pub fn field(&self) -> RoleField<'_> {
        if self.is_configured() {
            RoleField::Select(self.roles.iter().map(|r| r.name.as_str()).collect())
        } else {
            RoleField::FreeText
        }
    }

    /// A notice for the form when roles are missing.
    pub fn warning(&self) -> Option<&'static str> {
        (!self.is_configured()).then_some(Self::NOT_CONFIGURED)
    }

    /// An empty role is always allowed. Otherwise it must be a listed role,
    /// unless no roles are configured at all.
    pub fn check(&self, role: &str) -> Result<(), EditError> {
        if role.is_empty() || !self.is_configured() || self.contains(role) {
            Ok(())
        } else {
            Err(EditError::UnknownRole {
                role: role.to_string(),
            })
        }
    }
}

/// The editable fields of a step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepDraft {
    pub name: String,
    pub role: String,
    pub description: String,
    pub instruction: String,
    is_start: bool,
    is_end: bool,
}

impl StepDraft {
    pub fn from_step(step: &Step) -> Self {
        Self {
            name: step.name.clone(),
            role: step.role.clone(),
            description: step.description.clone(),
            instruction: step.instruction.clone(),
            // A step loaded with both flags is treated as a start step.
            is_start: step.is_start,
            is_end: step.is_end && !step.is_start,
        }
    }

    pub fn is_start(&self) -> bool {
        self.is_start
    }

    pub fn is_end(&self) -> bool {
        self.is_end
    }

    /// Setting the start flag clears the end flag.
    pub fn set_start(&mut self, value: bool) {
        self.is_start = value;
        if value {
            self.is_end = false;
        }
    }

    /// Setting the end flag clears the start flag.
    pub fn set_end(&mut self, value: bool) {
        self.is_end = value;
        if value {
            self.is_start = false;
        }
    }

    pub fn apply_to(&self, step: &mut Step) {
        step.name = self.name.clone();
        step.role = self.role.clone();
        step.description = self.description.clone();
        step.instruction = self.instruction.clone();
        step.is_start = self.is_start;
        step.is_end = self.is_end;
    }
}

/// The inline edit form of a single step.
///
/// Every setter returns the full updated draft, which the caller forwards to
/// the graph right away. `begin_edit`/`cancel` snapshot and restore the
/// draft against the last value synced from the graph.
#[derive(Debug, Clone)]
pub struct StepForm<'a> {
    draft: StepDraft,
    synced: StepDraft,
    roles: &'a RoleDirectory,
    editing: bool,
}

impl<'a> StepForm<'a> {
    pub fn new(step: &Step, roles: &'a RoleDirectory) -> Self {
        let draft = StepDraft::from_step(step);
        Self {
            synced: draft.clone(),
            draft,
            roles,
            editing: false,
        }
    }

    pub fn draft(&self) -> &StepDraft {
        &self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn role_field(&self) -> RoleField<'a> {
        self.roles.field()
    }

    pub fn role_warning(&self) -> Option<&'static str> {
        self.roles.warning()
    }

    /// Re-reads the step after an external change. Ignored mid-edit.
    pub fn sync(&mut self, step: &Step) {
        if !self.editing {
            self.draft = StepDraft::from_step(step);
            self.synced = self.draft.clone();
        }
    }

    pub fn begin_edit(&mut self) {
        self.synced = self.draft.clone();
        self.editing = true;
    }

    /// Throws away changes made since `begin_edit`.
    pub fn cancel(&mut self) -> &StepDraft {
        self.draft = self.synced.clone();
        self.editing = false;
        &self.draft
    }

    /// Accepts the current draft as the new synced value.
    pub fn save(&mut self) -> Result<&StepDraft, EditError> {
        if self.draft.name.trim().is_empty() {
            return Err(EditError::EmptyName);
        }
        self.roles.check(&self.draft.role)?;
        self.synced = self.draft.clone();
        self.editing = false;
        Ok(&self.draft)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &StepDraft {
        self.draft.name = name.into();
        &self.draft
    }

    pub fn set_role(&mut self, role: impl Into<String>) -> Result<&StepDraft, EditError> {
        let role = role.into();
        self.roles.check(&role)?;
        self.draft.role = role;
        Ok(&self.draft)
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &StepDraft {
        self.draft.description = description.into();
        &self.draft
    }

    pub fn set_instruction(&mut self, instruction: impl Into<String>) -> &StepDraft {
        self.draft.instruction = instruction.into();
        &self.draft
    }

    pub fn set_start(&mut self, value: bool) -> &StepDraft {
        self.draft.set_start(value);
        &self.draft
    }

    pub fn set_end(&mut self, value: bool) -> &StepDraft {
        self.draft.set_end(value);
        &self.draft
    }
}
