use super::model::StepKind;
use crate::error::HandleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which end of a transition a handle is anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleRole {
    Source,
    Target,
}

impl fmt::Display for HandleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleRole::Source => f.write_str("source"),
            HandleRole::Target => f.write_str("target"),
        }
    }
}

/// One of the six fixed connection points on a step.
///
/// The primary flow enters at the top and leaves at the bottom. The left and
/// right sides each carry a secondary input/output pair (at 30% and 70% of the
/// step height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    #[serde(rename = "in-T")]
    TopIn,
    #[serde(rename = "out-B")]
    BottomOut,
    #[serde(rename = "in-L")]
    LeftIn,
    #[serde(rename = "out-L")]
    LeftOut,
    #[serde(rename = "in-R")]
    RightIn,
    #[serde(rename = "out-R")]
    RightOut,
}

impl Handle {
    pub const ALL: [Handle; 6] = [
        Handle::TopIn,
        Handle::BottomOut,
        Handle::LeftIn,
        Handle::LeftOut,
        Handle::RightIn,
        Handle::RightOut,
    ];

    /// The canonical wire identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Handle::TopIn => "in-T",
            Handle::BottomOut => "out-B",
            Handle::LeftIn => "in-L",
            Handle::LeftOut => "out-L",
            Handle::RightIn => "in-R",
            Handle::RightOut => "out-R",
        }
    }

    pub fn is_input(self) -> bool {
        matches!(self, Handle::TopIn | Handle::LeftIn | Handle::RightIn)
    }

    pub fn is_output(self) -> bool {
        !self.is_input()
    }

    /// The role this handle can anchor.
    pub fn role(self) -> HandleRole {
        if self.is_input() {
            HandleRole::Target
        } else {
            HandleRole::Source
        }
    }

    /// Resolves a canonical ID or a legacy side name into a handle.
    ///
    /// This mapping is total over the known names; anything else is an error.
    /// Use [`normalize_handle`] when reading graphs saved by older editors,
    /// which must keep the historical defaulting behavior.
    pub fn parse(name: &str, role: HandleRole) -> Result<Handle, HandleError> {
        let unknown = || HandleError::Unknown {
            name: name.to_string(),
            role: role.to_string(),
        };

        if let Some(handle) = Self::from_canonical(name) {
            return Ok(handle);
        }
        if name.starts_with("in-") || name.starts_with("out-") {
            return Err(unknown());
        }

        match (name.to_ascii_lowercase().as_str(), role) {
            ("top", _) => Ok(Handle::TopIn),
            ("bottom", _) => Ok(Handle::BottomOut),
            ("left", HandleRole::Source) => Ok(Handle::LeftOut),
            ("left", HandleRole::Target) => Ok(Handle::LeftIn),
            ("right", HandleRole::Source) => Ok(Handle::RightOut),
            ("right", HandleRole::Target) => Ok(Handle::RightIn),
            _ => Err(unknown()),
        }
    }

    fn from_canonical(name: &str) -> Option<Handle> {
        Handle::ALL.into_iter().find(|h| h.as_str() == name)
    }

    /// Checks that the handle points the right way for the end it anchors.
    pub fn expect_role(self, role: HandleRole) -> Result<Handle, HandleError> {
        if self.role() == role {
            Ok(self)
        } else {
            Err(HandleError::WrongDirection {
                handle: self,
                role: role.to_string(),
            })
        }
    }

    /// The default handle for an end of a transition when nothing else is known.
    pub fn default_for(role: HandleRole) -> Handle {
        match role {
            HandleRole::Source => Handle::BottomOut,
            HandleRole::Target => Handle::TopIn,
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalizes a possibly missing or legacy handle name into its canonical wire ID.
///
/// Names already prefixed with `in-` or `out-` pass through unchanged.
/// Legacy side names are mapped by role: `top -> in-T`, `bottom -> out-B`,
/// `left -> out-L|in-L`, `right -> out-R|in-R`. Anything else, including a
/// missing name, becomes `out-B` for a source and `in-T` for a target.
/// Saved graphs depend on these defaults.
pub fn normalize_handle(name: Option<&str>, role: HandleRole) -> String {
    match name {
        Some(n) if n.starts_with("in-") || n.starts_with("out-") => n.to_string(),
        Some(n) => match Handle::parse(n, role) {
            Ok(handle) => handle.as_str().to_string(),
            Err(_) => {
                tracing::warn!(handle = n, %role, "unrecognized handle name, using default");
                Handle::default_for(role).as_str().to_string()
            }
        },
        None => Handle::default_for(role).as_str().to_string(),
    }
}

/// Lenient counterpart of [`Handle::parse`] that applies the [`normalize_handle`] defaults.
///
/// A prefixed name that is not one of the six canonical IDs still has to be
/// resolved into a slot, so it falls back to the role default as well.
pub fn resolve_handle(name: Option<&str>, role: HandleRole) -> Handle {
    let normalized = normalize_handle(name, role);
    Handle::parse(&normalized, role).unwrap_or_else(|_| {
        tracing::warn!(handle = %normalized, %role, "non-canonical handle id, using default");
        Handle::default_for(role)
    })
}

/// The handles a step of the given kind exposes.
///
/// Start steps only have the primary output and the return input. End steps
/// only accept on the primary input.
pub fn available_handles(kind: StepKind) -> &'static [Handle] {
    match kind {
        StepKind::Start => &[Handle::BottomOut, Handle::RightIn],
        StepKind::End => &[Handle::TopIn],
        StepKind::Regular => &Handle::ALL,
    }
}
