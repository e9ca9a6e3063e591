use crate::error::ArtifactError;
use crate::graph::{StepId, WorkflowGraph};
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// Unsaved editor state written to local disk between sessions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DraftSnapshot {
    pub workflow_id: Option<u64>,
    pub graph: WorkflowGraph,
    pub weights: Vec<(StepId, f64)>,
}

impl DraftSnapshot {
    pub fn new(
        workflow_id: Option<u64>,
        graph: WorkflowGraph,
        weights: Vec<(StepId, f64)>,
    ) -> Self {
        Self {
            workflow_id,
            graph,
            weights,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        encode_to_vec(self, standard()).map_err(|e| ArtifactError::Encode(e.to_string()))
    }

    /// Saves the snapshot to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), ArtifactError> {
        let bytes = self.to_bytes()?;
        let io_err = |source| ArtifactError::Io {
            path: path.to_string(),
            source,
        };
        let mut file = fs::File::create(path).map_err(io_err)?;
        file.write_all(&bytes).map_err(io_err)?;
        Ok(())
    }

    /// Loads a snapshot from a file.
    pub fn from_file(path: &str) -> Result<Self, ArtifactError> {
        let io_err = |source| ArtifactError::Io {
            path: path.to_string(),
            source,
        };
        let mut file = fs::File::open(path).map_err(io_err)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(io_err)?;
        Self::from_bytes(&bytes)
    }

    /// Deserializes a snapshot from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        decode_from_slice(bytes, standard())
            .map(|(snapshot, _)| snapshot) // bincode 2 returns (value, bytes_read)
            .map_err(|e| ArtifactError::Decode(e.to_string()))
    }
}
