//! # Keiro - Workflow Graph Engine
//!
//! **Keiro** is the model behind a drag-and-drop approval workflow builder. It
//! keeps a directed graph of steps and transitions, resolves the six-handle
//! connection scheme (including legacy side names from older saves), reports
//! structural problems, records undo/redo history, and splits each SLA tier
//! across steps by weight.
//!
//! ## Core Workflow
//!
//! The engine does not talk HTTP itself. It operates on a canonical model and
//! reaches the REST service through the [`backend::WorkflowBackend`] trait:
//!
//! 1.  **Load**: Fetch a `GraphEnvelope` and convert it with [`workflow::IntoWorkflow`]. Loose field names and legacy handles are resolved at this boundary.
//! 2.  **Edit**: Drive a [`editor::WorkflowEditor`]. Deletions only mark entries, drags record one history entry per gesture, and subscribers get validator output after every change.
//! 3.  **Save**: `begin_save` builds the full payload (deleted entries included), `finish_save` adopts what the backend stored and resets history.
//! 4.  **Distribute SLAs**: Load a [`sla::WeightEditor`] to see how each tier's time divides across steps.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut backend = MemoryBackend::new().with_roles(["Reviewer", "Approver"]);
//!     backend.insert_workflow(7, serde_json::from_str(r#"{
//!         "workflow": { "name": "Purchase request", "urgent_sla": "04:00:00" },
//!         "graph": {
//!             "nodes": [
//!                 { "id": 1, "data": { "name": "Submit", "is_start": true } },
//!                 { "id": 2, "data": { "label": "Approve", "role": "Approver", "is_end": true } }
//!             ],
//!             "edges": [
//!                 { "id": 10, "source": 1, "target": 2, "sourceHandle": "bottom", "targetHandle": "top" }
//!             ]
//!         }
//!     }"#)?);
//!
//!     let mut editor = WorkflowEditor::builder().build();
//!     editor.subscribe(|event| {
//!         if let EditorEvent::GraphChanged { issues, .. } = event {
//!             println!("{} issue(s)", issues.len());
//!         }
//!     });
//!     editor.load_roles(&backend)?;
//!     editor.load_from(&backend, 7)?;
//!
//!     let review = editor.add_step("Review", Position::new(0.0, 120.0))?;
//!     editor.edit_step(&review, |form| {
//!         form.set_role("Reviewer")?;
//!         Ok(())
//!     })?;
//!     editor.undo();
//!     editor.save(&mut backend)?;
//!
//!     let weights = WeightEditor::load(&backend, 7)?;
//!     println!("{}", ReportFormatter::format_allocations(weights.distributor()));
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod backend;
pub mod config;
pub mod editor;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod report;
pub mod sla;
pub mod workflow;
