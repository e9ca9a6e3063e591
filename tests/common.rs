//! Common test utilities for building workflow graphs and backend fixtures.
use keiro::prelude::*;

/// A linear approval flow: Submit (start) -> Review -> Approve (end),
/// plus a return path from Review back into Submit.
#[allow(dead_code)]
pub fn create_simple_graph() -> WorkflowGraph {
    WorkflowGraph::from_parts(
        vec![
            Step::new("1", "Submit").at(0.0, 0.0).start(),
            Step::new("2", "Review").at(0.0, 140.0).with_role("Reviewer"),
            Step::new("3", "Approve").at(0.0, 280.0).with_role("Approver").end(),
        ],
        vec![
            Transition::new("10", "1", "2"),
            Transition::new("11", "2", "3").labeled("Approve"),
            Transition::new("12", "2", "1")
                .via(Handle::LeftOut, Handle::RightIn)
                .labeled("Reject"),
        ],
    )
}

#[allow(dead_code)]
pub fn create_simple_workflow() -> LoadedWorkflow {
    LoadedWorkflow {
        id: Some(7),
        details: WorkflowDetails {
            name: "Purchase request".to_string(),
            slas: SlaTiers::new(
                SlaDuration::from_parts(0, 4, 0),
                SlaDuration::from_parts(1, 0, 0),
                SlaDuration::from_parts(3, 0, 0),
                SlaDuration::from_parts(7, 0, 0),
            ),
            ..WorkflowDetails::default()
        },
        graph: create_simple_graph(),
    }
}

/// An editor with the simple workflow loaded and two roles configured.
#[allow(dead_code)]
pub fn create_loaded_editor() -> WorkflowEditor {
    let mut editor = WorkflowEditor::builder()
        .with_workflow_id(7)
        .with_roles(RoleDirectory::from_names(["Reviewer", "Approver"]))
        .build();
    editor.load(create_simple_workflow());
    editor
}

/// A saved graph as an older editor wrote it: `label` instead of `name`,
/// legacy side names and one edge with no handles at all.
#[allow(dead_code)]
pub const LEGACY_GRAPH_JSON: &str = r#"{
    "workflow": {
        "id": 7,
        "name": "Purchase request",
        "urgent_sla": "04:00:00",
        "high_sla": "1 00:00:00",
        "medium_sla": 259200,
        "low_sla": "7 00:00:00"
    },
    "graph": {
        "nodes": [
            { "id": 1, "position": { "x": 0, "y": 0 }, "data": { "label": "Submit", "isStart": true } },
            { "id": 2, "position": { "x": 0, "y": 140 }, "data": { "name": "Review", "role_name": "Reviewer" } },
            { "id": 3, "position": { "x": 0, "y": 280 }, "data": { "label": "Approve", "is_end": true } }
        ],
        "edges": [
            { "id": 10, "source": 1, "target": 2, "sourceHandle": "Bottom", "targetHandle": "top" },
            { "id": 11, "source": 2, "target": 3 },
            { "id": 12, "source": 2, "target": 1, "sourceHandle": "left", "targetHandle": "right", "label": "Reject" }
        ]
    }
}"#;

#[allow(dead_code)]
pub fn create_backend() -> MemoryBackend {
    let mut backend = MemoryBackend::new().with_roles(["Reviewer", "Approver"]);
    let envelope: GraphEnvelope =
        serde_json::from_str(LEGACY_GRAPH_JSON).expect("fixture graph must parse");
    backend.insert_workflow(7, envelope);
    backend
}

/// Three steps weighted 0.5 / 0.25 / 0.25 against a one-day urgent tier.
#[allow(dead_code)]
pub fn create_distributor() -> WeightDistributor {
    let step = |id: &str, name: &str, order: u32, weight: f64| WeightedStep {
        step_id: StepId::new(id),
        name: name.to_string(),
        role_name: String::new(),
        order,
        weight,
    };
    WeightDistributor::new(
        vec![
            step("3", "Approve", 2, 0.25),
            step("1", "Submit", 0, 0.5),
            step("2", "Review", 1, 0.25),
        ],
        SlaTiers::new(
            SlaDuration::from_parts(1, 0, 0),
            SlaDuration::from_parts(2, 0, 0),
            SlaDuration::from_parts(4, 0, 0),
            SlaDuration::from_parts(8, 0, 0),
        ),
    )
}
