//! Integration tests for Keiro
//!
//! End-to-end tests that drive the editors against the in-memory backend.
//!
mod common;
use common::*;
use keiro::api::{RoleDto, WireId};
use keiro::editor::RoleField;
use keiro::prelude::*;
use keiro::workflow::{adapt_roles, export_graph};

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn load_editor(backend: &MemoryBackend) -> WorkflowEditor {
        let mut editor = WorkflowEditor::builder().build();
        editor
            .load_from(backend, 7)
            .expect("Failed to load workflow 7");
        editor
    }

    #[test]
    fn test_legacy_graph_is_normalized_on_load() {
        let backend = create_backend();
        let editor = load_editor(&backend);
        let graph = editor.graph();

        assert_eq!(editor.workflow_id(), Some(7));
        assert_eq!(graph.step(&StepId::new("1")).unwrap().name, "Submit");
        assert!(graph.step(&StepId::new("1")).unwrap().is_start);
        assert!(graph.step(&StepId::new("3")).unwrap().is_end);
        assert_eq!(graph.step(&StepId::new("2")).unwrap().role, "Reviewer");

        let handles = |id: &str| {
            let t = graph.transition(&TransitionId::new(id)).unwrap();
            (t.source_handle.as_str(), t.target_handle.as_str())
        };
        assert_eq!(handles("10"), ("out-B", "in-T"));
        assert_eq!(handles("11"), ("out-B", "in-T"));
        assert_eq!(handles("12"), ("out-L", "in-R"));
        assert_eq!(
            graph.transition(&TransitionId::new("12")).unwrap().label,
            "Reject"
        );

        // The medium tier arrived as a plain number of seconds.
        assert_eq!(editor.details().slas.medium, SlaDuration::from_parts(3, 0, 0));
        assert_eq!(editor.details().slas.high, SlaDuration::from_parts(1, 0, 0));
        assert!(editor.issues().is_empty());
    }

    #[test]
    fn test_strict_policy_rejects_missing_handles() {
        let envelope: GraphEnvelope = serde_json::from_str(LEGACY_GRAPH_JSON).unwrap();
        let result = envelope.into_workflow(HandlePolicy::Strict);
        assert!(matches!(
            result,
            Err(ConversionError::Handle(HandleError::Unknown { .. }))
        ));
    }

    #[test]
    fn test_save_persists_ids_and_drops_deleted_entries() {
        let mut backend = create_backend();
        let mut editor = load_editor(&backend);

        let audit = editor
            .add_step("Audit", Position::new(200.0, 140.0))
            .unwrap();
        editor
            .connect(&StepId::new("2"), Handle::RightOut, &audit, Handle::LeftIn)
            .unwrap();
        editor
            .delete_transition(&TransitionId::new("12"))
            .unwrap();
        assert!(editor.can_undo());

        editor.save(&mut backend).expect("Save should succeed");

        assert_eq!(editor.save_status(), &SaveStatus::Saved);
        assert!(!editor.can_undo());
        let graph = editor.graph();
        assert_eq!(graph.steps().len(), 4);
        assert_eq!(graph.transitions().len(), 3);
        assert!(graph.steps().iter().all(|s| !s.id.is_temporary()));
        assert!(graph.transitions().iter().all(|t| !t.id.is_temporary()));
        assert!(graph.transition(&TransitionId::new("12")).is_none());

        let audit = graph
            .steps()
            .iter()
            .find(|s| s.name == "Audit")
            .expect("Audit step should be stored");
        assert!(
            graph
                .transitions()
                .iter()
                .any(|t| t.target == audit.id && t.source_handle == Handle::RightOut)
        );

        // A fresh load sees exactly what the editor adopted.
        let reloaded = load_editor(&backend);
        assert_eq!(reloaded.graph(), editor.graph());
    }

    #[test]
    fn test_soft_deleted_step_is_removed_on_save() {
        let mut backend = create_backend();
        let mut editor = load_editor(&backend);
        editor.delete_step(&StepId::new("2")).unwrap();
        assert_eq!(editor.graph().steps().len(), 3);

        editor.save(&mut backend).unwrap();

        assert_eq!(editor.graph().steps().len(), 2);
        assert!(editor.graph().transitions().is_empty());
        let stored = backend.load_graph(7).unwrap();
        assert_eq!(stored.graph.nodes.len(), 2);
        assert!(stored.graph.edges.is_empty());
    }

    #[test]
    fn test_offline_save_keeps_local_state() {
        let mut backend = create_backend();
        let mut editor = load_editor(&backend);
        editor.delete_step(&StepId::new("2")).unwrap();
        backend.set_offline(true);

        let err = editor.save(&mut backend).unwrap_err();
        assert!(matches!(err, EditorError::Backend(BackendError::Request(_))));
        assert!(matches!(editor.save_status(), SaveStatus::Failed(_)));
        assert!(!editor.graph().step(&StepId::new("2")).unwrap().is_live());
        assert!(editor.can_undo());

        // Retry once the backend is reachable again.
        backend.set_offline(false);
        editor.save(&mut backend).unwrap();
        assert_eq!(editor.save_status(), &SaveStatus::Saved);
    }

    #[test]
    fn test_save_status_events() {
        let mut backend = create_backend();
        let mut editor = load_editor(&backend);
        let statuses = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = std::rc::Rc::clone(&statuses);
        editor.subscribe(move |event| {
            if let EditorEvent::SaveStatusChanged(status) = event {
                sink.borrow_mut().push(status.clone());
            }
        });

        editor.save(&mut backend).unwrap();
        assert_eq!(
            *statuses.borrow(),
            vec![SaveStatus::Saving, SaveStatus::Saved]
        );
    }

    #[test]
    fn test_details_are_saved_as_duration_strings() {
        let mut backend = create_backend();
        let mut editor = load_editor(&backend);
        let mut details = editor.details().clone();
        details.slas.set(Priority::Urgent, SlaDuration::from_parts(0, 2, 30));
        editor.set_details(details);

        editor.save_details(&mut backend).unwrap();

        let workflow = backend.load_graph(7).unwrap().workflow;
        assert_eq!(
            workflow.urgent_sla,
            Some(keiro::api::SlaValue::Text("02:30:00".to_string()))
        );
        assert_eq!(
            workflow.medium_sla,
            Some(keiro::api::SlaValue::Text("3 00:00:00".to_string()))
        );
    }

    #[test]
    fn test_weight_editor_round_trip() {
        let mut backend = create_backend();
        let mut panel = WeightEditor::load(&backend, 7).expect("Failed to load weights");

        assert_eq!(panel.workflow_name(), "Purchase request");
        // Nothing stored yet, so every step starts at the default weight.
        assert!(panel.distributor().steps().iter().all(|s| s.weight == 1.0));
        assert_eq!(
            panel.allocation(&StepId::new("1"), Priority::Urgent),
            Some(Allocation::Seconds(4800.0))
        );

        panel.set_weight(&StepId::new("2"), 0.5).unwrap();
        assert!(panel.is_dirty());
        assert!(matches!(
            panel.set_weight(&StepId::new("2"), 1.5),
            Err(EditorError::Sla(SlaError::WeightOutOfRange { .. }))
        ));

        panel.save(&mut backend).unwrap();
        assert!(!panel.is_dirty());
        assert_eq!(panel.save_status(), &SaveStatus::Saved);

        let reloaded = WeightEditor::load(&backend, 7).unwrap();
        assert_eq!(reloaded.distributor().weight(&StepId::new("2")), Some(0.5));
        assert_eq!(reloaded.distributor().weight(&StepId::new("3")), Some(1.0));
        assert_eq!(reloaded.rows().len(), 3);
    }

    #[test]
    fn test_weight_editor_failed_save_keeps_weights() {
        let mut backend = create_backend();
        let mut panel = WeightEditor::load(&backend, 7).unwrap();
        panel.set_weight(&StepId::new("1"), 0.2).unwrap();
        backend.set_offline(true);

        assert!(panel.save(&mut backend).is_err());
        assert!(matches!(panel.save_status(), SaveStatus::Failed(_)));
        assert!(panel.is_dirty());
        assert_eq!(panel.distributor().weight(&StepId::new("1")), Some(0.2));
    }

    #[test]
    fn test_missing_workflow_fails_to_load() {
        let backend = create_backend();
        let mut editor = WorkflowEditor::builder().build();
        assert_eq!(
            editor.load_from(&backend, 99).unwrap_err(),
            EditorError::Backend(BackendError::WorkflowNotFound(99))
        );
        assert!(!editor.is_loaded());
        assert!(WeightEditor::load(&backend, 99).is_err());
    }

    #[test]
    fn test_roles_adapter_accepts_both_id_keys() {
        let roles: Vec<RoleDto> = serde_json::from_str(
            r#"[
                { "role_id": 3, "name": "Reviewer" },
                { "id": "ops", "name": "Approver" },
                { "name": "   " }
            ]"#,
        )
        .unwrap();
        let directory = adapt_roles(roles);

        assert_eq!(directory.roles().len(), 2);
        assert_eq!(directory.roles()[0].id.as_deref(), Some("3"));
        assert_eq!(directory.roles()[1].id.as_deref(), Some("ops"));
        assert_eq!(directory.field(), RoleField::Select(vec!["Reviewer", "Approver"]));

        let empty = adapt_roles(Vec::new());
        assert!(!empty.is_configured());
        assert_eq!(empty.field(), RoleField::FreeText);
    }

    #[test]
    fn test_editor_loads_roles_from_backend() {
        let backend = create_backend();
        let mut editor = load_editor(&backend);
        editor.load_roles(&backend).unwrap();
        assert!(editor.roles().contains("Approver"));

        let result = editor.edit_step(&StepId::new("2"), |form| {
            form.set_role("Approver")?;
            Ok(())
        });
        assert!(result.is_ok());
        assert_eq!(editor.graph().step(&StepId::new("2")).unwrap().role, "Approver");
    }

    #[test]
    fn test_draft_snapshot_save_and_load() {
        let temp_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let path = temp_file.path().to_str().unwrap();

        let editor = create_loaded_editor();
        let snapshot = DraftSnapshot::new(
            editor.workflow_id(),
            editor.graph().clone(),
            vec![(StepId::new("1"), 0.5), (StepId::new("2"), 0.25)],
        );
        snapshot.save(path).expect("Failed to save snapshot");

        let loaded = DraftSnapshot::from_file(path).expect("Failed to load snapshot");
        assert_eq!(loaded, snapshot);
        assert!(loaded.graph.validate().is_empty());
    }

    #[test]
    fn test_draft_snapshot_rejects_garbage() {
        assert!(DraftSnapshot::from_bytes(&[0xff, 0x00, 0x13]).is_err());
        assert!(DraftSnapshot::from_file("/nonexistent/keiro/draft.bin").is_err());
    }

    #[test]
    fn test_report_formatting() {
        assert_eq!(ReportFormatter::format_issues(&[]), "No issues found");

        let steps = vec![Step::new("1", "A"), Step::new("2", "B")];
        let report = ReportFormatter::format_issues(&validate_graph(&steps, &[]));
        assert!(report.contains("- No start step defined"));
        assert!(report.contains("- 2 orphan step(s) without connections"));

        let table = ReportFormatter::format_allocations(&create_distributor());
        assert!(table.contains("Urgent"));
        assert!(table.contains("Submit"));
        assert!(table.contains("12h"));
    }

    #[test]
    fn test_zero_padded_ids_survive_export() {
        assert_eq!(WireId::from_text("42"), WireId::Number(42));
        assert_eq!(WireId::from_text("007"), WireId::Text("007".to_string()));
        assert_eq!(WireId::Text("007".to_string()).as_number(), None);

        let graph = WorkflowGraph::from_parts(
            vec![
                Step::new("007", "Submit").start(),
                Step::new("8", "Approve").end(),
            ],
            vec![Transition::new("010", "007", "8")],
        );
        let envelope = export_graph(Some(7), &WorkflowDetails::default(), &graph);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["graph"]["nodes"][0]["id"], serde_json::json!("007"));
        assert_eq!(json["graph"]["nodes"][1]["id"], serde_json::json!(8));

        let reloaded = envelope.into_workflow(HandlePolicy::Lenient).unwrap();
        assert_eq!(reloaded.graph, graph);
    }
}
