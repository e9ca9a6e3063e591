//! Tests for the graph model, handle normalization and the validator.
mod common;
use common::*;
use keiro::graph::{available_handles, resolve_handle};
use keiro::prelude::*;

#[test]
fn test_normalize_handle_legacy_names() {
    assert_eq!(normalize_handle(Some("Top"), HandleRole::Target), "in-T");
    assert_eq!(normalize_handle(Some("bottom"), HandleRole::Source), "out-B");
    assert_eq!(normalize_handle(Some("left"), HandleRole::Source), "out-L");
    assert_eq!(normalize_handle(Some("left"), HandleRole::Target), "in-L");
    assert_eq!(normalize_handle(Some("right"), HandleRole::Source), "out-R");
    assert_eq!(normalize_handle(Some("RIGHT"), HandleRole::Target), "in-R");
}

#[test]
fn test_normalize_handle_defaults() {
    assert_eq!(normalize_handle(None, HandleRole::Source), "out-B");
    assert_eq!(normalize_handle(None, HandleRole::Target), "in-T");
    assert_eq!(normalize_handle(Some("middle"), HandleRole::Source), "out-B");
    assert_eq!(normalize_handle(Some(""), HandleRole::Target), "in-T");
    assert_eq!(normalize_handle(Some("out-R"), HandleRole::Target), "out-R");
}

#[test]
fn test_resolve_handle_falls_back_for_unknown_prefixed_ids() {
    assert_eq!(resolve_handle(Some("in-Z"), HandleRole::Target), Handle::TopIn);
    assert_eq!(resolve_handle(Some("in-L"), HandleRole::Target), Handle::LeftIn);
}

#[test]
fn test_handle_availability_by_step_kind() {
    assert_eq!(available_handles(StepKind::Regular).len(), 6);
    assert_eq!(
        available_handles(StepKind::Start),
        &[Handle::BottomOut, Handle::RightIn]
    );
    assert_eq!(available_handles(StepKind::End), &[Handle::TopIn]);
}

#[test]
fn test_return_transition_detection() {
    let graph = create_simple_graph();
    let returns: Vec<_> = graph
        .transitions()
        .iter()
        .filter(|t| t.is_return())
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(returns, vec!["12"]);
}

#[test]
fn test_connect_rejects_invalid_connections() {
    let mut graph = create_simple_graph();

    let self_loop = Transition::new("20", "2", "2");
    assert!(matches!(graph.connect(self_loop), Err(GraphError::SelfLoop(_))));

    let missing = Transition::new("21", "2", "99");
    assert!(matches!(
        graph.connect(missing),
        Err(GraphError::StepNotFound(_))
    ));

    // End steps only accept on the top input.
    let into_end_side = Transition::new("22", "2", "3").via(Handle::RightOut, Handle::LeftIn);
    assert!(matches!(
        graph.connect(into_end_side),
        Err(GraphError::HandleUnavailable { .. })
    ));

    let backwards = Transition::new("23", "2", "3").via(Handle::TopIn, Handle::TopIn);
    assert!(matches!(graph.connect(backwards), Err(GraphError::Handle(_))));

    let duplicate = Transition::new("24", "1", "2");
    assert!(matches!(
        graph.connect(duplicate),
        Err(GraphError::DuplicateTransition { .. })
    ));
}

#[test]
fn test_soft_delete_cascades_and_purge_removes() {
    let mut graph = create_simple_graph();
    graph.soft_delete_step(&StepId::new("2")).unwrap();

    // Still present, only marked.
    assert_eq!(graph.steps().len(), 3);
    assert_eq!(graph.live_steps().count(), 2);
    assert!(graph.transitions().iter().all(|t| t.to_delete));

    let err = graph
        .connect(Transition::new("30", "1", "2"))
        .unwrap_err();
    assert_eq!(err, GraphError::StepDeleted(StepId::new("2")));

    graph.purge_deleted();
    assert_eq!(graph.steps().len(), 2);
    assert!(graph.transitions().is_empty());
}

#[test]
fn test_restore_transition_requires_live_ends() {
    let mut graph = create_simple_graph();
    graph.soft_delete_step(&StepId::new("2")).unwrap();
    let id = TransitionId::new("10");
    assert!(graph.restore_transition(&id).is_err());

    graph.restore_step(&StepId::new("2")).unwrap();
    graph.restore_transition(&id).unwrap();
    assert!(graph.transition(&id).unwrap().is_live());
}

#[test]
fn test_validator_clean_graph() {
    assert!(create_simple_graph().validate().is_empty());
}

#[test]
fn test_validator_multiple_starts_and_no_end() {
    let steps = vec![
        Step::new("1", "A").start(),
        Step::new("2", "B").start(),
    ];
    let issues = validate_graph(&steps, &[]);
    assert_eq!(
        issues,
        vec![
            ValidationIssue::MultipleStartSteps(2),
            ValidationIssue::NoEndStep
        ]
    );
    assert_eq!(issues[0].to_string(), "Multiple start steps defined");
    assert_eq!(issues[1].to_string(), "No end step defined");
}

#[test]
fn test_validator_single_step_is_never_orphan() {
    let steps = vec![Step::new("1", "Lonely")];
    let issues = validate_graph(&steps, &[]);
    assert_eq!(
        issues,
        vec![ValidationIssue::NoStartStep, ValidationIssue::NoEndStep]
    );
}

#[test]
fn test_validator_reports_orphans() {
    let mut graph = create_simple_graph();
    graph.add_step(Step::new("4", "Audit")).unwrap();
    graph.add_step(Step::new("5", "Archive")).unwrap();

    let issues = graph.validate();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].to_string(), "2 orphan step(s) without connections");
}

#[test]
fn test_validator_ignores_deleted_entries_and_flags_dangling() {
    let mut graph = create_simple_graph();
    graph.soft_delete_step(&StepId::new("3")).unwrap();
    assert_eq!(graph.validate(), vec![ValidationIssue::NoEndStep]);

    let loose = WorkflowGraph::from_parts(
        vec![Step::new("1", "A").start(), Step::new("2", "B").end()],
        vec![Transition::new("10", "1", "2"), Transition::new("11", "1", "9")],
    );
    let issues = loose.validate();
    assert_eq!(issues, vec![ValidationIssue::DanglingTransitions(1)]);
    assert_eq!(
        issues[0].to_string(),
        "1 transition(s) reference missing or deleted steps"
    );
}

#[test]
fn test_temporary_ids() {
    assert!(StepId::new("temp_step_1").is_temporary());
    assert!(!StepId::new("42").is_temporary());
    assert!(TransitionId::new("").is_temporary());
}

#[test]
fn test_canonical_names_pass_through() {
    for handle in Handle::ALL {
        assert_eq!(
            normalize_handle(Some(handle.as_str()), HandleRole::Source),
            handle.as_str()
        );
    }
    // Prefixed names are never rewritten, even when unknown.
    assert_eq!(normalize_handle(Some("in-X"), HandleRole::Target), "in-X");
}

#[test]
fn test_strict_parse_rejects_unknown_names() {
    assert!(Handle::parse("middle", HandleRole::Source).is_err());
    assert!(Handle::parse("in-X", HandleRole::Target).is_err());
    assert_eq!(
        Handle::parse("RIGHT", HandleRole::Target),
        Ok(Handle::RightIn)
    );
}

#[test]
fn test_wrong_direction_is_reported() {
    let err = Handle::TopIn.expect_role(HandleRole::Source).unwrap_err();
    assert!(matches!(err, HandleError::WrongDirection { .. }));
}
