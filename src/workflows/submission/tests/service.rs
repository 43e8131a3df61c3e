use super::common::{build_service, dt, mapped_output, monday_morning};

use crate::workflows::submission::lifecycle::SubmissionState;
use crate::workflows::submission::repository::RepositoryError;
use crate::workflows::submission::service::SubmissionServiceError;
use crate::workflows::submission::SubmissionId;

#[test]
fn intake_lands_in_mapped_with_three_history_entries() {
    let (service, _) = build_service();

    let record = service
        .intake(mapped_output(), monday_morning())
        .expect("intake succeeds");

    assert_eq!(record.submission.state(), SubmissionState::Mapped);
    assert_eq!(record.submission.history().len(), 3);
    assert_eq!(record.submission.business_name(), "Teddy's Tavern");
    assert_eq!(record.submission.pending_tasks(), 2);
}

#[test]
fn route_records_ranked_recommendations() {
    let (service, _) = build_service();
    let record = service
        .intake(mapped_output(), monday_morning())
        .expect("intake succeeds");
    let id = record.submission.id().clone();

    let routed = service
        .route(&id, 3, monday_morning())
        .expect("routing succeeds");

    assert_eq!(routed.submission.state(), SubmissionState::Routed);
    let outcome = routed.submission.routing().expect("outcome recorded");
    assert_eq!(outcome.ranked.len(), 3);
    assert!(outcome.ranked[0].score >= outcome.ranked[1].score);

    // A Southeast bar should land with a Southeast hospitality specialist.
    let best = routed.submission.recommended().expect("recommendation");
    assert_eq!(best.underwriter.region.label(), "Southeast");
}

#[test]
fn schedule_resolves_the_contact_window_from_notes() {
    let (service, _) = build_service();
    let record = service
        .intake(mapped_output(), monday_morning())
        .expect("intake succeeds");
    let id = record.submission.id().clone();

    service.route(&id, 3, monday_morning()).expect("routed");
    service.approve(&id, monday_morning()).expect("approved");
    let scheduled = service
        .schedule(&id, monday_morning())
        .expect("schedule succeeds");

    assert_eq!(scheduled.submission.state(), SubmissionState::Scheduled);
    assert_eq!(
        scheduled.submission.scheduled_contact(),
        Some(dt(2025, 3, 4, 13, 0))
    );
}

#[test]
fn full_pipeline_reaches_terminal_state() {
    let (service, _) = build_service();
    let record = service
        .intake(mapped_output(), monday_morning())
        .expect("intake succeeds");
    let id = record.submission.id().clone();

    service.route(&id, 3, monday_morning()).expect("routed");
    service.approve(&id, monday_morning()).expect("approved");
    service.schedule(&id, monday_morning()).expect("scheduled");
    service.dispatch(&id, dt(2025, 3, 4, 13, 5)).expect("sent");
    let done = service
        .acknowledge(&id, dt(2025, 3, 5, 9, 0))
        .expect("acknowledged");

    assert_eq!(done.submission.state(), SubmissionState::Acknowledged);
    assert_eq!(done.submission.history().len(), 8);
}

#[test]
fn out_of_order_operations_fail_without_corrupting_state() {
    let (service, _) = build_service();
    let record = service
        .intake(mapped_output(), monday_morning())
        .expect("intake succeeds");
    let id = record.submission.id().clone();

    let error = service
        .schedule(&id, monday_morning())
        .expect_err("cannot schedule before approval");
    assert!(matches!(error, SubmissionServiceError::Transition(_)));

    let unchanged = service.get(&id).expect("record still readable");
    assert_eq!(unchanged.submission.state(), SubmissionState::Mapped);
    assert_eq!(unchanged.submission.history().len(), 3);
}

#[test]
fn double_approval_is_an_invalid_transition() {
    let (service, _) = build_service();
    let record = service
        .intake(mapped_output(), monday_morning())
        .expect("intake succeeds");
    let id = record.submission.id().clone();

    service.route(&id, 3, monday_morning()).expect("routed");
    service.approve(&id, monday_morning()).expect("approved");

    let error = service
        .approve(&id, monday_morning())
        .expect_err("second approval must fail");
    match error {
        SubmissionServiceError::Transition(err) => {
            assert_eq!(err.from, SubmissionState::ReadyToSend);
        }
        other => panic!("expected transition error, got {other:?}"),
    }
}

#[test]
fn unknown_submission_is_not_found() {
    let (service, _) = build_service();

    let error = service
        .get(&SubmissionId("sub-missing".to_string()))
        .expect_err("missing submission");
    assert!(matches!(
        error,
        SubmissionServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn due_lists_scheduled_submissions_once_their_instant_passes() {
    let (service, _) = build_service();
    let record = service
        .intake(mapped_output(), monday_morning())
        .expect("intake succeeds");
    let id = record.submission.id().clone();

    service.route(&id, 3, monday_morning()).expect("routed");
    service.approve(&id, monday_morning()).expect("approved");
    service.schedule(&id, monday_morning()).expect("scheduled");

    // Scheduled for Tuesday 13:00; nothing is due Monday evening.
    let before = service.due(dt(2025, 3, 3, 18, 0)).expect("due query");
    assert!(before.is_empty());

    let after = service.due(dt(2025, 3, 4, 13, 30)).expect("due query");
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].submission.id(), &id);
}
