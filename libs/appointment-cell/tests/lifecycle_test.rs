use assert_matches::assert_matches;
use chrono::Utc;

use appointment_cell::models::{Appointment, AppointmentError, AppointmentStatus};
use appointment_cell::services::lifecycle::{
    AppointmentLifecycleService, DOCTOR_REJECTION_REASON, USER_CANCELLATION_REASON,
};
use shared_models::{User, UserRole, UserSummary};

fn summary(id: &str, name: &str) -> UserSummary {
    UserSummary {
        id: id.to_string(),
        full_name: name.to_string(),
        email: format!("{}@example.com", id),
        phone: "555-0100".to_string(),
        specialization: None,
        bio: None,
    }
}

fn user(id: &str, role: UserRole) -> User {
    User {
        id: id.to_string(),
        username: id.to_string(),
        email: format!("{}@example.com", id),
        full_name: id.to_uppercase(),
        phone: "555-0100".to_string(),
        role,
        specialization: None,
        bio: None,
    }
}

fn appointment(status: AppointmentStatus) -> Appointment {
    Appointment {
        id: "a1".to_string(),
        patient: summary("p1", "Jane Doe"),
        doctor: summary("d1", "Dr. Gregory"),
        appointment_date: "2024-06-01T00:00:00Z".parse().unwrap(),
        appointment_time: "10:00".to_string(),
        reason: "Annual checkup".to_string(),
        status,
    }
}

#[test]
fn pending_assigned_doctor_may_confirm_or_cancel() {
    let engine = AppointmentLifecycleService::new();
    let actions = engine.available_actions(&appointment(AppointmentStatus::Pending), &user("d1", UserRole::Doctor));

    assert_eq!(
        actions,
        vec![AppointmentStatus::Confirmed, AppointmentStatus::Cancelled]
    );
}

#[test]
fn pending_owning_patient_may_only_cancel() {
    let engine = AppointmentLifecycleService::new();
    let actions = engine.available_actions(&appointment(AppointmentStatus::Pending), &user("p1", UserRole::Patient));

    assert_eq!(actions, vec![AppointmentStatus::Cancelled]);
}

#[test]
fn pending_unrelated_identities_get_nothing() {
    let engine = AppointmentLifecycleService::new();
    let apt = appointment(AppointmentStatus::Pending);

    assert!(engine.available_actions(&apt, &user("d2", UserRole::Doctor)).is_empty());
    assert!(engine.available_actions(&apt, &user("p2", UserRole::Patient)).is_empty());
}

#[test]
fn confirmed_allows_cancellation_by_both_parties_only() {
    let engine = AppointmentLifecycleService::new();
    let apt = appointment(AppointmentStatus::Confirmed);

    assert_eq!(
        engine.available_actions(&apt, &user("d1", UserRole::Doctor)),
        vec![AppointmentStatus::Cancelled]
    );
    assert_eq!(
        engine.available_actions(&apt, &user("p1", UserRole::Patient)),
        vec![AppointmentStatus::Cancelled]
    );
    assert!(engine.available_actions(&apt, &user("d2", UserRole::Doctor)).is_empty());
}

#[test]
fn cancelled_is_terminal_for_every_actor() {
    let engine = AppointmentLifecycleService::new();
    let apt = appointment(AppointmentStatus::Cancelled);

    for actor in [
        user("d1", UserRole::Doctor),
        user("p1", UserRole::Patient),
        user("d2", UserRole::Doctor),
        user("p2", UserRole::Patient),
    ] {
        assert!(engine.available_actions(&apt, &actor).is_empty());
    }
    assert!(apt.status.is_terminal());
}

#[test]
fn available_actions_is_pure() {
    let engine = AppointmentLifecycleService::new();
    let apt = appointment(AppointmentStatus::Pending);
    let doctor = user("d1", UserRole::Doctor);

    let first = engine.available_actions(&apt, &doctor);
    let second = engine.available_actions(&apt, &doctor);
    assert_eq!(first, second);
}

#[test]
fn illegal_targets_fail_for_every_status_and_role() {
    let engine = AppointmentLifecycleService::new();
    let statuses = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Cancelled,
    ];
    let actors = [
        user("d1", UserRole::Doctor),
        user("p1", UserRole::Patient),
        user("d2", UserRole::Doctor),
        user("p2", UserRole::Patient),
    ];

    for from in statuses {
        let apt = appointment(from);
        for actor in &actors {
            let legal = engine.available_actions(&apt, actor);
            for target in statuses {
                if legal.contains(&target) {
                    continue;
                }
                let err = engine
                    .apply_transition(&apt, target, actor, None)
                    .unwrap_err();
                assert_matches!(
                    err,
                    AppointmentError::IllegalTransition { from: f, to: t }
                        if f == from && t == target
                );
            }
        }
    }
}

#[test]
fn confirmed_cannot_revert_to_pending() {
    let engine = AppointmentLifecycleService::new();
    let apt = appointment(AppointmentStatus::Confirmed);

    let err = engine
        .apply_transition(
            &apt,
            AppointmentStatus::Pending,
            &user("d1", UserRole::Doctor),
            None,
        )
        .unwrap_err();
    assert_matches!(err, AppointmentError::IllegalTransition { .. });
}

#[test]
fn approval_produces_a_record_without_reason() {
    let engine = AppointmentLifecycleService::new();
    let apt = appointment(AppointmentStatus::Pending);

    let record = engine
        .apply_transition(
            &apt,
            AppointmentStatus::Confirmed,
            &user("d1", UserRole::Doctor),
            None,
        )
        .unwrap();

    assert_eq!(record.appointment_id, "a1");
    assert_eq!(record.from_status, AppointmentStatus::Pending);
    assert_eq!(record.to_status, AppointmentStatus::Confirmed);
    assert_eq!(record.actor_role, UserRole::Doctor);
    assert!(record.reason.is_none());
    assert!(record.timestamp <= Utc::now());
}

#[test]
fn doctor_rejection_defaults_to_rejection_reason() {
    let engine = AppointmentLifecycleService::new();
    let record = engine
        .apply_transition(
            &appointment(AppointmentStatus::Pending),
            AppointmentStatus::Cancelled,
            &user("d1", UserRole::Doctor),
            None,
        )
        .unwrap();

    assert_eq!(record.reason.as_deref(), Some(DOCTOR_REJECTION_REASON));
}

#[test]
fn patient_cancellation_defaults_to_cancellation_reason() {
    let engine = AppointmentLifecycleService::new();
    let record = engine
        .apply_transition(
            &appointment(AppointmentStatus::Pending),
            AppointmentStatus::Cancelled,
            &user("p1", UserRole::Patient),
            None,
        )
        .unwrap();

    assert_eq!(record.reason.as_deref(), Some(USER_CANCELLATION_REASON));
}

#[test]
fn doctor_cancelling_confirmed_is_not_a_rejection() {
    let engine = AppointmentLifecycleService::new();
    let record = engine
        .apply_transition(
            &appointment(AppointmentStatus::Confirmed),
            AppointmentStatus::Cancelled,
            &user("d1", UserRole::Doctor),
            None,
        )
        .unwrap();

    assert_eq!(record.reason.as_deref(), Some(USER_CANCELLATION_REASON));
}

#[test]
fn explicit_reason_wins_over_the_default() {
    let engine = AppointmentLifecycleService::new();
    let record = engine
        .apply_transition(
            &appointment(AppointmentStatus::Pending),
            AppointmentStatus::Cancelled,
            &user("p1", UserRole::Patient),
            Some("Feeling better".to_string()),
        )
        .unwrap();

    assert_eq!(record.reason.as_deref(), Some("Feeling better"));
}

#[test]
fn blank_reason_is_treated_as_absent() {
    let engine = AppointmentLifecycleService::new();
    let record = engine
        .apply_transition(
            &appointment(AppointmentStatus::Pending),
            AppointmentStatus::Cancelled,
            &user("p1", UserRole::Patient),
            Some("   ".to_string()),
        )
        .unwrap();

    assert_eq!(record.reason.as_deref(), Some(USER_CANCELLATION_REASON));
}

// Full lifecycle walk: book -> approve -> cancel, as the dashboard drives it.
#[test]
fn pending_to_confirmed_to_cancelled_scenario() {
    let engine = AppointmentLifecycleService::new();
    let doctor = user("d1", UserRole::Doctor);
    let patient = user("p1", UserRole::Patient);

    let mut apt = appointment(AppointmentStatus::Pending);

    let approval = engine
        .apply_transition(&apt, AppointmentStatus::Confirmed, &doctor, None)
        .unwrap();
    assert_eq!(approval.to_status, AppointmentStatus::Confirmed);
    apt.status = approval.to_status;

    let cancellation = engine
        .apply_transition(&apt, AppointmentStatus::Cancelled, &patient, None)
        .unwrap();
    assert_eq!(cancellation.to_status, AppointmentStatus::Cancelled);
    assert_eq!(
        cancellation.reason.as_deref(),
        Some(USER_CANCELLATION_REASON)
    );
    apt.status = cancellation.to_status;

    // Terminal: nothing further for anyone.
    assert!(engine.available_actions(&apt, &doctor).is_empty());
    assert!(engine.available_actions(&apt, &patient).is_empty());
}

#[test]
fn unassigned_doctor_cannot_approve() {
    let engine = AppointmentLifecycleService::new();
    let apt = appointment(AppointmentStatus::Pending);
    let other_doctor = user("d2", UserRole::Doctor);

    assert!(engine.available_actions(&apt, &other_doctor).is_empty());
    let err = engine
        .apply_transition(&apt, AppointmentStatus::Confirmed, &other_doctor, None)
        .unwrap_err();
    assert_matches!(err, AppointmentError::IllegalTransition { .. });
}
