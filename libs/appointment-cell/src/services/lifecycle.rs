use chrono::Utc;
use tracing::{debug, warn};

use shared_models::{User, UserRole};

use crate::models::{Appointment, AppointmentError, AppointmentStatus, TransitionRecord};

/// Default reason recorded when the assigned doctor rejects a pending
/// appointment without giving one.
pub const DOCTOR_REJECTION_REASON: &str = "Doctor rejected appointment";

/// Default reason for every other cancellation without an explicit reason.
pub const USER_CANCELLATION_REASON: &str = "User requested cancellation";

/// Pure appointment lifecycle rules: which status changes a given actor
/// may request for a given appointment.
///
/// This is a UX guard, not a security boundary. The service re-checks
/// every transition and remains the final authority; the engine exists so
/// the client never sends a request it already knows is illegal.
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Legal target statuses for `actor`, computed purely from the
    /// appointment's status and its patient/doctor references.
    ///
    /// Unrelated identities always get an empty set, as does any
    /// appointment already in a terminal status.
    pub fn available_actions(
        &self,
        appointment: &Appointment,
        actor: &User,
    ) -> Vec<AppointmentStatus> {
        match (appointment.status, actor.role) {
            (AppointmentStatus::Pending, UserRole::Doctor)
                if actor.id == appointment.doctor.id =>
            {
                vec![AppointmentStatus::Confirmed, AppointmentStatus::Cancelled]
            }
            (AppointmentStatus::Pending, UserRole::Patient)
                if actor.id == appointment.patient.id =>
            {
                vec![AppointmentStatus::Cancelled]
            }
            (AppointmentStatus::Confirmed, UserRole::Doctor)
                if actor.id == appointment.doctor.id =>
            {
                vec![AppointmentStatus::Cancelled]
            }
            (AppointmentStatus::Confirmed, UserRole::Patient)
                if actor.id == appointment.patient.id =>
            {
                vec![AppointmentStatus::Cancelled]
            }
            _ => vec![],
        }
    }

    /// Authorize a transition and describe it as a `TransitionRecord`.
    ///
    /// Fails with `IllegalTransition` when `target` is not in
    /// `available_actions` - never a silent no-op. A cancellation always
    /// carries a reason; when the caller supplies none (or a blank one) it
    /// defaults to the canned string for the actor's situation: a doctor
    /// turning down a pending request is a rejection, everything else is a
    /// plain cancellation. The record is only a description of intent;
    /// persisted state is untouched until the remote layer executes it.
    pub fn apply_transition(
        &self,
        appointment: &Appointment,
        target: AppointmentStatus,
        actor: &User,
        reason: Option<String>,
    ) -> Result<TransitionRecord, AppointmentError> {
        debug!(
            "Validating transition {} -> {} for {} {}",
            appointment.status, target, actor.role, actor.id
        );

        if !self.available_actions(appointment, actor).contains(&target) {
            warn!(
                "Illegal transition attempted on appointment {}: {} -> {} by {}",
                appointment.id, appointment.status, target, actor.role
            );
            return Err(AppointmentError::IllegalTransition {
                from: appointment.status,
                to: target,
            });
        }

        let reason = match target {
            AppointmentStatus::Cancelled => Some(
                reason
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| {
                        default_cancellation_reason(actor.role, appointment.status).to_string()
                    }),
            ),
            _ => None,
        };

        Ok(TransitionRecord {
            appointment_id: appointment.id.clone(),
            from_status: appointment.status,
            to_status: target,
            actor_role: actor.role,
            reason,
            timestamp: Utc::now(),
        })
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}

fn default_cancellation_reason(role: UserRole, from: AppointmentStatus) -> &'static str {
    match (role, from) {
        (UserRole::Doctor, AppointmentStatus::Pending) => DOCTOR_REJECTION_REASON,
        _ => USER_CANCELLATION_REASON,
    }
}
