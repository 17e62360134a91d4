use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use shared_models::{ClientError, UserRole, UserSummary};

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// An appointment as the service returns it. `patientId`/`doctorId` arrive
/// populated with profile snapshots, not bare ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(rename = "patientId")]
    pub patient: UserSummary,
    #[serde(rename = "doctorId")]
    pub doctor: UserSummary,
    pub appointment_date: DateTime<Utc>,
    pub appointment_time: String,
    pub reason: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    /// `cancelled` is terminal: no transition leaves it.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Minimum length of the initial booking reason. Distinct from the
/// cancellation reason, which has no length requirement.
pub const MIN_REASON_LENGTH: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub patient_id: String,
    pub doctor_id: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub reason: String,
}

impl BookAppointmentRequest {
    /// Creation-time validation, run before any request is issued. The
    /// server validates again; this only stops obviously bad submissions.
    pub fn validate(&self) -> Result<(), AppointmentError> {
        if self.appointment_time.trim().is_empty() {
            return Err(AppointmentError::Validation(
                "Appointment time is required".to_string(),
            ));
        }

        if self.reason.trim().chars().count() < MIN_REASON_LENGTH {
            return Err(AppointmentError::Validation(format!(
                "Reason must be at least {} characters",
                MIN_REASON_LENGTH
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAppointmentRequest {
    pub cancelled_by: UserRole,
    pub cancellation_reason: String,
}

// ==============================================================================
// TRANSITION RECORD
// ==============================================================================

/// The lifecycle engine's authorized description of a desired status
/// change. Producing one performs no I/O and mutates nothing; the remote
/// service turns it into the actual request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRecord {
    pub appointment_id: String,
    pub from_status: AppointmentStatus,
    pub to_status: AppointmentStatus,
    pub actor_role: UserRole,
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Illegal status transition: {from} -> {to}")]
    IllegalTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}
