use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_gateway::HospitalClient;
use shared_models::{Envelope, UserRole};

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, BookAppointmentRequest,
    CancelAppointmentRequest, TransitionRecord,
};
use crate::services::lifecycle::USER_CANCELLATION_REASON;

/// Executes authorized transitions and queries against the appointment
/// service. One request per call, no retries, no local cache; after a
/// successful transition callers re-fetch rather than patching state.
pub struct AppointmentService {
    gateway: Arc<HospitalClient>,
}

impl AppointmentService {
    pub fn new(gateway: Arc<HospitalClient>) -> Self {
        Self { gateway }
    }

    /// Appointments for one user in one role, in service order.
    pub async fn fetch_appointments(
        &self,
        user_id: &str,
        role: UserRole,
        token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Fetching appointments for {} {}", role, user_id);

        let path = format!(
            "/appointments?userId={}&role={}",
            urlencoding::encode(user_id),
            role
        );
        let envelope: Envelope<Vec<Appointment>> = self
            .gateway
            .request(Method::GET, &path, Some(token), None)
            .await?;
        Ok(envelope.data)
    }

    pub async fn get_appointment(
        &self,
        appointment_id: &str,
        token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!("/appointments/{}", urlencoding::encode(appointment_id));
        let envelope: Envelope<Appointment> = self
            .gateway
            .request(Method::GET, &path, Some(token), None)
            .await?;
        Ok(envelope.data)
    }

    /// Submit a new booking. Validates locally first; an invalid request
    /// never reaches the wire. New appointments always start `pending`.
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
        token: &str,
    ) -> Result<Appointment, AppointmentError> {
        request.validate()?;

        info!(
            "Booking appointment with doctor {} on {}",
            request.doctor_id, request.appointment_date
        );

        let envelope: Envelope<Appointment> = self
            .gateway
            .request(
                Method::POST,
                "/appointments/book",
                Some(token),
                Some(json!(request)),
            )
            .await?;
        Ok(envelope.data)
    }

    /// Execute a transition the lifecycle engine has authorized.
    ///
    /// Approval and cancellation use different endpoints but share the
    /// record type; the server may still reject the request (it is the
    /// final authority), in which case the error is surfaced unchanged.
    pub async fn execute_transition(
        &self,
        record: &TransitionRecord,
        token: &str,
    ) -> Result<(), AppointmentError> {
        info!(
            "Executing transition {} -> {} on appointment {}",
            record.from_status, record.to_status, record.appointment_id
        );

        let id = urlencoding::encode(&record.appointment_id);

        match record.to_status {
            AppointmentStatus::Confirmed => {
                let _: Value = self
                    .gateway
                    .request(
                        Method::PUT,
                        &format!("/appointments/{}", id),
                        Some(token),
                        Some(json!({ "status": AppointmentStatus::Confirmed })),
                    )
                    .await?;
            }
            AppointmentStatus::Cancelled => {
                let body = CancelAppointmentRequest {
                    cancelled_by: record.actor_role,
                    cancellation_reason: record
                        .reason
                        .clone()
                        .unwrap_or_else(|| USER_CANCELLATION_REASON.to_string()),
                };
                let _: Value = self
                    .gateway
                    .request(
                        Method::PUT,
                        &format!("/appointments/{}/cancel", id),
                        Some(token),
                        Some(json!(body)),
                    )
                    .await?;
            }
            AppointmentStatus::Pending => {
                // No endpoint reverts an appointment to pending.
                return Err(AppointmentError::IllegalTransition {
                    from: record.from_status,
                    to: record.to_status,
                });
            }
        }

        Ok(())
    }

    /// Hard delete. Part of the service surface but unused by the views;
    /// cancellation is a status change, not removal.
    pub async fn delete_appointment(
        &self,
        appointment_id: &str,
        token: &str,
    ) -> Result<(), AppointmentError> {
        let path = format!("/appointments/{}", urlencoding::encode(appointment_id));
        let _: Value = self
            .gateway
            .request(Method::DELETE, &path, Some(token), None)
            .await?;
        Ok(())
    }
}
