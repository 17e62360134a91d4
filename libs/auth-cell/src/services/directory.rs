use std::sync::Arc;

use reqwest::Method;
use serde_json::json;
use tracing::debug;

use shared_gateway::HospitalClient;
use shared_models::{ClientError, Envelope, User};

use crate::models::UpdateProfileRequest;

/// Read-mostly access to the user directory. Listings are public; reading
/// or updating an individual profile requires the bearer credential.
pub struct DirectoryService {
    gateway: Arc<HospitalClient>,
}

impl DirectoryService {
    pub fn new(gateway: Arc<HospitalClient>) -> Self {
        Self { gateway }
    }

    pub async fn fetch_doctors(&self) -> Result<Vec<User>, ClientError> {
        debug!("Fetching doctor directory");

        let envelope: Envelope<Vec<User>> = self
            .gateway
            .request(Method::GET, "/users/doctors", None, None)
            .await?;
        Ok(envelope.data)
    }

    pub async fn fetch_patients(&self) -> Result<Vec<User>, ClientError> {
        debug!("Fetching patient directory");

        let envelope: Envelope<Vec<User>> = self
            .gateway
            .request(Method::GET, "/users/patients", None, None)
            .await?;
        Ok(envelope.data)
    }

    pub async fn get_user(&self, user_id: &str, token: &str) -> Result<User, ClientError> {
        let envelope: Envelope<User> = self
            .gateway
            .request(
                Method::GET,
                &format!("/users/{}", user_id),
                Some(token),
                None,
            )
            .await?;
        Ok(envelope.data)
    }

    /// Profile updates are only ever issued by the owning user; the server
    /// enforces that, the client just forwards the credential.
    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
        token: &str,
    ) -> Result<User, ClientError> {
        let envelope: Envelope<User> = self
            .gateway
            .request(
                Method::PUT,
                &format!("/users/{}", user_id),
                Some(token),
                Some(json!(request)),
            )
            .await?;
        Ok(envelope.data)
    }
}
