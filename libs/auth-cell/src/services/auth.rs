use std::sync::Arc;

use reqwest::Method;
use serde_json::json;
use tracing::info;

use shared_gateway::HospitalClient;
use shared_models::{AuthResponse, ClientError};

use crate::models::{LoginRequest, RegisterRequest};

/// Registration and login. Neither endpoint requires a credential; both
/// return the created/authenticated user together with a bearer token the
/// caller is expected to hand to the session context.
pub struct AuthService {
    gateway: Arc<HospitalClient>,
}

impl AuthService {
    pub fn new(gateway: Arc<HospitalClient>) -> Self {
        Self { gateway }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, ClientError> {
        info!("Registering new {} account", request.role);

        self.gateway
            .request(
                Method::POST,
                "/auth/register",
                None,
                Some(json!(request)),
            )
            .await
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ClientError> {
        info!("Logging in {}", request.email);

        self.gateway
            .request(Method::POST, "/auth/login", None, Some(json!(request)))
            .await
    }
}
