use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::ApiConfig;
use shared_models::ClientError;

/// HTTP client for the hospital appointment service.
///
/// Every remote operation in the workspace goes through `request`: one
/// request, one response, no retries. Errors are never swallowed; the
/// server's `message` field is surfaced verbatim when present.
pub struct HospitalClient {
    client: Client,
    base_url: String,
}

impl HospitalClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let headers = self.get_headers(auth_token);

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);

            return Err(ClientError::from_status(
                status.as_u16(),
                extract_message(&error_text),
            ));
        }

        let data = response.json::<T>().await.map_err(|e| {
            error!("Failed to decode response from {}: {}", url, e);
            ClientError::Network(format!("Failed to decode response: {}", e))
        })?;
        Ok(data)
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

/// Error bodies carry a human-readable `message`; fall back to the raw
/// body, or a generic string when the body is empty.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }

    if body.is_empty() {
        "Request failed".to_string()
    } else {
        body.to_string()
    }
}
