use crate::{
    AttendanceEntry, CoreResult, GENERIC_API_ERROR, ScanError,
    api::{
        ApiResponse,
        payload::{ErrorBody, UserIdBody},
    },
};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use reqwest::{Client, Method, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument};

/// Backend used when no other base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Per-request timeout used when no other value is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Stateless wrapper around the attendance backend.
///
/// Every call is independent; nothing is retried, batched or cached.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url` (no trailing slash needed).
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Http`] if the TLS backend cannot be initialized.
    #[track_caller]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> CoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScanError::Http {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self::from_client(client, base_url))
    }

    /// Wrap an already configured `reqwest` client.
    pub fn from_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(base_url = %base_url, "API client initialized");

        Self { client, base_url }
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /mark_attendance`.
    #[instrument(skip(self))]
    pub async fn mark_attendance(&self, user_id: &str) -> CoreResult<ApiResponse> {
        self.make_request(
            Method::POST,
            "/mark_attendance",
            Some(&UserIdBody { user_id }),
        )
        .await
    }

    /// `POST /generate_qr`.
    #[instrument(skip(self))]
    pub async fn generate_qr_code(&self, user_id: &str) -> CoreResult<ApiResponse> {
        self.make_request(Method::POST, "/generate_qr", Some(&UserIdBody { user_id }))
            .await
    }

    /// `GET /get_attendance`, in server order.
    #[instrument(skip(self))]
    pub async fn get_attendance_records(&self) -> CoreResult<Vec<AttendanceEntry>> {
        self.make_request(Method::GET, "/get_attendance", None).await
    }

    async fn make_request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&UserIdBody<'_>>,
    ) -> CoreResult<T> {
        let result = self.send(method, endpoint, body).await;

        if let Err(e) = &result {
            error!(endpoint, error = %e, "API Error");
        }

        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&UserIdBody<'_>>,
    ) -> CoreResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| ScanError::Http {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let status = response.status();
        debug!(method = %method, url = %url, status = status.as_u16(), "API response");

        if !status.is_success() {
            let bytes = response.bytes().await.unwrap_or_default();
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| GENERIC_API_ERROR.to_string());

            return Err(ScanError::Api {
                message,
                status: status.as_u16(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        response.json::<T>().await.map_err(|e| ScanError::Http {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
