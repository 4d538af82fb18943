//! reqwest client for the clinic REST API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use super::models::{DoctorAvailability, DoctorCategory, DoctorSnapshot};
use super::ClinicDirectory;
use crate::errors::UpstreamError;

const CATEGORIES_PATH: &str = "/categories";
const AVAILABILITY_PATH: &str = "/availability";
const TIME_SLOTS_PATH: &str = "/timeslots";
const DOCTOR_TIME_PATH: &str = "/global/doctor_time";

/// Unauthenticated JSON client for the clinic API
#[derive(Debug, Clone)]
pub struct HttpClinicApi {
    client: Client,
    base_url: String,
}

impl HttpClinicApi {
    /// Create a client for `base_url` where every request is bounded by `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, query = ?query, "Requesting clinic API");

        let request_error = |source| UpstreamError::Request {
            endpoint: path.to_string(),
            source,
        };

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Clinic API returned an error status");
            return Err(UpstreamError::Status {
                endpoint: path.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(request_error)?;
        trace!(url = %url, body = %body, "Clinic API response");

        serde_json::from_str(&body).map_err(|source| UpstreamError::Decode {
            endpoint: path.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ClinicDirectory for HttpClinicApi {
    async fn list_categories(&self) -> Result<Vec<DoctorCategory>, UpstreamError> {
        self.get_json(CATEGORIES_PATH, &[]).await
    }

    async fn list_availability(
        &self,
        category_id: i64,
    ) -> Result<Vec<DoctorAvailability>, UpstreamError> {
        self.get_json(AVAILABILITY_PATH, &[("category_id", category_id.to_string())])
            .await
    }

    async fn list_time_slots(&self, date: &str) -> Result<Vec<String>, UpstreamError> {
        self.get_json(TIME_SLOTS_PATH, &[("date", date.to_string())])
            .await
    }

    async fn doctor_time_snapshot(&self) -> Result<DoctorSnapshot, UpstreamError> {
        self.get_json(DOCTOR_TIME_PATH, &[]).await
    }
}
