//! HTTP client for the per-domain summary API.
//!
//! This module provides a reqwest-based implementation of the four summary
//! provider traits ([`NutritionProvider`](crate::NutritionProvider),
//! [`HydrationProvider`](crate::HydrationProvider),
//! [`SleepProvider`](crate::SleepProvider) and
//! [`WorkoutProvider`](crate::WorkoutProvider)).

use crate::{
    HydrationDailySummary, HydrationProvider, NutritionDailySummary, NutritionProvider,
    SleepProvider, SleepSummary, VitalsError, WorkoutProvider, WorkoutSummary,
};
use async_trait::async_trait;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};

/// Client for the summary API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestSummaryClient {
    base_url: String,
    token: SecretString,
    client: reqwest::Client,
}

impl ReqwestSummaryClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - Root of the summary API (e.g., "https://api.example.com")
    /// * `token` - Bearer token sent with every request
    pub fn new(base_url: &str, token: SecretString) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    /// `{base}/api/v1/users/{user_id}/{tail...}` with every segment escaped.
    fn user_url(&self, user_id: &str, tail: &[&str]) -> Result<Url, VitalsError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| VitalsError::Config(format!("invalid base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| VitalsError::Config("base url cannot carry a path".into()))?
            .pop_if_empty()
            .extend(["api", "v1", "users", user_id])
            .extend(tail);
        Ok(url)
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: Url) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(self.token.expose_secret())
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, VitalsError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(Self::error_from_response(resp).await);
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(resp: reqwest::Response) -> VitalsError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        VitalsError::from_status(status, body_snippet)
    }
}

#[async_trait]
impl NutritionProvider for ReqwestSummaryClient {
    async fn daily_summary(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<NutritionDailySummary, VitalsError> {
        let url = self.user_url(user_id, &["nutrition", "summary"])?;
        self.execute_json(self.get_request(url).query(&[("date", date)]))
            .await
    }
}

#[async_trait]
impl HydrationProvider for ReqwestSummaryClient {
    async fn daily_summary(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<HydrationDailySummary, VitalsError> {
        let url = self.user_url(user_id, &["hydration", "summary"])?;
        self.execute_json(self.get_request(url).query(&[("date", date)]))
            .await
    }

    async fn user_hydration_goal(&self, user_id: &str) -> Result<f64, VitalsError> {
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct GoalPayload {
            target_amount: f64,
        }

        let url = self.user_url(user_id, &["hydration", "goal"])?;
        let payload: GoalPayload = self.execute_json(self.get_request(url)).await?;
        Ok(payload.target_amount)
    }
}

#[async_trait]
impl SleepProvider for ReqwestSummaryClient {
    async fn todays_sleep_summary(&self, user_id: &str) -> Result<SleepSummary, VitalsError> {
        let url = self.user_url(user_id, &["sleep", "today"])?;
        self.execute_json(self.get_request(url)).await
    }
}

#[async_trait]
impl WorkoutProvider for ReqwestSummaryClient {
    async fn todays_workout_summary(&self, user_id: &str) -> Result<WorkoutSummary, VitalsError> {
        let url = self.user_url(user_id, &["workouts", "today"])?;
        self.execute_json(self.get_request(url)).await
    }
}
