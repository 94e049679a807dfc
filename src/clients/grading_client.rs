use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::Config,
    errors::{AppError, AppResult, ErrorResponse},
    models::{
        domain::GradedResult,
        dto::{ApiResponse, StartAttemptResponse, SubmitAttemptRequest},
    },
};

/// Backend operations the assessment session depends on. The auth token is
/// owned by the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GradingClient: Send + Sync {
    async fn start_attempt(&self, quiz_id: &str) -> AppResult<StartAttemptResponse>;
    async fn submit_attempt(&self, request: SubmitAttemptRequest) -> AppResult<GradedResult>;
}

pub struct HttpGradingClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: SecretString,
}

impl HttpGradingClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
        conflict: fn(String) -> AppError,
    ) -> AppResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        log::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.auth_token.expose_secret())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            log::warn!("POST {} failed with {}: {}", url, status, message);
            return Err(AppError::from_status(status.as_u16(), message, conflict));
        }

        let envelope: ApiResponse<T> = response.json().await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl GradingClient for HttpGradingClient {
    async fn start_attempt(&self, quiz_id: &str) -> AppResult<StartAttemptResponse> {
        let path = format!("quizzes/{}/start", quiz_id);
        self.post(&path, &serde_json::json!({}), AppError::AlreadyCompleted)
            .await
    }

    async fn submit_attempt(&self, request: SubmitAttemptRequest) -> AppResult<GradedResult> {
        let path = format!("quizzes/attempts/{}/submit", request.attempt_id);
        self.post(&path, &request, AppError::AlreadySubmitted).await
    }
}
