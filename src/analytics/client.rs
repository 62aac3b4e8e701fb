use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::PopularPagesError;
use crate::traits::ReportFetcher;

use super::credentials::{ServiceAccountKey, ANALYTICS_READONLY_SCOPE};
use super::types::{BatchGetRequest, GetReportsResponse, ReportRequest};

pub const BATCH_GET_URL: &str = "https://analyticsreporting.googleapis.com/v4/reports:batchGet";
const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// トークンエンドポイントのレスポンス
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Analytics Reporting API v4 クライアント
pub struct AnalyticsClient {
    key: ServiceAccountKey,
    http: reqwest::Client,
    batch_get_url: String,
    access_token: Option<String>,
}

impl AnalyticsClient {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            key,
            http: reqwest::Client::new(),
            batch_get_url: BATCH_GET_URL.to_string(),
            access_token: None,
        }
    }

    pub fn from_key_file(path: impl AsRef<Path>) -> Result<Self, PopularPagesError> {
        Ok(Self::new(ServiceAccountKey::from_file(path)?))
    }

    /// batchGet の送信先を差し替える
    pub fn with_batch_get_url(mut self, url: impl Into<String>) -> Self {
        self.batch_get_url = url.into();
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn is_authorized(&self) -> bool {
        self.access_token.is_some()
    }

    fn get_token(&self) -> Result<&str, PopularPagesError> {
        self.access_token
            .as_deref()
            .ok_or_else(|| PopularPagesError::Auth("認証されていません".into()))
    }
}

/// 2xx 以外はボディごと API エラーにする
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, PopularPagesError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(PopularPagesError::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ReportFetcher for AnalyticsClient {
    async fn authorize(&mut self) -> Result<(), PopularPagesError> {
        info!("Initializing Analytics API...");
        debug!("Service account: {}", self.key.client_email);

        let assertion = self.key.assertion(ANALYTICS_READONLY_SCOPE, Utc::now())?;

        let resp = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT_TYPE),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let token: TokenResponse = check_status(resp)
            .await
            .map_err(|e| PopularPagesError::Auth(e.to_string()))?
            .json()
            .await?;

        info!("Access token acquired (expires_in={:?})", token.expires_in);
        self.access_token = Some(token.access_token);
        Ok(())
    }

    async fn fetch(&self, request: &ReportRequest) -> Result<GetReportsResponse, PopularPagesError> {
        let token = self.get_token()?;

        info!(
            "Fetching reports from google analytics: view_id={}, page_size={}",
            request.view_id, request.page_size
        );

        let body = BatchGetRequest::from(request.clone());
        let resp = self
            .http
            .post(&self.batch_get_url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let response: GetReportsResponse = check_status(resp).await?.json().await?;

        debug!("Received {} report(s)", response.reports.len());
        Ok(response)
    }
}
