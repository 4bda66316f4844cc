use crate::domain::model::{Employee, UploadSummary};
use crate::domain::ports::{BulkUploader, ConfigProvider};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use url::Url;

#[derive(Serialize)]
struct BulkRequest<'a> {
    employees: &'a [Employee],
}

/// Client for `POST /api/employees/bulk`.
pub struct BulkApiClient {
    client: Client,
    endpoint: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
}

impl BulkApiClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let base = Url::parse(config.api_base_url()).map_err(|e| {
            EtlError::InvalidConfigValueError {
                field: "api.base_url".to_string(),
                value: config.api_base_url().to_string(),
                reason: e.to_string(),
            }
        })?;
        let endpoint = base
            .join(config.bulk_path())
            .map_err(|e| EtlError::InvalidConfigValueError {
                field: "api.bulk_path".to_string(),
                value: config.bulk_path().to_string(),
                reason: e.to_string(),
            })?;

        let mut client = Self::new(endpoint);
        for (name, value) in config.api_headers() {
            client = client.with_header(name, value)?;
        }
        if let Some(seconds) = config.request_timeout_seconds() {
            client.timeout = Some(Duration::from_secs(seconds));
        }
        Ok(client)
    }

    /// 額外的請求標頭，例如 Cookie 或 Authorization
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| EtlError::ConfigError {
                message: format!("invalid header name '{}': {}", name, e),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| EtlError::ConfigError {
            message: format!("invalid value for header '{}': {}", name, e),
        })?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl BulkUploader for BulkApiClient {
    async fn upload(&self, employees: &[Employee]) -> Result<UploadSummary> {
        tracing::debug!(
            "POST {} with {} employees",
            self.endpoint,
            employees.len()
        );

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .headers(self.headers.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(&BulkRequest { employees });

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Bulk API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EtlError::HttpStatusError {
                status: status.as_u16(),
                body,
            });
        }

        let summary: UploadSummary = response.json().await?;
        for error in &summary.errors {
            tracing::warn!("Server rejected a record: {}", error);
        }
        Ok(summary)
    }
}
