//! HTTP client for the QPEplus station snapshot endpoint.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::header::{ACCEPT, COOKIE, ORIGIN, REFERER};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::config::{PortalConfig, RequestConfig};
use crate::error::{FetchError, Result};
use crate::session::SessionCredentials;
use crate::station::Station;

/// Decoded body of the snapshot endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalResponse {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub failed_code: Option<Value>,
    #[serde(default)]
    pub data: Option<Vec<Station>>,
}

impl PortalResponse {
    pub fn is_success(&self) -> bool {
        matches!(&self.status, Some(Value::String(status)) if status == "success")
    }

    /// Station readings, or [`FetchError::Rejected`] for a non-success status.
    pub fn into_stations(self) -> Result<Vec<Station>> {
        if !self.is_success() {
            let failed_code = match self.failed_code {
                Some(Value::String(code)) => code,
                Some(other) => other.to_string(),
                None => match self.status {
                    Some(status) => format!("status {status}"),
                    None => "missing status".to_string(),
                },
            };
            return Err(FetchError::Rejected { failed_code });
        }
        Ok(self.data.unwrap_or_default())
    }
}

/// Posts snapshot queries to the portal.
pub struct PortalClient {
    client: Client,
    jar: Arc<Jar>,
    portal: PortalConfig,
}

impl PortalClient {
    pub fn new(portal: PortalConfig, request: &RequestConfig) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(Duration::from_secs(request.timeout_secs))
            .connect_timeout(Duration::from_secs(request.connect_timeout_secs))
            .user_agent(request.user_agent.as_str())
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            jar,
            portal,
        })
    }

    /// Underlying client, shared with credential providers.
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// Cookies collected by requests made through [`PortalClient::http`].
    pub fn cookie_jar(&self) -> &Jar {
        &self.jar
    }

    pub fn portal(&self) -> &PortalConfig {
        &self.portal
    }

    /// Request the snapshot taken at `data_time` (`YYYY-MM-DD HH:MM:SS`).
    ///
    /// An explicit `Cookie` header from `credentials` replaces the jar's.
    #[instrument(skip(self, credentials), fields(url = %self.portal.api_url))]
    pub async fn fetch_snapshot(
        &self,
        data_time: &str,
        credentials: &SessionCredentials,
    ) -> Result<PortalResponse> {
        let form = [
            ("tag_id", self.portal.tag_id.as_str()),
            ("data_time", data_time),
            ("group", self.portal.group.as_str()),
            ("lang", self.portal.lang.as_str()),
        ];

        let mut request = self
            .client
            .post(&self.portal.api_url)
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(REFERER, self.portal.landing_url.as_str())
            .header(ORIGIN, self.portal.origin.as_str())
            .header("X-Requested-With", "XMLHttpRequest")
            .form(&form);

        if let Some(cookie) = credentials.cookie_header() {
            request = request.header(COOKIE, cookie);
        }
        if let Some(token) = &credentials.csrf_token {
            request = request.header("X-CSRFToken", token.as_str());
        }

        info!("Fetching data from API");

        let response = request.send().await.map_err(|source| FetchError::Transport {
            url: self.portal.api_url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: self.portal.api_url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Transport {
            url: self.portal.api_url.clone(),
            source,
        })?;
        debug!(bytes = body.len(), "Received portal response");

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> PortalResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_success_yields_stations() {
        let response = decode(json!({
            "status": "success",
            "data": [{"站號": "C0C480", "縣市": "桃園市"}]
        }));
        let stations = response.into_stations().unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0]["站號"], "C0C480");
    }

    #[test]
    fn test_success_without_data_is_empty() {
        let response = decode(json!({"status": "success"}));
        assert!(response.into_stations().unwrap().is_empty());
    }

    #[test]
    fn test_error_status_is_rejected_with_code() {
        let response = decode(json!({"status": "error", "failed_code": "X"}));
        let err = response.into_stations().unwrap_err();
        assert!(err.is_soft());
        assert!(err.to_string().contains('X'));
    }

    #[test]
    fn test_numeric_failed_code() {
        let response = decode(json!({"status": "fail", "failed_code": 403}));
        match response.into_stations().unwrap_err() {
            FetchError::Rejected { failed_code } => assert_eq!(failed_code, "403"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_status_is_rejected() {
        let response = decode(json!({"failed_code": "X"}));
        let err = response.into_stations().unwrap_err();
        assert!(err.is_soft());
        assert!(err.to_string().contains('X'));
    }

    #[test]
    fn test_non_string_status_is_rejected() {
        let response = decode(json!({"status": true, "data": []}));
        match response.into_stations().unwrap_err() {
            FetchError::Rejected { failed_code } => assert_eq!(failed_code, "status true"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_object_body_fails_to_decode() {
        assert!(serde_json::from_value::<PortalResponse>(json!(42)).is_err());
    }
}
