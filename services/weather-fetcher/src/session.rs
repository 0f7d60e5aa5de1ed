//! Session credentials for the portal.
//!
//! The snapshot endpoint is protected by a CSRF token that must be sent
//! twice: as the `csrftoken` cookie and in the `X-CSRFToken` header.
//! Credentials either come from a live visit to the landing page or are
//! injected from configuration.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::cookie::CookieStore;
use reqwest::Url;
use tracing::{debug, info, instrument, warn};

use crate::client::PortalClient;
use crate::config::SessionConfig;
use crate::error::{FetchError, Result};

/// Cookies and CSRF token to present with the snapshot request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCredentials {
    pub cookies: Vec<(String, String)>,
    pub csrf_token: Option<String>,
}

impl SessionCredentials {
    /// Build credentials, taking the CSRF token from the cookie named
    /// `csrf_cookie` when present.
    pub fn from_cookies(cookies: Vec<(String, String)>, csrf_cookie: &str) -> Self {
        let csrf_token = cookies
            .iter()
            .rev()
            .find(|(name, _)| name == csrf_cookie)
            .map(|(_, value)| value.clone());
        Self {
            cookies,
            csrf_token,
        }
    }

    /// `Cookie` request header value, or `None` without cookies.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        Some(pairs.join("; "))
    }
}

/// Supplies the credentials for one run.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn credentials(&self, client: &PortalClient) -> Result<SessionCredentials>;
}

/// Fetches fresh cookies from the landing page.
///
/// Cookies land in the client's jar, including those set on redirect hops,
/// and are read back for the snapshot endpoint.
#[derive(Debug, Clone)]
pub struct LiveSession {
    landing_url: String,
    csrf_cookie: String,
}

impl LiveSession {
    pub fn new(landing_url: impl Into<String>, csrf_cookie: impl Into<String>) -> Self {
        Self {
            landing_url: landing_url.into(),
            csrf_cookie: csrf_cookie.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for LiveSession {
    #[instrument(skip(self, client), fields(url = %self.landing_url))]
    async fn credentials(&self, client: &PortalClient) -> Result<SessionCredentials> {
        info!("Fetching dynamic session");

        let landing = parse_url(&self.landing_url)?;
        let api = parse_url(&client.portal().api_url)?;

        let response = client
            .http()
            .get(landing)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: self.landing_url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: self.landing_url.clone(),
                status: status.as_u16(),
            });
        }

        let cookies = client
            .cookie_jar()
            .cookies(&api)
            .and_then(|header| header.to_str().ok().map(parse_cookie_header))
            .unwrap_or_default();

        let credentials = SessionCredentials::from_cookies(cookies, &self.csrf_cookie);
        debug!(cookies = credentials.cookies.len(), "Session cookies received");
        if credentials.csrf_token.is_none() {
            warn!(cookie = %self.csrf_cookie, "Landing page set no CSRF cookie");
        }

        Ok(credentials)
    }
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| FetchError::Config(format!("invalid URL {url}: {e}")))
}

/// Cookies captured elsewhere and injected through configuration.
#[derive(Debug, Clone)]
pub struct StaticSession {
    credentials: SessionCredentials,
}

impl StaticSession {
    pub fn new(
        cookies: BTreeMap<String, String>,
        csrf_token: Option<String>,
        csrf_cookie: &str,
    ) -> Self {
        let mut credentials =
            SessionCredentials::from_cookies(cookies.into_iter().collect(), csrf_cookie);
        if csrf_token.is_some() {
            credentials.csrf_token = csrf_token;
        }
        Self { credentials }
    }
}

#[async_trait]
impl CredentialProvider for StaticSession {
    async fn credentials(&self, _client: &PortalClient) -> Result<SessionCredentials> {
        debug!(
            cookies = self.credentials.cookies.len(),
            "Using static session cookies"
        );
        Ok(self.credentials.clone())
    }
}

/// Build the provider selected by `config`.
pub fn provider_from_config(
    config: &SessionConfig,
    landing_url: &str,
) -> Box<dyn CredentialProvider> {
    match config {
        SessionConfig::Live { csrf_cookie } => {
            Box::new(LiveSession::new(landing_url, csrf_cookie.as_str()))
        }
        SessionConfig::Static {
            cookies,
            csrf_token,
            csrf_cookie,
        } => Box::new(StaticSession::new(
            cookies.clone(),
            csrf_token.clone(),
            csrf_cookie,
        )),
    }
}

/// Split a `Cookie` header (`a=1; b=2`) into name/value pairs.
pub fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
