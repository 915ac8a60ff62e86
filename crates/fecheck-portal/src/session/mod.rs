//! Venue-scoped HTTP session.
//!
//! A [`SessionClient`] owns a cookie store and, once a login contract
//! succeeds, the bearer token that every later request carries. Sessions
//! live for one orchestration run and are never persisted.

mod auth;

use std::time::Duration;

use fecheck_core::Credential;
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::{AuthFailure, PortalError};
use crate::retry::RetryPolicy;

pub use auth::{locate_bearer_token, AuthMethod, LoginContract, LoginEncoding};

const ACCEPT_ANY: &str = "application/json, text/html;q=0.9, */*;q=0.8";

/// Transport settings shared by every session of a run.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after a transient failure; `0` disables retries.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: "Mozilla/5.0 (fecheck)".to_string(),
            max_retries: 0,
            backoff_base_ms: 500,
            max_backoff_ms: 30_000,
        }
    }
}

/// Body and status of a successful GET.
#[derive(Debug, Clone)]
pub struct PortalResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl PortalResponse {
    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Deserialize`] if the body is not valid JSON.
    pub fn json(&self) -> Result<Value, PortalError> {
        serde_json::from_str(&self.body).map_err(|e| PortalError::Deserialize {
            context: self.url.clone(),
            source: e,
        })
    }
}

pub struct SessionClient {
    client: Client,
    base_url: Url,
    venue: String,
    bearer: Option<String>,
    auth: Option<AuthMethod>,
    retry: RetryPolicy,
}

impl SessionClient {
    /// Creates an unauthenticated session for `venue` rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`PortalError::InvalidUrl`] if `base_url` does not parse.
    pub fn new(
        venue: &str,
        base_url: &str,
        settings: &SessionSettings,
    ) -> Result<Self, PortalError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(settings.user_agent.as_str())
            .cookie_store(true)
            .build()?;

        // Trailing slash so relative joins land under the root.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PortalError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            venue: venue.to_owned(),
            bearer: None,
            auth: None,
            retry: RetryPolicy::from_settings(settings),
        })
    }

    #[must_use]
    pub fn venue(&self) -> &str {
        &self.venue
    }

    #[must_use]
    pub fn auth_method(&self) -> Option<AuthMethod> {
        self.auth
    }

    /// Runs one login contract and reports plain success or failure.
    pub async fn authenticate(&mut self, contract: &LoginContract, credential: &Credential) -> bool {
        self.try_authenticate(contract, credential).await.is_ok()
    }

    /// Tries each contract in order and keeps the first that succeeds.
    ///
    /// # Errors
    ///
    /// Returns the failure of the last contract tried, or
    /// [`AuthFailure::InvalidEndpoint`] when `contracts` is empty.
    pub async fn authenticate_any(
        &mut self,
        contracts: &[LoginContract],
        credential: &Credential,
    ) -> Result<AuthMethod, AuthFailure> {
        let mut last = AuthFailure::InvalidEndpoint("no login contract declared".to_string());
        for contract in contracts {
            match self.try_authenticate(contract, credential).await {
                Ok(method) => return Ok(method),
                Err(failure) => {
                    tracing::debug!(
                        venue = %self.venue,
                        path = %contract.path,
                        %failure,
                        "login contract failed, trying next"
                    );
                    last = failure;
                }
            }
        }
        Err(last)
    }

    /// Submits `credential` through `contract` and classifies the response.
    ///
    /// A located bearer token is attached to every later request. Without a
    /// token, an explicit success flag or the landing marker still counts as
    /// a cookie-backed login. Any previous token is dropped first.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthFailure`] describing why the login did not succeed.
    pub async fn try_authenticate(
        &mut self,
        contract: &LoginContract,
        credential: &Credential,
    ) -> Result<AuthMethod, AuthFailure> {
        self.bearer = None;
        self.auth = None;

        if contract.warm_up {
            let response = self
                .client
                .get(self.base_url.clone())
                .send()
                .await
                .map_err(|e| AuthFailure::Network(e.to_string()))?;
            if !response.status().is_success() {
                return Err(AuthFailure::Rejected {
                    status: response.status().as_u16(),
                });
            }
        }

        let url = self
            .resolve(&contract.path)
            .map_err(|e| AuthFailure::InvalidEndpoint(e.to_string()))?;

        let request = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, ACCEPT_ANY);
        let fields = [
            (contract.identifier_field.as_str(), credential.identifier.as_str()),
            (contract.secret_field.as_str(), credential.secret.as_str()),
        ];
        let request = match contract.encoding {
            LoginEncoding::Json => {
                let body: serde_json::Map<String, Value> = fields
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), Value::String((*v).to_string())))
                    .collect();
                request.json(&body)
            }
            LoginEncoding::Form => request.form(&fields),
        };

        let response = request
            .send()
            .await
            .map_err(|e| AuthFailure::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(venue = %self.venue, status = status.as_u16(), "login rejected");
            return Err(AuthFailure::Rejected {
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| AuthFailure::Network(e.to_string()))?;
        let parsed = serde_json::from_str::<Value>(&text).ok();

        if let Some(token) = parsed.as_ref().and_then(locate_bearer_token) {
            self.bearer = Some(token);
            self.auth = Some(AuthMethod::BearerToken);
            tracing::info!(venue = %self.venue, "authenticated with bearer token");
            return Ok(AuthMethod::BearerToken);
        }

        let flagged = parsed.as_ref().is_some_and(auth::has_success_flag);
        let landed = contract
            .landing_marker
            .as_deref()
            .is_some_and(|marker| text.contains(marker));
        if flagged || landed {
            self.auth = Some(AuthMethod::SessionCookie);
            tracing::info!(venue = %self.venue, "authenticated with session cookie");
            return Ok(AuthMethod::SessionCookie);
        }

        tracing::warn!(venue = %self.venue, "login response carried no success signal");
        Err(AuthFailure::NoSuccessSignal)
    }

    /// Authenticated GET of a root-relative path (query string included).
    ///
    /// # Errors
    ///
    /// - [`PortalError::InvalidUrl`] if the path cannot be joined to the base URL.
    /// - [`PortalError::UnexpectedStatus`] for any non-2xx status.
    /// - [`PortalError::Http`] on network failure.
    pub async fn get(&self, path_and_query: &str) -> Result<PortalResponse, PortalError> {
        let url = self.resolve(path_and_query)?;
        self.retry.run(|| {
            let url = url.clone();
            async move { self.send_get(url).await }
        })
        .await
    }

    /// GETs each candidate path in order and returns the first 2xx response.
    ///
    /// The body is not inspected; a 2xx with an unparseable body still wins.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::NoCandidateSucceeded`] when every candidate fails.
    pub async fn get_first_success(
        &self,
        resource: &str,
        candidates: &[String],
    ) -> Result<PortalResponse, PortalError> {
        for candidate in candidates {
            match self.get(candidate).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    tracing::debug!(
                        venue = %self.venue,
                        resource,
                        candidate = %candidate,
                        error = %err,
                        "candidate path failed"
                    );
                }
            }
        }
        Err(PortalError::NoCandidateSucceeded {
            resource: resource.to_owned(),
            tried: candidates.to_vec(),
        })
    }

    async fn send_get(&self, url: Url) -> Result<PortalResponse, PortalError> {
        let mut request = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, ACCEPT_ANY);
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(PortalResponse {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    fn resolve(&self, path: &str) -> Result<Url, PortalError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(path).map_err(|e| PortalError::InvalidUrl {
                url: path.to_owned(),
                reason: e.to_string(),
            });
        }
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| PortalError::InvalidUrl {
                url: path.to_owned(),
                reason: e.to_string(),
            })
    }
}
