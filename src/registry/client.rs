//! Blocking HTTP client shared by the registry adapters
//!
//! Provides:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (max 3 retries)
//! - Rate limit and 404 handling

use crate::error::RegistryError;
use reqwest::blocking::Client;
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("repin/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| RegistryError::NetworkError {
                component: String::new(),
                registry: "HTTP client".to_string(),
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Perform a GET request with retry logic and error context.
    ///
    /// 404 responses are returned as-is so callers can map "not published"
    /// to an empty tag list instead of an error.
    pub fn get(
        &self,
        url: &str,
        component: &str,
        registry: &str,
    ) -> Result<reqwest::blocking::Response, RegistryError> {
        self.get_with_bearer(url, component, registry, None)
    }

    /// Perform a GET request with an optional bearer token
    pub fn get_with_bearer(
        &self,
        url: &str,
        component: &str,
        registry: &str,
        token: Option<&str>,
    ) -> Result<reqwest::blocking::Response, RegistryError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            let mut request = self.client.get(url);
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }

            match request.send() {
                Ok(response) => {
                    if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(RegistryError::RateLimitExceeded {
                            registry: registry.to_string(),
                        });

                        if attempt < self.max_retries {
                            std::thread::sleep(Duration::from_millis(delay));
                            delay *= 2;
                            continue;
                        }
                        break;
                    }

                    if response.status() == reqwest::StatusCode::UNAUTHORIZED
                        || response.status() == reqwest::StatusCode::FORBIDDEN
                    {
                        return Err(RegistryError::AuthenticationError {
                            registry: registry.to_string(),
                            message: format!("HTTP {}", response.status()),
                        });
                    }

                    if response.status() != reqwest::StatusCode::NOT_FOUND
                        && !response.status().is_success()
                    {
                        return Err(RegistryError::NetworkError {
                            component: component.to_string(),
                            registry: registry.to_string(),
                            message: format!("HTTP {}", response.status()),
                        });
                    }

                    return Ok(response);
                }
                Err(e) => {
                    if e.is_timeout() {
                        last_error = Some(RegistryError::Timeout {
                            component: component.to_string(),
                            registry: registry.to_string(),
                        });
                    } else {
                        last_error = Some(RegistryError::NetworkError {
                            component: component.to_string(),
                            registry: registry.to_string(),
                            message: e.to_string(),
                        });
                    }

                    if attempt < self.max_retries {
                        std::thread::sleep(Duration::from_millis(delay));
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| RegistryError::NetworkError {
            component: component.to_string(),
            registry: registry.to_string(),
            message: "unknown error".to_string(),
        }))
    }

    /// GET a JSON document; a 404 becomes `Ok(None)`
    pub fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        component: &str,
        registry: &str,
    ) -> Result<Option<T>, RegistryError> {
        self.get_json_with_bearer(url, component, registry, None)
    }

    /// GET a JSON document with an optional bearer token; a 404 becomes
    /// `Ok(None)`
    pub fn get_json_with_bearer<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        component: &str,
        registry: &str,
        token: Option<&str>,
    ) -> Result<Option<T>, RegistryError> {
        let response = self.get_with_bearer(url, component, registry, token)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        response
            .json::<T>()
            .map(Some)
            .map_err(|e| RegistryError::InvalidResponse {
                component: component.to_string(),
                registry: registry.to_string(),
                message: format!("failed to parse JSON: {}", e),
            })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        // builder only fails on TLS backend misconfiguration
        Self::new().expect("failed to create default HTTP client")
    }
}
