//! Client configuration.
//!
//! A `ClientConfig` is built once and never mutated afterwards; the client
//! only reads the base URL through `base_url()`.

use std::fmt;

use ureq::http::uri::{Authority, Scheme};
use ureq::http::Uri;

use crate::error::ConfigError;

/// Environment variable read by `ClientConfig::from_env`.
pub const BASE_URL_ENV: &str = "PROBE_BASE_URL";

/// Scheme, host and path prefix that request paths are joined onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    scheme: Scheme,
    authority: Authority,
    path: String,
}

impl BaseUrl {
    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// Host and optional port.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Path prefix in its percent-encoded form.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    base_url: Option<BaseUrl>,
}

impl ClientConfig {
    /// No base URL: requests are sent exactly as given.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `url` as the base onto which request paths are joined.
    ///
    /// The URL must be absolute (`http://localhost:3000/api`). Any query or
    /// fragment on it is ignored.
    pub fn with_base_url(url: &str) -> Result<Self, ConfigError> {
        let uri: Uri = url.parse().map_err(|source| ConfigError::InvalidBaseUrl {
            url: url.to_string(),
            source,
        })?;
        let (Some(scheme), Some(authority)) = (uri.scheme(), uri.authority()) else {
            return Err(ConfigError::MissingHost(url.to_string()));
        };
        Ok(Self {
            base_url: Some(BaseUrl {
                scheme: scheme.clone(),
                authority: authority.clone(),
                path: uri.path().to_string(),
            }),
        })
    }

    /// Read the base URL from `PROBE_BASE_URL`. Unset or blank means no base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::with_base_url(url.trim()),
            _ => Ok(Self::new()),
        }
    }

    pub fn base_url(&self) -> Option<&BaseUrl> {
        self.base_url.as_ref()
    }
}
