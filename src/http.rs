//! HTTP client wrapper for file-manager API requests.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};

use crate::config::ClientConfig;
use crate::error::{FmError, Result};

/// HTTP client bound to one file-manager server.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client for the given server root.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: trim_base(base_url),
        }
    }

    /// Create a new HTTP client with a proxy.
    pub fn with_proxy(base_url: &str, proxy: &str) -> Result<Self> {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| FmError::InvalidConfig(format!("Invalid proxy: {}", e)))?;

        let client = Client::builder()
            .proxy(proxy)
            .build()
            .map_err(|e| FmError::InvalidConfig(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            base_url: trim_base(base_url),
        })
    }

    /// Create a client from a full configuration (proxy and timeout).
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| FmError::InvalidConfig(format!("Invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| FmError::InvalidConfig(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            base_url: trim_base(&config.base_url),
        })
    }

    /// Server root this client talks to, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API endpoint such as `/api/files`.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Start a GET request carrying the given authorization value.
    pub fn get(&self, endpoint: &str, auth: &str) -> RequestBuilder {
        self.client
            .get(self.url(endpoint))
            .header(reqwest::header::AUTHORIZATION, auth)
    }

    /// Start a POST request carrying the given authorization value.
    pub fn post(&self, endpoint: &str, auth: &str) -> RequestBuilder {
        self.client
            .post(self.url(endpoint))
            .header(reqwest::header::AUTHORIZATION, auth)
    }
}

fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
