//! Client configuration.
//!
//! The API version is part of the configuration, so two clients in one
//! process can talk to different versions of the service.

use serde::Deserialize;

use crate::error::{ApiError, Result};

pub const DEFAULT_API_VERSION: &str = "1.0";
pub const DEFAULT_HOST: &str = "api.simplegeo.com";
pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_REALM: &str = "http://api.simplegeo.com";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub key: String,
    pub secret: String,
    pub api_version: String,
    pub host: String,
    pub port: u16,
    pub realm: String,
    /// Attach an `Authorization` header to every request.
    pub sign_requests: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            secret: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            realm: DEFAULT_REALM.to_string(),
            sign_requests: true,
        }
    }
}

impl ClientConfig {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            ..Self::default()
        }
    }

    /// Read `SIMPLEGEO_KEY` and `SIMPLEGEO_SECRET`, plus the optional
    /// `SIMPLEGEO_API_VERSION`, `SIMPLEGEO_HOST` and `SIMPLEGEO_PORT`.
    pub fn from_env() -> Result<Self> {
        let required = |name: &str| {
            std::env::var(name).map_err(|_| ApiError::precondition(format!("{name} is not set")))
        };
        let mut config = Self::new(required("SIMPLEGEO_KEY")?, required("SIMPLEGEO_SECRET")?);
        if let Ok(version) = std::env::var("SIMPLEGEO_API_VERSION") {
            config.api_version = version;
        }
        if let Ok(host) = std::env::var("SIMPLEGEO_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("SIMPLEGEO_PORT") {
            config.port = port
                .parse()
                .map_err(|_| ApiError::precondition(format!("SIMPLEGEO_PORT is not a port number: {port}")))?;
        }
        Ok(config)
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    pub fn with_signing(mut self, sign_requests: bool) -> Self {
        self.sign_requests = sign_requests;
        self
    }

    /// `http://<host>:<port>`
    pub fn base_uri(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_public_service() {
        let c = ClientConfig::new("k", "s");
        assert_eq!(c.api_version, "1.0");
        assert_eq!(c.base_uri(), "http://api.simplegeo.com:80");
        assert_eq!(c.realm, "http://api.simplegeo.com");
        assert!(c.sign_requests);
    }

    #[test]
    fn builder_overrides() {
        let c = ClientConfig::new("k", "s")
            .with_api_version("2.0")
            .with_host("localhost", 3000)
            .with_signing(false);
        assert_eq!(c.base_uri(), "http://localhost:3000");
        assert_eq!(c.api_version, "2.0");
        assert!(!c.sign_requests);
    }

    #[test]
    fn deserializes_with_defaults() {
        let c: ClientConfig = serde_json::from_str(r#"{"key":"k","secret":"s","port":8080}"#).unwrap();
        assert_eq!(c.port, 8080);
        assert_eq!(c.host, DEFAULT_HOST);
        assert_eq!(c.api_version, DEFAULT_API_VERSION);
    }
}
