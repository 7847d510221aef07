//! Request builder and response parser for the SimpleGeo features API.
//!
//! # Design
//! `Client` holds only its configuration and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. `get_feature` and `get_feature_async` glue the two
//! together around exactly one transport invocation; they never retry.

use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::feature::Feature;
use crate::handle::{is_simplegeohandle, HANDLE_PATTERN};
use crate::http::{AsyncTransport, HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::oauth::{sign_request, Params};

pub const USER_AGENT: &str = concat!("SimpleGeo Places Client v", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve a named endpoint to an absolute URL under the configured
    /// API version.
    pub fn endpoint(&self, name: &str, args: &[(&str, &str)]) -> Result<String> {
        let path = match name {
            "feature" => format!("features/{}.json", required_arg(args, "simplegeohandle")?),
            _ => return Err(ApiError::precondition(format!("No endpoint named \"{name}\""))),
        };
        Ok(format!(
            "{}/{}/{}",
            self.config.base_uri(),
            self.config.api_version.trim_matches('/'),
            path
        ))
    }

    /// Build a request for `url`. `body` must be text; when signing is
    /// enabled an `Authorization` header is attached.
    pub fn build_request(&self, method: HttpMethod, url: &str, body: &[u8]) -> Result<HttpRequest> {
        if std::str::from_utf8(body).is_err() {
            return Err(ApiError::precondition("request body is required to be text"));
        }

        let mut headers = Vec::new();
        if self.config.sign_requests {
            let auth = sign_request(
                &self.config.key,
                &self.config.secret,
                method.as_str(),
                url,
                &mut Params::new(),
                &self.config.realm,
            )?;
            headers.push(("Authorization".to_string(), auth));
        }
        headers.push(("User-Agent".to_string(), USER_AGENT.to_string()));

        debug!(%method, %url, body_len = body.len(), "built request");
        Ok(HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body: body.to_vec(),
        })
    }

    pub fn build_get_feature(&self, handle: &str) -> Result<HttpRequest> {
        if !is_simplegeohandle(handle) {
            return Err(ApiError::precondition(format!(
                "simplegeohandle is required to match the regex {HANDLE_PATTERN}, got {handle:?}"
            )));
        }
        let url = self.endpoint("feature", &[("simplegeohandle", handle)])?;
        self.build_request(HttpMethod::Get, &url, b"")
    }

    /// Decode a feature from a 2xx/3xx response. Any other status becomes
    /// `ApiError::Http` carrying the response.
    pub fn parse_get_feature(&self, response: HttpResponse) -> Result<Feature> {
        debug!(status = response.status, body_len = response.body.len(), "parsing feature response");
        check_status(response).and_then(|response| {
            let meta = response.meta();
            Feature::from_json(&response.body)
                .map(|f| f.with_response(meta))
                .inspect_err(|e| warn!(error = %e, "could not decode feature"))
        })
    }

    /// Fetch one feature through a blocking transport.
    pub fn get_feature<T: Transport + ?Sized>(&self, transport: &T, handle: &str) -> Result<Feature> {
        let request = self.build_get_feature(handle)?;
        let response = transport.execute(request)?;
        self.parse_get_feature(response)
    }

    /// Fetch one feature through a non-blocking transport.
    pub async fn get_feature_async<T: AsyncTransport + ?Sized>(&self, transport: &T, handle: &str) -> Result<Feature> {
        let request = self.build_get_feature(handle)?;
        let response = transport.execute(request).await?;
        self.parse_get_feature(response)
    }
}

fn required_arg<'a>(args: &[(&str, &'a str)], key: &str) -> Result<&'a str> {
    args.iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .ok_or_else(|| ApiError::precondition(format!("Missing required argument \"{key}\"")))
}

/// Pass 2xx/3xx responses through; turn anything else into `ApiError::Http`.
fn check_status(response: HttpResponse) -> Result<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }
    let message = serde_json::from_slice::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| "unexpected response status".to_string());
    warn!(status = response.status, %message, "request failed");
    Err(ApiError::Http {
        status: response.status,
        message,
        headers: response.headers,
        body: response.body,
    })
}
