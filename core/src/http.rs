//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The core builds `HttpRequest`
//! values and interprets `HttpResponse` values; the actual round-trip is
//! done by a transport collaborator supplied by the caller, either blocking
//! ([`Transport`]) or async ([`AsyncTransport`]).
//!
//! Transports that hand the body over in pieces feed a [`BodyCollector`].
//! Every request gets its own collector, so nothing is shared between
//! concurrent calls.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};

use crate::error::{ApiError, Result};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data. `body` is exactly what the
/// server sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// 2xx and 3xx both count as success.
    pub fn is_success(&self) -> bool {
        matches!(self.status / 100, 2 | 3)
    }

    pub fn meta(&self) -> ResponseMeta {
        ResponseMeta {
            status: self.status,
            headers: self.headers.clone(),
        }
    }
}

/// Status line and headers of a response, kept alongside decoded values
/// for debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMeta {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Blocking transport: returns once the whole response is available.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Non-blocking transport.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// How a streamed body ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Done,
    /// The stream stopped early; the reason is reported to the caller.
    Failed(String),
}

/// Accumulates body chunks in arrival order until the stream completes.
#[derive(Debug, Default)]
pub struct BodyCollector {
    chunks: Vec<u8>,
}

impl BodyCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_received(&mut self, chunk: &[u8]) {
        self.chunks.extend_from_slice(chunk);
    }

    /// Bytes received so far.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Consume the collector. Abnormal completion is an error even when
    /// bytes were already received.
    pub fn finish(self, completion: Completion) -> Result<Vec<u8>> {
        match completion {
            Completion::Done => Ok(self.chunks),
            Completion::Failed(reason) => Err(ApiError::transport(format!(
                "body stream ended abnormally after {} bytes: {reason}",
                self.chunks.len()
            ))),
        }
    }

    /// Blocking form: drain an iterator of chunks. The first `Err` ends
    /// the body abnormally.
    pub fn collect<I, B>(chunks: I) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = Result<B>>,
        B: AsRef<[u8]>,
    {
        let mut collector = Self::new();
        for chunk in chunks {
            match chunk {
                Ok(chunk) => collector.data_received(chunk.as_ref()),
                Err(e) => return collector.finish(Completion::Failed(e.to_string())),
            }
        }
        collector.finish(Completion::Done)
    }
}

/// Async form of [`BodyCollector::collect`]: resolves once the stream ends.
pub async fn collect_body<S>(mut stream: S) -> Result<Vec<u8>>
where
    S: Stream<Item = Result<Bytes>> + Unpin,
{
    let mut collector = BodyCollector::new();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => collector.data_received(&chunk),
            Err(e) => return collector.finish(Completion::Failed(e.to_string())),
        }
    }
    collector.finish(Completion::Done)
}
