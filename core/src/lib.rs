//! Client core for the SimpleGeo features service.
//!
//! # Overview
//! Builds signed `HttpRequest` values and turns `HttpResponse` values into
//! typed [`Feature`]s without touching the network (host-does-IO pattern).
//! The caller supplies the transport, blocking or async, and the core
//! interprets whatever comes back.
//!
//! # Design
//! - `Client` holds only its `ClientConfig`; the API version is per client.
//! - `oauth` computes the HMAC-SHA1 `Authorization` header.
//! - `Feature` keeps coordinates in `[lat, lon]` order; the GeoJSON wire
//!   form uses `[lon, lat]` and the swap happens only at encode/decode.
//! - Every failure is an [`ApiError`]; nothing is retried.

pub mod client;
pub mod config;
pub mod coords;
pub mod error;
pub mod feature;
pub mod handle;
pub mod http;
pub mod oauth;

pub use client::Client;
pub use config::ClientConfig;
pub use coords::Coordinates;
pub use error::{ApiError, Result};
pub use feature::Feature;
pub use handle::is_simplegeohandle;
pub use http::{
    collect_body, AsyncTransport, BodyCollector, Completion, HttpMethod, HttpRequest, HttpResponse, ResponseMeta,
    Transport,
};
pub use oauth::{sign_request, ParamValue, Params};
