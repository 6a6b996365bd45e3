//! HTTP client types for partner API communication.
//!
//! This module provides the signed dispatcher every outbound call goes
//! through.
//!
//! # Overview
//!
//! - [`PartnerClient`]: The async client that signs and sends calls
//! - [`ApiRequest`]: A call to be sent to the partner API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST)
//! - [`HttpError`]: Transport failures
//!
//! # Failure Handling
//!
//! The partner API reports its own failures in the response body (`error`
//! and `message` fields), and those bodies are returned unchanged. Transport
//! failures are reported as [`HttpError`] by [`PartnerClient::try_send`], or
//! folded into a `{"error", "kind"}` value by [`PartnerClient::send`].
//!
//! There are no automatic retries.

mod errors;
mod http_request;
mod partner_client;

pub use errors::{HttpError, InvalidRequestError};
pub use http_request::{ApiRequest, HttpMethod};
pub use partner_client::{upstream_error, PartnerClient, BRIDGE_VERSION};
