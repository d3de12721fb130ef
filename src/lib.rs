//! Client for the LINE Pay v3 REST API.
//!
//! Requests are signed with HMAC-SHA256 over the channel secret, request
//! path, payload and a per-request nonce. Responses whose `returnCode` is not
//! `"0000"` come back as [`LinePayError::Api`].

pub mod auth;
pub mod client;
pub mod errors;
pub mod types;

pub use client::LinePayApi;
pub use errors::{LinePayError, LinePayResult};
