//! # gridops-client
//!
//! The HTTP implementation of the `TriageApi` seam.
//!
//! Each operation is one request to a fixed backend path; the uniform
//! `{ok, data, error}` envelope is unwrapped into the success payload or a
//! `GridOpsError`. No retry, no caching, and no client-enforced timeout —
//! a call is a single-shot request/response pair.

pub mod config;
pub mod http;

pub use config::ClientConfig;
pub use http::ApiClient;
