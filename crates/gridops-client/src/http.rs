//! Blocking HTTP transport for the backend contract.
//!
//! `ApiClient` implements `TriageApi` with one request per operation. The
//! only logic here is envelope unwrapping: `ok: false` becomes
//! `GridOpsError::Backend` with the server's message (or the generic
//! default), a missing `data` becomes `GridOpsError::MissingData`.

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use gridops_contracts::{
    api::{
        ApiEnvelope, BaselineTriageData, CasesData, CertaintyTriageData, CompareMetrics,
        DispatchData, DispatchRequest, TriageRequest, VerifyData, VerifyRequest,
    },
    case::CaseMode,
    error::{GridOpsError, GridOpsResult},
    signal::Signal,
};
use gridops_core::traits::TriageApi;

use crate::config::ClientConfig;

/// Message used when the backend signals failure without an error string.
const DEFAULT_FAILURE_MESSAGE: &str = "request failed";

/// A blocking HTTP client for the triage backend.
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// Build a client against `base_url` (scheme + host + port, no path).
    ///
    /// The transport timeout is disabled: the dashboard's loading flags gate
    /// re-triggering, and a slow backend surfaces as a visibly outstanding
    /// operation rather than a synthetic client-side failure.
    pub fn new(base_url: impl Into<String>) -> GridOpsResult<Self> {
        let http = Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| GridOpsError::Config {
                reason: format!("failed to build http client: {}", e),
            })?;

        Ok(Self {
            base_url: normalize_base_url(base_url.into()),
            http,
        })
    }

    /// Build a client from a parsed configuration.
    pub fn from_config(config: &ClientConfig) -> GridOpsResult<Self> {
        Self::new(config.api_base_url.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> GridOpsResult<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.http.get(&url).send().map_err(transport_error)?;
        decode_envelope(response)
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> GridOpsResult<T> {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .map_err(transport_error)?;
        decode_envelope(response)
    }
}

impl TriageApi for ApiClient {
    fn run_baseline(&self, signals: &[Signal]) -> GridOpsResult<BaselineTriageData> {
        self.post(
            "/api/triage/baseline",
            &TriageRequest {
                signals: signals.to_vec(),
            },
        )
    }

    fn run_certainty(&self, signals: &[Signal]) -> GridOpsResult<CertaintyTriageData> {
        self.post(
            "/api/triage/certainty",
            &TriageRequest {
                signals: signals.to_vec(),
            },
        )
    }

    fn fetch_cases(&self, mode: CaseMode) -> GridOpsResult<CasesData> {
        self.get(&format!("/api/cases?mode={}", mode.as_str()))
    }

    fn dispatch_case(
        &self,
        case_id: &str,
        request: &DispatchRequest,
    ) -> GridOpsResult<DispatchData> {
        self.post(&format!("/api/cases/{}/dispatch", case_id), request)
    }

    fn verify_case(&self, case_id: &str, request: &VerifyRequest) -> GridOpsResult<VerifyData> {
        self.post(&format!("/api/cases/{}/verify", case_id), request)
    }

    fn compare_metrics(&self) -> GridOpsResult<CompareMetrics> {
        self.get("/api/metrics/compare")
    }
}

/// Strip trailing slashes so path concatenation never doubles them.
fn normalize_base_url(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}

fn transport_error(err: reqwest::Error) -> GridOpsError {
    GridOpsError::Transport {
        reason: err.to_string(),
    }
}

fn decode_envelope<T: DeserializeOwned>(response: Response) -> GridOpsResult<T> {
    let envelope: ApiEnvelope<T> = response.json().map_err(|e| GridOpsError::Decode {
        reason: e.to_string(),
    })?;
    unwrap_envelope(envelope)
}

/// Resolve an envelope to its success data or the failure it describes.
pub fn unwrap_envelope<T>(envelope: ApiEnvelope<T>) -> GridOpsResult<T> {
    if !envelope.ok {
        return Err(GridOpsError::Backend {
            message: envelope
                .error
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
        });
    }
    envelope.data.ok_or(GridOpsError::MissingData)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope<T>(ok: bool, data: Option<T>, error: Option<&str>) -> ApiEnvelope<T> {
        ApiEnvelope {
            ok,
            data,
            error: error.map(|e| e.to_string()),
        }
    }

    #[test]
    fn unwrap_returns_data_on_ok() {
        let result = unwrap_envelope(envelope(true, Some(7u32), None)).unwrap();
        assert_eq!(result, 7);
    }

    #[test]
    fn unwrap_surfaces_server_message_on_failure() {
        let err = unwrap_envelope(envelope::<u32>(false, None, Some("case not found"))).unwrap_err();
        assert_eq!(err.to_string(), "case not found");
    }

    #[test]
    fn unwrap_uses_default_message_when_error_absent() {
        let err = unwrap_envelope(envelope::<u32>(false, None, None)).unwrap_err();
        assert_eq!(err.to_string(), DEFAULT_FAILURE_MESSAGE);
    }

    #[test]
    fn unwrap_treats_ok_without_data_as_missing() {
        let err = unwrap_envelope(envelope::<u32>(true, None, None)).unwrap_err();
        assert!(matches!(err, GridOpsError::MissingData));
    }

    #[test]
    fn unwrap_prefers_failure_over_present_data() {
        // A malformed envelope claiming both failure and data is a failure.
        let err = unwrap_envelope(envelope(false, Some(7u32), Some("bad"))).unwrap_err();
        assert_eq!(err.to_string(), "bad");
    }

    #[test]
    fn base_url_trailing_slashes_are_stripped() {
        assert_eq!(
            normalize_base_url("http://localhost:8000/".to_string()),
            "http://localhost:8000"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8000".to_string()),
            "http://localhost:8000"
        );
    }

    #[test]
    fn client_builds_endpoint_urls() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(
            client.url("/api/metrics/compare"),
            "http://localhost:8000/api/metrics/compare"
        );
        assert_eq!(
            client.url("/api/cases?mode=baseline"),
            "http://localhost:8000/api/cases?mode=baseline"
        );
    }
}
