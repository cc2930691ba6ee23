//! Synchronization client for the remote flow API.
//!
//! Each operation issues exactly one HTTP round trip and never retries.
//! The client keeps no per-call state, so one instance can be shared by
//! callers working on different flows.

pub mod config;
pub mod http;
pub mod transport;

pub use config::{API_KEY_ENV, API_SERVER_ENV, ClientConfig, DEFAULT_API_SERVER};
pub use http::ReqwestTransport;
pub use transport::{HttpRequest, HttpResponse, Method, Transport};

use crate::document;
use crate::error::ClientError;
use crate::model::Flow;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "Truora-Api-Key";

/// Client for `/v1/flows`, generic over the transport that performs the round trips.
pub struct FlowClient<T = ReqwestTransport> {
    api_key: String,
    api_server: String,
    strict_reads: bool,
    transport: T,
}

impl FlowClient<ReqwestTransport> {
    /// Builds a client backed by the default `reqwest` transport.
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        validate(&config)?;
        let transport = ReqwestTransport::new(config.timeout)?;
        Self::new(config, transport)
    }
}

impl<T: Transport> FlowClient<T> {
    /// Fails with `MissingCredential` or `MissingServerAddress` when either setting is empty.
    pub fn new(config: ClientConfig, transport: T) -> Result<Self, ClientError> {
        validate(&config)?;
        Ok(Self {
            api_key: config.api_key,
            api_server: config.api_server.trim_end_matches('/').to_string(),
            strict_reads: config.strict_reads,
            transport,
        })
    }

    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches a flow.
    ///
    /// By default the body is decoded whatever the status code, so a 404
    /// whose body parses as a flow comes back as that flow. With
    /// `strict_reads` any non-2xx status is a `RemoteRejected` instead.
    pub fn get(&self, flow_id: &str) -> Result<Flow, ClientError> {
        let request = self.request(Method::Get, self.flow_url(flow_id), None);
        let response = self.send(request)?;

        if !response.is_success() {
            if self.strict_reads {
                return Err(rejected("reading", response));
            }
            tracing::warn!(
                flow_id,
                status = response.status,
                "Decoding flow from a non-success response"
            );
        }

        Ok(document::from_document(&response.body)?)
    }

    /// Creates a flow. Only a `201 Created` counts as success.
    ///
    /// The returned flow is the server's copy, carrying the assigned
    /// `flow_id`, `version` and timestamps.
    pub fn create(&self, flow: &Flow) -> Result<Flow, ClientError> {
        let body = document::to_request_body(flow)?;
        let request = self.request(Method::Post, self.flows_url(), Some(body));
        let response = self.send(request)?;

        if response.status != 201 {
            return Err(rejected("creating", response));
        }

        Ok(document::from_document(&response.body)?)
    }

    /// Replaces the definition of an existing flow. Only a `200 OK` counts as success.
    pub fn update(&self, flow_id: &str, flow: &Flow) -> Result<Flow, ClientError> {
        let body = document::to_request_body(flow)?;
        let request = self.request(Method::Post, self.flow_url(flow_id), Some(body));
        let response = self.send(request)?;

        if response.status != 200 {
            return Err(rejected("updating", response));
        }

        Ok(document::from_document(&response.body)?)
    }

    /// Deletes a flow. Only a `200 OK` counts as success; the body is ignored.
    pub fn delete(&self, flow_id: &str) -> Result<(), ClientError> {
        let request = self.request(Method::Delete, self.flow_url(flow_id), None);
        let response = self.send(request)?;

        if response.status != 200 {
            return Err(rejected("deleting", response));
        }

        Ok(())
    }

    fn flows_url(&self) -> String {
        format!("{}/v1/flows", self.api_server)
    }

    /// The id is a single path segment, so reserved characters are escaped.
    fn flow_url(&self, flow_id: &str) -> String {
        format!("{}/v1/flows/{}", self.api_server, urlencoding::encode(flow_id))
    }

    fn request(&self, method: Method, url: String, body: Option<String>) -> HttpRequest {
        let mut headers = vec![(API_KEY_HEADER.to_string(), self.api_key.clone())];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let method = request.method;
        let url = request.url.clone();
        tracing::debug!(%method, %url, "Sending flow API request");

        let response = self.transport.send(request).map_err(|e| {
            tracing::debug!(%method, %url, error = %e, "Flow API request failed");
            e
        })?;

        tracing::debug!(%method, %url, status = response.status, "Flow API response received");
        Ok(response)
    }
}

fn validate(config: &ClientConfig) -> Result<(), ClientError> {
    if config.api_key.is_empty() {
        return Err(ClientError::MissingCredential);
    }
    if config.api_server.is_empty() {
        return Err(ClientError::MissingServerAddress);
    }
    Ok(())
}

fn rejected(action: &'static str, response: HttpResponse) -> ClientError {
    ClientError::RemoteRejected {
        action,
        status: response.status_line(),
        body: response.body,
    }
}
