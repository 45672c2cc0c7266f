//! Module for the delivery of notification requests to the messaging API.

use std::time::Duration;

use reqwest::{blocking::Client, header::CONTENT_TYPE};
use tracing::debug;

use crate::{Error, error::dispatch_error, payload::NotificationRequest};

const API_KEY_HEADER: &str = "x-api-key";

/// Answer of the messaging API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResponse {
    pub status: u16,
    pub body: String,
}

impl DispatchResponse {
    /// The messaging API acknowledges an accepted request with exactly 200.
    pub fn is_delivered(&self) -> bool {
        self.status == 200
    }
}

/// Sends notification requests. A request is sent once; errors are transport failures only,
/// a rejection by the API is an `Ok` response with its status.
pub trait Dispatcher {
    fn dispatch(&self, request: &NotificationRequest) -> Result<DispatchResponse, Error>;
}

/// Location and credentials of the messaging API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

/// [`Dispatcher`] posting JSON over HTTP.
pub struct HttpDispatcher {
    http_client: Client,
    url: String,
    api_key: String,
}

impl HttpDispatcher {
    pub fn new(endpoint: &Endpoint) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(endpoint.timeout)
            .build()
            .map_err(|e| Error::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            url: endpoint.url.clone(),
            api_key: endpoint.api_key.clone(),
        })
    }
}

impl Dispatcher for HttpDispatcher {
    fn dispatch(&self, request: &NotificationRequest) -> Result<DispatchResponse, Error> {
        let customer_id = request.customer_id();
        debug!(
            %customer_id,
            correlation_id = %request.correlation_id,
            "Sending notification request"
        );

        let response = self
            .http_client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .map_err(|e| dispatch_error(customer_id, e))?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| dispatch_error(customer_id, e))?;

        Ok(DispatchResponse { status, body })
    }
}
