//! `reqwest` forwarder posting parameters to node endpoints.

use crate::registry::{
    domain::{KnownNode, TaskRegistration},
    ports::{ForwardReceipt, TaskForwardError, TaskForwarder},
};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Forwarder delivering execute requests over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTaskForwarder {
    client: reqwest::Client,
}

impl HttpTaskForwarder {
    /// Creates a forwarder whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error when the client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Returns the URL a registration is reachable at.
    #[must_use]
    pub fn endpoint_url(node: &KnownNode, registration: &TaskRegistration) -> String {
        format!(
            "{}{}",
            node.base_url(registration.port()),
            registration.endpoint()
        )
    }
}

#[async_trait]
impl TaskForwarder for HttpTaskForwarder {
    async fn forward(
        &self,
        node: &KnownNode,
        registration: &TaskRegistration,
        parameters: &Value,
    ) -> Result<ForwardReceipt, TaskForwardError> {
        let url = Self::endpoint_url(node, registration);
        debug!(%url, "forwarding execute request");
        let response = self
            .client
            .post(&url)
            .json(parameters)
            .send()
            .await
            .map_err(|err| TaskForwardError::Unreachable {
                node: node.name().to_owned(),
                reason: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TaskForwardError::Rejected {
                node: node.name().to_owned(),
                status: status.as_u16(),
            });
        }
        Ok(ForwardReceipt {
            status: status.as_u16(),
        })
    }
}
