//! `reqwest` client for the coordinator's HTTP endpoints.

use crate::node::ports::{CoordinatorClient, CoordinatorClientError, CoordinatorClientResult};
use crate::protocol::{
    Ack, DeregisterNodePayload, DeregisterTaskPayload, ErrorBody, REGISTER_NODE_PATH,
    REGISTER_TASK_PATH, RegisterNodePayload, RegisterTaskPayload, RegistrationAck,
};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

/// Coordinator client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCoordinatorClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCoordinatorClient {
    /// Creates a client for the coordinator at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorClientError::Transport`] when the HTTP client
    /// cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> CoordinatorClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CoordinatorClientError::transport)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    /// Returns the coordinator base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> CoordinatorClientResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "posting to coordinator");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(CoordinatorClientError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(err) => err.to_string(),
            };
            return Err(CoordinatorClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| CoordinatorClientError::Decode(err.to_string()))
    }
}

#[async_trait]
impl CoordinatorClient for HttpCoordinatorClient {
    async fn register_node(&self, payload: &RegisterNodePayload) -> CoordinatorClientResult<Ack> {
        self.post(REGISTER_NODE_PATH, payload).await
    }

    async fn deregister_node(
        &self,
        payload: &DeregisterNodePayload,
    ) -> CoordinatorClientResult<Ack> {
        self.post(REGISTER_NODE_PATH, payload).await
    }

    async fn register_task(
        &self,
        payload: &RegisterTaskPayload,
    ) -> CoordinatorClientResult<RegistrationAck> {
        self.post(REGISTER_TASK_PATH, payload).await
    }

    async fn deregister_task(
        &self,
        payload: &DeregisterTaskPayload,
    ) -> CoordinatorClientResult<Ack> {
        self.post(REGISTER_TASK_PATH, payload).await
    }
}
