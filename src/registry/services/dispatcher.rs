//! Registration bookkeeping and execute-request dispatch.

use super::events::{DispatchEvent, DispatchOutcome, DispatchTicket, RunRecord};
use crate::protocol::{
    Ack, DeregisterNodePayload, DeregisterTaskPayload, ExecuteTaskRequest, PayloadError,
    RegisterNodePayload, RegisterTaskPayload, RegistrationAck, TASK_NODE_METADATA_KEY,
    TASK_NODE_METADATA_VALUE, parse_payload, termination_requested,
};
use crate::node::domain::DEFAULT_NODE_HOST;
use crate::registry::{
    domain::{KnownNode, RegistrationKey, RegistrationState, TaskRegistration, TaskRunInfo},
    ports::{
        NodeDirectory, NodeDirectoryError, TaskForwarder, TaskRegistryError,
        TaskRegistryRepository,
    },
};
use mockable::Clock;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Number of dispatch events buffered per subscriber.
pub const DISPATCH_EVENT_CAPACITY: usize = 64;

/// Errors returned by [`TaskDispatcher`].
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The inbound payload was rejected before any lookup.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// The payload names a node the coordinator does not know.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No registration exists for the requested node and task.
    #[error("no task {task} registered for node {node}")]
    TargetNotFound {
        /// Requested node.
        node: String,
        /// Requested task.
        task: String,
    },

    /// Registration storage failed.
    #[error(transparent)]
    Registry(#[from] TaskRegistryError),

    /// Node directory storage failed.
    #[error(transparent)]
    Directory(#[from] NodeDirectoryError),
}

impl DispatchError {
    /// Returns `true` when the error names an unknown node or task.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound(_) | Self::TargetNotFound { .. })
    }
}

/// Result type for dispatcher operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// A task node together with its registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeTasks {
    /// The node.
    pub node: KnownNode,
    /// Its registrations ordered by task name.
    pub tasks: Vec<TaskRegistration>,
}

/// Coordinator service owning the registry and the dispatch path.
pub struct TaskDispatcher<R, D, F, C>
where
    R: TaskRegistryRepository + 'static,
    D: NodeDirectory + 'static,
    F: TaskForwarder + 'static,
    C: Clock + Send + Sync + 'static,
{
    registry: Arc<R>,
    directory: Arc<D>,
    forwarder: Arc<F>,
    clock: Arc<C>,
    events: broadcast::Sender<DispatchEvent>,
}

impl<R, D, F, C> TaskDispatcher<R, D, F, C>
where
    R: TaskRegistryRepository + 'static,
    D: NodeDirectory + 'static,
    F: TaskForwarder + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a dispatcher over the given ports.
    #[must_use]
    pub fn new(registry: Arc<R>, directory: Arc<D>, forwarder: Arc<F>, clock: Arc<C>) -> Self {
        let (events, _) = broadcast::channel(DISPATCH_EVENT_CAPACITY);
        Self {
            registry,
            directory,
            forwarder,
            clock,
            events,
        }
    }

    /// Subscribes to the outcomes of future dispatches.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DispatchEvent> {
        self.events.subscribe()
    }

    /// Handles a `POST /register/task` body.
    ///
    /// A body whose `status` is the termination marker deregisters the
    /// task instead.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Payload`] for malformed bodies,
    /// [`DispatchError::NodeNotFound`] for unknown nodes, and storage
    /// errors from the registry or directory.
    pub async fn handle_task_registration(&self, body: &Value) -> DispatchResult<RegistrationAck> {
        if termination_requested(body) {
            let payload: DeregisterTaskPayload = parse_payload(
                body,
                &DeregisterTaskPayload::REQUIRED_FIELDS,
                DeregisterTaskPayload::CONTEXT,
            )?;
            self.deregister_task(&payload).await?;
            return Ok(RegistrationAck::ok());
        }

        let payload: RegisterTaskPayload = parse_payload(
            body,
            &RegisterTaskPayload::REQUIRED_FIELDS,
            RegisterTaskPayload::CONTEXT,
        )?;
        self.register_task(&payload).await?;
        Ok(RegistrationAck::ok())
    }

    /// Records a task registration.
    ///
    /// Registering a known task again refreshes its endpoint, type and port
    /// and resets its state to pending.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NodeNotFound`] when the node never
    /// registered, or a storage error.
    pub async fn register_task(
        &self,
        payload: &RegisterTaskPayload,
    ) -> DispatchResult<TaskRegistration> {
        self.require_node(&payload.node).await?;
        let candidate = TaskRegistration::new(
            RegistrationKey::new(&payload.node, &payload.name),
            &payload.endpoint,
            payload.task_type,
            payload.port,
            &*self.clock,
        );
        let outcome = self.registry.upsert(candidate).await?;
        if outcome.created {
            info!(
                node = %payload.node,
                task = %payload.name,
                endpoint = %payload.endpoint,
                "task registered"
            );
        } else {
            info!(
                node = %payload.node,
                task = %payload.name,
                port = payload.port,
                "task registration refreshed"
            );
        }
        Ok(outcome.registration)
    }

    /// Removes a task registration; unknown tasks are a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NodeNotFound`] when the node is unknown,
    /// or a storage error.
    pub async fn deregister_task(&self, payload: &DeregisterTaskPayload) -> DispatchResult<()> {
        self.require_node(&payload.node).await?;
        let key = RegistrationKey::new(&payload.node, &payload.name);
        if self.registry.remove(&key).await? {
            info!(task = %key, "task deregistered");
        } else {
            debug!(task = %key, "deregistration for unknown task ignored");
        }
        Ok(())
    }

    /// Handles a `POST /register/node` body.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Payload`] for malformed bodies or a
    /// storage error.
    pub async fn handle_node_registration(&self, body: &Value) -> DispatchResult<Ack> {
        if termination_requested(body) {
            let payload: DeregisterNodePayload = parse_payload(
                body,
                &DeregisterNodePayload::REQUIRED_FIELDS,
                DeregisterNodePayload::CONTEXT,
            )?;
            self.deregister_node(&payload.name).await?;
            return Ok(Ack::ok());
        }

        let payload: RegisterNodePayload = parse_payload(
            body,
            &RegisterNodePayload::REQUIRED_FIELDS,
            RegisterNodePayload::CONTEXT,
        )?;
        self.register_node(payload).await?;
        Ok(Ack::ok())
    }

    /// Adds or refreshes a known node.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the directory.
    pub async fn register_node(&self, payload: RegisterNodePayload) -> DispatchResult<KnownNode> {
        let host = payload
            .host
            .unwrap_or_else(|| DEFAULT_NODE_HOST.to_owned());
        let mut node = self
            .directory
            .find_node(&payload.name)
            .await?
            .unwrap_or_else(|| {
                KnownNode::new(
                    payload.name,
                    host.clone(),
                    payload.port,
                    BTreeMap::new(),
                    &*self.clock,
                )
            });
        node.refresh(host, payload.port, payload.metadata, &*self.clock);
        self.directory.upsert_node(&node).await?;
        info!(node = %node.name(), host = %node.host(), port = node.port(), "node registered");
        Ok(node)
    }

    /// Forgets a node together with all of its registrations.
    ///
    /// Returns the number of registrations removed. Unknown nodes are a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn deregister_node(&self, name: &str) -> DispatchResult<usize> {
        if !self.directory.remove_node(name).await? {
            debug!(node = %name, "deregistration for unknown node ignored");
            return Ok(0);
        }
        let removed = self.registry.remove_for_node(name).await?;
        info!(node = %name, removed, "node deregistered");
        Ok(removed)
    }

    /// Handles a `POST /tasks/execute` body.
    ///
    /// # Errors
    ///
    /// See [`Self::dispatch`]; malformed bodies fail with
    /// [`DispatchError::Payload`] before any lookup.
    pub async fn execute_task(&self, body: &Value) -> DispatchResult<DispatchTicket> {
        let request: ExecuteTaskRequest = parse_payload(
            body,
            &ExecuteTaskRequest::REQUIRED_FIELDS,
            ExecuteTaskRequest::CONTEXT,
        )?;
        self.dispatch(request).await
    }

    /// Resolves the target and hands delivery to a background task.
    ///
    /// The ticket is returned before the node is contacted. The delivery
    /// outcome is appended to the registration's run history and then
    /// published to [`Self::subscribe`] receivers.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::TargetNotFound`] when the node or the
    /// registration is unknown, or a storage error.
    pub async fn dispatch(&self, request: ExecuteTaskRequest) -> DispatchResult<DispatchTicket> {
        let target_not_found = || DispatchError::TargetNotFound {
            node: request.node.clone(),
            task: request.name.clone(),
        };
        let node = self
            .directory
            .find_node(&request.node)
            .await?
            .ok_or_else(target_not_found)?;
        let registration = self
            .registry
            .find(&RegistrationKey::new(&request.node, &request.name))
            .await?
            .ok_or_else(target_not_found)?;

        let dispatch_id = Uuid::new_v4();
        info!(%dispatch_id, node = %request.node, task = %request.name, "dispatching task");
        let delivery = Delivery {
            registry: Arc::clone(&self.registry),
            forwarder: Arc::clone(&self.forwarder),
            clock: Arc::clone(&self.clock),
            events: self.events.clone(),
        };
        tokio::spawn(delivery.run(dispatch_id, node, registration, request.parameters));
        Ok(DispatchTicket { dispatch_id })
    }

    /// Lists every task node with its registrations.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn list_node_tasks(&self) -> DispatchResult<Vec<NodeTasks>> {
        let nodes = self
            .directory
            .list_with_metadata(TASK_NODE_METADATA_KEY, TASK_NODE_METADATA_VALUE)
            .await?;
        let mut listing = Vec::with_capacity(nodes.len());
        for node in nodes {
            let tasks = self.registry.list_for_node(node.name()).await?;
            listing.push(NodeTasks { node, tasks });
        }
        Ok(listing)
    }

    /// Returns the run history of one registration, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::TargetNotFound`] when nothing is registered
    /// under `node` and `task`, or a storage error.
    pub async fn run_history(&self, node: &str, task: &str) -> DispatchResult<Vec<TaskRunInfo>> {
        let registration = self
            .registry
            .find(&RegistrationKey::new(node, task))
            .await?
            .ok_or_else(|| DispatchError::TargetNotFound {
                node: node.to_owned(),
                task: task.to_owned(),
            })?;
        Ok(self.registry.list_run_info(registration.id()).await?)
    }

    async fn require_node(&self, name: &str) -> DispatchResult<KnownNode> {
        self.directory
            .find_node(name)
            .await?
            .ok_or_else(|| DispatchError::NodeNotFound(name.to_owned()))
    }
}

struct Delivery<R, F, C> {
    registry: Arc<R>,
    forwarder: Arc<F>,
    clock: Arc<C>,
    events: broadcast::Sender<DispatchEvent>,
}

impl<R, F, C> Delivery<R, F, C>
where
    R: TaskRegistryRepository,
    F: TaskForwarder,
    C: Clock + Send + Sync,
{
    async fn run(
        self,
        dispatch_id: Uuid,
        node: KnownNode,
        mut registration: TaskRegistration,
        parameters: Value,
    ) {
        let (outcome, state) = match self
            .forwarder
            .forward(&node, &registration, &parameters)
            .await
        {
            Ok(receipt) => {
                debug!(%dispatch_id, status = receipt.status, "task delivered");
                (
                    DispatchOutcome::Delivered {
                        status: receipt.status,
                    },
                    RegistrationState::Dispatched,
                )
            }
            Err(err) => {
                error!(%dispatch_id, task = %registration.key(), error = %err, "task delivery failed");
                (
                    DispatchOutcome::DeliveryFailed {
                        reason: err.to_string(),
                    },
                    RegistrationState::Unreachable,
                )
            }
        };

        let record = RunRecord {
            dispatch_id,
            parameters,
            outcome: outcome.clone(),
        };
        let run_info = TaskRunInfo::new(
            registration.id(),
            serde_json::to_value(&record).ok(),
            &*self.clock,
        );
        if let Err(err) = self.registry.append_run_info(&run_info).await {
            warn!(%dispatch_id, error = %err, "run info not recorded");
        }
        registration.mark(state, &*self.clock);
        if let Err(err) = self.registry.update(&registration).await {
            warn!(%dispatch_id, error = %err, "registration state not updated");
        }

        let event = DispatchEvent {
            dispatch_id,
            node: registration.node().to_owned(),
            task: registration.name().to_owned(),
            outcome,
        };
        if self.events.send(event).is_err() {
            debug!(%dispatch_id, "no dispatch subscribers");
        }
    }
}
