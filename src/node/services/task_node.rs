//! The task node: validation, task creation, registration and shutdown.

use crate::descriptor::domain::{TaskConfig, TaskConfigDocument};
use crate::descriptor::validation::{ConfigError, ConfigWarning, ValidationReport};
use crate::node::{
    domain::{
        DEFAULT_NODE_HOST, NodeIdentity, RegistrationStatus, Task, TaskNodeError, TaskNodeState,
    },
    http::{EndpointTable, NodeHttpState, router},
    ports::{CoordinatorClient, TaskRunner},
};
use crate::protocol::{
    DeregisterNodePayload, NodeStatus, RegisterNodePayload, TASK_NODE_METADATA_KEY,
    TASK_NODE_METADATA_VALUE,
};
use crate::settings::{FeatureSet, TASKS_FEATURE};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Start-up options of a task node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNodeOptions {
    name: Option<String>,
    host: String,
    port: u16,
}

impl TaskNodeOptions {
    /// Creates options advertising `port` on the default host.
    #[must_use]
    pub fn new(port: u16) -> Self {
        Self {
            name: None,
            host: DEFAULT_NODE_HOST.to_owned(),
            port,
        }
    }

    /// Overrides the node name declared by the configuration.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the host advertised to the coordinator.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }
}

/// Task names split by the outcome of a batch of coordinator calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSummary {
    /// Tasks whose call succeeded, in call order.
    pub succeeded: Vec<String>,
    /// Tasks whose call failed, in call order.
    pub failed: Vec<String>,
}

impl CallSummary {
    fn record(&mut self, task: &str, ok: bool) {
        let bucket = if ok {
            &mut self.succeeded
        } else {
            &mut self.failed
        };
        bucket.push(task.to_owned());
    }
}

/// How [`TaskNode::run`] ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Validation failed; nothing was registered or served.
    Invalid(ValidationReport),
    /// The node served until shutdown.
    Completed {
        /// Outcome of the start-up registrations.
        registration: CallSummary,
        /// Outcome of the shutdown deregistrations.
        deregistration: CallSummary,
    },
}

/// Worker-side agent owning a set of tasks.
pub struct TaskNode<C, R>
where
    C: CoordinatorClient,
    R: TaskRunner,
{
    options: TaskNodeOptions,
    document: TaskConfigDocument,
    coordinator: Arc<C>,
    runner: Arc<R>,
    state: TaskNodeState,
    report: Option<ValidationReport>,
    config: Option<Arc<TaskConfig>>,
    tasks: Vec<Arc<Task>>,
    registrations: BTreeMap<String, RegistrationStatus>,
}

impl<C, R> TaskNode<C, R>
where
    C: CoordinatorClient,
    R: TaskRunner + 'static,
{
    /// Creates a node for a loaded configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`TaskNodeError::FeatureDisabled`] unless the tasks feature
    /// is enabled.
    pub fn new(
        options: TaskNodeOptions,
        document: TaskConfigDocument,
        features: &FeatureSet,
        coordinator: Arc<C>,
        runner: Arc<R>,
    ) -> Result<Self, TaskNodeError> {
        if !features.tasks_enabled() {
            return Err(TaskNodeError::FeatureDisabled {
                feature: TASKS_FEATURE,
            });
        }
        Ok(Self {
            options,
            document,
            coordinator,
            runner,
            state: TaskNodeState::Uninitialized,
            report: None,
            config: None,
            tasks: Vec::new(),
            registrations: BTreeMap::new(),
        })
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskNodeState {
        self.state
    }

    /// Returns `true` when the last validation found no error.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.report.as_ref().is_some_and(ValidationReport::is_valid)
    }

    /// Returns the errors of the last validation.
    #[must_use]
    pub fn errors(&self) -> &[ConfigError] {
        self.report
            .as_ref()
            .map(ValidationReport::errors)
            .unwrap_or_default()
    }

    /// Returns the warnings of the last validation.
    #[must_use]
    pub fn warnings(&self) -> &[ConfigWarning] {
        self.report
            .as_ref()
            .map(ValidationReport::warnings)
            .unwrap_or_default()
    }

    /// Returns the created tasks in configuration order.
    #[must_use]
    pub fn tasks(&self) -> &[Arc<Task>] {
        &self.tasks
    }

    /// Returns the outcome of the last registration attempt for `task`.
    #[must_use]
    pub fn registration_status(&self, task: &str) -> Option<&RegistrationStatus> {
        self.registrations.get(task)
    }

    /// Returns the port advertised for task endpoints.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.options.port
    }

    /// Returns the node name: the override when set, else the configured
    /// name once validation succeeded.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.options
            .name
            .as_deref()
            .or_else(|| self.config.as_deref().map(TaskConfig::name))
    }

    /// Returns the metadata announced with the node registration.
    #[must_use]
    pub fn metadata(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(
            TASK_NODE_METADATA_KEY.to_owned(),
            TASK_NODE_METADATA_VALUE.to_owned(),
        )])
    }

    fn transition(&mut self, target: TaskNodeState) -> Result<(), TaskNodeError> {
        if !self.state.can_transition_to(target) {
            return Err(TaskNodeError::InvalidTransition {
                from: self.state,
                to: target,
            });
        }
        self.state = target;
        Ok(())
    }

    /// Validates the configuration, replacing earlier diagnostics.
    ///
    /// Warnings are logged at `warn` and errors at `error`. The node ends in
    /// [`TaskNodeState::Valid`] or [`TaskNodeState::Invalid`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskNodeError::AlreadyRegistered`] once tasks have been
    /// announced to the coordinator, and
    /// [`TaskNodeError::InvalidTransition`] once the node is running or shut
    /// down. The node keeps its tasks in both cases, so [`Self::on_shutdown`]
    /// still deregisters them.
    pub fn verify_config(&mut self) -> Result<ValidationReport, TaskNodeError> {
        if !self.registrations.is_empty() {
            return Err(TaskNodeError::AlreadyRegistered {
                registered: self.registrations.len(),
            });
        }
        self.transition(TaskNodeState::Validating)?;
        self.report = None;
        self.config = None;
        self.tasks.clear();

        let report = self.document.validate();
        for warning in report.warnings() {
            warn!(%warning, "task configuration warning");
        }
        for err in report.errors() {
            error!(error = %err, "task configuration error");
        }

        self.config = report.config().cloned().map(Arc::new);
        let outcome = if report.is_valid() {
            TaskNodeState::Valid
        } else {
            error!(
                errors = report.errors().len(),
                "task configuration is invalid; start-up aborted"
            );
            TaskNodeState::Invalid
        };
        self.transition(outcome)?;
        self.report = Some(report.clone());
        Ok(report)
    }

    fn identity(&self) -> Result<NodeIdentity, TaskNodeError> {
        let name = self.name().ok_or(TaskNodeError::NotValid { state: self.state })?;
        NodeIdentity::new(name, self.options.host.clone(), self.options.port)
    }

    /// Builds one task per configured entry, in configuration order.
    ///
    /// Calling it again rebuilds the same set rather than adding to it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskNodeError::NotValid`] unless the node is in
    /// [`TaskNodeState::Valid`], or [`TaskNodeError::InvalidNodeName`] when
    /// the name override cannot be used in endpoint paths.
    pub fn create_tasks(&mut self) -> Result<&[Arc<Task>], TaskNodeError> {
        let config = match (&self.config, self.state) {
            (Some(config), TaskNodeState::Valid) => Arc::clone(config),
            _ => return Err(TaskNodeError::NotValid { state: self.state }),
        };
        let identity = self.identity()?;
        self.tasks = config
            .tasks()
            .iter()
            .map(|definition| {
                Arc::new(Task::new(
                    identity.clone(),
                    definition,
                    Arc::clone(&config),
                ))
            })
            .collect();
        Ok(&self.tasks)
    }

    /// Creates the tasks, exposes each in `endpoints` and registers it with
    /// the coordinator, one after another.
    ///
    /// A failed registration is logged and recorded; the task stays exposed
    /// locally and later tasks are still attempted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskNodeError::NotValid`] unless the node is in
    /// [`TaskNodeState::Valid`].
    pub async fn additional_registration(
        &mut self,
        endpoints: &mut EndpointTable,
    ) -> Result<CallSummary, TaskNodeError> {
        self.create_tasks()?;
        let mut summary = CallSummary::default();

        for task in &self.tasks {
            endpoints.insert(Arc::clone(task));
            let status = match self.coordinator.register_task(&task.to_registration()).await {
                Ok(ack) => {
                    info!(task = task.name(), endpoint = %task.endpoint(), "task registered");
                    RegistrationStatus::Registered(ack)
                }
                Err(err) => {
                    error!(task = task.name(), error = %err, "task registration failed");
                    RegistrationStatus::Failed(err.to_string())
                }
            };
            summary.record(task.name(), status.is_registered());
            self.registrations.insert(task.name().to_owned(), status);
        }
        Ok(summary)
    }

    async fn register_node(&self) -> Result<(), TaskNodeError> {
        let identity = self.identity()?;
        let payload = RegisterNodePayload {
            name: identity.name().to_owned(),
            host: Some(identity.host().to_owned()),
            port: identity.port(),
            metadata: self.metadata(),
            status: Some(NodeStatus::Online),
        };
        match self.coordinator.register_node(&payload).await {
            Ok(_) => info!(node = %identity, "node registered"),
            Err(err) => error!(node = %identity, error = %err, "node registration failed"),
        }
        Ok(())
    }

    /// Validates, registers, serves task endpoints on `listener` until
    /// `shutdown` resolves, then deregisters.
    ///
    /// The advertised port is taken from the listener. An invalid
    /// configuration short-circuits without registering or serving.
    ///
    /// # Errors
    ///
    /// Returns [`TaskNodeError`] when the lifecycle is in the wrong state or
    /// the server fails.
    pub async fn run<F>(
        &mut self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<RunOutcome, TaskNodeError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.options.port = listener.local_addr().map_err(TaskNodeError::Serve)?.port();

        let report = self.verify_config()?;
        if !report.is_valid() {
            return Ok(RunOutcome::Invalid(report));
        }

        self.register_node().await?;
        let mut endpoints = EndpointTable::new();
        let registration = self.additional_registration(&mut endpoints).await?;
        self.transition(TaskNodeState::Running)?;

        info!(
            port = self.options.port,
            tasks = endpoints.len(),
            "serving task endpoints"
        );
        let app = router(NodeHttpState::new(endpoints, Arc::clone(&self.runner)));
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        let deregistration = self.on_shutdown().await;
        served.map_err(TaskNodeError::Serve)?;
        Ok(RunOutcome::Completed {
            registration,
            deregistration,
        })
    }

    /// Deregisters every task, then the node itself.
    ///
    /// Best-effort: every task is attempted even when earlier calls fail.
    pub async fn on_shutdown(&mut self) -> CallSummary {
        let mut summary = CallSummary::default();
        for task in &self.tasks {
            let result = self
                .coordinator
                .deregister_task(&task.to_deregistration())
                .await;
            if let Err(err) = &result {
                warn!(task = task.name(), error = %err, "task deregistration failed");
            }
            summary.record(task.name(), result.is_ok());
        }

        if let Some(name) = self.name().map(ToOwned::to_owned) {
            let payload = DeregisterNodePayload::new(name.clone());
            if let Err(err) = self.coordinator.deregister_node(&payload).await {
                warn!(node = %name, error = %err, "node deregistration failed");
            }
        }

        if self.state.can_transition_to(TaskNodeState::Shutdown) {
            self.state = TaskNodeState::Shutdown;
        }
        info!(
            deregistered = summary.succeeded.len(),
            failed = summary.failed.len(),
            "task node shut down"
        );
        summary
    }
}
