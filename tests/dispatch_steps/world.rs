//! Shared world state for task dispatch BDD scenarios.

use std::sync::Arc;

use hivetasks::registry::{
    adapters::{
        forwarder::RecordingTaskForwarder,
        memory::{InMemoryNodeDirectory, InMemoryTaskRegistry},
    },
    services::{DispatchError, DispatchEvent, DispatchTicket, TaskDispatcher},
};
use mockable::DefaultClock;
use rstest::fixture;
use tokio::sync::broadcast;

/// Dispatcher type used by the BDD world.
pub type TestDispatcher =
    TaskDispatcher<InMemoryTaskRegistry, InMemoryNodeDirectory, RecordingTaskForwarder, DefaultClock>;

/// Scenario world for dispatch behaviour tests.
pub struct DispatchWorld {
    pub registry: Arc<InMemoryTaskRegistry>,
    pub forwarder: Arc<RecordingTaskForwarder>,
    pub dispatcher: TestDispatcher,
    pub events: broadcast::Receiver<DispatchEvent>,
    pub last_execute_result: Option<Result<DispatchTicket, DispatchError>>,
}

impl DispatchWorld {
    /// Creates a world around an empty in-memory coordinator.
    #[must_use]
    pub fn new() -> Self {
        let registry = Arc::new(InMemoryTaskRegistry::new());
        let forwarder = Arc::new(RecordingTaskForwarder::new());
        let dispatcher = TaskDispatcher::new(
            Arc::clone(&registry),
            Arc::new(InMemoryNodeDirectory::new()),
            Arc::clone(&forwarder),
            Arc::new(DefaultClock),
        );
        let events = dispatcher.subscribe();
        Self {
            registry,
            forwarder,
            dispatcher,
            events,
            last_execute_result: None,
        }
    }
}

impl Default for DispatchWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DispatchWorld {
    DispatchWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
