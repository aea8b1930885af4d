//! Tests for the in-memory registry adapters.

use crate::descriptor::domain::TaskType;
use crate::registry::{
    adapters::memory::{InMemoryNodeDirectory, InMemoryTaskRegistry},
    domain::{
        KnownNode, RegistrationId, RegistrationKey, RegistrationState, TaskRegistration,
        TaskRunInfo,
    },
    ports::{NodeDirectory, TaskRegistryError, TaskRegistryRepository},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

#[fixture]
fn registry() -> InMemoryTaskRegistry {
    InMemoryTaskRegistry::new()
}

fn candidate(node: &str, task: &str) -> TaskRegistration {
    TaskRegistration::new(
        RegistrationKey::new(node, task),
        format!("/task/{node}/{task}"),
        TaskType::Request,
        9999,
        &DefaultClock,
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upsert_refreshes_an_existing_record(registry: InMemoryTaskRegistry) {
    let first = registry
        .upsert(candidate("n", "t1"))
        .await
        .expect("first insert should succeed");
    let mut stale = first.registration.clone();
    stale.mark(RegistrationState::Unreachable, &DefaultClock);
    registry.update(&stale).await.expect("update should succeed");

    let fresh = TaskRegistration::new(
        RegistrationKey::new("n", "t1"),
        "/task/n/t1",
        TaskType::Cron,
        7000,
        &DefaultClock,
    );
    let second = registry
        .upsert(fresh)
        .await
        .expect("second insert should succeed");

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.registration.id(), second.registration.id());
    assert_eq!(second.registration.created_at(), first.registration.created_at());
    assert_eq!(second.registration.port(), 7000);
    assert_eq!(second.registration.task_type(), TaskType::Cron);
    assert_eq!(second.registration.state(), RegistrationState::Pending);
    assert_eq!(registry.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_upsert_yields_one_record(registry: InMemoryTaskRegistry) {
    let shared = Arc::new(registry);
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = Arc::clone(&shared);
            tokio::spawn(async move { store.upsert(candidate("n", "t1")).await })
        })
        .collect();

    let mut created = 0;
    let mut ids = Vec::new();
    for handle in handles {
        let outcome = handle
            .await
            .expect("task should join")
            .expect("insert should succeed");
        if outcome.created {
            created += 1;
        }
        ids.push(outcome.registration.id());
    }

    assert_eq!(created, 1);
    assert_eq!(shared.len(), 1);
    assert!(ids.iter().all(|id| Some(id) == ids.first()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remove_for_node_only_touches_that_node(registry: InMemoryTaskRegistry) {
    for (node, task) in [("n", "t1"), ("n", "t2"), ("m", "t1")] {
        registry
            .upsert(candidate(node, task))
            .await
            .expect("insert should succeed");
    }

    let removed = registry
        .remove_for_node("n")
        .await
        .expect("removal should succeed");

    assert_eq!(removed, 2);
    let remaining = registry
        .list_for_node("m")
        .await
        .expect("listing should succeed");
    assert_eq!(remaining.len(), 1);
    assert!(
        registry
            .list_for_node("n")
            .await
            .expect("listing should succeed")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_for_node_is_ordered_by_name(registry: InMemoryTaskRegistry) {
    for task in ["zeta", "alpha", "mid"] {
        registry
            .upsert(candidate("n", task))
            .await
            .expect("insert should succeed");
    }

    let names: Vec<String> = registry
        .list_for_node("n")
        .await
        .expect("listing should succeed")
        .iter()
        .map(|registration| registration.name().to_owned())
        .collect();

    assert_eq!(names, ["alpha", "mid", "zeta"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_persists_state_changes(registry: InMemoryTaskRegistry) {
    let mut registration = registry
        .upsert(candidate("n", "t1"))
        .await
        .expect("insert should succeed")
        .registration;
    registration.mark(RegistrationState::Unreachable, &DefaultClock);

    registry
        .update(&registration)
        .await
        .expect("update should succeed");

    let stored = registry
        .find(registration.key())
        .await
        .expect("lookup should succeed")
        .expect("registration should exist");
    assert_eq!(stored.state(), RegistrationState::Unreachable);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_removed_registration_is_not_found(registry: InMemoryTaskRegistry) {
    let registration = candidate("n", "t1");

    let err = registry
        .update(&registration)
        .await
        .expect_err("update should fail");

    assert!(matches!(err, TaskRegistryError::NotFound(id) if id == registration.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn run_info_is_appended_in_order_and_removed_with_registration(
    registry: InMemoryTaskRegistry,
) {
    let registration = registry
        .upsert(candidate("n", "t1"))
        .await
        .expect("insert should succeed")
        .registration;
    for attempt in 0..3 {
        registry
            .append_run_info(&TaskRunInfo::new(
                registration.id(),
                Some(json!({"attempt": attempt})),
                &DefaultClock,
            ))
            .await
            .expect("append should succeed");
    }

    let history = registry
        .list_run_info(registration.id())
        .await
        .expect("history should load");
    assert_eq!(history.len(), 3);
    assert_eq!(
        history.first().and_then(TaskRunInfo::info),
        Some(&json!({"attempt": 0}))
    );

    assert!(
        registry
            .remove(registration.key())
            .await
            .expect("removal should succeed")
    );
    assert!(
        registry
            .list_run_info(registration.id())
            .await
            .expect("history should load")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn run_info_for_unknown_registration_is_rejected(registry: InMemoryTaskRegistry) {
    let orphan = TaskRunInfo::new(RegistrationId::new(), None, &DefaultClock);

    let err = registry
        .append_run_info(&orphan)
        .await
        .expect_err("append should fail");

    assert!(matches!(err, TaskRegistryError::NotFound(_)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn run_info_after_removal_is_rejected_without_leftovers(registry: InMemoryTaskRegistry) {
    let registration = registry
        .upsert(candidate("n", "t1"))
        .await
        .expect("insert should succeed")
        .registration;
    assert!(
        registry
            .remove(registration.key())
            .await
            .expect("removal should succeed")
    );

    let err = registry
        .append_run_info(&TaskRunInfo::new(registration.id(), None, &DefaultClock))
        .await
        .expect_err("append should fail");

    assert!(matches!(err, TaskRegistryError::NotFound(id) if id == registration.id()));
    assert!(
        registry
            .list_run_info(registration.id())
            .await
            .expect("history should load")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_appends_and_removal_leave_no_orphans(registry: InMemoryTaskRegistry) {
    let shared = Arc::new(registry);
    let registration = shared
        .upsert(candidate("n", "t1"))
        .await
        .expect("insert should succeed")
        .registration;

    let appends: Vec<_> = (0..16)
        .map(|_| {
            let store = Arc::clone(&shared);
            let id = registration.id();
            tokio::spawn(async move {
                store
                    .append_run_info(&TaskRunInfo::new(id, None, &DefaultClock))
                    .await
                    .is_ok()
            })
        })
        .collect();
    shared
        .remove(registration.key())
        .await
        .expect("removal should succeed");
    for handle in appends {
        handle.await.expect("task should join");
    }

    assert!(shared.is_empty());
    assert!(
        shared
            .list_run_info(registration.id())
            .await
            .expect("history should load")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn directory_filters_on_metadata() {
    let directory = InMemoryNodeDirectory::new();
    let tagged = BTreeMap::from([("node.type".to_owned(), "tasknode".to_owned())]);
    for (name, metadata) in [("b", tagged.clone()), ("a", tagged), ("c", BTreeMap::new())] {
        directory
            .upsert_node(&KnownNode::new(name, "127.0.0.1", 1, metadata, &DefaultClock))
            .await
            .expect("upsert should succeed");
    }

    let names: Vec<String> = directory
        .list_with_metadata("node.type", "tasknode")
        .await
        .expect("listing should succeed")
        .iter()
        .map(|node| node.name().to_owned())
        .collect();

    assert_eq!(names, ["a", "b"]);
    assert!(directory.remove_node("c").await.expect("removal should succeed"));
    assert!(!directory.remove_node("c").await.expect("removal should succeed"));
}
