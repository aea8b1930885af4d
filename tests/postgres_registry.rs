//! `PostgreSQL` adapter tests.
//!
//! These need a live database, so they are ignored by default. Run them
//! with `cargo test --test postgres_registry -- --ignored` and
//! `HIVE_TEST_DATABASE_URL` pointing at a scratch database; an unset
//! variable fails the run instead of passing silently. Every test works on
//! uniquely named nodes, so a shared database can be reused between runs.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use hivetasks::descriptor::domain::TaskType;
use hivetasks::registry::{
    adapters::postgres::{
        CREATE_TABLES_SQL, PostgresNodeDirectory, PostgresTaskRegistry, RegistryPgPool,
    },
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

const DATABASE_URL_ENV: &str = "HIVE_TEST_DATABASE_URL";

#[fixture]
fn pool() -> RegistryPgPool {
    let url = std::env::var(DATABASE_URL_ENV)
        .unwrap_or_else(|_| panic!("{DATABASE_URL_ENV} must name a scratch PostgreSQL database"));
    let pool = Pool::builder()
        .max_size(4)
        .build(ConnectionManager::<PgConnection>::new(url))
        .expect("test database should accept connections");
    pool.get()
        .expect("connection should be available")
        .batch_execute(CREATE_TABLES_SQL)
        .expect("registry tables should be created");
    pool
}

fn unique_node() -> String {
    format!("node-{}", uuid::Uuid::new_v4().simple())
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
#[ignore = "needs HIVE_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn upsert_refreshes_existing_record(pool: RegistryPgPool) {
    let registry = PostgresTaskRegistry::new(pool);
    let node = unique_node();

    let first = registry
        .upsert(candidate(&node, "t1"))
        .await
        .expect("first insert should succeed");
    let mut stale = first.registration.clone();
    stale.mark(RegistrationState::Unreachable, &DefaultClock);
    registry.update(&stale).await.expect("update should succeed");

    let fresh = TaskRegistration::new(
        RegistrationKey::new(&node, "t1"),
        format!("/task/{node}/t1"),
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
    assert_eq!(second.registration.port(), 7000);
    assert_eq!(second.registration.task_type(), TaskType::Cron);
    assert_eq!(second.registration.state(), RegistrationState::Pending);
}

#[rstest]
#[ignore = "needs HIVE_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_upsert_yields_one_record(pool: RegistryPgPool) {
    let registry = Arc::new(PostgresTaskRegistry::new(pool));
    let node = unique_node();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&registry);
            let registration = candidate(&node, "t1");
            tokio::spawn(async move { store.upsert(registration).await })
        })
        .collect();
    let mut created = 0;
    for handle in handles {
        let outcome = handle
            .await
            .expect("task should join")
            .expect("insert should succeed");
        if outcome.created {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(
        registry
            .list_for_node(&node)
            .await
            .expect("listing should succeed")
            .len(),
        1
    );
}

#[rstest]
#[ignore = "needs HIVE_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn state_and_run_history_persist(pool: RegistryPgPool) {
    let registry = PostgresTaskRegistry::new(pool);
    let node = unique_node();
    let mut registration = registry
        .upsert(candidate(&node, "t1"))
        .await
        .expect("insert should succeed")
        .registration;

    registration.mark(RegistrationState::Dispatched, &DefaultClock);
    registry
        .update(&registration)
        .await
        .expect("update should succeed");
    registry
        .append_run_info(&TaskRunInfo::new(
            registration.id(),
            Some(json!({"outcome": "delivered"})),
            &DefaultClock,
        ))
        .await
        .expect("append should succeed");

    let stored = registry
        .find(registration.key())
        .await
        .expect("lookup should succeed")
        .expect("registration should exist");
    assert_eq!(stored.state(), RegistrationState::Dispatched);
    let history = registry
        .list_run_info(registration.id())
        .await
        .expect("history should load");
    assert_eq!(history.len(), 1);

    assert_eq!(
        registry
            .remove_for_node(&node)
            .await
            .expect("removal should succeed"),
        1
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
#[ignore = "needs HIVE_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn run_info_for_unknown_registration_is_not_found(pool: RegistryPgPool) {
    let registry = PostgresTaskRegistry::new(pool);

    let err = registry
        .append_run_info(&TaskRunInfo::new(RegistrationId::new(), None, &DefaultClock))
        .await
        .expect_err("append should fail");

    assert!(matches!(err, TaskRegistryError::NotFound(_)));
}

#[rstest]
#[ignore = "needs HIVE_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn directory_upsert_refreshes_node(pool: RegistryPgPool) {
    let directory = PostgresNodeDirectory::new(pool);
    let name = unique_node();
    let metadata = BTreeMap::from([("node.type".to_owned(), "tasknode".to_owned())]);
    let mut node = KnownNode::new(&name, "127.0.0.1", 9999, metadata, &DefaultClock);
    directory
        .upsert_node(&node)
        .await
        .expect("insert should succeed");

    node.refresh("10.0.0.5", 9000, node.metadata().clone(), &DefaultClock);
    directory
        .upsert_node(&node)
        .await
        .expect("update should succeed");

    let stored = directory
        .find_node(&name)
        .await
        .expect("lookup should succeed")
        .expect("node should exist");
    assert_eq!(stored.host(), "10.0.0.5");
    assert_eq!(stored.port(), 9000);
    assert!(
        directory
            .list_with_metadata("node.type", "tasknode")
            .await
            .expect("listing should succeed")
            .iter()
            .any(|listed| listed.name() == name)
    );
    assert!(directory.remove_node(&name).await.expect("removal should succeed"));
}
