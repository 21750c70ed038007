//! Integration tests for list polling against the in-process dev server.
//!
//! These tests validate:
//! - Task and resource lists load through `ApiClient` with the committed filters
//! - Search narrows the list; the state filter is sent in upper case
//! - The poller picks up server-side changes on the next tick
//! - A failed fetch leaves the previously displayed list in place

use std::sync::Arc;
use std::time::Duration;

use gsdash::api::{ApiClient, Endpoints};
use gsdash::net::{self, ListQuery, NetCommand, NetConfig, NetEvent};
use gsdash::view::{ResourceListView, TaskListView};
use gsdash_devserver::server::{ServerState, start_server_with_state};
use gsdash_proto::{LockFilter, ResourceQuery, StateFilter, TaskQuery, TaskState};
use tokio::sync::mpsc;

/// Start a seeded dev server and return a client for it.
async fn seeded_server() -> (ApiClient, Arc<ServerState>) {
    let state = Arc::new(ServerState::new());
    state.store.seed_demo().await;
    let (addr, _handle) = start_server_with_state("127.0.0.1:0", Arc::clone(&state))
        .await
        .expect("failed to start dev server");
    let client = ApiClient::new(
        &format!("http://{addr}"),
        Endpoints::default(),
        Duration::from_secs(5),
    )
    .expect("client");
    (client, state)
}

async fn next_event(rx: &mut mpsc::Receiver<NetEvent>) -> NetEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timeout waiting for event")
        .expect("event channel closed")
}

#[tokio::test]
async fn task_list_loads_newest_first() {
    let (client, _state) = seeded_server().await;
    let mut view = TaskListView::new(TaskQuery::with_page_size(10));
    assert!(view.update(&client).await);

    let titles: Vec<&str> = view.items().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(
        titles,
        ["Queued ridge", "Broken pipeline", "Random forest depth", "SVC sweep"]
    );
    assert_eq!(view.total(), Some(4));
}

#[tokio::test]
async fn search_applies_committed_filters_only() {
    let (client, _state) = seeded_server().await;
    let mut view = TaskListView::new(TaskQuery::default());

    view.form.staged_mut().q = "ridge".into();
    // Not searched yet: the staged text is not sent.
    view.update(&client).await;
    assert_eq!(view.items().len(), 4);

    view.search();
    view.update(&client).await;
    assert_eq!(view.items().len(), 1);
    assert_eq!(view.items()[0].title, "Queued ridge");
}

#[tokio::test]
async fn state_filter_matches_server_labels() {
    let (client, _state) = seeded_server().await;
    let mut view = TaskListView::new(TaskQuery::default());
    view.form.staged_mut().state = StateFilter::Only(TaskState::Running);
    view.search();
    view.update(&client).await;

    assert_eq!(view.items().len(), 1);
    assert_eq!(view.items()[0].state, Some(TaskState::Running));
    assert!(view.items()[0].can_cancel());
}

#[tokio::test]
async fn pagination_walks_the_list() {
    let (client, _state) = seeded_server().await;
    let mut view = TaskListView::new(TaskQuery::with_page_size(3));
    view.update(&client).await;
    assert_eq!(view.items().len(), 3);

    assert!(view.form.next_page(view.total()).is_some());
    view.update(&client).await;
    assert_eq!(view.items().len(), 1);
    assert!(view.form.next_page(view.total()).is_none());
}

#[tokio::test]
async fn resource_lock_filter() {
    let (client, _state) = seeded_server().await;
    let mut view = ResourceListView::new(ResourceQuery::default());
    view.update(&client).await;
    assert_eq!(view.items().len(), 2);

    // Both demo resources are held by the running task.
    view.form.staged_mut().lock = LockFilter::Unlocked;
    view.search();
    view.update(&client).await;
    assert!(view.items().is_empty());
}

#[tokio::test]
async fn failed_fetch_keeps_displayed_list() {
    let (client, _state) = seeded_server().await;
    let mut view = TaskListView::new(TaskQuery::default());
    view.update(&client).await;
    let before = view.items().to_vec();

    let offline = ApiClient::new(
        "http://127.0.0.1:9",
        Endpoints::default(),
        Duration::from_secs(1),
    )
    .expect("client");
    assert!(!view.update(&offline).await);
    assert_eq!(view.items(), before.as_slice());
}

#[tokio::test]
async fn poller_sees_server_changes() {
    let (client, state) = seeded_server().await;
    let config = NetConfig {
        task_interval: Duration::from_millis(100),
        ..NetConfig::default()
    };
    let (tx, mut rx, _handle) = net::spawn_net(Arc::new(client), config);
    tx.send(NetCommand::Activate {
        generation: 1,
        query: ListQuery::Tasks(TaskQuery {
            state: StateFilter::Only(TaskState::Cancelled),
            ..TaskQuery::default()
        }),
    })
    .await
    .unwrap();

    let NetEvent::TasksLoaded { result, .. } = next_event(&mut rx).await else {
        panic!("expected a task list");
    };
    assert!(result.unwrap().tasks.is_empty());

    let running = state
        .store
        .list_tasks(&gsdash_devserver::store::TaskFilter {
            status: Some("RUNNING".into()),
            count: 10,
            ..Default::default()
        })
        .await;
    let id = running.tasks[0].task_id.clone();
    state.store.cancel_task(&id).await.unwrap();

    // Later ticks report the cancelled task.
    let mut seen = false;
    for _ in 0..20 {
        if let NetEvent::TasksLoaded { result: Ok(list), .. } = next_event(&mut rx).await
            && list.tasks.iter().any(|t| t.task_id == id)
        {
            seen = true;
            break;
        }
    }
    assert!(seen, "cancelled task never showed up");
    tx.send(NetCommand::Shutdown).await.unwrap();
}
