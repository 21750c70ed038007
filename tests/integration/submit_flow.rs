//! Integration tests for the write actions against the in-process dev server.
//!
//! These tests validate:
//! - A task script is read from disk and posted with its resource mapping
//! - Validation failures come back as one notice line per field
//! - Resource uploads, including the empty-file rejection
//! - Cancel succeeds once, then reports the server's refusal
//! - Legacy endpoint paths reach the same handlers

use std::sync::Arc;
use std::time::Duration;

use gsdash::api::{ApiClient, Endpoints};
use gsdash::notice::Notice;
use gsdash::view::submit::{submit_resource, submit_task};
use gsdash::view::tasks::cancel;
use gsdash::view::{ResourceBinding, ResourceSubmission, TaskSubmission};
use gsdash_devserver::server::{ServerState, start_server_with_state};
use gsdash_devserver::store::{ResourceFilter, TaskFilter};
use gsdash_proto::TaskState;

const VALID_SCRIPT: &str = "from sklearn.linear_model import Ridge\n\
Estimator = Ridge\n\
X = resources['data']\n\
y = resources['target']\n\
param_grid = {'alpha': [0.1, 1.0]}\n";

async fn start(endpoints: Endpoints) -> (ApiClient, Arc<ServerState>) {
    let state = Arc::new(ServerState::new());
    let (addr, _handle) = start_server_with_state("127.0.0.1:0", Arc::clone(&state))
        .await
        .expect("failed to start dev server");
    let client = ApiClient::new(&format!("http://{addr}"), endpoints, Duration::from_secs(5))
        .expect("client");
    (client, state)
}

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write temp file");
    path.display().to_string()
}

fn all_tasks() -> TaskFilter {
    TaskFilter {
        count: 100,
        ..TaskFilter::default()
    }
}

async fn upload_resource(client: &ApiClient, dir: &tempfile::TempDir, title: &str) -> Notice {
    let form = ResourceSubmission {
        title: title.to_string(),
        file: write_file(dir, title, "1,2,3\n"),
    };
    submit_resource(client, &form).await
}

#[tokio::test]
async fn add_resource_then_task_with_alias_mapping() {
    let (client, state) = start(Endpoints::default()).await;
    let dir = tempfile::tempdir().unwrap();

    assert_eq!(
        upload_resource(&client, &dir, "data.csv").await,
        Notice::success("Resource added!")
    );
    assert_eq!(
        upload_resource(&client, &dir, "target.csv").await,
        Notice::success("Resource added!")
    );
    let resources = state
        .store
        .list_resources(&ResourceFilter {
            count: 10,
            ..ResourceFilter::default()
        })
        .await
        .resources;
    let id_of = |name: &str| {
        resources
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.resource_id.clone())
            .unwrap()
    };

    let form = TaskSubmission {
        title: "ridge sweep".into(),
        file: write_file(&dir, "task.py", VALID_SCRIPT),
        resources: vec![
            ResourceBinding::new(id_of("data.csv"), "data"),
            // Blank alias: mapped under the id itself.
            ResourceBinding::new(id_of("target.csv"), ""),
        ],
    };
    assert_eq!(submit_task(&client, &form).await, Notice::success("Task added!"));

    let tasks = state.store.list_tasks(&all_tasks()).await.tasks;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "ridge sweep");
    assert_eq!(tasks[0].state, Some(TaskState::Pending));

    // Both resources are now held by the pending task.
    let locked = state
        .store
        .list_resources(&ResourceFilter {
            is_locked: Some(true),
            count: 10,
            ..ResourceFilter::default()
        })
        .await;
    assert_eq!(locked.resources.len(), 2);
}

#[tokio::test]
async fn invalid_script_lists_every_field() {
    let (client, state) = start(Endpoints::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let form = TaskSubmission {
        file: write_file(&dir, "task.py", "Estimator = object\n"),
        ..TaskSubmission::default()
    };

    let notice = submit_task(&client, &form).await;
    assert!(notice.is_failure());
    let lines: Vec<&str> = notice.text.lines().collect();
    assert_eq!(lines[0], "Adding task failed");
    for field in ["X", "y", "param_grid"] {
        assert!(
            lines.contains(&format!("{field}: There is no {field} in script").as_str()),
            "missing {field} in {lines:?}"
        );
    }
    assert!(!notice.text.contains("Estimator:"));
    assert!(state.store.list_tasks(&all_tasks()).await.tasks.is_empty());
}

#[tokio::test]
async fn unknown_resource_is_a_text_error() {
    let (client, _state) = start(Endpoints::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let form = TaskSubmission {
        file: write_file(&dir, "task.py", VALID_SCRIPT),
        resources: vec![ResourceBinding::new("missing-id", "data")],
        ..TaskSubmission::default()
    };
    let notice = submit_task(&client, &form).await;
    assert_eq!(
        notice,
        Notice::failure("Adding task failed\nResource missing-id not found")
    );
}

#[tokio::test]
async fn empty_resource_file_is_rejected() {
    let (client, _state) = start(Endpoints::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let form = ResourceSubmission {
        file: write_file(&dir, "empty.csv", ""),
        ..ResourceSubmission::default()
    };
    let notice = submit_resource(&client, &form).await;
    assert_eq!(
        notice,
        Notice::failure("Adding resource failed\nfile: File is empty")
    );
}

#[tokio::test]
async fn cancel_once_then_refused() {
    let (client, state) = start(Endpoints::default()).await;
    state.store.seed_demo().await;
    let running = state
        .store
        .list_tasks(&TaskFilter {
            status: Some("running".into()),
            count: 10,
            ..TaskFilter::default()
        })
        .await
        .tasks;
    let id = running[0].task_id.clone();

    assert_eq!(cancel(&client, &id).await, Notice::success("Task cancelled!"));

    let again = cancel(&client, &id).await;
    assert_eq!(
        again,
        Notice::failure("Error\nCannot cancel task with CANCELED state")
    );

    let unknown = cancel(&client, "no-such-task").await;
    assert!(unknown.is_failure());
    assert!(unknown.text.starts_with("Error\n"));
}

#[tokio::test]
async fn legacy_endpoints_work() {
    let (client, state) = start(Endpoints::legacy()).await;
    let dir = tempfile::tempdir().unwrap();
    let form = TaskSubmission {
        file: write_file(&dir, "task.py", VALID_SCRIPT),
        ..TaskSubmission::default()
    };
    assert_eq!(submit_task(&client, &form).await, Notice::success("Task added!"));
    assert_eq!(state.store.list_tasks(&all_tasks()).await.tasks.len(), 1);

    let mut view = gsdash::view::TaskListView::new(gsdash_proto::TaskQuery::default());
    assert!(view.update(&client).await);
    assert_eq!(view.items()[0].title, "Custom task");
}
