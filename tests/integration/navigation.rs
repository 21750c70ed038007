//! Integration tests for the navigation shell wired to the net layer.
//!
//! These tests validate:
//! - Navigating between routes activates the matching poller
//! - Results tagged with a superseded generation never reach the screen
//! - Unknown paths land on the task list
//! - Key-driven search and cancel flow through to the dev server

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gsdash::api::{ApiClient, Endpoints};
use gsdash::app::{App, Focus};
use gsdash::net::{self, NetCommand, NetConfig, NetEvent};
use gsdash::notice::Notice;
use gsdash::route::Route;
use gsdash_devserver::server::{ServerState, start_server_with_state};
use gsdash_proto::{ResourceList, ResourceRecord, TaskList, TaskRecord, TaskState};
use tokio::sync::mpsc;

struct Harness {
    app: App,
    cmd_tx: mpsc::Sender<NetCommand>,
    evt_rx: mpsc::Receiver<NetEvent>,
}

impl Harness {
    async fn start() -> Self {
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
        let (cmd_tx, evt_rx, _net) = net::spawn_net(Arc::new(client), NetConfig::default());
        Self {
            app: App::new(10),
            cmd_tx,
            evt_rx,
        }
    }

    async fn send(&self, cmd: NetCommand) {
        self.cmd_tx.send(cmd).await.expect("net task gone");
    }

    async fn navigate(&mut self, path: &str) {
        let cmd = self.app.navigate(path);
        self.send(cmd).await;
    }

    async fn press(&mut self, code: KeyCode) {
        if let Some(cmd) = self.app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE)) {
            self.send(cmd).await;
        }
    }

    /// Apply events until `done` holds for the app.
    async fn pump_until(&mut self, done: impl Fn(&App) -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !done(&self.app) {
                let event = self.evt_rx.recv().await.expect("event channel closed");
                self.app.apply_net_event(event);
            }
        })
        .await
        .expect("timeout waiting for app state");
    }
}

#[tokio::test]
async fn switching_routes_polls_the_new_list() {
    let mut h = Harness::start().await;

    h.navigate("/tasks").await;
    h.pump_until(|app| app.tasks.items().len() == 4).await;
    assert_eq!(h.app.route(), Route::Tasks);
    assert!(h.app.resources.items().is_empty());

    h.press(KeyCode::Tab).await;
    assert_eq!(h.app.route(), Route::Resources);
    assert_eq!(h.app.current_path(), "/resources");
    h.pump_until(|app| app.resources.items().len() == 2).await;

    // Going back keeps the task list on screen until the next poll lands.
    h.press(KeyCode::Char('1')).await;
    assert_eq!(h.app.route(), Route::Tasks);
    assert_eq!(h.app.tasks.items().len(), 4);
}

#[tokio::test]
async fn stale_generation_is_dropped() {
    let mut app = App::new(5);
    let _ = app.navigate("/tasks");
    let old = app.generation();
    let _ = app.navigate("/resources");

    app.apply_net_event(NetEvent::TasksLoaded {
        generation: old,
        result: Ok(TaskList {
            tasks: vec![TaskRecord::new("t1", "late", TaskState::Running)],
            total: Some(1),
        }),
    });
    assert!(app.tasks.items().is_empty());

    let resources = || {
        Ok(ResourceList {
            resources: vec![ResourceRecord {
                resource_id: "r1".into(),
                name: "iris.csv".into(),
                is_locked: false,
                is_deletion_requested: None,
            }],
            total: Some(1),
        })
    };
    app.apply_net_event(NetEvent::ResourcesLoaded {
        generation: old,
        result: resources(),
    });
    assert!(app.resources.items().is_empty());

    app.apply_net_event(NetEvent::ResourcesLoaded {
        generation: app.generation(),
        result: resources(),
    });
    assert_eq!(app.resources.items().len(), 1);
}

#[tokio::test]
async fn unknown_path_lands_on_tasks() {
    let mut app = App::default();
    let _ = app.navigate("/resources");
    let cmd = app.navigate("/no/such/page");
    assert_eq!(app.route(), Route::Tasks);
    assert!(Route::Tasks.is_active(app.current_path()));
    assert!(!Route::Resources.is_active(app.current_path()));
    assert!(matches!(cmd, NetCommand::Activate { generation, .. } if generation == app.generation()));
}

#[tokio::test]
async fn search_from_filter_bar_narrows_the_list() {
    let mut h = Harness::start().await;
    h.navigate("/tasks").await;
    h.pump_until(|app| app.tasks.items().len() == 4).await;

    h.press(KeyCode::Char('/')).await;
    assert_eq!(h.app.focus, Focus::Filter);
    for c in "forest".chars() {
        h.press(KeyCode::Char(c)).await;
    }
    // Typing alone does not touch the committed filter.
    assert!(h.app.tasks.form.committed().q.is_empty());

    h.press(KeyCode::Enter).await;
    assert_eq!(h.app.tasks.form.committed().q, "forest");
    h.pump_until(|app| app.tasks.items().len() == 1).await;
    assert_eq!(h.app.tasks.items()[0].title, "Random forest depth");
}

#[tokio::test]
async fn cancel_key_reaches_the_server() {
    let mut h = Harness::start().await;
    h.navigate("/tasks").await;
    h.pump_until(|app| app.tasks.items().len() == 4).await;

    // Newest first: the pending task is on top.
    assert_eq!(h.app.tasks.items()[0].title, "Queued ridge");
    h.press(KeyCode::Char('c')).await;
    h.pump_until(|app| app.current_notice().is_some()).await;
    assert_eq!(h.app.current_notice(), Some(&Notice::success("Task cancelled!")));

    // The notice blocks keys until acknowledged.
    h.press(KeyCode::Char('c')).await;
    assert_eq!(h.app.notices.len(), 1);
    h.press(KeyCode::Enter).await;
    assert!(h.app.current_notice().is_none());

    h.press(KeyCode::Char('r')).await;
    h.pump_until(|app| app.tasks.items()[0].state == Some(TaskState::Cancelled))
        .await;

    // Cancelled tasks offer no cancel action.
    assert!(h.app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)).is_none());
}
