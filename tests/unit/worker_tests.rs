use super::*;
use crate::backend::BackendError;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Default)]
struct FakeBackend {
    calls: Mutex<Vec<String>>,
    fail_commands: bool,
    fail_intent: bool,
    slow_command: Option<&'static str>,
}

impl FakeBackend {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().expect("calls lock").push(call.into());
    }
}

impl GameBackend for FakeBackend {
    fn start_new_run(&self, request: &StartRunRequest) -> Result<String, BackendError> {
        self.record(format!("start:{}", request.name.clone().unwrap_or_default()));
        Ok("Started new run with seed: s".to_string())
    }

    fn scene(&self) -> Result<Scene, BackendError> {
        self.record("scene");
        Ok(Scene {
            scene_id: "forest".to_string(),
            choices: vec!["go north".to_string()],
            ..Scene::default()
        })
    }

    fn command(&self, command: &str) -> Result<String, BackendError> {
        if self.slow_command == Some(command) {
            std::thread::sleep(Duration::from_millis(300));
        }
        self.record(format!("command:{command}"));
        if self.fail_commands {
            return Err(BackendError::Status {
                status: 500,
                detail: "engine exploded".to_string(),
            });
        }
        Ok(format!("You {command}."))
    }

    fn save(&self, filename: Option<&str>) -> Result<String, BackendError> {
        self.record(format!("save:{}", filename.unwrap_or("-")));
        Ok("Saved".to_string())
    }

    fn load(&self, filename: &str) -> Result<LoadedGame, BackendError> {
        self.record(format!("load:{filename}"));
        Ok(LoadedGame {
            scene: Scene::default(),
            message: "Loaded".to_string(),
        })
    }

    fn saves(&self) -> Result<Vec<String>, BackendError> {
        self.record("saves");
        Ok(vec!["one".to_string()])
    }

    fn status(&self) -> Result<RunStatus, BackendError> {
        self.record("status");
        Err(BackendError::Game("offline".to_string()))
    }

    fn intent(&self, text: &str) -> Result<String, BackendError> {
        self.record(format!("intent:{text}"));
        if self.fail_intent {
            return Err(BackendError::Game("no model".to_string()));
        }
        Ok("move".to_string())
    }
}

fn wait_for_events(worker: &BackendWorker, count: usize) -> Vec<BackendEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    while events.len() < count && Instant::now() < deadline {
        events.extend(worker.drain_events_limited(count - events.len()));
        std::thread::sleep(Duration::from_millis(5));
    }
    events
}

#[test]
fn worker_delivers_scene_event() {
    let backend = Arc::new(FakeBackend::default());
    let worker = BackendWorker::new(backend.clone(), false);
    worker.send(BackendRequest::FetchScene);

    let events = wait_for_events(&worker, 1);
    match events.as_slice() {
        [BackendEvent::SceneFetched(Ok(scene))] => assert_eq!(scene.scene_id, "forest"),
        other => panic!("unexpected events: {other:?}"),
    }
    assert_eq!(backend.calls(), vec!["scene".to_string()]);
}

#[test]
fn requests_reach_backend_in_submission_order() {
    let backend = Arc::new(FakeBackend {
        slow_command: Some("go north"),
        ..FakeBackend::default()
    });
    let worker = BackendWorker::new(backend.clone(), false);
    for text in ["go north", "take torch"] {
        worker.send(BackendRequest::Command {
            text: text.to_string(),
            conversation: false,
        });
    }
    worker.send(BackendRequest::FetchScene);

    let events = wait_for_events(&worker, 3);
    assert_eq!(
        backend.calls(),
        vec![
            "command:go north".to_string(),
            "command:take torch".to_string(),
            "scene".to_string(),
        ]
    );
    match events.as_slice() {
        [
            BackendEvent::CommandFinished { result: Ok(first), .. },
            BackendEvent::CommandFinished { result: Ok(second), .. },
            BackendEvent::SceneFetched(Ok(_)),
        ] => {
            assert_eq!(first, "You go north.");
            assert_eq!(second, "You take torch.");
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[test]
fn drain_respects_limit() {
    let backend = Arc::new(FakeBackend::default());
    let worker = BackendWorker::new(backend, false);
    worker.send(BackendRequest::ListSaves);
    worker.send(BackendRequest::ListSaves);
    std::thread::sleep(Duration::from_millis(500));
    assert!(worker.drain_events_limited(0).is_empty());
    assert_eq!(worker.drain_events_limited(1).len(), 1);
    assert_eq!(worker.drain_events_limited(8).len(), 1);
}

#[test]
fn command_classifies_intent_first_when_enabled() {
    let backend = FakeBackend::default();
    let event = execute(
        &backend,
        BackendRequest::Command {
            text: "go north".to_string(),
            conversation: false,
        },
        true,
    );
    assert_eq!(
        event,
        BackendEvent::CommandFinished {
            conversation: false,
            result: Ok("You go north.".to_string()),
        }
    );
    assert_eq!(
        backend.calls(),
        vec!["intent:go north".to_string(), "command:go north".to_string()]
    );
}

#[test]
fn intent_failure_does_not_block_command() {
    let backend = FakeBackend {
        fail_intent: true,
        ..FakeBackend::default()
    };
    let event = execute(
        &backend,
        BackendRequest::Command {
            text: "hello".to_string(),
            conversation: true,
        },
        true,
    );
    assert!(matches!(
        event,
        BackendEvent::CommandFinished {
            conversation: true,
            result: Ok(_)
        }
    ));
}

#[test]
fn command_skips_intent_when_disabled() {
    let backend = FakeBackend::default();
    execute(
        &backend,
        BackendRequest::Command {
            text: "look".to_string(),
            conversation: false,
        },
        false,
    );
    assert_eq!(backend.calls(), vec!["command:look".to_string()]);
}

#[test]
fn failures_carry_backend_detail() {
    let backend = FakeBackend {
        fail_commands: true,
        ..FakeBackend::default()
    };
    let event = execute(
        &backend,
        BackendRequest::Command {
            text: "look".to_string(),
            conversation: false,
        },
        false,
    );
    assert_eq!(
        event,
        BackendEvent::CommandFinished {
            conversation: false,
            result: Err("engine exploded".to_string()),
        }
    );

    let status = execute(&backend, BackendRequest::PollStatus, false);
    assert_eq!(status, BackendEvent::StatusPolled(Err("offline".to_string())));
}

#[test]
fn start_run_reports_purpose() {
    let backend = FakeBackend::default();
    let event = execute(
        &backend,
        BackendRequest::StartRun {
            purpose: RunPurpose::Player,
            request: StartRunRequest {
                name: Some("Ada".to_string()),
                ..StartRunRequest::default()
            },
        },
        false,
    );
    assert!(matches!(
        event,
        BackendEvent::RunStarted {
            purpose: RunPurpose::Player,
            result: Ok(_)
        }
    ));
    assert_eq!(backend.calls(), vec!["start:Ada".to_string()]);
}
