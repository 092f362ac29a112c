use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::backend::{GameBackend, LoadedGame, RunStatus, Scene, StartRunRequest};

/// Why a run is being started. The tutorial kicks off world generation with
/// no player details, then restarts the run once name and class are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPurpose {
    WorldGeneration,
    Player,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendRequest {
    StartRun {
        purpose: RunPurpose,
        request: StartRunRequest,
    },
    PollStatus,
    FetchScene,
    Command {
        text: String,
        conversation: bool,
    },
    Save(Option<String>),
    ListSaves,
    Load(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    RunStarted {
        purpose: RunPurpose,
        result: Result<String, String>,
    },
    StatusPolled(Result<RunStatus, String>),
    SceneFetched(Result<Scene, String>),
    CommandFinished {
        conversation: bool,
        result: Result<String, String>,
    },
    Saved(Result<String, String>),
    SavesListed(Result<Vec<String>, String>),
    Loaded(Result<LoadedGame, String>),
}

/// Runs backend calls off the UI thread and queues their outcomes for the
/// render loop to drain. A single thread serves requests in the order they
/// were sent, so commands reach the engine as typed and the newest scene
/// always lands last.
pub struct BackendWorker {
    request_tx: Sender<BackendRequest>,
    event_rx: Receiver<BackendEvent>,
}

impl BackendWorker {
    pub fn new(backend: Arc<dyn GameBackend>, classify_intent: bool) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<BackendRequest>();
        let (event_tx, event_rx) = mpsc::channel();
        thread::spawn(move || {
            for request in request_rx {
                let event = execute(backend.as_ref(), request, classify_intent);
                if event_tx.send(event).is_err() {
                    break;
                }
            }
            log::debug!("backend worker stopped");
        });
        Self {
            request_tx,
            event_rx,
        }
    }

    pub fn send(&self, request: BackendRequest) {
        if let Err(err) = self.request_tx.send(request) {
            log::warn!("backend worker is gone, dropping {:?}", err.0);
        }
    }

    pub fn drain_events_limited(&self, max_events: usize) -> Vec<BackendEvent> {
        let mut events = Vec::new();
        while events.len() < max_events {
            let Ok(event) = self.event_rx.try_recv() else {
                break;
            };
            events.push(event);
        }
        events
    }
}

pub fn execute(
    backend: &dyn GameBackend,
    request: BackendRequest,
    classify_intent: bool,
) -> BackendEvent {
    match request {
        BackendRequest::StartRun { purpose, request } => BackendEvent::RunStarted {
            purpose,
            result: backend.start_new_run(&request).map_err(|err| {
                log::warn!("start_new_run failed: {err}");
                err.detail()
            }),
        },
        BackendRequest::PollStatus => {
            BackendEvent::StatusPolled(backend.status().map_err(|err| {
                log::debug!("status poll failed: {err}");
                err.detail()
            }))
        }
        BackendRequest::FetchScene => BackendEvent::SceneFetched(backend.scene().map_err(|err| {
            log::warn!("scene fetch failed: {err}");
            err.detail()
        })),
        BackendRequest::Command { text, conversation } => {
            if classify_intent {
                match backend.intent(&text) {
                    Ok(intent) => log::debug!("predicted intent for '{text}': {intent}"),
                    Err(err) => log::debug!("intent classification failed: {err}"),
                }
            }
            log::info!("sending command '{text}' (conversation: {conversation})");
            BackendEvent::CommandFinished {
                conversation,
                result: backend.command(&text).map_err(|err| {
                    log::warn!("command '{text}' failed: {err}");
                    err.detail()
                }),
            }
        }
        BackendRequest::Save(filename) => {
            BackendEvent::Saved(backend.save(filename.as_deref()).map_err(|err| {
                log::warn!("save failed: {err}");
                err.detail()
            }))
        }
        BackendRequest::ListSaves => BackendEvent::SavesListed(backend.saves().map_err(|err| {
            log::warn!("listing saves failed: {err}");
            err.detail()
        })),
        BackendRequest::Load(filename) => {
            BackendEvent::Loaded(backend.load(&filename).map_err(|err| {
                log::warn!("load of '{filename}' failed: {err}");
                err.detail()
            }))
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/worker_tests.rs"]
mod tests;
