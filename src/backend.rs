use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const USER_AGENT: &str = concat!("adventure-terminal/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request succeeded but the payload reports a game-level problem,
    /// e.g. asking for a scene before a run exists.
    #[error("{0}")]
    Game(String),
}

impl BackendError {
    /// Text suitable for the error screen.
    pub fn detail(&self) -> String {
        match self {
            Self::Status { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub scene_id: String,
    pub description: String,
    pub items: Vec<String>,
    pub npcs: Vec<String>,
    pub choices: Vec<String>,
    pub inventory: Vec<String>,
    pub seed: String,
    pub visited_scenes: u32,
    pub current_conversation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoadedGame {
    #[serde(flatten)]
    pub scene: Scene,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Active,
    NoActiveRun,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visited_scenes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_count: Option<u32>,
}

impl RunStatus {
    pub fn state(&self) -> RunState {
        match self.status.as_str() {
            "active" => RunState::Active,
            "no_active_run" => RunState::NoActiveRun,
            _ => RunState::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StartRunRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "chosenClass", skip_serializing_if = "Option::is_none")]
    pub chosen_class: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct CommandResponse {
    #[serde(default)]
    result: String,
}

#[derive(Debug, Deserialize)]
struct SavesResponse {
    #[serde(default)]
    saves: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct IntentResponse {
    #[serde(default)]
    intent: Option<String>,
}

/// The game server as seen from the client.
pub trait GameBackend: Send + Sync {
    fn start_new_run(&self, request: &StartRunRequest) -> Result<String, BackendError>;
    fn scene(&self) -> Result<Scene, BackendError>;
    fn command(&self, command: &str) -> Result<String, BackendError>;
    fn save(&self, filename: Option<&str>) -> Result<String, BackendError>;
    fn load(&self, filename: &str) -> Result<LoadedGame, BackendError>;
    fn saves(&self) -> Result<Vec<String>, BackendError>;
    fn status(&self) -> Result<RunStatus, BackendError>;
    fn intent(&self, text: &str) -> Result<String, BackendError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self.client.get(self.url(path)).send()?;
        decode_response(response)
    }

    fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self.client.post(self.url(path)).json(body).send()?;
        decode_response(response)
    }
}

impl GameBackend for HttpBackend {
    fn start_new_run(&self, request: &StartRunRequest) -> Result<String, BackendError> {
        let response: MessageResponse = self.post("/start_new_run", request)?;
        Ok(response.message)
    }

    fn scene(&self) -> Result<Scene, BackendError> {
        let value: serde_json::Value = self.get("/scene")?;
        if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
            return Err(BackendError::Game(error.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    fn command(&self, command: &str) -> Result<String, BackendError> {
        let response: CommandResponse =
            self.post("/command", &serde_json::json!({ "command": command }))?;
        Ok(response.result)
    }

    fn save(&self, filename: Option<&str>) -> Result<String, BackendError> {
        let response: MessageResponse =
            self.post("/save", &serde_json::json!({ "filename": filename }))?;
        Ok(response.message)
    }

    fn load(&self, filename: &str) -> Result<LoadedGame, BackendError> {
        self.post("/load", &serde_json::json!({ "filename": filename }))
    }

    fn saves(&self) -> Result<Vec<String>, BackendError> {
        let response: SavesResponse = self.get("/saves")?;
        Ok(response.saves)
    }

    fn status(&self) -> Result<RunStatus, BackendError> {
        self.get("/status")
    }

    fn intent(&self, text: &str) -> Result<String, BackendError> {
        let response: IntentResponse = self.post("/intent", &serde_json::json!({ "text": text }))?;
        Ok(response.intent.unwrap_or_else(|| "unknown".to_string()))
    }
}

fn decode_response<T: DeserializeOwned>(
    response: reqwest::blocking::Response,
) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        return Err(BackendError::Status {
            status: status.as_u16(),
            detail: error_detail(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            }),
        });
    }
    Ok(serde_json::from_str(&body)?)
}

/// FastAPI reports failures as `{"detail": "..."}`; validation errors use a
/// list of objects with a `msg` field instead.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Array(items) => {
            let messages = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect::<Vec<_>>();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[path = "../tests/unit/backend_tests.rs"]
mod tests;
