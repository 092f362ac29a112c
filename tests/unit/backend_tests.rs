use super::*;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Mock story engine. Its runtime only drives setup and inspection; the
/// blocking client under test is called from the plain test thread.
struct MockEngine {
    server: MockServer,
    runtime: Runtime,
}

impl MockEngine {
    fn start() -> Self {
        let runtime = Runtime::new().expect("tokio runtime");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    fn respond(&self, verb: &str, route: &str, status: u16, body: &str) {
        self.runtime.block_on(
            Mock::given(method(verb))
                .and(path(route))
                .respond_with(
                    ResponseTemplate::new(status).set_body_raw(body.to_string(), "application/json"),
                )
                .mount(&self.server),
        );
    }

    fn requests(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }

    fn only_request(&self) -> Request {
        let mut requests = self.requests();
        assert_eq!(requests.len(), 1, "expected one request: {requests:?}");
        requests.remove(0)
    }

    fn backend(&self) -> HttpBackend {
        backend(&self.server.uri())
    }
}

fn backend(url: &str) -> HttpBackend {
    HttpBackend::new(url, Duration::from_secs(5)).expect("client should build")
}

#[test]
fn base_url_drops_trailing_slash() {
    let backend = backend("http://localhost:8000/");
    assert_eq!(backend.base_url(), "http://localhost:8000");
}

#[test]
fn scene_decodes_full_payload() {
    let engine = MockEngine::start();
    engine.respond(
        "GET",
        "/scene",
        200,
        r#"{"scene_id":"forest_clearing","description":"Mist everywhere.","items":["Torch"],"npcs":["Hermit"],"choices":["go north (Cave)","take torch","talk to hermit"],"inventory":[],"seed":"abc123","visited_scenes":2,"current_conversation":null}"#,
    );
    let scene = engine.backend().scene().expect("scene should decode");
    assert_eq!(scene.scene_id, "forest_clearing");
    assert_eq!(scene.items, vec!["Torch".to_string()]);
    assert_eq!(scene.choices.len(), 3);
    assert_eq!(scene.visited_scenes, 2);
    assert_eq!(scene.current_conversation, None);

    let request = engine.only_request();
    assert_eq!(request.method.as_str(), "GET");
    assert_eq!(request.url.path(), "/scene");
}

#[test]
fn scene_error_payload_becomes_game_error() {
    let engine = MockEngine::start();
    engine.respond(
        "GET",
        "/scene",
        200,
        r#"{"error":"No run active. Start a new run first."}"#,
    );
    let err = engine.backend().scene().expect_err("should fail");
    assert!(matches!(err, BackendError::Game(_)));
    assert_eq!(err.detail(), "No run active. Start a new run first.");
}

#[test]
fn command_posts_json_and_returns_result() {
    let engine = MockEngine::start();
    engine.respond("POST", "/command", 200, r#"{"result":"You pick up the torch."}"#);
    let result = engine
        .backend()
        .command("take torch")
        .expect("command should succeed");
    assert_eq!(result, "You pick up the torch.");

    let request = engine.only_request();
    assert_eq!(request.method.as_str(), "POST");
    assert_eq!(request.url.path(), "/command");
    let body: serde_json::Value = request.body_json().expect("json body");
    assert_eq!(body["command"], "take torch");
}

#[test]
fn non_success_status_surfaces_detail() {
    let engine = MockEngine::start();
    engine.respond("POST", "/command", 500, r#"{"detail":"engine exploded"}"#);
    let err = engine.backend().command("look").expect_err("should fail");
    match err {
        BackendError::Status { status, ref detail } => {
            assert_eq!(status, 500);
            assert_eq!(detail, "engine exploded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.detail(), "engine exploded");
}

#[test]
fn non_success_status_without_detail_uses_reason_phrase() {
    let engine = MockEngine::start();
    engine.respond("GET", "/saves", 404, "not json");
    let err = engine.backend().saves().expect_err("should fail");
    assert_eq!(err.detail(), "Not Found");
}

#[test]
fn start_new_run_sends_camel_case_class_and_skips_missing_fields() {
    let engine = MockEngine::start();
    engine.respond(
        "POST",
        "/start_new_run",
        200,
        r#"{"message":"Started new run with seed: xyz"}"#,
    );
    let message = engine
        .backend()
        .start_new_run(&StartRunRequest {
            seed: None,
            name: Some("Ada".to_string()),
            chosen_class: Some("Mystic".to_string()),
        })
        .expect("start should succeed");
    assert_eq!(message, "Started new run with seed: xyz");

    let request = engine.only_request();
    assert_eq!(request.url.path(), "/start_new_run");
    let body: serde_json::Value = request.body_json().expect("json body");
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["chosenClass"], "Mystic");
    assert!(body.get("seed").is_none());
}

#[test]
fn status_reports_run_state() {
    let engine = MockEngine::start();
    engine.respond(
        "GET",
        "/status",
        200,
        r#"{"status":"active","seed":"s","current_location":"cave","visited_scenes":3,"inventory_count":1}"#,
    );
    let status = engine.backend().status().expect("status should decode");
    assert_eq!(status.state(), RunState::Active);
    assert_eq!(status.current_location.as_deref(), Some("cave"));

    let idle = RunStatus {
        status: "no_active_run".to_string(),
        message: None,
        seed: None,
        current_location: None,
        visited_scenes: None,
        inventory_count: None,
    };
    assert_eq!(idle.state(), RunState::NoActiveRun);
}

#[test]
fn load_returns_scene_and_message() {
    let engine = MockEngine::start();
    engine.respond(
        "POST",
        "/load",
        200,
        r#"{"scene_id":"cave","description":"Dark.","choices":["go south"],"message":"Loaded save1"}"#,
    );
    let loaded = engine.backend().load("save1").expect("load should succeed");
    assert_eq!(loaded.message, "Loaded save1");
    assert_eq!(loaded.scene.scene_id, "cave");
    assert_eq!(loaded.scene.choices, vec!["go south".to_string()]);

    let body: serde_json::Value = engine.only_request().body_json().expect("json body");
    assert_eq!(body["filename"], "save1");
}

#[test]
fn saves_lists_filenames() {
    let engine = MockEngine::start();
    engine.respond("GET", "/saves", 200, r#"{"saves":["a","b"]}"#);
    let saves = engine.backend().saves().expect("saves should decode");
    assert_eq!(saves, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn intent_defaults_to_unknown() {
    let engine = MockEngine::start();
    engine.respond("POST", "/intent", 200, r#"{}"#);
    assert_eq!(engine.backend().intent("dance").expect("intent"), "unknown");
}

#[test]
fn error_detail_joins_validation_messages() {
    let body = r#"{"detail":[{"msg":"field required"},{"msg":"bad type"}]}"#;
    assert_eq!(error_detail(body).as_deref(), Some("field required; bad type"));
    assert_eq!(error_detail("oops"), None);
}
