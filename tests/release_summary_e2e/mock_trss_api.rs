//! Mock TRSS data API for E2E tests.
//!
//! Starts an in-process HTTP server answering the three record queries the
//! release summary depends on, backed by fixtures held in shared state.

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, get, web};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

type Params = web::Query<HashMap<String, String>>;

/// Fixture data and request log for the mock API.
#[derive(Default)]
pub struct MockTrssState {
    /// Build records by id, served from `getParents`
    pub builds: HashMap<String, Value>,
    /// Child build records by parent id
    pub children: HashMap<String, Vec<Value>>,
    /// Newest-first test results by test id
    pub histories: HashMap<String, Vec<&'static str>>,
    /// Test ids whose history query answers 500
    pub broken_histories: Vec<String>,
    /// Every query answers 500 when set
    pub failing: bool,
    /// Raw `path?query` of every request received
    pub requests: Vec<String>,
}

impl MockTrssState {
    pub fn with_build(mut self, build: Value) -> Self {
        let id = build["_id"].as_str().unwrap_or_default().to_string();
        self.builds.insert(id, build);
        self
    }

    pub fn with_children(mut self, parent_id: &str, children: Vec<Value>) -> Self {
        self.children.insert(parent_id.to_string(), children);
        self
    }

    pub fn with_history(mut self, test_id: &str, results: Vec<&'static str>) -> Self {
        self.histories.insert(test_id.to_string(), results);
        self
    }

    pub fn with_broken_history(mut self, test_id: &str) -> Self {
        self.broken_histories.push(test_id.to_string());
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

type SharedState = web::Data<Arc<Mutex<MockTrssState>>>;

fn record(state: &SharedState, req: &HttpRequest) -> bool {
    let mut state = state.lock().unwrap();
    state
        .requests
        .push(format!("{}?{}", req.path(), req.query_string()));
    state.failing
}

fn server_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("database unavailable")
}

#[get("/api/getParents")]
async fn get_parents(state: SharedState, req: HttpRequest, params: Params) -> HttpResponse {
    if record(&state, &req) {
        return server_error();
    }
    let id = params.get("id").cloned().unwrap_or_default();
    if id.is_empty() {
        return HttpResponse::BadRequest().body("id is required");
    }
    if id == "garbage" {
        return HttpResponse::Ok()
            .content_type("application/json")
            .body("{\"not\": \"a list\"}");
    }

    let state = state.lock().unwrap();
    let builds: Vec<Value> = state.builds.get(&id).cloned().into_iter().collect();
    HttpResponse::Ok().json(builds)
}

#[get("/api/getAllChildBuilds")]
async fn get_all_child_builds(
    state: SharedState,
    req: HttpRequest,
    params: Params,
) -> HttpResponse {
    if record(&state, &req) {
        return server_error();
    }
    let parent_id = params.get("parentId").cloned().unwrap_or_default();
    let excluded = params
        .get("buildResult")
        .and_then(|r| r.strip_prefix('!'))
        .map(str::to_string);

    let state = state.lock().unwrap();
    let children: Vec<Value> = state
        .children
        .get(&parent_id)
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter(|b| match &excluded {
            Some(result) => b["buildResult"].as_str() != Some(result.as_str()),
            None => true,
        })
        .collect();
    HttpResponse::Ok().json(children)
}

#[get("/api/getHistoryPerTest")]
async fn get_history_per_test(
    state: SharedState,
    req: HttpRequest,
    params: Params,
) -> HttpResponse {
    if record(&state, &req) {
        return server_error();
    }
    let test_id = params.get("testId").cloned().unwrap_or_default();
    let limit = params
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(usize::MAX);

    let state = state.lock().unwrap();
    if state.broken_histories.contains(&test_id) {
        return server_error();
    }
    let rows: Vec<Value> = state
        .histories
        .get(&test_id)
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .take(limit)
        .map(|result| json!({ "_id": test_id, "tests": { "testResult": result } }))
        .collect();
    HttpResponse::Ok().json(rows)
}

/// Mock TRSS data API.
pub struct MockTrssApi {
    pub api_url: String,
    pub state: Arc<Mutex<MockTrssState>>,
}

impl MockTrssApi {
    /// Start the mock API on an ephemeral port.
    pub async fn start(initial: MockTrssState) -> Self {
        let state = Arc::new(Mutex::new(initial));

        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();
        let api_url = format!("http://127.0.0.1:{}", port);

        let state_data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state_data.clone()))
                .service(get_parents)
                .service(get_all_child_builds)
                .service(get_history_per_test)
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        // Server lives for the process lifetime
        tokio::spawn(server);

        MockTrssApi { api_url, state }
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }
}
