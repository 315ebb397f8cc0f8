// tests/common/mod.rs
//! In-process stand-in for the Crafty manager API.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use parking_lot::Mutex;
use serde_json::{json, Value};

use mc_lan_beacon::config::CraftyConfig;
use mc_lan_beacon::crafty::Credentials;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";

pub fn ok(data: Value) -> Value {
    json!({ "status": "ok", "data": data })
}

#[derive(Default)]
pub struct MockState {
    pub accept_login: AtomicBool,
    /// Upcoming authenticated calls to answer with 401 regardless of token.
    pub unauthorized_responses: AtomicUsize,
    pub current_token: Mutex<Option<String>>,
    pub servers_body: Mutex<Value>,
    pub stats_bodies: Mutex<HashMap<String, Value>>,

    pub login_calls: AtomicUsize,
    pub servers_calls: AtomicUsize,
    pub stats_calls: AtomicUsize,
}

impl MockState {
    pub fn with_login() -> Self {
        let state = Self::default();
        state.accept_login.store(true, Ordering::SeqCst);
        *state.servers_body.lock() = ok(json!([]));
        state
    }

    pub fn with_static_token(token: &str) -> Self {
        let state = Self::default();
        *state.current_token.lock() = Some(token.to_string());
        *state.servers_body.lock() = ok(json!([]));
        state
    }

    pub fn servers(self, list: Value) -> Self {
        *self.servers_body.lock() = ok(list);
        self
    }

    pub fn stats(self, id: &str, stats: Value) -> Self {
        self.stats_bodies.lock().insert(id.to_string(), ok(stats));
        self
    }

    pub fn logins(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn server_list_calls(&self) -> usize {
        self.servers_calls.load(Ordering::SeqCst)
    }

    pub fn stats_requests(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }

    pub fn reject_next(&self, count: usize) {
        self.unauthorized_responses.store(count, Ordering::SeqCst);
    }

    fn unauthorized(&self, req: &HttpRequest) -> Option<HttpResponse> {
        let forced = self
            .unauthorized_responses
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        let presented = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let expected = self.current_token.lock().as_ref().map(|t| format!("Bearer {}", t));

        if forced || expected.is_none() || presented != expected {
            Some(HttpResponse::Unauthorized().json(json!({ "status": "error", "error": "NOT_AUTHORIZED" })))
        } else {
            None
        }
    }
}

async fn login(state: web::Data<MockState>, body: web::Json<Value>) -> HttpResponse {
    let n = state.login_calls.fetch_add(1, Ordering::SeqCst) + 1;
    if !state.accept_login.load(Ordering::SeqCst) || body["username"] != USERNAME || body["password"] != PASSWORD {
        return HttpResponse::Unauthorized().json(json!({ "status": "error", "error": "ACCESS_DENIED" }));
    }
    let token = format!("token-{}", n);
    *state.current_token.lock() = Some(token.clone());
    HttpResponse::Ok().json(ok(json!({ "token": token, "user_id": "1" })))
}

async fn servers(state: web::Data<MockState>, req: HttpRequest) -> HttpResponse {
    state.servers_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(denied) = state.unauthorized(&req) {
        return denied;
    }
    HttpResponse::Ok().json(state.servers_body.lock().clone())
}

async fn stats(state: web::Data<MockState>, req: HttpRequest, path: web::Path<String>) -> HttpResponse {
    state.stats_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(denied) = state.unauthorized(&req) {
        return denied;
    }
    match state.stats_bodies.lock().get(path.as_str()) {
        Some(body) => HttpResponse::Ok().json(body.clone()),
        None => HttpResponse::NotFound().json(json!({ "status": "error", "error": "NOT_FOUND" })),
    }
}

async fn echo(state: web::Data<MockState>, req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    if let Some(denied) = state.unauthorized(&req) {
        return denied;
    }
    HttpResponse::Ok().json(ok(body.into_inner()))
}

pub struct MockManager {
    pub base_url: String,
    pub state: Arc<MockState>,
    handle: ServerHandle,
}

impl MockManager {
    pub async fn start(state: MockState) -> Self {
        let state = Arc::new(state);
        let data = web::Data::from(state.clone());
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/api/v2/auth/login", web::post().to(login))
                .route("/api/v2/servers", web::get().to(servers))
                .route("/api/v2/servers/{id}/stats", web::get().to(stats))
                .route("/api/v2/echo", web::post().to(echo))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind mock manager");
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://{}/api/v2", addr),
            state,
            handle,
        }
    }

    pub fn login_config(&self) -> CraftyConfig {
        self.config(Credentials::Login {
            username: USERNAME.to_string(),
            password: PASSWORD.to_string(),
        })
    }

    pub fn token_config(&self, token: &str) -> CraftyConfig {
        self.config(Credentials::Token(token.to_string()))
    }

    pub fn config(&self, credentials: Credentials) -> CraftyConfig {
        CraftyConfig {
            api_url: self.base_url.clone(),
            credentials,
            token_ttl: Duration::from_secs(3600),
            http_timeout: Duration::from_secs(5),
        }
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}
