// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test fixtures: scripted transport, manual clock and app builder.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use chrono::{DateTime, Duration, Utc};
use reqwest::{Method, StatusCode};
use spotify_companion::config::Config;
use spotify_companion::models::{Session, SessionId};
use spotify_companion::routes::create_router;
use spotify_companion::services::http::{ApiRequest, ApiResponse, HttpTransport, TransportError};
use spotify_companion::services::{Clock, InMemoryTokenStore, SpotifyClient, TokenManager, TokenStore};
use spotify_companion::AppState;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const API_BASE: &str = "https://api.test/v1";
pub const TOKEN_URL: &str = "https://accounts.test/api/token";

/// Full Web API URL for `path`.
pub fn api(path: &str) -> String {
    format!("{}/{}", API_BASE, path)
}

type Scripted = Result<ApiResponse, TransportError>;

/// Transport that answers from a script keyed by method and URL.
///
/// Each key holds a queue of responses; the last one repeats forever.
/// Unscripted requests get a 404.
#[derive(Default)]
pub struct FakeTransport {
    script: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: Method, url: &str, status: u16, body: serde_json::Value) {
        let body = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        self.push(
            method,
            url,
            Ok(ApiResponse::new(StatusCode::from_u16(status).unwrap(), body)),
        );
    }

    pub fn fail(&self, method: Method, url: &str, message: &str) {
        self.push(method, url, Err(TransportError(message.to_string())));
    }

    fn push(&self, method: Method, url: &str, reply: Scripted) {
        self.script
            .lock()
            .unwrap()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(reply);
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: Method, url: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.url == url)
            .collect()
    }

    pub fn count(&self, method: Method, url: &str) -> usize {
        self.requests_to(method, url).len()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let key = (request.method.clone(), request.url.clone());
        self.requests.lock().unwrap().push(request);

        let mut script = self.script.lock().unwrap();
        match script.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Ok(ApiResponse::new(StatusCode::NOT_FOUND, "not scripted")),
        }
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap()),
        })
    }

    pub fn now_dt(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    pub fn now_ts(&self) -> i64 {
        self.now_dt().timestamp()
    }

    pub fn advance(&self, seconds: i64) {
        let mut now = self.now.lock().unwrap();
        *now += Duration::seconds(seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// App wired to fakes, with handles to inspect them.
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub transport: Arc<FakeTransport>,
    pub store: Arc<InMemoryTokenStore>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    /// Store a session directly and return the matching `Cookie` header.
    pub async fn sign_in(&self, access: &str, refresh: Option<&str>, expires_in: i64) -> String {
        let id = SessionId::generate().unwrap();
        let session = Session::from_grant(
            access.to_string(),
            refresh.map(str::to_string),
            expires_in,
            self.clock.now(),
        )
        .unwrap();
        self.store.put(&id, session).await.unwrap();
        format!("sc_session={}", id.as_str())
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(build_request("GET", uri, cookie)).await
    }

    pub async fn post(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(build_request("POST", uri, cookie)).await
    }
}

pub fn build_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn create_test_app() -> TestApp {
    let transport = FakeTransport::new();
    let store = Arc::new(InMemoryTokenStore::new());
    let clock = ManualClock::new();

    let state = Arc::new(
        AppState::new(
            Config::test_default(),
            transport.clone(),
            store.clone(),
            clock.clone(),
        )
        .unwrap(),
    );

    TestApp {
        router: create_router(state.clone()),
        state,
        transport,
        store,
        clock,
    }
}

/// Token manager and API client over fresh fakes, without a router.
pub fn test_services() -> (
    TokenManager,
    SpotifyClient,
    Arc<FakeTransport>,
    Arc<InMemoryTokenStore>,
    Arc<ManualClock>,
) {
    let config = Config::test_default();
    let transport = FakeTransport::new();
    let store = Arc::new(InMemoryTokenStore::new());
    let clock = ManualClock::new();

    let tokens = TokenManager::new(&config, transport.clone(), store.clone(), clock.clone());
    let spotify = SpotifyClient::new(&config, transport.clone());
    (tokens, spotify, transport, store, clock)
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default()
}

pub fn set_cookie_headers(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

// ─── Canned payloads ────────────────────────────────────────────────────────

pub fn track(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Track {}", id),
        "uri": format!("spotify:track:{}", id),
        "artists": [{ "id": "ar1", "name": "Artist" }],
        "external_urls": { "spotify": format!("https://open.spotify.com/track/{}", id) }
    })
}

pub fn tracks(ids: &[&str]) -> Vec<serde_json::Value> {
    ids.iter().map(|id| track(id)).collect()
}

pub fn currently_playing(id: &str, is_playing: bool) -> serde_json::Value {
    serde_json::json!({
        "is_playing": is_playing,
        "progress_ms": 90_000,
        "item": track(id),
        "context": { "uri": "spotify:playlist:ctx" }
    })
}

pub fn history(ids: &[&str]) -> serde_json::Value {
    let items: Vec<_> = ids
        .iter()
        .map(|id| serde_json::json!({ "track": track(id), "played_at": "2024-03-04T13:45:10.123Z" }))
        .collect();
    serde_json::json!({ "items": items })
}

pub fn user() -> serde_json::Value {
    serde_json::json!({
        "id": "user-1",
        "display_name": "Ada",
        "email": "ada@example.com",
        "images": []
    })
}

pub fn token_response(access: &str, refresh: Option<&str>, expires_in: i64) -> serde_json::Value {
    let mut body = serde_json::json!({
        "access_token": access,
        "token_type": "Bearer",
        "expires_in": expires_in,
    });
    if let Some(refresh) = refresh {
        body["refresh_token"] = serde_json::json!(refresh);
    }
    body
}
