//! In-process fake of the Flame backend for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, RawQuery, State, WebSocketUpgrade, ws::{Message as WsMessage, WebSocket}},
    http::{HeaderMap, StatusCode, header::{AUTHORIZATION, CONTENT_TYPE}},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::sync::broadcast;

use flame_client::{AppContext, AppContextInner, ClientConfig};
use flame_store::{ClientStorage, MemoryStorage};

pub const TOKEN: &str = "tok-1";
pub const ME_ID: &str = "u1";
pub const OTHER_ID: &str = "u2";
pub const MATCH_ID: &str = "m1";

pub type Shared = Arc<FakeState>;

pub struct FakeState {
    pub requires_onboarding: Mutex<bool>,
    pub onboarded: Mutex<bool>,
    pub profile: Mutex<Value>,
    pub photos: Mutex<Vec<Value>>,
    pub primary_fails: Mutex<bool>,
    pub upload_types: Mutex<Vec<String>>,
    pub feed_batches: Mutex<Vec<Vec<Value>>>,
    pub feed_queries: Mutex<Vec<String>>,
    pub swipes: Mutex<Vec<Value>>,
    pub section_requests: Mutex<Vec<String>>,
    pub messages: Mutex<Vec<Value>>,
    pub ws_auth: Mutex<Option<String>>,
    pub ws_frames: Mutex<Vec<Value>>,
    pub push: broadcast::Sender<String>,
}

impl FakeState {
    fn new() -> Self {
        let (push, _) = broadcast::channel(64);
        Self {
            requires_onboarding: Mutex::new(true),
            onboarded: Mutex::new(false),
            profile: Mutex::new(json!({})),
            photos: Mutex::new(Vec::new()),
            primary_fails: Mutex::new(false),
            upload_types: Mutex::new(Vec::new()),
            feed_batches: Mutex::new(Vec::new()),
            feed_queries: Mutex::new(Vec::new()),
            swipes: Mutex::new(Vec::new()),
            section_requests: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            ws_auth: Mutex::new(None),
            ws_frames: Mutex::new(Vec::new()),
            push,
        }
    }

    pub fn has_frame(&self, kind: &str) -> bool {
        self.ws_frames
            .lock()
            .unwrap()
            .iter()
            .any(|f| f["type"] == kind)
    }
}

pub struct FakeBackend {
    pub base_url: String,
    pub state: Shared,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::new());
        let app = Router::new()
            .route("/auth/register", post(register))
            .route("/auth/login", post(login))
            .route("/users/me", get(me))
            .route("/users/me/profile", put(save_profile))
            .route("/photos", post(upload_photo))
            .route("/photos/{id}/primary", put(set_primary))
            .route("/onboarding/complete", put(complete_onboarding))
            .route("/feed", get(feed))
            .route("/swipes", post(swipe))
            .route("/sections/{user_id}", get(sections))
            .route("/matches", get(matches))
            .route("/matches/{id}/messages", get(list_messages).post(send_message))
            .route("/realtime", get(realtime))
            .route("/plain", get(|| async { "pong" }))
            .route("/boom", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Server exploded") }))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::for_api(self.base_url.clone())
    }

    /// Context with in-memory storage, optionally already signed in.
    pub fn context(&self, signed_in: bool) -> AppContext {
        let storage: Arc<dyn ClientStorage> = Arc::new(MemoryStorage::default());
        let ctx = AppContextInner::with_storage(self.config(), Some(storage)).unwrap();
        if signed_in {
            let user = serde_json::from_value(json!({ "id": ME_ID, "email": "ada@example.com", "name": "Ada" })).unwrap();
            ctx.auth.set(TOKEN.to_string(), user).unwrap();
        }
        ctx
    }

    pub fn push_frame(&self, frame: Value) {
        let _ = self.state.push.send(frame.to_string());
    }
}

/// Poll `check` until it holds or two seconds pass.
pub async fn wait_for(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

pub fn candidate(id: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{id}@example.com"),
        "name": id.to_uppercase(),
        "profile": { "bio": "Hello", "age": 27, "interests": ["Music"] },
        "photos": [{ "id": format!("{id}-p"), "url": format!("/{id}.jpg"), "order": 0 }]
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response()
}

fn session(email: &str, name: Option<&str>) -> Value {
    json!({ "token": TOKEN, "user": { "id": ME_ID, "email": email, "name": name } })
}

async fn register(State(s): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut resp = session(body["email"].as_str().unwrap_or_default(), body["name"].as_str());
    resp["requiresOnboarding"] = json!(*s.requires_onboarding.lock().unwrap());
    Json(resp).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "wrong" {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid credentials" }))).into_response();
    }
    Json(session(body["email"].as_str().unwrap_or_default(), None)).into_response()
}

async fn me(State(s): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "id": ME_ID,
        "email": "ada@example.com",
        "name": "Ada",
        "profile": s.profile.lock().unwrap().clone(),
        "photos": s.photos.lock().unwrap().clone(),
    }))
    .into_response()
}

async fn save_profile(State(s): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    *s.profile.lock().unwrap() = body;
    StatusCode::NO_CONTENT.into_response()
}

async fn upload_photo(State(s): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if body.windows(24).any(|w| w == b"application/octet-stream") {
        return (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Only images are allowed").into_response();
    }
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    s.upload_types.lock().unwrap().push(content_type);

    let mut photos = s.photos.lock().unwrap();
    let n = photos.len();
    let photo = json!({ "id": format!("p{n}"), "url": format!("/uploads/p{n}.jpg"), "order": n });
    photos.push(photo.clone());
    Json(photo).into_response()
}

async fn set_primary(State(s): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if *s.primary_fails.lock().unwrap() {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Could not set primary" }))).into_response();
    }
    let mut photos = s.photos.lock().unwrap();
    let min = photos.iter().filter_map(|p| p["order"].as_i64()).min().unwrap_or(0);
    match photos.iter_mut().find(|p| p["id"] == id.as_str()) {
        Some(photo) => {
            photo["order"] = json!(min - 1);
            Json(json!({ "ok": true })).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Photo not found" }))).into_response(),
    }
}

async fn complete_onboarding(State(s): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    *s.profile.lock().unwrap() = body["profile"].clone();
    *s.onboarded.lock().unwrap() = true;
    Json(json!({ "ok": true })).into_response()
}

async fn feed(State(s): State<Shared>, headers: HeaderMap, RawQuery(query): RawQuery) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    s.feed_queries.lock().unwrap().push(query.unwrap_or_default());
    if !*s.onboarded.lock().unwrap() {
        return (StatusCode::FORBIDDEN, Json(json!({ "error": "ONBOARDING_REQUIRED" }))).into_response();
    }
    let mut batches = s.feed_batches.lock().unwrap();
    let batch = if batches.is_empty() { Vec::new() } else { batches.remove(0) };
    Json(batch).into_response()
}

async fn swipe(State(s): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    s.swipes.lock().unwrap().push(body);
    Json(json!({ "matched": false })).into_response()
}

async fn sections(State(s): State<Shared>, headers: HeaderMap, Path(user_id): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    s.section_requests.lock().unwrap().push(user_id.clone());
    if user_id == "broken" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "oops").into_response();
    }
    Json(json!([
        { "id": "s2", "title": "Links", "type": "links", "content": { "links": [{ "url": "https://example.com" }] }, "order": 2 },
        { "id": "s1", "title": "Trips", "type": "card", "content": { "items": [{ "text": "Rome" }, { "text": "Oslo" }] }, "order": 1 }
    ]))
    .into_response()
}

async fn matches(State(s): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let messages: Vec<Value> = s.messages.lock().unwrap().iter().rev().cloned().collect();
    Json(json!([
        {
            "id": MATCH_ID,
            "userAId": ME_ID,
            "userBId": OTHER_ID,
            "counterpart": {
                "id": OTHER_ID,
                "email": "bea@example.com",
                "photos": [{ "id": "b1", "url": "/bea.jpg", "order": 0 }]
            },
            "messages": messages
        },
        { "id": "m2", "userAId": ME_ID, "userBId": "u3", "messages": [] }
    ]))
    .into_response()
}

async fn list_messages(State(s): State<Shared>, headers: HeaderMap, Path(_id): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(s.messages.lock().unwrap().clone()).into_response()
}

async fn send_message(
    State(s): State<Shared>,
    headers: HeaderMap,
    Path(_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let message = json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "content": body["content"],
        "createdAt": chrono::Utc::now(),
        "senderId": ME_ID,
    });
    s.messages.lock().unwrap().push(message.clone());
    // echo to everyone in the room, sender included
    let _ = s.push.send(json!({ "type": "message:new", "data": message }).to_string());
    Json(message).into_response()
}

async fn realtime(State(s): State<Shared>, headers: HeaderMap, ws: WebSocketUpgrade) -> Response {
    *s.ws_auth.lock().unwrap() = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    ws.on_upgrade(move |socket| serve_socket(socket, s))
}

async fn serve_socket(socket: WebSocket, s: Shared) {
    let (mut tx, mut rx) = socket.split();
    let mut push = s.push.subscribe();
    loop {
        tokio::select! {
            frame = rx.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => {
                    if let Ok(v) = serde_json::from_str::<Value>(text.as_str()) {
                        s.ws_frames.lock().unwrap().push(v);
                    }
                }
                Some(Ok(WsMessage::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            pushed = push.recv() => match pushed {
                Ok(text) => {
                    if tx.send(WsMessage::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
        }
    }
}
