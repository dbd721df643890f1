//! In-process stand-in for the chat backend.
//!
//! Records every request as "METHOD /path" so tests can assert exactly
//! which calls a client operation made.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::broadcast;
use whatgram_client::{Client, ClientConfig};
use whatgram_store::Database;

pub const PHONE: &str = "+905551234567";
pub const CODE: &str = "123456";
pub const USER_ID: &str = "user-4567";
pub const TOKEN: &str = "token-user-4567";

pub struct MockState {
    hits: Mutex<HashMap<String, usize>>,
    uploads: Mutex<Vec<String>>,
    failing_uploads: Mutex<HashSet<String>>,
    reject_tokens: AtomicBool,
    ws_clients: AtomicUsize,
    push_tx: broadcast::Sender<String>,
}

type Shared = Arc<MockState>;

pub struct MockBackend {
    pub url: String,
    state: Shared,
}

impl MockBackend {
    pub async fn start() -> Self {
        let (push_tx, _) = broadcast::channel(16);
        let state = Arc::new(MockState {
            hits: Mutex::new(HashMap::new()),
            uploads: Mutex::new(Vec::new()),
            failing_uploads: Mutex::new(HashSet::new()),
            reject_tokens: AtomicBool::new(false),
            ws_clients: AtomicUsize::new(0),
            push_tx,
        });

        let api = Router::new()
            .route("/auth/request-code", post(request_code))
            .route("/auth/verify-code", post(verify_code))
            .route("/user/language-settings", get(get_language_settings).post(save_language_settings))
            .route("/languages", get(languages))
            .route("/translate", post(translate))
            .route("/contacts", get(contacts))
            .route("/groups", get(groups).post(create_group))
            .route("/groups/{id}/members", post(group_members))
            .route("/channels", get(channels).post(create_channel))
            .route("/channels/{id}/subscribe", post(subscribe))
            .route("/conversations", get(conversations).post(open_conversation))
            .route("/conversations/{id}/messages", get(messages))
            .route("/messages", post(send_message))
            .route("/upload", post(upload))
            .route("/connect/{platform}", post(connect))
            .route("/init-mock-data", post(init_mock_data))
            .route("/unified-inbox", get(unified_inbox))
            .route("/inbox-stats", get(inbox_stats));

        let app = Router::new()
            .nest("/api", api)
            .route("/ws/{user_id}", get(ws_handler))
            .layer(middleware::from_fn_with_state(state.clone(), record_and_authorize))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { url: format!("http://{}", addr), state }
    }

    pub fn config(&self, state_path: PathBuf) -> ClientConfig {
        ClientConfig {
            state_path,
            ..ClientConfig::default().with_backend(self.url.clone())
        }
    }

    /// Client over an in-memory store.
    pub fn client(&self) -> Client {
        let config = self.config(PathBuf::from(":memory:"));
        Client::new(config, Database::open_in_memory().unwrap()).unwrap()
    }

    pub fn hits(&self, route: &str) -> usize {
        self.state.hits.lock().unwrap().get(route).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.state.hits.lock().unwrap().values().sum()
    }

    pub fn uploads(&self) -> Vec<String> {
        self.state.uploads.lock().unwrap().clone()
    }

    pub fn fail_upload(&self, file_name: &str) {
        self.state.failing_uploads.lock().unwrap().insert(file_name.to_string());
    }

    /// Answer every authenticated call with 401 from now on.
    pub fn reject_tokens(&self) {
        self.state.reject_tokens.store(true, Ordering::SeqCst);
    }

    pub fn push(&self, event: Value) {
        self.state.push_tx.send(event.to_string()).unwrap();
    }

    pub async fn wait_for_ws_client(&self) {
        for _ in 0..200 {
            if self.state.ws_clients.load(Ordering::SeqCst) > 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no WebSocket client connected");
    }

    pub async fn wait_for_ws_disconnect(&self) {
        for _ in 0..200 {
            if self.state.ws_clients.load(Ordering::SeqCst) == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("WebSocket client still connected");
    }
}

/// Log in through the OTP flow against `backend`.
pub async fn login(client: &Client) {
    let auth = client.auth();
    auth.restore_session().unwrap();
    auth.request_code(PHONE).await.unwrap();
    auth.verify_code(PHONE, CODE).await.unwrap();
}

pub fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("whatgram_{}_{}", label, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn user_json(phone: &str) -> Value {
    json!({
        "id": USER_ID,
        "username": "user_4567",
        "phone": phone,
        "interface_language": "tr",
        "preferred_language": "tr",
        "auto_translate": true,
        "whatsapp_connected": false,
        "telegram_connected": false,
        "is_verified": true,
        "created_at": "2024-05-01T10:20:30.123456"
    })
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

async fn record_and_authorize(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let route = format!("{} {}", req.method(), path);
    *state.hits.lock().unwrap().entry(route).or_default() += 1;

    let public = path.starts_with("/api/auth/") || path.starts_with("/ws/");
    if !public {
        let bearer = format!("Bearer {}", TOKEN);
        let authorized = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == bearer);
        if !authorized || state.reject_tokens.load(Ordering::SeqCst) {
            return detail(StatusCode::UNAUTHORIZED, "Could not validate credentials");
        }
    }

    next.run(req).await
}

async fn request_code(Json(body): Json<Value>) -> Response {
    let phone = body["phone"].as_str().unwrap_or_default();
    if phone.is_empty() {
        return detail(StatusCode::BAD_REQUEST, "Phone number required");
    }
    Json(json!({
        "message": "Verification code sent",
        "phone": phone,
        "expires_in": 300
    }))
    .into_response()
}

async fn verify_code(Json(body): Json<Value>) -> Response {
    if body["code"] != CODE {
        return detail(StatusCode::BAD_REQUEST, "Invalid or expired verification code");
    }
    let phone = body["phone"].as_str().unwrap_or_default();
    Json(json!({
        "access_token": TOKEN,
        "token_type": "bearer",
        "user": user_json(phone)
    }))
    .into_response()
}

async fn get_language_settings() -> Json<Value> {
    Json(json!({
        "interface_language": "tr",
        "preferred_language": "tr",
        "auto_translate": true,
        "supported_languages": {"tr": "Türkçe", "en": "English"}
    }))
}

async fn save_language_settings(Json(body): Json<Value>) -> Response {
    if body["interface_language"] == "xx" {
        return detail(StatusCode::BAD_REQUEST, "Unsupported interface language");
    }
    Json(json!({"message": "Language settings updated successfully"})).into_response()
}

async fn languages() -> Json<Value> {
    Json(json!({"languages": {"tr": "Türkçe", "en": "English"}, "total": 2}))
}

async fn translate(Json(body): Json<Value>) -> Json<Value> {
    let text = body["text"].as_str().unwrap_or_default();
    let target = body["target_language"].as_str().unwrap_or_default();
    Json(json!({
        "translated_text": format!("[{}] {}", target, text),
        "source_language": body["source_language"],
        "target_language": target
    }))
}

fn platform_of(query: &HashMap<String, String>) -> String {
    query.get("platform").cloned().unwrap_or_else(|| "whatsapp".into())
}

async fn contacts(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let platform = platform_of(&query);
    Json(json!([
        {"id": "c-ayse", "name": "Ayşe", "phone": "+905550000001", "platform": platform, "is_online": true},
        {"id": "c-mehmet", "name": "Mehmet", "phone": "+905550000002", "platform": platform}
    ]))
}

async fn groups(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let platform = platform_of(&query);
    Json(json!([
        {"id": "g-family", "name": "Aile", "platform": platform, "member_count": 3, "member_ids": [USER_ID]},
        {"id": "g-orphan", "name": "Boş", "platform": platform}
    ]))
}

async fn channels(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let platform = platform_of(&query);
    Json(json!([
        {"id": "ch-news", "name": "Haberler", "platform": platform, "subscriber_count": 1200}
    ]))
}

async fn create_group(Json(body): Json<Value>) -> Json<Value> {
    let members = body["member_phones"].as_array().map(|a| a.len()).unwrap_or(0);
    Json(json!({
        "id": "g-new",
        "name": body["name"],
        "description": body["description"],
        "platform": body["platform"],
        "is_public": body["is_public"],
        "member_count": members as u64 + 1,
        "creator_id": USER_ID
    }))
}

async fn create_channel(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "id": "ch-new",
        "name": body["name"],
        "platform": body["platform"],
        "is_public": body["is_public"],
        "can_subscribers_message": body["can_subscribers_message"],
        "subscriber_count": 1
    }))
}

async fn group_members(Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    if body["group_id"] != id.as_str() {
        return detail(StatusCode::BAD_REQUEST, "group id mismatch");
    }
    Json(json!({"message": format!("{} done", body["action"]), "member_count": 4})).into_response()
}

async fn subscribe(Path(_id): Path<String>) -> Json<Value> {
    Json(json!({"message": "Subscribed to channel", "subscriber_count": 1201}))
}

async fn conversations(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let platform = platform_of(&query);
    Json(json!([
        {"id": "conv-g-family", "participant_ids": [USER_ID], "platform": platform,
         "conversation_type": "group", "group_id": "g-family"},
        {"id": "conv-ch-news", "participant_ids": [USER_ID], "platform": platform,
         "conversation_type": "channel", "channel_id": "ch-news"}
    ]))
}

async fn open_conversation(Query(query): Query<HashMap<String, String>>) -> Response {
    let Some(participant) = query.get("participant_id") else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "participant_id required");
    };
    Json(json!({
        "id": format!("conv-{}", participant),
        "participant_ids": [USER_ID, participant],
        "platform": platform_of(&query)
    }))
    .into_response()
}

async fn messages(Path(id): Path<String>) -> Json<Value> {
    Json(json!([
        {"id": format!("{}-m1", id), "conversation_id": id, "sender_id": "c-ayse", "receiver_id": USER_ID,
         "content": "Good morning", "timestamp": "2024-05-01T10:20:30.123", "platform": "whatsapp",
         "auto_detected_language": "en", "translations": {"de": "Guten Morgen"}},
        {"id": format!("{}-m2", id), "conversation_id": id, "sender_id": USER_ID, "receiver_id": "c-ayse",
         "content": "Günaydın", "timestamp": "2024-05-01T10:21:00Z", "platform": "whatsapp",
         "auto_detected_language": "tr"}
    ]))
}

async fn send_message(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "id": "m-sent",
        "conversation_id": body["conversation_id"],
        "sender_id": USER_ID,
        "receiver_id": body["receiver_id"],
        "content": body["content"],
        "timestamp": "2024-05-01T10:22:00",
        "platform": body["platform"]
    }))
}

async fn upload(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    let mut file_name = None;
    let mut size = 0;
    let mut conversation_id = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name() {
            Some("file") => {
                file_name = field.file_name().map(str::to_string);
                size = field.bytes().await.map(|b| b.len()).unwrap_or(0);
            }
            Some("conversation_id") => conversation_id = field.text().await.ok(),
            _ => {}
        }
    }

    let (Some(file_name), Some(_)) = (file_name, conversation_id) else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "file and conversation_id required");
    };
    state.uploads.lock().unwrap().push(file_name.clone());

    if state.failing_uploads.lock().unwrap().contains(&file_name) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "File upload failed: disk full");
    }

    Json(json!({
        "message": "File uploaded successfully",
        "file_message": {
            "original_name": file_name,
            "file_path": format!("/uploads/{}", file_name),
            "file_size": size,
            "mime_type": "application/octet-stream"
        },
        "message_id": format!("m-{}", file_name),
        "message_type": "file"
    }))
    .into_response()
}

async fn connect(Path(platform): Path<String>) -> Response {
    match platform.as_str() {
        "whatsapp" | "telegram" => Json(json!({
            "message": format!("{} connected successfully", platform),
            "status": "connected"
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn init_mock_data() -> Json<Value> {
    Json(json!({"message": "Mock data initialized"}))
}

async fn unified_inbox(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let limit: usize = query.get("limit").and_then(|v| v.parse().ok()).unwrap_or(50);
    let offset: usize = query.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let all = vec![
        json!({"id": "in-1", "content": "Günaydın", "original_content": "Good morning", "platform": "whatsapp",
               "timestamp": "2024-05-01T10:20:30", "message_type": "text", "is_sent": false,
               "chat_info": {"type": "individual", "name": "Ayşe", "phone": "+905551111111"},
               "conversation_id": "conv-c-ayse", "auto_detected_language": "en", "has_translation": true}),
        json!({"id": "in-2", "file_message": {"original_name": "plan.pdf", "file_path": "/uploads/plan.pdf",
               "file_size": 2048, "mime_type": "application/pdf"}, "platform": "telegram",
               "timestamp": "2024-05-01T09:00:00Z", "message_type": "file", "is_sent": true,
               "chat_info": {"type": "channel", "name": "News", "subscriber_count": 1200},
               "conversation_id": "conv-ch-news"}),
        json!({"id": "in-3", "content": "Selam", "platform": "whatgram", "timestamp": "2024-05-01T08:00:00",
               "conversation_id": "conv-g-family"}),
    ];
    let total = all.len();
    let page: Vec<Value> = all.into_iter().skip(offset).take(limit).collect();
    Json(json!({"messages": page, "total": total, "offset": offset, "limit": limit, "user_language": "tr"}))
}

async fn inbox_stats() -> Json<Value> {
    Json(json!({
        "platform_stats": [{"_id": "whatsapp", "count": 5}, {"_id": "telegram", "count": 2}],
        "unread_count": 0,
        "chat_counts": {"individual": 2, "groups": 1, "channels": 1, "total": 4},
        "supported_platforms": ["whatsapp", "telegram", "whatgram"]
    }))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(_user_id): Path<String>,
    State(state): State<Shared>,
) -> Response {
    ws.on_upgrade(move |socket| serve_socket(socket, state))
}

async fn serve_socket(mut socket: WebSocket, state: Shared) {
    let mut pushes = state.push_tx.subscribe();
    state.ws_clients.fetch_add(1, Ordering::SeqCst);

    loop {
        tokio::select! {
            push = pushes.recv() => {
                let Ok(text) = push else { break };
                if socket.send(WsMessage::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => match incoming {
                Some(Ok(WsMessage::Text(text))) => {
                    let echo = format!("Message received: {}", text.as_str());
                    if socket.send(WsMessage::Text(echo.into())).await.is_err() {
                        break;
                    }
                }
                Some(Ok(WsMessage::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            },
        }
    }

    state.ws_clients.fetch_sub(1, Ordering::SeqCst);
}
