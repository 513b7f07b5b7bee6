use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use futures_util::{SinkExt, StreamExt};
use maze_chase::clock::FrameClock;
use maze_chase::constants::FRAME_DURATION;
use maze_chase::engine::{choose_intent, Session, SessionOptions};
use maze_chase::rng::entropy_seed;
use maze_chase::server_protocol::{parse_client_message, ParsedClientMessage};
use maze_chase::server_utils::{parse_flag, parse_level, parse_seed, resolve_port};
use maze_chase::types::{PlayerIntent, SessionStatus};
use serde_json::{json, Value};
use tokio::sync::{mpsc, Mutex};
use tower_http::services::{ServeDir, ServeFile};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

type SharedState = Arc<Mutex<ServerState>>;

#[derive(Clone)]
struct ClientContext {
    tx: mpsc::Sender<OutboundMessage>,
}

#[derive(Clone, Debug)]
enum OutboundMessage {
    Text(String),
    Close { code: u16, reason: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QueuePolicy {
    DropOnFull,
    DisconnectOnFull,
}

struct ServerState {
    clients: HashMap<String, ClientContext>,
    session: Session,
    intent: PlayerIntent,
    autopilot: bool,
    clock: FrameClock,
    last_tick_at: Instant,
}

impl ServerState {
    fn new(session: Session, autopilot: bool) -> Self {
        Self {
            clients: HashMap::new(),
            session,
            intent: PlayerIntent::none(),
            autopilot,
            clock: FrameClock::new(FRAME_DURATION),
            last_tick_at: Instant::now(),
        }
    }
}

#[tokio::main]
async fn main() {
    let port = resolve_port(std::env::var("PORT").ok().as_deref());
    let seed = parse_seed(std::env::var("SEED").ok().as_deref()).unwrap_or_else(entropy_seed);
    let start_level = parse_level(std::env::var("START_LEVEL").ok().as_deref());
    let autopilot = parse_flag(std::env::var("AUTOPILOT").ok().as_deref());

    let session = Session::new(SessionOptions {
        seed,
        start_level,
        layout: None,
    })
    .expect("built-in layout should load");
    println!("[server] seed={seed} level={start_level} autopilot={autopilot}");

    let state = Arc::new(Mutex::new(ServerState::new(session, autopilot)));
    start_tick_loop(state.clone());

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/world", get(world_handler))
        .route("/ws", get(ws_handler))
        .with_state(state);

    let app = if let Some(static_dir) = resolve_static_dir() {
        let index_file = static_dir.join("index.html");
        println!(
            "[server] static file root: {}",
            static_dir.to_string_lossy()
        );
        app.fallback_service(
            ServeDir::new(static_dir).not_found_service(ServeFile::new(index_file)),
        )
    } else {
        eprintln!("[server] static file root not found. set STATIC_DIR to serve a renderer.");
        app
    };

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind server socket");

    println!("[server] listening on :{port}");
    axum::serve(listener, app)
        .await
        .expect("server runtime failed");
}

fn resolve_static_dir() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var("STATIC_DIR") {
        let path = PathBuf::from(raw);
        if path.join("index.html").is_file() {
            return Some(path);
        }
    }

    let candidates = [PathBuf::from("static"), PathBuf::from("web")];
    candidates
        .into_iter()
        .find(|path| path.join("index.html").is_file())
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn world_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let guard = state.lock().await;
    Json(guard.session.world_init())
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn handle_socket(state: SharedState, socket: WebSocket) {
    let client_id = make_id("client");
    let (tx, mut rx) = mpsc::channel::<OutboundMessage>(256);

    {
        let mut guard = state.lock().await;
        guard
            .clients
            .insert(client_id.clone(), ClientContext { tx: tx.clone() });
        send_welcome(&mut guard, &client_id);
        println!("[server] client connected: {client_id}");
    }

    let (mut ws_sender, mut ws_receiver) = socket.split();
    let writer = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            let should_close = matches!(outbound, OutboundMessage::Close { .. });
            let result = match outbound {
                OutboundMessage::Text(payload) => {
                    ws_sender.send(Message::Text(payload.into())).await
                }
                OutboundMessage::Close { code, reason } => {
                    let frame = CloseFrame {
                        code,
                        reason: reason.into(),
                    };
                    ws_sender.send(Message::Close(Some(frame))).await
                }
            };
            if result.is_err() || should_close {
                break;
            }
        }
    });

    while let Some(received) = ws_receiver.next().await {
        let Ok(message) = received else {
            break;
        };

        match message {
            Message::Text(raw) => {
                handle_client_message(state.clone(), &client_id, raw.to_string()).await;
            }
            Message::Binary(raw) => {
                if let Ok(text) = String::from_utf8(raw.to_vec()) {
                    handle_client_message(state.clone(), &client_id, text).await;
                } else {
                    send_error_to_client(&state, &client_id, "invalid utf8 message").await;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    handle_disconnect(state, &client_id).await;
    drop(tx);
    let _ = writer.await;
}

async fn handle_client_message(state: SharedState, client_id: &str, raw: String) {
    let Some(message) = parse_client_message(&raw) else {
        send_error_to_client(&state, client_id, "invalid message").await;
        return;
    };

    let mut guard = state.lock().await;
    match message {
        ParsedClientMessage::Input { keys } => {
            guard.intent = PlayerIntent::from_directions(keys);
        }
        ParsedClientMessage::Restart => {
            if guard.session.restart() {
                let level = guard.session.level();
                println!("[server] restarted at level {level}");
                let world = guard.session.world_init();
                broadcast(
                    &mut guard,
                    &json!({
                        "type": "level_started",
                        "level": level,
                        "world": world,
                    }),
                    QueuePolicy::DisconnectOnFull,
                );
            } else {
                send_to_client(
                    &mut guard,
                    client_id,
                    &json!({
                        "type": "error",
                        "message": "level still in progress",
                    }),
                    QueuePolicy::DropOnFull,
                );
            }
        }
        ParsedClientMessage::Ping { t } => {
            send_to_client(
                &mut guard,
                client_id,
                &json!({
                    "type": "pong",
                    "t": t,
                    "serverTimeMs": now_ms(),
                }),
                QueuePolicy::DropOnFull,
            );
        }
    }
}

async fn handle_disconnect(state: SharedState, client_id: &str) {
    let mut guard = state.lock().await;
    disconnect_client_internal(&mut guard, client_id);
}

fn disconnect_client_internal(state: &mut ServerState, client_id: &str) {
    let Some(client) = state.clients.remove(client_id) else {
        return;
    };
    let _ = client.tx.try_send(OutboundMessage::Close {
        code: 1000,
        reason: "bye".to_string(),
    });
    if state.clients.is_empty() {
        state.intent = PlayerIntent::none();
    }
    println!("[server] client disconnected: {client_id}");
}

fn send_welcome(state: &mut ServerState, client_id: &str) {
    let world = state.session.world_init();
    let snapshot = state.session.build_snapshot(false);
    let autopilot = state.autopilot;
    send_to_client(
        state,
        client_id,
        &json!({
            "type": "welcome",
            "clientId": client_id,
            "autopilot": autopilot,
            "world": world,
            "snapshot": snapshot,
        }),
        QueuePolicy::DisconnectOnFull,
    );
}

fn start_tick_loop(state: SharedState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(FRAME_DURATION);
        loop {
            interval.tick().await;
            let mut guard = state.lock().await;
            tick_game(&mut guard);
        }
    });
}

fn tick_game(state: &mut ServerState) {
    let now = Instant::now();
    let elapsed = now.duration_since(state.last_tick_at);
    state.last_tick_at = now;

    let due = state.clock.advance(elapsed);
    if due == 0 {
        return;
    }

    for _ in 0..due {
        let intent = if state.autopilot {
            choose_intent(&state.session)
        } else {
            state.intent
        };
        state.session.step(intent);

        if state.autopilot
            && state.session.status() != SessionStatus::Playing
            && state.session.player().is_animation_over()
        {
            state.session.restart();
        }
    }

    let snapshot = state.session.build_snapshot(true);
    broadcast(
        state,
        &json!({
            "type": "state",
            "snapshot": snapshot,
        }),
        QueuePolicy::DropOnFull,
    );
}

fn send_to_client(state: &mut ServerState, client_id: &str, message: &Value, policy: QueuePolicy) {
    let send_failed = if let Some(client) = state.clients.get(client_id) {
        client
            .tx
            .try_send(OutboundMessage::Text(message.to_string()))
            .is_err()
    } else {
        false
    };
    if send_failed && policy == QueuePolicy::DisconnectOnFull {
        disconnect_client_internal(state, client_id);
    }
}

fn broadcast(state: &mut ServerState, message: &Value, policy: QueuePolicy) {
    let payload = message.to_string();
    let mut failed_clients = Vec::new();
    for (client_id, client) in &state.clients {
        if client
            .tx
            .try_send(OutboundMessage::Text(payload.clone()))
            .is_err()
            && policy == QueuePolicy::DisconnectOnFull
        {
            failed_clients.push(client_id.clone());
        }
    }
    for client_id in failed_clients {
        disconnect_client_internal(state, &client_id);
    }
}

async fn send_error_to_client(state: &SharedState, client_id: &str, message: &str) {
    let mut guard = state.lock().await;
    send_to_client(
        &mut guard,
        client_id,
        &json!({
            "type": "error",
            "message": message,
        }),
        QueuePolicy::DropOnFull,
    );
}

fn make_id(prefix: &str) -> String {
    let seq = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{seq}")
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
