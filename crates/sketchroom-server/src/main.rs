//! Sketchroom WebSocket relay server.
//!
//! Fans scene and cursor updates out to the peers of a room (one room per
//! document). The relay never interprets shape payloads; the scene travels
//! as opaque JSON and the last version is kept per room so new joiners
//! start from the current state.
//!
//! ## Protocol
//!
//! Messages are JSON with the following format:
//! ```json
//! { "type": "join", "room": "doc-id" }
//! { "type": "scene_update", "scene": [ ... ] }
//! { "type": "cursor_update", "x": 100, "y": 200, "name": "ada", "color": "#e6194b" }
//! ```

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, net::SocketAddr, sync::Arc};
use tokio::sync::broadcast;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 256;

/// A message sent by clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join a room.
    Join { room: String },
    /// Leave current room.
    Leave,
    /// Full scene after a local edit (opaque to the relay).
    SceneUpdate { scene: serde_json::Value },
    /// Cursor position in scene coordinates.
    CursorUpdate {
        x: f64,
        y: f64,
        name: String,
        color: String,
    },
}

/// A message broadcast to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Confirm room join. Tells the joiner its assigned peer id and the
    /// room's last known scene, if any.
    Joined {
        room: String,
        peer_id: String,
        peer_count: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        scene: Option<serde_json::Value>,
    },
    /// Peer joined the room.
    PeerJoined { peer_id: String },
    /// Peer left the room.
    PeerLeft { peer_id: String },
    /// Scene from another peer.
    SceneUpdate {
        from: String,
        scene: serde_json::Value,
    },
    /// Cursor position from another peer.
    CursorUpdate {
        from: String,
        x: f64,
        y: f64,
        name: String,
        color: String,
    },
    /// Error message.
    Error { message: String },
}

/// Room state.
struct Room {
    /// Broadcast channel for this room.
    tx: broadcast::Sender<(String, ServerMessage)>,
    /// Connected peer IDs.
    peers: HashSet<String>,
    /// Last scene (for new joiners).
    last_scene: Option<serde_json::Value>,
}

impl Room {
    fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            peers: HashSet::new(),
            last_scene: None,
        }
    }
}

/// Shared application state.
struct AppState {
    /// Active rooms.
    rooms: DashMap<String, Room>,
}

impl AppState {
    fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Add peer to room, returning its broadcast receiver, the room's last
    /// scene, and the new peer count.
    fn join_room(
        &self,
        room_id: &str,
        peer_id: &str,
    ) -> (
        broadcast::Receiver<(String, ServerMessage)>,
        Option<serde_json::Value>,
        usize,
    ) {
        let mut room = self
            .rooms
            .entry(room_id.to_string())
            .or_insert_with(Room::new);
        room.peers.insert(peer_id.to_string());
        let rx = room.tx.subscribe();
        let last_scene = room.last_scene.clone();
        let peer_count = room.peers.len();
        (rx, last_scene, peer_count)
    }

    /// Remove peer from room; empty rooms are dropped.
    fn leave_room(&self, room_id: &str, peer_id: &str) {
        if let Some(mut room) = self.rooms.get_mut(room_id) {
            room.peers.remove(peer_id);
            if room.peers.is_empty() {
                drop(room);
                self.rooms.remove(room_id);
            }
        }
    }

    /// Update room's last scene.
    fn update_scene(&self, room_id: &str, scene: serde_json::Value) {
        if let Some(mut room) = self.rooms.get_mut(room_id) {
            room.last_scene = Some(scene);
        }
    }

    /// Broadcast message to room.
    fn broadcast(&self, room_id: &str, from: &str, msg: ServerMessage) {
        if let Some(room) = self.rooms.get(room_id) {
            let _ = room.tx.send((from.to_string(), msg));
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sketchroom_server=info,tower_http=info".into()),
        )
        .init();

    let state = Arc::new(AppState::new());

    let app = Router::new()
        .route("/", get(index))
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3030));
    info!("Sketchroom relay server listening on {}", addr);
    info!("WebSocket endpoint: ws://localhost:3030/ws");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Index page.
async fn index() -> &'static str {
    "Sketchroom Relay Server - Connect via WebSocket at /ws"
}

/// Health check.
async fn health() -> &'static str {
    "ok"
}

/// WebSocket upgrade handler.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let peer_id = Uuid::new_v4().to_string();
    info!("New connection: {}", peer_id);

    let (mut sender, mut receiver) = socket.split();
    let mut current_room: Option<String> = None;
    let mut room_rx: Option<broadcast::Receiver<(String, ServerMessage)>> = None;

    loop {
        tokio::select! {
            // Handle incoming messages from client
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                match client_msg {
                                    ClientMessage::Join { room } => {
                                        // Leave current room if any
                                        if let Some(ref old_room) = current_room {
                                            state.leave_room(old_room, &peer_id);
                                            state.broadcast(old_room, &peer_id, ServerMessage::PeerLeft {
                                                peer_id: peer_id.clone(),
                                            });
                                        }

                                        // Join new room
                                        let (rx, scene, peer_count) = state.join_room(&room, &peer_id);
                                        room_rx = Some(rx);
                                        current_room = Some(room.clone());

                                        // Send joined confirmation
                                        let joined = ServerMessage::Joined {
                                            room: room.clone(),
                                            peer_id: peer_id.clone(),
                                            peer_count,
                                            scene,
                                        };
                                        if sender.send(Message::Text(serde_json::to_string(&joined).unwrap().into())).await.is_err() {
                                            break;
                                        }

                                        // Notify others
                                        state.broadcast(&room, &peer_id, ServerMessage::PeerJoined {
                                            peer_id: peer_id.clone(),
                                        });

                                        info!("Peer {} joined room {}", peer_id, room);
                                    }
                                    ClientMessage::Leave => {
                                        if let Some(ref room) = current_room {
                                            state.leave_room(room, &peer_id);
                                            state.broadcast(room, &peer_id, ServerMessage::PeerLeft {
                                                peer_id: peer_id.clone(),
                                            });
                                            info!("Peer {} left room {}", peer_id, room);
                                        }
                                        current_room = None;
                                        room_rx = None;
                                    }
                                    ClientMessage::SceneUpdate { scene } => {
                                        if let Some(ref room) = current_room {
                                            // Keep as the room's current state for new joiners
                                            state.update_scene(room, scene.clone());
                                            // Broadcast to others
                                            state.broadcast(room, &peer_id, ServerMessage::SceneUpdate {
                                                from: peer_id.clone(),
                                                scene,
                                            });
                                        }
                                    }
                                    ClientMessage::CursorUpdate { x, y, name, color } => {
                                        if let Some(ref room) = current_room {
                                            state.broadcast(room, &peer_id, ServerMessage::CursorUpdate {
                                                from: peer_id.clone(),
                                                x,
                                                y,
                                                name,
                                                color,
                                            });
                                        }
                                    }
                                }
                            }
                            Err(e) => {
                                warn!("Invalid message from {}: {}", peer_id, e);
                                let err = ServerMessage::Error {
                                    message: format!("Invalid message: {}", e),
                                };
                                let _ = sender.send(Message::Text(serde_json::to_string(&err).unwrap().into())).await;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        break;
                    }
                    Some(Ok(_)) => {} // Ignore binary, ping, pong
                    Some(Err(e)) => {
                        warn!("WebSocket error for {}: {}", peer_id, e);
                        break;
                    }
                }
            }

            // Handle broadcast messages from room
            msg = async {
                match &mut room_rx {
                    Some(rx) => rx.recv().await.ok(),
                    None => {
                        // No room joined, just wait forever
                        std::future::pending::<Option<(String, ServerMessage)>>().await
                    }
                }
            } => {
                if let Some((from, server_msg)) = msg {
                    // Don't echo back to sender
                    if from != peer_id {
                        let json = serde_json::to_string(&server_msg).unwrap();
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }

    // Cleanup on disconnect
    if let Some(ref room) = current_room {
        state.leave_room(room, &peer_id);
        state.broadcast(room, &peer_id, ServerMessage::PeerLeft {
            peer_id: peer_id.clone(),
        });
    }
    info!("Connection closed: {}", peer_id);
}
