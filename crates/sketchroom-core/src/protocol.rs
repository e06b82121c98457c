//! Wire protocol and WebSocket client for collaboration.
//!
//! Messages are serde-tagged JSON; the scene payload is the ordered shape
//! list itself, so a whole-scene update is one message.

use crate::scene::Scene;
use serde::{Deserialize, Serialize};

/// Messages sent to the relay server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join a room (one room per document).
    Join { room: String },
    /// Leave the current room.
    Leave,
    /// Broadcast the full scene after a local edit.
    SceneUpdate { scene: Scene },
    /// Broadcast the local cursor position (scene coordinates).
    CursorUpdate {
        x: f64,
        y: f64,
        name: String,
        color: String,
    },
}

/// Messages received from the relay server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Confirm room join. Carries the channel identity the server assigned
    /// to this client and the room's last known scene, if any.
    Joined {
        room: String,
        peer_id: String,
        peer_count: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        scene: Option<Scene>,
    },
    /// A peer joined the room.
    PeerJoined { peer_id: String },
    /// A peer left the room.
    PeerLeft { peer_id: String },
    /// Full scene from a peer.
    SceneUpdate { from: String, scene: Scene },
    /// Cursor position from a peer.
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

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Events surfaced by the WebSocket client.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// Connected to the server.
    Connected,
    /// Disconnected from the server.
    Disconnected,
    /// Joined a room.
    Joined {
        room: String,
        peer_id: String,
        peer_count: usize,
        scene: Option<Scene>,
    },
    /// A peer joined the room.
    PeerJoined { peer_id: String },
    /// A peer left the room.
    PeerLeft { peer_id: String },
    /// Received a scene from a peer.
    SceneReceived { from: String, scene: Scene },
    /// Received a cursor position from a peer.
    CursorReceived {
        from: String,
        x: f64,
        y: f64,
        name: String,
        color: String,
    },
    /// Error occurred.
    Error { message: String },
}

impl From<ServerMessage> for SyncEvent {
    fn from(msg: ServerMessage) -> Self {
        match msg {
            ServerMessage::Joined {
                room,
                peer_id,
                peer_count,
                scene,
            } => SyncEvent::Joined {
                room,
                peer_id,
                peer_count,
                scene,
            },
            ServerMessage::PeerJoined { peer_id } => SyncEvent::PeerJoined { peer_id },
            ServerMessage::PeerLeft { peer_id } => SyncEvent::PeerLeft { peer_id },
            ServerMessage::SceneUpdate { from, scene } => SyncEvent::SceneReceived { from, scene },
            ServerMessage::CursorUpdate {
                from,
                x,
                y,
                name,
                color,
            } => SyncEvent::CursorReceived {
                from,
                x,
                y,
                name,
                color,
            },
            ServerMessage::Error { message } => SyncEvent::Error { message },
        }
    }
}

mod native_client {
    use super::*;
    use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
    use std::thread::{self, JoinHandle};
    use std::time::Duration;
    use tungstenite::{Message, connect};
    use url::Url;

    /// Commands sent to the WebSocket thread.
    enum WsCommand {
        Send(String),
        Close,
    }

    /// WebSocket client backed by a background I/O thread.
    ///
    /// Commands and events cross mpsc channels; the owner drains events
    /// with `poll_events` on its own loop, so nothing here blocks the UI.
    pub struct WebSocketClient {
        state: ConnectionState,
        events: Vec<SyncEvent>,
        /// Channel to send commands to the WebSocket thread.
        cmd_tx: Option<Sender<WsCommand>>,
        /// Channel to receive events from the WebSocket thread.
        event_rx: Option<Receiver<SyncEvent>>,
        /// Handle to the WebSocket thread.
        _thread: Option<JoinHandle<()>>,
    }

    impl WebSocketClient {
        /// Create a new disconnected client.
        pub fn new() -> Self {
            Self {
                state: ConnectionState::Disconnected,
                events: Vec::new(),
                cmd_tx: None,
                event_rx: None,
                _thread: None,
            }
        }

        /// Connect to a relay server.
        pub fn connect(&mut self, url: &str) -> Result<(), String> {
            if self.cmd_tx.is_some() {
                return Err("Already connected".to_string());
            }

            let parsed_url = Url::parse(url).map_err(|e| format!("Invalid URL: {}", e))?;
            if parsed_url.scheme() != "ws" && parsed_url.scheme() != "wss" {
                return Err(format!(
                    "Invalid WebSocket URL scheme: {}",
                    parsed_url.scheme()
                ));
            }

            self.state = ConnectionState::Connecting;

            let (cmd_tx, cmd_rx) = channel::<WsCommand>();
            let (event_tx, event_rx) = channel::<SyncEvent>();

            let url = url.to_string();

            let handle = thread::spawn(move || {
                log::info!("WebSocket thread: connecting to {}", url);

                match connect(&url) {
                    Ok((mut socket, response)) => {
                        log::info!("WebSocket connected, status: {}", response.status());
                        let _ = event_tx.send(SyncEvent::Connected);

                        // Read timeout keeps the command poll responsive
                        {
                            let stream = socket.get_mut();
                            match stream {
                                tungstenite::stream::MaybeTlsStream::Plain(tcp) => {
                                    let _ =
                                        tcp.set_read_timeout(Some(Duration::from_millis(50)));
                                    let _ = tcp.set_write_timeout(Some(Duration::from_secs(5)));
                                }
                                #[allow(unreachable_patterns)]
                                _ => {
                                    log::debug!("TLS stream - relying on WouldBlock handling");
                                }
                            }
                        }

                        loop {
                            // Check for commands (non-blocking)
                            match cmd_rx.try_recv() {
                                Ok(WsCommand::Send(msg)) => {
                                    if let Err(e) = socket.send(Message::Text(msg)) {
                                        log::error!("WebSocket send error: {}", e);
                                        break;
                                    }
                                }
                                Ok(WsCommand::Close) => {
                                    let _ = socket.close(None);
                                    break;
                                }
                                Err(TryRecvError::Disconnected) => break,
                                Err(TryRecvError::Empty) => {}
                            }

                            // Check for incoming messages (with timeout)
                            match socket.read() {
                                Ok(Message::Text(txt)) => {
                                    match serde_json::from_str::<ServerMessage>(&txt) {
                                        Ok(server_msg) => {
                                            let _ = event_tx.send(server_msg.into());
                                        }
                                        Err(e) => {
                                            // Malformed payloads are dropped, never applied
                                            log::warn!("Dropping malformed server message: {}", e);
                                        }
                                    }
                                }
                                Ok(Message::Ping(data)) => {
                                    let _ = socket.send(Message::Pong(data));
                                }
                                Ok(Message::Close(_)) => break,
                                Ok(_) => {} // Ignore binary, pong
                                Err(tungstenite::Error::Io(ref e))
                                    if e.kind() == std::io::ErrorKind::WouldBlock
                                        || e.kind() == std::io::ErrorKind::TimedOut =>
                                {
                                    continue;
                                }
                                Err(e) => {
                                    log::error!("WebSocket read error: {}", e);
                                    break;
                                }
                            }
                        }

                        log::info!("WebSocket thread exiting");
                        let _ = event_tx.send(SyncEvent::Disconnected);
                    }
                    Err(e) => {
                        log::error!("WebSocket connection failed: {}", e);
                        let _ = event_tx.send(SyncEvent::Error {
                            message: format!("Connection failed: {}", e),
                        });
                    }
                }
            });

            self.cmd_tx = Some(cmd_tx);
            self.event_rx = Some(event_rx);
            self._thread = Some(handle);

            Ok(())
        }

        /// Disconnect from the server.
        pub fn disconnect(&mut self) {
            if let Some(tx) = self.cmd_tx.take() {
                let _ = tx.send(WsCommand::Close);
            }
            self.event_rx = None;
            self._thread = None;
            self.state = ConnectionState::Disconnected;
        }

        /// Queue a text message for sending.
        pub fn send(&self, msg: &str) -> Result<(), String> {
            if let Some(ref tx) = self.cmd_tx {
                tx.send(WsCommand::Send(msg.to_string()))
                    .map_err(|e| format!("Send failed: {}", e))
            } else {
                Err("Not connected".to_string())
            }
        }

        /// Poll for pending events (non-blocking).
        pub fn poll_events(&mut self) -> Vec<SyncEvent> {
            if let Some(ref rx) = self.event_rx {
                while let Ok(event) = rx.try_recv() {
                    match &event {
                        SyncEvent::Connected => self.state = ConnectionState::Connected,
                        SyncEvent::Disconnected => self.state = ConnectionState::Disconnected,
                        SyncEvent::Error { .. } => self.state = ConnectionState::Error,
                        _ => {}
                    }
                    self.events.push(event);
                }
            }

            std::mem::take(&mut self.events)
        }

        /// Get current connection state.
        pub fn state(&self) -> ConnectionState {
            self.state
        }

        /// Check if connected.
        pub fn is_connected(&self) -> bool {
            self.state == ConnectionState::Connected
        }
    }

    impl Default for WebSocketClient {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Drop for WebSocketClient {
        fn drop(&mut self) {
            self.disconnect();
        }
    }
}

pub use native_client::WebSocketClient;
