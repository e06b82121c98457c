//! Collaboration session: room membership, outbound updates, remote state.

use crate::protocol::{ClientMessage, ConnectionState, SyncEvent, WebSocketClient};
use crate::scene::Scene;
use kurbo::Point;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

/// Remote cursors not refreshed within this window are dropped.
pub const CURSOR_TTL: Duration = Duration::from_secs(10);

/// Display colors assigned to sessions.
const CURSOR_PALETTE: [&str; 8] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#42d4f4", "#f032e6", "#9a6324",
];

/// Errors raised while establishing a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("connection failed: {0}")]
    Connect(String),
}

/// A peer's cursor as last reported.
#[derive(Debug, Clone)]
pub struct RemoteCursor {
    pub position: Point,
    pub name: String,
    pub color: String,
    last_seen: Instant,
}

/// Events the host reacts to after draining [`CollabSession::poll`].
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Connected,
    Disconnected,
    /// Joined the room; carries the room's last scene when one exists.
    Joined {
        peer_count: usize,
        scene: Option<Scene>,
    },
    PeerJoined(String),
    PeerLeft(String),
    /// A peer's scene replaces ours wholesale (last-writer-wins).
    SceneReplaced(Scene),
    Error(String),
}

/// Handle for one collaborative editing session.
///
/// Owns the socket, the outbound sends, and the remote cursor map. Created
/// with [`connect`](Self::connect) and torn down with
/// [`close`](Self::close); dropping the session closes it too.
pub struct CollabSession {
    socket: WebSocketClient,
    session_id: Uuid,
    room: String,
    name: String,
    color: String,
    /// Our channel identity, learned from the `joined` reply. Used to
    /// suppress echoes of our own updates.
    peer_id: Option<String>,
    peer_count: usize,
    cursors: HashMap<String, RemoteCursor>,
}

impl CollabSession {
    /// Connect to a relay server and join the document's room.
    pub fn connect(
        url: &str,
        document_id: &str,
        display_name: &str,
    ) -> Result<Self, SessionError> {
        let mut socket = WebSocketClient::new();
        socket.connect(url).map_err(SessionError::Connect)?;

        let session_id = Uuid::new_v4();
        let color = pick_color(session_id);
        let mut session = Self {
            socket,
            session_id,
            room: document_id.to_string(),
            name: display_name.to_string(),
            color: color.to_string(),
            peer_id: None,
            peer_count: 0,
            cursors: HashMap::new(),
        };
        session.send(&ClientMessage::Join {
            room: session.room.clone(),
        });
        Ok(session)
    }

    /// Leave the room and detach from the server.
    pub fn close(&mut self) {
        self.send(&ClientMessage::Leave);
        self.socket.disconnect();
        self.cursors.clear();
        self.peer_id = None;
        self.peer_count = 0;
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn state(&self) -> ConnectionState {
        self.socket.state()
    }

    pub fn is_connected(&self) -> bool {
        self.socket.is_connected()
    }

    /// Peers currently in the room, including us once joined.
    pub fn peer_count(&self) -> usize {
        self.peer_count
    }

    /// The remote cursor map, keyed by peer id.
    pub fn cursors(&self) -> &HashMap<String, RemoteCursor> {
        &self.cursors
    }

    /// Broadcast the full scene after a local edit.
    pub fn send_scene(&mut self, scene: &Scene) {
        self.send(&ClientMessage::SceneUpdate {
            scene: scene.clone(),
        });
    }

    /// Broadcast the local cursor position (scene coordinates).
    pub fn send_cursor(&mut self, position: Point) {
        self.send(&ClientMessage::CursorUpdate {
            x: position.x,
            y: position.y,
            name: self.name.clone(),
            color: self.color.clone(),
        });
    }

    /// Drain socket events, update remote state, and surface what the host
    /// must react to. Also expires stale cursors.
    pub fn poll(&mut self) -> Vec<SessionEvent> {
        let events = self.socket.poll_events();
        let mut out = Vec::new();
        for event in events {
            if let Some(e) = self.handle_event(event) {
                out.push(e);
            }
        }
        self.prune_stale_cursors(Instant::now());
        out
    }

    fn handle_event(&mut self, event: SyncEvent) -> Option<SessionEvent> {
        match event {
            SyncEvent::Connected => Some(SessionEvent::Connected),
            SyncEvent::Disconnected => {
                self.cursors.clear();
                self.peer_id = None;
                self.peer_count = 0;
                Some(SessionEvent::Disconnected)
            }
            SyncEvent::Joined {
                peer_id,
                peer_count,
                scene,
                ..
            } => {
                self.peer_id = Some(peer_id);
                self.peer_count = peer_count;
                Some(SessionEvent::Joined { peer_count, scene })
            }
            SyncEvent::PeerJoined { peer_id } => {
                self.peer_count += 1;
                Some(SessionEvent::PeerJoined(peer_id))
            }
            SyncEvent::PeerLeft { peer_id } => {
                self.cursors.remove(&peer_id);
                self.peer_count = self.peer_count.saturating_sub(1);
                Some(SessionEvent::PeerLeft(peer_id))
            }
            SyncEvent::SceneReceived { from, scene } => {
                if self.peer_id.as_deref() == Some(from.as_str()) {
                    // Our own update reflected back: never re-apply
                    log::debug!("Suppressing scene echo from {}", from);
                    return None;
                }
                Some(SessionEvent::SceneReplaced(scene))
            }
            SyncEvent::CursorReceived {
                from,
                x,
                y,
                name,
                color,
            } => {
                if self.peer_id.as_deref() == Some(from.as_str()) {
                    return None;
                }
                self.cursors.insert(
                    from,
                    RemoteCursor {
                        position: Point::new(x, y),
                        name,
                        color,
                        last_seen: Instant::now(),
                    },
                );
                None
            }
            SyncEvent::Error { message } => {
                log::warn!("Session error: {}", message);
                Some(SessionEvent::Error(message))
            }
        }
    }

    /// Drop cursors older than [`CURSOR_TTL`] as of `now`.
    pub fn prune_stale_cursors(&mut self, now: Instant) {
        self.cursors
            .retain(|_, c| now.duration_since(c.last_seen) < CURSOR_TTL);
    }

    fn send(&mut self, msg: &ClientMessage) {
        let json = match serde_json::to_string(msg) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to encode message: {}", e);
                return;
            }
        };
        if let Err(e) = self.socket.send(&json) {
            // Fire-and-forget: editing continues local-only
            log::warn!("Send failed, continuing offline: {}", e);
        }
    }
}

impl Drop for CollabSession {
    fn drop(&mut self) {
        self.close();
    }
}

fn pick_color(session_id: Uuid) -> &'static str {
    let index = (session_id.as_u128() % CURSOR_PALETTE.len() as u128) as usize;
    CURSOR_PALETTE[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, Shape};

    /// A session as it looks after the server's `joined` reply, without a
    /// live socket.
    fn joined_session() -> CollabSession {
        let session_id = Uuid::new_v4();
        let mut session = CollabSession {
            socket: WebSocketClient::new(),
            session_id,
            room: "doc-1".to_string(),
            name: "ada".to_string(),
            color: pick_color(session_id).to_string(),
            peer_id: None,
            peer_count: 0,
            cursors: HashMap::new(),
        };
        session.handle_event(SyncEvent::Joined {
            room: "doc-1".to_string(),
            peer_id: "me".to_string(),
            peer_count: 1,
            scene: None,
        });
        session
    }

    fn one_shape_scene() -> Scene {
        let mut scene = Scene::new();
        scene.push(Shape::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0)));
        scene
    }

    #[test]
    fn test_own_scene_echo_suppressed() {
        let mut session = joined_session();
        let event = session.handle_event(SyncEvent::SceneReceived {
            from: "me".to_string(),
            scene: one_shape_scene(),
        });
        assert!(event.is_none());
    }

    #[test]
    fn test_peer_scene_applied() {
        let mut session = joined_session();
        let event = session.handle_event(SyncEvent::SceneReceived {
            from: "peer-2".to_string(),
            scene: one_shape_scene(),
        });
        match event {
            Some(SessionEvent::SceneReplaced(scene)) => assert_eq!(scene.len(), 1),
            other => panic!("Expected SceneReplaced, got {:?}", other),
        }
    }

    #[test]
    fn test_cursor_tracking_and_peer_left() {
        let mut session = joined_session();
        session.handle_event(SyncEvent::CursorReceived {
            from: "peer-2".to_string(),
            x: 10.0,
            y: 20.0,
            name: "bob".to_string(),
            color: "#3cb44b".to_string(),
        });
        assert_eq!(session.cursors().len(), 1);
        let cursor = &session.cursors()["peer-2"];
        assert_eq!(cursor.position, Point::new(10.0, 20.0));
        assert_eq!(cursor.name, "bob");

        session.handle_event(SyncEvent::PeerLeft {
            peer_id: "peer-2".to_string(),
        });
        assert!(session.cursors().is_empty());
    }

    #[test]
    fn test_own_cursor_ignored() {
        let mut session = joined_session();
        session.handle_event(SyncEvent::CursorReceived {
            from: "me".to_string(),
            x: 1.0,
            y: 1.0,
            name: "ada".to_string(),
            color: "#e6194b".to_string(),
        });
        assert!(session.cursors().is_empty());
    }

    #[test]
    fn test_stale_cursor_expiry() {
        let mut session = joined_session();
        session.handle_event(SyncEvent::CursorReceived {
            from: "peer-2".to_string(),
            x: 0.0,
            y: 0.0,
            name: "bob".to_string(),
            color: "#3cb44b".to_string(),
        });

        let now = Instant::now();
        session.prune_stale_cursors(now);
        assert_eq!(session.cursors().len(), 1);

        session.prune_stale_cursors(now + CURSOR_TTL);
        assert!(session.cursors().is_empty());
    }

    #[test]
    fn test_disconnect_clears_remote_state() {
        let mut session = joined_session();
        session.handle_event(SyncEvent::CursorReceived {
            from: "peer-2".to_string(),
            x: 0.0,
            y: 0.0,
            name: "bob".to_string(),
            color: "#3cb44b".to_string(),
        });
        session.handle_event(SyncEvent::PeerJoined {
            peer_id: "peer-3".to_string(),
        });
        assert_eq!(session.peer_count(), 2);

        let event = session.handle_event(SyncEvent::Disconnected);
        assert!(matches!(event, Some(SessionEvent::Disconnected)));
        assert!(session.cursors().is_empty());
        assert_eq!(session.peer_count(), 0);
    }

    #[test]
    fn test_color_from_palette() {
        let session = joined_session();
        assert!(CURSOR_PALETTE.contains(&session.color()));
    }
}
