use tokio::sync::{Mutex, broadcast};

use crate::dto::sse::ServerEvent;

/// Push-channel half of [`super::AppState`]: one hub per audience.
pub struct SseState {
    public: SseHub,
    admin: AdminSseState,
}

impl SseState {
    /// Build both hubs with their broadcast channel capacities.
    pub fn new(public_capacity: usize, admin_capacity: usize) -> Self {
        Self {
            public: SseHub::new(public_capacity),
            admin: AdminSseState::new(admin_capacity),
        }
    }

    /// Hub fanning out board snapshots and content notices to every display.
    pub fn public(&self) -> &SseHub {
        &self.public
    }

    /// Admin-side hub plus the token guarding the single host connection.
    pub fn admin(&self) -> &AdminSseState {
        &self.admin
    }
}

/// Admin SSE hub paired with the token of the one allowed host stream.
pub struct AdminSseState {
    hub: SseHub,
    token: Mutex<Option<String>>,
}

impl AdminSseState {
    fn new(capacity: usize) -> Self {
        Self {
            hub: SseHub::new(capacity),
            token: Mutex::new(None),
        }
    }

    /// Hub carrying admin-only events.
    pub fn hub(&self) -> &SseHub {
        &self.hub
    }

    /// Token slot; `Some` while a host stream is connected.
    pub fn token(&self) -> &Mutex<Option<String>> {
        &self.token
    }
}

/// Thin wrapper over a Tokio broadcast channel.
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    /// Open a hub with room for `capacity` undelivered events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Attach a subscriber; it only sees events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Fan an event out to all subscribers. A hub with no listeners is fine.
    pub fn broadcast(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }
}
