use std::sync::Arc;

use chrono::Utc;
use shared::{
    domain::UserId,
    protocol::{CreateUserRequest, User},
};
use tracing::{info, warn};

use crate::StoryBackend;

/// Author id attached to requests before a session user exists.
const FALLBACK_AUTHOR_ID: UserId = UserId(1);

/// Connectivity and identity for one run of the client. Starts disconnected;
/// [`StorySession::connect`] decides between a live backend and demo mode.
pub struct StorySession {
    backend: Arc<dyn StoryBackend>,
    connected: bool,
    current_user: Option<User>,
}

impl StorySession {
    pub fn new(backend: Arc<dyn StoryBackend>) -> Self {
        Self {
            backend,
            connected: false,
            current_user: None,
        }
    }

    /// Startup sequence: probe the backend, then register a throwaway user
    /// for this session. The two calls run sequentially on the caller's
    /// task. Any failure leaves the session in demo mode with no user.
    pub async fn connect(&mut self) -> bool {
        self.connected = false;
        self.current_user = None;

        if !self.backend.health_check().await {
            info!("backend unreachable; continuing in demo mode");
            return false;
        }

        let request = session_user_request(Utc::now().timestamp_millis());
        match self.backend.create_user(&request).await {
            Ok(user) => {
                info!(user_id = user.id.0, username = %user.username, "session user created");
                self.current_user = Some(user);
                self.connected = true;
            }
            Err(err) => {
                warn!("session user creation failed; continuing in demo mode: {err}");
            }
        }

        self.connected
    }

    pub fn backend(&self) -> &Arc<dyn StoryBackend> {
        &self.backend
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Author id attached to story-creation and multiplayer requests.
    pub fn story_author_id(&self) -> UserId {
        self.current_user
            .as_ref()
            .map(|user| user.id)
            .unwrap_or(FALLBACK_AUTHOR_ID)
    }
}

fn session_user_request(now_millis: i64) -> CreateUserRequest {
    CreateUserRequest {
        username: format!("User_{now_millis}"),
        email: format!("user{now_millis}@demo.com"),
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
