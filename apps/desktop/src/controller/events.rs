//! UI-facing events and error classification for the controller.

use client_core::ClientError;
use serde_json::Value;
use shared::{
    domain::StoryId,
    protocol::{MultiplayerSession, Story},
};

use super::state::View;

#[derive(Debug)]
pub enum UiEvent {
    ConnectionChecked { connected: bool },
    ViewChanged(View),
    StoryCreated(Story),
    StoryExported { story_id: StoryId, export: Value },
    SessionCreated(MultiplayerSession),
    SessionJoined(MultiplayerSession),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Server,
    Decode,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    CreateStory,
    ContinueStory,
    ExportStory,
    Multiplayer,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_client_error(context: UiErrorContext, error: &ClientError) -> Self {
        let category = match error {
            ClientError::Transport { .. } => UiErrorCategory::Transport,
            ClientError::Status { .. } => UiErrorCategory::Server,
            ClientError::Decode { .. } => UiErrorCategory::Decode,
            ClientError::InvalidBaseUrl { .. } => UiErrorCategory::Validation,
        };
        Self {
            category,
            context,
            message: error.to_string(),
        }
    }

    pub fn validation(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Validation,
            context,
            message: message.into(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Explanation surfaced when a backend-only action is invoked in demo mode.
pub fn demo_mode_limitation(context: UiErrorContext, action: &str) -> UiError {
    UiError {
        category: UiErrorCategory::Transport,
        context,
        message: format!("Backend connection unavailable; {action} is limited to connected sessions."),
    }
}
