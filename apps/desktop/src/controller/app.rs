//! The view state machine and the actions that drive it.

use std::time::Duration;

use client_core::{StoryBackend, StorySession};
use shared::{
    domain::{SessionCode, StoryId},
    protocol::{CreateSessionRequest, CreateStoryRequest, JoinSessionRequest, Story},
};
use tracing::{info, warn};

use super::{
    events::{demo_mode_limitation, UiError, UiErrorContext, UiEvent},
    state::{AppState, CreateForm, View},
};
use crate::demo;

/// Delay substituted for backend story generation in demo mode.
const DEMO_CREATE_DELAY: Duration = Duration::from_secs(2);
/// Delay substituted for continuation after a choice is picked.
const CHOICE_GENERATION_DELAY: Duration = Duration::from_millis(1500);

/// Alert shown verbatim when story creation fails against a live backend.
const CREATE_FAILURE_ALERT: &str = "Failed to create story. Please try again.";

pub struct StoryApp {
    session: StorySession,
    state: AppState,
    events: Vec<UiEvent>,
    demo_create_delay: Duration,
    choice_delay: Duration,
}

impl StoryApp {
    pub fn new(session: StorySession) -> Self {
        let state = AppState {
            stories: demo::sample_stories(),
            ..AppState::default()
        };
        Self {
            session,
            state,
            events: Vec::new(),
            demo_create_delay: DEMO_CREATE_DELAY,
            choice_delay: CHOICE_GENERATION_DELAY,
        }
    }

    #[cfg(test)]
    fn with_zero_delays(session: StorySession) -> Self {
        let mut app = Self::new(session);
        app.demo_create_delay = Duration::ZERO;
        app.choice_delay = Duration::ZERO;
        app
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.state.alert.take()
    }

    /// Probe the backend and, when reachable, register the session user.
    pub async fn startup(&mut self) {
        let connected = self.session.connect().await;
        self.state.connected = connected;
        self.events.push(UiEvent::ConnectionChecked { connected });
    }

    pub fn navigate(&mut self, view: View) {
        if self.state.view == view {
            return;
        }
        self.state.view = view;
        self.events.push(UiEvent::ViewChanged(view));
    }

    pub fn go_home(&mut self) {
        self.navigate(View::Home);
    }

    /// Open a story card from the home list.
    pub fn open_story(&mut self, story_id: StoryId) {
        let Some(story) = self
            .state
            .stories
            .iter()
            .find(|story| story.id == story_id)
            .cloned()
        else {
            self.events.push(UiEvent::Error(UiError::validation(
                UiErrorContext::General,
                format!("unknown story id {}", story_id.0),
            )));
            return;
        };
        self.enter_story_view(story);
    }

    fn enter_story_view(&mut self, story: Story) {
        self.state.current_story = Some(story);
        self.state.passage = Some(demo::opening_passage());
        self.state.narrating = false;
        self.navigate(View::Story);
    }

    /// Submit the creation form. Demo mode synthesizes a story locally after
    /// a fixed delay; a connected session posts to the backend and only
    /// leaves the creation view on success.
    pub async fn submit_create(&mut self, form: CreateForm) {
        if !form.is_complete() {
            self.events.push(UiEvent::Error(UiError::validation(
                UiErrorContext::CreateStory,
                "title, genre, and prompt are all required",
            )));
            return;
        }
        let Some(genre) = form.genre else {
            return;
        };

        self.state.generating = true;

        if !self.state.connected {
            tokio::time::sleep(self.demo_create_delay).await;
            let story = demo::synthesize_story(
                &form.title,
                genre,
                &form.prompt,
                chrono::Utc::now().timestamp_millis(),
            );
            self.state.generating = false;
            self.events.push(UiEvent::StoryCreated(story.clone()));
            self.enter_story_view(story);
            return;
        }

        let request = CreateStoryRequest {
            title: form.title.clone(),
            genre,
            initial_prompt: form.prompt.clone(),
            user_id: self.session.story_author_id(),
        };
        match self.session.backend().create_story(&request).await {
            Ok(story) => {
                self.state.generating = false;
                info!(story_id = story.id.0, "story created");
                self.events.push(UiEvent::StoryCreated(story.clone()));
                self.enter_story_view(story);
            }
            Err(err) => {
                self.state.generating = false;
                warn!("story creation failed: {err}");
                self.state.alert = Some(CREATE_FAILURE_ALERT.to_string());
                self.events.push(UiEvent::Error(UiError::from_client_error(
                    UiErrorContext::CreateStory,
                    &err,
                )));
            }
        }
    }

    /// Pick one of the current passage's choices. Connected sessions post
    /// the choice to the backend; demo mode only simulates generation.
    pub async fn choose(&mut self, index: usize) {
        let Some(choice) = self
            .state
            .passage
            .as_ref()
            .and_then(|passage| passage.choices.get(index))
            .cloned()
        else {
            self.events.push(UiEvent::Error(UiError::validation(
                UiErrorContext::ContinueStory,
                format!("no choice at index {index}"),
            )));
            return;
        };

        self.state.generating = true;
        if self.state.connected {
            if let Some(story) = self.state.current_story.clone() {
                match self.session.backend().continue_story(story.id, &choice).await {
                    Ok(_) => info!(story_id = story.id.0, %choice, "story continued"),
                    Err(err) => {
                        warn!("story continuation failed: {err}");
                        self.events.push(UiEvent::Error(UiError::from_client_error(
                            UiErrorContext::ContinueStory,
                            &err,
                        )));
                    }
                }
            }
        } else {
            tokio::time::sleep(self.choice_delay).await;
        }
        self.state.generating = false;
    }

    /// Flip the narration placeholder between playing and paused.
    pub fn toggle_narration(&mut self) {
        self.state.narrating = !self.state.narrating;
    }

    pub async fn export_current_story(&mut self) {
        let Some(story) = self.state.current_story.clone() else {
            self.events.push(UiEvent::Error(UiError::validation(
                UiErrorContext::ExportStory,
                "no story is open",
            )));
            return;
        };
        if !self.state.connected {
            self.events.push(UiEvent::Error(demo_mode_limitation(
                UiErrorContext::ExportStory,
                "story export",
            )));
            return;
        }
        match self.session.backend().export_story(story.id).await {
            Ok(export) => self.events.push(UiEvent::StoryExported {
                story_id: story.id,
                export,
            }),
            Err(err) => self.events.push(UiEvent::Error(UiError::from_client_error(
                UiErrorContext::ExportStory,
                &err,
            ))),
        }
    }

    /// Host a multiplayer session for the story currently open.
    pub async fn host_session(&mut self) {
        if !self.state.connected {
            self.events.push(UiEvent::Error(demo_mode_limitation(
                UiErrorContext::Multiplayer,
                "multiplayer",
            )));
            return;
        }
        let Some(story) = self.state.current_story.clone() else {
            self.events.push(UiEvent::Error(UiError::validation(
                UiErrorContext::Multiplayer,
                "open a story before hosting a session",
            )));
            return;
        };
        let request = CreateSessionRequest {
            story_id: story.id,
            host_user_id: self.session.story_author_id(),
        };
        match self.session.backend().create_session(&request).await {
            Ok(session) => {
                info!(code = %session.session_code, "multiplayer session created");
                self.events.push(UiEvent::SessionCreated(session));
            }
            Err(err) => self.events.push(UiEvent::Error(UiError::from_client_error(
                UiErrorContext::Multiplayer,
                &err,
            ))),
        }
    }

    pub async fn join_multiplayer(&mut self, code: SessionCode) {
        if !self.state.connected {
            self.events.push(UiEvent::Error(demo_mode_limitation(
                UiErrorContext::Multiplayer,
                "multiplayer",
            )));
            return;
        }
        let request = JoinSessionRequest {
            session_code: code,
            user_id: self.session.story_author_id(),
        };
        match self.session.backend().join_session(&request).await {
            Ok(session) => self.events.push(UiEvent::SessionJoined(session)),
            Err(err) => self.events.push(UiEvent::Error(UiError::from_client_error(
                UiErrorContext::Multiplayer,
                &err,
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../tests/app_tests.rs"]
mod tests;
