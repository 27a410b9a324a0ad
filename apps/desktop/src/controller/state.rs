//! View-layer state: screens, the creation form, and what each screen shows.

use shared::{domain::Genre, protocol::Story};

/// Top-level screens. Exactly one is active at a time; there is no history
/// stack, so "back" always means [`View::Home`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Create,
    Story,
    Multiplayer,
}

/// Inputs of the story-creation form.
#[derive(Debug, Clone, Default)]
pub struct CreateForm {
    pub title: String,
    pub genre: Option<Genre>,
    pub prompt: String,
}

impl CreateForm {
    /// Submission stays disabled until every field is filled.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && self.genre.is_some() && !self.prompt.trim().is_empty()
    }
}

/// One screenful of narrative in the story view, with its ordered choices
/// and placeholder flags for narration audio and illustration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub content: String,
    pub choices: Vec<String>,
    pub has_audio: bool,
    pub has_image: bool,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub view: View,
    pub connected: bool,
    pub stories: Vec<Story>,
    pub current_story: Option<Story>,
    pub passage: Option<Passage>,
    pub generating: bool,
    pub narrating: bool,
    /// Blocking user-facing alert; cleared when the UI acknowledges it.
    pub alert: Option<String>,
}
