//! Static sample content backing demo mode.

use shared::{
    domain::{Genre, StoryId},
    protocol::Story,
};

use crate::controller::state::Passage;

/// Demo story descriptions are cut to this many characters before the
/// ellipsis is appended.
const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// The story cards shown on the home screen before any backend data exists.
pub fn sample_stories() -> Vec<Story> {
    vec![
        Story {
            id: StoryId(1),
            title: "The Crystal Caverns".to_string(),
            genre: Some("Fantasy".to_string()),
            description: Some(
                "A mystical adventure through ancient underground realms...".to_string(),
            ),
            initial_prompt: None,
            progress: Some(75),
            last_played: Some("2 hours ago".to_string()),
        },
        Story {
            id: StoryId(2),
            title: "Space Station Alpha".to_string(),
            genre: Some("Sci-Fi".to_string()),
            description: Some("Survival horror aboard a derelict space station...".to_string()),
            initial_prompt: None,
            progress: Some(45),
            last_played: Some("1 day ago".to_string()),
        },
        Story {
            id: StoryId(3),
            title: "The Haunted Manor".to_string(),
            genre: Some("Horror".to_string()),
            description: Some("Uncover the dark secrets of Blackwood Manor...".to_string()),
            initial_prompt: None,
            progress: Some(20),
            last_played: Some("3 days ago".to_string()),
        },
    ]
}

/// Opening passage rendered in the story view.
pub fn opening_passage() -> Passage {
    Passage {
        content: "You stand before the entrance to the Crystal Caverns, ancient runes glowing \
                  with an ethereal blue light. The air hums with magical energy, and you can \
                  hear the distant sound of water dripping in the depths below. Your torch \
                  flickers in the cool breeze that emanates from the cave mouth."
            .to_string(),
        choices: vec![
            "Enter the caverns immediately".to_string(),
            "Study the runes more carefully first".to_string(),
            "Call out to see if anyone responds".to_string(),
        ],
        has_audio: true,
        has_image: true,
    }
}

/// Build the story record demo mode substitutes for a backend response.
pub fn synthesize_story(title: &str, genre: Genre, prompt: &str, now_millis: i64) -> Story {
    Story {
        id: StoryId(now_millis),
        title: title.to_string(),
        genre: Some(genre.wire_value().to_string()),
        description: Some(preview(prompt)),
        initial_prompt: Some(prompt.to_string()),
        progress: None,
        last_played: None,
    }
}

/// First hundred characters of the prompt with a trailing ellipsis. The
/// ellipsis is appended even when the prompt is shorter than the cut.
fn preview(prompt: &str) -> String {
    let mut preview: String = prompt.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}
