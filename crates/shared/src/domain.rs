use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(UserId);
id_newtype!(StoryId);

/// Opaque code handed out by the backend for joining a multiplayer session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionCode(pub String);

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Genres offered by the story-creation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Genre {
    Fantasy,
    SciFi,
    Horror,
    Romance,
    Mystery,
    Adventure,
}

impl Genre {
    pub const ALL: [Genre; 6] = [
        Genre::Fantasy,
        Genre::SciFi,
        Genre::Horror,
        Genre::Romance,
        Genre::Mystery,
        Genre::Adventure,
    ];

    /// Value the backend expects in request bodies.
    pub fn wire_value(&self) -> &'static str {
        match self {
            Genre::Fantasy => "fantasy",
            Genre::SciFi => "sci-fi",
            Genre::Horror => "horror",
            Genre::Romance => "romance",
            Genre::Mystery => "mystery",
            Genre::Adventure => "adventure",
        }
    }

    /// Human-facing label for form choices.
    pub fn label(&self) -> &'static str {
        match self {
            Genre::Fantasy => "Fantasy",
            Genre::SciFi => "Science Fiction",
            Genre::Horror => "Horror",
            Genre::Romance => "Romance",
            Genre::Mystery => "Mystery",
            Genre::Adventure => "Adventure",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value())
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fantasy" => Ok(Genre::Fantasy),
            "sci-fi" | "scifi" | "science fiction" => Ok(Genre::SciFi),
            "horror" => Ok(Genre::Horror),
            "romance" => Ok(Genre::Romance),
            "mystery" => Ok(Genre::Mystery),
            "adventure" => Ok(Genre::Adventure),
            other => Err(format!("unknown genre '{other}'")),
        }
    }
}
