//! Story requests and the scenes generated from them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::images::ImageRef;

pub mod templates;

pub use templates::{SceneTemplate, TemplateTable, build_scenes};

/// Story genre as offered by the story form.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Genre {
    /// fantasy
    Fantasy,
    /// sci-fi
    SciFi,
    /// mystery
    Mystery,
    /// adventure
    #[default]
    Adventure,
    /// comedy
    Comedy,
    /// drama
    Drama,
    /// horror
    Horror,
    /// romance
    Romance,
}

impl Genre {
    /// Wire and display name of the genre.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fantasy => "fantasy",
            Self::SciFi => "sci-fi",
            Self::Mystery => "mystery",
            Self::Adventure => "adventure",
            Self::Comedy => "comedy",
            Self::Drama => "drama",
            Self::Horror => "horror",
            Self::Romance => "romance",
        }
    }
}

/// Overall tone of the story.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    /// lighthearted
    #[default]
    Lighthearted,
    /// dark
    Dark,
    /// epic
    Epic,
    /// mysterious
    Mysterious,
    /// adventurous
    Adventurous,
    /// romantic
    Romantic,
    /// peaceful
    Peaceful,
    /// intense
    Intense,
}

impl Tone {
    /// Wire and display name of the tone.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lighthearted => "lighthearted",
            Self::Dark => "dark",
            Self::Epic => "epic",
            Self::Mysterious => "mysterious",
            Self::Adventurous => "adventurous",
            Self::Romantic => "romantic",
            Self::Peaceful => "peaceful",
            Self::Intense => "intense",
        }
    }
}

/// Target readership.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Audience {
    /// kids
    #[default]
    Kids,
    /// teens
    Teens,
    /// adults
    Adults,
}

impl Audience {
    /// Wire and display name of the audience.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kids => "kids",
            Self::Teens => "teens",
            Self::Adults => "adults",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Genre, Tone, Audience);

/// Errors raised while building a story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryError {
    /// The idea was empty or only whitespace.
    EmptyIdea,
    /// The template table has no entry for its fallback key.
    MissingDefaultTemplate(Genre, Audience),
    /// A scene template does not carry exactly one idea marker.
    InvalidTemplate {
        /// Genre of the offending entry
        genre: Genre,
        /// Audience of the offending entry
        audience: Audience,
        /// Title of the offending scene template
        title: String,
    },
}

impl fmt::Display for StoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIdea => write!(f, "Please enter a story idea"),
            Self::MissingDefaultTemplate(genre, audience) => {
                write!(f, "Template table is missing its default entry {genre}/{audience}")
            }
            Self::InvalidTemplate {
                genre,
                audience,
                title,
            } => write!(
                f,
                "Scene template {title:?} for {genre}/{audience} must contain exactly one idea marker"
            ),
        }
    }
}

impl std::error::Error for StoryError {}

/// A validated story request. The idea is never blank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStoryRequest")]
pub struct StoryRequest {
    idea: String,
    genre: Genre,
    tone: Tone,
    audience: Audience,
}

/// Unvalidated shape of a [`StoryRequest`] as it arrives on the wire.
#[derive(Deserialize)]
struct RawStoryRequest {
    idea: String,
    #[serde(default)]
    genre: Genre,
    #[serde(default)]
    tone: Tone,
    #[serde(default)]
    audience: Audience,
}

impl TryFrom<RawStoryRequest> for StoryRequest {
    type Error = StoryError;

    fn try_from(raw: RawStoryRequest) -> Result<Self, Self::Error> {
        Self::new(raw.idea, raw.genre, raw.tone, raw.audience)
    }
}

impl StoryRequest {
    /// Builds a request, rejecting blank ideas.
    pub fn new(
        idea: impl Into<String>,
        genre: Genre,
        tone: Tone,
        audience: Audience,
    ) -> Result<Self, StoryError> {
        let idea = idea.into();
        if idea.trim().is_empty() {
            return Err(StoryError::EmptyIdea);
        }
        Ok(Self {
            idea,
            genre,
            tone,
            audience,
        })
    }

    /// The free-text story idea
    pub fn idea(&self) -> &str {
        &self.idea
    }

    /// Selected genre
    pub const fn genre(&self) -> Genre {
        self.genre
    }

    /// Selected tone
    pub const fn tone(&self) -> Tone {
        self.tone
    }

    /// Selected audience
    pub const fn audience(&self) -> Audience {
        self.audience
    }
}

/// One narrative beat of a story.
///
/// Title and body are fixed at creation, only the illustration fields are
/// filled in later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    sequence: u8,
    title: String,
    body: String,
    image: Option<ImageRef>,
    prompt: Option<String>,
}

impl Scene {
    pub(crate) fn new(sequence: u8, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sequence,
            title: title.into(),
            body: body.into(),
            image: None,
            prompt: None,
        }
    }

    /// 1-based position of the scene in its story
    pub const fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Scene title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Scene text
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Illustration, once resolved
    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    /// Prompt used for the illustration, once resolved
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    /// Records the outcome of illustrating this scene.
    pub fn attach_illustration(&mut self, prompt: String, image: Option<ImageRef>) {
        self.prompt = Some(prompt);
        self.image = image;
    }
}
