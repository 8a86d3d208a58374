//! Scene templates keyed by genre and audience.

use std::collections::HashMap;

use tracing::debug;

use super::{Audience, Genre, Scene, StoryError, StoryRequest};
use crate::constants::SCENE_COUNT;

/// Marker replaced by the story idea inside a scene body template.
pub const IDEA_MARKER: &str = "{idea}";

/// Key used when a (genre, audience) pair has no templates of its own.
pub const DEFAULT_KEY: (Genre, Audience) = (Genre::Fantasy, Audience::Kids);

/// Title plus body template for one scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneTemplate {
    /// Scene title
    pub title: &'static str,
    /// Body text containing exactly one [`IDEA_MARKER`]
    pub body: &'static str,
}

/// One full story arc.
pub type SceneSet = [SceneTemplate; SCENE_COUNT];

/// Template lookup with a guaranteed fallback entry.
#[derive(Clone, Debug)]
pub struct TemplateTable {
    entries: HashMap<(Genre, Audience), SceneSet>,
    fallback: SceneSet,
}

impl TemplateTable {
    /// Builds a table, checking that `default_key` is present and every
    /// template carries a single idea marker.
    pub fn new(
        entries: HashMap<(Genre, Audience), SceneSet>,
        default_key: (Genre, Audience),
    ) -> Result<Self, StoryError> {
        for ((genre, audience), set) in &entries {
            if let Some(bad) = set
                .iter()
                .find(|template| template.body.matches(IDEA_MARKER).count() != 1)
            {
                return Err(StoryError::InvalidTemplate {
                    genre: *genre,
                    audience: *audience,
                    title: bad.title.to_string(),
                });
            }
        }
        let fallback = *entries
            .get(&default_key)
            .ok_or(StoryError::MissingDefaultTemplate(default_key.0, default_key.1))?;
        Ok(Self { entries, fallback })
    }

    /// The built-in story arcs.
    pub fn builtin() -> Result<Self, StoryError> {
        let entries = HashMap::from([
            ((Genre::Fantasy, Audience::Kids), FANTASY_KIDS),
            ((Genre::Fantasy, Audience::Teens), FANTASY_TEENS),
            ((Genre::SciFi, Audience::Kids), SCI_FI_KIDS),
        ]);
        Self::new(entries, DEFAULT_KEY)
    }

    /// Returns the arc for the pair, or the default arc.
    pub fn lookup(&self, genre: Genre, audience: Audience) -> &SceneSet {
        match self.entries.get(&(genre, audience)) {
            Some(set) => set,
            None => {
                debug!("No templates for {genre}/{audience}, using default arc");
                &self.fallback
            }
        }
    }
}

/// Produces the five scenes of a story, in order.
pub fn build_scenes(table: &TemplateTable, request: &StoryRequest) -> Vec<Scene> {
    let closing = format!(
        " The {} atmosphere fills this {} tale, making it perfect for {} who love stories full of wonder and excitement.",
        request.tone(),
        request.genre(),
        request.audience()
    );

    table
        .lookup(request.genre(), request.audience())
        .iter()
        .zip(1u8..)
        .map(|(template, sequence)| {
            let mut body = template.body.replacen(IDEA_MARKER, request.idea(), 1);
            body.push_str(&closing);
            Scene::new(sequence, template.title, body)
        })
        .collect()
}

const FANTASY_KIDS: SceneSet = [
    SceneTemplate {
        title: "The Discovery",
        body: "In a magical land where {idea}, a young hero discovers something extraordinary that will change everything. The air shimmers with possibility as they take their first steps into adventure.",
    },
    SceneTemplate {
        title: "The Challenge Appears",
        body: "But not all is as peaceful as it seems. A great challenge emerges that threatens the harmony of the magical world where {idea}. Our hero must find courage they never knew they had.",
    },
    SceneTemplate {
        title: "The Journey Begins",
        body: "With determination in their heart, our hero sets out on an incredible journey. Along the way, they meet wonderful friends who believe that {idea}, and together they set out to save their world.",
    },
    SceneTemplate {
        title: "The Great Test",
        body: "At the moment when all seems lost, our hero faces the greatest test of all. Remembering the day when {idea}, and with the help of their friends, they discover the true power of believing in themselves.",
    },
    SceneTemplate {
        title: "The Happy Ending",
        body: "Peace and joy return to the magical land where {idea}. Our hero has grown wise and brave, and the world is more beautiful than ever before. The adventure has ended, but the magic lives on forever.",
    },
];

const FANTASY_TEENS: SceneSet = [
    SceneTemplate {
        title: "The Awakening",
        body: "In a world where {idea}, everything changes when ancient powers awaken. The balance between light and darkness hangs in the balance as destiny calls to unlikely heroes.",
    },
    SceneTemplate {
        title: "The Prophecy Unfolds",
        body: "An ancient prophecy foretold a time when {idea}, and heroes must rise to face an emerging darkness. As evil forces gather strength, the chosen ones must embrace their destiny.",
    },
    SceneTemplate {
        title: "Trials of Power",
        body: "The heroes face trials that test not only their magical abilities but their bonds of friendship. Each challenge in a world where {idea} reveals deeper truths about their powers and their purpose.",
    },
    SceneTemplate {
        title: "The Final Battle",
        body: "In an epic confrontation between good and evil, our heroes must use everything they've learned since {idea}. The fate of both worlds hangs in the balance as they make their ultimate stand.",
    },
    SceneTemplate {
        title: "New Beginnings",
        body: "With victory achieved and wisdom gained, our heroes look toward a future where {idea}, full of possibility. They have grown into the legends they were meant to become.",
    },
];

const SCI_FI_KIDS: SceneSet = [
    SceneTemplate {
        title: "Future Discovery",
        body: "In the amazing world of tomorrow where {idea}, a curious young explorer discovers something that could change everything. Technology and wonder go hand in hand in this bright future.",
    },
    SceneTemplate {
        title: "The Problem",
        body: "But even in this advanced world, problems arise. A malfunction in the great machines threatens the peaceful life where {idea}, and someone needs to find a solution.",
    },
    SceneTemplate {
        title: "Teamwork and Innovation",
        body: "Working together with their robot friends and using incredible future technology, our young hero starts to unravel the mystery of how {idea} and find creative solutions.",
    },
    SceneTemplate {
        title: "The Big Fix",
        body: "Using their intelligence, creativity, and the help of artificial intelligence friends, our hero implements a brilliant solution so that {idea} once more, and the day is saved.",
    },
    SceneTemplate {
        title: "A Brighter Tomorrow",
        body: "The future is brighter than ever as harmony is restored in the world where {idea}. Technology and humanity work together perfectly, creating endless possibilities for adventure and discovery.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::Tone;

    fn table() -> TemplateTable {
        TemplateTable::builtin().expect("builtin table is valid")
    }

    #[test]
    fn builds_five_scenes_in_order() {
        let request = StoryRequest::new(
            "a dragon loses its fire",
            Genre::Fantasy,
            Tone::Epic,
            Audience::Teens,
        )
        .expect("valid request");
        let scenes = build_scenes(&table(), &request);
        assert_eq!(scenes.len(), SCENE_COUNT);
        let sequences: Vec<u8> = scenes.iter().map(Scene::sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4, 5]);
        assert_eq!(scenes[0].title(), "The Awakening");
        assert!(scenes.iter().all(|scene| scene.body().contains("a dragon loses its fire")));
        assert!(scenes.iter().all(|scene| scene.image().is_none() && scene.prompt().is_none()));
    }

    #[test]
    fn sci_fi_kids_example() {
        let request = StoryRequest::new(
            "a lonely robot finds a flower",
            Genre::SciFi,
            Tone::Peaceful,
            Audience::Kids,
        )
        .expect("valid request");
        let scenes = build_scenes(&table(), &request);
        let first = &scenes[0];
        assert_eq!(first.title(), "Future Discovery");
        assert!(first.body().starts_with(
            "In the amazing world of tomorrow where a lonely robot finds a flower, a curious young explorer discovers"
        ));
        let last_sentence = first
            .body()
            .rsplit(". ")
            .next()
            .expect("body has sentences");
        assert!(last_sentence.contains("peaceful"));
        assert!(last_sentence.contains("sci-fi"));
        assert!(last_sentence.contains("kids"));
    }

    #[test]
    fn unknown_pairs_use_the_default_arc() {
        let request = StoryRequest::new(
            "the moon goes missing",
            Genre::Horror,
            Tone::Dark,
            Audience::Adults,
        )
        .expect("valid request");
        let scenes = build_scenes(&table(), &request);
        let titles: Vec<&str> = scenes.iter().map(Scene::title).collect();
        let expected: Vec<&str> = FANTASY_KIDS.iter().map(|t| t.title).collect();
        assert_eq!(titles, expected);
        assert!(scenes[0].body().contains("the moon goes missing"));
        assert!(scenes[0].body().ends_with(
            " The dark atmosphere fills this horror tale, making it perfect for adults who love stories full of wonder and excitement."
        ));
    }

    #[test]
    fn output_is_deterministic() {
        let request = StoryRequest::new("a shy ghost", Genre::Comedy, Tone::Intense, Audience::Kids)
            .expect("valid request");
        assert_eq!(build_scenes(&table(), &request), build_scenes(&table(), &request));
    }

    #[test]
    fn idea_is_substituted_verbatim() {
        // a literal marker inside the idea must not be substituted twice
        let request = StoryRequest::new("{idea} loops", Genre::Fantasy, Tone::Epic, Audience::Kids)
            .expect("valid request");
        let scenes = build_scenes(&table(), &request);
        assert!(scenes[0].body().starts_with("In a magical land where {idea} loops,"));
    }

    #[test]
    fn missing_default_is_rejected() {
        let entries = HashMap::from([((Genre::SciFi, Audience::Kids), SCI_FI_KIDS)]);
        let err = TemplateTable::new(entries, DEFAULT_KEY).expect_err("no default entry");
        assert_eq!(
            err,
            StoryError::MissingDefaultTemplate(Genre::Fantasy, Audience::Kids)
        );
    }

    #[test]
    fn templates_without_a_marker_are_rejected() {
        let mut broken = FANTASY_KIDS;
        broken[3] = SceneTemplate {
            title: "Broken",
            body: "No marker here.",
        };
        let entries = HashMap::from([
            (DEFAULT_KEY, FANTASY_KIDS),
            ((Genre::Drama, Audience::Adults), broken),
        ]);
        let err = TemplateTable::new(entries, DEFAULT_KEY).expect_err("marker missing");
        assert!(matches!(err, StoryError::InvalidTemplate { title, .. } if title == "Broken"));
    }
}
