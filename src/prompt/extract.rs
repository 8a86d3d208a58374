//! Keyword scanning over scene text.
//!
//! Matching is case-insensitive substring containment with no word
//! boundaries, so `"children"` also hits `"child"`. Vocabularies are ordered
//! slices and the first matching category wins.

use crate::story::Genre;

const COLORS: &[&str] = &[
    "red", "blue", "green", "yellow", "purple", "orange", "pink", "black", "white", "golden",
    "silver", "brown", "gray", "crimson", "azure", "emerald",
];

const OBJECTS: &[&str] = &[
    "door", "window", "tree", "house", "castle", "sword", "book", "key", "flower", "mountain",
    "river", "forest", "cave", "bridge", "tower", "ship", "car", "horse", "dragon", "crown",
    "ring", "mirror", "chest", "statue",
];

const CHARACTERS: &[&str] = &[
    "girl", "boy", "woman", "man", "child", "children", "person", "people", "princess",
    "prince", "king", "queen", "knight", "wizard", "witch", "hero", "heroine", "villain",
    "warrior", "mage", "archer", "thief", "dragon", "unicorn", "fairy", "elf", "dwarf", "giant",
    "monster", "robot", "alien", "android", "cyborg", "detective", "scientist", "pirate",
    "sailor", "captain", "traveler", "explorer", "adventurer",
];

/// Location categories, scanned in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// forest
    Forest,
    /// castle
    Castle,
    /// city
    City,
    /// ocean
    Ocean,
    /// mountain
    Mountain,
    /// cave
    Cave,
    /// sky
    Sky,
    /// desert
    Desert,
    /// space
    Space,
    /// house
    House,
    /// garden
    Garden,
    /// laboratory
    Laboratory,
}

const LOCATIONS: &[(Location, &[&str])] = &[
    (Location::Forest, &["forest", "woods", "jungle", "trees"]),
    (Location::Castle, &["castle", "palace", "fortress", "tower"]),
    (Location::City, &["city", "town", "street", "building"]),
    (Location::Ocean, &["ocean", "sea", "beach", "shore", "waves"]),
    (Location::Mountain, &["mountain", "hill", "peak", "cliff"]),
    (Location::Cave, &["cave", "cavern", "underground", "tunnel"]),
    (Location::Sky, &["sky", "clouds", "flying", "floating"]),
    (Location::Desert, &["desert", "sand", "dunes", "oasis"]),
    (Location::Space, &["space", "stars", "planet", "galaxy", "spaceship"]),
    (Location::House, &["house", "home", "room", "attic", "basement"]),
    (Location::Garden, &["garden", "park", "meadow", "field"]),
    (Location::Laboratory, &["laboratory", "lab", "experiment", "research"]),
];

impl Location {
    /// Lowercase name used in generic setting phrases.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forest => "forest",
            Self::Castle => "castle",
            Self::City => "city",
            Self::Ocean => "ocean",
            Self::Mountain => "mountain",
            Self::Cave => "cave",
            Self::Sky => "sky",
            Self::Desert => "desert",
            Self::Space => "space",
            Self::House => "house",
            Self::Garden => "garden",
            Self::Laboratory => "laboratory",
        }
    }
}

/// Emotional colouring detected in a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mood {
    /// happy
    Happy,
    /// sad
    Sad,
    /// scared
    Scared,
    /// excited
    Excited,
    /// peaceful
    Peaceful,
    /// dramatic
    Dramatic,
    /// mysterious
    Mysterious,
}

const MOODS: &[(Mood, &[&str])] = &[
    (
        Mood::Happy,
        &["happy", "joy", "smile", "laugh", "cheerful", "bright", "wonderful"],
    ),
    (
        Mood::Sad,
        &["sad", "cry", "tear", "sorrow", "melancholy", "gloomy"],
    ),
    (
        Mood::Scared,
        &["scared", "afraid", "fear", "terrified", "frightened", "nervous"],
    ),
    (
        Mood::Excited,
        &["excited", "thrilled", "eager", "enthusiastic", "energetic"],
    ),
    (
        Mood::Peaceful,
        &["peaceful", "calm", "serene", "quiet", "tranquil", "gentle"],
    ),
    (
        Mood::Dramatic,
        &["dramatic", "intense", "powerful", "strong", "urgent", "critical"],
    ),
    (
        Mood::Mysterious,
        &["mysterious", "secret", "hidden", "unknown", "strange", "puzzling"],
    ),
];

fn matching(haystack: &str, vocabulary: &[&'static str]) -> impl Iterator<Item = &'static str> {
    vocabulary
        .iter()
        .copied()
        .filter(move |word| haystack.contains(word))
}

fn push_unique(found: &mut Vec<&'static str>, terms: impl Iterator<Item = &'static str>) {
    for term in terms {
        if !found.contains(&term) {
            found.push(term);
        }
    }
}

/// Colour and object words present in the text.
pub fn extract_visual_terms(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    let mut found = Vec::new();
    push_unique(&mut found, matching(&lower, COLORS));
    push_unique(&mut found, matching(&lower, OBJECTS));
    found
}

/// Character archetypes present in the text.
pub fn extract_characters(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    let mut found = Vec::new();
    push_unique(&mut found, matching(&lower, CHARACTERS));
    found
}

/// First location category with a keyword hit.
pub fn detect_location(text: &str) -> Option<Location> {
    let lower = text.to_lowercase();
    LOCATIONS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(location, _)| *location)
}

/// Describes where the scene takes place, flavoured by genre.
pub fn extract_setting(text: &str, genre: Genre) -> String {
    match detect_location(text) {
        Some(location) => setting_description(location, genre),
        None => default_setting(genre).to_string(),
    }
}

/// First mood group with a keyword hit.
pub fn detect_mood(text: &str) -> Option<Mood> {
    let lower = text.to_lowercase();
    MOODS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(mood, _)| *mood)
}

fn setting_description(location: Location, genre: Genre) -> String {
    let known = match (location, genre) {
        (Location::Forest, Genre::Fantasy) => {
            Some("mystical enchanted forest with magical glowing elements")
        }
        (Location::Forest, Genre::SciFi) => {
            Some("alien forest with bioluminescent plants and strange trees")
        }
        (Location::Forest, Genre::Mystery) => Some("dark mysterious forest with fog and shadows"),
        (Location::Forest, Genre::Adventure) => {
            Some("lush adventure forest with ancient trees and hidden paths")
        }
        (Location::Forest, Genre::Comedy) => Some("cheerful cartoon forest with friendly animals"),
        (Location::Castle, Genre::Fantasy) => {
            Some("majestic fantasy castle with towers and magical aura")
        }
        (Location::Castle, Genre::SciFi) => Some("futuristic fortress with advanced technology"),
        (Location::Castle, Genre::Mystery) => {
            Some("gothic castle with mysterious shadows and secrets")
        }
        (Location::Castle, Genre::Adventure) => Some("grand adventure castle on a hilltop"),
        (Location::Castle, Genre::Comedy) => Some("whimsical cartoon castle with bright colors"),
        (Location::City, Genre::Fantasy) => {
            Some("magical medieval city with fantasy architecture")
        }
        (Location::City, Genre::SciFi) => {
            Some("futuristic cyberpunk city with neon lights and flying vehicles")
        }
        (Location::City, Genre::Mystery) => Some("noir city streets with dramatic lighting"),
        (Location::City, Genre::Adventure) => {
            Some("bustling adventure city with diverse architecture")
        }
        (Location::City, Genre::Comedy) => Some("colorful cartoon city with funny buildings"),
        _ => None,
    };

    match known {
        Some(description) => description.to_string(),
        None => format!("{} environment with {genre} elements", location.as_str()),
    }
}

fn default_setting(genre: Genre) -> &'static str {
    match genre {
        Genre::Fantasy => "magical fantasy realm with enchanted elements",
        Genre::SciFi => "futuristic sci-fi environment with advanced technology",
        Genre::Mystery => "mysterious atmospheric setting with dramatic lighting",
        Genre::Adventure => "exciting adventure landscape with epic scale",
        Genre::Comedy => "bright cheerful setting with whimsical elements",
        Genre::Drama => "emotional dramatic setting with meaningful atmosphere",
        Genre::Horror | Genre::Romance => "beautiful detailed environment",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visual_terms_keep_vocabulary_order() {
        let terms = extract_visual_terms("A Golden Key lay beside the RED door.");
        assert_eq!(terms, vec!["red", "golden", "door", "key"]);
    }

    #[test]
    fn substring_matching_is_preserved() {
        // "children" contains "child", "woman" contains "man"
        let characters = extract_characters("The children followed a woman home.");
        assert_eq!(characters, vec!["woman", "man", "child", "children"]);
    }

    #[test]
    fn characters_are_unique() {
        let characters = extract_characters("robot meets robot and another ROBOT");
        assert_eq!(characters, vec!["robot"]);
    }

    #[test]
    fn single_location_uses_the_genre_table() {
        assert_eq!(
            extract_setting("They wandered into the forest.", Genre::Mystery),
            "dark mysterious forest with fog and shadows"
        );
    }

    #[test]
    fn location_without_genre_entry_uses_generic_phrase() {
        assert_eq!(
            extract_setting("They walked along the forest path.", Genre::Horror),
            "forest environment with horror elements"
        );
        assert_eq!(
            extract_setting("A desert stretched out.", Genre::SciFi),
            "desert environment with sci-fi elements"
        );
    }

    #[test]
    fn no_location_falls_back_to_genre_default() {
        assert_eq!(
            extract_setting("Nothing to see.", Genre::Drama),
            "emotional dramatic setting with meaningful atmosphere"
        );
        assert_eq!(
            extract_setting("Nothing to see.", Genre::Romance),
            "beautiful detailed environment"
        );
    }

    #[test]
    fn first_location_category_wins() {
        // "tower" is a castle keyword, "forest" comes first in scan order
        assert_eq!(detect_location("a tower deep in the forest"), Some(Location::Forest));
        assert_eq!(detect_location("plain text"), None);
    }

    #[test]
    fn first_mood_group_wins() {
        assert_eq!(detect_mood("She was sad but then began to laugh"), Some(Mood::Happy));
        assert_eq!(detect_mood("a quiet night"), Some(Mood::Peaceful));
        assert_eq!(detect_mood("nothing here"), None);
    }
}
