//! Builds image prompts out of scene text and story choices.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::extract::{Mood, detect_mood, extract_characters, extract_setting, extract_visual_terms};
use crate::constants::{OPTIMIZED_PROMPT_CLAUSES, OPTIMIZED_PROMPT_MAX_LEN, PROMPT_QUALITY_SUFFIX};
use crate::story::{Audience, Genre, Scene, StoryRequest, Tone};

#[allow(clippy::expect_used)]
static FILLER_VERBS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b(said|told|thought|felt|knew|realized|remembered|wondered|decided",
        r"|began|started|continued|finished|ended)\b",
    ))
    .expect("valid filler regex")
});

#[allow(clippy::expect_used)]
static STOPWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(the|a|an|and|or|but|in|on|at|to|for|of|with|by)\b")
        .expect("valid stopword regex")
});

#[allow(clippy::expect_used)]
static INTENSIFIERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(very|really|quite|somewhat|rather)\b").expect("valid intensifier regex")
});

/// A condensed first sentence must be longer than this to replace the title.
const MIN_BASE_LEN: usize = 10;

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title, or the first sentence with narrative filler stripped when that says more.
pub fn base_phrase(title: &str, text: &str) -> String {
    let Some(first_sentence) = text.split('.').map(str::trim).find(|s| !s.is_empty()) else {
        return title.to_string();
    };

    let without_fillers = FILLER_VERBS.replace_all(first_sentence, "");
    let without_stopwords = STOPWORDS.replace_all(&without_fillers, " ");
    let condensed = collapse_whitespace(&without_stopwords);

    if condensed.chars().count() > MIN_BASE_LEN {
        condensed
    } else {
        title.to_string()
    }
}

/// Atmosphere phrase: detected mood first, then tone, then a generic phrase.
pub fn atmosphere(text: &str, tone: Tone) -> &'static str {
    match detect_mood(text) {
        Some(mood) => mood_atmosphere(mood),
        None => tone_atmosphere(tone).unwrap_or("beautiful atmospheric lighting"),
    }
}

const fn mood_atmosphere(mood: Mood) -> &'static str {
    match mood {
        Mood::Happy => "bright cheerful atmosphere with warm lighting",
        Mood::Sad => "melancholic atmosphere with soft muted colors",
        Mood::Scared => "tense atmospheric lighting with dramatic shadows",
        Mood::Excited => "dynamic energetic atmosphere with vibrant colors",
        Mood::Peaceful => "serene calm atmosphere with gentle lighting",
        Mood::Dramatic => "intense dramatic atmosphere with powerful composition",
        Mood::Mysterious => "mysterious atmospheric mood with intriguing shadows",
    }
}

const fn tone_atmosphere(tone: Tone) -> Option<&'static str> {
    match tone {
        Tone::Dark => Some("dark moody atmosphere with dramatic lighting"),
        Tone::Lighthearted => Some("bright uplifting atmosphere with cheerful mood"),
        Tone::Epic => Some("epic grandiose atmosphere with dramatic scale"),
        Tone::Mysterious => Some("mysterious enigmatic atmosphere"),
        Tone::Romantic => Some("romantic soft atmosphere with warm gentle lighting"),
        Tone::Adventurous => Some("adventurous dynamic atmosphere with exciting energy"),
        Tone::Peaceful | Tone::Intense => None,
    }
}

/// Visual flourish for the genre.
pub const fn genre_elements(genre: Genre) -> &'static str {
    match genre {
        Genre::Fantasy => "magical sparkles, mystical aura, fantasy elements",
        Genre::SciFi => "futuristic technology, sci-fi elements, advanced design",
        Genre::Mystery => "mysterious shadows, noir elements, investigative mood",
        Genre::Adventure => "epic adventure elements, heroic composition, dynamic action",
        Genre::Comedy => "humorous visual elements, cartoonish style, playful details",
        Genre::Drama => "emotional depth, character-focused composition, meaningful details",
        Genre::Horror => "spooky atmospheric elements, dark mood, eerie details",
        Genre::Romance => "romantic soft elements, warm colors, tender mood",
    }
}

/// Art style for the story, e.g. `"cyberpunk, neon, futuristic, dynamic, serene, calm colors"`.
pub fn style_profile(genre: Genre, audience: Audience, tone: Tone) -> String {
    let audience_style = match (genre, audience) {
        (Genre::Fantasy, Audience::Kids) => "whimsical children's book, bright magical colors",
        (Genre::Fantasy, Audience::Teens) => "fantasy art, epic, mystical, detailed",
        (Genre::Fantasy, Audience::Adults) => "dark fantasy, atmospheric, intricate",
        (Genre::SciFi, Audience::Kids) => "cartoon sci-fi, friendly robots, space adventure",
        (Genre::SciFi, Audience::Teens) => "cyberpunk, neon, futuristic, dynamic",
        (Genre::SciFi, Audience::Adults) => "realistic sci-fi, cinematic lighting, concept art",
        (Genre::Mystery, Audience::Kids) => "gentle mystery, warm colors, cozy detective",
        (Genre::Mystery, Audience::Teens) => "noir style, dramatic lighting, intriguing",
        (Genre::Mystery, Audience::Adults) => "dark mystery, sophisticated, atmospheric",
        (_, Audience::Kids) => "bright cartoon adventure, fun and colorful",
        (_, Audience::Teens) => "dynamic action, heroic characters",
        (_, Audience::Adults) => "cinematic adventure, epic composition",
    };

    let tone_modifier = match tone {
        Tone::Dark => ", moody, dramatic shadows",
        Tone::Lighthearted => ", cheerful, uplifting",
        Tone::Epic => ", grand, heroic, majestic",
        Tone::Mysterious => ", enigmatic, shadowy",
        Tone::Romantic => ", warm, emotional, soft light",
        Tone::Adventurous => ", dynamic, exciting action",
        Tone::Peaceful => ", serene, calm colors",
        Tone::Intense => ", high energy, powerful composition",
    };

    format!("{audience_style}{tone_modifier}")
}

/// Scene description without the style suffix.
pub fn describe_scene(scene: &Scene, request: &StoryRequest) -> String {
    let text = scene.body();
    debug!(
        "Scene {} visual terms: {:?}",
        scene.sequence(),
        extract_visual_terms(text)
    );

    let mut prompt = base_phrase(scene.title(), text);

    let characters = extract_characters(text);
    if !characters.is_empty() {
        prompt.push_str(", featuring ");
        prompt.push_str(&characters.join(", "));
    }

    let setting = extract_setting(text, request.genre());
    if !setting.is_empty() {
        prompt.push_str(", ");
        prompt.push_str(&setting);
    }

    let atmosphere = atmosphere(text, request.tone());
    if !atmosphere.is_empty() {
        prompt.push_str(", ");
        prompt.push_str(atmosphere);
    }

    let flourish = genre_elements(request.genre());
    if !flourish.is_empty() {
        prompt.push_str(", ");
        prompt.push_str(flourish);
    }

    prompt.trim().to_string()
}

/// Full prompt sent to the image engine for a scene.
pub fn compose_prompt(scene: &Scene, request: &StoryRequest) -> String {
    let description = describe_scene(scene, request);
    let style = style_profile(request.genre(), request.audience(), request.tone());
    collapse_whitespace(&format!("{description}, {style}{PROMPT_QUALITY_SUFFIX}"))
}

/// Drops intensifiers and, for long prompts, keeps only the leading clauses.
pub fn optimize_prompt(prompt: &str) -> String {
    let optimized = collapse_whitespace(&INTENSIFIERS.replace_all(prompt, ""));
    if optimized.chars().count() <= OPTIMIZED_PROMPT_MAX_LEN {
        return optimized;
    }
    optimized
        .split(',')
        .map(str::trim)
        .take(OPTIMIZED_PROMPT_CLAUSES)
        .collect::<Vec<_>>()
        .join(", ")
}
