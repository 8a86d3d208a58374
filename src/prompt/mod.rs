//! Rule-based image prompt generation.

pub mod compose;
pub mod extract;

pub use compose::{compose_prompt, describe_scene, optimize_prompt, style_profile};
pub use extract::{detect_mood, extract_characters, extract_setting, extract_visual_terms};
