//! Shared constants for story generation and illustration
//!

use std::time::Duration;

/// Number of scenes in every generated story
pub const SCENE_COUNT: usize = 5;

/// Width requested from the image engine, in pixels.
pub const IMAGE_WIDTH: u32 = 1024;

/// Height requested from the image engine, in pixels.
pub const IMAGE_HEIGHT: u32 = 768;

/// Default pause between two scene illustrations in a batch.
pub const DEFAULT_SCENE_DELAY: Duration = Duration::from_millis(1500);

/// Fixed tail appended to every composed prompt.
pub const PROMPT_QUALITY_SUFFIX: &str = ", high quality, detailed illustration, storybook art";

/// How many prompt characters end up on a placeholder image.
pub const PLACEHOLDER_TEXT_CHARS: usize = 40;

/// Gradient start colour for placeholder images.
pub const PLACEHOLDER_GRADIENT_FROM: &str = "#8B5CF6";

/// Gradient end colour for placeholder images.
pub const PLACEHOLDER_GRADIENT_TO: &str = "#EC4899";

/// Default base URL of the Stability REST API.
pub const DEFAULT_STABILITY_URL: &str = "https://api.stability.ai/";

/// Text-to-image path on the Stability API, relative to the base URL.
pub const STABILITY_TEXT_TO_IMAGE_PATH: &str =
    "v1/generation/stable-diffusion-v1-5/text-to-image";

/// Classifier-free guidance scale sent to Stability.
pub const STABILITY_CFG_SCALE: u8 = 7;

/// Prompts above this length get clause-truncated by the optimizer.
pub const OPTIMIZED_PROMPT_MAX_LEN: usize = 200;

/// Number of comma-delimited clauses the optimizer keeps.
pub const OPTIMIZED_PROMPT_CLAUSES: usize = 4;

/// How long a single Stability request may take before it counts as failed.
pub const DEFAULT_STABILITY_TIMEOUT: Duration = Duration::from_secs(60);
