//! Scene illustration: the image engine seam, the Stability client, the
//! placeholder fallback and sequential batch resolution.

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::constants::{IMAGE_HEIGHT, IMAGE_WIDTH};

pub mod placeholder;
pub mod resolver;
pub mod stability;

pub use placeholder::placeholder_image;
pub use resolver::{BatchProgress, ImageResolver, resolve_image};
pub use stability::StabilityClient;

/// Body of an image generation request.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageRequest {
    /// What to draw
    #[serde(default)]
    pub prompt: String,
    /// Width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
}

const fn default_width() -> u32 {
    IMAGE_WIDTH
}

const fn default_height() -> u32 {
    IMAGE_HEIGHT
}

impl ImageRequest {
    /// Request at the standard story illustration size.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
        }
    }
}

/// Outcome reported by an image engine, `{success, imageUrl}` or `{success, error}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    /// Whether an image was produced
    pub success: bool,
    /// Data URI or URL of the image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Prompt the image was generated from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Short failure reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Raw upstream error text, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ImageResponse {
    /// A successful response.
    pub fn generated(image_url: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            success: true,
            image_url: Some(image_url.into()),
            prompt: Some(prompt.into()),
            ..Self::default()
        }
    }

    /// A failed response.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Something that turns a prompt into an image.
///
/// Implementations report every failure through [`ImageResponse::failed`]
/// instead of erroring, so callers can fall back uniformly.
pub trait ImageEndpoint: Send + Sync + 'static {
    /// Generates one image.
    fn generate(&self, request: ImageRequest) -> impl Future<Output = ImageResponse> + Send;
}

/// Where a scene's illustration lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageRef {
    /// Produced by the image engine
    Generated {
        /// Data URI or URL
        url: String,
    },
    /// Produced locally after the engine failed
    Placeholder {
        /// SVG data URI
        url: String,
    },
}

impl ImageRef {
    /// The URL or data URI to display.
    pub fn url(&self) -> &str {
        match self {
            Self::Generated { url } | Self::Placeholder { url } => url,
        }
    }

    /// True for locally generated fallbacks.
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

/// Failures talking to the image engine.
#[derive(Debug)]
pub enum ImageGenError {
    /// No API key configured
    MissingApiKey,
    /// The engine URL could not be built
    Url(url::ParseError),
    /// The request never completed
    Transport(reqwest::Error),
    /// The engine answered with a non-success status
    Status {
        /// HTTP status returned
        status: reqwest::StatusCode,
        /// Response body
        body: String,
    },
    /// The engine answered without any image
    NoArtifacts,
    /// The engine answered with something that isn't an image
    Malformed(String),
}

impl fmt::Display for ImageGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "Server missing STABILITY_API_KEY"),
            Self::Url(err) => write!(f, "Invalid Stability URL: {err}"),
            Self::Transport(err) => write!(f, "Request to Stability failed: {err}"),
            Self::Status { status, .. } => write!(f, "Stability API error {status}"),
            Self::NoArtifacts => write!(f, "No image returned from Stability"),
            Self::Malformed(reason) => write!(f, "Malformed Stability response: {reason}"),
        }
    }
}

impl std::error::Error for ImageGenError {}

impl From<url::ParseError> for ImageGenError {
    fn from(err: url::ParseError) -> Self {
        Self::Url(err)
    }
}

impl From<reqwest::Error> for ImageGenError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}

impl From<ImageGenError> for ImageResponse {
    fn from(err: ImageGenError) -> Self {
        let details = match &err {
            ImageGenError::Status { body, .. } => Some(body.clone()),
            _ => None,
        };
        Self {
            details,
            ..Self::failed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_story_size() {
        let request: ImageRequest =
            serde_json::from_str(r#"{"prompt":"a cat"}"#).expect("parse request");
        assert_eq!(request, ImageRequest::new("a cat"));
        assert_eq!((request.width, request.height), (1024, 768));
    }

    #[test]
    fn responses_use_camel_case() {
        let ok = serde_json::to_value(ImageResponse::generated("data:x", "a cat"))
            .expect("serialize");
        assert_eq!(
            ok,
            serde_json::json!({"success": true, "imageUrl": "data:x", "prompt": "a cat"})
        );

        let failed: ImageResponse =
            serde_json::from_str(r#"{"success":false,"error":"nope"}"#).expect("parse");
        assert_eq!(failed, ImageResponse::failed("nope"));
    }

    #[test]
    fn status_errors_keep_upstream_details() {
        let response = ImageResponse::from(ImageGenError::Status {
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: "bad key".to_string(),
        });
        assert!(!response.success);
        assert_eq!(response.details.as_deref(), Some("bad key"));
        assert!(
            response
                .error
                .as_deref()
                .is_some_and(|error| error.starts_with("Stability API error 401"))
        );
    }

    #[test]
    fn image_ref_serializes_with_kind() {
        let image = ImageRef::Generated {
            url: "https://img".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&image).expect("serialize"),
            serde_json::json!({"kind": "generated", "url": "https://img"})
        );
        assert!(!image.is_placeholder());
    }
}
