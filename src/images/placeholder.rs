//! Locally rendered stand-in illustrations.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::ImageRef;
use crate::constants::{
    IMAGE_HEIGHT, IMAGE_WIDTH, PLACEHOLDER_GRADIENT_FROM, PLACEHOLDER_GRADIENT_TO,
    PLACEHOLDER_TEXT_CHARS,
};

/// Bytes left readable in a URI component.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// SVG with a diagonal gradient and the start of the prompt as caption.
pub fn placeholder_svg(prompt: &str) -> String {
    let caption: String = prompt.chars().take(PLACEHOLDER_TEXT_CHARS).collect();
    let caption = html_escape::encode_text(&caption);

    format!(
        r##"<svg width="{IMAGE_WIDTH}" height="{IMAGE_HEIGHT}" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="placeholder-gradient" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" style="stop-color:{PLACEHOLDER_GRADIENT_FROM};stop-opacity:1" />
      <stop offset="100%" style="stop-color:{PLACEHOLDER_GRADIENT_TO};stop-opacity:1" />
    </linearGradient>
  </defs>
  <rect width="{IMAGE_WIDTH}" height="{IMAGE_HEIGHT}" fill="url(#placeholder-gradient)" />
  <text x="50%" y="50%" font-size="32" text-anchor="middle" fill="white">{caption}...</text>
</svg>
"##
    )
}

/// Placeholder illustration as a self-contained, percent-encoded data URI.
pub fn placeholder_image(prompt: &str) -> ImageRef {
    let svg = placeholder_svg(prompt);
    ImageRef::Placeholder {
        url: format!(
            "data:image/svg+xml,{}",
            utf8_percent_encode(&svg, URI_COMPONENT)
        ),
    }
}
