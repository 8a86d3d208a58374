//! Client for the Stability text-to-image REST API.

use std::future::Future;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use super::{ImageEndpoint, ImageGenError, ImageRequest, ImageResponse};
use crate::constants::{STABILITY_CFG_SCALE, STABILITY_TEXT_TO_IMAGE_PATH};

/// Request body for POST /v1/generation/{engine}/text-to-image
#[derive(Serialize, Debug)]
struct TextToImageRequest<'a> {
    text_prompts: [TextPrompt<'a>; 1],
    cfg_scale: u8,
    height: u32,
    width: u32,
    samples: u8,
}

#[derive(Serialize, Debug)]
struct TextPrompt<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct TextToImageResponse {
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

#[derive(Deserialize, Debug)]
struct Artifact {
    base64: String,
}

/// Talks to Stability on behalf of the service, holding the API key.
#[derive(Clone, Debug)]
pub struct StabilityClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl StabilityClient {
    /// Creates a client whose requests give up after `timeout`. A blank key
    /// counts as no key.
    pub fn new(
        base_url: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ImageGenError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    /// Whether a credential is configured.
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generates one image and returns it as a data URI.
    #[instrument(level = "debug", skip(self, prompt))]
    pub async fn text_to_image(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> Result<String, ImageGenError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ImageGenError::MissingApiKey)?;
        let endpoint = self.base_url.join(STABILITY_TEXT_TO_IMAGE_PATH)?;

        let req_body = TextToImageRequest {
            text_prompts: [TextPrompt { text: prompt }],
            cfg_scale: STABILITY_CFG_SCALE,
            height,
            width,
            samples: 1,
        };

        let resp = self
            .http
            .post(endpoint)
            .bearer_auth(api_key)
            .header(ACCEPT, "application/json")
            .json(&req_body)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            return Err(ImageGenError::Status {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let parsed: TextToImageResponse = serde_json::from_slice(&bytes)
            .map_err(|err| ImageGenError::Malformed(format!("invalid JSON: {err}")))?;
        let artifact = parsed
            .artifacts
            .into_iter()
            .next()
            .ok_or(ImageGenError::NoArtifacts)?;

        let image_bytes = general_purpose::STANDARD
            .decode(artifact.base64.trim())
            .map_err(|err| ImageGenError::Malformed(format!("artifact is not base64: {err}")))?;
        let format = image::guess_format(&image_bytes)
            .map_err(|err| ImageGenError::Malformed(format!("artifact is not an image: {err}")))?;
        debug!("Stability returned {} bytes of {format:?}", image_bytes.len());

        Ok(format!(
            "data:{};base64,{}",
            format.to_mime_type(),
            general_purpose::STANDARD.encode(&image_bytes)
        ))
    }
}

impl ImageEndpoint for StabilityClient {
    fn generate(&self, request: ImageRequest) -> impl Future<Output = ImageResponse> + Send {
        async move {
            match self
                .text_to_image(&request.prompt, request.width, request.height)
                .await
            {
                Ok(image_url) => ImageResponse::generated(image_url, request.prompt),
                Err(err) => {
                    warn!("Stability image generation failed: {err}");
                    err.into()
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
    use axum::routing::post;
    use serde_json::{Value, json};
    use url::Url;

    use super::*;
    pub(crate) use crate::constants::DEFAULT_STABILITY_TIMEOUT;

    pub(crate) const TEST_API_KEY: &str = "sk-test";

    /// Enough of a PNG header for format sniffing.
    pub(crate) const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

    /// Serves `router` on an ephemeral port and returns its base URL.
    pub(crate) async fn spawn_engine(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake engine");
        let addr = listener.local_addr().expect("fake engine address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Url::parse(&format!("http://{addr}/")).expect("fake engine url")
    }

    /// A Stability stand-in that checks the key and returns a tiny PNG.
    pub(crate) fn working_engine() -> Router {
        Router::new().route(
            &format!("/{STABILITY_TEXT_TO_IMAGE_PATH}"),
            post(|headers: HeaderMap, axum::Json(body): axum::Json<Value>| async move {
                let expected = format!("Bearer {TEST_API_KEY}");
                let authorized = headers
                    .get(AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    == Some(expected.as_str());
                if !authorized {
                    return (StatusCode::UNAUTHORIZED, axum::Json(json!({"message": "bad key"})));
                }
                if body["text_prompts"][0]["text"].as_str().is_none_or(str::is_empty) {
                    return (StatusCode::BAD_REQUEST, axum::Json(json!({"message": "no prompt"})));
                }
                let encoded = general_purpose::STANDARD.encode(PNG_BYTES);
                (
                    StatusCode::OK,
                    axum::Json(json!({"artifacts": [{"base64": encoded, "seed": 1}]})),
                )
            }),
        )
    }

    /// Client holding the test key with the default timeout.
    pub(crate) fn test_client(base_url: Url) -> StabilityClient {
        StabilityClient::new(
            base_url,
            Some(TEST_API_KEY.to_string()),
            DEFAULT_STABILITY_TIMEOUT,
        )
        .expect("test client")
    }

    /// A Stability stand-in that accepts requests and never answers.
    pub(crate) fn hanging_engine() -> Router {
        Router::new().route(
            &format!("/{STABILITY_TEXT_TO_IMAGE_PATH}"),
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                StatusCode::OK
            }),
        )
    }

    /// A Stability stand-in that always answers with `status` and `body`.
    pub(crate) fn fixed_engine(status: StatusCode, body: Value) -> Router {
        Router::new().route(
            &format!("/{STABILITY_TEXT_TO_IMAGE_PATH}"),
            post(move || {
                let body = body.clone();
                async move { (status, axum::Json(body)) }
            }),
        )
    }
}
