//! JSON handlers for story and image generation.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Serialize;
use tracing::{info, instrument};

use super::AppState;
use crate::constants::SCENE_COUNT;
use crate::error::StorybookError;
use crate::images::{BatchProgress, ImageRequest, ImageResponse};
use crate::story::{Scene, StoryRequest, build_scenes};

/// A story as returned to clients.
#[derive(Debug, Serialize)]
pub(crate) struct StoryResponse {
    pub(crate) request: StoryRequest,
    pub(crate) scenes: Vec<Scene>,
}

/// handles POST /api/image-generation
#[instrument(level = "debug", skip_all)]
pub(crate) async fn image_generation_handler(
    State(state): State<AppState>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<ImageResponse>, StorybookError> {
    let Json(request) = payload?;
    if request.prompt.trim().is_empty() {
        return Err(StorybookError::BadRequest("Missing prompt".to_string()));
    }

    let image_url = state
        .images
        .text_to_image(&request.prompt, request.width, request.height)
        .await?;
    Ok(Json(ImageResponse::generated(image_url, request.prompt)))
}

/// handles POST /api/stories/draft
pub(crate) async fn draft_story_handler(
    State(state): State<AppState>,
    payload: Result<Json<StoryRequest>, JsonRejection>,
) -> Result<Json<StoryResponse>, StorybookError> {
    let Json(request) = payload?;
    let scenes = build_scenes(&state.templates, &request);
    Ok(Json(StoryResponse { request, scenes }))
}

/// handles POST /api/stories
#[instrument(level = "debug", skip_all)]
pub(crate) async fn create_story_handler(
    State(state): State<AppState>,
    payload: Result<Json<StoryRequest>, JsonRejection>,
) -> Result<Json<StoryResponse>, StorybookError> {
    let Json(request) = payload?;
    info!(
        "Generating {}/{}/{} story",
        request.genre(),
        request.tone(),
        request.audience()
    );

    let scenes = build_scenes(&state.templates, &request);
    let scenes = state.resolver.resolve_scenes(scenes, &request).await;
    Ok(Json(StoryResponse { request, scenes }))
}

/// handles POST /api/stories/scenes/{sequence}/illustration
pub(crate) async fn regenerate_scene_handler(
    State(state): State<AppState>,
    Path(sequence): Path<u8>,
    payload: Result<Json<StoryRequest>, JsonRejection>,
) -> Result<Json<Scene>, StorybookError> {
    let Json(request) = payload?;
    let scene = build_scenes(&state.templates, &request)
        .into_iter()
        .find(|scene| scene.sequence() == sequence)
        .ok_or_else(|| {
            StorybookError::NotFound(format!(
                "scene {sequence}, stories have scenes 1 to {SCENE_COUNT}"
            ))
        })?;

    Ok(Json(state.resolver.regenerate(scene, &request).await))
}

/// handles GET /api/stories/progress
pub(crate) async fn progress_handler(State(state): State<AppState>) -> Json<BatchProgress> {
    Json(state.resolver.progress())
}

/// handles GET /healthz
pub(crate) async fn health_handler() -> &'static str {
    "ok"
}
