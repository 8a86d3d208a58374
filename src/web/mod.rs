//! HTTP service exposing the story pipeline.

use std::num::NonZeroU16;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::images::{ImageResolver, StabilityClient};
use crate::story::TemplateTable;

mod api;

use api::{
    create_story_handler, draft_story_handler, health_handler, image_generation_handler,
    progress_handler, regenerate_scene_handler,
};

/// Shared by every request. The resolver is shared too, so its progress
/// reflects the most recent story batch.
#[derive(Clone, Debug)]
pub(crate) struct AppState {
    templates: Arc<TemplateTable>,
    images: Arc<StabilityClient>,
    resolver: Arc<ImageResolver<StabilityClient>>,
}

impl AppState {
    fn new(
        templates: TemplateTable,
        images: StabilityClient,
        scene_delay: Duration,
        optimize_prompts: bool,
    ) -> Self {
        let images = Arc::new(images);
        let resolver = ImageResolver::new(Arc::clone(&images), scene_delay)
            .with_prompt_optimization(optimize_prompts);
        Self {
            templates: Arc::new(templates),
            images,
            resolver: Arc::new(resolver),
        }
    }
}

fn create_router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/api/image-generation", post(image_generation_handler))
        .route("/api/stories", post(create_story_handler))
        .route("/api/stories/draft", post(draft_story_handler))
        .route("/api/stories/progress", get(progress_handler))
        .route(
            "/api/stories/scenes/{sequence}/illustration",
            post(regenerate_scene_handler),
        )
        .layer(TraceLayer::new_for_http())
}

/// Runs the service until it fails.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    templates: TemplateTable,
    images: StabilityClient,
    scene_delay: Duration,
    optimize_prompts: bool,
) -> Result<(), anyhow::Error> {
    if !images.has_api_key() {
        warn!("No Stability API key configured, every illustration will be a placeholder");
    }
    let app = create_router().with_state(AppState::new(
        templates,
        images,
        scene_delay,
        optimize_prompts,
    ));

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {}", err);
    }
    Ok(())
}
