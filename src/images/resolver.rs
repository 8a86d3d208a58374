//! Turns prompts into illustrations, one scene at a time.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use super::placeholder::placeholder_image;
use super::{ImageEndpoint, ImageRef, ImageRequest, ImageResponse};
use crate::prompt::{compose_prompt, optimize_prompt};
use crate::story::{Scene, StoryRequest};

/// How far a batch has got.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    /// Scenes finished so far
    pub completed: usize,
    /// Scenes in the batch
    pub total: usize,
}

impl BatchProgress {
    /// `completed / total`, or zero when idle.
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Asks the endpoint for an image, substituting a placeholder on any failure.
#[instrument(level = "debug", skip_all)]
pub async fn resolve_image<E: ImageEndpoint>(endpoint: &E, prompt: &str) -> ImageRef {
    match endpoint.generate(ImageRequest::new(prompt)).await {
        ImageResponse {
            success: true,
            image_url: Some(url),
            ..
        } if !url.trim().is_empty() => ImageRef::Generated { url },
        ImageResponse { success: true, .. } => {
            warn!("Image engine reported success without an image, using placeholder");
            placeholder_image(prompt)
        }
        ImageResponse { error, .. } => {
            warn!(
                "Image generation failed ({}), using placeholder",
                error.as_deref().unwrap_or("no reason given")
            );
            placeholder_image(prompt)
        }
    }
}

/// Turns a scene of a story into an image prompt.
pub type PromptBuilder = fn(&Scene, &StoryRequest) -> String;

/// Illustrates the scenes of one story.
///
/// Scenes are handled strictly in order with a pause between them. Progress
/// is published on a watch channel and holds its final `N/N` value until the
/// next batch starts.
#[derive(Debug)]
pub struct ImageResolver<E> {
    endpoint: Arc<E>,
    scene_delay: Duration,
    optimize_prompts: bool,
    prompt_builder: PromptBuilder,
    progress: watch::Sender<BatchProgress>,
}

impl<E: ImageEndpoint> ImageResolver<E> {
    /// Creates a resolver pausing `scene_delay` between scenes.
    pub fn new(endpoint: Arc<E>, scene_delay: Duration) -> Self {
        let (progress, _) = watch::channel(BatchProgress::default());
        Self {
            endpoint,
            scene_delay,
            optimize_prompts: false,
            prompt_builder: compose_prompt,
            progress,
        }
    }

    /// Run composed prompts through [`optimize_prompt`] before sending them.
    #[must_use]
    pub const fn with_prompt_optimization(mut self, enabled: bool) -> Self {
        self.optimize_prompts = enabled;
        self
    }

    /// Replace [`compose_prompt`] as the source of scene prompts.
    #[must_use]
    pub const fn with_prompt_builder(mut self, builder: PromptBuilder) -> Self {
        self.prompt_builder = builder;
        self
    }

    /// Follow batch progress.
    pub fn subscribe(&self) -> watch::Receiver<BatchProgress> {
        self.progress.subscribe()
    }

    /// Progress of the most recent batch.
    pub fn progress(&self) -> BatchProgress {
        *self.progress.borrow()
    }

    /// Builds the prompt for one scene on its own task.
    ///
    /// A fault while building falls back to the scene title.
    async fn prompt_for(&self, scene: &Scene, request: &StoryRequest) -> Result<String, String> {
        let builder = self.prompt_builder;
        let optimize = self.optimize_prompts;
        let task_scene = scene.clone();
        let task_request = request.clone();
        let outcome = tokio::spawn(async move {
            let prompt = builder(&task_scene, &task_request);
            if optimize {
                optimize_prompt(&prompt)
            } else {
                prompt
            }
        })
        .await;

        outcome.map_err(|err| {
            error!("Error building prompt for scene {}: {err}", scene.sequence());
            scene.title().to_string()
        })
    }

    /// Builds the prompt for one scene and resolves it.
    ///
    /// Prompt building and the image request each run on their own task, so
    /// a fault in either leaves the scene without an image instead of taking
    /// the batch down.
    async fn illustrate(
        &self,
        scene: &Scene,
        request: &StoryRequest,
    ) -> (String, Option<ImageRef>) {
        let prompt = match self.prompt_for(scene, request).await {
            Ok(prompt) => prompt,
            Err(fallback) => return (fallback, None),
        };
        info!("Generating image for scene {}: {prompt}", scene.sequence());

        let endpoint = Arc::clone(&self.endpoint);
        let task_prompt = prompt.clone();
        let outcome =
            tokio::spawn(async move { resolve_image(endpoint.as_ref(), &task_prompt).await })
                .await;

        match outcome {
            Ok(image) => (prompt, Some(image)),
            Err(err) => {
                error!("Error generating image for scene {}: {err}", scene.sequence());
                (prompt, None)
            }
        }
    }

    /// Illustrates every scene, returning them in their original order.
    pub async fn resolve_scenes(&self, scenes: Vec<Scene>, request: &StoryRequest) -> Vec<Scene> {
        let total = scenes.len();
        self.progress.send_replace(BatchProgress {
            completed: 0,
            total,
        });

        let mut illustrated = Vec::with_capacity(total);
        for (index, mut scene) in scenes.into_iter().enumerate() {
            let (prompt, image) = self.illustrate(&scene, request).await;
            scene.attach_illustration(prompt, image);
            illustrated.push(scene);

            let completed = index + 1;
            self.progress.send_replace(BatchProgress { completed, total });
            info!("Illustrated {completed}/{total} scenes");

            if completed < total && !self.scene_delay.is_zero() {
                tokio::time::sleep(self.scene_delay).await;
            }
        }

        illustrated
    }

    /// Illustrates a single scene again.
    pub async fn regenerate(&self, mut scene: Scene, request: &StoryRequest) -> Scene {
        let (prompt, image) = self.illustrate(&scene, request).await;
        scene.attach_illustration(prompt, image);
        scene
    }
}
