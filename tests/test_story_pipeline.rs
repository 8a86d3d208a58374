use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use storybook::config::setup_logging;
use storybook::images::{
    BatchProgress, ImageEndpoint, ImageRef, ImageRequest, ImageResolver, ImageResponse,
};
use storybook::story::{Audience, Genre, StoryRequest, TemplateTable, Tone, build_scenes};

/// Numbers its images and refuses the second request.
#[derive(Default)]
struct FlakyEngine {
    calls: AtomicUsize,
}

impl ImageEndpoint for FlakyEngine {
    fn generate(&self, request: ImageRequest) -> impl Future<Output = ImageResponse> + Send {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if call == 2 {
                ImageResponse::failed("rate limited")
            } else {
                ImageResponse::generated(format!("https://img.test/{call}.png"), request.prompt)
            }
        }
    }
}

#[tokio::test]
async fn test_story_with_one_failed_illustration() {
    let _ = setup_logging(true);

    let templates = TemplateTable::builtin().expect("builtin templates");
    let request = StoryRequest::new(
        "a lonely robot finds a flower",
        Genre::SciFi,
        Tone::Peaceful,
        Audience::Kids,
    )
    .expect("valid request");

    let scenes = build_scenes(&templates, &request);
    assert_eq!(scenes.len(), 5);
    assert!(
        scenes[0]
            .body()
            .contains("world of tomorrow where a lonely robot finds a flower, a curious")
    );

    let resolver = ImageResolver::new(Arc::new(FlakyEngine::default()), Duration::ZERO);
    let scenes = resolver.resolve_scenes(scenes, &request).await;

    let sequences: Vec<u8> = scenes.iter().map(|scene| scene.sequence()).collect();
    assert_eq!(sequences, vec![1, 2, 3, 4, 5]);

    for scene in &scenes {
        let image = scene.image().expect("every scene is illustrated");
        if scene.sequence() == 2 {
            assert!(image.is_placeholder());
            assert!(image.url().starts_with("data:image/svg+xml,"));
            assert!(image.url().contains("linearGradient"));
        } else {
            assert_eq!(
                image,
                &ImageRef::Generated {
                    url: format!("https://img.test/{}.png", scene.sequence())
                }
            );
        }
        assert!(scene.prompt().is_some_and(|prompt| !prompt.is_empty()));
    }
    assert_eq!(
        resolver.progress(),
        BatchProgress {
            completed: 5,
            total: 5
        }
    );
}

#[test]
fn test_blank_idea_is_rejected() {
    let result = StoryRequest::new("   ", Genre::default(), Tone::default(), Audience::default());
    assert!(result.is_err());
}
