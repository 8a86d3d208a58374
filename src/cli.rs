//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;
use std::time::Duration;
use url::Url;

use crate::constants::DEFAULT_STABILITY_URL;
use crate::images::{ImageGenError, StabilityClient};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "STORYBOOK_DEBUG")]
    /// Enable debug logging. Env: STORYBOOK_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "9000", env = "STORYBOOK_PORT")]
    /// http listener, defaults to `9000`.
    /// Env: STORYBOOK_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "STORYBOOK_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: STORYBOOK_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(long, env = "STABILITY_API_KEY", hide_env_values = true)]
    /// Stability API key. Without it every image request falls back to a placeholder.
    /// Env: STABILITY_API_KEY
    pub stability_api_key: Option<String>,

    #[clap(long, default_value = DEFAULT_STABILITY_URL, env = "STORYBOOK_STABILITY_URL")]
    /// Base URL of the Stability API.
    /// Env: STORYBOOK_STABILITY_URL
    pub stability_url: Url,

    #[clap(long, default_value = "60", env = "STORYBOOK_STABILITY_TIMEOUT_SECS")]
    /// Seconds before a Stability request is abandoned.
    /// Env: STORYBOOK_STABILITY_TIMEOUT_SECS
    pub stability_timeout_secs: u64,

    #[clap(long, default_value = "1500", env = "STORYBOOK_SCENE_DELAY_MS")]
    /// Pause between scene illustrations in milliseconds.
    /// Env: STORYBOOK_SCENE_DELAY_MS
    pub scene_delay_ms: u64,

    #[clap(long, env = "STORYBOOK_OPTIMIZE_PROMPTS")]
    /// Shorten prompts before sending them to the image engine.
    /// Env: STORYBOOK_OPTIMIZE_PROMPTS
    pub optimize_prompts: bool,
}

impl CliOptions {
    /// Pause between two scene illustrations
    pub fn scene_delay(&self) -> Duration {
        Duration::from_millis(self.scene_delay_ms)
    }

    /// Per-request Stability timeout
    pub fn stability_timeout(&self) -> Duration {
        Duration::from_secs(self.stability_timeout_secs)
    }

    /// Builds the Stability client these options describe.
    pub fn stability_client(&self) -> Result<StabilityClient, ImageGenError> {
        StabilityClient::new(
            self.stability_url.clone(),
            self.stability_api_key.clone(),
            self.stability_timeout(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let cli = CliOptions::try_parse_from(["storybook"]).expect("parse defaults");
        assert_eq!(cli.port.get(), 9000);
        assert_eq!(cli.listen_address, "127.0.0.1");
        assert_eq!(cli.stability_url.as_str(), DEFAULT_STABILITY_URL);
        assert_eq!(cli.scene_delay(), crate::constants::DEFAULT_SCENE_DELAY);
        assert_eq!(
            cli.stability_timeout(),
            crate::constants::DEFAULT_STABILITY_TIMEOUT
        );
        assert!(!cli.optimize_prompts);
    }

    #[test]
    fn overrides_parse() {
        let cli = CliOptions::try_parse_from([
            "storybook",
            "--port",
            "8080",
            "--stability-url",
            "http://127.0.0.1:4000/",
            "--scene-delay-ms",
            "0",
            "--optimize-prompts",
        ])
        .expect("parse overrides");
        assert_eq!(cli.port.get(), 8080);
        assert_eq!(cli.stability_url.as_str(), "http://127.0.0.1:4000/");
        assert!(cli.scene_delay().is_zero());
        assert!(cli.optimize_prompts);
    }

    #[test]
    fn options_build_a_stability_client() {
        let cli = CliOptions::try_parse_from([
            "storybook",
            "--stability-api-key",
            "sk-test",
            "--stability-timeout-secs",
            "5",
        ])
        .expect("parse key");
        assert_eq!(cli.stability_timeout(), Duration::from_secs(5));
        let client = cli.stability_client().expect("client");
        assert!(client.has_api_key());
        // options stay usable after the client is built
        assert!(!cli.scene_delay().is_zero());

        let cli = CliOptions::try_parse_from(["storybook", "--stability-api-key", " "])
            .expect("parse blank key");
        assert!(!cli.stability_client().expect("client").has_api_key());
    }
}
