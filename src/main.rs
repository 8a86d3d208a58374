use clap::Parser;
use storybook::config::setup_logging;
use storybook::story::TemplateTable;
use tracing::error;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = storybook::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    let templates = match TemplateTable::builtin() {
        Ok(templates) => templates,
        Err(err) => {
            error!("Failed to load story templates: {}", err);
            return;
        }
    };

    let images = match cli.stability_client() {
        Ok(images) => images,
        Err(err) => {
            error!("Failed to build Stability client: {}", err);
            return;
        }
    };

    if let Err(err) = storybook::web::setup_server(
        &cli.listen_address,
        cli.port,
        templates,
        images,
        cli.scene_delay(),
        cli.optimize_prompts,
    )
    .await
    {
        error!("Application error: {}", err);
    }
}
