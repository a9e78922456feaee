use anyhow::{anyhow, Context};
use chrono::Utc;
use feed_app::components::{PostComposer, SubmitOutcome};
use feed_app::{App, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Render the home page against the configured backend
///
/// With an argument, the text is posted through the composer first (requires
/// a seeded session).
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,feed_app=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().context("Configuration loading failed")?;

    tracing::info!(
        env = %config.app.env,
        api = %config.api.base_url,
        "Starting feed client"
    );

    let app = App::new(config)?;
    let refresh = app.page.mount();
    app.resolve_session();

    app.page.feed().load().await;

    if let Some(content) = std::env::args().nth(1) {
        post(app.page.composer(), content).await?;
        app.page.feed().load().await;
    }

    println!("{}", app.page.render_document(Utc::now()));

    let stats = app.client.stats();
    tracing::debug!(
        hits = stats.hits,
        misses = stats.misses,
        invalidations = stats.invalidations,
        "Query cache statistics"
    );

    drop(refresh);
    Ok(())
}

async fn post(composer: &PostComposer, content: String) -> anyhow::Result<()> {
    composer.set_input(content);

    match composer.submit().await {
        SubmitOutcome::Posted => Ok(()),
        SubmitOutcome::Failed(message) => {
            tracing::warn!(message = %message, "Post rejected");
            Ok(())
        }
        SubmitOutcome::Ignored => Err(anyhow!(
            "Nothing posted: a signed-in session and non-empty content are required"
        )),
    }
}
