mod telemetry;

use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply.
    let dotenv = dotenvy::dotenv().ok();

    telemetry::init()?;

    match dotenv {
        Some(path) => info!(path = %path.display(), "loaded .env"),
        None => debug!("no .env file found"),
    }

    api::start().await?;

    Ok(())
}
