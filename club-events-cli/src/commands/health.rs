use anyhow::{Context, Result};
use club_events_core::remote::HttpClient;
use owo_colors::OwoColorize;

pub async fn run(client: HttpClient) -> Result<()> {
    client
        .health()
        .await
        .with_context(|| format!("API at {} is not reachable", client.base_url()))?;

    println!("{}", format!("API at {} is up", client.base_url()).green());

    Ok(())
}
