use showreel_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Creates the portfolio document on first run and builds the router
    let (_state, router) = showreel_api::setup::initialize_app(config.clone()).await?;

    showreel_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
