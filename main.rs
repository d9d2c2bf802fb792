use todo_input::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    check_dot_env();
    #[cfg(feature = "traces")]
    init_tracing_subscriber();

    let config = AppConfig::from_env();
    debug!("Loaded {config:?}");
    serve(app(config.clone()), &config).await?;
    Ok(())
}
