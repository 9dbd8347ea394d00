use clap::Parser;
use pantrypal::cli::utils::output_error;
use pantrypal::cli::{Cli, OutputFormat};
use pantrypal::ClientError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so PANTRY_API_URL and friends are picked up
    let _ = dotenvy::dotenv();

    let default_filter = if pantrypal::is_development!() { "pantrypal=debug" } else { "pantrypal=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = pantrypal::cli::run(cli).await {
        match output_format {
            OutputFormat::Json => {
                let code = e.downcast_ref::<ClientError>().map(ClientError::error_code);
                output_error(&output_format, &e.to_string(), code)?;
            }
            OutputFormat::Text => match std::env::var("CLI_VERBOSE").as_deref() {
                Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
                _ => eprintln!("Error: {e}"),
            },
        }
        std::process::exit(1);
    }

    Ok(())
}
