use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use pdx_core::AppConfig;
use pdx_extractor::ProductExtractor;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pdx-cli")]
#[command(about = "Extract structured product data from product pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a product page and print the extracted record as JSON
    Extract {
        /// Absolute http(s) URL of the product page
        #[arg(long)]
        url: String,

        /// Credential for the generation service
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: ApiKey,

        /// Model identifier; overrides `PDX_MODEL`
        #[arg(long)]
        model: Option<String>,
    },
    /// Print the strict JSON schema sent with every generation request
    Schema,
}

/// Generation-service credential; `Debug` never shows the value.
#[derive(Clone, PartialEq, Eq)]
struct ApiKey(String);

impl ApiKey {
    fn expose(&self) -> &str {
        &self.0
    }
}

impl FromStr for ApiKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_owned()))
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([redacted])")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    run(cli.command).await
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Extract {
            url,
            api_key,
            model,
        } => {
            let config = pdx_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            run_extract(config, &url, &api_key, model).await
        }
        Commands::Schema => {
            println!("{}", render_schema()?);
            Ok(())
        }
    }
}

// stdout carries the JSON output; logs go to stderr.
fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn run_extract(
    mut config: AppConfig,
    url: &str,
    api_key: &ApiKey,
    model: Option<String>,
) -> anyhow::Result<()> {
    if let Some(model) = model {
        config.model = model;
    }

    let extractor = ProductExtractor::from_config(&config)?;
    let record = match extractor.extract_product(url, api_key.expose()).await {
        Ok(record) => record,
        Err(e) => {
            tracing::error!(url, code = e.code(), error = %e, "product extraction failed");
            return Err(e.into());
        }
    };

    tracing::info!(url, title = %record.title, model = extractor.model(), "extracted product");
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn render_schema() -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&pdx_core::product_schema())?)
}
