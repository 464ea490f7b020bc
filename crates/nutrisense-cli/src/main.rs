mod commands;
mod output;

use clap::{Parser, Subcommand};
use nutrisense_core::config::ClientConfig;
use nutrisense_core::error::NutriError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "nutrisense",
    version,
    about = "Plant nutrient deficiency diagnosis from leaf images"
)]
struct Cli {
    /// Prediction service base URL (overrides NUTRISENSE_SERVER_URL)
    #[arg(long, global = true, value_name = "URL")]
    server_url: Option<String>,

    /// Custom agronomy table JSON (default: builtin table)
    #[arg(long, global = true, value_name = "FILE")]
    knowledge: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diagnose a leaf image (png, jpg, jpeg)
    Diagnose {
        /// Path to the leaf image
        image: PathBuf,

        /// Soil type at the growing site: loamy, clay, sandy, silty, peaty, chalky
        #[arg(short, long)]
        soil: Option<String>,

        /// Location sent with the image for environmental analysis
        #[arg(short, long)]
        location: Option<String>,

        /// Output format: text (default), json or html
        #[arg(short, long, default_value = "text")]
        output: String,

        /// Write the report to a file instead of stdout
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Suggest crops suited to a location
    Crops {
        location: String,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// List locations the service has data for
    Locations {
        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect the agronomy table
    Knowledge {
        #[command(subcommand)]
        action: KnowledgeAction,
    },
}

#[derive(Subcommand)]
enum KnowledgeAction {
    /// List crops and nutrients in the table
    List,
    /// Show soil, climate and nutrient data for a crop
    Show {
        /// Crop name (e.g., "Banana")
        crop: String,
    },
    /// Look up the treatment for a deficiency label and severity
    Treatment {
        /// Deficiency label as the service sends it (e.g., "Nitrogen(N)")
        label: String,
        /// Mild, Moderate or Severe
        severity: String,
    },
    /// Print the builtin table as JSON
    Export,
    /// Validate a custom agronomy table file
    Validate {
        /// Path to JSON table file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), NutriError> {
    let knowledge = cli.knowledge;
    let server_url = cli.server_url;
    let client_config = move || -> Result<ClientConfig, NutriError> {
        let config = ClientConfig::from_env()?;
        Ok(match server_url {
            Some(url) => config.with_server_url(url),
            None => config,
        })
    };

    match cli.command {
        Commands::Diagnose {
            image,
            soil,
            location,
            output,
            out,
        } => {
            commands::diagnose::run(
                client_config()?,
                knowledge.as_deref(),
                image,
                soil,
                location,
                &output,
                out,
            )
            .await
        }
        Commands::Crops { location, output } => {
            commands::crops::run(client_config()?, &location, &output).await
        }
        Commands::Locations { output } => {
            commands::crops::locations(client_config()?, &output).await
        }
        Commands::Knowledge { action } => match action {
            KnowledgeAction::List => commands::knowledge::list(knowledge.as_deref()),
            KnowledgeAction::Show { crop } => commands::knowledge::show(knowledge.as_deref(), &crop),
            KnowledgeAction::Treatment { label, severity } => {
                commands::knowledge::treatment(knowledge.as_deref(), &label, &severity)
            }
            KnowledgeAction::Export => commands::knowledge::export(),
            KnowledgeAction::Validate { file } => commands::knowledge::validate(&file),
        },
    }
}
