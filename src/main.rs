use clap::{Parser, Subcommand};
use tokio::io::BufReader;

use cog_orm::application::errors::BotError;
use cog_orm::cogs::example_cog;
use cog_orm::infrastructure::adapters::ConsoleAdapter;
use cog_orm::infrastructure::config::Config;
use cog_orm::Bot;

#[derive(Parser)]
#[command(name = "cog-orm")]
#[command(about = "A bot whose cogs bring their own database models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Database url for the default connection (overrides config)
    #[arg(short, long)]
    database: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(cli.config, cli.database).await,
        Commands::Version => {
            println!("cog-orm v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run_bot(config_path: String, database_override: Option<String>) -> Result<(), BotError> {
    let mut config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path)?
    } else {
        tracing::warn!("Config file {} not found, using environment", config_path);
        Config::load_env()
    };

    if let Some(url) = database_override {
        config.database.connections.insert("default".to_string(), url);
    }

    tracing::info!("Starting {}", config.bot.name);

    let mut bot = Bot::new(config.bot.prefix.clone(), config.database.clone());
    example_cog::setup(&mut bot)?;
    tracing::info!("Loaded {} cogs", bot.cogs().len());

    bot.connect().await?;

    match config.adapters.console.as_ref().filter(|c| c.enabled) {
        Some(console) => {
            let adapter = ConsoleAdapter::new(console);
            adapter.run(&bot, BufReader::new(tokio::io::stdin())).await?;
        }
        None => {
            tracing::info!("No adapter enabled, waiting for Ctrl-C");
            tokio::signal::ctrl_c().await?;
        }
    }

    bot.close().await
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
