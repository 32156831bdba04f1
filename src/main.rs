use clap::Parser;
use track_scout::{analyzer, cli, config, error, interactive};
use cli::{Cli, Commands};
use config::Config;
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("✖ {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { image, json } => {
            let client = analyzer::GeminiClient::new(config.gemini_settings()?)?;
            let output =
                interactive::analyze_once(&image, &std::env::temp_dir(), &client, json).await?;
            println!("{}", output);
        }

        Commands::Session => {
            let client = analyzer::GeminiClient::new(config.gemini_settings()?)?;
            println!("🐾 track-scout - 足跡識別セッション\n");
            interactive::run_interactive_session(&client).await?;
        }

        Commands::Config { set_api_key, set_model, set_timeout, show } => {
            let mut config = config;
            let changed = set_api_key.is_some() || set_model.is_some() || set_timeout.is_some();

            if let Some(key) = set_api_key {
                config.api_key = Some(key);
            }
            if let Some(model) = set_model {
                config.model = model;
            }
            if let Some(secs) = set_timeout {
                config.timeout_seconds = secs;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  エンドポイント: {}", config.base_url);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}
