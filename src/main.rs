use anyhow::Context;
use clap::Parser;
use site_scout::app::report;
use site_scout::config::OutputFormat;
use site_scout::core::Storage;
use site_scout::utils::error::ErrorSeverity;
use site_scout::utils::{logger, validation::Validate};
use site_scout::{CliConfig, HttpSiteSearchPipeline, LocalStorage, ScoutConfig, ScoutEngine, ScoutError};

fn load_config(cli: &CliConfig) -> anyhow::Result<ScoutConfig> {
    let mut config = match &cli.config {
        Some(path) => ScoutConfig::from_file(path)
            .with_context(|| format!("failed to load config file {}", path))?,
        None => ScoutConfig::default(),
    };
    cli.apply_overrides(&mut config);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn exit_code(error: &ScoutError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn report_error(error: &ScoutError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        error,
        error.category(),
        error.severity()
    );
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 {}", error.recovery_suggestion());
    std::process::exit(exit_code(error).max(1));
}

async fn run(cli: CliConfig, config: ScoutConfig) -> Result<(), ScoutError> {
    let pipeline = HttpSiteSearchPipeline::from_config(&config)?;
    let engine = ScoutEngine::new(pipeline);

    let mut session = engine.search(&cli.link, config.search.radius_km).await?;
    if session.projects.is_empty() {
        tracing::warn!("No sites found within {} km", session.radius_km);
    }

    if cli.estimate {
        engine.enrich(&mut session).await;
    }

    let named = session.named_projects(&config.search.generic_name).count();
    tracing::info!("📋 {} sites ({} named)", session.projects.len(), named);

    let rendered = match cli.format {
        OutputFormat::Table => report::to_table(&session),
        OutputFormat::Json => report::to_json(&session)?,
        OutputFormat::Csv => report::to_csv(&session)?,
    };

    match &cli.output {
        Some(path) => {
            LocalStorage::new(".")
                .write_file(path, rendered.as_bytes())
                .await?;
            println!("📁 Results saved to: {}", path);
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        report_error(&e);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ {:#}", e);
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, config).await {
        report_error(&e);
    }
}
