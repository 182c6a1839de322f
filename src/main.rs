use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use kantine::core::render;
use kantine::core::week::weekday_index;
use kantine::domain::model::SourceSummary;
use kantine::domain::ports::Storage;
use kantine::utils::error::ErrorSeverity;
use kantine::utils::{logger, validation::Validate};
use kantine::{CliConfig, LocalStorage, MenuService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        tracing::error!("Invalid arguments: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let config = match cli.load_menu_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration failed: {} ({})", e, e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            let code = if e.severity() >= ErrorSeverity::Critical { 3 } else { 1 };
            std::process::exit(code);
        }
    };

    let service = MenuService::from_config(&config).context("failed to set up menu service")?;
    let today: NaiveDate = cli.date.unwrap_or_else(|| Local::now().date_naive());

    if cli.json {
        let sources = service.weekly_menus(today).await;
        let summaries: Vec<SourceSummary> = sources.iter().map(SourceSummary::from).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    let Some(day) = cli.day.or_else(|| weekday_index(today)) else {
        println!("No canteen menus on weekends.");
        return Ok(());
    };

    tracing::info!("Fetching menus for weekday {} ({})", day, today);
    let entries = service.menu_for_day(day, today).await;
    let message = render::compose(&entries);
    println!("{}", message.text);

    if message.attachments.is_empty() {
        return Ok(());
    }

    match &cli.output_path {
        Some(output_path) => {
            let storage = LocalStorage::new(output_path.clone());
            for attachment in &message.attachments {
                let path = storage
                    .write_file(&attachment.filename, &attachment.data)
                    .await
                    .with_context(|| format!("failed to save {}", attachment.filename))?;
                println!("📎 {}: {}", attachment.caption, path);
            }
        }
        None => {
            for attachment in &message.attachments {
                println!(
                    "📎 {} ({} bytes, use --output-path to save)",
                    attachment.caption,
                    attachment.data.len()
                );
            }
        }
    }

    Ok(())
}
