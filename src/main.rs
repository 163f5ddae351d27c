use clap::Parser;
use small_cart::domain::ports::ConfigProvider;
use small_cart::utils::error::ErrorSeverity;
use small_cart::utils::{logger, validation::Validate};
use small_cart::{
    catalog_source_for, CartPersistence, CliCommand, CliConfig, Command, LocalStorage, Presenter,
    Shop, ShopError, ShopSettings,
};
use std::io::Write;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting small-cart CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ small-cart failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(config: &CliConfig) -> Result<(), ShopError> {
    let settings = ShopSettings::resolve(config)?;
    settings.validate()?;
    tracing::debug!("Effective settings: {:?}", settings);

    let source = catalog_source_for(
        settings.catalog_source(),
        settings.request_timeout_seconds(),
    )?;
    let storage = LocalStorage::new(settings.storage_path().to_string());
    let persistence = CartPersistence::with_key(storage, settings.storage_key());

    let (mut shop, notifications) = Shop::open(source.as_ref(), persistence).await?;
    let presenter = Presenter::new(settings.currency(), config.json);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", presenter.render_notifications(&notifications)?)?;

    let command = match config.command {
        CliCommand::Products => Command::Products,
        CliCommand::Cart => Command::Cart,
        CliCommand::Add { id } => Command::Add(id),
        CliCommand::Inc { id } => Command::Increment(id),
        CliCommand::Dec { id } => Command::Decrement(id),
        CliCommand::Remove { id } => Command::Remove(id),
        CliCommand::Shell => {
            let stdin = std::io::stdin();
            return presenter.run_shell(&mut shop, stdin.lock(), out);
        }
    };

    let rendered = presenter.execute(&mut shop, command)?;
    write!(out, "{}", rendered)?;
    Ok(())
}
