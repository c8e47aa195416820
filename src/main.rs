use clap::Parser;
use pulse_sync::utils::{logger, validation::Validate};
use pulse_sync::{CliConfig, EtlEngine, Extractor, MongoStore, PulsePipeline, Settings, Transformer};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting pulse-sync");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = Settings::resolve(&cli);
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(2);
    }

    let extractor = match Extractor::new(&settings) {
        Ok(extractor) => extractor,
        Err(e) => {
            tracing::error!("❌ {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    };

    let store = match MongoStore::connect(&settings.connection_uri, &settings.database).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("❌ Could not configure the document store: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(3);
        }
    };

    let pipeline = PulsePipeline::new(extractor, Transformer::new(), store, settings);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(true) => {
            println!("✅ Pulse sync completed successfully");
        }
        Ok(false) => {
            eprintln!("❌ Pulse sync failed; see the log for the failing stage");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("❌ Pulse sync aborted: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(3);
        }
    }
}
