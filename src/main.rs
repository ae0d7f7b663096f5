use clap::Parser;
use nearby_wiki::adapters::location::gate_from_settings;
use nearby_wiki::utils::error::{ErrorSeverity, NearbyError};
use nearby_wiki::utils::logger;
use nearby_wiki::{Article, CliConfig, HttpTransport, NearbyFinder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting nearby-wiki");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let (api, location) = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let transport = match HttpTransport::new(&api) {
        Ok(transport) => transport,
        Err(e) => exit_with(&e),
    };
    let gate = gate_from_settings(&location);
    let finder = NearbyFinder::new(gate, transport, api)
        .with_permission_timeout(location.permission_timeout());

    match finder.run().await {
        Ok(articles) => {
            tracing::info!("✅ Geosearch completed with {} articles", articles.len());
            print_articles(&articles, config.json)?;
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}

fn print_articles(articles: &[Article], as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(articles)?);
    } else if articles.is_empty() {
        println!("No articles found nearby");
    } else {
        for article in articles {
            println!("{}", article);
        }
    }
    Ok(())
}

fn exit_with(e: &NearbyError) -> ! {
    tracing::error!(
        "❌ Geosearch failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 權限被拒或無定位需要使用者介入，與一般錯誤分開
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 4,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
