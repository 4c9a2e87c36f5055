use anyhow::Context;
use clap::Parser;
use sports_search::app::render::{render_detail, render_session};
use sports_search::core::ConfigProvider;
use sports_search::utils::error::{ErrorSeverity, SearchError};
use sports_search::utils::logger;
use sports_search::{CliConfig, HttpGateway, SearchController, SearchIntent, SearchOrchestrator};
use std::sync::Arc;

fn exit_code(error: &SearchError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入並驗證配置
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    };

    // 初始化日誌
    if config.log_format() == "json" {
        logger::init_json_logger(config.verbose());
    } else {
        logger::init_cli_logger(config.verbose());
    }

    tracing::info!("Starting sports-search");
    tracing::debug!("Resolved config: {:?}", config);

    let gateway = HttpGateway::from_config(&config).context("failed to create HTTP gateway")?;
    let orchestrator = Arc::new(SearchOrchestrator::new(gateway));
    let mut controller = SearchController::with_category(orchestrator, config.default_category());

    controller.handle(SearchIntent::QueryChanged(cli.query_text()));
    controller.handle(SearchIntent::SearchSubmitted);
    let state = controller.settle().await;

    if let Some(error) = &state.error {
        tracing::error!(
            "❌ Search failed: {} (Category: {:?}, Severity: {:?}, Retryable: {})",
            error,
            error.category(),
            error.severity(),
            error.is_retryable()
        );
        eprintln!("❌ {}", error.user_friendly_message());
        eprintln!("💡 Suggestion: {}", error.recovery_suggestion());

        let code = exit_code(error);
        if code > 0 {
            std::process::exit(code);
        }
        return Ok(());
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&state.results)
            .context("failed to serialize results")?;
        println!("{}", json);
    } else if cli.details {
        for record in &state.results {
            println!("{}", render_detail(record));
        }
    } else {
        print!("{}", render_session(state));
    }

    Ok(())
}
