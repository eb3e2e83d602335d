use clap::Parser;
use schedule_etl::core::Pipeline;
use schedule_etl::utils::error::{EtlError, ErrorSeverity};
use schedule_etl::utils::{logger, validation::Validate};
use schedule_etl::{CliConfig, EtlEngine, LocalStorage, MultiInputPipeline, SimplePipeline};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting schedule-etl CLI");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    println!("Started. Input file: {}", config.input);

    let storage = LocalStorage::default();
    let outcome = if config.multiple_inputs {
        execute(MultiInputPipeline::new(storage, config), monitor_enabled).await
    } else {
        execute(SimplePipeline::new(storage, config), monitor_enabled).await
    };

    match outcome {
        Ok(output_path) => {
            tracing::info!("✅ Processing completed successfully!");
            println!("Finished. Output file: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Processing failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("{}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(exit_code(&e));
        }
    }
}

async fn execute<P: Pipeline>(pipeline: P, monitor_enabled: bool) -> Result<String, EtlError> {
    EtlEngine::new_with_monitoring(pipeline, monitor_enabled).run().await
}

// 根據錯誤嚴重程度決定退出碼
fn exit_code(e: &EtlError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
