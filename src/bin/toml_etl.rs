use clap::Parser;
use schedule_etl::config::toml_config::TomlConfig;
use schedule_etl::core::pipeline::read_lines;
use schedule_etl::core::{ConfigProvider, Pipeline};
use schedule_etl::utils::error::ErrorSeverity;
use schedule_etl::utils::{logger, validation::Validate};
use schedule_etl::{split_documents, EtlEngine, LocalStorage, MultiInputPipeline, SimplePipeline};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Schedule overlap counter driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "schedule-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the input file from the config
    #[arg(short, long)]
    input: Option<String>,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let verbose = args.verbose || config.verbose_logging();
    if config.json_logging() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("🚀 Starting TOML-based schedule-etl");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(input) = args.input.clone() {
        tracing::info!("🔧 Input overridden to: {}", input);
        config.source.path = Some(input);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    let storage = LocalStorage::default();

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No output will be written");
        perform_dry_run(&storage, &config).await?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let outcome = if config.multiple_inputs() {
        execute(MultiInputPipeline::new(storage, config), monitor_enabled).await
    } else {
        execute(SimplePipeline::new(storage, config), monitor_enabled).await
    };

    match outcome {
        Ok(output_path) => {
            tracing::info!("✅ Processing completed successfully!");
            println!("✅ Processing completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Processing failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn execute<P: Pipeline>(pipeline: P, monitor_enabled: bool) -> schedule_etl::Result<String> {
    EtlEngine::new_with_monitoring(pipeline, monitor_enabled).run().await
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_path());
    println!("  Multiple inputs: {}", config.multiple_inputs());
    println!(
        "  Formats: {}",
        config
            .output_formats()
            .iter()
            .map(|f| f.extension())
            .collect::<Vec<_>>()
            .join(", ")
    );
    if let Some(archive) = config.archive_file() {
        println!("  Archive: {}", archive);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

/// 只讀取並切分輸入，顯示將處理的內容
async fn perform_dry_run(storage: &LocalStorage, config: &TomlConfig) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");
    println!();

    let lines = read_lines(storage, config.input_path()).await?;
    println!("📄 Input: {} ({} lines)", config.input_path(), lines.len());

    if config.multiple_inputs() {
        let documents = split_documents(lines, config.input_marker());
        println!("📚 Documents (marker '{}'):", config.input_marker());
        for document in &documents {
            println!(
                "  {} - {} line(s), starting at line {}",
                document.name.as_deref().unwrap_or("<unnamed>"),
                document.lines.len(),
                document.line_offset + 1
            );
        }
    }

    println!();
    println!("💾 Output files:");
    match config.archive_file() {
        Some(archive) => println!("  {} (ZIP)", archive),
        None => {
            for format in config.output_formats() {
                println!("  {}", config.output_file(format));
            }
        }
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
