use anyhow::Context;
use clap::Parser;
use model_viewer::core::viewer::TAB_TITLE;
use model_viewer::utils::error::ErrorSeverity;
use model_viewer::utils::logger::{self, TracingStatusLog};
use model_viewer::utils::validation::Validate;
use model_viewer::{
    CliConfig, LocalStorage, ModelViewer, StderrNotifier, StdoutClipboard, StreamReader,
    TerminalSurface, TypeRegistry, ViewerError, ViewerSettings,
};

fn exit_code(error: &ViewerError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(error: ViewerError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        error,
        error.category(),
        error.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", error.recovery_suggestion());
    std::process::exit(exit_code(&error).max(1));
}

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    let settings = match &config.config {
        Some(path) => ViewerSettings::from_file(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?,
        None => ViewerSettings::default(),
    };

    // 初始化日誌
    if settings.logging.json {
        logger::init_json_logger(settings.log_level());
    } else {
        logger::init_cli_logger(config.verbose, settings.log_level());
    }

    tracing::info!("Starting {}", TAB_TITLE);
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
        tracing::debug!("Settings: {:?}", settings);
    }

    // 驗證配置
    if let Err(e) = config.validate().and_then(|_| settings.validate()) {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        fail(e);
    }
    if let Err(e) = settings.check_model_file(&config.file) {
        eprintln!("❌ {}", e.user_friendly_message());
        fail(e);
    }
    if let Some(save) = &config.save {
        if let Err(e) = settings.check_content_file(save) {
            eprintln!("❌ {}", e.user_friendly_message());
            fail(e);
        }
    }

    let registry = TypeRegistry::with_builtin_models();
    tracing::debug!(
        "Registered types: {}",
        registry.type_names().collect::<Vec<_>>().join(", ")
    );
    let reader = StreamReader::new(registry).with_max_record_bytes(settings.max_record_bytes());
    let surface = if config.copy {
        TerminalSurface::quiet()
    } else {
        TerminalSurface::new(config.format, config.tab)
    };
    let mut viewer = ModelViewer::new(
        reader,
        surface,
        LocalStorage::new(),
        TracingStatusLog::new(),
        StderrNotifier,
    );

    // 載入失敗時 viewer 已經通知使用者
    if let Err(e) = viewer.load(&config.file) {
        fail(e);
    }

    if let Some(tab) = config.tab {
        if let Err(e) = viewer.select_tab(tab) {
            eprintln!("❌ {}", e.user_friendly_message());
            fail(e);
        }
    }
    if let Some(range) = config.select.clone() {
        if let Err(e) = viewer.select_text(range) {
            eprintln!("❌ {}", e.user_friendly_message());
            fail(e);
        }
    }

    if config.copy {
        viewer.copy_content(&mut StdoutClipboard);
    }
    if let Some(save) = &config.save {
        if let Err(e) = viewer.save_content(save) {
            fail(e);
        }
        tracing::info!("📁 Content saved to: {}", save.display());
    }

    Ok(())
}
