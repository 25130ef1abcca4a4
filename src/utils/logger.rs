use crate::domain::ports::StatusLog;
use chrono::Local;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_cli_logger(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("model_viewer=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("model_viewer={}", level)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("model_viewer={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

/// 狀態列紀錄：轉送到 tracing，並保留最後一則狀態
#[derive(Debug, Default)]
pub struct TracingStatusLog {
    last_status: std::sync::Mutex<Option<String>>,
}

impl TracingStatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_status(&self) -> Option<String> {
        self.last_status.lock().ok().and_then(|status| status.clone())
    }
}

impl StatusLog for TracingStatusLog {
    fn log_message(&self, message: &str) {
        let stamped = format!("{} - {}", Local::now().format("%H:%M:%S"), message);
        tracing::warn!(target: "model_viewer::status", "{}", stamped);
    }

    fn status_message(&self, message: &str) {
        tracing::info!(target: "model_viewer::status", "{}", message);
        if let Ok(mut status) = self.last_status.lock() {
            *status = Some(message.to_string());
        }
    }
}
