use crate::config::OutputFormat;
use crate::core::{Clipboard, ErrorNotifier, PresentationSurface, Storage, ViewerContent};
use crate::utils::error::{Result, ViewerError};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for LocalStorage {
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // 任何路徑離開時 writer 都會被關閉
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(data)?;
        writer.flush()?;
        Ok(())
    }
}

/// 終端機顯示層：把分頁印到 stdout
#[derive(Debug, Clone)]
pub struct TerminalSurface {
    format: OutputFormat,
    tab: Option<usize>,
    quiet: bool,
}

impl TerminalSurface {
    pub fn new(format: OutputFormat, tab: Option<usize>) -> Self {
        Self {
            format,
            tab,
            quiet: false,
        }
    }

    pub fn quiet() -> Self {
        Self {
            format: OutputFormat::Text,
            tab: None,
            quiet: true,
        }
    }

    pub fn render(&self, content: &ViewerContent) -> Result<String> {
        let units: Vec<_> = content
            .units
            .iter()
            .enumerate()
            .filter(|(index, _)| self.tab.map_or(true, |tab| tab == *index))
            .map(|(_, unit)| unit)
            .collect();

        let output = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&units)?,
            OutputFormat::Report => content.combined_report(),
            OutputFormat::Text => {
                let mut output = String::new();
                for unit in units {
                    output.push_str(&format!("=== {} ===\n", unit.label));
                    output.push_str(&unit.body);
                    output.push('\n');
                }
                output
            }
        };
        Ok(output)
    }
}

impl PresentationSurface for TerminalSurface {
    fn show(&mut self, content: &ViewerContent) {
        if self.quiet {
            return;
        }

        match self.render(content) {
            Ok(output) => print!("{}", output),
            Err(e) => tracing::error!("❌ Failed to render output: {}", e),
        }
    }
}

/// 錯誤對話框的終端版本
#[derive(Debug, Clone, Default)]
pub struct StderrNotifier;

impl ErrorNotifier for StderrNotifier {
    fn show_error(&self, title: &str, message: &str) {
        eprintln!("❌ {}", title);
        eprintln!("{}", message);
    }
}

/// 沒有桌面剪貼簿時，複製的文字直接寫到 stdout 供管線使用
#[derive(Debug, Default)]
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn set_contents(&mut self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush()) {
            tracing::error!("❌ {}", ViewerError::IoError(e));
        }
    }
}
