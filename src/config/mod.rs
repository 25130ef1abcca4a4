pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::viewer::TAB_TOOLTIP;
#[cfg(feature = "cli")]
use crate::utils::error::{Result, ViewerError};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::ops::Range;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    // 每個分頁各自加上標題列
    #[default]
    Text,
    Json,
    // 所有物件合併成一份編號報告
    Report,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "model-viewer")]
#[command(about = TAB_TOOLTIP)]
pub struct CliConfig {
    #[arg(help = "Serialized model file (*.model, *.ser)")]
    pub file: PathBuf,

    #[arg(long, help = "Only show this tab (0-based)")]
    pub tab: Option<usize>,

    #[arg(long, value_parser = parse_selection, help = "Character range START..END of the tab to copy or save")]
    pub select: Option<Range<usize>>,

    #[arg(long, help = "Save the selected tab (or selection) to this file")]
    pub save: Option<PathBuf>,

    #[arg(long, help = "Write only the selected tab (or selection) to stdout")]
    pub copy: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long, help = "TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
fn parse_selection(value: &str) -> std::result::Result<Range<usize>, String> {
    let (start, end) = value
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got `{}`", value))?;
    let start: usize = start
        .trim()
        .parse()
        .map_err(|e| format!("invalid start `{}`: {}", start, e))?;
    let end: usize = end
        .trim()
        .parse()
        .map_err(|e| format!("invalid end `{}`: {}", end, e))?;
    if start > end {
        return Err(format!("start {} is after end {}", start, end));
    }
    Ok(start..end)
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("file", &self.file)?;
        if let Some(save) = &self.save {
            validation::validate_path("save", save)?;
        }
        if let Some(config) = &self.config {
            validation::validate_path("config", config)?;
        }
        if self.select.is_some() && !(self.copy || self.save.is_some()) {
            return Err(ViewerError::ValidationError {
                message: "--select only applies together with --copy or --save".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_arguments() {
        let config = CliConfig::try_parse_from([
            "model-viewer",
            "weather.model",
            "--tab",
            "1",
            "--select",
            "0..7",
            "--save",
            "graph.txt",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(config.file, PathBuf::from("weather.model"));
        assert_eq!(config.tab, Some(1));
        assert_eq!(config.select, Some(0..7));
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("3..10"), Ok(3..10));
        assert!(parse_selection("10..3").is_err());
        assert!(parse_selection("3-10").is_err());
        assert!(parse_selection("a..b").is_err());
    }

    #[test]
    fn test_selection_requires_copy_or_save() {
        let config =
            CliConfig::try_parse_from(["model-viewer", "weather.model", "--select", "0..2"])
                .unwrap();
        assert!(config.validate().is_err());
    }
}
