use crate::core::reader::DEFAULT_MAX_RECORD_BYTES;
use crate::utils::error::{Result, ViewerError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerSettings {
    #[serde(default)]
    pub viewer: ViewerSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerSection {
    #[serde(default = "default_model_extensions")]
    pub model_extensions: Vec<String>,
    #[serde(default = "default_content_extensions")]
    pub content_extensions: Vec<String>,
    /// false 時副檔名不符只會警告（等同「所有檔案」篩選）
    #[serde(default)]
    pub enforce_extensions: bool,
    pub max_record_bytes: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    pub level: Option<String>,
    #[serde(default)]
    pub json: bool,
}

fn default_model_extensions() -> Vec<String> {
    vec!["model".to_string(), "ser".to_string()]
}

fn default_content_extensions() -> Vec<String> {
    vec!["txt".to_string()]
}

impl Default for ViewerSection {
    fn default() -> Self {
        Self {
            model_extensions: default_model_extensions(),
            content_extensions: default_content_extensions(),
            enforce_extensions: false,
            max_record_bytes: None,
        }
    }
}

impl ViewerSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ViewerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ViewerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MODEL_DIR})
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn max_record_bytes(&self) -> u64 {
        self.viewer.max_record_bytes.unwrap_or(DEFAULT_MAX_RECORD_BYTES)
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or("info")
    }

    /// 檢查模型檔副檔名；未強制時只記錄警告
    pub fn check_model_file(&self, path: &Path) -> Result<()> {
        self.check_extension("file", path, &self.viewer.model_extensions)
    }

    pub fn check_content_file(&self, path: &Path) -> Result<()> {
        self.check_extension("save", path, &self.viewer.content_extensions)
    }

    fn check_extension(&self, field: &str, path: &Path, allowed: &[String]) -> Result<()> {
        match validation::validate_file_extension(field, path, allowed) {
            Ok(()) => Ok(()),
            Err(e) if self.viewer.enforce_extensions => Err(e),
            Err(e) => {
                tracing::warn!("⚠️ {}", e);
                Ok(())
            }
        }
    }
}

impl Validate for ViewerSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_extension_list(
            "viewer.model_extensions",
            &self.viewer.model_extensions,
        )?;
        validation::validate_extension_list(
            "viewer.content_extensions",
            &self.viewer.content_extensions,
        )?;

        if self.viewer.max_record_bytes == Some(0) {
            return Err(ViewerError::InvalidConfigValueError {
                field: "viewer.max_record_bytes".to_string(),
                value: "0".to_string(),
                reason: "Value must be at least 1".to_string(),
            });
        }

        if let Some(level) = &self.logging.level {
            validation::validate_one_of("logging.level", level, &LOG_LEVELS)?;
        }

        Ok(())
    }
}
