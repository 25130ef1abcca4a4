use std::path::PathBuf;
use thiserror::Error;

/// 單一序列化串流解碼失敗的底層原因
#[derive(Error, Debug)]
pub enum DecodeCause {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a serialized object stream (header bytes {found:02x?})")]
    BadHeader { found: Vec<u8> },

    #[error("unsupported stream format version {0}")]
    UnsupportedVersion(u16),

    #[error("record #{index} is truncated")]
    Truncated { index: usize },

    #[error("record #{index} is malformed: {message}")]
    Malformed { index: usize, message: String },

    #[error("record #{index} declares unknown type `{type_name}`")]
    UnresolvedType { index: usize, type_name: String },
}

/// 物件宣告可繪圖但產生圖形時失敗
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("no model built yet")]
    NotBuilt,

    #[error("{0}")]
    Generation(String),
}

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Failed to load model file: {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        cause: DecodeCause,
    },

    #[error("Failed to generate graph for {type_name}: {source}")]
    Graph {
        type_name: String,
        #[source]
        source: GraphError,
    },

    #[error("Failed to write content to {}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value `{value}` for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Rendering,
    Output,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ViewerError {
    pub fn decode(path: impl Into<PathBuf>, cause: impl Into<DecodeCause>) -> Self {
        ViewerError::Decode {
            path: path.into(),
            cause: cause.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ViewerError::Decode { .. } => ErrorCategory::Input,
            ViewerError::Graph { .. } => ErrorCategory::Rendering,
            ViewerError::Persistence { .. } | ViewerError::SerializationError(_) => {
                ErrorCategory::Output
            }
            ViewerError::ConfigError { .. }
            | ViewerError::ConfigValidationError { .. }
            | ViewerError::InvalidConfigValueError { .. }
            | ViewerError::MissingConfigError { .. }
            | ViewerError::ValidationError { .. } => ErrorCategory::Configuration,
            ViewerError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 圖形失敗只影響單一物件，其餘內容照常顯示
            ViewerError::Graph { .. } => ErrorSeverity::Low,
            ViewerError::Persistence { .. } | ViewerError::SerializationError(_) => {
                ErrorSeverity::Medium
            }
            ViewerError::Decode { .. }
            | ViewerError::ConfigError { .. }
            | ViewerError::ConfigValidationError { .. }
            | ViewerError::InvalidConfigValueError { .. }
            | ViewerError::MissingConfigError { .. }
            | ViewerError::ValidationError { .. } => ErrorSeverity::High,
            ViewerError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// 給使用者看的訊息：主訊息加上換行後的底層原因
    pub fn user_friendly_message(&self) -> String {
        match self {
            ViewerError::Decode { cause, .. } => format!("{}\n{}", self, cause),
            ViewerError::Graph { .. } => self.to_string(),
            ViewerError::Persistence { source, .. } => format!("{}\n{}", self, source),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ViewerError::Decode { cause, .. } => match cause {
                DecodeCause::Io(_) => "Check that the file exists and is readable",
                DecodeCause::BadHeader { .. } | DecodeCause::UnsupportedVersion(_) => {
                    "Make sure the file was written as a serialized model stream"
                }
                DecodeCause::Truncated { .. } | DecodeCause::Malformed { .. } => {
                    "The file appears to be damaged; re-export the model"
                }
                DecodeCause::UnresolvedType { .. } => {
                    "Register the model type with the viewer's type registry"
                }
            },
            ViewerError::Graph { .. } => "The textual model view is still available",
            ViewerError::Persistence { .. } => "Choose another destination and save again",
            ViewerError::IoError(_) => "Check file permissions and available disk space",
            ViewerError::SerializationError(_) => "Try the plain text output format",
            _ => "Review the command line arguments and configuration file",
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_message_includes_path_and_cause() {
        let err = ViewerError::decode(
            "/tmp/missing.model",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );

        let message = err.user_friendly_message();
        assert!(message.starts_with("Failed to load model file: /tmp/missing.model\n"));
        assert!(message.contains("no such file"));
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_graph_error_is_low_severity() {
        let err = ViewerError::Graph {
            type_name: "DecisionTree".to_string(),
            source: GraphError::NotBuilt,
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(
            err.to_string(),
            "Failed to generate graph for DecisionTree: no model built yet"
        );
    }
}
