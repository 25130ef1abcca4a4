pub mod config;
pub mod core;
pub mod domain;
pub mod models;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::{LocalStorage, StderrNotifier, StdoutClipboard, TerminalSurface};
pub use config::toml_config::ViewerSettings;
pub use config::OutputFormat;
pub use crate::core::reader::{StreamReader, StreamWriter, TypeRegistry};
pub use crate::core::render::render;
pub use crate::core::viewer::ModelViewer;
pub use domain::model::{DisplayUnit, LoadFailure, LoadResult, UnitKind, ViewerContent};
pub use domain::ports::{DecodedObject, Drawable};
pub use utils::error::{Result, ViewerError};
