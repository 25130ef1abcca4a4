pub mod reader;
pub mod render;
pub mod viewer;

pub use crate::domain::model::{DisplayUnit, LoadResult, ViewerContent};
pub use crate::domain::ports::{
    Clipboard, DecodedObject, Drawable, ErrorNotifier, PresentationSurface, StatusLog, Storage,
};
pub use crate::utils::error::Result;
