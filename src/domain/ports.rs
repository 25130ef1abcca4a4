use crate::domain::model::{simple_type_name, GraphType, ViewerContent};
use crate::utils::error::{GraphError, Result};
use std::fmt;
use std::path::Path;

/// 從串流解碼出的任意物件
///
/// 實作型別不固定：任何註冊到 [`TypeRegistry`](crate::core::reader::TypeRegistry)
/// 的型別都可能出現在串流中
pub trait DecodedObject: fmt::Display + fmt::Debug + Send {
    fn type_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn simple_type_name(&self) -> &str {
        simple_type_name(self.type_name())
    }

    /// 執行期檢查是否具備繪圖能力
    fn as_drawable(&self) -> Option<&dyn Drawable> {
        None
    }
}

pub trait Drawable {
    /// 回傳 `GraphType::NotDrawable` 表示這個實例無法繪圖
    fn graph_type(&self) -> GraphType;

    fn graph(&self) -> std::result::Result<String, GraphError>;
}

/// 顯示層：接收整組分頁
pub trait PresentationSurface {
    fn show(&mut self, content: &ViewerContent);
}

pub trait StatusLog {
    fn log_message(&self, message: &str);

    fn status_message(&self, message: &str);
}

pub trait ErrorNotifier {
    fn show_error(&self, title: &str, message: &str);
}

pub trait Clipboard {
    fn set_contents(&mut self, text: &str);
}

pub trait Storage {
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}
