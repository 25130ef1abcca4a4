use crate::core::reader::StreamReader;
use crate::core::render::render;
use crate::domain::model::{LoadFailure, LoadResult, ViewerContent};
use crate::domain::ports::{Clipboard, ErrorNotifier, PresentationSurface, StatusLog, Storage};
use crate::utils::error::{Result, ViewerError};
use std::ops::Range;
use std::path::{Path, PathBuf};

pub const TAB_TITLE: &str = "Model viewer";
pub const TAB_TOOLTIP: &str =
    "Allows viewing of serialized models, outputting their string representation.";
pub const LOAD_ERROR_TITLE: &str = "Error loading model file";
pub const SAVE_ERROR_TITLE: &str = "Error writing content";

/// 模型檢視器：載入、分頁、選取、複製與儲存
pub struct ModelViewer<P, S, L, N>
where
    P: PresentationSurface,
    S: Storage,
    L: StatusLog,
    N: ErrorNotifier,
{
    reader: StreamReader,
    surface: P,
    storage: S,
    log: L,
    notifier: N,
    content: Option<ViewerContent>,
    last_result: Option<LoadResult>,
    active_tab: usize,
    selection: Option<Range<usize>>,
}

impl<P, S, L, N> ModelViewer<P, S, L, N>
where
    P: PresentationSurface,
    S: Storage,
    L: StatusLog,
    N: ErrorNotifier,
{
    pub fn new(reader: StreamReader, surface: P, storage: S, log: L, notifier: N) -> Self {
        Self {
            reader,
            surface,
            storage,
            log,
            notifier,
            content: None,
            last_result: None,
            active_tab: 0,
            selection: None,
        }
    }

    /// 載入模型檔並取代目前顯示的內容
    ///
    /// 失敗時畫面維持原狀，只有 [`last_result`](Self::last_result) 記錄失敗
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&ViewerContent> {
        let path = resolve(path.as_ref());
        tracing::info!("Loading model file {}", path.display());

        let objects = match self.reader.read_all(&path) {
            Ok(objects) => objects,
            Err(error) => {
                self.show_error(LOAD_ERROR_TITLE, &error);
                self.last_result = Some(LoadResult::Failed(failure(&path, &error)));
                return Err(error);
            }
        };

        let units = render(&objects, &path, &self.log);
        // 物件只在本次載入期間存在
        drop(objects);

        let content = ViewerContent::new(path, units);
        self.log.status_message(&format!(
            "Loaded {} object(s) from {}",
            content.object_count(),
            content.path.display()
        ));
        self.surface.show(&content);

        self.active_tab = 0;
        self.selection = None;
        self.last_result = Some(LoadResult::Loaded(content.clone()));
        Ok(&*self.content.insert(content))
    }

    pub fn content(&self) -> Option<&ViewerContent> {
        self.content.as_ref()
    }

    pub fn last_result(&self) -> Option<&LoadResult> {
        self.last_result.as_ref()
    }

    pub fn tab_count(&self) -> usize {
        self.content.as_ref().map_or(0, |content| content.units.len())
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    pub fn select_tab(&mut self, index: usize) -> Result<()> {
        if index >= self.tab_count() {
            return Err(ViewerError::ValidationError {
                message: format!(
                    "tab {} does not exist ({} tab(s) loaded)",
                    index,
                    self.tab_count()
                ),
            });
        }
        self.active_tab = index;
        self.selection = None;
        Ok(())
    }

    /// 目前分頁的完整文字；尚未載入時為空字串
    pub fn current_text(&self) -> &str {
        self.content
            .as_ref()
            .and_then(|content| content.units.get(self.active_tab))
            .map_or("", |unit| unit.body.as_str())
    }

    /// 以字元位置選取目前分頁的文字；空範圍等同沒有選取
    pub fn select_text(&mut self, range: Range<usize>) -> Result<()> {
        let length = self.current_text().chars().count();
        if range.start > range.end || range.end > length {
            return Err(ViewerError::ValidationError {
                message: format!(
                    "selection {}..{} is outside the text ({} characters)",
                    range.start, range.end, length
                ),
            });
        }

        self.selection = if range.is_empty() { None } else { Some(range) };
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selected_text(&self) -> Option<&str> {
        let range = self.selection.as_ref()?;
        let text = self.current_text();
        let start = byte_offset(text, range.start);
        let end = byte_offset(text, range.end);
        text.get(start..end)
    }

    /// 複製或儲存的對象：有選取時為選取範圍，否則為整個分頁
    pub fn content_payload(&self) -> &str {
        self.selected_text().unwrap_or_else(|| self.current_text())
    }

    pub fn copy_content<C: Clipboard>(&self, clipboard: &mut C) {
        let payload = self.content_payload();
        tracing::debug!("Copying {} character(s)", payload.chars().count());
        clipboard.set_contents(payload);
    }

    pub fn save_content(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let payload = self.content_payload();

        match self.storage.write_file(path, payload.as_bytes()) {
            Ok(()) => {
                self.log
                    .status_message(&format!("Saved content to {}", path.display()));
                Ok(())
            }
            Err(error) => {
                let error = into_persistence(path, error);
                self.show_error(SAVE_ERROR_TITLE, &error);
                Err(error)
            }
        }
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    fn show_error(&self, title: &str, error: &ViewerError) {
        let message = error.user_friendly_message();
        tracing::error!("❌ {}", message.replace('\n', ": "));
        self.log.log_message(&message);
        self.notifier.show_error(title, &message);
    }
}

fn resolve(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn failure(path: &Path, error: &ViewerError) -> LoadFailure {
    let cause = match error {
        ViewerError::Decode { cause, .. } => cause.to_string(),
        other => other.to_string(),
    };
    LoadFailure {
        path: path.to_path_buf(),
        message: error.to_string(),
        cause,
    }
}

fn into_persistence(path: &Path, error: ViewerError) -> ViewerError {
    match error {
        ViewerError::IoError(source) => ViewerError::Persistence {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    }
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(offset, _)| offset)
}
