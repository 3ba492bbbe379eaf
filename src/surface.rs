//! Capabilities the controller drives: a rendering surface and a clipboard.

use crate::error::{ConvertError, SurfaceError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultView {
    #[default]
    Empty,
    Converted(String),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackView {
    #[default]
    Hidden,
    Prompt,
    Acknowledged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyLabel {
    #[default]
    Copy,
    Copied,
}

impl CopyLabel {
    pub fn text(&self) -> &'static str {
        match self {
            CopyLabel::Copy => "Copy",
            CopyLabel::Copied => "Copied!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Blocking message the user has to acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub trait Renderer {
    fn set_submit_enabled(&mut self, enabled: bool);
    fn set_loading(&mut self, visible: bool);
    fn show_result(&mut self, view: ResultView) -> Result<(), SurfaceError>;
    fn set_copy_enabled(&mut self, enabled: bool);
    fn set_copy_label(&mut self, label: CopyLabel);
    fn set_feedback(&mut self, view: FeedbackView);
    fn set_char_count(&mut self, count: usize, over_limit: bool);
    fn notify(&mut self, notice: Notice);
    fn focus_input(&mut self);
}

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ConvertError>;
}

/// System clipboard, opened on first use so headless sessions only fail when copying.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ConvertError> {
        if self.inner.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| ConvertError::Clipboard(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        match self.inner.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_string())
                .map_err(|e| ConvertError::Clipboard(e.to_string())),
            None => Err(ConvertError::Clipboard("clipboard unavailable".to_string())),
        }
    }
}
