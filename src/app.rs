use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Instant;

use tone_convert::api::{HttpClient, ReqwestClient};
use tone_convert::controller::ConversionController;
use tone_convert::error::{ConvertError, SurfaceError};
use tone_convert::model::{FeedbackKind, RawResponse};
use tone_convert::surface::{CopyLabel, FeedbackView, Notice, Renderer, ResultView, SystemClipboard};
use tone_convert::{Config, Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Input,
    Target,
    Result,
}

/// What the terminal currently shows; the controller writes here, `ui` reads.
#[derive(Debug)]
pub struct ScreenView {
    pub submit_enabled: bool,
    pub loading: bool,
    pub result: ResultView,
    pub copy_enabled: bool,
    pub copy_label: CopyLabel,
    pub feedback: FeedbackView,
    pub char_count: usize,
    pub over_limit: bool,
    pub notices: VecDeque<Notice>,
    focus_requested: bool,
}

impl ScreenView {
    pub fn new() -> Self {
        Self {
            submit_enabled: true,
            loading: false,
            result: ResultView::Empty,
            copy_enabled: false,
            copy_label: CopyLabel::Copy,
            feedback: FeedbackView::Hidden,
            char_count: 0,
            over_limit: false,
            notices: VecDeque::new(),
            focus_requested: false,
        }
    }

    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }
}

impl Renderer for ScreenView {
    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }

    fn set_loading(&mut self, visible: bool) {
        self.loading = visible;
    }

    fn show_result(&mut self, view: ResultView) -> Result<(), SurfaceError> {
        self.result = view;
        Ok(())
    }

    fn set_copy_enabled(&mut self, enabled: bool) {
        self.copy_enabled = enabled;
    }

    fn set_copy_label(&mut self, label: CopyLabel) {
        self.copy_label = label;
    }

    fn set_feedback(&mut self, view: FeedbackView) {
        self.feedback = view;
    }

    fn set_char_count(&mut self, count: usize, over_limit: bool) {
        self.char_count = count;
        self.over_limit = over_limit;
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    fn focus_input(&mut self) {
        self.focus_requested = true;
    }
}

type Controller = ConversionController<ReqwestClient, ScreenView, SystemClipboard>;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: FocusPane,

    // Source text being edited
    pub source_input: String,
    pub input_cursor: usize,

    pub target: Target,
    /// Config file the chosen recipient is written back to; `None` disables it.
    pub target_store: Option<PathBuf>,
    saved_target: Target,

    pub controller: Controller,
    pub conversion_task: Option<tokio::task::JoinHandle<Result<RawResponse, ConvertError>>>,

    pub result_scroll: u16,
    pub animation_frame: u8,
}

impl App {
    pub fn new(http: ReqwestClient, target: Target) -> Self {
        let controller = ConversionController::new(
            std::sync::Arc::new(http),
            ScreenView::new(),
            SystemClipboard::new(),
        );

        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            focus: FocusPane::Input,

            source_input: String::new(),
            input_cursor: 0,

            target,
            target_store: Config::get_config_path().ok(),
            saved_target: target,

            controller,
            conversion_task: None,

            result_scroll: 0,
            animation_frame: 0,
        }
    }

    pub fn view(&self) -> &ScreenView {
        self.controller.renderer()
    }

    pub fn server_url(&self) -> String {
        self.controller.http().base_url().to_string()
    }

    pub fn tick(&mut self) {
        if self.view().loading {
            self.animation_frame = (self.animation_frame + 1) % 4;
        }
        self.controller.tick(Instant::now());
    }

    // Conversion lifecycle
    pub fn start_conversion(&mut self) {
        if self.conversion_task.is_some() || !self.view().submit_enabled {
            return;
        }

        let request = match self.controller.begin_submit(&self.source_input, self.target) {
            Ok(request) => request,
            Err(_) => {
                if self.controller.renderer_mut().take_focus_request() {
                    self.focus = FocusPane::Input;
                    self.input_mode = InputMode::Editing;
                }
                return;
            }
        };

        self.result_scroll = 0;
        self.animation_frame = 0;
        self.input_mode = InputMode::Normal;
        self.focus = FocusPane::Result;

        let http = self.controller.http();
        self.conversion_task = Some(tokio::spawn(async move {
            http.send_conversion(&request).await
        }));
    }

    /// Hands a finished conversion task to the controller.
    pub async fn poll_conversion(&mut self) {
        let finished = self
            .conversion_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }

        if let Some(task) = self.conversion_task.take() {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(err) => Err(ConvertError::Transport(format!("conversion task failed: {}", err))),
            };
            // The controller logs and renders every outcome itself.
            let _ = self.controller.finish_submit(outcome);
        }
    }

    pub fn copy_result(&mut self) {
        if self.view().copy_enabled {
            let _ = self.controller.copy_result();
        }
    }

    pub fn submit_feedback(&mut self, kind: FeedbackKind) {
        self.controller.submit_feedback(kind);
    }

    pub fn dismiss_notice(&mut self) -> bool {
        self.controller.renderer_mut().notices.pop_front().is_some()
    }

    // Target selection
    pub fn next_target(&mut self) {
        self.set_target(self.target.next());
    }

    pub fn prev_target(&mut self) {
        self.set_target(self.target.prev());
    }

    fn set_target(&mut self, target: Target) {
        self.target = target;
    }

    /// Writes the selected recipient to the config if it changed since the last save.
    pub fn remember_target(&mut self) {
        if self.target == self.saved_target {
            return;
        }
        let Some(path) = self.target_store.as_deref() else {
            return;
        };
        match Config::save_default_target_to(path, self.target) {
            Ok(()) => self.saved_target = self.target,
            Err(err) => tracing::warn!(error = %err, "failed to remember selected target"),
        }
    }

    // Source editing
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.source_input, self.input_cursor);
        self.source_input.insert(byte_pos, c);
        self.input_cursor += 1;
        self.input_changed();
    }

    pub fn insert_str(&mut self, text: &str) {
        // Terminals deliver pasted newlines as carriage returns
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let byte_pos = char_to_byte_index(&self.source_input, self.input_cursor);
        self.source_input.insert_str(byte_pos, &text);
        self.input_cursor += text.chars().count();
        self.input_changed();
    }

    pub fn backspace(&mut self) {
        if self.input_cursor > 0 {
            self.input_cursor -= 1;
            let byte_pos = char_to_byte_index(&self.source_input, self.input_cursor);
            self.source_input.remove(byte_pos);
            self.input_changed();
        }
    }

    pub fn delete(&mut self) {
        let char_count = self.source_input.chars().count();
        if self.input_cursor < char_count {
            let byte_pos = char_to_byte_index(&self.source_input, self.input_cursor);
            self.source_input.remove(byte_pos);
            self.input_changed();
        }
    }

    pub fn clear_input(&mut self) {
        self.source_input.clear();
        self.input_cursor = 0;
        self.input_changed();
    }

    pub fn cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.source_input.chars().count();
        self.input_cursor = (self.input_cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.input_cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.input_cursor = self.source_input.chars().count();
    }

    fn input_changed(&mut self) {
        self.controller.input_changed(&self.source_input);
    }

    // Result scrolling
    pub fn scroll_result_down(&mut self) {
        self.result_scroll = self.result_scroll.saturating_add(1);
    }

    pub fn scroll_result_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }
}
