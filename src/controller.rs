//! Conversion request controller.
//!
//! Owns the Idle -> Loading -> Success | Error state machine and drives the
//! injected surface. Loading is entered before the request goes out and is
//! always left once the request settles, whatever the outcome.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::HttpClient;
use crate::error::{ConvertError, SurfaceError};
use crate::model::{self, ConversionRequest, FeedbackKind, RawResponse, UiState};
use crate::surface::{Clipboard, CopyLabel, FeedbackView, Notice, Renderer, ResultView};
use crate::target::Target;

/// How long the copy control shows its confirmation label.
pub const COPY_CONFIRMATION: Duration = Duration::from_millis(2000);

pub struct ConversionController<H, R, C> {
    http: Arc<H>,
    renderer: R,
    clipboard: C,
    state: UiState,
    feedback: FeedbackView,
    copy_revert_at: Option<Instant>,
}

impl<H, R, C> ConversionController<H, R, C>
where
    H: HttpClient,
    R: Renderer,
    C: Clipboard,
{
    pub fn new(http: Arc<H>, renderer: R, clipboard: C) -> Self {
        Self {
            http,
            renderer,
            clipboard,
            state: UiState::Idle,
            feedback: FeedbackView::Hidden,
            copy_revert_at: None,
        }
    }

    pub fn http(&self) -> Arc<H> {
        Arc::clone(&self.http)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Runs a whole conversion: validate, enter Loading, call the service, render.
    pub async fn submit(&mut self, raw_text: &str, target: Target) -> Result<String, ConvertError> {
        let request = self.begin_submit(raw_text, target)?;
        let http = self.http();
        let response = http.send_conversion(&request).await;
        self.finish_submit(response)
    }

    /// Validates the input and switches the surface to Loading.
    ///
    /// Blank input is reported through a notice and never reaches Loading.
    pub fn begin_submit(&mut self, raw_text: &str, target: Target) -> Result<ConversionRequest, ConvertError> {
        if self.state.is_loading() {
            tracing::debug!("submit ignored while a conversion is in flight");
            return Err(ConvertError::Busy);
        }

        let request = match ConversionRequest::new(raw_text, target) {
            Ok(request) => request,
            Err(err) => {
                self.renderer.notify(Notice::warning(err.to_string()));
                self.renderer.focus_input();
                return Err(err);
            }
        };

        self.enter_loading();
        tracing::info!(
            recipient = request.target().as_str(),
            chars = model::char_count(request.text()),
            "conversion started"
        );
        Ok(request)
    }

    /// Renders the settled request and leaves Loading.
    pub fn finish_submit(&mut self, outcome: Result<RawResponse, ConvertError>) -> Result<String, ConvertError> {
        if !self.state.is_loading() {
            tracing::warn!("conversion settled outside of Loading; leaving surface untouched");
            return model::interpret_response(outcome);
        }

        let outcome = model::interpret_response(outcome);
        let rendered = match &outcome {
            Ok(text) => self.render_success(text),
            Err(err) => self.render_failure(err),
        };
        self.exit_loading();

        match (&outcome, &rendered) {
            (Ok(text), Ok(())) => tracing::info!(chars = model::char_count(text), "conversion succeeded"),
            (Err(err), _) => tracing::warn!(category = ?err.category(), error = %err, "conversion failed"),
            _ => {}
        }
        if let Err(err) = &rendered {
            tracing::error!(error = %err, "failed to render conversion outcome");
        }

        match (outcome, rendered) {
            (Ok(text), Ok(())) => Ok(text),
            (Ok(_), Err(err)) => Err(err.into()),
            (Err(err), _) => Err(err),
        }
    }

    /// Copies the converted text. Does nothing unless a conversion succeeded.
    pub fn copy_result(&mut self) -> Result<(), ConvertError> {
        let Some(text) = self.state.converted_text() else {
            return Ok(());
        };

        match self.clipboard.write_text(text) {
            Ok(()) => {
                self.renderer.set_copy_label(CopyLabel::Copied);
                self.copy_revert_at = Some(Instant::now() + COPY_CONFIRMATION);
                tracing::debug!("converted text copied to clipboard");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "clipboard write failed");
                self.renderer.notify(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Acknowledges a rating locally. Returns false if the prompt is not showing.
    pub fn submit_feedback(&mut self, kind: FeedbackKind) -> bool {
        if self.feedback != FeedbackView::Prompt {
            return false;
        }
        tracing::info!(?kind, "feedback received");
        self.renderer.notify(Notice::info(kind.thanks_message()));
        self.set_feedback(FeedbackView::Acknowledged);
        true
    }

    pub fn input_changed(&mut self, text: &str) -> usize {
        let count = model::char_count(text);
        self.renderer.set_char_count(count, model::is_over_limit(count));
        count
    }

    /// Reverts the copy confirmation once its deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.copy_revert_at {
            if now >= deadline {
                self.copy_revert_at = None;
                self.renderer.set_copy_label(CopyLabel::Copy);
            }
        }
    }

    fn enter_loading(&mut self) {
        self.state = UiState::Loading;
        self.renderer.set_submit_enabled(false);
        self.renderer.set_loading(true);
        self.renderer.set_copy_enabled(false);
        self.set_feedback(FeedbackView::Hidden);
        if let Err(err) = self.renderer.show_result(ResultView::Empty) {
            tracing::warn!(error = %err, "failed to clear previous result");
        }
    }

    fn exit_loading(&mut self) {
        if self.state.is_loading() {
            self.state = UiState::Error("result could not be displayed".to_string());
        }
        self.renderer.set_loading(false);
        self.renderer.set_submit_enabled(true);
    }

    fn render_success(&mut self, text: &str) -> Result<(), SurfaceError> {
        self.renderer.show_result(ResultView::Converted(text.to_string()))?;
        self.state = UiState::Success(text.to_string());
        self.renderer.set_copy_enabled(true);
        self.set_feedback(FeedbackView::Prompt);
        Ok(())
    }

    fn render_failure(&mut self, err: &ConvertError) -> Result<(), SurfaceError> {
        let message = format!("Error: {}\nPlease try again in a moment.", err);
        self.state = UiState::Error(message.clone());
        self.renderer.set_copy_enabled(false);
        self.set_feedback(FeedbackView::Hidden);
        self.renderer.show_result(ResultView::Failed(message))
    }

    fn set_feedback(&mut self, view: FeedbackView) {
        self.feedback = view;
        self.renderer.set_feedback(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeHttp {
        reply: Result<RawResponse, ConvertError>,
        sent: Mutex<Vec<ConversionRequest>>,
    }

    impl FakeHttp {
        fn replying(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(RawResponse::new(status, body)),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(ConvertError::Transport(message.to_string())),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<ConversionRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpClient for FakeHttp {
        async fn send_conversion(&self, request: &ConversionRequest) -> Result<RawResponse, ConvertError> {
            self.sent.lock().unwrap().push(request.clone());
            self.reply.clone()
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        submit_enabled: bool,
        loading: bool,
        loading_entered: usize,
        result: ResultView,
        copy_enabled: bool,
        copy_label: CopyLabel,
        feedback: FeedbackView,
        char_count: usize,
        over_limit: bool,
        notices: Vec<Notice>,
        focused: bool,
        fail_render: bool,
    }

    impl Renderer for RecordingRenderer {
        fn set_submit_enabled(&mut self, enabled: bool) {
            self.submit_enabled = enabled;
        }
        fn set_loading(&mut self, visible: bool) {
            if visible {
                self.loading_entered += 1;
            }
            self.loading = visible;
        }
        fn show_result(&mut self, view: ResultView) -> Result<(), SurfaceError> {
            if self.fail_render && view != ResultView::Empty {
                return Err(SurfaceError("terminal gone".to_string()));
            }
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
            self.notices.push(notice);
        }
        fn focus_input(&mut self) {
            self.focused = true;
        }
    }

    #[derive(Default)]
    struct FakeClipboard {
        writes: Vec<String>,
        fail: bool,
    }

    impl Clipboard for FakeClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ConvertError> {
            if self.fail {
                return Err(ConvertError::Clipboard("no display".to_string()));
            }
            self.writes.push(text.to_string());
            Ok(())
        }
    }

    type TestController = ConversionController<FakeHttp, RecordingRenderer, FakeClipboard>;

    fn controller(http: Arc<FakeHttp>) -> TestController {
        let mut renderer = RecordingRenderer::default();
        renderer.submit_enabled = true;
        ConversionController::new(http, renderer, FakeClipboard::default())
    }

    async fn converted(text: &str) -> TestController {
        let body = serde_json::json!({ "converted_text": text }).to_string();
        let mut c = controller(FakeHttp::replying(200, &body));
        c.submit("raw", Target::Boss).await.unwrap();
        c
    }

    fn result_text(c: &TestController) -> String {
        match &c.renderer().result {
            ResultView::Converted(text) | ResultView::Failed(text) => text.clone(),
            ResultView::Empty => String::new(),
        }
    }

    #[tokio::test]
    async fn test_blank_input_never_reaches_network() {
        for raw in ["", "   ", "\n\t "] {
            let http = FakeHttp::replying(200, r#"{"converted_text":"x"}"#);
            let mut c = controller(Arc::clone(&http));

            let err = c.submit(raw, Target::Boss).await.unwrap_err();

            assert_eq!(err, ConvertError::EmptyInput);
            assert!(http.sent().is_empty());
            assert_eq!(c.renderer().loading_entered, 0);
            assert!(c.renderer().submit_enabled);
            assert!(c.renderer().focused);
            assert_eq!(c.renderer().notices.len(), 1);
            assert_eq!(c.state(), &UiState::Idle);
        }
    }

    #[tokio::test]
    async fn test_success_renders_text_verbatim() {
        let http = FakeHttp::replying(200, r#"{"converted_text":"안녕하세요"}"#);
        let mut c = controller(Arc::clone(&http));

        let text = c.submit("  hello  ", Target::Client).await.unwrap();

        assert_eq!(text, "안녕하세요");
        assert_eq!(c.renderer().result, ResultView::Converted("안녕하세요".to_string()));
        assert!(c.renderer().copy_enabled);
        assert_eq!(c.renderer().feedback, FeedbackView::Prompt);
        assert!(c.renderer().submit_enabled);
        assert!(!c.renderer().loading);

        let sent = http.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text(), "hello");
        assert_eq!(sent[0].target(), Target::Client);
    }

    #[tokio::test]
    async fn test_every_outcome_reenables_submit() {
        let cases = vec![
            FakeHttp::replying(200, r#"{"converted_text":"ok"}"#),
            FakeHttp::replying(500, r#"{"error":"rate limited"}"#),
            FakeHttp::replying(500, ""),
            FakeHttp::replying(200, "{}"),
            FakeHttp::replying(200, "garbage"),
            FakeHttp::failing("connection refused"),
        ];
        for http in cases {
            let mut c = controller(http);
            let _ = c.submit("text", Target::Boss).await;
            assert!(c.renderer().submit_enabled);
            assert!(!c.renderer().loading);
            assert_eq!(c.renderer().loading_entered, 1);
            assert!(!c.is_loading());
        }
    }

    #[tokio::test]
    async fn test_server_error_message_is_shown() {
        let mut c = controller(FakeHttp::replying(500, r#"{"error":"rate limited"}"#));

        let err = c.submit("text", Target::Boss).await.unwrap_err();

        assert!(err.to_string().contains("rate limited"));
        assert!(result_text(&c).contains("rate limited"));
        assert!(matches!(c.renderer().result, ResultView::Failed(_)));
        assert!(!c.renderer().copy_enabled);
        assert_eq!(c.renderer().feedback, FeedbackView::Hidden);
    }

    #[tokio::test]
    async fn test_unparsable_error_body_shows_status() {
        for body in ["", "Internal Server Error"] {
            let mut c = controller(FakeHttp::replying(500, body));
            let _ = c.submit("text", Target::Boss).await;
            assert!(result_text(&c).contains("500"));
        }
    }

    #[tokio::test]
    async fn test_empty_success_body_takes_failure_path() {
        let mut c = controller(FakeHttp::replying(200, "{}"));

        let err = c.submit("text", Target::Boss).await.unwrap_err();

        assert_eq!(err, ConvertError::NoContent);
        assert!(matches!(c.renderer().result, ResultView::Failed(_)));
        assert!(result_text(&c).contains("no converted text"));
        assert!(!c.renderer().copy_enabled);
        assert_eq!(c.renderer().feedback, FeedbackView::Hidden);
    }

    #[tokio::test]
    async fn test_transport_error_message_is_shown() {
        let mut c = controller(FakeHttp::failing("connection refused"));

        let err = c.submit("text", Target::Colleague).await.unwrap_err();

        assert_eq!(err.category(), crate::error::ErrorCategory::Transport);
        assert!(result_text(&c).contains("connection refused"));
        assert!(c.renderer().submit_enabled);
    }

    #[tokio::test]
    async fn test_render_failure_still_exits_loading() {
        let mut c = controller(FakeHttp::replying(200, r#"{"converted_text":"ok"}"#));
        c.renderer_mut().fail_render = true;

        let err = c.submit("text", Target::Boss).await.unwrap_err();

        assert!(matches!(err, ConvertError::Render(_)));
        assert!(c.renderer().submit_enabled);
        assert!(!c.renderer().loading);
        assert!(!c.is_loading());
        assert!(!c.renderer().copy_enabled);
    }

    #[test]
    fn test_begin_submit_while_loading_is_busy() {
        let mut c = controller(FakeHttp::replying(200, "{}"));
        c.begin_submit("first", Target::Boss).unwrap();

        assert_eq!(c.begin_submit("second", Target::Boss), Err(ConvertError::Busy));
        assert_eq!(c.renderer().loading_entered, 1);
        assert!(!c.renderer().submit_enabled);
    }

    #[test]
    fn test_begin_submit_clears_previous_result() {
        let mut c = controller(FakeHttp::replying(200, "{}"));
        c.begin_submit("first", Target::Boss).unwrap();
        c.finish_submit(Ok(RawResponse::new(200, r#"{"converted_text":"one"}"#))).unwrap();
        assert_eq!(c.renderer().feedback, FeedbackView::Prompt);

        c.begin_submit("second", Target::Boss).unwrap();

        assert_eq!(c.renderer().result, ResultView::Empty);
        assert!(!c.renderer().copy_enabled);
        assert_eq!(c.renderer().feedback, FeedbackView::Hidden);
        assert!(c.renderer().loading);
    }

    #[test]
    fn test_finish_without_begin_leaves_surface_alone() {
        let mut c = controller(FakeHttp::replying(200, "{}"));
        let out = c.finish_submit(Ok(RawResponse::new(200, r#"{"converted_text":"late"}"#)));

        assert_eq!(out, Ok("late".to_string()));
        assert_eq!(c.renderer().result, ResultView::Empty);
        assert_eq!(c.state(), &UiState::Idle);
    }

    #[test]
    fn test_copy_without_result_is_noop() {
        let mut c = controller(FakeHttp::replying(200, "{}"));

        c.copy_result().unwrap();

        assert!(c.clipboard.writes.is_empty());
        assert_eq!(c.renderer().copy_label, CopyLabel::Copy);
    }

    #[tokio::test]
    async fn test_copy_after_failure_is_noop() {
        let mut c = controller(FakeHttp::replying(500, r#"{"error":"boom"}"#));
        let _ = c.submit("text", Target::Boss).await;

        c.copy_result().unwrap();

        assert!(c.clipboard.writes.is_empty());
    }

    #[tokio::test]
    async fn test_copy_confirmation_reverts_after_deadline() {
        let mut c = converted("정중한 문장").await;

        c.copy_result().unwrap();
        assert_eq!(c.clipboard.writes, vec!["정중한 문장".to_string()]);
        assert_eq!(c.renderer().copy_label, CopyLabel::Copied);

        c.tick(Instant::now() + Duration::from_millis(500));
        assert_eq!(c.renderer().copy_label, CopyLabel::Copied);

        c.tick(Instant::now() + COPY_CONFIRMATION + Duration::from_millis(1));
        assert_eq!(c.renderer().copy_label, CopyLabel::Copy);
    }

    #[tokio::test]
    async fn test_second_copy_extends_confirmation() {
        let mut c = converted("text").await;

        c.copy_result().unwrap();
        let first_deadline = c.copy_revert_at.unwrap();
        std::thread::sleep(Duration::from_millis(5));
        c.copy_result().unwrap();
        let second_deadline = c.copy_revert_at.unwrap();

        assert!(second_deadline > first_deadline);
        c.tick(first_deadline);
        assert_eq!(c.renderer().copy_label, CopyLabel::Copied);
        c.tick(second_deadline);
        assert_eq!(c.renderer().copy_label, CopyLabel::Copy);
    }

    #[tokio::test]
    async fn test_clipboard_failure_keeps_result() {
        let mut c = converted("keep me").await;
        c.clipboard.fail = true;

        let err = c.copy_result().unwrap_err();

        assert!(matches!(err, ConvertError::Clipboard(_)));
        assert_eq!(c.renderer().notices.last().map(|n| n.level), Some(crate::surface::NoticeLevel::Error));
        assert_eq!(c.state().converted_text(), Some("keep me"));
        assert_eq!(c.renderer().copy_label, CopyLabel::Copy);
    }

    #[tokio::test]
    async fn test_feedback_acknowledged_once() {
        let mut c = converted("text").await;

        assert!(c.submit_feedback(FeedbackKind::Negative));
        assert_eq!(c.renderer().feedback, FeedbackView::Acknowledged);
        assert_eq!(
            c.renderer().notices.last().map(|n| n.message.as_str()),
            Some(FeedbackKind::Negative.thanks_message())
        );

        assert!(!c.submit_feedback(FeedbackKind::Positive));
        assert_eq!(c.renderer().notices.len(), 1);
    }

    #[tokio::test]
    async fn test_feedback_prompt_returns_after_next_success() {
        let mut c = converted("text").await;
        c.submit_feedback(FeedbackKind::Positive);

        c.submit("again", Target::Boss).await.unwrap();

        assert_eq!(c.renderer().feedback, FeedbackView::Prompt);
    }

    #[test]
    fn test_feedback_ignored_before_any_result() {
        let mut c = controller(FakeHttp::replying(200, "{}"));
        assert!(!c.submit_feedback(FeedbackKind::Positive));
        assert!(c.renderer().notices.is_empty());
    }

    #[test]
    fn test_input_changed_reports_count_and_threshold() {
        let mut c = controller(FakeHttp::replying(200, "{}"));

        assert_eq!(c.input_changed(&"가".repeat(499)), 499);
        assert!(!c.renderer().over_limit);

        assert_eq!(c.input_changed(&"가".repeat(500)), 500);
        assert!(c.renderer().over_limit);

        c.input_changed("short");
        assert_eq!(c.renderer().char_count, 5);
        assert!(!c.renderer().over_limit);
    }
}
