//! Line-oriented surface used by the one-shot `convert` subcommand.

use std::io::{self, Write};

use tone_convert::error::SurfaceError;
use tone_convert::surface::{CopyLabel, FeedbackView, Notice, NoticeLevel, Renderer, ResultView};

pub struct ConsoleRenderer<W: Write> {
    out: W,
    quiet: bool,
}

impl ConsoleRenderer<io::Stdout> {
    pub fn stdout(quiet: bool) -> Self {
        Self::new(io::stdout(), quiet)
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W, quiet: bool) -> Self {
        Self { out, quiet }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn set_submit_enabled(&mut self, _enabled: bool) {}

    fn set_loading(&mut self, visible: bool) {
        if visible && !self.quiet {
            eprintln!("Converting...");
        }
    }

    fn show_result(&mut self, view: ResultView) -> Result<(), SurfaceError> {
        match view {
            ResultView::Empty => Ok(()),
            ResultView::Converted(text) => {
                writeln!(self.out, "{}", text)
                    .and_then(|_| self.out.flush())
                    .map_err(|e| SurfaceError(e.to_string()))
            }
            ResultView::Failed(message) => {
                eprintln!("{}", message);
                Ok(())
            }
        }
    }

    fn set_copy_enabled(&mut self, _enabled: bool) {}

    fn set_copy_label(&mut self, label: CopyLabel) {
        if label == CopyLabel::Copied && !self.quiet {
            eprintln!("Copied to clipboard.");
        }
    }

    fn set_feedback(&mut self, _view: FeedbackView) {}

    fn set_char_count(&mut self, count: usize, over_limit: bool) {
        if over_limit && !self.quiet {
            eprintln!("Note: input is {} characters long.", count);
        }
    }

    fn notify(&mut self, notice: Notice) {
        let prefix = match notice.level {
            NoticeLevel::Info => "",
            NoticeLevel::Warning => "warning: ",
            NoticeLevel::Error => "error: ",
        };
        eprintln!("{}{}", prefix, notice.message);
    }

    fn focus_input(&mut self) {}
}
