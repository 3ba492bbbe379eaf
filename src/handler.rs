use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tone_convert::model::FeedbackKind;
use crate::app::{App, FocusPane, InputMode};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Paste(text) => {
            if app.view().current_notice().is_none() {
                app.focus = FocusPane::Input;
                app.input_mode = InputMode::Editing;
                app.insert_str(&text);
            }
        }
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick(),
    }
    app.poll_conversion().await;
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // An open notice swallows input until acknowledged
    if app.view().current_notice().is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_notice();
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Start editing the source text
        KeyCode::Char('i') | KeyCode::Char('e') => {
            app.focus = FocusPane::Input;
            app.input_mode = InputMode::Editing;
        }

        KeyCode::Enter => {
            if app.focus == FocusPane::Input {
                app.input_mode = InputMode::Editing;
            } else {
                app.start_conversion();
            }
        }

        KeyCode::Tab => {
            app.focus = match app.focus {
                FocusPane::Input => FocusPane::Target,
                FocusPane::Target => FocusPane::Result,
                FocusPane::Result => FocusPane::Input,
            };
            if app.focus == FocusPane::Input {
                app.input_mode = InputMode::Editing;
            }
        }

        // Recipient
        KeyCode::Char('t') | KeyCode::Right | KeyCode::Char('l') => app.next_target(),
        KeyCode::Char('T') | KeyCode::Left | KeyCode::Char('h') => app.prev_target(),

        // Result actions
        KeyCode::Char('c') => app.copy_result(),
        KeyCode::Char('+') | KeyCode::Char('y') => app.submit_feedback(FeedbackKind::Positive),
        KeyCode::Char('-') | KeyCode::Char('n') => app.submit_feedback(FeedbackKind::Negative),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_result_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_result_up(),

        KeyCode::Char('x') => app.clear_input(),

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        // Alt+Enter keeps typing on a new line
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => app.insert_char('\n'),
        KeyCode::Enter => app.start_conversion(),
        KeyCode::Tab => {
            app.input_mode = InputMode::Normal;
            app.focus = FocusPane::Target;
        }
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}
