use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};
use tone_convert::model::CHAR_WARNING_THRESHOLD;
use tone_convert::surface::{FeedbackView, NoticeLevel, ResultView};
use tone_convert::Target;
use crate::app::{App, FocusPane, InputMode};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let [input_area, target_area, result_area, actions_area] = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .areas(body_area);

    render_input(app, frame, input_area);
    render_targets(app, frame, target_area);
    render_result(app, frame, result_area);
    render_actions(app, frame, actions_area);
    render_footer(app, frame, footer_area);

    if app.view().current_notice().is_some() {
        render_notice(app, frame, area);
    }
}

fn border_color(app: &App, pane: FocusPane) -> Color {
    if app.focus != pane {
        Color::DarkGray
    } else if pane == FocusPane::Input && app.input_mode == InputMode::Editing {
        Color::Yellow
    } else {
        Color::Cyan
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Tone Convert ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(format!(" {} ", app.server_url()), Style::default().fg(Color::Gray)),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let view = app.view();
    let counter_style = if view.over_limit {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(app, FocusPane::Input)))
        .title(" Original text ")
        .title_bottom(
            Line::from(Span::styled(
                format!(" {} / {} ", view.char_count, CHAR_WARNING_THRESHOLD),
                counter_style,
            ))
            .right_aligned(),
        );

    let inner = block.inner(area);

    // Locate the cursor in (row, display column) so it stays visible
    let before: String = app.source_input.chars().take(app.input_cursor).collect();
    let cursor_row = before.matches('\n').count() as u16;
    let current_line = before.rsplit('\n').next().unwrap_or("");
    let cursor_col = Span::raw(current_line).width() as u16;

    let scroll_y = cursor_row.saturating_sub(inner.height.saturating_sub(1));
    let scroll_x = cursor_col.saturating_sub(inner.width.saturating_sub(1));

    let text = if app.source_input.is_empty() && app.input_mode != InputMode::Editing {
        Text::from(Span::styled(
            "Paste or type the message you want to rephrase...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(app.source_input.as_str())
    };

    let input = Paragraph::new(text).block(block).scroll((scroll_y, scroll_x));
    frame.render_widget(input, area);

    if app.input_mode == InputMode::Editing && app.focus == FocusPane::Input && view.current_notice().is_none() {
        frame.set_cursor_position((
            inner.x + cursor_col - scroll_x,
            inner.y + cursor_row - scroll_y,
        ));
    }
}

fn render_targets(app: &App, frame: &mut Frame, area: Rect) {
    let targets = Target::all();
    let selected = targets.iter().position(|t| *t == app.target).unwrap_or(0);
    let titles: Vec<Line> = targets.iter().map(|t| Line::from(t.display_name())).collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color(app, FocusPane::Target)))
                .title(" Recipient "),
        )
        .select(selected)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_result(app: &App, frame: &mut Frame, area: Rect) {
    let view = app.view();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(app, FocusPane::Result)))
        .title(" Converted ");

    let text = if view.loading {
        // Animated ellipsis: cycles through ".", "..", "...", "...."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        Text::from(Span::styled(
            format!("Converting{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
    } else {
        match &view.result {
            ResultView::Empty => Text::from(Span::styled(
                "The converted text will appear here.",
                Style::default().fg(Color::DarkGray),
            )),
            ResultView::Converted(converted) => Text::from(converted.as_str()),
            ResultView::Failed(message) => {
                Text::from(message.as_str()).style(Style::default().fg(Color::Red))
            }
        }
    };

    let result = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll, 0));

    frame.render_widget(result, area);
}

fn render_actions(app: &App, frame: &mut Frame, area: Rect) {
    let view = app.view();
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let enabled = Style::default().fg(Color::White);
    let disabled = Style::default().fg(Color::DarkGray);

    let copy_style = if !view.copy_enabled {
        disabled
    } else if view.copy_label == tone_convert::surface::CopyLabel::Copied {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        enabled
    };

    let mut spans = vec![
        Span::styled(" c ", key_style),
        Span::styled(format!(" {} ", view.copy_label.text()), copy_style),
        Span::raw("  "),
    ];

    match view.feedback {
        FeedbackView::Hidden => {}
        FeedbackView::Prompt => spans.extend(vec![
            Span::raw("Was this helpful? "),
            Span::styled(" + ", key_style),
            Span::styled(" good ", enabled),
            Span::styled(" - ", key_style),
            Span::styled(" bad ", enabled),
        ]),
        FeedbackView::Acknowledged => spans.push(Span::styled(
            "Feedback received. Thank you!",
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        )),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " EDIT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let convert_label = if app.view().submit_enabled { " convert " } else { " converting… " };

    let hints = match app.input_mode {
        InputMode::Editing => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(convert_label, label_style),
            Span::styled(" Alt+Enter ", key_style),
            Span::styled(" newline ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" recipient ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" stop typing ", label_style),
        ],
        InputMode::Normal => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(convert_label, label_style),
            Span::styled(" t ", key_style),
            Span::styled(" recipient ", label_style),
            Span::styled(" i ", key_style),
            Span::styled(" edit ", label_style),
            Span::styled(" x ", key_style),
            Span::styled(" clear ", label_style),
            Span::styled(" j/k ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
    };

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_notice(app: &App, frame: &mut Frame, area: Rect) {
    let Some(notice) = app.view().current_notice() else {
        return;
    };

    let (title, color) = match notice.level {
        NoticeLevel::Info => (" Notice ", Color::Cyan),
        NoticeLevel::Warning => (" Check your input ", Color::Yellow),
        NoticeLevel::Error => (" Error ", Color::Red),
    };

    // Calculate popup size and position (centered)
    let popup_width = 54.min(area.width.saturating_sub(4));
    let popup_height = 6.min(area.height);

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title);

    let body = Text::from(vec![
        Line::from(notice.message.as_str()),
        Line::default(),
        Line::from(Span::styled("Press Enter to continue", Style::default().fg(Color::DarkGray))),
    ]);

    let popup = Paragraph::new(body).block(block).wrap(Wrap { trim: true });
    frame.render_widget(popup, popup_area);
}
