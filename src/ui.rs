use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
};

use crate::app::{App, FocusPane, InputMode};
use crate::markdown::{render_markdown, unescape_whitespace};
use crate::request::MODEL;
use crate::session::{ResponseView, SessionStatus};

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

    let [left_area, response_area] = Layout::horizontal([
        Constraint::Percentage(45),
        Constraint::Percentage(55),
    ])
    .areas(body_area);

    let [prompt_area, request_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(left_area);

    app.prompt_area = Some(prompt_area);
    app.request_area = Some(request_area);
    app.response_area = Some(response_area);

    render_prompt(app, frame, prompt_area);
    render_request(app, frame, request_area);
    render_response(app, frame, response_area);
    render_footer(app, frame, footer_area);
}

fn status_span(app: &App) -> Span<'static> {
    match app.session.status() {
        SessionStatus::Idle => Span::styled(" idle ", Style::default().fg(Color::Gray)),
        SessionStatus::Sending => {
            let dots = ".".repeat(app.animation_frame as usize + 1);
            Span::styled(format!(" sending{:<3} ", dots), Style::default().fg(Color::Yellow).bold())
        }
        SessionStatus::Succeeded => {
            let elapsed = app
                .session
                .last_elapsed()
                .map(|d| format!(" ({} ms)", d.as_millis()))
                .unwrap_or_default();
            Span::styled(format!(" ok{} ", elapsed), Style::default().fg(Color::Green).bold())
        }
        SessionStatus::Failed(_) => Span::styled(" failed ", Style::default().fg(Color::Red).bold()),
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Prompt Inspector ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(format!("{} ", MODEL), Style::default().fg(Color::White)),
        Span::styled(format!("→ {} ", app.client.endpoint()), Style::default().fg(Color::Gray)),
        status_span(app),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn border_style(app: &App, pane: FocusPane) -> Style {
    if app.focus == pane {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_prompt(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing && app.focus == FocusPane::Prompt;
    let border = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        border_style(app, FocusPane::Prompt)
    };
    let title = if app.session.can_send() {
        " Prompt (Enter to send) "
    } else {
        " Prompt "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title);

    // Horizontal scrolling keeps the cursor visible; inner width excludes borders
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.prompt_cursor;
    let scroll_offset = if inner_width == 0 || cursor_pos < inner_width {
        0
    } else {
        cursor_pos - inner_width + 1
    };

    let visible_text: String = app
        .session
        .prompt()
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(block);
    frame.render_widget(input, area);

    if editing {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_request(app: &mut App, frame: &mut Frame, area: Rect) {
    let preview = app.request_preview();

    let mut lines = vec![
        Line::from(vec![
            Span::styled(preview.method, Style::default().fg(Color::Magenta).bold()),
            Span::raw(" "),
            Span::raw(preview.url.clone()),
        ]),
    ];
    for (name, value) in &preview.headers {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", name), Style::default().fg(Color::Gray)),
            Span::raw(*value),
        ]));
    }
    lines.push(Line::default());
    lines.extend(preview.body.lines().map(|l| Line::raw(l.to_string())));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, FocusPane::Request))
        .title(" Request ");

    app.request_max_scroll = render_scrolled(frame, area, block, lines, &mut app.request_scroll);
}

fn view_tabs(view: ResponseView) -> Line<'static> {
    let active = Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD);
    let inactive = Style::default().fg(Color::Gray);
    let (json, content) = match view {
        ResponseView::Json => (active, inactive),
        ResponseView::Content => (inactive, active),
    };
    Line::from(vec![
        Span::raw(" Response "),
        Span::styled(" JSON ", json),
        Span::raw(" "),
        Span::styled(" Content ", content),
        Span::raw(" "),
    ])
}

fn response_lines(app: &App) -> Vec<Line<'static>> {
    let session = &app.session;
    let dim = Style::default().fg(Color::Gray);

    match session.status() {
        SessionStatus::Idle => {
            return vec![Line::styled("Type a prompt and press Enter to send it.", dim)];
        }
        SessionStatus::Sending => {
            let dots = ".".repeat(app.animation_frame as usize + 1);
            return vec![Line::styled(format!("Waiting for response{}", dots), dim.italic())];
        }
        SessionStatus::Failed(message) => {
            let mut lines = vec![Line::styled("Error", Style::default().fg(Color::Red).bold())];
            lines.extend(
                message
                    .lines()
                    .map(|l| Line::styled(l.to_string(), Style::default().fg(Color::Red))),
            );
            return lines;
        }
        SessionStatus::Succeeded => {}
    }

    match session.view() {
        ResponseView::Json => {
            let pretty = session
                .response()
                .and_then(|v| serde_json::to_string_pretty(v).ok())
                .unwrap_or_default();
            pretty.lines().map(|l| Line::raw(l.to_string())).collect()
        }
        ResponseView::Content => {
            let text = unescape_whitespace(Some(session.assistant_text()));
            if text.is_empty() {
                vec![Line::styled(
                    "No assistant text in a known shape. Switch to the JSON view to inspect it.",
                    dim,
                )]
            } else {
                render_markdown(&text)
            }
        }
    }
}

fn render_response(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, FocusPane::Response))
        .title(view_tabs(app.session.view()));
    let lines = response_lines(app);

    app.response_max_scroll = render_scrolled(frame, area, block, lines, &mut app.response_scroll);
}

/// Rows the lines occupy once wrapped to `width` columns. Word wrapping can
/// need a few more rows than this.
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines.iter().map(|line| line.width().max(1).div_ceil(width)).sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Render a scrollable pane, clamping `scroll` to the content. Returns the
/// largest useful offset.
fn render_scrolled(frame: &mut Frame, area: Rect, block: Block, lines: Vec<Line>, scroll: &mut u16) -> u16 {
    let inner = block.inner(area);
    let total_lines = wrapped_height(&lines, inner.width);
    let max_scroll = total_lines.saturating_sub(inner.height);
    *scroll = (*scroll).min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((*scroll, 0));
    frame.render_widget(paragraph, area);

    if total_lines > inner.height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));
        let mut scrollbar_state = ScrollbarState::new(usize::from(total_lines)).position(usize::from(*scroll));
        frame.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }

    max_scroll
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

    let mut hints = vec![Span::styled(mode_text, mode_style)];
    let pairs: &[(&str, &str)] = match app.input_mode {
        InputMode::Editing => &[
            (" Enter ", " send "),
            (" Ctrl-U ", " clear "),
            (" Ctrl-T ", " json/content "),
            (" Tab ", " focus "),
            (" Esc ", " normal "),
        ],
        InputMode::Normal if app.focus == FocusPane::Response => &[
            (" s ", " send "),
            (" Tab/v ", " json/content "),
            (" j/k ", " scroll "),
            (" S-Tab ", " prompt "),
            (" q ", " quit "),
        ],
        InputMode::Normal => &[
            (" s ", " send "),
            (" v ", " json/content "),
            (" j/k ", " scroll "),
            (" Tab ", " focus "),
            (" i ", " edit "),
            (" q ", " quit "),
        ],
    };
    for (key, label) in pairs {
        hints.push(Span::styled(*key, key_style));
        hints.push(Span::styled(*label, label_style));
    }

    let footer = Paragraph::new(Line::from(hints)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}
