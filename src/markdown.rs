use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Turn literal `\r\n`, `\n` and `\t` sequences (backslash + letter, as
/// written in the text) into real whitespace. Tabs become four spaces.
/// Nothing else is unescaped.
pub fn unescape_whitespace(text: Option<&str>) -> String {
    match text {
        None | Some("") => String::new(),
        Some(text) => text
            .replace("\\r\\n", "\n")
            .replace("\\n", "\n")
            .replace("\\t", "    "),
    }
}

fn code_style() -> Style {
    Style::default().fg(Color::Yellow)
}

/// Parse **bold** and `code` inside a single line.
fn parse_inline(text: &str, base: Style) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();

                let mut bold_text = String::new();
                let mut found_close = false;
                while let Some(c) = chars.next() {
                    if c == '*' && chars.peek() == Some(&'*') {
                        chars.next();
                        found_close = true;
                        break;
                    }
                    bold_text.push(c);
                }

                if found_close && !bold_text.is_empty() {
                    if !current_text.is_empty() {
                        spans.push(Span::styled(std::mem::take(&mut current_text), base));
                    }
                    spans.push(Span::styled(bold_text, base.add_modifier(Modifier::BOLD)));
                } else {
                    // Unclosed, keep the markers
                    current_text.push_str("**");
                    current_text.push_str(&bold_text);
                    if found_close {
                        current_text.push_str("**");
                    }
                }
            }
            '`' => {
                let mut code = String::new();
                let mut found_close = false;
                for c in chars.by_ref() {
                    if c == '`' {
                        found_close = true;
                        break;
                    }
                    code.push(c);
                }

                if found_close {
                    if !current_text.is_empty() {
                        spans.push(Span::styled(std::mem::take(&mut current_text), base));
                    }
                    spans.push(Span::styled(code, code_style()));
                } else {
                    current_text.push('`');
                    current_text.push_str(&code);
                }
            }
            _ => current_text.push(c),
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::styled(current_text, base));
    }
    spans
}

/// Render Markdown text as styled terminal lines.
///
/// Handles `#` headings, `-`/`*` bullets, fenced code blocks, `---` rules and
/// inline bold/code. Anything else is shown as plain text.
pub fn render_markdown(text: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut in_code_block = false;

    for raw in text.lines() {
        let trimmed = raw.trim_start();

        if trimmed.starts_with("```") {
            in_code_block = !in_code_block;
            let lang = trimmed.trim_start_matches('`').trim();
            if in_code_block && !lang.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("[{}]", lang),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            continue;
        }

        if in_code_block {
            lines.push(Line::from(Span::styled(format!("  {}", raw), code_style())));
            continue;
        }

        if trimmed == "---" || trimmed == "***" {
            lines.push(Line::from(Span::styled(
                "─".repeat(40),
                Style::default().fg(Color::DarkGray),
            )));
            continue;
        }

        let heading_level = trimmed.chars().take_while(|c| *c == '#').count();
        if (1..=6).contains(&heading_level) && trimmed[heading_level..].starts_with(' ') {
            let style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
            lines.push(Line::from(parse_inline(trimmed[heading_level..].trim(), style)));
            continue;
        }

        if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            let indent = " ".repeat(raw.len() - trimmed.len());
            let mut spans = vec![Span::raw(format!("{}• ", indent))];
            spans.extend(parse_inline(item, Style::default()));
            lines.push(Line::from(spans));
            continue;
        }

        lines.push(Line::from(parse_inline(raw, Style::default())));
    }

    lines
}
