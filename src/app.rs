use ratatui::layout::Rect;

use crate::client::ChatClient;
use crate::config::Config;
use crate::request::RequestPreview;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Prompt,
    Request,
    Response,
}

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

    pub session: Session,
    pub client: ChatClient,

    // Cursor position in the prompt, in chars
    pub prompt_cursor: usize,

    pub request_scroll: u16,
    pub response_scroll: u16,
    // Largest useful offsets for the last rendered content (updated during render)
    pub request_max_scroll: u16,
    pub response_max_scroll: u16,

    // 0-2 for ellipsis animation
    pub animation_frame: u8,

    // Panel areas for mouse hit-testing (updated during render)
    pub prompt_area: Option<Rect>,
    pub request_area: Option<Rect>,
    pub response_area: Option<Rect>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            focus: FocusPane::Prompt,

            session: Session::new().with_view(config.default_view),
            client: ChatClient::new(&config.base_url),

            prompt_cursor: 0,

            request_scroll: 0,
            response_scroll: 0,
            request_max_scroll: 0,
            response_max_scroll: 0,

            animation_frame: 0,

            prompt_area: None,
            request_area: None,
            response_area: None,
        }
    }

    pub fn request_preview(&self) -> RequestPreview {
        RequestPreview::new(self.client.endpoint(), self.session.request())
    }

    // Prompt editing

    pub fn insert_char(&mut self, c: char) {
        let mut prompt = self.session.prompt().to_string();
        let byte_pos = char_to_byte_index(&prompt, self.prompt_cursor);
        prompt.insert(byte_pos, c);
        self.session.set_prompt(prompt);
        self.prompt_cursor += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.prompt_cursor == 0 {
            return;
        }
        self.prompt_cursor -= 1;
        let mut prompt = self.session.prompt().to_string();
        let byte_pos = char_to_byte_index(&prompt, self.prompt_cursor);
        prompt.remove(byte_pos);
        self.session.set_prompt(prompt);
    }

    pub fn delete_at_cursor(&mut self) {
        let char_count = self.session.prompt().chars().count();
        if self.prompt_cursor < char_count {
            let mut prompt = self.session.prompt().to_string();
            let byte_pos = char_to_byte_index(&prompt, self.prompt_cursor);
            prompt.remove(byte_pos);
            self.session.set_prompt(prompt);
        }
    }

    pub fn clear_prompt(&mut self) {
        self.session.set_prompt("");
        self.prompt_cursor = 0;
    }

    pub fn cursor_left(&mut self) {
        self.prompt_cursor = self.prompt_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.session.prompt().chars().count();
        self.prompt_cursor = (self.prompt_cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.prompt_cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.prompt_cursor = self.session.prompt().chars().count();
    }

    // Session actions

    /// Send the current prompt. No-op while a request is pending.
    pub fn send(&mut self) -> bool {
        let started = self.session.send(&self.client);
        if started {
            self.response_scroll = 0;
            self.animation_frame = 0;
        }
        started
    }

    pub fn toggle_view(&mut self) {
        self.session.toggle_view();
        self.response_scroll = 0;
    }

    /// Pick up the result of a finished request.
    pub async fn poll(&mut self) {
        self.session.poll().await;
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_sending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::Prompt => FocusPane::Request,
            FocusPane::Request => FocusPane::Response,
            FocusPane::Response => FocusPane::Prompt,
        };
        self.input_mode = if self.focus == FocusPane::Prompt {
            InputMode::Editing
        } else {
            InputMode::Normal
        };
    }

    pub fn focus_prompt(&mut self) {
        self.focus = FocusPane::Prompt;
        self.input_mode = InputMode::Editing;
    }

    // Scrolling

    pub fn scroll_pane_down(&mut self, pane: FocusPane, lines: u16) {
        match pane {
            FocusPane::Request => {
                self.request_scroll = self.request_scroll.saturating_add(lines).min(self.request_max_scroll)
            }
            FocusPane::Response => {
                self.response_scroll = self.response_scroll.saturating_add(lines).min(self.response_max_scroll)
            }
            FocusPane::Prompt => {}
        }
    }

    pub fn scroll_pane_up(&mut self, pane: FocusPane, lines: u16) {
        match pane {
            FocusPane::Request => self.request_scroll = self.request_scroll.saturating_sub(lines),
            FocusPane::Response => self.response_scroll = self.response_scroll.saturating_sub(lines),
            FocusPane::Prompt => {}
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_pane_down(self.focus, lines);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_pane_up(self.focus, lines);
    }

    pub fn scroll_top(&mut self) {
        match self.focus {
            FocusPane::Request => self.request_scroll = 0,
            FocusPane::Response => self.response_scroll = 0,
            FocusPane::Prompt => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(&Config::default())
    }

    #[test]
    fn editing_rebuilds_request() {
        let mut app = app();
        for c in "Hi!".chars() {
            app.insert_char(c);
        }
        assert_eq!(app.session.prompt(), "Hi!");
        assert_eq!(app.session.request().messages[1].content, "Hi!");

        app.cursor_left();
        app.delete_before_cursor();
        assert_eq!(app.session.prompt(), "H!");
        assert_eq!(app.prompt_cursor, 1);
    }

    #[test]
    fn cursor_handles_multibyte_chars() {
        let mut app = app();
        for c in "héllo".chars() {
            app.insert_char(c);
        }
        app.cursor_home();
        app.cursor_right();
        app.delete_at_cursor();
        assert_eq!(app.session.prompt(), "hllo");
        app.cursor_end();
        assert_eq!(app.prompt_cursor, 4);
        app.cursor_right();
        assert_eq!(app.prompt_cursor, 4);
    }

    #[test]
    fn focus_cycle_switches_input_mode() {
        let mut app = app();
        assert_eq!(app.input_mode, InputMode::Editing);
        app.cycle_focus();
        assert_eq!(app.focus, FocusPane::Request);
        assert_eq!(app.input_mode, InputMode::Normal);
        app.cycle_focus();
        app.cycle_focus();
        assert_eq!(app.focus, FocusPane::Prompt);
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn scrolling_targets_focused_pane() {
        let mut app = app();
        app.response_max_scroll = 10;
        app.focus = FocusPane::Response;
        app.scroll_down(3);
        app.scroll_up(1);
        assert_eq!(app.response_scroll, 2);
        assert_eq!(app.request_scroll, 0);

        app.toggle_view();
        assert_eq!(app.response_scroll, 0);
    }

    #[test]
    fn scrolling_stops_at_end_of_content() {
        let mut app = app();
        app.focus = FocusPane::Request;
        app.scroll_down(5);
        assert_eq!(app.request_scroll, 0);

        app.request_max_scroll = 4;
        app.scroll_down(u16::MAX);
        assert_eq!(app.request_scroll, 4);
        app.scroll_up(1);
        assert_eq!(app.request_scroll, 3);
    }

    #[test]
    fn preview_uses_client_endpoint() {
        let mut app = app();
        app.insert_char('x');
        let preview = app.request_preview();
        assert_eq!(preview.url, "http://localhost:8080/api/chat");
        assert!(preview.body.contains("\"content\": \"x\""));
    }
}
