use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::{App, FocusPane, InputMode};
use crate::tui::AppEvent;

const HALF_PAGE: u16 = 10;
const WHEEL_LINES: u16 = 3;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
    }

    // Every event doubles as a chance to pick up a finished request
    app.poll().await;
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => {
                app.should_quit = true;
                return;
            }
            KeyCode::Char('t') => {
                app.toggle_view();
                return;
            }
            _ => {}
        }
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Tab if app.focus == FocusPane::Response => app.toggle_view(),
        KeyCode::Tab => app.cycle_focus(),
        KeyCode::BackTab => app.focus_prompt(),

        // Edit prompt
        KeyCode::Char('i') | KeyCode::Char('/') => {
            app.focus_prompt();
            app.cursor_end();
        }
        KeyCode::Enter if app.focus == FocusPane::Prompt => {
            app.input_mode = InputMode::Editing;
        }

        KeyCode::Char('s') => {
            app.send();
        }
        KeyCode::Char('v') => app.toggle_view(),

        // Half-page scroll
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_down(HALF_PAGE);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_up(HALF_PAGE);
        }
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::PageDown => app.scroll_down(HALF_PAGE),
        KeyCode::PageUp => app.scroll_up(HALF_PAGE),
        KeyCode::Char('g') => app.scroll_top(),

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Tab => app.cycle_focus(),
        KeyCode::Enter => {
            app.send();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_prompt();
        }
        KeyCode::Backspace => app.delete_before_cursor(),
        KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.insert_char(c),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    let in_request = app.request_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_response = app.response_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    let pane = if in_request {
        FocusPane::Request
    } else if in_response {
        FocusPane::Response
    } else {
        return;
    };

    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_pane_down(pane, WHEEL_LINES),
        MouseEventKind::ScrollUp => app.scroll_pane_up(pane, WHEEL_LINES),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::session::{ResponseView, SessionStatus};

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    async fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c))).await.unwrap();
        }
    }

    #[tokio::test]
    async fn typing_edits_prompt() {
        let mut app = App::new(&Config::default());
        type_str(&mut app, "hello").await;
        handle_event(&mut app, key(KeyCode::Backspace)).await.unwrap();
        assert_eq!(app.session.prompt(), "hell");

        handle_event(&mut app, ctrl('u')).await.unwrap();
        assert_eq!(app.session.prompt(), "");
    }

    #[tokio::test]
    async fn letters_type_while_editing_but_act_in_normal_mode() {
        let mut app = App::new(&Config::default());
        type_str(&mut app, "v").await;
        assert_eq!(app.session.prompt(), "v");
        assert_eq!(app.session.view(), ResponseView::Json);

        handle_event(&mut app, key(KeyCode::Esc)).await.unwrap();
        handle_event(&mut app, key(KeyCode::Char('v'))).await.unwrap();
        assert_eq!(app.session.prompt(), "v");
        assert_eq!(app.session.view(), ResponseView::Content);

        handle_event(&mut app, key(KeyCode::Char('q'))).await.unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn ctrl_t_toggles_view_in_any_mode() {
        let mut app = App::new(&Config::default());
        handle_event(&mut app, ctrl('t')).await.unwrap();
        assert_eq!(app.session.view(), ResponseView::Content);
        assert_eq!(app.session.prompt(), "");
    }

    #[tokio::test]
    async fn enter_on_blank_prompt_stays_idle() {
        let mut app = App::new(&Config::default());
        type_str(&mut app, "   ").await;
        handle_event(&mut app, key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.session.status(), &SessionStatus::Idle);
    }

    #[tokio::test]
    async fn ctrl_c_quits_while_editing() {
        let mut app = App::new(&Config::default());
        handle_event(&mut app, ctrl('c')).await.unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn wheel_scrolls_pane_under_cursor() {
        let mut app = App::new(&Config::default());
        app.request_area = Some(Rect::new(0, 0, 40, 10));
        app.response_area = Some(Rect::new(40, 0, 40, 10));
        app.request_max_scroll = 20;
        app.response_max_scroll = 20;

        let wheel = |column, kind| {
            AppEvent::Mouse(MouseEvent {
                kind,
                column,
                row: 5,
                modifiers: KeyModifiers::NONE,
            })
        };

        handle_event(&mut app, wheel(50, MouseEventKind::ScrollDown)).await.unwrap();
        assert_eq!(app.response_scroll, WHEEL_LINES);
        assert_eq!(app.request_scroll, 0);

        handle_event(&mut app, wheel(5, MouseEventKind::ScrollDown)).await.unwrap();
        handle_event(&mut app, wheel(5, MouseEventKind::ScrollUp)).await.unwrap();
        assert_eq!(app.request_scroll, 0);

        for _ in 0..10 {
            handle_event(&mut app, wheel(50, MouseEventKind::ScrollDown)).await.unwrap();
        }
        assert_eq!(app.response_scroll, 20);
    }

    #[tokio::test]
    async fn tab_on_response_pane_toggles_view() {
        let mut app = App::new(&Config::default());
        app.focus = FocusPane::Response;
        app.input_mode = InputMode::Normal;

        handle_event(&mut app, key(KeyCode::Tab)).await.unwrap();
        assert_eq!(app.session.view(), ResponseView::Content);
        assert_eq!(app.focus, FocusPane::Response);

        handle_event(&mut app, key(KeyCode::Tab)).await.unwrap();
        assert_eq!(app.session.view(), ResponseView::Json);

        handle_event(&mut app, key(KeyCode::BackTab)).await.unwrap();
        assert_eq!(app.focus, FocusPane::Prompt);
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[tokio::test]
    async fn tab_cycles_focus_outside_response_pane() {
        let mut app = App::new(&Config::default());
        handle_event(&mut app, key(KeyCode::Tab)).await.unwrap();
        assert_eq!(app.focus, FocusPane::Request);
        handle_event(&mut app, key(KeyCode::Tab)).await.unwrap();
        assert_eq!(app.focus, FocusPane::Response);
        assert_eq!(app.session.view(), ResponseView::Json);
    }
}
