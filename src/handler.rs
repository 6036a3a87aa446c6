use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::{debug, warn};

use crate::app::{App, FocusField, InputMode};
use crate::content::ContentView;
use crate::tui::{AppEvent, EventSender};

pub fn handle_event(app: &mut App, event: AppEvent, events: &EventSender) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key, events),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Generated(ticket, result) => app.finish_submission(ticket, result),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent, events: &EventSender) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key, events),
        InputMode::Editing => handle_editing_mode(app, key, events),
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent, events: &EventSender) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            if app.submit(events) {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Tab => {
            app.input_mode = InputMode::Normal;
            app.focus_next();
        }
        KeyCode::Backspace => app.delete_char_before_cursor(),
        KeyCode::Delete => app.delete_char_at_cursor(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent, events: &EventSender) {
    // Keys that work regardless of focus
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Tab => {
            app.focus_next();
            return;
        }
        KeyCode::BackTab => {
            app.focus_prev();
            return;
        }
        KeyCode::Char('g') => {
            app.submit(events);
            return;
        }
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(view) = c.to_digit(10).and_then(|d| ContentView::from_index(d as usize - 1)) {
                app.select_view(view);
            }
            return;
        }
        KeyCode::Char(']') => {
            app.select_view(app.view.next());
            return;
        }
        KeyCode::Char('[') => {
            app.select_view(app.view.prev());
            return;
        }
        _ => {}
    }

    match app.focus {
        FocusField::Prompt => match key.code {
            KeyCode::Enter | KeyCode::Char('i') => {
                app.input_mode = InputMode::Editing;
                app.cursor_end();
            }
            _ => {}
        },
        FocusField::Tone => match key.code {
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('j') | KeyCode::Down
            | KeyCode::Enter | KeyCode::Char(' ') => app.form.tone = app.form.tone.next(),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('k') | KeyCode::Up => {
                app.form.tone = app.form.tone.prev()
            }
            _ => {}
        },
        FocusField::Platform => match key.code {
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('j') | KeyCode::Down
            | KeyCode::Enter | KeyCode::Char(' ') => app.form.platform = app.form.platform.next(),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('k') | KeyCode::Up => {
                app.form.platform = app.form.platform.prev()
            }
            _ => {}
        },
        FocusField::Submit => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                app.submit(events);
            }
        }
        FocusField::Results => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
            KeyCode::Char('l') | KeyCode::Right => app.select_view(app.view.next()),
            KeyCode::Char('h') | KeyCode::Left => app.select_view(app.view.prev()),
            KeyCode::Char('o') | KeyCode::Enter => {
                if app.view.is_media() {
                    if let Some(url) = app.current_field() {
                        open_in_browser(url);
                    }
                }
            }
            KeyCode::Char('c') => {
                if let Some(text) = app.current_field() {
                    copy_to_clipboard(text);
                }
            }
            _ => {}
        },
        FocusField::Sources => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.sources_nav_down(),
            KeyCode::Char('k') | KeyCode::Up => app.sources_nav_up(),
            KeyCode::Char('o') | KeyCode::Enter => {
                if let Some(url) = app.selected_source() {
                    open_in_browser(url);
                }
            }
            KeyCode::Char('c') => {
                if let Some(url) = app.selected_source() {
                    copy_to_clipboard(url);
                }
            }
            _ => {}
        },
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let (col, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if is_in_area(app.prompt_area, col, row) {
                app.focus = FocusField::Prompt;
                app.input_mode = InputMode::Editing;
                app.cursor_end();
            } else if let Some(area) = app.tabs_area.filter(|a| is_in_area(Some(*a), col, row)) {
                // Tab strip starts one column in from the block border
                if let Some(view) = col.checked_sub(area.x + 1).and_then(ContentView::at_offset) {
                    app.select_view(view);
                }
            } else if let Some(area) = app.sources_area.filter(|a| is_in_area(Some(*a), col, row)) {
                app.focus = FocusField::Sources;
                let clicked = app.sources_state.offset() + row.saturating_sub(area.y + 1) as usize;
                let len = app.content().map(|c| c.sources.len()).unwrap_or(0);
                if clicked < len {
                    app.sources_state.select(Some(clicked));
                }
            }
        }
        MouseEventKind::ScrollDown => {
            if is_in_area(app.result_area, col, row) {
                app.scroll_down();
            } else if is_in_area(app.sources_area, col, row) {
                app.sources_nav_down();
            }
        }
        MouseEventKind::ScrollUp => {
            if is_in_area(app.result_area, col, row) {
                app.scroll_up();
            } else if is_in_area(app.sources_area, col, row) {
                app.sources_nav_up();
            }
        }
        _ => {}
    }
}

fn is_in_area(area: Option<Rect>, col: u16, row: u16) -> bool {
    area.is_some_and(|a| col >= a.x && col < a.x + a.width && row >= a.y && row < a.y + a.height)
}

fn open_in_browser(url: &str) {
    use std::process::{Command, Stdio};

    #[cfg(target_os = "macos")]
    let mut command = Command::new("open");
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = Command::new("xdg-open");

    debug!(%url, "opening in browser");
    if let Err(err) = command
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        warn!(%url, "Failed to open link: {}", err);
    }
}

fn copy_to_clipboard(text: &str) {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let candidates = [
        ("pbcopy", vec![]),
        ("wl-copy", vec![]),
        ("xclip", vec!["-selection", "clipboard"]),
    ];

    for (program, args) in &candidates {
        if let Ok(mut child) = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .spawn()
        {
            if let Some(mut stdin) = child.stdin.take() {
                let _ = stdin.write_all(text.as_bytes());
            }
            let _ = child.wait();
            return;
        }
    }
    warn!("No clipboard tool found");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::content::{GeneratedContent, Platform, Tone};
    use crossterm::event::{KeyEventKind, KeyEventState};
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn app_with_content() -> App {
        let mut app = App::new(Config::new(), "http://127.0.0.1:9");
        let ticket = app.controller.begin().unwrap();
        app.finish_submission(
            ticket,
            Ok(GeneratedContent {
                text: "hi".to_string(),
                image: "http://img".to_string(),
                sources: vec!["http://a".to_string()],
                ..Default::default()
            }),
        );
        app.input_mode = InputMode::Normal;
        app
    }

    #[test]
    fn typing_then_escape_edits_prompt() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Config::new(), "http://127.0.0.1:9");
        for c in "AI".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)), &tx).unwrap();
        }
        handle_event(&mut app, key(KeyCode::Esc), &tx).unwrap();
        assert_eq!(app.form.prompt, "AI");
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn enter_with_empty_prompt_stays_editing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(Config::new(), "http://127.0.0.1:9");
        handle_event(&mut app, key(KeyCode::Enter), &tx).unwrap();
        assert_eq!(app.input_mode, InputMode::Editing);
        assert!(!app.is_pending());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn selects_cycle_through_options() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Config::new(), "http://127.0.0.1:9");
        app.input_mode = InputMode::Normal;
        app.focus = FocusField::Tone;
        handle_event(&mut app, key(KeyCode::Right), &tx).unwrap();
        assert_eq!(app.form.tone, Tone::Formal);
        handle_event(&mut app, key(KeyCode::Left), &tx).unwrap();
        handle_event(&mut app, key(KeyCode::Left), &tx).unwrap();
        assert_eq!(app.form.tone, Tone::Casual);

        handle_event(&mut app, key(KeyCode::Tab), &tx).unwrap();
        assert_eq!(app.focus, FocusField::Platform);
        handle_event(&mut app, key(KeyCode::Enter), &tx).unwrap();
        assert_eq!(app.form.platform, Platform::Instagram);
    }

    #[test]
    fn number_keys_switch_tabs_without_requests() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = app_with_content();
        handle_event(&mut app, key(KeyCode::Char('2')), &tx).unwrap();
        assert_eq!(app.view, ContentView::Image);
        assert_eq!(app.current_field(), Some("http://img"));
        handle_event(&mut app, key(KeyCode::Char('4')), &tx).unwrap();
        assert_eq!(app.view, ContentView::Meme);
        handle_event(&mut app, key(KeyCode::Char(']')), &tx).unwrap();
        assert_eq!(app.view, ContentView::Text);

        assert!(!app.is_pending());
        assert!(app.submit_task.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn completion_event_updates_state() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Config::new(), "http://127.0.0.1:9");
        let ticket = app.controller.begin().unwrap();
        let content = GeneratedContent {
            text: "done".to_string(),
            ..Default::default()
        };
        handle_event(&mut app, AppEvent::Generated(ticket, Ok(content)), &tx).unwrap();
        assert_eq!(app.current_field(), Some("done"));
    }

    #[test]
    fn ctrl_c_quits_while_editing() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Config::new(), "http://127.0.0.1:9");
        let event = AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        handle_event(&mut app, event, &tx).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn clicking_a_tab_selects_it() {
        let mut app = app_with_content();
        app.tabs_area = Some(Rect::new(10, 20, 60, 3));
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            // border at 10, " Text " 11..17, divider 17, " Image " from 18
            column: 19,
            row: 21,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(&mut app, click);
        assert_eq!(app.view, ContentView::Image);
    }
}
