use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
};
use crate::app::{App, FocusField, InputMode};
use crate::content::{ContentView, GeneratedContent};

const TITLE: &str = " AI News Content Generator ";
const PROMPT_PLACEHOLDER: &str = "E.g., Create a humorous post about AI trends today";

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let error_height = if app.controller.error().is_some() { 1 } else { 0 };
    let [form_area, error_area, results_area] = Layout::vertical([
        Constraint::Length(9),
        Constraint::Length(error_height),
        Constraint::Min(0),
    ])
    .areas(body_area);

    render_form(app, frame, form_area);

    if let Some(message) = app.controller.error() {
        let error = Paragraph::new(Span::styled(
            format!(" {}", message),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(error, error_area);
    }

    if app.content().is_some() {
        render_results(app, frame, results_area);
    } else {
        app.tabs_area = None;
        app.result_area = None;
        app.sources_area = None;
        let hint = Paragraph::new(Span::styled(
            " Enter your prompt and preferences to generate content",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(hint, results_area);
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(TITLE, Style::default().fg(Color::Cyan).bold()),
        Span::styled(app.client.base_url().to_string(), Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_form(app: &mut App, frame: &mut Frame, area: Rect) {
    let [prompt_area, selects_area, submit_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
    ])
    .areas(area);
    app.prompt_area = Some(prompt_area);

    // Prompt input
    let prompt_focused = app.focus == FocusField::Prompt;
    let editing = prompt_focused && app.input_mode == InputMode::Editing;
    let prompt_block = Block::default()
        .borders(Borders::ALL)
        .border_style(if editing {
            Style::default().fg(Color::Yellow)
        } else {
            border_style(prompt_focused)
        })
        .title(" Prompt ");

    // Scroll horizontally so the cursor stays inside the box
    let inner_width = prompt_area.width.saturating_sub(2) as usize;
    let scroll_offset = if inner_width > 0 && app.prompt_cursor >= inner_width {
        app.prompt_cursor - inner_width + 1
    } else {
        0
    };

    let prompt_text = if app.form.prompt.is_empty() {
        Span::styled(PROMPT_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        let visible: String = app
            .form
            .prompt
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        Span::raw(visible)
    };
    frame.render_widget(Paragraph::new(prompt_text).block(prompt_block), prompt_area);

    if editing {
        let cursor_x = (app.prompt_cursor - scroll_offset) as u16;
        frame.set_cursor_position((prompt_area.x + 1 + cursor_x, prompt_area.y + 1));
    }

    // Tone / platform selects
    let [tone_area, platform_area] = Layout::horizontal([
        Constraint::Percentage(50),
        Constraint::Percentage(50),
    ])
    .areas(selects_area);

    render_select(
        frame,
        tone_area,
        " Tone ",
        app.form.tone.display_name(),
        app.focus == FocusField::Tone,
    );
    render_select(
        frame,
        platform_area,
        " Platform ",
        app.form.platform.display_name(),
        app.focus == FocusField::Platform,
    );

    // Submit button, disabled while a request is in flight
    let submit_focused = app.focus == FocusField::Submit;
    let label = if app.is_pending() {
        Line::from(Span::styled(
            format!("Generating{}", ".".repeat(app.animation_frame + 1)),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(Span::styled(
            "Generate Content",
            if submit_focused {
                Style::default().fg(Color::Black).bg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::White).bold()
            },
        ))
    };
    let submit = Paragraph::new(label)
        .centered()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(submit_focused && !app.is_pending())),
        );
    frame.render_widget(submit, submit_area);
}

fn render_select(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(title.to_string());
    let line = Line::from(vec![
        Span::styled("‹ ", Style::default().fg(Color::DarkGray)),
        Span::raw(value.to_string()),
        Span::styled(" ›", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_results(app: &mut App, frame: &mut Frame, area: Rect) {
    let Some(content) = app.content().cloned() else {
        return;
    };

    let sources_height = if content.has_sources() {
        (content.sources.len().min(6) + 2) as u16
    } else {
        0
    };

    let [tabs_area, view_area, sources_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(sources_height),
    ])
    .areas(area);

    app.tabs_area = Some(tabs_area);
    app.result_area = Some(view_area);
    app.sources_area = if content.has_sources() { Some(sources_area) } else { None };

    let results_focused = app.focus == FocusField::Results;
    let tabs = Tabs::new(ContentView::all().iter().map(|v| v.title()).collect::<Vec<_>>())
        .select(app.view.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(results_focused)),
        );
    frame.render_widget(tabs, tabs_area);

    let body = Paragraph::new(view_text(&content, app.view)).wrap(Wrap { trim: false });
    app.result_lines = body.line_count(view_area.width.saturating_sub(2)) as u16;
    app.result_height = view_area.height.saturating_sub(2);
    app.result_scroll = app.result_scroll.min(app.max_result_scroll());

    let view = body
        .scroll((app.result_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(results_focused))
                .title(format!(" {} ", app.view.title())),
        );
    frame.render_widget(view, view_area);

    if content.has_sources() {
        render_sources(app, frame, sources_area, &content);
    }
}

/// Body of the active tab: the field itself, or a placeholder when empty.
fn view_text(content: &GeneratedContent, view: ContentView) -> Text<'static> {
    match content.field(view) {
        None => Text::from(Span::styled(
            view.placeholder(),
            Style::default().fg(Color::DarkGray),
        )),
        Some(text) if !view.is_media() => Text::from(
            text.lines()
                .map(|line| Line::from(line.to_string()))
                .collect::<Vec<_>>(),
        ),
        Some(url) => Text::from(vec![
            Line::from(Span::styled(
                url.to_string(),
                Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            )),
            Line::default(),
            Line::from(Span::styled(
                format!("Press o to open the {} in your browser", view.title().to_lowercase()),
                Style::default().fg(Color::DarkGray),
            )),
        ]),
    }
}

fn render_sources(app: &mut App, frame: &mut Frame, area: Rect, content: &GeneratedContent) {
    let focused = app.focus == FocusField::Sources;
    let items: Vec<ListItem> = content
        .sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(source.clone(), Style::default().fg(Color::Blue)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(focused))
                .title(" Sources "),
        )
        .highlight_style(if focused {
            Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        });

    frame.render_stateful_widget(list, area, &mut app.sources_state);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match app.input_mode {
        InputMode::Normal => (" NORMAL ", Style::default().bg(Color::Blue).fg(Color::White)),
        InputMode::Editing => (" EDIT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
    };

    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let hint = |key: &'static str, label: &'static str| {
        [Span::styled(key, key_style), Span::styled(label, label_style)]
    };

    let mut hints: Vec<Span> = Vec::new();
    if let Some(notice) = &app.notice {
        hints.push(Span::styled(
            format!(" {} ", notice),
            Style::default().bg(Color::Black).fg(Color::Yellow),
        ));
    }

    match (app.input_mode, app.focus) {
        (InputMode::Editing, _) => {
            hints.extend(hint(" Enter ", " generate "));
            hints.extend(hint(" Tab ", " next field "));
            hints.extend(hint(" Esc ", " stop typing "));
        }
        (InputMode::Normal, focus) => {
            match focus {
                FocusField::Prompt => hints.extend(hint(" i ", " edit ")),
                FocusField::Tone | FocusField::Platform => hints.extend(hint(" h/l ", " change ")),
                FocusField::Submit => hints.extend(hint(" Enter ", " generate ")),
                FocusField::Results => {
                    hints.extend(hint(" j/k ", " scroll "));
                    if app.view.is_media() {
                        hints.extend(hint(" o ", " open "));
                    }
                    hints.extend(hint(" c ", " copy "));
                }
                FocusField::Sources => {
                    hints.extend(hint(" j/k ", " nav "));
                    hints.extend(hint(" o ", " open "));
                    hints.extend(hint(" c ", " copy "));
                }
            }
            if app.content().is_some() {
                hints.extend(hint(" 1-4 ", " tab "));
            }
            hints.extend(hint(" Tab ", " focus "));
            hints.extend(hint(" g ", " generate "));
            hints.extend(hint(" q ", " quit "));
        }
    }

    let footer_content = Line::from(
        vec![Span::styled(mode_text, mode_style), Span::styled(" ", label_style)]
            .into_iter()
            .chain(hints)
            .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}
