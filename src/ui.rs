use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, ChatRole, FocusPane, InputMode};
use crate::prompt::{BOARD_TYPES, PROJECT_TYPES};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);

    let [sidebar_area, chat_area] =
        Layout::horizontal([Constraint::Length(46), Constraint::Min(0)]).areas(body_area);

    render_sidebar(app, frame, sidebar_area);
    render_chat_panel(app, frame, chat_area);

    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            " Arduino & ESP Code Generator ",
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_sidebar(app: &mut App, frame: &mut Frame, area: Rect) {
    // Boards list is fixed-height (6 entries), projects take the rest
    let [board_area, project_area, tip_area] = Layout::vertical([
        Constraint::Length(BOARD_TYPES.len() as u16 + 2),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    let board_focused = app.focus == FocusPane::Boards;
    let board_items: Vec<ListItem> = BOARD_TYPES.iter().map(|b| ListItem::new(*b)).collect();
    let boards = List::new(board_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(pane_color(board_focused)))
                .title(" Board Type "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(boards, board_area, &mut app.board_state);

    let project_focused = app.focus == FocusPane::Projects;
    let project_items: Vec<ListItem> = PROJECT_TYPES.iter().map(|p| ListItem::new(*p)).collect();
    let projects = List::new(project_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(pane_color(project_focused)))
                .title(" Project Category "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(projects, project_area, &mut app.project_state);

    let tip = Paragraph::new("Tip: detailed descriptions give better code")
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Hint "));
    frame.render_widget(tip, tip_area);
}

fn render_chat_panel(app: &mut App, frame: &mut Frame, area: Rect) {
    let error_height = if app.last_error.is_some() { 3 } else { 0 };

    let [chat_area, error_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(error_height),
        Constraint::Length(3),
    ])
    .areas(area);

    render_transcript(app, frame, chat_area);

    if let Some(message) = &app.last_error {
        let error = Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Error "),
            );
        frame.render_widget(error, error_area);
    }

    render_input(app, frame, input_area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    // Inner size minus borders, used by the scroll clamping in App
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let chat_focused = app.focus == FocusPane::Chat;
    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(pane_color(chat_focused)))
        .title(format!(" Gemini: {} ", app.gemini.model()));

    let chat_text = if app.transcript.is_empty() && !app.loading {
        Text::from(Span::styled(
            "Describe what your sketch should do, e.g. read a DHT22 and print to serial...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for msg in &app.transcript {
            match msg.role {
                ChatRole::User => {
                    lines.push(Line::from(Span::styled(
                        "You:",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )));
                }
                ChatRole::Assistant => {
                    lines.push(Line::from(Span::styled(
                        "AI:",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )));
                }
            }
            for line in msg.content.lines() {
                lines.push(Line::from(line));
            }
            lines.push(Line::default());
        }

        if app.loading {
            lines.push(Line::from(Span::styled(
                "AI:",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("Thinking{}", dots),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    // trim: false keeps the indentation of generated code intact
    let chat = Paragraph::new(chat_text)
        .block(chat_block)
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let input_focused = app.focus == FocusPane::Input;
    let input_border_color = if input_focused || app.input_mode == InputMode::Editing {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let title = if app.loading {
        " Waiting for Gemini... "
    } else {
        " Requirement (i to type, Enter to send) "
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(input_border_color))
        .title(title);

    // Horizontal scrolling keeps the cursor visible in a one-line field
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.cursor;

    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app
        .input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);

    frame.render_widget(input, area);

    // No meaningful cursor position exists when the field has no interior
    if app.input_mode == InputMode::Editing && inner_width > 0 {
        let cursor_x = cursor_pos
            .saturating_sub(scroll_offset)
            .min(inner_width - 1) as u16;
        frame.set_cursor_position((
            area.x.saturating_add(cursor_x).saturating_add(1),
            area.y.saturating_add(1),
        ));
    }
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

    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = match app.input_mode {
        InputMode::Normal => vec![
            Span::styled(" Tab ", key_style),
            Span::styled(" pane ", label_style),
            Span::styled(" j/k ", key_style),
            Span::styled(" select/scroll ", label_style),
            Span::styled(" i ", key_style),
            Span::styled(" type ", label_style),
            Span::styled(" c ", key_style),
            Span::styled(" clear chat ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
        InputMode::Editing => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" done ", label_style),
        ],
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    spans.extend(hints);

    let footer = Paragraph::new(Line::from(spans));
    frame.render_widget(footer, area);
}

fn pane_color(focused: bool) -> Color {
    if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    }
}
