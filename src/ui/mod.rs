use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use tui_textarea::TextArea;
use unicode_width::UnicodeWidthChar;

use crate::app::{ConfirmChoice, Dialog, Focus};
use crate::core::{Note, Operation};

pub struct UiModel<'a> {
    pub action: Operation,
    pub notes: &'a [Note],
    pub selected: Option<usize>,
    pub name: &'a str,
    pub body: &'a str,
    pub body_editable: bool,
    pub shows_notes: bool,
    pub shows_name: bool,
    pub focus: Focus,
    pub status: &'a str,
    pub dialog: Option<&'a Dialog>,
}

pub fn draw(frame: &mut Frame<'_>, model: UiModel<'_>) {
    let area = frame.area();

    let mut constraints = vec![Constraint::Length(3)];
    if model.shows_notes {
        constraints.push(Constraint::Percentage(35));
    }
    if model.shows_name {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(3));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut slot = 0;
    draw_action_selector(frame, chunks[slot], &model);
    slot += 1;
    if model.shows_notes {
        draw_note_list(frame, chunks[slot], &model);
        slot += 1;
    }
    if model.shows_name {
        draw_name_field(frame, chunks[slot], &model);
        slot += 1;
    }
    draw_body(frame, chunks[slot], &model);
    slot += 1;

    frame.render_widget(
        Paragraph::new("Ctrl+R/F2 Run | F5 Refresh | Tab Focus | Esc Close | Ctrl+Q Quit")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[slot],
    );
    frame.render_widget(Paragraph::new(format!(" {}", model.status)), chunks[slot + 1]);

    if let Some(dialog) = model.dialog {
        draw_dialog(frame, area, dialog);
    }
}

fn block_for(title: &str, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(style)
}

fn draw_action_selector(frame: &mut Frame<'_>, area: Rect, model: &UiModel<'_>) {
    let mut spans = Vec::new();
    for op in Operation::ALL {
        let style = if op == model.action {
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {} ", op.label()), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(block_for(
            "Choose an action (Left/Right)",
            model.focus == Focus::Action,
        )),
        area,
    );
}

fn draw_note_list(frame: &mut Frame<'_>, area: Rect, model: &UiModel<'_>) {
    let block = block_for("Existing notes", model.focus == Focus::Notes);
    if model.notes.is_empty() {
        frame.render_widget(
            Paragraph::new("No notes found.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem<'_>> = model
        .notes
        .iter()
        .map(|n| ListItem::new(truncate_to_width(&n.name, width)))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(model.selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_name_field(frame: &mut Frame<'_>, area: Rect, model: &UiModel<'_>) {
    let mut textarea = TextArea::default();
    textarea.insert_str(model.name);
    textarea.set_block(block_for("New note name", model.focus == Focus::Name));
    hide_cursor_unless(&mut textarea, model.focus == Focus::Name);
    frame.render_widget(&textarea, area);
}

fn draw_body(frame: &mut Frame<'_>, area: Rect, model: &UiModel<'_>) {
    let focused = model.focus == Focus::Body;
    if !model.body_editable {
        frame.render_widget(
            Paragraph::new(model.body)
                .block(block_for("Note content", false))
                .wrap(Wrap { trim: false }),
            area,
        );
        return;
    }

    let mut textarea = TextArea::default();
    textarea.insert_str(model.body);
    textarea.set_block(block_for("Note content", focused));
    hide_cursor_unless(&mut textarea, focused);
    frame.render_widget(&textarea, area);
}

fn hide_cursor_unless(textarea: &mut TextArea<'_>, focused: bool) {
    textarea.set_cursor_line_style(Style::default());
    if !focused {
        textarea.set_cursor_style(Style::default());
    }
}

fn draw_dialog(frame: &mut Frame<'_>, area: Rect, dialog: &Dialog) {
    let rect = centered_rect(60, 30, area);
    frame.render_widget(Clear, rect);
    let (title, text) = match dialog {
        Dialog::Info { title, message } => (title.clone(), format!("{message}\n\n[OK]")),
        Dialog::Error { message } => ("Error".to_string(), format!("{message}\n\n[OK]")),
        Dialog::ConfirmOverwrite {
            file_name, choice, ..
        } => {
            let yes = if *choice == ConfirmChoice::Yes {
                "[Yes]"
            } else {
                " Yes "
            };
            let no = if *choice == ConfirmChoice::No {
                "[No]"
            } else {
                " No "
            };
            (
                "Confirm".to_string(),
                format!("{file_name} already exists.\nOverwrite it?\n\n{yes}   {no}"),
            )
        }
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(widget, rect);
}

/// Cuts `text` to at most `max` display columns, marking the cut with an ellipsis.
fn truncate_to_width(text: &str, max: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
