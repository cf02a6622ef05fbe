use crate::controller::PickerView;
use crate::tui::app::{App, Focus};
use crate::tui::colors;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Chips
            Constraint::Length(3), // Search bar
            Constraint::Min(3),    // Results
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    // Visible rows must be known before the view borrows the controller
    app.list.visible_rows = chunks[2].height.saturating_sub(2) as usize;

    let view = app.controller.view();
    draw_chips(frame, &view, chunks[0]);
    draw_search_bar(frame, app, &view, chunks[1]);
    draw_results(frame, app, &view, chunks[2]);
    draw_status_bar(frame, app, &view, chunks[3]);

    // Show cursor in search bar when focused
    if app.focus == Focus::Input {
        // Account for border (1) + prompt "> " (2)
        let cursor_x = chunks[1].x + 1 + 2 + app.search.cursor_column();
        let cursor_y = chunks[1].y + 1;
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_chips(frame: &mut Frame, view: &PickerView, area: Rect) {
    if view.chips.is_empty() {
        let hint = Paragraph::new(" No selection")
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC));
        frame.render_widget(hint, area);
        return;
    }

    let mut spans = vec![Span::raw(" ")];
    for chip in view.chips {
        spans.push(Span::styled(format!(" {} \u{00D7} ", chip.name), colors::chip_style()));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_search_bar(frame: &mut Frame, app: &App, view: &PickerView, area: Rect) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(colors::border_style(app.focus == Focus::Input))
        .title(" Search Characters ");

    if view.loading {
        let spinner = format!(" {} ", colors::spinner_frame(app.spinner_tick));
        block = block.title_top(
            Line::from(Span::styled(spinner, Style::default().fg(Color::Cyan))).right_aligned(),
        );
    }

    let paragraph = Paragraph::new(format!("> {}", app.search.text))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn draw_results(frame: &mut Frame, app: &App, view: &PickerView, area: Rect) {
    let title = if view.rows.is_empty() {
        " Results ".to_string()
    } else {
        format!(" Results ({}) ", view.rows.len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(colors::border_style(app.focus == Focus::List))
        .title(title);

    if !app.list.open {
        let hint = Paragraph::new(" Type to search, or press \u{2193}/Tab to list results")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    if view.rows.is_empty() {
        let text = if view.loading { " Loading\u{2026}" } else { " No options" };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // Build visible rows only
    let start = app.list.scroll_offset.min(view.rows.len());
    let end = (start + app.list.visible_rows).min(view.rows.len());

    let lines: Vec<Line> = view.rows[start..end]
        .iter()
        .enumerate()
        .map(|(visual_idx, row)| {
            let is_cursor = app.focus == Focus::List && app.list.selected == Some(start + visual_idx);
            let bg = colors::row_background(is_cursor, visual_idx);

            let (checkbox, checkbox_style) = colors::checkbox(row.selected);
            let mut spans = vec![Span::styled(checkbox, checkbox_style)];

            let base = colors::label_style(row.selected);
            let base = if is_cursor { base.add_modifier(Modifier::BOLD) } else { base };
            for segment in &row.label {
                let style = if segment.is_match {
                    colors::match_style()
                } else {
                    base
                };
                spans.push(Span::styled(segment.text, style));
            }

            spans.push(Span::styled(
                format!("  {}", row.entity.episode_label()),
                Style::default().fg(Color::Gray),
            ));
            if !row.entity.image.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", row.entity.image),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                ));
            }

            Line::from(spans).style(Style::default().bg(bg))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, view: &PickerView, area: Rect) {
    let left_text = if view.loading {
        format!(" \u{23F3} Searching for \"{}\"...", view.query)
    } else if let Some(e) = view.last_error {
        format!(" \u{26A0} Search failed: {}", e.summary())
    } else {
        let updated = app
            .last_updated
            .as_deref()
            .map(|t| format!(" | updated {}", t))
            .unwrap_or_default();
        format!(
            " {} | {} results | {} selected{}",
            app.status_message,
            view.rows.len(),
            view.chips.len(),
            updated
        )
    };

    let right_text = " Space:Toggle  Enter:Done  ^X:Clear  ^O:Image  ^Y:Copy  Esc:Back ";

    // Build the status line: left-aligned text + padding + right-aligned text
    let available_width = area.width as usize;
    let left_len = left_text.chars().count();
    let right_len = right_text.chars().count();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        // Not enough space, just show left text
        format!("{:width$}", left_text, width = available_width)
    };

    let status = Paragraph::new(status_str)
        .style(Style::default().fg(Color::White).bg(colors::BAR_BG));

    frame.render_widget(status, area);
}
