use ratatui::style::{Color, Modifier, Style};

pub const BAR_BG: Color = Color::Rgb(0, 95, 135);
pub const CURSOR_BG: Color = Color::Rgb(60, 60, 80);
pub const STRIPE_BG: Color = Color::Rgb(25, 25, 35);
pub const CHIP_BG: Color = Color::Rgb(40, 40, 50);

pub const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

/// Row background: cursor row, then alternating stripes
pub fn row_background(is_cursor: bool, visual_idx: usize) -> Color {
    if is_cursor {
        CURSOR_BG
    } else if visual_idx % 2 == 1 {
        STRIPE_BG
    } else {
        Color::Reset
    }
}

/// Matched part of a label
pub fn match_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn label_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::LightGreen)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn checkbox(selected: bool) -> (&'static str, Style) {
    if selected {
        ("[x] ", Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD))
    } else {
        ("[ ] ", Style::default().fg(Color::DarkGray))
    }
}

pub fn chip_style() -> Style {
    Style::default().fg(Color::White).bg(CHIP_BG)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}
