use humansize::{format_size, BINARY};
use ratatui::prelude::*;

/// Colour for a usage percentage
pub fn usage_color(value: f32) -> Color {
    match value {
        v if v < 50.0 => Color::Green,
        v if v < 80.0 => Color::Yellow,
        _ => Color::Red,
    }
}

/// Text bar such as `██████░░░░  60%`
pub fn usage_bar(value: f32, width: usize) -> Line<'static> {
    let clamped = value.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f32) as usize;
    let color = usage_color(clamped);

    let mut style = Style::default().fg(color);
    if color == Color::Red {
        style = style.add_modifier(Modifier::BOLD);
    }

    Line::from(vec![
        Span::styled(
            format!("{}{}", "█".repeat(filled), "░".repeat(width - filled)),
            style,
        ),
        Span::raw(format!(" {:>3.0}%", clamped)),
    ])
}

pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, BINARY)
}

/// Format bytes per second for network display
pub fn format_rate(bytes_per_sec: f64) -> String {
    format!("{}/s", format_size(bytes_per_sec.max(0.0) as u64, BINARY))
}

/// `2.40 GHz`, or nothing when the frequency is unknown
pub fn format_frequency(mhz: f64) -> String {
    if mhz > 0.0 {
        format!("{:.2} GHz", mhz / 1000.0)
    } else {
        String::new()
    }
}

/// Style for an event log line
pub fn event_style(message: &str) -> Style {
    if message.contains("High") {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if message.contains("cleanup") {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    }
}
