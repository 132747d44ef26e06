//! Waveform strip rendering.
//!
//! Draws the loaded clip's amplitude envelope over the visible time window
//! using block characters, with a playhead marker synchronized with the
//! piano roll below it.

use crate::app::App;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Vertical eighths, from empty to full block.
const RAMP: [char; 9] = [' ', '\u{2581}', '\u{2582}', '\u{2583}', '\u{2584}', '\u{2585}', '\u{2586}', '\u{2587}', '\u{2588}'];

/// Renders the waveform strip above the piano roll.
pub fn render_waveform(frame: &mut Frame, area: Rect, app: &App) {
    let title = match &app.loaded_path {
        Some(path) => format!(" Waveform - {} ", path.display()),
        None => " Waveform ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let Some(audio) = &app.audio else {
        let hint = Paragraph::new("No audio loaded - press 'o' to open a file")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, inner);
        return;
    };

    // Same time window as the piano roll grid, so the two stay column-aligned
    let t0 = app.viewport.time_at(0.0).max(0.0);
    let t1 = app.viewport.time_at(inner.width as f64);
    let peaks = audio.peaks_range(t0, t1, inner.width as usize);

    let playhead_col = if app.transport.is_playing() || app.transport.position() > 0.0 {
        let x = app.viewport.x_of_time(app.transport.position());
        if x >= 0.0 && x < inner.width as f64 {
            Some(x as u16)
        } else {
            None
        }
    } else {
        None
    };

    let height = inner.height as usize;
    for row in 0..height {
        let mut spans: Vec<Span> = Vec::with_capacity(peaks.len());

        for (col, &(min, max)) in peaks.iter().enumerate() {
            let amplitude = min.abs().max(max.abs()).clamp(0.0, 1.0) as f64;

            // Column bar grows upwards from the bottom row
            let bar = amplitude * height as f64;
            let level = (bar - (height - 1 - row) as f64).clamp(0.0, 1.0);
            let mut ch = RAMP[(level * 8.0).round() as usize];

            let style = if playhead_col == Some(col as u16) {
                if ch == ' ' {
                    ch = '|';
                }
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            spans.push(Span::styled(ch.to_string(), style));
        }

        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect::new(inner.x, inner.y + row as u16, inner.width, 1),
        );
    }
}
