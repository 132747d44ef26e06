//! Transport bar rendering.
//!
//! Displays the playback state, the position within the clip, the detected
//! key and tempo, and the active tool.

use super::format_time;
use crate::app::App;
use crate::transport::TransportState;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Renders the transport bar at the top of the screen.
pub fn render_timeline(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Transport ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Playback state
            Constraint::Length(18), // Position
            Constraint::Length(22), // Key / tempo
            Constraint::Length(16), // Tool
            Constraint::Min(20),    // Status message
        ])
        .split(inner);

    let play_status = match app.transport.state() {
        TransportState::Playing => Span::styled(
            " [>] PLAY ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        TransportState::Stopped => Span::styled(
            " [.] STOP ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(play_status)), chunks[0]);

    let position = format!(
        "{} / {}",
        format_time(app.transport.position()),
        format_time(app.transport.duration())
    );
    let position_widget = Paragraph::new(Line::from(vec![
        Span::styled("Pos: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            position,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    frame.render_widget(position_widget, chunks[1]);

    let key_text = match &app.analysis {
        Some(analysis) => format!("{} {} @ {:.0}", analysis.key, analysis.scale, analysis.bpm),
        None => "-".to_string(),
    };
    let key_widget = Paragraph::new(Line::from(vec![
        Span::styled("Key: ", Style::default().fg(Color::DarkGray)),
        Span::styled(key_text, Style::default().fg(Color::White)),
    ]));
    frame.render_widget(key_widget, chunks[2]);

    let tool_widget = Paragraph::new(Line::from(vec![
        Span::styled("Tool: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.tool.label(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
    ]));
    frame.render_widget(tool_widget, chunks[3]);

    if let Some((msg, _)) = &app.status_message {
        let status = Paragraph::new(Line::from(Span::styled(
            msg.as_str(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
        frame.render_widget(status, chunks[4]);
    }
}
