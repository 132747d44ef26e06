//! rollscribe - A terminal piano roll over AI-transcribed audio.
//!
//! Load an audio file and the transcription service turns it into notes on
//! a piano roll, drawn over the clip's waveform. Notes can be dragged to
//! retime and repitch them, and playback follows a hardware-clock-driven
//! playhead.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- song.wav        # Load and transcribe a file on startup
//! cargo run                    # Start empty, press 'o' to open a file
//! ```
//!
//! The transcription service API key is read from the `ROLLSCRIBE_API_KEY`
//! environment variable.

mod analysis;
mod app;
mod audio;
mod geometry;
mod transport;
mod ui;

use analysis::{HttpTranscriber, Transcriber};
use app::{App, Tool};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

/// Command-line options for the application.
struct CliOptions {
    /// Audio file to load and transcribe on startup.
    audio: Option<PathBuf>,
    /// Override for the transcription service endpoint.
    endpoint: Option<String>,
}

impl CliOptions {
    /// Parses command-line arguments.
    ///
    /// Supports:
    /// - `<path>`: Audio file to load on startup (positional)
    /// - `--endpoint <url>`: Use a custom transcription endpoint
    /// - `--help` or `-h`: Print help and exit
    fn parse() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut audio: Option<PathBuf> = None;
        let mut endpoint: Option<String> = None;
        let mut i = 1;

        while i < args.len() {
            match args[i].as_str() {
                "--endpoint" | "-e" => {
                    i += 1;
                    if i >= args.len() {
                        eprintln!("Error: --endpoint requires a URL argument");
                        std::process::exit(1);
                    }
                    endpoint = Some(args[i].clone());
                }
                "--help" | "-h" => {
                    eprintln!("rollscribe - Terminal piano roll over transcribed audio");
                    eprintln!();
                    eprintln!(
                        "Usage: {} [OPTIONS] [AUDIO_FILE]",
                        args.first().unwrap_or(&"rollscribe".to_string())
                    );
                    eprintln!();
                    eprintln!("Options:");
                    eprintln!("  -e, --endpoint URL  Use a custom transcription endpoint");
                    eprintln!("  -h, --help          Print this help message");
                    eprintln!();
                    eprintln!("The API key is read from ROLLSCRIBE_API_KEY.");
                    std::process::exit(0);
                }
                other => {
                    if other.starts_with('-') {
                        eprintln!("Unknown option: {}", other);
                        eprintln!("Use --help for usage information");
                        std::process::exit(1);
                    }
                    audio = Some(PathBuf::from(other));
                }
            }
            i += 1;
        }

        Ok(Self { audio, endpoint })
    }
}

/// Main entry point.
fn main() -> Result<()> {
    // Parse CLI options first (before any terminal setup)
    let cli = CliOptions::parse()?;

    // Initialize logging (optional, for debugging)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let transcriber = HttpTranscriber::from_env(cli.endpoint);

    let mut terminal = setup_terminal().context("Failed to setup terminal")?;

    let mut app = App::new();
    app.init_audio_output();

    if let Some(path) = cli.audio {
        app.load_audio(path, &transcriber);
    }

    // Run main loop
    let result = run_app(&mut terminal, &mut app, &transcriber);

    // Restore terminal
    restore_terminal(&mut terminal).context("Failed to restore terminal")?;

    result
}

/// Sets up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    transcriber: &dyn Transcriber,
) -> Result<()> {
    loop {
        // Republish the playback position before each redraw
        app.update_playback();
        app.clear_expired_status();

        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events with a short timeout to keep the playhead moving
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    // File browser gets the keys while open
                    if app.file_browser.open {
                        match key.code {
                            KeyCode::Enter => {
                                if let Some(path) = app.file_browser_select() {
                                    app.load_audio(path, transcriber);
                                }
                            }
                            KeyCode::Esc => app.file_browser_cancel(),
                            KeyCode::Up | KeyCode::Char('k') => app.file_browser_up(),
                            KeyCode::Down | KeyCode::Char('j') => app.file_browser_down(),
                            _ => {}
                        }
                        continue;
                    }

                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            break;
                        }
                        KeyCode::Char(' ') => app.toggle_playback(),
                        KeyCode::Char('s') => app.stop_playback(),
                        KeyCode::Char('o') => app.open_file_browser(),
                        KeyCode::Char('1') => app.tool = Tool::Pointer,
                        KeyCode::Char('2') => app.tool = Tool::Pencil,
                        KeyCode::Char('3') => app.tool = Tool::Cut,
                        KeyCode::Char('4') => app.tool = Tool::Zoom,
                        KeyCode::Left => app.viewport.scroll_by(-4.0, 0.0),
                        KeyCode::Right => app.viewport.scroll_by(4.0, 0.0),
                        KeyCode::Up => app.viewport.scroll_by(0.0, -1.0),
                        KeyCode::Down => app.viewport.scroll_by(0.0, 1.0),
                        KeyCode::Char('+') | KeyCode::Char('=') => app.viewport.zoom_x_by(1.25),
                        KeyCode::Char('-') => app.viewport.zoom_x_by(0.8),
                        KeyCode::Char(']') => app.viewport.zoom_y_by(1.25),
                        KeyCode::Char('[') => app.viewport.zoom_y_by(0.8),
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Handles mouse events on the main view.
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.file_browser.open {
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some((gx, gy)) = app.layout.grid_point(mouse.column, mouse.row) {
                app.handle_grid_press(gx, gy);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            // Keep tracking even when the pointer leaves the grid
            if app.dragging().is_some() {
                let (gx, gy) = app.layout.grid_point_unclamped(mouse.column, mouse.row);
                app.update_drag(gx, gy);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        MouseEventKind::ScrollUp => {
            if mouse.modifiers.contains(KeyModifiers::CONTROL) {
                app.viewport.zoom_x_by(1.25);
            } else {
                app.viewport.scroll_by(0.0, -2.0);
            }
        }
        MouseEventKind::ScrollDown => {
            if mouse.modifiers.contains(KeyModifiers::CONTROL) {
                app.viewport.zoom_x_by(0.8);
            } else {
                app.viewport.scroll_by(0.0, 2.0);
            }
        }
        MouseEventKind::ScrollLeft => {
            app.viewport.scroll_by(-4.0, 0.0);
        }
        MouseEventKind::ScrollRight => {
            app.viewport.scroll_by(4.0, 0.0);
        }
        _ => {}
    }
}
