use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::time::Duration;

use crate::app::{handle_input, handle_mouse, App};
use crate::ui;

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let size = terminal.size()?;
    app.resize(ratatui::layout::Rect::new(0, 0, size.width, size.height));

    while app.running {
        // Debounced search, hover grace and camera animation
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if !matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            tokio::task::yield_now().await;
            continue;
        }

        match event::read() {
            Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                handle_input(app, key.code);
            }
            Ok(Event::Mouse(mouse)) => handle_mouse(app, mouse),
            Ok(Event::Resize(width, height)) => {
                app.resize(ratatui::layout::Rect::new(0, 0, width, height));
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "failed to read terminal event"),
        }
    }
    Ok(())
}
