use anyhow::Result;

use sketchgen::app::App;
use sketchgen::config::Config;
use sketchgen::handler;
use sketchgen::tui;
use sketchgen::ui;

#[tokio::main]
async fn main() -> Result<()> {
    // Both failure points halt here, before any terminal setup: an unreadable
    // or invalid settings file, then a missing API key
    let config = Config::load()?;
    let mut app = App::new(&config)?;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let result = run(&mut terminal, &mut events, &mut app).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, events: &mut tui::EventHandler, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(app, event).await?;
        }
    }
    Ok(())
}
