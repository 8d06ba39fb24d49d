pub mod app;
pub mod colors;
pub mod input;
pub mod ui;

use crate::config::AppConfig;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;

/// Entry point: run the terminal form until the user quits
pub fn run(config: &AppConfig) -> crate::Result<()> {
    let mut app = app::App::new(config)?;

    let mut terminal = ratatui::init();
    let _ = execute!(std::io::stdout(), EnableBracketedPaste);

    let result = app.run(&mut terminal);

    let _ = execute!(std::io::stdout(), DisableBracketedPaste);
    ratatui::restore();

    tracing::info!(label = %app.session.form.label, "Terminal form closed");
    result
}
