use clap::Parser;
use color_eyre::Result;
use program_map_tui::cli::CliArgs;
use program_map_tui::config::init_app_config;
use program_map_tui::loader::load_dataset;
use program_map_tui::logging::init_logging;
use program_map_tui::{event, terminal, App};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = init_app_config()?;
    let headless = args.headless || !is_terminal();
    init_logging(&config, !headless)?;

    let dataset = load_dataset(config.data_path.as_deref()).await?;
    let filters = args.filter_state()?;

    if headless {
        return event::run_headless(&dataset, &filters, &config.map, args.json);
    }

    let mut app = App::new(Arc::new(dataset), config.map);

    let mut terminal = terminal::setup()?;
    let size = terminal.size()?;
    app.resize(ratatui::layout::Rect::new(0, 0, size.width, size.height));
    app.apply_filters(&filters);

    let result = event::run(&mut terminal, &mut app).await;
    app.session.unmount();

    terminal::cleanup(true, true);
    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
