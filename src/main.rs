use clap::Parser;
use labyrinth::{
    AppError,
    app::{App, TerminalSession},
    config::{Cli, Settings},
};

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli)?;
    let _log_guard = labyrinth::logging::init(&cli.log_path())?;

    if cli.headless {
        let grid = App::headless(settings)?;
        print!("{}", grid);
        return Ok(());
    }

    let app = App::new(settings);
    let mut session = TerminalSession::enter()?;
    app.run(session.stdout())
}
