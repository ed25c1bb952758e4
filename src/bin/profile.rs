use std::time::Duration;

use labyrinth::{AppError, app::App, config::Settings};

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1);
    let settings = Settings {
        width: u8::MAX as u16,
        height: u8::MAX as u16,
        frame_delay: Duration::ZERO,
        ..Settings::default()
    };
    for _ in 0..num_iters {
        App::headless(settings)?;
    }
    Ok(())
}
