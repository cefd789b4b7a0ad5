//! Resolve a tournament fixture and print the bracket report as JSON.
//! Run with: cargo run --bin standings -- path/to/fixture.json
//! The fixture path can also come from env: BRACKET_FIXTURE. Log level via RUST_LOG.

use bracket_core::fixture::Fixture;
use std::error::Error;

fn fixture_path() -> Option<String> {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("BRACKET_FIXTURE").ok())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let Some(path) = fixture_path() else {
        log::error!("No fixture given (pass a path or set BRACKET_FIXTURE)");
        std::process::exit(2);
    };
    log::info!("Loading fixture from {}", path);

    let json = std::fs::read_to_string(&path)?;
    let fixture = Fixture::from_json(&json)?;
    let report = fixture.run()?;
    if !report.complete {
        log::warn!("Bracket is not complete; some nodes have no winner yet");
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
