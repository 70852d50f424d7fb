//! The venue backend process: one engine, stdin commands, stdout replies,
//! stderr events.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use matchbook_rs::Engine;
use matchbook_rs::protocol::{self, serve};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        println!(
            "Backend called with {} arguments (2 required). Quitting.",
            args.len() - 1
        );
        return ExitCode::from(1);
    }

    // Diagnostics are off unless RUST_LOG asks for them; the event
    // protocol owns stderr and log lines would interleave with it.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let venue = &args[1];
    let symbol = &args[2];
    let mut engine = Engine::new(venue, symbol);
    info!(venue, symbol, "matchbook backend started");

    engine.execution_listener = Some(Arc::new(|event| {
        let mut stderr = io::stderr().lock();
        let _ = protocol::write_execution(&mut stderr, event);
    }));
    engine.ticker_listener = Some(Arc::new(|event| {
        let mut stderr = io::stderr().lock();
        let _ = protocol::write_ticker(&mut stderr, event);
    }));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let _ = serve(&mut engine, stdin.lock(), stdout.lock());

    // serve only returns once stdin is gone.
    ExitCode::from(1)
}
