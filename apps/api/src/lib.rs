//! Career exploration over O*NET occupations: competency and major matching,
//! job detail pages, a web shell and a terminal shell.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod matching;
pub mod models;
pub mod routes;
pub mod scoring;
pub mod state;
pub mod store;
pub mod views;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where log lines go. The terminal shell keeps stdout clean for results and `--json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    Stderr,
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `default_level`.
pub fn init_tracing(default_level: &str, target: LogTarget) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), default_level))
    });
    let registry = tracing_subscriber::registry().with(filter);

    match target {
        LogTarget::Stdout => registry.with(fmt::layer()).init(),
        LogTarget::Stderr => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
