//! The `careers` terminal shell. Same services as the web shell, different surface.

pub mod display;
pub mod interactive;

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::catalog::{Catalog, CompetencySelection};
use crate::config::Config;
use crate::matching::{self, MajorQuery};
use crate::state::AppState;
use crate::store::{self, CareerStore, OfflineStore};

#[derive(Parser, Debug)]
#[command(
    name = "careers",
    version,
    about = "Explore careers by your top competencies or your course major"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, global = true, help = "Disable coloured output")]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Menu-driven exploration (the default)
    Interactive,
    /// Rank careers by exactly three competencies
    Competencies {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// List careers mapped to a course major
    Major {
        name: String,
        #[arg(long, help = "Only show matches scoring at least this much")]
        min_score: Option<f64>,
        #[arg(long, help = "Maximum number of careers to show")]
        limit: Option<usize>,
    },
    /// Show everything known about one occupation
    Job { code: String },
    /// Mapping coverage for both tables
    Stats,
    /// The competency and major lists
    List,
}

/// Builds the shared state the same way the web shell does, falling back to demo mode.
pub async fn connect_state(config: Config) -> AppState {
    let store: Arc<dyn CareerStore> = match store::connect(&config).await {
        Ok(store) => store,
        Err(e) => {
            warn!("Failed to initialize data backend, continuing in demo mode: {e:#}");
            Arc::new(OfflineStore)
        }
    };
    let status = store::probe(store.as_ref()).await;
    AppState::new(store, Catalog::builtin(), status, config)
}

pub async fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::from_env()?;
    let state = connect_state(config).await;

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            if cli.json {
                bail!("--json cannot be combined with interactive mode");
            }
            interactive::run(&state).await
        }
        Commands::Competencies { names } => {
            let selection = CompetencySelection::new(&names, &state.catalog)?;
            let jobs = state
                .competency
                .search(&selection, state.config.result_limit)
                .await?;
            if cli.json {
                print_json(&json!({ "success": true, "count": jobs.len(), "jobs": jobs }))
            } else {
                display::ranked_jobs(&format!("Careers matching: {}", selection.label()), &jobs);
                Ok(())
            }
        }
        Commands::Major {
            name,
            min_score,
            limit,
        } => {
            let major = state.catalog.validate_major(&name)?;
            let query = MajorQuery {
                min_score,
                max_results: limit.or(state.config.result_limit),
            };
            let jobs = state.majors.search(&major, query).await?;
            if cli.json {
                print_json(&json!({ "success": true, "count": jobs.len(), "jobs": jobs }))
            } else {
                display::major_jobs(&format!("Careers related to {major}"), &jobs);
                Ok(())
            }
        }
        Commands::Job { code } => {
            let Some(job) = state.jobs.lookup(code.trim()).await? else {
                bail!("Job '{}' not found", code.trim());
            };
            if cli.json {
                print_json(&json!({ "success": true, "job": job }))
            } else {
                display::job_detail(&job);
                Ok(())
            }
        }
        Commands::Stats => {
            let stats = matching::collect_stats(&state.store).await?;
            if cli.json {
                print_json(&stats)
            } else {
                display::stats(&stats);
                Ok(())
            }
        }
        Commands::List => {
            if cli.json {
                print_json(state.catalog.as_ref())
            } else {
                display::catalog(&state.catalog);
                Ok(())
            }
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["careers"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_major_flags_parse() {
        let cli = Cli::try_parse_from([
            "careers", "--json", "major", "Business", "--min-score", "40", "--limit", "5",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Some(Commands::Major {
                name,
                min_score,
                limit,
            }) => {
                assert_eq!(name, "Business");
                assert_eq!(min_score, Some(40.0));
                assert_eq!(limit, Some(5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_competencies_requires_names() {
        assert!(Cli::try_parse_from(["careers", "competencies"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["careers", "list", "--no-color"]).unwrap();
        assert!(cli.no_color);
        assert!(matches!(cli.command, Some(Commands::List)));
    }
}
