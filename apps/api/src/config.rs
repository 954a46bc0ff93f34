use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Which data backend the process talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    /// Direct Postgres connection via `DATABASE_URL`.
    Postgres { database_url: String },
    /// The managed REST API in front of the same schema.
    Postgrest { url: String, secret_key: String },
    /// A JSON snapshot loaded into memory.
    Snapshot { path: PathBuf },
    /// Nothing configured; the shells run in demo mode.
    Offline,
}

impl BackendKind {
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::Postgres { .. } => "postgres",
            BackendKind::Postgrest { .. } => "postgrest",
            BackendKind::Snapshot { .. } => "snapshot",
            BackendKind::Offline => "offline",
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every backend variable is optional; a missing backend means demo mode, not a crash.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendKind,
    pub port: u16,
    pub rust_log: String,
    pub request_timeout_secs: u64,
    /// Cap on search results. `None` returns every match.
    pub result_limit: Option<usize>,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = resolve_backend(&get)?;

        Ok(Config {
            backend,
            port: get("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            request_timeout_secs: get("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            result_limit: get("RESULT_LIMIT")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("RESULT_LIMIT must be a positive integer")?
                .filter(|n| *n > 0),
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/public"))),
        })
    }
}

fn resolve_backend<G>(get: &G) -> Result<BackendKind>
where
    G: Fn(&str) -> Option<String>,
{
    if let Some(database_url) = get("DATABASE_URL") {
        return Ok(BackendKind::Postgres { database_url });
    }

    // New-style secret key first, legacy service-role key second.
    let secret_key = get("SUPABASE_SECRET_KEY").or_else(|| get("SUPABASE_SERVICE_ROLE_KEY"));
    match (get("SUPABASE_URL"), secret_key) {
        (Some(url), Some(secret_key)) => {
            return Ok(BackendKind::Postgrest {
                url: url.trim_end_matches('/').to_string(),
                secret_key,
            })
        }
        (Some(_), None) => {
            bail!("SUPABASE_URL is set but neither SUPABASE_SECRET_KEY nor SUPABASE_SERVICE_ROLE_KEY is")
        }
        (None, Some(_)) => bail!("A Supabase key is set but SUPABASE_URL is not"),
        (None, None) => {}
    }

    if let Some(path) = get("CAREERS_SNAPSHOT") {
        return Ok(BackendKind::Snapshot {
            path: PathBuf::from(path),
        });
    }

    Ok(BackendKind::Offline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_are_offline_on_port_3000() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.backend, BackendKind::Offline);
        assert_eq!(config.port, 3000);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.result_limit, None);
    }

    #[test]
    fn test_database_url_wins_over_supabase() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/onet"),
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_SECRET_KEY", "sb_secret"),
        ])
        .unwrap();
        assert_eq!(config.backend.label(), "postgres");
    }

    #[test]
    fn test_legacy_service_role_key_is_accepted() {
        let config = config_from(&[
            ("SUPABASE_URL", "https://x.supabase.co/"),
            ("SUPABASE_SERVICE_ROLE_KEY", "legacy-jwt"),
        ])
        .unwrap();
        assert_eq!(
            config.backend,
            BackendKind::Postgrest {
                url: "https://x.supabase.co".to_string(),
                secret_key: "legacy-jwt".to_string(),
            }
        );
    }

    #[test]
    fn test_url_without_key_is_an_error() {
        let err = config_from(&[("SUPABASE_URL", "https://x.supabase.co")]).unwrap_err();
        assert!(err.to_string().contains("SUPABASE_SECRET_KEY"));
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = config_from(&[("DATABASE_URL", "  "), ("CAREERS_SNAPSHOT", "data.json")]).unwrap();
        assert_eq!(config.backend.label(), "snapshot");
    }

    #[test]
    fn test_bad_port_is_rejected() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
    }

    #[test]
    fn test_result_limit_zero_means_unlimited() {
        let config = config_from(&[("RESULT_LIMIT", "0")]).unwrap();
        assert_eq!(config.result_limit, None);
        let config = config_from(&[("RESULT_LIMIT", "25")]).unwrap();
        assert_eq!(config.result_limit, Some(25));
    }
}
