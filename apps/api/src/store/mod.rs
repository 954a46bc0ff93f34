//! Data access. Every backend answers the same typed questions; callers never see
//! table plumbing, and a failed fetch is an `Err`, never an empty list.

pub mod memory;
pub mod offline;
pub mod postgres;
pub mod postgrest;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{BackendKind, Config};
use crate::models::{
    Commodity, CommodityKind, CompetencyScore, ElementRating, JobZone, MajorMapping, NaceMapping,
    Occupation, RatingKind, RelatedOccupation, TaskStatement, TitleKind,
};

pub use memory::{MemoryStore, Snapshot};
pub use offline::OfflineStore;
pub use postgres::PgStore;
pub use postgrest::PostgrestStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No data backend is configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Could not decode backend response: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Tables that can be counted for statistics and health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    OccupationData,
    JobNaceMappings,
    JobMajorMappings,
}

impl Table {
    pub fn as_str(self) -> &'static str {
        match self {
            Table::OccupationData => "occupation_data",
            Table::JobNaceMappings => "job_nace_mappings",
            Table::JobMajorMappings => "job_major_mappings",
        }
    }
}

/// Optional narrowing of a major search.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MajorFilter {
    /// Only rows with `match_score >= min_score`.
    pub min_score: Option<f64>,
    pub limit: Option<usize>,
}

/// Read-only access to the occupation catalog and its precomputed mappings.
///
/// Carried in `AppState` and the CLI as `Arc<dyn CareerStore>`.
#[async_trait]
pub trait CareerStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn count(&self, table: Table) -> Result<u64, StoreError>;

    async fn occupation(&self, code: &str) -> Result<Option<Occupation>, StoreError>;

    /// Mappings whose top-3 contains any of `competencies`, with occupation title and
    /// description filled in, ordered by first-slot score descending.
    async fn nace_mappings_matching(
        &self,
        competencies: &[String],
        limit: Option<usize>,
    ) -> Result<Vec<NaceMapping>, StoreError>;

    async fn nace_mapping(&self, code: &str) -> Result<Option<NaceMapping>, StoreError>;

    /// The occupation's full competency score list, score descending.
    async fn competency_scores(&self, code: &str) -> Result<Vec<CompetencyScore>, StoreError>;

    /// Occupations mapped to `major`, joined with occupation text, score descending.
    async fn major_mappings_for_major(
        &self,
        major: &str,
        filter: MajorFilter,
    ) -> Result<Vec<MajorMapping>, StoreError>;

    /// Every major mapped to one occupation, score descending.
    async fn major_mappings_for_job(&self, code: &str) -> Result<Vec<MajorMapping>, StoreError>;

    async fn job_zone(&self, code: &str) -> Result<Option<JobZone>, StoreError>;

    /// Top `limit` ratings of one kind, data value descending.
    async fn ratings(
        &self,
        code: &str,
        kind: RatingKind,
        limit: usize,
    ) -> Result<Vec<ElementRating>, StoreError>;

    /// Technology or tool examples with their UNSPSC commodity title, in stored order.
    async fn commodities(
        &self,
        code: &str,
        kind: CommodityKind,
        limit: usize,
    ) -> Result<Vec<Commodity>, StoreError>;

    /// Task statements, most incumbents responding first.
    async fn task_statements(&self, code: &str, limit: usize)
        -> Result<Vec<TaskStatement>, StoreError>;

    /// Related occupations with their titles, closest (lowest index) first.
    async fn related_occupations(
        &self,
        code: &str,
        limit: usize,
    ) -> Result<Vec<RelatedOccupation>, StoreError>;

    async fn titles(&self, code: &str, kind: TitleKind, limit: usize)
        -> Result<Vec<String>, StoreError>;
}

/// Builds the store named by the config. Construction failures (bad snapshot file,
/// unreachable Postgres) are returned; callers decide whether to fall back.
pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn CareerStore>> {
    let store: Arc<dyn CareerStore> = match &config.backend {
        BackendKind::Postgres { database_url } => {
            Arc::new(PgStore::connect(database_url, config.request_timeout_secs).await?)
        }
        BackendKind::Postgrest { url, secret_key } => Arc::new(PostgrestStore::new(
            url.clone(),
            secret_key.clone(),
            config.request_timeout_secs,
        )?),
        BackendKind::Snapshot { path } => Arc::new(MemoryStore::load(path)?),
        BackendKind::Offline => Arc::new(OfflineStore),
    };
    Ok(store)
}

/// Reachability as observed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Connected,
    Offline,
}

impl BackendStatus {
    pub fn is_connected(self) -> bool {
        matches!(self, BackendStatus::Connected)
    }
}

/// Connectivity check used by both shells to decide on demo mode.
pub async fn probe(store: &dyn CareerStore) -> BackendStatus {
    match store.ping().await {
        Ok(()) => {
            tracing::info!("Data backend '{}' reachable", store.backend());
            BackendStatus::Connected
        }
        Err(e) => {
            tracing::warn!("Data backend '{}' unavailable, running in demo mode: {e}", store.backend());
            BackendStatus::Offline
        }
    }
}
