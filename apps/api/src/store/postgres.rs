//! Direct Postgres access to the same schema the REST backend exposes.
//! Scores are cast to `float8` in SQL so every row decodes into `f64`.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use super::{CareerStore, MajorFilter, StoreError, Table};
use crate::models::{
    Commodity, CommodityKind, CompetencyScore, ElementRating, JobZone, MajorMapping, NaceMapping,
    NaceMappingRow, Occupation, RatingKind, RelatedOccupation, TaskStatement, TitleKind,
};

const NACE_COLUMNS: &str = r#"
    m.onetsoc_code,
    m.competency_1, m.competency_1_score::float8 AS competency_1_score,
    m.competency_2, m.competency_2_score::float8 AS competency_2_score,
    m.competency_3, m.competency_3_score::float8 AS competency_3_score
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a small pool. The app only reads, so a handful of connections is plenty.
    pub async fn connect(database_url: &str, acquire_timeout_secs: u64) -> Result<Self, StoreError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .connect(database_url)
            .await?;
        info!("PostgreSQL pool ready");
        Ok(Self::new(pool))
    }
}

/// `LIMIT NULL` is "no limit" in Postgres.
fn sql_limit(limit: Option<usize>) -> Option<i64> {
    limit.map(|n| n as i64)
}

#[async_trait]
impl CareerStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT onetsoc_code FROM occupation_data LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self, table: Table) -> Result<u64, StoreError> {
        // Table names come from a closed enum, never from input.
        let sql = format!("SELECT COUNT(*) FROM {}", table.as_str());
        let (n,): (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;
        Ok(n.max(0) as u64)
    }

    async fn occupation(&self, code: &str) -> Result<Option<Occupation>, StoreError> {
        let row = sqlx::query_as::<_, Occupation>(
            "SELECT onetsoc_code, title, description FROM occupation_data WHERE onetsoc_code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn nace_mappings_matching(
        &self,
        competencies: &[String],
        limit: Option<usize>,
    ) -> Result<Vec<NaceMapping>, StoreError> {
        let sql = format!(
            r#"
            SELECT {NACE_COLUMNS}, o.title, o.description
            FROM job_nace_mappings m
            LEFT JOIN occupation_data o ON o.onetsoc_code = m.onetsoc_code
            WHERE m.competency_1 = ANY($1)
               OR m.competency_2 = ANY($1)
               OR m.competency_3 = ANY($1)
            ORDER BY m.competency_1_score DESC NULLS LAST
            LIMIT $2
            "#
        );
        let rows = sqlx::query_as::<_, NaceMappingRow>(&sql)
            .bind(competencies)
            .bind(sql_limit(limit))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(NaceMapping::from).collect())
    }

    async fn nace_mapping(&self, code: &str) -> Result<Option<NaceMapping>, StoreError> {
        let sql = format!(
            r#"
            SELECT {NACE_COLUMNS}, NULL::text AS title, NULL::text AS description
            FROM job_nace_mappings m
            WHERE m.onetsoc_code = $1
            LIMIT 1
            "#
        );
        let row = sqlx::query_as::<_, NaceMappingRow>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(NaceMapping::from))
    }

    async fn competency_scores(&self, code: &str) -> Result<Vec<CompetencyScore>, StoreError> {
        let rows = sqlx::query_as::<_, CompetencyScore>(
            r#"
            SELECT onetsoc_code, competency_name, COALESCE(score, 0)::float8 AS score
            FROM job_competency_scores
            WHERE onetsoc_code = $1
            ORDER BY score DESC NULLS LAST
            "#,
        )
        .bind(code)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn major_mappings_for_major(
        &self,
        major: &str,
        filter: MajorFilter,
    ) -> Result<Vec<MajorMapping>, StoreError> {
        let rows = sqlx::query_as::<_, MajorMapping>(
            r#"
            SELECT m.onetsoc_code, m.major_name,
                   COALESCE(m.match_score, 0)::float8 AS match_score,
                   o.title, o.description
            FROM job_major_mappings m
            LEFT JOIN occupation_data o ON o.onetsoc_code = m.onetsoc_code
            WHERE m.major_name = $1
              AND ($2::float8 IS NULL OR m.match_score >= $2)
            ORDER BY m.match_score DESC NULLS LAST
            LIMIT $3
            "#,
        )
        .bind(major)
        .bind(filter.min_score)
        .bind(sql_limit(filter.limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn major_mappings_for_job(&self, code: &str) -> Result<Vec<MajorMapping>, StoreError> {
        let rows = sqlx::query_as::<_, MajorMapping>(
            r#"
            SELECT onetsoc_code, major_name,
                   COALESCE(match_score, 0)::float8 AS match_score,
                   NULL::text AS title, NULL::text AS description
            FROM job_major_mappings
            WHERE onetsoc_code = $1
            ORDER BY match_score DESC NULLS LAST
            "#,
        )
        .bind(code)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn job_zone(&self, code: &str) -> Result<Option<JobZone>, StoreError> {
        let row = sqlx::query_as::<_, JobZone>(
            r#"
            SELECT r.name, r.experience, r.education, r.job_training, r.examples, r.svp_range
            FROM job_zones z
            JOIN job_zone_reference r ON r.job_zone = z.job_zone
            WHERE z.onetsoc_code = $1
            LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn ratings(
        &self,
        code: &str,
        kind: RatingKind,
        limit: usize,
    ) -> Result<Vec<ElementRating>, StoreError> {
        let sql = format!(
            r#"
            SELECT c.element_name, c.description, r.data_value::float8 AS data_value
            FROM {table} r
            JOIN content_model_reference c ON c.element_id = r.element_id
            WHERE r.onetsoc_code = $1
            ORDER BY r.data_value DESC NULLS LAST
            LIMIT $2
            "#,
            table = kind.table()
        );
        let rows = sqlx::query_as::<_, ElementRating>(&sql)
            .bind(code)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn commodities(
        &self,
        code: &str,
        kind: CommodityKind,
        limit: usize,
    ) -> Result<Vec<Commodity>, StoreError> {
        let sql = format!(
            r#"
            SELECT t.example, u.commodity_title
            FROM {table} t
            LEFT JOIN unspsc_reference u ON u.commodity_code = t.commodity_code
            WHERE t.onetsoc_code = $1
            LIMIT $2
            "#,
            table = kind.table()
        );
        let rows = sqlx::query_as::<_, Commodity>(&sql)
            .bind(code)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn task_statements(
        &self,
        code: &str,
        limit: usize,
    ) -> Result<Vec<TaskStatement>, StoreError> {
        let rows = sqlx::query_as::<_, TaskStatement>(
            r#"
            SELECT task, task_type, incumbents_responding::float8 AS incumbents_responding
            FROM task_statements
            WHERE onetsoc_code = $1
            ORDER BY incumbents_responding DESC NULLS LAST
            LIMIT $2
            "#,
        )
        .bind(code)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn related_occupations(
        &self,
        code: &str,
        limit: usize,
    ) -> Result<Vec<RelatedOccupation>, StoreError> {
        let rows = sqlx::query_as::<_, RelatedOccupation>(
            r#"
            SELECT r.related_onetsoc_code, o.title, r.relatedness_tier,
                   r.related_index::int8 AS related_index
            FROM related_occupations r
            LEFT JOIN occupation_data o ON o.onetsoc_code = r.related_onetsoc_code
            WHERE r.onetsoc_code = $1
            ORDER BY r.related_index ASC NULLS LAST
            LIMIT $2
            "#,
        )
        .bind(code)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn titles(
        &self,
        code: &str,
        kind: TitleKind,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        let sql = format!(
            "SELECT {column} FROM {table} WHERE onetsoc_code = $1 LIMIT $2",
            column = kind.column(),
            table = kind.table()
        );
        let rows = sqlx::query_scalar::<_, String>(&sql)
            .bind(code)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
