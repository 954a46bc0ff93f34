//! Client for the managed backend's REST interface (PostgREST over the O*NET schema).
//!
//! Filters are built through `RestQuery`, which quotes set-membership values
//! instead of splicing user strings into the filter grammar.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use super::{CareerStore, MajorFilter, StoreError, Table};
use crate::models::{
    Commodity, CommodityKind, CompetencyScore, ElementRating, JobZone, MajorMapping, NaceMapping,
    NaceMappingRow, Occupation, RatingKind, RelatedOccupation, TaskStatement, TitleKind,
};

const REST_PREFIX: &str = "/rest/v1";
const OCCUPATION_JOIN: &str = "occupation_data(title,description)";
const RELATED_JOIN: &str = "occupation_data!related_occupations_related_onetsoc_code_fkey(title,description)";

/// One PostgREST read: table plus ordered query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RestQuery {
    table: &'static str,
    params: Vec<(String, String)>,
}

impl RestQuery {
    pub fn from(table: &'static str) -> Self {
        Self {
            table,
            params: Vec::new(),
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".into(), columns.into()));
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.params.push((column.into(), format!("eq.{value}")));
        self
    }

    pub fn gte(mut self, column: &str, value: f64) -> Self {
        self.params.push((column.into(), format!("gte.{value}")));
        self
    }

    /// `col_1 IN (values) OR col_2 IN (values) ...`.
    pub fn any_in(mut self, columns: &[&str], values: &[String]) -> Self {
        let list = quote_list(values);
        let clauses: Vec<String> = columns
            .iter()
            .map(|c| format!("{c}.in.({list})"))
            .collect();
        self.params
            .push(("or".into(), format!("({})", clauses.join(","))));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.params.push(("order".into(), format!("{column}.desc")));
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.params.push(("order".into(), format!("{column}.asc")));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.params.push(("limit".into(), n.to_string()));
        self
    }

    pub fn limit_opt(self, n: Option<usize>) -> Self {
        match n {
            Some(n) => self.limit(n),
            None => self,
        }
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Double-quotes each value so commas, parentheses and dots inside names stay literal.
fn quote_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Deserialize)]
struct OccupationRef {
    title: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NaceMappingWire {
    #[serde(flatten)]
    row: NaceMappingRow,
    #[serde(default)]
    occupation_data: Option<OccupationRef>,
}

impl From<NaceMappingWire> for NaceMapping {
    fn from(wire: NaceMappingWire) -> Self {
        let mut mapping = NaceMapping::from(wire.row);
        if let Some(o) = wire.occupation_data {
            mapping.title = Some(o.title);
            mapping.description = o.description;
        }
        mapping
    }
}

#[derive(Debug, Deserialize)]
struct MajorMappingWire {
    #[serde(flatten)]
    row: MajorMapping,
    #[serde(default)]
    occupation_data: Option<OccupationRef>,
}

impl From<MajorMappingWire> for MajorMapping {
    fn from(wire: MajorMappingWire) -> Self {
        let mut row = wire.row;
        if let Some(o) = wire.occupation_data {
            row.title = Some(o.title);
            row.description = o.description;
        }
        row
    }
}

#[derive(Debug, Deserialize)]
struct ElementRef {
    element_name: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RatingWire {
    #[serde(default)]
    data_value: Option<f64>,
    #[serde(default)]
    content_model_reference: Option<ElementRef>,
}

#[derive(Debug, Deserialize)]
struct UnspscRef {
    #[serde(default)]
    commodity_title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommodityWire {
    example: String,
    #[serde(default)]
    unspsc_reference: Option<UnspscRef>,
}

impl From<CommodityWire> for Commodity {
    fn from(wire: CommodityWire) -> Self {
        Commodity {
            example: wire.example,
            commodity_title: wire.unspsc_reference.and_then(|u| u.commodity_title),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RelatedWire {
    #[serde(flatten)]
    row: RelatedOccupation,
    #[serde(default)]
    occupation_data: Option<OccupationRef>,
}

impl From<RelatedWire> for RelatedOccupation {
    fn from(wire: RelatedWire) -> Self {
        let mut row = wire.row;
        if let Some(o) = wire.occupation_data {
            row.title = Some(o.title);
        }
        row
    }
}

#[derive(Debug, Deserialize)]
struct JobZoneWire {
    #[serde(default)]
    job_zone_reference: Option<JobZone>,
}

#[derive(Debug, Deserialize)]
struct RestErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    base_url: String,
    secret_key: String,
}

impl PostgrestStore {
    pub fn new(base_url: String, secret_key: String, timeout_secs: u64) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()?,
            base_url,
            secret_key,
        })
    }

    fn request(&self, method: reqwest::Method, query: &RestQuery) -> RequestBuilder {
        let url = format!("{}{REST_PREFIX}/{}", self.base_url, query.table);
        self.client
            .request(method, url)
            .header("apikey", &self.secret_key)
            .bearer_auth(&self.secret_key)
            .query(query.params())
    }

    async fn fetch<T: DeserializeOwned>(&self, query: RestQuery) -> Result<Vec<T>, StoreError> {
        debug!("GET {} {:?}", query.table, query.params());
        let response = self.request(reqwest::Method::GET, &query).send().await?;
        let response = check_status(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| StoreError::Decode(format!("{}: {e}", query.table)))
    }

    async fn fetch_one<T: DeserializeOwned>(&self, query: RestQuery) -> Result<Option<T>, StoreError> {
        Ok(self.fetch(query.limit(1)).await?.into_iter().next())
    }
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<RestErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body);
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Total from a `Content-Range` header such as `0-24/3210` or `*/3210`.
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

#[async_trait]
impl CareerStore for PostgrestStore {
    fn backend(&self) -> &'static str {
        "postgrest"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.fetch::<serde_json::Value>(
            RestQuery::from(Table::OccupationData.as_str())
                .select("onetsoc_code")
                .limit(1),
        )
        .await
        .map(|_| ())
    }

    async fn count(&self, table: Table) -> Result<u64, StoreError> {
        let query = RestQuery::from(table.as_str()).select("*");
        let response = self
            .request(reqwest::Method::HEAD, &query)
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = check_status(response).await?;
        response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| StoreError::Decode(format!("{}: missing Content-Range total", table.as_str())))
    }

    async fn occupation(&self, code: &str) -> Result<Option<Occupation>, StoreError> {
        self.fetch_one(
            RestQuery::from(Table::OccupationData.as_str())
                .select("onetsoc_code,title,description")
                .eq("onetsoc_code", code),
        )
        .await
    }

    async fn nace_mappings_matching(
        &self,
        competencies: &[String],
        limit: Option<usize>,
    ) -> Result<Vec<NaceMapping>, StoreError> {
        let query = RestQuery::from(Table::JobNaceMappings.as_str())
            .select(&format!("*,{OCCUPATION_JOIN}"))
            .any_in(&["competency_1", "competency_2", "competency_3"], competencies)
            .order_desc("competency_1_score")
            .limit_opt(limit);
        let rows: Vec<NaceMappingWire> = self.fetch(query).await?;
        Ok(rows.into_iter().map(NaceMapping::from).collect())
    }

    async fn nace_mapping(&self, code: &str) -> Result<Option<NaceMapping>, StoreError> {
        let row: Option<NaceMappingRow> = self
            .fetch_one(
                RestQuery::from(Table::JobNaceMappings.as_str())
                    .select("*")
                    .eq("onetsoc_code", code),
            )
            .await?;
        Ok(row.map(NaceMapping::from))
    }

    async fn competency_scores(&self, code: &str) -> Result<Vec<CompetencyScore>, StoreError> {
        self.fetch(
            RestQuery::from("job_competency_scores")
                .select("onetsoc_code,competency_name,score")
                .eq("onetsoc_code", code)
                .order_desc("score"),
        )
        .await
    }

    async fn major_mappings_for_major(
        &self,
        major: &str,
        filter: MajorFilter,
    ) -> Result<Vec<MajorMapping>, StoreError> {
        let mut query = RestQuery::from(Table::JobMajorMappings.as_str())
            .select(&format!("onetsoc_code,major_name,match_score,{OCCUPATION_JOIN}"))
            .eq("major_name", major);
        if let Some(min) = filter.min_score {
            query = query.gte("match_score", min);
        }
        let query = query.order_desc("match_score").limit_opt(filter.limit);
        let rows: Vec<MajorMappingWire> = self.fetch(query).await?;
        Ok(rows.into_iter().map(MajorMapping::from).collect())
    }

    async fn major_mappings_for_job(&self, code: &str) -> Result<Vec<MajorMapping>, StoreError> {
        self.fetch(
            RestQuery::from(Table::JobMajorMappings.as_str())
                .select("onetsoc_code,major_name,match_score")
                .eq("onetsoc_code", code)
                .order_desc("match_score"),
        )
        .await
    }

    async fn job_zone(&self, code: &str) -> Result<Option<JobZone>, StoreError> {
        let row: Option<JobZoneWire> = self
            .fetch_one(
                RestQuery::from("job_zones")
                    .select("job_zone_reference(name,experience,education,job_training,examples,svp_range)")
                    .eq("onetsoc_code", code),
            )
            .await?;
        Ok(row.and_then(|r| r.job_zone_reference))
    }

    async fn ratings(
        &self,
        code: &str,
        kind: RatingKind,
        limit: usize,
    ) -> Result<Vec<ElementRating>, StoreError> {
        let rows: Vec<RatingWire> = self
            .fetch(
                RestQuery::from(kind.table())
                    .select("data_value,content_model_reference(element_name,description)")
                    .eq("onetsoc_code", code)
                    .order_desc("data_value")
                    .limit(limit),
            )
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|r| {
                let element = r.content_model_reference?;
                Some(ElementRating {
                    element_name: element.element_name,
                    description: element.description,
                    data_value: r.data_value,
                })
            })
            .collect())
    }

    async fn commodities(
        &self,
        code: &str,
        kind: CommodityKind,
        limit: usize,
    ) -> Result<Vec<Commodity>, StoreError> {
        let rows: Vec<CommodityWire> = self
            .fetch(
                RestQuery::from(kind.table())
                    .select("example,unspsc_reference(commodity_title)")
                    .eq("onetsoc_code", code)
                    .limit(limit),
            )
            .await?;
        Ok(rows.into_iter().map(Commodity::from).collect())
    }

    async fn task_statements(
        &self,
        code: &str,
        limit: usize,
    ) -> Result<Vec<TaskStatement>, StoreError> {
        self.fetch(
            RestQuery::from("task_statements")
                .select("task,task_type,incumbents_responding")
                .eq("onetsoc_code", code)
                .order_desc("incumbents_responding")
                .limit(limit),
        )
        .await
    }

    async fn related_occupations(
        &self,
        code: &str,
        limit: usize,
    ) -> Result<Vec<RelatedOccupation>, StoreError> {
        let rows: Vec<RelatedWire> = self
            .fetch(
                RestQuery::from("related_occupations")
                    .select(&format!(
                        "related_onetsoc_code,relatedness_tier,related_index,{RELATED_JOIN}"
                    ))
                    .eq("onetsoc_code", code)
                    .order_asc("related_index")
                    .limit(limit),
            )
            .await?;
        Ok(rows.into_iter().map(RelatedOccupation::from).collect())
    }

    async fn titles(
        &self,
        code: &str,
        kind: TitleKind,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        let rows: Vec<serde_json::Value> = self
            .fetch(
                RestQuery::from(kind.table())
                    .select(kind.column())
                    .eq("onetsoc_code", code)
                    .limit(limit),
            )
            .await?;
        Ok(title_column(rows, kind))
    }
}

/// Pulls the title column out of each row, skipping nulls.
fn title_column(rows: Vec<serde_json::Value>, kind: TitleKind) -> Vec<String> {
    rows.into_iter()
        .filter_map(|row| row.get(kind.column())?.as_str().map(str::to_owned))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_any_in_quotes_every_value() {
        let query = RestQuery::from("job_nace_mappings").any_in(
            &["competency_1", "competency_2"],
            &names(&["Career & Self-Development", "Teamwork"]),
        );
        assert_eq!(
            query.params(),
            [(
                "or".to_string(),
                "(competency_1.in.(\"Career & Self-Development\",\"Teamwork\"),competency_2.in.(\"Career & Self-Development\",\"Teamwork\"))"
                    .to_string()
            )]
        );
    }

    #[test]
    fn test_quote_list_escapes_quotes_and_backslashes() {
        assert_eq!(quote_list(&names(&[r#"a"b\c"#])), r#""a\"b\\c""#);
    }

    #[test]
    fn test_builder_keeps_parameter_order() {
        let query = RestQuery::from("job_major_mappings")
            .select("*")
            .eq("major_name", "Business")
            .gte("match_score", 20.0)
            .order_desc("match_score")
            .limit_opt(Some(5));
        let keys: Vec<&str> = query.params().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["select", "major_name", "match_score", "order", "limit"]);
        assert_eq!(query.params()[1].1, "eq.Business");
        assert_eq!(query.params()[2].1, "gte.20");
        assert_eq!(query.params()[3].1, "match_score.desc");
    }

    #[test]
    fn test_limit_opt_none_adds_nothing() {
        assert!(RestQuery::from("t").limit_opt(None).params().is_empty());
    }

    #[test]
    fn test_content_range_total() {
        assert_eq!(parse_content_range_total("0-24/1016"), Some(1016));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("*/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }

    #[test]
    fn test_nace_wire_takes_title_from_join() {
        let wire: NaceMappingWire = serde_json::from_value(json!({
            "onetsoc_code": "15-1252.00",
            "competency_1": "Technology", "competency_1_score": 92.0,
            "competency_2": "Critical Thinking", "competency_2_score": 81.0,
            "competency_3": "Teamwork", "competency_3_score": 64.0,
            "occupation_data": {"title": "Software Developers", "description": "Research, design, and develop software."}
        }))
        .unwrap();
        let mapping = NaceMapping::from(wire);
        assert_eq!(mapping.title.as_deref(), Some("Software Developers"));
        assert_eq!(mapping.slots[2].competency, "Teamwork");
    }

    #[test]
    fn test_related_wire_takes_title_from_join() {
        let wire: RelatedWire = serde_json::from_value(json!({
            "related_onetsoc_code": "15-1253.00",
            "relatedness_tier": "Primary-Short",
            "related_index": 1,
            "occupation_data": {"title": "Software Quality Assurance Analysts and Testers"}
        }))
        .unwrap();
        let row = RelatedOccupation::from(wire);
        assert_eq!(row.title.as_deref(), Some("Software Quality Assurance Analysts and Testers"));
        assert_eq!(row.related_index, Some(1));
    }

    #[test]
    fn test_commodity_wire_flattens_unspsc_title() {
        let wire: CommodityWire = serde_json::from_value(json!({
            "example": "Git",
            "unspsc_reference": {"commodity_title": "Configuration management software"}
        }))
        .unwrap();
        let item = Commodity::from(wire);
        assert_eq!(item.example, "Git");
        assert_eq!(item.commodity_title.as_deref(), Some("Configuration management software"));
    }

    #[test]
    fn test_title_column_reads_kind_column() {
        let rows = vec![
            json!({"reported_job_title": "Software Engineer"}),
            json!({"reported_job_title": null}),
        ];
        assert_eq!(title_column(rows, TitleKind::Sample), ["Software Engineer"]);
    }

    #[test]
    fn test_order_asc() {
        let query = RestQuery::from("related_occupations").order_asc("related_index");
        assert_eq!(query.params()[0].1, "related_index.asc");
    }

    #[test]
    fn test_major_wire_without_join_keeps_placeholders() {
        let wire: MajorMappingWire = serde_json::from_value(json!({
            "onetsoc_code": "11-1021.00",
            "major_name": "Business",
            "match_score": 88.0,
            "occupation_data": null
        }))
        .unwrap();
        let row = MajorMapping::from(wire);
        assert_eq!(row.title_or_default(), "Unknown Title");
        assert_eq!(row.match_score, 88.0);
    }
}
