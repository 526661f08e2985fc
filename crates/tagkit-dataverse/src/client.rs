//! Dataverse Web API client implementing the tagkit repository traits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use tagkit_core::{
    Error, PolicyKey, PolicyRow, RecordRef, RecordTagRepository, Result, SchemaNames,
    TagDefinitionRepository, TagPolicyRepository,
};

use crate::config::DataverseConfig;
use crate::error::{error_message, from_status};
use crate::odata::{entity_set_name, similar_name_filter};

/// Upper bound on followed `@odata.nextLink` pages for one query.
const MAX_PAGES: usize = 200;

type Row = Map<String, Value>;

/// One page of an OData collection response.
#[derive(Debug, Deserialize)]
struct Collection {
    #[serde(default)]
    value: Vec<Row>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

/// Dataverse Web API client.
pub struct DataverseClient {
    client: Client,
    config: DataverseConfig,
}

impl DataverseClient {
    /// Create a client with the given configuration.
    pub fn new(config: DataverseConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "dataverse",
            api_root = %config.api_root(),
            schema_prefix = config.schema.prefix(),
            "Initializing Dataverse client"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(DataverseConfig::from_env()?)
    }

    pub fn config(&self) -> &DataverseConfig {
        &self.config
    }

    pub fn schema(&self) -> &SchemaNames {
        &self.config.schema
    }

    fn collection_url(&self, logical_name: &str) -> String {
        format!("{}/{}", self.config.api_root(), entity_set_name(logical_name))
    }

    fn record_url(&self, record: &RecordRef) -> String {
        // Grid selections arrive as `{GUID}`; the URL key takes the bare value.
        let id = record.id.trim().trim_start_matches('{').trim_end_matches('}');
        format!(
            "{}({})",
            self.collection_url(&record.entity),
            urlencoding::encode(id)
        )
    }

    /// Build a request carrying auth and OData headers.
    fn build_request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut req = self
            .client
            .request(method, url)
            .header("Accept", "application/json")
            .header("OData-MaxVersion", "4.0")
            .header("OData-Version", "4.0");

        if let Some(ref token) = self.config.token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        req
    }

    /// Send a request, mapping non-success statuses to errors.
    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let response = req.send().await?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(from_status(status, &error_message(&body)))
    }

    /// Fetch every row of a collection query, following server paging.
    async fn get_rows(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        let first = self.build_request(Method::GET, url).query(query);
        let mut page: Collection = self.send(first).await?.json().await?;

        for _ in 0..MAX_PAGES {
            rows.append(&mut page.value);
            let Some(next) = page.next_link.take() else {
                return Ok(rows);
            };
            debug!(subsystem = "dataverse", next_link = %next, "Following next page");
            page = self
                .send(self.build_request(Method::GET, &next))
                .await?
                .json()
                .await?;
        }

        Err(Error::Remote {
            status: 200,
            message: format!("More than {} pages returned for {}", MAX_PAGES, url),
        })
    }
}

fn string_field(row: &Row, field: &str) -> Option<String> {
    row.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Interpret a creation flag stored as a boolean or as a choice value of 1.
fn flag_value(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::String(s)) => s == "1" || s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn key_value(value: Option<&Value>) -> Option<u32> {
    match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Pull the record id out of an `OData-EntityId` header value such as
/// `https://org/api/data/v9.2/evergrn_tagdefinitions(0000-...)`.
fn id_from_entity_uri(uri: &str) -> Option<String> {
    let start = uri.rfind('(')? + 1;
    let end = uri[start..].find(')')? + start;
    let id = &uri[start..end];
    (!id.is_empty()).then(|| id.to_string())
}

#[async_trait]
impl TagDefinitionRepository for DataverseClient {
    async fn list_tag_definitions(&self) -> Result<Vec<String>> {
        let field = self.schema().tag_name_field();
        let url = self.collection_url(&self.schema().tag_definition_entity());

        let rows = self.get_rows(&url, &[("$select", field.clone())]).await?;
        let names: Vec<String> = rows.iter().filter_map(|r| string_field(r, &field)).collect();

        debug!(
            subsystem = "dataverse",
            op = "list_tag_definitions",
            result_count = names.len(),
            "Listed tag definitions"
        );
        Ok(names)
    }

    async fn find_tag_definitions(&self, candidate: &str) -> Result<Vec<String>> {
        let field = self.schema().tag_name_field();
        let url = self.collection_url(&self.schema().tag_definition_entity());
        let query = [
            ("$select", field.clone()),
            ("$filter", similar_name_filter(&field, candidate)),
        ];

        let rows = self.get_rows(&url, &query).await?;
        Ok(rows.iter().filter_map(|r| string_field(r, &field)).collect())
    }

    async fn create_tag_definition(&self, name: &str) -> Result<String> {
        let schema = self.schema();
        let url = self.collection_url(&schema.tag_definition_entity());
        let mut body = Map::new();
        body.insert(schema.tag_name_field(), Value::String(name.to_string()));

        let response = self
            .send(self.build_request(Method::POST, &url).json(&body))
            .await?;

        let from_header = response
            .headers()
            .get("OData-EntityId")
            .and_then(|v| v.to_str().ok())
            .and_then(id_from_entity_uri);
        if let Some(id) = from_header {
            info!(subsystem = "dataverse", op = "create_tag_definition", tag = name, id = %id, "Created tag definition");
            return Ok(id);
        }

        // Servers honoring `Prefer: return=representation` answer with the row.
        let text = response.text().await?;
        let row: Row = serde_json::from_str(&text).unwrap_or_default();
        string_field(&row, &schema.tag_definition_id_field()).ok_or_else(|| {
            Error::Serialization("Create response carried no tag definition id".to_string())
        })
    }
}

#[async_trait]
impl TagPolicyRepository for DataverseClient {
    async fn list_tag_policies(&self, key: PolicyKey) -> Result<Vec<PolicyRow>> {
        let schema = self.schema();
        let entity_field = schema.policy_entity_field();
        let allow_field = schema.policy_allow_field();
        let url = self.collection_url(&schema.tag_settings_entity());
        let query = [
            ("$select", format!("{},{}", entity_field, allow_field)),
            ("$filter", format!("{} eq {}", entity_field, key)),
        ];

        let rows = self.get_rows(&url, &query).await?;
        Ok(rows
            .iter()
            .map(|row| PolicyRow {
                entity_key: key_value(row.get(&entity_field)).unwrap_or(key.0),
                allow_tag_creation: flag_value(row.get(&allow_field)),
            })
            .collect())
    }
}

#[async_trait]
impl RecordTagRepository for DataverseClient {
    async fn get_tag_field(&self, record: &RecordRef) -> Result<Option<String>> {
        let field = self.schema().tags_field();
        let req = self
            .build_request(Method::GET, &self.record_url(record))
            .query(&[("$select", field.as_str())]);

        let row: Row = self.send(req).await?.json().await?;
        Ok(string_field(&row, &field))
    }

    async fn update_tag_field(&self, record: &RecordRef, value: &str) -> Result<()> {
        let mut body = Map::new();
        body.insert(self.schema().tags_field(), Value::String(value.to_string()));

        // If-Match keeps PATCH from recreating a record deleted mid-batch.
        let req = self
            .build_request(Method::PATCH, &self.record_url(record))
            .header("If-Match", "*")
            .json(&body);
        self.send(req).await?;

        debug!(subsystem = "dataverse", op = "update_tag_field", record = %record, "Updated tag field");
        Ok(())
    }
}
