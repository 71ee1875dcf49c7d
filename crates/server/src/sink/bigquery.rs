//! BigQuery streaming inserts (`tabledata.insertAll`).
use async_trait::async_trait;
use ingest::ProcessedRecord;
use serde::{Deserialize, Serialize};

use super::{RecordSink, RowError, SinkError, TableRef};
use crate::config::BigQueryConfig;

/// Streams rows into one BigQuery table over the REST API.
pub struct BigQuerySink {
    client: reqwest::Client,
    table: TableRef,
    endpoint: String,
    access_token: Option<String>,
}

/// Request body for `tabledata.insertAll`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAllRequest<'a> {
    pub kind: &'static str,
    pub rows: Vec<InsertRow<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertRow<'a> {
    /// Best-effort dedup key on the BigQuery side; the order id is random
    /// per record, so distinct records never share one.
    pub insert_id: &'a str,
    pub json: &'a ProcessedRecord,
}

/// Response body for `tabledata.insertAll`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAllResponse {
    #[serde(default)]
    pub insert_errors: Vec<InsertErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub struct InsertErrorEntry {
    pub index: usize,
    #[serde(default)]
    pub errors: Vec<ErrorProto>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorProto {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

impl InsertAllResponse {
    /// Flattens BigQuery's nested error layout into one entry per problem.
    pub fn into_row_errors(self) -> Vec<RowError> {
        let mut out = Vec::new();
        for InsertErrorEntry { index, errors } in self.insert_errors {
            if errors.is_empty() {
                out.push(RowError {
                    index,
                    reason: "unknown".into(),
                    message: "row rejected without detail".into(),
                });
                continue;
            }
            out.extend(errors.into_iter().map(|e| RowError {
                index,
                reason: e.reason,
                message: e.message,
            }));
        }
        out
    }
}

impl BigQuerySink {
    pub fn new(table: TableRef, cfg: &BigQueryConfig) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder().timeout(cfg.timeout()).build()?;
        Ok(Self {
            client,
            table,
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
            access_token: cfg.access_token.clone(),
        })
    }

    /// Builds a sink from a `project.dataset.table` string.
    pub fn from_table_name(table: &str, cfg: &BigQueryConfig) -> Result<Self, SinkError> {
        Self::new(TableRef::parse(table)?, cfg)
    }

    pub fn insert_url(&self) -> String {
        format!(
            "{}/projects/{}/datasets/{}/tables/{}/insertAll",
            self.endpoint, self.table.project, self.table.dataset, self.table.table
        )
    }

    pub fn request_body<'a>(record: &'a ProcessedRecord) -> InsertAllRequest<'a> {
        InsertAllRequest {
            kind: "bigquery#tableDataInsertAllRequest",
            rows: vec![InsertRow {
                insert_id: record.order_id(),
                json: record,
            }],
        }
    }
}

#[async_trait]
impl RecordSink for BigQuerySink {
    fn destination(&self) -> String {
        self.table.to_string()
    }

    async fn insert(&self, record: &ProcessedRecord) -> Result<Vec<RowError>, SinkError> {
        let mut request = self
            .client
            .post(self.insert_url())
            .json(&Self::request_body(record));
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: InsertAllResponse = response.json().await?;
        Ok(parsed.into_row_errors())
    }
}
