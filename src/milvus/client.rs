use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{MAX_QUERY_LIMIT, MilvusError, QueryIterator, Record};
use crate::config::IndexConfig;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    collection_name: &'a str,
    filter: &'a str,
    output_fields: &'a [String],
    limit: usize,
}

#[derive(Deserialize)]
struct QueryResponse {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Vec<Record>>,
}

pub struct MilvusClient {
    http: Client,
    config: IndexConfig,
}

impl MilvusClient {
    pub fn new(config: IndexConfig) -> Self {
        Self { http: Client::new(), config }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// 执行一次标量查询
    pub async fn query(
        &self,
        filter: &str,
        output_fields: &[String],
        limit: usize,
    ) -> Result<Vec<Record>, MilvusError> {
        let url = format!("{}/v2/vectordb/entities/query", self.config.endpoint);
        debug!("query {} filter={:?} limit={}", self.config.collection, filter, limit);

        let request = QueryRequest {
            collection_name: &self.config.collection,
            filter,
            output_fields,
            limit,
        };
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<QueryResponse>()
            .await?;

        if response.code != 0 {
            return Err(MilvusError::Service {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }
        Ok(response.data.unwrap_or_default())
    }

    /// 创建一个按主键翻页的查询迭代器
    pub fn query_iterator(
        &self,
        batch_size: usize,
        filter: Option<String>,
        output_fields: Vec<String>,
    ) -> Result<QueryIterator<'_>, MilvusError> {
        if batch_size == 0 || batch_size > MAX_QUERY_LIMIT {
            return Err(MilvusError::InvalidBatchSize(batch_size));
        }
        Ok(QueryIterator::new(self, batch_size, filter, output_fields))
    }
}
