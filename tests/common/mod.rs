#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Map, Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use tokio::net::TcpListener;

pub const TOKEN: &str = "secret";

/// 模拟向量数据库的查询接口，只支持 `pk > N` 形式的过滤条件
pub struct FakeIndex {
    pub primary_key: String,
    pub records: Vec<Map<String, Value>>,
    pub filters: Mutex<Vec<String>>,
    pub fail_status: Option<StatusCode>,
}

impl FakeIndex {
    /// 用 uid 列表构造整数主键的集合
    pub fn with_uids(uids: &[&str]) -> Self {
        let records = uids
            .iter()
            .enumerate()
            .map(|(i, uid)| {
                json!({"id": i as i64 + 1, "block_uid": uid, "embedding": [0.1, 0.2]})
                    .as_object()
                    .cloned()
                    .unwrap()
            })
            .collect();
        Self { primary_key: "id".to_string(), records, filters: Mutex::new(vec![]), fail_status: None }
    }

    /// 用 uid 本身作为字符串主键
    pub fn with_string_keys(uids: &[&str]) -> Self {
        let mut records: Vec<Map<String, Value>> = uids
            .iter()
            .map(|uid| json!({"block_uid": uid}).as_object().cloned().unwrap())
            .collect();
        records.sort_by(|a, b| a["block_uid"].as_str().cmp(&b["block_uid"].as_str()));
        Self {
            primary_key: "block_uid".to_string(),
            records,
            filters: Mutex::new(vec![]),
            fail_status: None,
        }
    }

    pub fn filters(&self) -> Vec<String> {
        self.filters.lock().unwrap().clone()
    }

    fn after(&self, filter: &str) -> Vec<&Map<String, Value>> {
        let prefix = format!("{} > ", self.primary_key);
        let bound = filter.strip_prefix(&prefix).map(str::trim);
        self.records
            .iter()
            .filter(|record| {
                let Some(bound) = bound else { return true };
                match &record[&self.primary_key] {
                    Value::Number(n) => n.as_i64().unwrap() > bound.parse::<i64>().unwrap(),
                    Value::String(s) => s.as_str() > bound.trim_matches('"'),
                    _ => false,
                }
            })
            .collect()
    }
}

async fn query(
    State(index): State<Arc<FakeIndex>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(status) = index.fail_status {
        return (status, "unavailable").into_response();
    }
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"));
    if !authorized {
        return Json(json!({"code": 80001, "message": "invalid token"})).into_response();
    }

    let filter = body["filter"].as_str().unwrap_or_default().to_string();
    let limit = body["limit"].as_u64().unwrap_or(100) as usize;
    let fields: Vec<String> = body["outputFields"]
        .as_array()
        .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default();
    index.filters.lock().unwrap().push(filter.clone());

    let data: Vec<Value> = index
        .after(&filter)
        .into_iter()
        .take(limit)
        .map(|record| {
            let projected: Map<String, Value> = record
                .iter()
                .filter(|(k, _)| fields.contains(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            Value::Object(projected)
        })
        .collect();

    Json(json!({"code": 0, "data": data})).into_response()
}

/// 在随机端口上启动模拟服务，返回其地址
pub async fn serve(index: Arc<FakeIndex>) -> Result<SocketAddr> {
    let app = Router::new().route("/v2/vectordb/entities/query", post(query)).with_state(index);
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Ok(addr)
}

/// 创建 blocks 表，`(uid, 是否有向量)`
pub async fn create_blocks(path: &Path, rows: &[(&str, bool)]) -> Result<()> {
    let options = SqliteConnectOptions::new().filename(path).create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;
    sqlx::query("CREATE TABLE blocks (uid TEXT NOT NULL, embedding BLOB)").execute(&pool).await?;
    for (uid, has_embedding) in rows {
        let embedding = has_embedding.then(|| vec![1u8; 16]);
        sqlx::query("INSERT INTO blocks (uid, embedding) VALUES (?, ?)")
            .bind(*uid)
            .bind(embedding)
            .execute(&pool)
            .await?;
    }
    pool.close().await;
    Ok(())
}
