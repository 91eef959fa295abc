use std::cmp::Ordering;

use log::debug;
use serde_json::Value;

use super::{MilvusClient, MilvusError, Record, RecordCursor};

/// 按主键翻页的查询迭代器
///
/// 每页结束后记住本页最大的主键，下一页的过滤条件为 `pk > last`。
/// 服务端不保存游标状态，`close` 之后不能再取数据。
pub struct QueryIterator<'a> {
    client: &'a MilvusClient,
    batch_size: usize,
    filter: Option<String>,
    output_fields: Vec<String>,
    last_pk: Option<Value>,
    closed: bool,
}

impl<'a> QueryIterator<'a> {
    pub(super) fn new(
        client: &'a MilvusClient,
        batch_size: usize,
        filter: Option<String>,
        mut output_fields: Vec<String>,
    ) -> Self {
        let pk = &client.config().primary_key;
        if !output_fields.contains(pk) {
            output_fields.push(pk.clone());
        }
        let filter = filter.filter(|f| !f.trim().is_empty());
        Self { client, batch_size, filter, output_fields, last_pk: None, closed: false }
    }

    /// 当前页请求使用的过滤表达式
    pub fn current_filter(&self) -> Result<String, MilvusError> {
        let pk = &self.client.config().primary_key;
        let cursor = match &self.last_pk {
            Some(last) => Some(format!("{} > {}", pk, pk_literal(last)?)),
            None => None,
        };
        Ok(match (&self.filter, cursor) {
            (Some(filter), Some(cursor)) => format!("({}) and {}", filter, cursor),
            (Some(filter), None) => filter.clone(),
            (None, Some(cursor)) => cursor,
            (None, None) => String::new(),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl RecordCursor for QueryIterator<'_> {
    async fn next_page(&mut self) -> Result<Vec<Record>, MilvusError> {
        if self.closed {
            return Err(MilvusError::Closed);
        }

        let filter = self.current_filter()?;
        let page = self.client.query(&filter, &self.output_fields, self.batch_size).await?;
        if page.is_empty() {
            return Ok(page);
        }

        let pk = &self.client.config().primary_key;
        let mut max_pk: Option<&Value> = None;
        for record in &page {
            let value = record
                .get(pk)
                .ok_or_else(|| MilvusError::Malformed(format!("记录缺少主键字段 {}", pk)))?;
            if max_pk.is_none_or(|max| compare_pk(value, max) == Ordering::Greater) {
                max_pk = Some(value);
            }
        }
        self.last_pk = max_pk.cloned();
        debug!("page of {} records, last {} = {:?}", page.len(), pk, self.last_pk);

        Ok(page)
    }

    fn close(&mut self) {
        self.closed = true;
        debug!("query iterator closed");
    }
}

/// 主键在过滤表达式中的字面量形式
fn pk_literal(value: &Value) -> Result<String, MilvusError> {
    match value {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))),
        other => Err(MilvusError::Malformed(format!("不支持的主键类型: {}", other))),
    }
}

fn compare_pk(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a.as_f64().partial_cmp(&b.as_f64()).unwrap_or(Ordering::Equal),
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
