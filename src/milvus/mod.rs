//! Milvus / Zilliz Cloud 的 REST v2 查询客户端

mod client;
mod error;
mod iterator;

use std::future::Future;

pub use client::*;
pub use error::*;
pub use iterator::*;

/// 查询结果中的一条记录
pub type Record = serde_json::Map<String, serde_json::Value>;

/// 服务端单次查询允许的最大条数
pub const MAX_QUERY_LIMIT: usize = 16384;

/// 分页读取记录的游标，返回空页表示已读完
pub trait RecordCursor {
    fn next_page(&mut self) -> impl Future<Output = Result<Vec<Record>, MilvusError>> + Send;

    fn close(&mut self);
}
