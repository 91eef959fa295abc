use thiserror::Error;

#[derive(Debug, Error)]
pub enum MilvusError {
    #[error("请求向量数据库失败: {0}")]
    Http(#[from] reqwest::Error),
    #[error("向量数据库返回错误 {code}: {message}")]
    Service { code: i64, message: String },
    #[error("无法解析向量数据库响应: {0}")]
    Malformed(String),
    #[error("查询迭代器已关闭")]
    Closed,
    #[error("batch size 必须在 1 到 16384 之间，实际为 {0}")]
    InvalidBatchSize(usize),
}
